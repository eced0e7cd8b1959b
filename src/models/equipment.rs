//! Equipment model

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Catalog keyed by equipment ID, in insertion order
pub type Catalog = IndexMap<String, Equipment>;

/// Equipment record as stored in the catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    #[serde(rename = "Equipment_name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
    /// Unit price, never negative
    #[serde(rename = "Price", with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    /// Units currently available in the catalog
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    /// Acquisition date, stored as DD/MM/YYYY
    #[serde(rename = "Date", with = "date_format")]
    #[schema(value_type = String, example = "21/03/2024")]
    pub date: NaiveDate,
}

/// Equipment record together with its catalog ID
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(flatten)]
    pub equipment: Equipment,
}

impl CatalogEntry {
    pub fn list(catalog: &Catalog) -> Vec<CatalogEntry> {
        catalog
            .iter()
            .map(|(id, equipment)| CatalogEntry {
                id: id.clone(),
                equipment: equipment.clone(),
            })
            .collect()
    }
}

/// Create equipment request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Equipment ID must not be empty"))]
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub quantity: u32,
    /// DD/MM/YYYY; defaults to today
    #[serde(default, with = "date_format::option")]
    #[schema(value_type = Option<String>, example = "21/03/2024")]
    pub date: Option<NaiveDate>,
}

/// Serde adapter for the DD/MM/YYYY date layout used in the data files
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d/%m/%Y";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::FORMAT;
        use chrono::NaiveDate;
        use serde::{self, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
