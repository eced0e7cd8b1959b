//! API and form UI integration tests

use athletic_inventory::{
    config::{AppConfig, StorageConfig},
    create_router, AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create data dir");
        let config = AppConfig {
            storage: StorageConfig {
                data_dir: dir.path().to_path_buf(),
                ..StorageConfig::default()
            },
            ..AppConfig::default()
        };
        let state = AppState::new(config).expect("Failed to build state");
        Self {
            dir,
            router: create_router(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<(String, String)>, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, headers, String::from_utf8_lossy(&bytes).to_string())
    }

    async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let (status, _, text) = self.send(request).await;
        let value = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, value)
    }

    async fn form(&self, uri: &str, cookie: Option<&str>, body: &str) -> (StatusCode, Vec<(String, String)>, String) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    async fn page(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, Vec<(String, String)>, String) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn login(&self, role: &str, username: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"role": role, "username": username, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().expect("No token in response").to_string()
    }

    async fn admin_token(&self) -> String {
        self.login("admin", "admin", "admin123").await
    }

    async fn user_token(&self, username: &str) -> String {
        let (status, _) = self
            .json(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({"username": username, "password": "pw"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.login("user", username, "pw").await
    }

    async fn add_equipment(&self, token: &str, id: &str, quantity: u32) {
        let (status, _) = self
            .json(
                "POST",
                "/api/v1/equipment",
                Some(token),
                Some(json!({
                    "id": id,
                    "name": format!("{} name", id),
                    "category": "Ball",
                    "price": 19.99,
                    "quantity": quantity,
                    "date": "05/06/2024"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.json("GET", "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = app.json("GET", "/api/v1/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = TestApp::new();
    let (status, body) = app
        .json(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"role": "admin", "username": "admin", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn test_unauthorized_access() {
    let app = TestApp::new();
    let (status, _) = app.json("GET", "/api/v1/equipment", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.json("GET", "/api/v1/equipment", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_current_session() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let (status, body) = app.json("GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_create_list_and_delete_equipment() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    app.add_equipment(&token, "E1", 10).await;

    let (status, body) = app.json("GET", "/api/v1/equipment", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("catalog is an array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "E1");
    assert_eq!(items[0]["Equipment_name"], "E1 name");
    assert_eq!(items[0]["Quantity"], 10);
    assert_eq!(items[0]["Date"], "05/06/2024");

    // Same ID again is a conflict and leaves the record untouched
    let (status, _) = app
        .json(
            "POST",
            "/api/v1/equipment",
            Some(&token),
            Some(json!({"id": "E1", "name": "x", "category": "x", "price": 1.0, "quantity": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, body) = app.json("GET", "/api/v1/equipment/E1", Some(&token), None).await;
    assert_eq!(body["Quantity"], 10);

    let (status, _) = app.json("DELETE", "/api/v1/equipment/E1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.json("DELETE", "/api/v1/equipment/E1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_twice() {
    let app = TestApp::new();
    app.user_token("alice").await;

    let (status, _) = app
        .json(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({"username": "alice", "password": "other"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let users: Value =
        serde_json::from_slice(&std::fs::read(app.dir.path().join("user_data.json")).unwrap()).unwrap();
    assert_eq!(users.as_object().unwrap().len(), 1);
    assert_eq!(users["alice"]["password"], "pw");
}

#[tokio::test]
async fn test_role_capabilities() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.user_token("alice").await;
    app.add_equipment(&admin, "E1", 5).await;

    let (status, _) = app
        .json(
            "POST",
            "/api/v1/equipment",
            Some(&user),
            Some(json!({"id": "E2", "name": "x", "category": "x", "price": 1.0, "quantity": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.json("DELETE", "/api/v1/equipment/E1", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .json(
            "POST",
            "/api/v1/me/equipment/collect",
            Some(&admin),
            Some(json!({"equipment_id": "E1", "quantity": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Users may still browse the catalog
    let (status, _) = app.json("GET", "/api/v1/equipment", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_collect_then_replace() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.user_token("alice").await;
    app.add_equipment(&admin, "E1", 10).await;
    app.add_equipment(&admin, "E2", 5).await;

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/me/equipment/collect",
            Some(&user),
            Some(json!({"equipment_id": "E1", "quantity": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Quantity"], 3);

    let (_, body) = app.json("GET", "/api/v1/equipment/E1", Some(&user), None).await;
    assert_eq!(body["Quantity"], 7);

    // More than available
    let (status, body) = app
        .json(
            "POST",
            "/api/v1/me/equipment/collect",
            Some(&user),
            Some(json!({"equipment_id": "E1", "quantity": 8})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "NotEnoughStock");

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/me/equipment/replace",
            Some(&user),
            Some(json!({"old_id": "E1", "new_id": "E2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Equipment_name"], "E2 name");
    assert_eq!(body["Quantity"], 3);

    let (_, e1) = app.json("GET", "/api/v1/equipment/E1", Some(&user), None).await;
    let (_, e2) = app.json("GET", "/api/v1/equipment/E2", Some(&user), None).await;
    assert_eq!(e1["Quantity"], 10);
    assert_eq!(e2["Quantity"], 2);

    let (_, mine) = app.json("GET", "/api/v1/me/equipment", Some(&user), None).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], "E2");
    assert_eq!(mine[0]["Quantity"], 3);

    // Files keep the legacy layout
    let users: Value =
        serde_json::from_slice(&std::fs::read(app.dir.path().join("user_data.json")).unwrap()).unwrap();
    assert_eq!(users["alice"]["equipment"]["E2"]["Quantity"], 3);
    let catalog: Value =
        serde_json::from_slice(&std::fs::read(app.dir.path().join("Eq_data.json")).unwrap()).unwrap();
    assert_eq!(catalog["E2"]["Quantity"], 2);
    assert_eq!(catalog["E2"]["Category"], "Ball");
}

#[tokio::test]
async fn test_replace_insufficient_stock() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let user = app.user_token("alice").await;
    app.add_equipment(&admin, "E1", 10).await;
    app.add_equipment(&admin, "E2", 1).await;

    app.json(
        "POST",
        "/api/v1/me/equipment/collect",
        Some(&user),
        Some(json!({"equipment_id": "E1", "quantity": 2})),
    )
    .await;

    let (status, body) = app
        .json(
            "POST",
            "/api/v1/me/equipment/replace",
            Some(&user),
            Some(json!({"old_id": "E1", "new_id": "E2"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Not enough stock to replace with selected equipment.");
}

#[tokio::test]
async fn test_form_login_page() {
    let app = TestApp::new();
    let (status, _, html) = app.page("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Choose Role"));
    assert!(html.contains("New User? Register Below"));

    let (_, _, html) = app.form("/login", None, "role=admin&username=admin&password=nope").await;
    assert!(html.contains("Invalid username or password"));

    let (status, headers, _) = app.page("/panel", None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(header_value(&headers, "location"), Some("/"));
}

#[tokio::test]
async fn test_form_admin_session() {
    let app = TestApp::new();
    let (status, headers, _) = app
        .form("/login", None, "role=admin&username=admin&password=admin123")
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let set_cookie = header_value(&headers, "set-cookie").expect("session cookie");
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    assert!(cookie.starts_with("session="));

    let (_, _, html) = app.page("/panel", Some(&cookie)).await;
    assert!(html.contains("Admin Panel"));
    assert!(html.contains("No equipment data found."));

    let body = "id=E1&name=Football&category=Ball&price=12.50&quantity=4&date=2024-03-21";
    let (_, _, html) = app.form("/panel/insert", Some(&cookie), body).await;
    assert!(html.contains("Equipment added successfully!"));

    let (_, _, html) = app.form("/panel/insert", Some(&cookie), body).await;
    assert!(html.contains("Equipment ID already exists"));

    let (_, _, html) = app.page("/panel?action=display", Some(&cookie)).await;
    assert!(html.contains("Football"));
    assert!(html.contains("12.50"));
    assert!(html.contains("<td>21&#x2F;03&#x2F;2024</td>"));

    let (_, _, html) = app.form("/panel/delete", Some(&cookie), "id=E9").await;
    assert!(html.contains("Equipment ID not found"));

    // User-only actions fall back to the admin menu
    let (_, _, html) = app.page("/panel?action=collect", Some(&cookie)).await;
    assert!(!html.contains("Collect Equipment</h3>"));

    let (status, headers, _) = app.form("/logout", Some(&cookie), "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(header_value(&headers, "set-cookie").unwrap().starts_with("session="));
}

#[tokio::test]
async fn test_form_user_session() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.add_equipment(&admin, "E1", 10).await;

    let (_, _, html) = app.form("/register", None, "new_username=bob&new_password=pw").await;
    assert!(html.contains("Registration successful"));
    let (_, _, html) = app.form("/register", None, "new_username=bob&new_password=pw").await;
    assert!(html.contains("Username already exists"));

    let (_, headers, _) = app.form("/login", None, "role=user&username=bob&password=pw").await;
    let cookie = header_value(&headers, "set-cookie")
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let (_, _, html) = app.page("/panel", Some(&cookie)).await;
    assert!(html.contains("User Panel"));

    let (_, _, html) = app
        .form("/panel/collect", Some(&cookie), "equipment_id=E1&quantity=3")
        .await;
    assert!(html.contains("Equipment collected successfully!"));

    let (_, _, html) = app.page("/panel?action=my_equipment", Some(&cookie)).await;
    assert!(html.contains("E1 name"));

    // Admin actions are refused for users
    let (_, _, html) = app.form("/panel/delete", Some(&cookie), "id=E1").await;
    assert!(html.contains("Administrator privileges required"));
    let (_, e1) = app.json("GET", "/api/v1/equipment/E1", Some(&admin), None).await;
    assert_eq!(e1["Quantity"], 7);
}

#[tokio::test]
async fn test_form_collect_quantity_bounded_by_stock() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    app.add_equipment(&admin, "E1", 10).await;
    app.add_equipment(&admin, "E2", 4).await;
    app.add_equipment(&admin, "E3", 0).await;
    let cookie = format!("session={}", app.user_token("carol").await);

    // First row is offered by default
    let (_, _, html) = app.page("/panel?action=collect", Some(&cookie)).await;
    assert!(html.contains(r#"<option value="E1" selected>"#));
    assert!(html.contains(r#"max="10""#));

    let (_, _, html) = app
        .page("/panel?action=collect&equipment_id=E2", Some(&cookie))
        .await;
    assert!(html.contains(r#"<option value="E2" selected>"#));
    assert!(html.contains(r#"<input type="hidden" name="equipment_id" value="E2">"#));
    assert!(html.contains(r#"max="4""#));

    let (_, _, html) = app
        .page("/panel?action=collect&equipment_id=E3", Some(&cookie))
        .await;
    assert!(html.contains("E3 is out of stock."));
    assert!(!html.contains(r#"action="/panel/collect""#));

    // After collecting, the bound shrinks to what is left
    let (_, _, html) = app
        .form("/panel/collect", Some(&cookie), "equipment_id=E2&quantity=3")
        .await;
    assert!(html.contains("Equipment collected successfully!"));
    assert!(html.contains(r#"max="1""#));
}
