// src/test_support.rs
// Fixtures shared by the unit tests: an in-memory user table, a fake webhook
// server and request helpers for driving the router.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Multipart,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Request, StatusCode,
    },
    response::Response,
    routing::post,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::user::User;
use crate::routes::{create_app, ADMIN_SESSION_HEADER};
use crate::services::users::UserDirectory;
use crate::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@rh.com";
pub const ADMIN_PASSWORD: &str = "admin-secret";

/// Cheap bcrypt cost; tests hash many passwords.
pub fn hash(password: &str) -> String {
    bcrypt::hash(password, 4).expect("bcrypt hash")
}

pub fn test_config() -> Config {
    Config {
        jwt_secret: "test-secret".to_string(),
        database_url: None,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password_hash: Some(hash(ADMIN_PASSWORD)),
        admin_name: "Administrador".to_string(),
        upload_webhook_url: "http://127.0.0.1:9/upload".to_string(),
        dashboard_webhook_url: "http://127.0.0.1:9/dashboard".to_string(),
        webhook_timeout_secs: 5,
        max_upload_bytes: 1024 * 1024,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
    }
}

pub fn user(unique_id: &str, email: &str, password: &str, ativo: &str) -> User {
    User {
        unique_id: unique_id.to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        ativo: ativo.to_string(),
        senha: hash(password),
        cpf_cnpj: None,
    }
}

pub struct MemoryUserDirectory {
    rows: Mutex<Vec<User>>,
}

impl MemoryUserDirectory {
    pub fn new(rows: Vec<User>) -> Self {
        Self { rows: Mutex::new(rows) }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> AppResult<Vec<User>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|u| u.email == email).cloned().collect())
    }

    async fn find_by_id(&self, unique_id: &str) -> AppResult<Option<User>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|u| u.unique_id == unique_id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.rows.lock().await.clone())
    }

    async fn set_active(&self, unique_id: &str, ativo: &str) -> AppResult<Option<User>> {
        let mut rows = self.rows.lock().await;
        Ok(rows.iter_mut().find(|u| u.unique_id == unique_id).map(|u| {
            u.ativo = ativo.to_string();
            u.clone()
        }))
    }
}

pub fn app_with(users: Vec<User>, configure: impl FnOnce(&mut Config)) -> Router {
    let mut config = test_config();
    configure(&mut config);
    let state = AppState::new(config, Arc::new(MemoryUserDirectory::new(users))).expect("state");
    create_app(Arc::new(state))
}

pub fn app_with_users(users: Vec<User>) -> Router {
    app_with(users, |_| {})
}

pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    bearer: Option<&str>,
    admin: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = bearer {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(token) = admin {
        builder = builder.header(ADMIN_SESSION_HEADER, token);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response")
}

/// POSTs `body` verbatim, for payloads `send` cannot express.
pub async fn send_raw(app: &Router, path: &str, content_type: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

pub async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Signs in through the API and returns the user token.
pub async fn signed_in(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/login",
        None,
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["token"]
        .as_str()
        .expect("token")
        .to_string()
}

/// `(field name, file name, content)` parts encoded as multipart/form-data.
pub fn multipart_request(path: &str, token: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    const BOUNDARY: &str = "rh-portal-test-boundary";
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("multipart request")
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .expect("fake server");
    });
    format!("http://{addr}")
}

#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub file_field: String,
    pub file_name: Option<String>,
    pub type_field: Option<String>,
}

/// Upload webhook stand-in: records every multipart POST to `/upload` and answers `status`.
#[derive(Clone)]
pub struct FakeWebhook {
    status: StatusCode,
    received: Arc<Mutex<Vec<ReceivedUpload>>>,
}

impl FakeWebhook {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn router(&self) -> Router {
        let received = self.received.clone();
        let status = self.status;
        Router::new().route(
            "/upload",
            post(move |mut multipart: Multipart| {
                let received = received.clone();
                async move {
                    let mut upload = ReceivedUpload::default();
                    while let Ok(Some(field)) = multipart.next_field().await {
                        let name = field.name().unwrap_or_default().to_string();
                        if name == "type" {
                            upload.type_field = field.text().await.ok();
                        } else {
                            upload.file_name = field.file_name().map(str::to_string);
                            upload.file_field = name;
                            let _ = field.bytes().await;
                        }
                    }
                    received.lock().await.push(upload);
                    status
                }
            }),
        )
    }

    pub async fn received(&self) -> Vec<ReceivedUpload> {
        self.received.lock().await.clone()
    }
}
