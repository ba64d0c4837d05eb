use training_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_tenant_repo::SqliteTenantRepo,
        sqlite_course_repo::SqliteCourseRepo,
        sqlite_session_repo::SqliteSessionRepo,
        sqlite_instance_repo::SqliteInstanceRepo,
        sqlite_job_repo::SqliteJobRepo,
    },
    domain::ports::{EmailService, OutboundEmail},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::Request,
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tera::Tera;
use tower::ServiceExt;
use serde_json::{json, Value};

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template("cancellation.html", "<html>Mock cancellation for {{ session_name }}</html>").unwrap();
        tera.add_raw_template("generation.html", "<html>Mock generation for {{ session_name }}</html>").unwrap();
        let templates = Arc::new(tera);

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
        };

        let state = Arc::new(AppState {
            config,
            tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
            course_repo: Arc::new(SqliteCourseRepo::new(pool.clone())),
            session_repo: Arc::new(SqliteSessionRepo::new(pool.clone())),
            instance_repo: Arc::new(SqliteInstanceRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            email_service: Arc::new(MockEmailService),
            templates,
        });

        let router = create_router(state.clone());

        Self { router, pool, db_filename, state }
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("POST").uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())).unwrap()
        ).await.unwrap()
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("PUT").uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())).unwrap()
        ).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri)
                .body(Body::empty()).unwrap()
        ).await.unwrap()
    }

    pub async fn delete(&self, uri: &str) -> axum::response::Response {
        self.router.clone().oneshot(
            Request::builder().method("DELETE").uri(uri)
                .body(Body::empty()).unwrap()
        ).await.unwrap()
    }

    /// Seeds a tenant plus one course and returns (tenant_id, course_slug).
    pub async fn seed_course(&self, slug: &str) -> (String, String) {
        let res = self.post_json("/api/v1/tenants", json!({
            "name": "Acme Formation",
            "slug": format!("acme-{}", Uuid::new_v4()),
        })).await;
        let tenant = parse_body(res).await;
        let tenant_id = tenant["id"].as_str().unwrap().to_string();

        let res = self.post_json(&format!("/api/v1/{}/courses", tenant_id), json!({
            "slug": slug,
            "title": "Rust Initiation",
            "description": "Three days of fundamentals",
            "location": "Paris",
            "trainer_name": "Ada",
            "timezone": "Europe/Paris",
            "duration_min": 180,
            "max_participants": 12,
            "default_instance_type": "presentiel",
            "contact_email": "training@acme.example",
        })).await;
        assert_eq!(res.status(), axum::http::StatusCode::OK);

        (tenant_id, slug.to_string())
    }

    /// Seeds a session under the given course and returns its id.
    pub async fn seed_session(&self, tenant_id: &str, course_slug: &str, name: &str) -> String {
        let res = self.post_json(
            &format!("/api/v1/{}/courses/{}/sessions", tenant_id, course_slug),
            json!({"name": name}),
        ).await;
        assert_eq!(res.status(), axum::http::StatusCode::OK);
        parse_body(res).await["id"].as_str().unwrap().to_string()
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
