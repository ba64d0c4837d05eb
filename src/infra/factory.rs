use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_tenant_repo::PostgresTenantRepo, postgres_course_repo::PostgresCourseRepo,
    postgres_session_repo::PostgresSessionRepo, postgres_instance_repo::PostgresInstanceRepo,
    postgres_job_repo::PostgresJobRepo,
    sqlite_tenant_repo::SqliteTenantRepo, sqlite_course_repo::SqliteCourseRepo,
    sqlite_session_repo::SqliteSessionRepo, sqlite_instance_repo::SqliteInstanceRepo,
    sqlite_job_repo::SqliteJobRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("cancellation.html", include_str!("../templates/cancellation.html"))
        .expect("Failed to load cancellation template");
    tera.add_raw_template("generation.html", include_str!("../templates/generation.html"))
        .expect("Failed to load generation template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    let templates = Arc::new(load_templates());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            tenant_repo: Arc::new(PostgresTenantRepo::new(pool.clone())),
            course_repo: Arc::new(PostgresCourseRepo::new(pool.clone())),
            session_repo: Arc::new(PostgresSessionRepo::new(pool.clone())),
            instance_repo: Arc::new(PostgresInstanceRepo::new(pool.clone())),
            job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
            email_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
            course_repo: Arc::new(SqliteCourseRepo::new(pool.clone())),
            session_repo: Arc::new(SqliteSessionRepo::new(pool.clone())),
            instance_repo: Arc::new(SqliteInstanceRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            email_service,
            templates,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
