use crate::domain::{models::instance::SessionInstance, ports::InstanceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresInstanceRepo {
    pool: PgPool,
}

impl PostgresInstanceRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

const INSERT_SQL: &str = r#"INSERT INTO session_instances
    (id, tenant_id, session_id, instance_type, start_date, start_time, end_time, duration_minutes, status, is_cancelled, cancellation_reason, payload_json, max_participants, current_participants, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    RETURNING *"#;

#[async_trait]
impl InstanceRepository for PostgresInstanceRepo {
    async fn create_batch(&self, instances: &[SessionInstance]) -> Result<Vec<SessionInstance>, AppError> {
        // One transaction for the whole batch: a failure on any row rolls
        // back everything rather than silently dropping the rest.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::with_capacity(instances.len());

        for instance in instances {
            let row = sqlx::query_as::<_, SessionInstance>(INSERT_SQL)
                .bind(&instance.id)
                .bind(&instance.tenant_id)
                .bind(&instance.session_id)
                .bind(&instance.instance_type)
                .bind(instance.start_date)
                .bind(instance.start_time)
                .bind(instance.end_time)
                .bind(instance.duration_minutes)
                .bind(&instance.status)
                .bind(instance.is_cancelled)
                .bind(&instance.cancellation_reason)
                .bind(&instance.payload_json)
                .bind(instance.max_participants)
                .bind(instance.current_participants)
                .bind(instance.created_at)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            created.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<SessionInstance>, AppError> {
        sqlx::query_as::<_, SessionInstance>(
            "SELECT * FROM session_instances WHERE tenant_id = $1 AND id = $2"
        )
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<SessionInstance>, AppError> {
        sqlx::query_as::<_, SessionInstance>(
            "SELECT * FROM session_instances WHERE session_id = $1 ORDER BY start_date ASC, start_time ASC"
        )
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, instance: &SessionInstance) -> Result<SessionInstance, AppError> {
        sqlx::query_as::<_, SessionInstance>(
            r#"UPDATE session_instances SET status=$1, is_cancelled=$2, cancellation_reason=$3, max_participants=$4, current_participants=$5
               WHERE tenant_id=$6 AND id=$7
               RETURNING *"#
        )
            .bind(&instance.status)
            .bind(instance.is_cancelled)
            .bind(&instance.cancellation_reason)
            .bind(instance.max_participants)
            .bind(instance.current_participants)
            .bind(&instance.tenant_id)
            .bind(&instance.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
