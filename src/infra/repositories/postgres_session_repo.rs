use crate::domain::{models::session::TrainingSession, ports::SessionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSessionRepo {
    pool: PgPool,
}

impl PostgresSessionRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepo {
    async fn create(&self, session: &TrainingSession) -> Result<TrainingSession, AppError> {
        sqlx::query_as::<_, TrainingSession>(
            r#"INSERT INTO training_sessions (id, tenant_id, course_id, name, title, description, location, trainer_name, max_participants, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING *"#
        )
            .bind(&session.id)
            .bind(&session.tenant_id)
            .bind(&session.course_id)
            .bind(&session.name)
            .bind(&session.title)
            .bind(&session.description)
            .bind(&session.location)
            .bind(&session.trainer_name)
            .bind(session.max_participants)
            .bind(session.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<TrainingSession>, AppError> {
        sqlx::query_as::<_, TrainingSession>(
            "SELECT * FROM training_sessions WHERE tenant_id = $1 AND id = $2"
        )
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_course(&self, course_id: &str) -> Result<Vec<TrainingSession>, AppError> {
        sqlx::query_as::<_, TrainingSession>(
            "SELECT * FROM training_sessions WHERE course_id = $1 ORDER BY created_at ASC"
        )
            .bind(course_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, session: &TrainingSession) -> Result<TrainingSession, AppError> {
        sqlx::query_as::<_, TrainingSession>(
            r#"UPDATE training_sessions SET name=$1, title=$2, description=$3, location=$4, trainer_name=$5, max_participants=$6
               WHERE tenant_id=$7 AND id=$8
               RETURNING *"#
        )
            .bind(&session.name)
            .bind(&session.title)
            .bind(&session.description)
            .bind(&session.location)
            .bind(&session.trainer_name)
            .bind(session.max_participants)
            .bind(&session.tenant_id)
            .bind(&session.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM training_sessions WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Session not found".into()));
        }
        Ok(())
    }
}
