use crate::domain::{models::session::TrainingSession, ports::SessionRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepo {
    async fn create(&self, session: &TrainingSession) -> Result<TrainingSession, AppError> {
        sqlx::query_as::<_, TrainingSession>(
            r#"INSERT INTO training_sessions (id, tenant_id, course_id, name, title, description, location, trainer_name, max_participants, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            "SELECT * FROM training_sessions WHERE tenant_id = ? AND id = ?"
        )
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_course(&self, course_id: &str) -> Result<Vec<TrainingSession>, AppError> {
        sqlx::query_as::<_, TrainingSession>(
            "SELECT * FROM training_sessions WHERE course_id = ? ORDER BY created_at ASC"
        )
            .bind(course_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, session: &TrainingSession) -> Result<TrainingSession, AppError> {
        sqlx::query_as::<_, TrainingSession>(
            r#"UPDATE training_sessions SET name=?, title=?, description=?, location=?, trainer_name=?, max_participants=?
               WHERE tenant_id=? AND id=?
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
        let result = sqlx::query("DELETE FROM training_sessions WHERE tenant_id = ? AND id = ?")
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
