use crate::domain::{models::course::Course, ports::CourseRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCourseRepo {
    pool: SqlitePool,
}

impl SqliteCourseRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepo {
    async fn create(&self, course: &Course) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (id, tenant_id, slug, title, description, location, trainer_name, timezone, duration_min, max_participants, default_instance_type, contact_email, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&course.id)
            .bind(&course.tenant_id)
            .bind(&course.slug)
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.location)
            .bind(&course.trainer_name)
            .bind(&course.timezone)
            .bind(course.duration_min)
            .bind(course.max_participants)
            .bind(&course.default_instance_type)
            .bind(&course.contact_email)
            .bind(course.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, tenant_id: &str, slug: &str) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE tenant_id = ? AND slug = ?")
            .bind(tenant_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE tenant_id = ? ORDER BY created_at DESC")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, course: &Course) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"UPDATE courses SET slug=?, title=?, description=?, location=?, trainer_name=?, timezone=?, duration_min=?, max_participants=?, default_instance_type=?, contact_email=?
               WHERE tenant_id=? AND id=?
               RETURNING *"#
        )
            .bind(&course.slug)
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.location)
            .bind(&course.trainer_name)
            .bind(&course.timezone)
            .bind(course.duration_min)
            .bind(course.max_participants)
            .bind(&course.default_instance_type)
            .bind(&course.contact_email)
            .bind(&course.tenant_id)
            .bind(&course.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Course not found".into()));
        }
        Ok(())
    }
}
