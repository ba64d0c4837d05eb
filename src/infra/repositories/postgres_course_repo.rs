use crate::domain::{models::course::Course, ports::CourseRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCourseRepo {
    pool: PgPool,
}

impl PostgresCourseRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepo {
    async fn create(&self, course: &Course) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (id, tenant_id, slug, title, description, location, trainer_name, timezone, duration_min, max_participants, default_instance_type, contact_email, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
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
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE tenant_id = $1 AND slug = $2")
            .bind(tenant_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str) -> Result<Vec<Course>, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE tenant_id = $1 ORDER BY created_at DESC")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, course: &Course) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"UPDATE courses SET slug=$1, title=$2, description=$3, location=$4, trainer_name=$5, timezone=$6, duration_min=$7, max_participants=$8, default_instance_type=$9, contact_email=$10
               WHERE tenant_id=$11 AND id=$12
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
        let result = sqlx::query("DELETE FROM courses WHERE tenant_id = $1 AND id = $2")
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
