use tracing::debug;

use super::{with_pool, Database};
use crate::error::RegistryResult;
use crate::models::HealthProgram;

impl Database {
    pub async fn create_program(&self, name: &str, description: Option<&str>) -> RegistryResult<i64> {
        let id = with_pool!(self, |pool| {
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO health_programs (name, description)
                VALUES ($1, $2)
                RETURNING id
                "#,
            )
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
        })?;

        debug!(program_id = id, "inserted health program");
        Ok(id)
    }

    pub async fn get_program(&self, id: i64) -> RegistryResult<Option<HealthProgram>> {
        let program = with_pool!(self, |pool| {
            sqlx::query_as::<_, HealthProgram>(
                "SELECT id, name, description FROM health_programs WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(pool)
            .await
        })?;

        Ok(program)
    }

    /// Most recently created first
    pub async fn list_programs(&self) -> RegistryResult<Vec<HealthProgram>> {
        let programs = with_pool!(self, |pool| {
            sqlx::query_as::<_, HealthProgram>(
                "SELECT id, name, description FROM health_programs ORDER BY id DESC",
            )
            .fetch_all(pool)
            .await
        })?;

        Ok(programs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_db() -> Database {
        let db = Database::connect_url("sqlite::memory:", 1).await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_db().await;

        let id = db
            .create_program("Diabetes Management", Some("Glucose monitoring"))
            .await
            .unwrap();
        let program = db.get_program(id).await.unwrap().unwrap();

        assert_eq!(program.name, "Diabetes Management");
        assert_eq!(program.description.as_deref(), Some("Glucose monitoring"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let db = setup_db().await;

        let first = db.create_program("TB", None).await.unwrap();
        let second = db.create_program("Malaria", None).await.unwrap();

        let ids: Vec<i64> = db.list_programs().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_get_missing_program() {
        let db = setup_db().await;
        assert!(db.get_program(42).await.unwrap().is_none());
    }
}
