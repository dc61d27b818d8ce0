use chrono::NaiveDate;
use tracing::debug;

use super::{with_pool, Database};
use crate::error::RegistryResult;
use crate::models::{EnrolledProgram, Enrollment};

impl Database {
    /// Insert an enrollment and return the row exactly as written
    ///
    /// References are not checked here; foreign keys in the schema decide.
    pub async fn create_enrollment(
        &self,
        client_id: i64,
        program_id: i64,
        enrollment_date: Option<NaiveDate>,
    ) -> RegistryResult<Enrollment> {
        let enrollment = with_pool!(self, |pool| {
            sqlx::query_as::<_, Enrollment>(
                r#"
                INSERT INTO client_programs (client_id, program_id, enrollment_date)
                VALUES ($1, $2, $3)
                RETURNING id, client_id, program_id, status, enrollment_date
                "#,
            )
            .bind(client_id)
            .bind(program_id)
            .bind(enrollment_date)
            .fetch_one(pool)
            .await
        })?;

        debug!(
            enrollment_id = enrollment.id,
            client_id, program_id, "inserted enrollment"
        );
        Ok(enrollment)
    }

    /// Program rows joined with enrollment status and date
    ///
    /// An unknown client simply has no rows.
    pub async fn list_client_programs(&self, client_id: i64) -> RegistryResult<Vec<EnrolledProgram>> {
        let programs = with_pool!(self, |pool| {
            sqlx::query_as::<_, EnrolledProgram>(
                r#"
                SELECT hp.id, hp.name, hp.description, cp.status, cp.enrollment_date
                FROM client_programs cp
                JOIN health_programs hp ON cp.program_id = hp.id
                WHERE cp.client_id = $1
                ORDER BY cp.id
                "#,
            )
            .bind(client_id)
            .fetch_all(pool)
            .await
        })?;

        Ok(programs)
    }

    pub async fn count_enrollments(&self, client_id: i64, program_id: i64) -> RegistryResult<i64> {
        let count = with_pool!(self, |pool| {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM client_programs WHERE client_id = $1 AND program_id = $2",
            )
            .bind(client_id)
            .bind(program_id)
            .fetch_one(pool)
            .await
        })?;

        Ok(count)
    }
}
