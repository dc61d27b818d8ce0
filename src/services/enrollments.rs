use chrono::{Local, NaiveDate};
use tracing::info;

use super::present_id;
use crate::db::Database;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{EnrolledProgram, Enrollment, EnrollmentRequest};

/// Enroll without an enrollment date, as the bulk registration flow does
pub async fn enroll_client(db: &Database, request: &EnrollmentRequest) -> RegistryResult<Enrollment> {
    let (Some(client_id), Some(program_id)) =
        (present_id(request.client_id), present_id(request.program_id))
    else {
        return Err(RegistryError::validation(
            "Client ID and Program ID are required",
        ));
    };

    let enrollment = db.create_enrollment(client_id, program_id, None).await?;
    info!(enrollment_id = enrollment.id, client_id, program_id, "client enrolled in program");
    Ok(enrollment)
}

/// Enroll dated today and describe the result with the program's columns
///
/// `client_id` is `None` when the path did not hold a number; that is
/// reported as an unknown client once the program id has been checked.
pub async fn enroll_client_in_program(
    db: &Database,
    client_id: Option<i64>,
    program_id: Option<i64>,
) -> RegistryResult<EnrolledProgram> {
    enroll_client_in_program_on(db, client_id, program_id, Local::now().date_naive()).await
}

/// Same as [`enroll_client_in_program`] with an explicit enrollment date
///
/// The response is assembled from the values just written plus the program
/// row; the enrollment is never looked up again by its generated id.
pub async fn enroll_client_in_program_on(
    db: &Database,
    client_id: Option<i64>,
    program_id: Option<i64>,
    enrollment_date: NaiveDate,
) -> RegistryResult<EnrolledProgram> {
    let program_id = present_id(program_id)
        .ok_or_else(|| RegistryError::validation("Program ID is required"))?;
    let client_id = client_id.ok_or_else(|| RegistryError::not_found("Client not found"))?;

    let enrollment = db
        .create_enrollment(client_id, program_id, Some(enrollment_date))
        .await?;
    let program = db
        .get_program(program_id)
        .await?
        .ok_or(RegistryError::Store(sqlx::Error::RowNotFound))?;

    info!(enrollment_id = enrollment.id, client_id, program_id, "client enrolled in program");
    Ok(EnrolledProgram {
        id: program.id,
        name: program.name,
        description: program.description,
        status: enrollment.status,
        enrollment_date: enrollment.enrollment_date,
    })
}

pub async fn list_client_programs(db: &Database, client_id: i64) -> RegistryResult<Vec<EnrolledProgram>> {
    db.list_client_programs(client_id).await
}
