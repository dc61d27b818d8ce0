use tracing::info;

use super::non_blank;
use crate::db::Database;
use crate::error::{RegistryError, RegistryResult};
use crate::models::{HealthProgram, NewProgram};

/// Insert a program, then read it back by its generated id
pub async fn create_program(db: &Database, request: &NewProgram) -> RegistryResult<HealthProgram> {
    let name = non_blank(request.name.as_deref())
        .ok_or_else(|| RegistryError::validation("Program name is required"))?;
    let description = non_blank(request.description.as_deref());

    let id = db.create_program(name, description).await?;
    let program = db
        .get_program(id)
        .await?
        .ok_or(RegistryError::Store(sqlx::Error::RowNotFound))?;

    info!(program_id = program.id, name = %program.name, "created health program");
    Ok(program)
}

pub async fn list_programs(db: &Database) -> RegistryResult<Vec<HealthProgram>> {
    db.list_programs().await
}
