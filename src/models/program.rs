use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthProgram {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Body of `POST /api/programs`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NewProgram {
    pub name: Option<String>,
    pub description: Option<String>,
}
