use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A row of `client_programs`
///
/// `status` has no writer; it is carried as opaque metadata.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub id: i64,
    pub client_id: i64,
    pub program_id: i64,
    pub status: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
}

/// Program columns embedded in a client profile
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgramSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Program columns joined with the enrollment's metadata
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EnrolledProgram {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
}

/// Body of `POST /api/enroll`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub client_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub program_id: Option<i64>,
}

/// Body of `POST /api/clients/:id/enroll`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEnrollmentRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub program_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Ids arrive as numbers or numeric strings (form values); anything else is absent
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(id)) => Some(id),
        Some(RawId::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_accept_numbers_and_numeric_strings() {
        let request: EnrollmentRequest =
            serde_json::from_str(r#"{"clientId": "12", "programId": 3}"#).unwrap();
        assert_eq!(request.client_id, Some(12));
        assert_eq!(request.program_id, Some(3));
    }

    #[test]
    fn test_unusable_ids_are_absent() {
        let request: EnrollmentRequest =
            serde_json::from_str(r#"{"clientId": "one", "programId": null}"#).unwrap();
        assert_eq!(request.client_id, None);
        assert_eq!(request.program_id, None);

        let request: ProgramEnrollmentRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.program_id, None);
    }
}
