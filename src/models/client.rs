use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::ProgramSummary;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Body of `POST /api/clients`
///
/// Web forms submit untouched inputs as empty strings, so an empty
/// `dateOfBirth` is read as absent rather than rejected.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// A client row with the programs it is enrolled in
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClientWithPrograms {
    #[serde(flatten)]
    pub client: Client,
    pub programs: Vec<ProgramSummary>,
}

fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_reads_camel_case() {
        let body = r#"{"firstName":"Jane","lastName":"Doe","dateOfBirth":"1990-04-12","contactNumber":"0712"}"#;
        let client: NewClient = serde_json::from_str(body).unwrap();
        assert_eq!(client.first_name.as_deref(), Some("Jane"));
        assert_eq!(client.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(client.contact_number.as_deref(), Some("0712"));
        assert!(client.email.is_none());
    }

    #[test]
    fn test_empty_date_of_birth_is_absent() {
        let body = r#"{"firstName":"Jane","lastName":"Doe","dateOfBirth":""}"#;
        let client: NewClient = serde_json::from_str(body).unwrap();
        assert!(client.date_of_birth.is_none());
    }

    #[test]
    fn test_malformed_date_of_birth_is_rejected() {
        let body = r#"{"firstName":"Jane","lastName":"Doe","dateOfBirth":"12/04/1990"}"#;
        assert!(serde_json::from_str::<NewClient>(body).is_err());
    }

    #[test]
    fn test_client_with_programs_is_flat() {
        let profile = ClientWithPrograms {
            client: Client {
                id: 7,
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                date_of_birth: None,
                gender: None,
                contact_number: None,
                email: None,
                address: None,
            },
            programs: vec![],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["first_name"], "Jane");
        assert_eq!(json["programs"], serde_json::json!([]));
    }
}
