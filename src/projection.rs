//! Client-side list processing for the clients view.
//!
//! [`project`] filters and orders an already loaded client list. It does no
//! I/O and keeps no state, so the console can re-run it on every keystroke.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::models::Client;

/// Age ranges offered by the clients view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    /// Under 18
    Child,
    /// 18 to 34
    YoungAdult,
    /// 35 to 59
    Adult,
    /// 60 and over
    Senior,
    /// No date of birth, or one in the future
    Unknown,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 5] = [
        AgeBucket::Child,
        AgeBucket::YoungAdult,
        AgeBucket::Adult,
        AgeBucket::Senior,
        AgeBucket::Unknown,
    ];

    pub fn for_age(age: Option<u32>) -> Self {
        match age {
            None => AgeBucket::Unknown,
            Some(0..=17) => AgeBucket::Child,
            Some(18..=34) => AgeBucket::YoungAdult,
            Some(35..=59) => AgeBucket::Adult,
            Some(_) => AgeBucket::Senior,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Child => "Under 18",
            AgeBucket::YoungAdult => "18-34",
            AgeBucket::Adult => "35-59",
            AgeBucket::Senior => "60+",
            AgeBucket::Unknown => "Unknown",
        }
    }
}

/// Whole years between `date_of_birth` and `today`
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if date_of_birth > today {
        return None;
    }
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

pub fn client_age(client: &Client, today: NaiveDate) -> Option<u32> {
    client.date_of_birth.and_then(|dob| age_on(dob, today))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    /// Matched case-insensitively against the client's gender
    pub gender: Option<String>,
    pub age_bucket: Option<AgeBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    FirstName,
    LastName,
    Age,
    Id,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::FirstName => "First name",
            SortKey::LastName => "Last name",
            SortKey::Age => "Age",
            SortKey::Id => "Registered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortField {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }
}

/// Filter by `query` and `filter`, then order by `sort`
///
/// `query` is a case-insensitive substring of first name, last name or
/// email; a blank query keeps everything. Later sort fields break ties of
/// earlier ones and ascending id breaks whatever ties remain. Unknown ages
/// sort last in either direction.
pub fn project(
    clients: &[Client],
    filter: &ClientFilter,
    sort: &[SortField],
    query: &str,
    today: NaiveDate,
) -> Vec<Client> {
    let needle = query.trim().to_lowercase();

    let mut selected: Vec<Client> = clients
        .iter()
        .filter(|client| matches_query(client, &needle))
        .filter(|client| matches_filter(client, filter, today))
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        sort.iter()
            .map(|field| compare(a, b, field, today))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    selected
}

fn matches_query(client: &Client, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(client.first_name.as_str())
        || contains(client.last_name.as_str())
        || client.email.as_deref().is_some_and(contains)
}

fn matches_filter(client: &Client, filter: &ClientFilter, today: NaiveDate) -> bool {
    if let Some(gender) = &filter.gender {
        let same = client
            .gender
            .as_deref()
            .is_some_and(|g| g.eq_ignore_ascii_case(gender));
        if !same {
            return false;
        }
    }

    if let Some(bucket) = filter.age_bucket {
        if AgeBucket::for_age(client_age(client, today)) != bucket {
            return false;
        }
    }

    true
}

fn compare(a: &Client, b: &Client, field: &SortField, today: NaiveDate) -> Ordering {
    let directed = |ordering: Ordering| match field.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };

    match field.key {
        SortKey::FirstName => directed(compare_text(&a.first_name, &b.first_name)),
        SortKey::LastName => directed(compare_text(&a.last_name, &b.last_name)),
        SortKey::Id => directed(a.id.cmp(&b.id)),
        SortKey::Age => match (client_age(a, today), client_age(b, today)) {
            (Some(x), Some(y)) => directed(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn client(id: i64, first: &str, last: &str, dob: Option<(i32, u32, u32)>, gender: Option<&str>) -> Client {
        Client {
            id,
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: dob.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            gender: gender.map(Into::into),
            contact_number: None,
            email: Some(format!("{}@clinic.test", first.to_lowercase())),
            address: None,
        }
    }

    fn roster() -> Vec<Client> {
        vec![
            client(1, "Amina", "Otieno", Some((1990, 1, 10)), Some("Female")),
            client(2, "brian", "Kamau", Some((2010, 8, 1)), Some("Male")),
            client(3, "Carol", "Achieng", None, Some("female")),
            client(4, "David", "Kamau", Some((1950, 3, 3)), Some("Male")),
            client(5, "Esther", "Wanjiru", Some((1980, 6, 15)), None),
        ]
    }

    fn ids(clients: &[Client]) -> Vec<i64> {
        clients.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let dob = NaiveDate::from_ymd_opt(2006, 6, 15).unwrap();
        assert_eq!(age_on(dob, today()), Some(18));
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), Some(17));
    }

    #[test]
    fn test_future_birth_date_has_no_age() {
        let dob = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(age_on(dob, today()), None);
        assert_eq!(AgeBucket::for_age(None), AgeBucket::Unknown);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(AgeBucket::for_age(Some(17)), AgeBucket::Child);
        assert_eq!(AgeBucket::for_age(Some(18)), AgeBucket::YoungAdult);
        assert_eq!(AgeBucket::for_age(Some(34)), AgeBucket::YoungAdult);
        assert_eq!(AgeBucket::for_age(Some(35)), AgeBucket::Adult);
        assert_eq!(AgeBucket::for_age(Some(59)), AgeBucket::Adult);
        assert_eq!(AgeBucket::for_age(Some(60)), AgeBucket::Senior);
    }

    #[test]
    fn test_no_filters_keeps_id_order() {
        let result = project(&roster(), &ClientFilter::default(), &[], "", today());
        assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_query_matches_names_and_email_case_insensitively() {
        let result = project(&roster(), &ClientFilter::default(), &[], "KAMAU", today());
        assert_eq!(ids(&result), vec![2, 4]);

        let result = project(&roster(), &ClientFilter::default(), &[], "esther@", today());
        assert_eq!(ids(&result), vec![5]);
    }

    #[test]
    fn test_gender_filter_ignores_case_and_missing_values() {
        let filter = ClientFilter {
            gender: Some("FEMALE".into()),
            age_bucket: None,
        };
        let result = project(&roster(), &filter, &[], "", today());
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn test_filters_compose_with_query() {
        let filter = ClientFilter {
            gender: Some("Male".into()),
            age_bucket: Some(AgeBucket::Senior),
        };
        let result = project(&roster(), &filter, &[], "kam", today());
        assert_eq!(ids(&result), vec![4]);
    }

    #[test]
    fn test_unknown_bucket_selects_missing_birth_dates() {
        let filter = ClientFilter {
            gender: None,
            age_bucket: Some(AgeBucket::Unknown),
        };
        let result = project(&roster(), &filter, &[], "", today());
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn test_multi_key_sort_breaks_ties() {
        let sort = [
            SortField::ascending(SortKey::LastName),
            SortField::descending(SortKey::FirstName),
        ];
        let result = project(&roster(), &ClientFilter::default(), &sort, "", today());
        // Kamau ties on last name; "David" > "brian" descending
        assert_eq!(ids(&result), vec![3, 4, 2, 1, 5]);
    }

    #[test]
    fn test_age_sort_puts_unknown_last_both_ways() {
        let ascending = project(
            &roster(),
            &ClientFilter::default(),
            &[SortField::ascending(SortKey::Age)],
            "",
            today(),
        );
        assert_eq!(ids(&ascending), vec![2, 1, 5, 4, 3]);

        let descending = project(
            &roster(),
            &ClientFilter::default(),
            &[SortField::descending(SortKey::Age)],
            "",
            today(),
        );
        assert_eq!(ids(&descending), vec![4, 5, 1, 2, 3]);
    }

    #[test]
    fn test_equal_keys_fall_back_to_id() {
        let clients = vec![
            client(9, "Sam", "Lee", None, None),
            client(4, "sam", "lee", None, None),
        ];
        let result = project(
            &clients,
            &ClientFilter::default(),
            &[SortField::ascending(SortKey::FirstName)],
            "",
            today(),
        );
        assert_eq!(ids(&result), vec![4, 9]);
    }
}
