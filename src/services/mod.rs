//! Validation and orchestration between the HTTP layer and the store.

pub mod clients;
pub mod enrollments;
pub mod programs;

/// Trimmed value, or `None` when absent or blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Ids from request bodies count as absent unless positive
pub(crate) fn present_id(value: Option<i64>) -> Option<i64> {
    value.filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  TB Care ")), Some("TB Care"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_present_id() {
        assert_eq!(present_id(Some(3)), Some(3));
        assert_eq!(present_id(Some(0)), None);
        assert_eq!(present_id(None), None);
    }
}
