//! Timestamp bounds for stored values.

use chrono::{DateTime, Datelike, Utc};

use crate::error::{RecallError, RecallResult};

/// Latest year a stored timestamp may carry. RFC3339 has four year digits.
pub const MAX_TIMESTAMP_YEAR: i32 = 9999;

/// Reject timestamps outside years 0..=9999.
pub fn check_timestamp(field: &str, value: DateTime<Utc>) -> RecallResult<()> {
    if !(0..=MAX_TIMESTAMP_YEAR).contains(&value.year()) {
        return Err(RecallError::out_of_range(
            field,
            value,
            &format!("years [0, {}]", MAX_TIMESTAMP_YEAR),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::TimeZone;

    #[test]
    fn test_four_digit_years_accepted() {
        let first = Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(check_timestamp("as_of", first).is_ok());
        assert!(check_timestamp("as_of", last).is_ok());
    }

    #[test]
    fn test_five_digit_year_rejected() {
        let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        let err = check_timestamp("as_of", far).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValOutOfRange);

        let negative = Utc.with_ymd_and_hms(-1, 6, 1, 0, 0, 0).unwrap();
        assert!(check_timestamp("as_of", negative).is_err());
    }
}
