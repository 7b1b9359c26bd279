use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::trace;

use crate::error::{Error, Result};
use crate::search::value::{DateComparison, DateFieldValue};

/// Textual date formats a date criterion accepts, tried in this order.
pub const ACCEPTED_DATE_FORMATS: [&str; 3] = ["YYYY-MM-DD", "YYYY-MM-DD HH:mm", "YYYY-MM-DD HH:mm:ss"];

const SHORT_FORMAT: &str = "%Y-%m-%d";
const NORMAL_FORMAT: &str = "%Y-%m-%d %H:%M";
const LONG_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Argument of a date comparison: either text to validate or an instant.
#[derive(Debug, Clone, PartialEq)]
pub enum DateArg {
    Text(String),
    Object(DateTime<Utc>),
}

impl From<&str> for DateArg {
    fn from(value: &str) -> Self {
        DateArg::Text(value.to_string())
    }
}

impl From<String> for DateArg {
    fn from(value: String) -> Self {
        DateArg::Text(value)
    }
}

impl From<DateTime<Utc>> for DateArg {
    fn from(value: DateTime<Utc>) -> Self {
        DateArg::Object(value)
    }
}

/// Layout of each accepted format: `0` stands for one ASCII digit, any other
/// character must appear literally.
const SHORT_SHAPE: &str = "0000-00-00";
const NORMAL_SHAPE: &str = "0000-00-00 00:00";
const LONG_SHAPE: &str = "0000-00-00 00:00:00";

fn has_shape(text: &str, shape: &str) -> bool {
    text.len() == shape.len()
        && text.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'0' => c.is_ascii_digit(),
            _ => c == s,
        })
}

/// Returns the first accepted format `text` parses under, if any.
///
/// Parsing is strict: the text must have the exact layout of the format,
/// digit for digit, and every component must be in range.
pub fn matching_format(text: &str) -> Option<&'static str> {
    if has_shape(text, SHORT_SHAPE) && NaiveDate::parse_from_str(text, SHORT_FORMAT).is_ok() {
        return Some(ACCEPTED_DATE_FORMATS[0]);
    }
    if has_shape(text, NORMAL_SHAPE) && NaiveDateTime::parse_from_str(text, NORMAL_FORMAT).is_ok() {
        return Some(ACCEPTED_DATE_FORMATS[1]);
    }
    if has_shape(text, LONG_SHAPE) && NaiveDateTime::parse_from_str(text, LONG_FORMAT).is_ok() {
        return Some(ACCEPTED_DATE_FORMATS[2]);
    }
    None
}

/// Turns a date argument into the value a criterion stores.
///
/// Instants are wrapped without validation. Text must match one of
/// [`ACCEPTED_DATE_FORMATS`] and is kept exactly as given.
pub fn to_field_value(field: &str, comparison: DateComparison, arg: DateArg) -> Result<DateFieldValue> {
    match arg {
        DateArg::Object(instant) => Ok(DateFieldValue::object(comparison, instant)),
        DateArg::Text(text) => match matching_format(&text) {
            Some(format) => {
                trace!("{} {} '{}' matched date format {}", field, comparison, text, format);
                Ok(DateFieldValue::text(comparison, text))
            }
            None => Err(Error::InvalidDateFormat {
                field: field.to_string(),
                operation: comparison.to_string(),
                value: text,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formats_match_in_order() {
        assert_eq!(matching_format("2024-03-01"), Some("YYYY-MM-DD"));
        assert_eq!(matching_format("2024-03-01 14:05"), Some("YYYY-MM-DD HH:mm"));
        assert_eq!(matching_format("2024-03-01 14:05:59"), Some("YYYY-MM-DD HH:mm:ss"));
    }

    #[test]
    fn test_rejects_text_outside_accepted_formats() {
        for text in ["abc", "", "01.03.2024", "2024-13-01", "2024-03-01T14:05", "2024-03-01 25:00"] {
            assert_eq!(matching_format(text), None, "{text} should be rejected");
        }
    }

    #[test]
    fn test_rejects_padding_and_signs() {
        for text in [
            " 2024-03-01",
            "2024-03-01 ",
            "2024- 3-01",
            "2024-3-1",
            "+2024-03-01",
            "-2024-03-01",
            "2024-03-01  14:05",
            "2024-03-01 14:5",
            "2024-03-01 14:05:5",
            "２０２４-03-01",
        ] {
            assert_eq!(matching_format(text), None, "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_text_is_stored_verbatim() {
        let value = to_field_value("registration_date", DateComparison::LaterThan, "2024-03-01 14:05".into())
            .unwrap();
        assert_eq!(
            value,
            DateFieldValue::LaterThan {
                value: "2024-03-01 14:05".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_text_names_field_operation_and_value() {
        let err = to_field_value("modification_date", DateComparison::EarlierThanOrEqualTo, "abc".into())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "modification_date earlier than or equal to 'abc': date is not in any of the \
             accepted formats: YYYY-MM-DD, YYYY-MM-DD HH:mm, YYYY-MM-DD HH:mm:ss"
        );
    }

    #[test]
    fn test_instant_skips_validation() {
        let instant = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let value = to_field_value("registration_date", DateComparison::EqualTo, instant.into()).unwrap();
        assert_eq!(value, DateFieldValue::ObjectEqualTo { value: instant });
    }
}
