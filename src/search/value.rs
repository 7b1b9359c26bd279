//! Leaf comparison values. Each variant is a distinct `@type` on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum StringFieldValue {
    #[serde(rename = "as.dto.common.search.StringEqualToValue")]
    EqualTo { value: String },
    #[serde(rename = "as.dto.common.search.StringStartsWithValue")]
    StartsWith { value: String },
    #[serde(rename = "as.dto.common.search.StringEndsWithValue")]
    EndsWith { value: String },
    #[serde(rename = "as.dto.common.search.StringContainsValue")]
    Contains { value: String },
    #[serde(rename = "as.dto.common.search.StringContainsExactlyValue")]
    ContainsExactly { value: String },
}

impl StringFieldValue {
    pub fn value(&self) -> &str {
        match self {
            StringFieldValue::EqualTo { value }
            | StringFieldValue::StartsWith { value }
            | StringFieldValue::EndsWith { value }
            | StringFieldValue::Contains { value }
            | StringFieldValue::ContainsExactly { value } => value,
        }
    }
}

impl fmt::Display for StringFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StringFieldValue::EqualTo { value } => write!(f, "= '{}'", value),
            StringFieldValue::StartsWith { value } => write!(f, "starts with '{}'", value),
            StringFieldValue::EndsWith { value } => write!(f, "ends with '{}'", value),
            StringFieldValue::Contains { value } => write!(f, "contains '{}'", value),
            StringFieldValue::ContainsExactly { value } => {
                write!(f, "contains exactly '{}'", value)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum NumberFieldValue {
    #[serde(rename = "as.dto.common.search.NumberEqualToValue")]
    EqualTo { value: f64 },
    #[serde(rename = "as.dto.common.search.NumberGreaterThanValue")]
    GreaterThan { value: f64 },
    #[serde(rename = "as.dto.common.search.NumberGreaterThanOrEqualToValue")]
    GreaterThanOrEqualTo { value: f64 },
    #[serde(rename = "as.dto.common.search.NumberLessThanValue")]
    LessThan { value: f64 },
    #[serde(rename = "as.dto.common.search.NumberLessThanOrEqualToValue")]
    LessThanOrEqualTo { value: f64 },
}

impl NumberFieldValue {
    pub fn value(&self) -> f64 {
        match *self {
            NumberFieldValue::EqualTo { value }
            | NumberFieldValue::GreaterThan { value }
            | NumberFieldValue::GreaterThanOrEqualTo { value }
            | NumberFieldValue::LessThan { value }
            | NumberFieldValue::LessThanOrEqualTo { value } => value,
        }
    }
}

impl fmt::Display for NumberFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = match self {
            NumberFieldValue::EqualTo { .. } => "=",
            NumberFieldValue::GreaterThan { .. } => ">",
            NumberFieldValue::GreaterThanOrEqualTo { .. } => ">=",
            NumberFieldValue::LessThan { .. } => "<",
            NumberFieldValue::LessThanOrEqualTo { .. } => "<=",
        };
        write!(f, "{} {}", op, self.value())
    }
}

/// The relational comparison a date criterion performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComparison {
    EqualTo,
    LaterThan,
    LaterThanOrEqualTo,
    EarlierThan,
    EarlierThanOrEqualTo,
}

impl fmt::Display for DateComparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DateComparison::EqualTo => write!(f, "equal to"),
            DateComparison::LaterThan => write!(f, "later than"),
            DateComparison::LaterThanOrEqualTo => write!(f, "later than or equal to"),
            DateComparison::EarlierThan => write!(f, "earlier than"),
            DateComparison::EarlierThanOrEqualTo => write!(f, "earlier than or equal to"),
        }
    }
}

/// A date comparison value.
///
/// Text variants carry the caller's string verbatim. The `Object*` variants
/// carry an instant and go over the wire as epoch milliseconds under their
/// own `DateObject...` discriminators, so the server can tell the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum DateFieldValue {
    #[serde(rename = "as.dto.common.search.DateEqualToValue")]
    EqualTo { value: String },
    #[serde(rename = "as.dto.common.search.DateLaterThanValue")]
    LaterThan { value: String },
    #[serde(rename = "as.dto.common.search.DateLaterThanOrEqualToValue")]
    LaterThanOrEqualTo { value: String },
    #[serde(rename = "as.dto.common.search.DateEarlierThanValue")]
    EarlierThan { value: String },
    #[serde(rename = "as.dto.common.search.DateEarlierThanOrEqualToValue")]
    EarlierThanOrEqualTo { value: String },

    #[serde(rename = "as.dto.common.search.DateObjectEqualToValue")]
    ObjectEqualTo {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        value: DateTime<Utc>,
    },
    #[serde(rename = "as.dto.common.search.DateObjectLaterThanValue")]
    ObjectLaterThan {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        value: DateTime<Utc>,
    },
    #[serde(rename = "as.dto.common.search.DateObjectLaterThanOrEqualToValue")]
    ObjectLaterThanOrEqualTo {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        value: DateTime<Utc>,
    },
    #[serde(rename = "as.dto.common.search.DateObjectEarlierThanValue")]
    ObjectEarlierThan {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        value: DateTime<Utc>,
    },
    #[serde(rename = "as.dto.common.search.DateObjectEarlierThanOrEqualToValue")]
    ObjectEarlierThanOrEqualTo {
        #[serde(with = "chrono::serde::ts_milliseconds")]
        value: DateTime<Utc>,
    },
}

impl DateFieldValue {
    pub fn text(comparison: DateComparison, value: String) -> Self {
        match comparison {
            DateComparison::EqualTo => DateFieldValue::EqualTo { value },
            DateComparison::LaterThan => DateFieldValue::LaterThan { value },
            DateComparison::LaterThanOrEqualTo => DateFieldValue::LaterThanOrEqualTo { value },
            DateComparison::EarlierThan => DateFieldValue::EarlierThan { value },
            DateComparison::EarlierThanOrEqualTo => DateFieldValue::EarlierThanOrEqualTo { value },
        }
    }

    pub fn object(comparison: DateComparison, value: DateTime<Utc>) -> Self {
        match comparison {
            DateComparison::EqualTo => DateFieldValue::ObjectEqualTo { value },
            DateComparison::LaterThan => DateFieldValue::ObjectLaterThan { value },
            DateComparison::LaterThanOrEqualTo => {
                DateFieldValue::ObjectLaterThanOrEqualTo { value }
            }
            DateComparison::EarlierThan => DateFieldValue::ObjectEarlierThan { value },
            DateComparison::EarlierThanOrEqualTo => {
                DateFieldValue::ObjectEarlierThanOrEqualTo { value }
            }
        }
    }

    pub fn comparison(&self) -> DateComparison {
        match self {
            DateFieldValue::EqualTo { .. } | DateFieldValue::ObjectEqualTo { .. } => {
                DateComparison::EqualTo
            }
            DateFieldValue::LaterThan { .. } | DateFieldValue::ObjectLaterThan { .. } => {
                DateComparison::LaterThan
            }
            DateFieldValue::LaterThanOrEqualTo { .. }
            | DateFieldValue::ObjectLaterThanOrEqualTo { .. } => {
                DateComparison::LaterThanOrEqualTo
            }
            DateFieldValue::EarlierThan { .. } | DateFieldValue::ObjectEarlierThan { .. } => {
                DateComparison::EarlierThan
            }
            DateFieldValue::EarlierThanOrEqualTo { .. }
            | DateFieldValue::ObjectEarlierThanOrEqualTo { .. } => {
                DateComparison::EarlierThanOrEqualTo
            }
        }
    }

    /// The verbatim text for text variants, `None` for object variants.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DateFieldValue::EqualTo { value }
            | DateFieldValue::LaterThan { value }
            | DateFieldValue::LaterThanOrEqualTo { value }
            | DateFieldValue::EarlierThan { value }
            | DateFieldValue::EarlierThanOrEqualTo { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match *self {
            DateFieldValue::ObjectEqualTo { value }
            | DateFieldValue::ObjectLaterThan { value }
            | DateFieldValue::ObjectLaterThanOrEqualTo { value }
            | DateFieldValue::ObjectEarlierThan { value }
            | DateFieldValue::ObjectEarlierThanOrEqualTo { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        self.as_instant().is_some()
    }
}

impl fmt::Display for DateFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.as_text(), self.as_instant()) {
            (Some(text), _) => write!(f, "{} '{}'", self.comparison(), text),
            (None, Some(instant)) => write!(f, "{} {}", self.comparison(), instant.to_rfc3339()),
            (None, None) => write!(f, "{}", self.comparison()),
        }
    }
}

/// How the server should interpret a date criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum TimeZone {
    /// Let the server use its own local zone.
    #[default]
    #[serde(rename = "as.dto.common.search.ServerTimeZone")]
    Server,
    #[serde(rename = "as.dto.common.search.TimeZone")]
    HourOffset {
        #[serde(rename = "hourOffset")]
        hour_offset: i32,
    },
}
