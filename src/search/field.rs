//! Field criteria: a field name, what kind of field it is and at most one
//! comparison value. Setting a comparison replaces the previous one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::search::date::{self, DateArg};
use crate::search::value::{DateComparison, DateFieldValue, NumberFieldValue, StringFieldValue, TimeZone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchFieldType {
    Attribute,
    Property,
    AnyField,
    AnyProperty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringFieldSearchCriteria {
    field_name: String,
    field_type: SearchFieldType,
    #[serde(default)]
    field_value: Option<StringFieldValue>,
}

impl StringFieldSearchCriteria {
    pub fn new(field_name: impl Into<String>, field_type: SearchFieldType) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
            field_value: None,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_type(&self) -> SearchFieldType {
        self.field_type
    }

    pub fn field_value(&self) -> Option<&StringFieldValue> {
        self.field_value.as_ref()
    }

    pub fn that_equals(&mut self, value: impl Into<String>) -> &mut Self {
        self.set(StringFieldValue::EqualTo { value: value.into() })
    }

    pub fn that_starts_with(&mut self, value: impl Into<String>) -> &mut Self {
        self.set(StringFieldValue::StartsWith { value: value.into() })
    }

    pub fn that_ends_with(&mut self, value: impl Into<String>) -> &mut Self {
        self.set(StringFieldValue::EndsWith { value: value.into() })
    }

    pub fn that_contains(&mut self, value: impl Into<String>) -> &mut Self {
        self.set(StringFieldValue::Contains { value: value.into() })
    }

    fn set(&mut self, value: StringFieldValue) -> &mut Self {
        self.field_value = Some(value);
        self
    }
}

impl fmt::Display for StringFieldSearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.field_value {
            Some(value) => write!(f, "{} {}", self.field_name, value),
            None => write!(f, "{} (any value)", self.field_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFieldSearchCriteria {
    field_name: String,
    field_type: SearchFieldType,
    #[serde(default)]
    field_value: Option<NumberFieldValue>,
}

impl NumberFieldSearchCriteria {
    pub fn new(field_name: impl Into<String>, field_type: SearchFieldType) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
            field_value: None,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_type(&self) -> SearchFieldType {
        self.field_type
    }

    pub fn field_value(&self) -> Option<&NumberFieldValue> {
        self.field_value.as_ref()
    }

    pub fn that_equals(&mut self, value: f64) -> &mut Self {
        self.set(NumberFieldValue::EqualTo { value })
    }

    pub fn that_is_greater_than(&mut self, value: f64) -> &mut Self {
        self.set(NumberFieldValue::GreaterThan { value })
    }

    pub fn that_is_greater_than_or_equal_to(&mut self, value: f64) -> &mut Self {
        self.set(NumberFieldValue::GreaterThanOrEqualTo { value })
    }

    pub fn that_is_less_than(&mut self, value: f64) -> &mut Self {
        self.set(NumberFieldValue::LessThan { value })
    }

    pub fn that_is_less_than_or_equal_to(&mut self, value: f64) -> &mut Self {
        self.set(NumberFieldValue::LessThanOrEqualTo { value })
    }

    fn set(&mut self, value: NumberFieldValue) -> &mut Self {
        self.field_value = Some(value);
        self
    }
}

impl fmt::Display for NumberFieldSearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.field_value {
            Some(value) => write!(f, "{} {}", self.field_name, value),
            None => write!(f, "{} (any value)", self.field_name),
        }
    }
}

/// Date field criterion. Text arguments are validated against
/// [`date::ACCEPTED_DATE_FORMATS`]; a rejected argument leaves the current
/// value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFieldSearchCriteria {
    field_name: String,
    field_type: SearchFieldType,
    #[serde(default)]
    field_value: Option<DateFieldValue>,
    #[serde(default)]
    time_zone: TimeZone,
}

impl DateFieldSearchCriteria {
    pub fn new(field_name: impl Into<String>, field_type: SearchFieldType) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
            field_value: None,
            time_zone: TimeZone::Server,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_type(&self) -> SearchFieldType {
        self.field_type
    }

    pub fn field_value(&self) -> Option<&DateFieldValue> {
        self.field_value.as_ref()
    }

    pub fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    pub fn that_equals(&mut self, date: impl Into<DateArg>) -> Result<&mut Self> {
        self.compare(DateComparison::EqualTo, date.into())
    }

    pub fn that_is_later_than(&mut self, date: impl Into<DateArg>) -> Result<&mut Self> {
        self.compare(DateComparison::LaterThan, date.into())
    }

    pub fn that_is_later_than_or_equal_to(&mut self, date: impl Into<DateArg>) -> Result<&mut Self> {
        self.compare(DateComparison::LaterThanOrEqualTo, date.into())
    }

    pub fn that_is_earlier_than(&mut self, date: impl Into<DateArg>) -> Result<&mut Self> {
        self.compare(DateComparison::EarlierThan, date.into())
    }

    pub fn that_is_earlier_than_or_equal_to(&mut self, date: impl Into<DateArg>) -> Result<&mut Self> {
        self.compare(DateComparison::EarlierThanOrEqualTo, date.into())
    }

    /// Interpret the date with a fixed offset from UTC, in hours.
    pub fn with_time_zone(&mut self, hour_offset: i32) -> &mut Self {
        self.time_zone = TimeZone::HourOffset { hour_offset };
        self
    }

    pub fn with_server_time_zone(&mut self) -> &mut Self {
        self.time_zone = TimeZone::Server;
        self
    }

    fn compare(&mut self, comparison: DateComparison, date: DateArg) -> Result<&mut Self> {
        let value = date::to_field_value(&self.field_name, comparison, date)?;
        self.field_value = Some(value);
        Ok(self)
    }
}

impl fmt::Display for DateFieldSearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.field_value {
            Some(value) => write!(f, "{} {}", self.field_name, value),
            None => write!(f, "{} (any value)", self.field_name),
        }
    }
}

/// Declares a concrete criterion kind as a transparent wrapper around one of
/// the field criteria above.
macro_rules! field_criteria {
    ($(#[$meta:meta])* $name:ident($core:ident) = $field_name:literal, $field_type:ident) => {
        field_criteria!(@wrapper $(#[$meta])* $name($core));

        impl $name {
            pub fn new() -> Self {
                $name($core::new($field_name, SearchFieldType::$field_type))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    ($(#[$meta:meta])* $name:ident($core:ident) = property) => {
        field_criteria!(@wrapper $(#[$meta])* $name($core));

        impl $name {
            pub fn new(property_name: impl Into<String>) -> Self {
                $name($core::new(property_name, SearchFieldType::Property))
            }
        }
    };
    (@wrapper $(#[$meta:meta])* $name:ident($core:ident)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($core);

        impl Deref for $name {
            type Target = $core;

            fn deref(&self) -> &$core {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut $core {
                &mut self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

field_criteria!(CodeSearchCriteria(StringFieldSearchCriteria) = "code", Attribute);
field_criteria!(PermIdSearchCriteria(StringFieldSearchCriteria) = "perm_id", Attribute);
field_criteria!(
    /// Matches the full identifier, e.g. `/SPACE/SAMPLE`.
    IdentifierSearchCriteria(StringFieldSearchCriteria) = "identifier", Attribute
);
field_criteria!(UserIdSearchCriteria(StringFieldSearchCriteria) = "userId", Attribute);
field_criteria!(FirstNameSearchCriteria(StringFieldSearchCriteria) = "firstName", Attribute);
field_criteria!(LastNameSearchCriteria(StringFieldSearchCriteria) = "lastName", Attribute);
field_criteria!(EmailSearchCriteria(StringFieldSearchCriteria) = "email", Attribute);
field_criteria!(ShareIdSearchCriteria(StringFieldSearchCriteria) = "share_id", Attribute);
field_criteria!(LocationSearchCriteria(StringFieldSearchCriteria) = "location", Attribute);
field_criteria!(
    /// Matches any property of the entity.
    AnyPropertySearchCriteria(StringFieldSearchCriteria) = "any", AnyProperty
);
field_criteria!(
    /// Matches any attribute or property of the entity.
    AnyFieldSearchCriteria(StringFieldSearchCriteria) = "any", AnyField
);
field_criteria!(StringPropertySearchCriteria(StringFieldSearchCriteria) = property);
field_criteria!(NumberPropertySearchCriteria(NumberFieldSearchCriteria) = property);
field_criteria!(DatePropertySearchCriteria(DateFieldSearchCriteria) = property);
field_criteria!(RegistrationDateSearchCriteria(DateFieldSearchCriteria) = "registration_date", Attribute);
field_criteria!(ModificationDateSearchCriteria(DateFieldSearchCriteria) = "modification_date", Attribute);

/// Full text criterion of a global search. Only substring matching applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalSearchTextCriteria(StringFieldSearchCriteria);

impl GlobalSearchTextCriteria {
    pub fn new() -> Self {
        GlobalSearchTextCriteria(StringFieldSearchCriteria::new("anything", SearchFieldType::AnyField))
    }

    pub fn field_value(&self) -> Option<&StringFieldValue> {
        self.0.field_value()
    }

    pub fn that_contains(&mut self, text: impl Into<String>) -> &mut Self {
        self.0.that_contains(text);
        self
    }

    /// Matches the whole phrase rather than any of its words.
    pub fn that_contains_exactly(&mut self, text: impl Into<String>) -> &mut Self {
        self.0.set(StringFieldValue::ContainsExactly { value: text.into() });
        self
    }
}

impl Default for GlobalSearchTextCriteria {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GlobalSearchTextCriteria {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
