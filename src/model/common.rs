use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A type that travels over the wire with a fixed `@type` discriminator.
pub trait DtoType {
    const TYPE_NAME: &'static str;
}

/// Zero-sized `@type` field. Serializes to `T::TYPE_NAME` and refuses any other
/// discriminator on the way back in.
pub struct TypeTag<T>(PhantomData<fn() -> T>);

impl<T> TypeTag<T> {
    pub const fn new() -> Self {
        TypeTag(PhantomData)
    }
}

impl<T> Default for TypeTag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypeTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypeTag<T> {}

impl<T> PartialEq for TypeTag<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T: DtoType> fmt::Debug for TypeTag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::TYPE_NAME)
    }
}

impl<T: DtoType> Serialize for TypeTag<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(T::TYPE_NAME)
    }
}

impl<'de, T: DtoType> Deserialize<'de> for TypeTag<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name == T::TYPE_NAME {
            Ok(TypeTag::new())
        } else {
            Err(de::Error::invalid_value(
                de::Unexpected::Str(&name),
                &T::TYPE_NAME,
            ))
        }
    }
}

/// One page of objects returned by a `search*` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct SearchResult<T> {
    #[serde(default)]
    pub objects: Vec<T>,
    #[serde(default)]
    pub total_count: usize,
}

impl<T> SearchResult<T> {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<T> Default for SearchResult<T> {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            total_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSetKind {
    Physical,
    Container,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complete {
    Yes,
    No,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchivingStatus {
    Available,
    Locked,
    Archived,
    ArchivePending,
    UnarchivePending,
    BackupPending,
}

impl fmt::Display for ArchivingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArchivingStatus::Available => write!(f, "AVAILABLE"),
            ArchivingStatus::Locked => write!(f, "LOCKED"),
            ArchivingStatus::Archived => write!(f, "ARCHIVED"),
            ArchivingStatus::ArchivePending => write!(f, "ARCHIVE_PENDING"),
            ArchivingStatus::UnarchivePending => write!(f, "UNARCHIVE_PENDING"),
            ArchivingStatus::BackupPending => write!(f, "BACKUP_PENDING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationExecutionState {
    New,
    Scheduled,
    Running,
    Finished,
    Failed,
}

/// Whether an execution, or its summary or details, can still be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationExecutionAvailability {
    Available,
    DeletePending,
    Deleted,
    TimeOutPending,
    TimedOut,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Widget;

    impl DtoType for Widget {
        const TYPE_NAME: &'static str = "as.dto.test.Widget";
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Tagged {
        #[serde(rename = "@type")]
        tag: TypeTag<Widget>,
        code: String,
    }

    #[test]
    fn test_type_tag_serializes_discriminator() {
        let tagged = Tagged {
            tag: TypeTag::new(),
            code: "X".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&tagged).unwrap(),
            json!({"@type": "as.dto.test.Widget", "code": "X"})
        );
    }

    #[test]
    fn test_type_tag_rejects_foreign_discriminator() {
        let json = json!({"@type": "as.dto.test.Other", "code": "X"});
        assert!(serde_json::from_value::<Tagged>(json).is_err());
    }

    #[test]
    fn test_search_result_defaults_missing_fields() {
        let result: SearchResult<String> = serde_json::from_value(json!({
            "@type": "as.dto.common.search.SearchResult"
        }))
        .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_count, 0);
    }

    #[derive(Debug, Deserialize)]
    struct Unlisted {
        code: String,
    }

    fn decode_page<T: de::DeserializeOwned>(value: serde_json::Value) -> SearchResult<T> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_search_result_of_type_without_default() {
        let result: SearchResult<Unlisted> = decode_page(json!({
            "@type": "as.dto.common.search.SearchResult",
            "objects": [{"code": "A"}, {"code": "B"}],
            "totalCount": 7
        }));
        assert_eq!(result.objects.len(), 2);
        assert_eq!(result.objects[1].code, "B");
        assert_eq!(result.total_count, 7);
    }
}
