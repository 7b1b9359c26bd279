//! Typed object identifiers. Every id is a small object carrying its own
//! `@type`, so a sample perm id and an experiment perm id never mix on the wire.

use crate::model::{DtoType, TypeTag};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_object_id {
    ($(#[$meta:meta])* $name:ident = $type_name:literal, $field:ident: $json:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(rename = "@type", default)]
            type_tag: TypeTag<$name>,
            #[serde(rename = $json)]
            pub $field: String,
        }

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self {
                    type_tag: TypeTag::new(),
                    $field: value.into(),
                }
            }
        }

        impl DtoType for $name {
            const TYPE_NAME: &'static str = $type_name;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.$field)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_object_id!(SpacePermId = "as.dto.space.id.SpacePermId", perm_id: "permId");
string_object_id!(ProjectPermId = "as.dto.project.id.ProjectPermId", perm_id: "permId");
string_object_id!(
    /// Identifier of the form `/SPACE/PROJECT`.
    ProjectIdentifier = "as.dto.project.id.ProjectIdentifier", identifier: "identifier"
);
string_object_id!(ExperimentPermId = "as.dto.experiment.id.ExperimentPermId", perm_id: "permId");
string_object_id!(
    /// Identifier of the form `/SPACE/PROJECT/EXPERIMENT`.
    ExperimentIdentifier = "as.dto.experiment.id.ExperimentIdentifier", identifier: "identifier"
);
string_object_id!(SamplePermId = "as.dto.sample.id.SamplePermId", perm_id: "permId");
string_object_id!(
    /// Identifier of the form `/SPACE/SAMPLE` or `/SPACE/CONTAINER:SAMPLE`.
    SampleIdentifier = "as.dto.sample.id.SampleIdentifier", identifier: "identifier"
);
string_object_id!(DataSetPermId = "as.dto.dataset.id.DataSetPermId", perm_id: "permId");
string_object_id!(PersonPermId = "as.dto.person.id.PersonPermId", perm_id: "permId");
string_object_id!(TagPermId = "as.dto.tag.id.TagPermId", perm_id: "permId");
string_object_id!(EntityTypePermId = "as.dto.entitytype.id.EntityTypePermId", perm_id: "permId");
string_object_id!(
    OperationExecutionPermId = "as.dto.operation.id.OperationExecutionPermId", perm_id: "permId"
);

/// Materials are identified by code and type code together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPermId {
    #[serde(rename = "@type", default)]
    type_tag: TypeTag<MaterialPermId>,
    pub code: String,
    pub type_code: String,
}

impl MaterialPermId {
    pub fn new(code: impl Into<String>, type_code: impl Into<String>) -> Self {
        Self {
            type_tag: TypeTag::new(),
            code: code.into(),
            type_code: type_code.into(),
        }
    }
}

impl DtoType for MaterialPermId {
    const TYPE_NAME: &'static str = "as.dto.material.id.MaterialPermId";
}

impl fmt::Display for MaterialPermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.type_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionTechId {
    #[serde(rename = "@type", default)]
    type_tag: TypeTag<DeletionTechId>,
    pub tech_id: i64,
}

impl DeletionTechId {
    pub fn new(tech_id: i64) -> Self {
        Self {
            type_tag: TypeTag::new(),
            tech_id,
        }
    }
}

impl DtoType for DeletionTechId {
    const TYPE_NAME: &'static str = "as.dto.deletion.id.DeletionTechId";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_perm_id_wire_shape() {
        let id = SamplePermId::new("20130412140147735-20");
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            json!({"@type": "as.dto.sample.id.SamplePermId", "permId": "20130412140147735-20"})
        );
        assert_eq!(id.to_string(), "20130412140147735-20");
    }

    #[test]
    fn test_identifier_from_server_json() {
        let id: ProjectIdentifier = serde_json::from_value(json!({
            "@type": "as.dto.project.id.ProjectIdentifier",
            "identifier": "/PLATONIC/SCREENING-EXAMPLES"
        }))
        .unwrap();
        assert_eq!(id.identifier, "/PLATONIC/SCREENING-EXAMPLES");
    }

    #[test]
    fn test_ids_of_different_entities_do_not_mix() {
        let json = json!({"@type": "as.dto.sample.id.SamplePermId", "permId": "X"});
        assert!(serde_json::from_value::<ExperimentPermId>(json).is_err());
    }

    #[test]
    fn test_material_perm_id() {
        let id = MaterialPermId::new("H2O", "COMPOUND");
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            json!({"@type": "as.dto.material.id.MaterialPermId", "code": "H2O", "typeCode": "COMPOUND"})
        );
        assert_eq!(id.to_string(), "H2O (COMPOUND)");
    }
}
