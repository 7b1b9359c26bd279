use serde::{Deserialize, Serialize};

use crate::model::{DtoType, TypeTag};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOrder {
    #[serde(rename = "@type", default)]
    type_tag: TypeTag<SortOrder>,
    asc: bool,
}

impl DtoType for SortOrder {
    const TYPE_NAME: &'static str = "as.dto.common.fetchoptions.SortOrder";
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            type_tag: TypeTag::new(),
            asc: true,
        }
    }
}

impl SortOrder {
    pub fn asc(&mut self) -> &mut Self {
        self.asc = true;
        self
    }

    pub fn desc(&mut self) -> &mut Self {
        self.asc = false;
        self
    }

    pub fn is_ascending(&self) -> bool {
        self.asc
    }
}

/// One sort key of a result collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sorting {
    #[serde(rename = "@type", default)]
    type_tag: TypeTag<Sorting>,
    field: String,
    #[serde(default)]
    order: SortOrder,
}

impl DtoType for Sorting {
    const TYPE_NAME: &'static str = "as.dto.common.fetchoptions.Sorting";
}

impl Sorting {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn order(&self) -> &SortOrder {
        &self.order
    }
}

/// Returns the order of `field`, appending a new ascending key if the field
/// is not sorted on yet. Keys keep the order they were first requested in.
fn sort_order_for(sortings: &mut Vec<Sorting>, field: String) -> &mut SortOrder {
    let index = match sortings.iter().position(|sorting| sorting.field == field) {
        Some(index) => index,
        None => {
            sortings.push(Sorting {
                type_tag: TypeTag::new(),
                field,
                order: SortOrder::default(),
            });
            sortings.len() - 1
        }
    };
    &mut sortings[index].order
}

const PROPERTY_PREFIX: &str = "PROPERTY";

macro_rules! sort_options {
    ($($name:ident = $type_name:literal { $($method:ident => $field:literal,)* })*) => {
        $(
            #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
            pub struct $name {
                #[serde(rename = "@type", default)]
                type_tag: TypeTag<$name>,
                #[serde(default)]
                sortings: Vec<Sorting>,
            }

            impl DtoType for $name {
                const TYPE_NAME: &'static str = $type_name;
            }

            impl $name {
                pub fn sortings(&self) -> &[Sorting] {
                    &self.sortings
                }

                $(
                    pub fn $method(&mut self) -> &mut SortOrder {
                        sort_order_for(&mut self.sortings, $field.to_string())
                    }
                )*
            }
        )*
    };
}

sort_options! {
    SampleSortOptions = "as.dto.sample.fetchoptions.SampleSortOptions" {
        code => "CODE",
        perm_id => "PERM_ID",
        identifier => "IDENTIFIER",
        registration_date => "REGISTRATION_DATE",
        modification_date => "MODIFICATION_DATE",
        type_ => "TYPE",
    }
    ExperimentSortOptions = "as.dto.experiment.fetchoptions.ExperimentSortOptions" {
        code => "CODE",
        perm_id => "PERM_ID",
        identifier => "IDENTIFIER",
        registration_date => "REGISTRATION_DATE",
        modification_date => "MODIFICATION_DATE",
        type_ => "TYPE",
    }
    DataSetSortOptions = "as.dto.dataset.fetchoptions.DataSetSortOptions" {
        code => "CODE",
        perm_id => "PERM_ID",
        registration_date => "REGISTRATION_DATE",
        modification_date => "MODIFICATION_DATE",
        type_ => "TYPE",
    }
    MaterialSortOptions = "as.dto.material.fetchoptions.MaterialSortOptions" {
        code => "CODE",
        perm_id => "PERM_ID",
        registration_date => "REGISTRATION_DATE",
        modification_date => "MODIFICATION_DATE",
        type_ => "TYPE",
    }
    ProjectSortOptions = "as.dto.project.fetchoptions.ProjectSortOptions" {
        code => "CODE",
        perm_id => "PERM_ID",
        identifier => "IDENTIFIER",
        registration_date => "REGISTRATION_DATE",
        modification_date => "MODIFICATION_DATE",
    }
    SpaceSortOptions = "as.dto.space.fetchoptions.SpaceSortOptions" {
        code => "CODE",
        perm_id => "PERM_ID",
        registration_date => "REGISTRATION_DATE",
        modification_date => "MODIFICATION_DATE",
    }
    PersonSortOptions = "as.dto.person.fetchoptions.PersonSortOptions" {
        user_id => "USER_ID",
        registration_date => "REGISTRATION_DATE",
    }
    TagSortOptions = "as.dto.tag.fetchoptions.TagSortOptions" {
        code => "CODE",
        perm_id => "PERM_ID",
        registration_date => "REGISTRATION_DATE",
    }
    VocabularyTermSortOptions = "as.dto.vocabulary.fetchoptions.VocabularyTermSortOptions" {
        code => "CODE",
        ordinal => "ORDINAL",
        registration_date => "REGISTRATION_DATE",
        modification_date => "MODIFICATION_DATE",
    }
    EntityTypeSortOptions = "as.dto.entitytype.fetchoptions.EntityTypeSortOptions" {
        code => "CODE",
        modification_date => "MODIFICATION_DATE",
    }
}

macro_rules! property_sort {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// Sort on the value of property `name`.
                pub fn property(&mut self, name: &str) -> &mut SortOrder {
                    sort_order_for(&mut self.sortings, format!("{}{}", PROPERTY_PREFIX, name))
                }
            }
        )*
    };
}

property_sort!(SampleSortOptions, ExperimentSortOptions, DataSetSortOptions, MaterialSortOptions);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_wire_shape() {
        let mut sort = SampleSortOptions::default();
        sort.code().desc();
        assert_eq!(
            serde_json::to_value(&sort).unwrap(),
            json!({
                "@type": "as.dto.sample.fetchoptions.SampleSortOptions",
                "sortings": [{
                    "@type": "as.dto.common.fetchoptions.Sorting",
                    "field": "CODE",
                    "order": {"@type": "as.dto.common.fetchoptions.SortOrder", "asc": false}
                }]
            })
        );
    }

    #[test]
    fn test_same_field_reuses_its_key() {
        let mut sort = ExperimentSortOptions::default();
        sort.registration_date().desc();
        sort.property("NAME");
        sort.registration_date().asc();

        let fields: Vec<&str> = sort.sortings().iter().map(|s| s.field()).collect();
        assert_eq!(fields, vec!["REGISTRATION_DATE", "PROPERTYNAME"]);
        assert!(sort.sortings()[0].order().is_ascending());
    }

    #[test]
    fn test_new_key_defaults_to_ascending() {
        let mut sort = VocabularyTermSortOptions::default();
        assert!(sort.ordinal().is_ascending());
    }
}
