//! Entity search criteria. Each is a composite whose builder methods append a
//! child of the right kind and hand it back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::search::composite::{CompositeSearchCriteria, Criterion, SearchCriteria};
use crate::search::field::*;

macro_rules! entity_criteria {
    ($(#[$meta:meta])* $name:ident, relation: $relation:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default)]
            relation: $relation,
            #[serde(flatten)]
            composite: CompositeSearchCriteria,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn with_relation(relation: $relation) -> Self {
                Self {
                    relation,
                    composite: CompositeSearchCriteria::new(),
                }
            }

            /// Role this criterion plays relative to the entity being searched.
            pub fn relation(&self) -> $relation {
                self.relation
            }

            pub(crate) fn set_relation(&mut self, relation: $relation) {
                self.relation = relation;
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} {}", self.relation, self.composite)
            }
        }

        entity_criteria!(@common $name);
    };
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(flatten)]
            composite: CompositeSearchCriteria,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{} {}", $label, self.composite)
            }
        }

        entity_criteria!(@common $name);
    };
    (@common $name:ident) => {
        impl $name {
            pub fn with_or_operator(&mut self) -> &mut Self {
                self.composite.with_or_operator();
                self
            }

            pub fn with_and_operator(&mut self) -> &mut Self {
                self.composite.with_and_operator();
                self
            }
        }

        impl Deref for $name {
            type Target = CompositeSearchCriteria;

            fn deref(&self) -> &CompositeSearchCriteria {
                &self.composite
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut CompositeSearchCriteria {
                &mut self.composite
            }
        }
    };
}

/// Builder methods that append a freshly constructed child.
macro_rules! shortcuts {
    ($($method:ident -> $kind:ident,)*) => {
        $(
            pub fn $method(&mut self) -> &mut $kind {
                self.add_criteria($kind::new())
            }
        )*
    };
}

macro_rules! property_shortcuts {
    () => {
        pub fn with_property(&mut self, name: impl Into<String>) -> &mut StringPropertySearchCriteria {
            self.add_criteria(StringPropertySearchCriteria::new(name))
        }

        pub fn with_number_property(&mut self, name: impl Into<String>) -> &mut NumberPropertySearchCriteria {
            self.add_criteria(NumberPropertySearchCriteria::new(name))
        }

        pub fn with_date_property(&mut self, name: impl Into<String>) -> &mut DatePropertySearchCriteria {
            self.add_criteria(DatePropertySearchCriteria::new(name))
        }

        shortcuts! {
            with_any_property -> AnyPropertySearchCriteria,
            with_any_field -> AnyFieldSearchCriteria,
        }
    };
}

macro_rules! person_shortcuts {
    () => {
        pub fn with_registrator(&mut self) -> &mut PersonSearchCriteria {
            self.add_criteria(PersonSearchCriteria::with_relation(PersonSearchRelation::Registrator))
        }

        pub fn with_modifier(&mut self) -> &mut PersonSearchCriteria {
            self.add_criteria(PersonSearchCriteria::with_relation(PersonSearchRelation::Modifier))
        }
    };
}

/// Declares criteria for an absent relation. They carry no fields of their own.
macro_rules! absence_criteria {
    ($($name:ident = $label:literal,)*) => {
        $(
            #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
            pub struct $name {}

            impl $name {
                pub fn new() -> Self {
                    $name {}
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str($label)
                }
            }
        )*
    };
}

absence_criteria! {
    NoExperimentSearchCriteria = "no experiment",
    NoSampleSearchCriteria = "no sample",
    NoSampleContainerSearchCriteria = "no container",
    NoProjectSearchCriteria = "no project",
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleSearchRelation {
    #[default]
    Sample,
    Parents,
    Children,
    Container,
}

impl fmt::Display for SampleSearchRelation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SampleSearchRelation::Sample => write!(f, "sample"),
            SampleSearchRelation::Parents => write!(f, "parents"),
            SampleSearchRelation::Children => write!(f, "children"),
            SampleSearchRelation::Container => write!(f, "container"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DataSetSearchRelation {
    #[default]
    #[serde(rename = "DATASET")]
    DataSet,
    #[serde(rename = "PARENTS")]
    Parents,
    #[serde(rename = "CHILDREN")]
    Children,
    #[serde(rename = "CONTAINER")]
    Container,
}

impl fmt::Display for DataSetSearchRelation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataSetSearchRelation::DataSet => write!(f, "data set"),
            DataSetSearchRelation::Parents => write!(f, "parents"),
            DataSetSearchRelation::Children => write!(f, "children"),
            DataSetSearchRelation::Container => write!(f, "container"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonSearchRelation {
    #[default]
    Person,
    Registrator,
    Modifier,
}

impl fmt::Display for PersonSearchRelation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PersonSearchRelation::Person => write!(f, "person"),
            PersonSearchRelation::Registrator => write!(f, "registrator"),
            PersonSearchRelation::Modifier => write!(f, "modifier"),
        }
    }
}

entity_criteria!(SpaceSearchCriteria, "space");

impl SpaceSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
    }
}

entity_criteria!(ProjectSearchCriteria, "project");

impl ProjectSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
        with_identifier -> IdentifierSearchCriteria,
        with_space -> SpaceSearchCriteria,
        with_registration_date -> RegistrationDateSearchCriteria,
        with_modification_date -> ModificationDateSearchCriteria,
    }
}

entity_criteria!(ExperimentSearchCriteria, "experiment");

impl ExperimentSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
        with_identifier -> IdentifierSearchCriteria,
        with_type -> ExperimentTypeSearchCriteria,
        with_project -> ProjectSearchCriteria,
        with_tag -> TagSearchCriteria,
        with_registration_date -> RegistrationDateSearchCriteria,
        with_modification_date -> ModificationDateSearchCriteria,
    }
    property_shortcuts!();
    person_shortcuts!();

    /// Nested experiment predicate, typically combined with a different operator.
    pub fn with_sub_criteria(&mut self) -> &mut ExperimentSearchCriteria {
        self.add_criteria(ExperimentSearchCriteria::new())
    }
}

entity_criteria!(
    /// Sample criteria. The same builder surface serves the sample itself and
    /// its parents, children and container; only the relation differs.
    SampleSearchCriteria, relation: SampleSearchRelation
);

impl SampleSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
        with_identifier -> IdentifierSearchCriteria,
        with_type -> SampleTypeSearchCriteria,
        with_space -> SpaceSearchCriteria,
        with_project -> ProjectSearchCriteria,
        without_project -> NoProjectSearchCriteria,
        with_experiment -> ExperimentSearchCriteria,
        without_experiment -> NoExperimentSearchCriteria,
        without_container -> NoSampleContainerSearchCriteria,
        with_tag -> TagSearchCriteria,
        with_registration_date -> RegistrationDateSearchCriteria,
        with_modification_date -> ModificationDateSearchCriteria,
    }
    property_shortcuts!();
    person_shortcuts!();

    pub fn with_parents(&mut self) -> &mut SampleSearchCriteria {
        self.add_criteria(SampleSearchCriteria::with_relation(SampleSearchRelation::Parents))
    }

    pub fn with_children(&mut self) -> &mut SampleSearchCriteria {
        self.add_criteria(SampleSearchCriteria::with_relation(SampleSearchRelation::Children))
    }

    pub fn with_container(&mut self) -> &mut SampleSearchCriteria {
        self.add_criteria(SampleSearchCriteria::with_relation(SampleSearchRelation::Container))
    }

    pub fn with_sub_criteria(&mut self) -> &mut SampleSearchCriteria {
        self.add_criteria(SampleSearchCriteria::new())
    }
}

impl From<SampleSearchCriteria> for SearchCriteria {
    fn from(criteria: SampleSearchCriteria) -> Self {
        match criteria.relation {
            SampleSearchRelation::Sample => SearchCriteria::Sample(criteria),
            SampleSearchRelation::Parents => SearchCriteria::SampleParents(criteria),
            SampleSearchRelation::Children => SearchCriteria::SampleChildren(criteria),
            SampleSearchRelation::Container => SearchCriteria::SampleContainer(criteria),
        }
    }
}

impl Criterion for SampleSearchCriteria {
    fn downcast_mut(node: &mut SearchCriteria) -> Option<&mut Self> {
        match node {
            SearchCriteria::Sample(criteria)
            | SearchCriteria::SampleParents(criteria)
            | SearchCriteria::SampleChildren(criteria)
            | SearchCriteria::SampleContainer(criteria) => Some(criteria),
            _ => None,
        }
    }
}

entity_criteria!(
    /// Data set criteria, with the same relation scheme as samples.
    DataSetSearchCriteria, relation: DataSetSearchRelation
);

impl DataSetSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
        with_type -> DataSetTypeSearchCriteria,
        with_experiment -> ExperimentSearchCriteria,
        without_experiment -> NoExperimentSearchCriteria,
        without_sample -> NoSampleSearchCriteria,
        with_physical_data -> PhysicalDataSearchCriteria,
        with_tag -> TagSearchCriteria,
        with_registration_date -> RegistrationDateSearchCriteria,
        with_modification_date -> ModificationDateSearchCriteria,
    }
    property_shortcuts!();
    person_shortcuts!();

    pub fn with_sample(&mut self) -> &mut SampleSearchCriteria {
        self.add_criteria(SampleSearchCriteria::new())
    }

    pub fn with_parents(&mut self) -> &mut DataSetSearchCriteria {
        self.add_criteria(DataSetSearchCriteria::with_relation(DataSetSearchRelation::Parents))
    }

    pub fn with_children(&mut self) -> &mut DataSetSearchCriteria {
        self.add_criteria(DataSetSearchCriteria::with_relation(DataSetSearchRelation::Children))
    }

    pub fn with_container(&mut self) -> &mut DataSetSearchCriteria {
        self.add_criteria(DataSetSearchCriteria::with_relation(DataSetSearchRelation::Container))
    }

    pub fn with_sub_criteria(&mut self) -> &mut DataSetSearchCriteria {
        self.add_criteria(DataSetSearchCriteria::new())
    }
}

impl From<DataSetSearchCriteria> for SearchCriteria {
    fn from(criteria: DataSetSearchCriteria) -> Self {
        match criteria.relation {
            DataSetSearchRelation::DataSet => SearchCriteria::DataSet(criteria),
            DataSetSearchRelation::Parents => SearchCriteria::DataSetParents(criteria),
            DataSetSearchRelation::Children => SearchCriteria::DataSetChildren(criteria),
            DataSetSearchRelation::Container => SearchCriteria::DataSetContainer(criteria),
        }
    }
}

impl Criterion for DataSetSearchCriteria {
    fn downcast_mut(node: &mut SearchCriteria) -> Option<&mut Self> {
        match node {
            SearchCriteria::DataSet(criteria)
            | SearchCriteria::DataSetParents(criteria)
            | SearchCriteria::DataSetChildren(criteria)
            | SearchCriteria::DataSetContainer(criteria) => Some(criteria),
            _ => None,
        }
    }
}

entity_criteria!(
    /// Constraints on the physical storage of a data set.
    PhysicalDataSearchCriteria, "physical data"
);

impl PhysicalDataSearchCriteria {
    shortcuts! {
        with_share_id -> ShareIdSearchCriteria,
        with_location -> LocationSearchCriteria,
        with_storage_format -> StorageFormatSearchCriteria,
        with_file_format_type -> FileFormatTypeSearchCriteria,
        with_locator_type -> LocatorTypeSearchCriteria,
    }
}

entity_criteria!(StorageFormatSearchCriteria, "storage format");
entity_criteria!(FileFormatTypeSearchCriteria, "file format type");
entity_criteria!(LocatorTypeSearchCriteria, "locator type");

impl StorageFormatSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
    }
}

impl FileFormatTypeSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
    }
}

impl LocatorTypeSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
    }
}

entity_criteria!(MaterialSearchCriteria, "material");

impl MaterialSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
        with_type -> MaterialTypeSearchCriteria,
        with_tag -> TagSearchCriteria,
        with_registration_date -> RegistrationDateSearchCriteria,
        with_modification_date -> ModificationDateSearchCriteria,
    }
    property_shortcuts!();
}

entity_criteria!(TagSearchCriteria, "tag");

impl TagSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
    }
}

entity_criteria!(
    /// Person criteria, also used for the registrator and modifier of other entities.
    PersonSearchCriteria, relation: PersonSearchRelation
);

impl PersonSearchCriteria {
    shortcuts! {
        with_user_id -> UserIdSearchCriteria,
        with_first_name -> FirstNameSearchCriteria,
        with_last_name -> LastNameSearchCriteria,
        with_email -> EmailSearchCriteria,
    }
}

impl From<PersonSearchCriteria> for SearchCriteria {
    fn from(criteria: PersonSearchCriteria) -> Self {
        match criteria.relation {
            PersonSearchRelation::Person => SearchCriteria::Person(criteria),
            PersonSearchRelation::Registrator => SearchCriteria::Registrator(criteria),
            PersonSearchRelation::Modifier => SearchCriteria::Modifier(criteria),
        }
    }
}

impl Criterion for PersonSearchCriteria {
    fn downcast_mut(node: &mut SearchCriteria) -> Option<&mut Self> {
        match node {
            SearchCriteria::Person(criteria)
            | SearchCriteria::Registrator(criteria)
            | SearchCriteria::Modifier(criteria) => Some(criteria),
            _ => None,
        }
    }
}

entity_criteria!(SampleTypeSearchCriteria, "sample type");
entity_criteria!(ExperimentTypeSearchCriteria, "experiment type");
entity_criteria!(DataSetTypeSearchCriteria, "data set type");
entity_criteria!(MaterialTypeSearchCriteria, "material type");

impl SampleTypeSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
    }
}

impl ExperimentTypeSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
    }
}

impl DataSetTypeSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
    }
}

impl MaterialTypeSearchCriteria {
    shortcuts! {
        with_code -> CodeSearchCriteria,
        with_perm_id -> PermIdSearchCriteria,
    }
}

entity_criteria!(
    /// Full text search across all entity kinds.
    GlobalSearchCriteria, "global"
);

impl GlobalSearchCriteria {
    shortcuts! {
        with_text -> GlobalSearchTextCriteria,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::value::StringFieldValue;
    use serde_json::json;

    #[test]
    fn test_child_builders_return_the_child() {
        let mut criteria = SampleSearchCriteria::new();
        criteria.with_code().that_equals("PLATE-1");
        criteria.with_space().with_code().that_equals("MY-SPACE");
        criteria.with_property("COLOR").that_starts_with("re");

        assert_eq!(criteria.criteria().len(), 3);
        assert_eq!(
            criteria.to_string(),
            "sample (code = 'PLATE-1' AND space (code = 'MY-SPACE') AND COLOR starts with 're')"
        );
    }

    #[test]
    fn test_relation_roles() {
        let mut criteria = SampleSearchCriteria::new();
        assert_eq!(criteria.relation(), SampleSearchRelation::Sample);
        assert_eq!(criteria.with_parents().relation(), SampleSearchRelation::Parents);
        assert_eq!(criteria.with_children().relation(), SampleSearchRelation::Children);
        assert_eq!(criteria.with_container().relation(), SampleSearchRelation::Container);

        let type_names: Vec<&str> = criteria.criteria().iter().map(|c| c.type_name()).collect();
        assert_eq!(
            type_names,
            vec![
                "as.dto.sample.search.SampleParentsSearchCriteria",
                "as.dto.sample.search.SampleChildrenSearchCriteria",
                "as.dto.sample.search.SampleContainerSearchCriteria",
            ]
        );
    }

    #[test]
    fn test_data_set_relation_roles() {
        let mut criteria = DataSetSearchCriteria::new();
        criteria.with_parents().with_code().that_equals("DS-1");
        criteria.with_container();

        let json = serde_json::to_value(SearchCriteria::from(criteria)).unwrap();
        assert_eq!(json["@type"], "as.dto.dataset.search.DataSetSearchCriteria");
        assert_eq!(json["criteria"][0]["@type"], "as.dto.dataset.search.DataSetParentsSearchCriteria");
        assert_eq!(json["criteria"][0]["relation"], "PARENTS");
        assert_eq!(json["criteria"][1]["@type"], "as.dto.dataset.search.DataSetContainerSearchCriteria");
    }

    #[test]
    fn test_absence_sentinels() {
        let mut criteria = SampleSearchCriteria::new();
        criteria.without_experiment();
        criteria.without_container();

        let json = serde_json::to_value(SearchCriteria::from(criteria)).unwrap();
        assert_eq!(
            json["criteria"],
            json!([
                {"@type": "as.dto.experiment.search.NoExperimentSearchCriteria"},
                {"@type": "as.dto.sample.search.NoSampleContainerSearchCriteria"}
            ])
        );
    }

    #[test]
    fn test_or_operator_chains_on_entity() {
        let mut criteria = ExperimentSearchCriteria::new();
        criteria.with_or_operator().with_code().that_equals("EXP-1");
        criteria.with_code().that_equals("EXP-2");
        assert_eq!(criteria.to_string(), "experiment (code = 'EXP-1' OR code = 'EXP-2')");
    }

    #[test]
    fn test_registrator_and_modifier() {
        let mut criteria = DataSetSearchCriteria::new();
        criteria.with_registrator().with_user_id().that_equals("admin");
        assert_eq!(criteria.with_modifier().relation(), PersonSearchRelation::Modifier);

        let type_names: Vec<&str> = criteria.criteria().iter().map(|c| c.type_name()).collect();
        assert_eq!(
            type_names,
            vec![
                "as.dto.person.search.RegistratorSearchCriteria",
                "as.dto.person.search.ModifierSearchCriteria",
            ]
        );
    }

    #[test]
    fn test_global_text() {
        let mut criteria = GlobalSearchCriteria::new();
        criteria.with_text().that_contains_exactly("stem cell");
        match &criteria.criteria()[0] {
            SearchCriteria::GlobalSearchText(text) => assert_eq!(
                text.field_value(),
                Some(&StringFieldValue::ContainsExactly {
                    value: "stem cell".to_string()
                })
            ),
            other => panic!("unexpected criteria {:?}", other),
        }
    }

    #[test]
    fn test_nested_tree_reads_back() {
        let mut criteria = SampleSearchCriteria::new();
        criteria.with_or_operator();
        criteria.with_sub_criteria().with_code().that_equals("A");
        criteria.with_registration_date().that_is_earlier_than("2024-01-01").unwrap();

        let tree = SearchCriteria::from(criteria);
        let json = serde_json::to_value(&tree).unwrap();
        let back: SearchCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
