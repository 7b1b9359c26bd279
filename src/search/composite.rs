use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::search::entity::*;
use crate::search::field::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchOperator {
    #[default]
    And,
    Or,
}

impl fmt::Display for SearchOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchOperator::And => write!(f, "AND"),
            SearchOperator::Or => write!(f, "OR"),
        }
    }
}

/// Registers every criterion kind under its `@type` discriminator. The set is
/// closed: a discriminator not listed here fails to deserialize.
macro_rules! criteria_registry {
    ($($variant:ident($ty:ty) = $type_name:literal,)*) => {
        /// Any node of a search tree.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "@type")]
        pub enum SearchCriteria {
            $(
                #[serde(rename = $type_name)]
                $variant($ty),
            )*
        }

        /// Wire form of [`SearchCriteria`] before roles are restored.
        #[derive(Deserialize)]
        #[serde(tag = "@type")]
        enum TaggedCriteria {
            $(
                #[serde(rename = $type_name)]
                $variant($ty),
            )*
        }

        impl From<TaggedCriteria> for SearchCriteria {
            fn from(tagged: TaggedCriteria) -> Self {
                let criteria = match tagged {
                    $(TaggedCriteria::$variant(criteria) => SearchCriteria::$variant(criteria),)*
                };
                criteria.with_role_from_tag()
            }
        }

        impl<'de> Deserialize<'de> for SearchCriteria {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                TaggedCriteria::deserialize(deserializer).map(SearchCriteria::from)
            }
        }

        impl SearchCriteria {
            pub fn type_name(&self) -> &'static str {
                match self {
                    $(SearchCriteria::$variant(_) => $type_name,)*
                }
            }
        }

        impl fmt::Display for SearchCriteria {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    $(SearchCriteria::$variant(criteria) => fmt::Display::fmt(criteria, f),)*
                }
            }
        }
    };
}

criteria_registry! {
    Code(CodeSearchCriteria) = "as.dto.common.search.CodeSearchCriteria",
    PermId(PermIdSearchCriteria) = "as.dto.common.search.PermIdSearchCriteria",
    Identifier(IdentifierSearchCriteria) = "as.dto.common.search.IdentifierSearchCriteria",
    StringProperty(StringPropertySearchCriteria) = "as.dto.common.search.StringPropertySearchCriteria",
    NumberProperty(NumberPropertySearchCriteria) = "as.dto.common.search.NumberPropertySearchCriteria",
    DateProperty(DatePropertySearchCriteria) = "as.dto.common.search.DatePropertySearchCriteria",
    AnyProperty(AnyPropertySearchCriteria) = "as.dto.common.search.AnyPropertySearchCriteria",
    AnyField(AnyFieldSearchCriteria) = "as.dto.common.search.AnyFieldSearchCriteria",
    RegistrationDate(RegistrationDateSearchCriteria) = "as.dto.common.search.RegistrationDateSearchCriteria",
    ModificationDate(ModificationDateSearchCriteria) = "as.dto.common.search.ModificationDateSearchCriteria",
    UserId(UserIdSearchCriteria) = "as.dto.person.search.UserIdSearchCriteria",
    FirstName(FirstNameSearchCriteria) = "as.dto.person.search.FirstNameSearchCriteria",
    LastName(LastNameSearchCriteria) = "as.dto.person.search.LastNameSearchCriteria",
    Email(EmailSearchCriteria) = "as.dto.person.search.EmailSearchCriteria",
    ShareId(ShareIdSearchCriteria) = "as.dto.dataset.search.ShareIdSearchCriteria",
    Location(LocationSearchCriteria) = "as.dto.dataset.search.LocationSearchCriteria",
    GlobalSearchText(GlobalSearchTextCriteria) = "as.dto.global.search.GlobalSearchTextCriteria",
    Global(GlobalSearchCriteria) = "as.dto.global.search.GlobalSearchCriteria",
    Space(SpaceSearchCriteria) = "as.dto.space.search.SpaceSearchCriteria",
    Project(ProjectSearchCriteria) = "as.dto.project.search.ProjectSearchCriteria",
    NoProject(NoProjectSearchCriteria) = "as.dto.project.search.NoProjectSearchCriteria",
    Experiment(ExperimentSearchCriteria) = "as.dto.experiment.search.ExperimentSearchCriteria",
    NoExperiment(NoExperimentSearchCriteria) = "as.dto.experiment.search.NoExperimentSearchCriteria",
    Sample(SampleSearchCriteria) = "as.dto.sample.search.SampleSearchCriteria",
    SampleParents(SampleSearchCriteria) = "as.dto.sample.search.SampleParentsSearchCriteria",
    SampleChildren(SampleSearchCriteria) = "as.dto.sample.search.SampleChildrenSearchCriteria",
    SampleContainer(SampleSearchCriteria) = "as.dto.sample.search.SampleContainerSearchCriteria",
    NoSample(NoSampleSearchCriteria) = "as.dto.sample.search.NoSampleSearchCriteria",
    NoSampleContainer(NoSampleContainerSearchCriteria) = "as.dto.sample.search.NoSampleContainerSearchCriteria",
    DataSet(DataSetSearchCriteria) = "as.dto.dataset.search.DataSetSearchCriteria",
    DataSetParents(DataSetSearchCriteria) = "as.dto.dataset.search.DataSetParentsSearchCriteria",
    DataSetChildren(DataSetSearchCriteria) = "as.dto.dataset.search.DataSetChildrenSearchCriteria",
    DataSetContainer(DataSetSearchCriteria) = "as.dto.dataset.search.DataSetContainerSearchCriteria",
    PhysicalData(PhysicalDataSearchCriteria) = "as.dto.dataset.search.PhysicalDataSearchCriteria",
    StorageFormat(StorageFormatSearchCriteria) = "as.dto.dataset.search.StorageFormatSearchCriteria",
    FileFormatType(FileFormatTypeSearchCriteria) = "as.dto.dataset.search.FileFormatTypeSearchCriteria",
    LocatorType(LocatorTypeSearchCriteria) = "as.dto.dataset.search.LocatorTypeSearchCriteria",
    Material(MaterialSearchCriteria) = "as.dto.material.search.MaterialSearchCriteria",
    Tag(TagSearchCriteria) = "as.dto.tag.search.TagSearchCriteria",
    Person(PersonSearchCriteria) = "as.dto.person.search.PersonSearchCriteria",
    Registrator(PersonSearchCriteria) = "as.dto.person.search.RegistratorSearchCriteria",
    Modifier(PersonSearchCriteria) = "as.dto.person.search.ModifierSearchCriteria",
    SampleType(SampleTypeSearchCriteria) = "as.dto.sample.search.SampleTypeSearchCriteria",
    ExperimentType(ExperimentTypeSearchCriteria) = "as.dto.experiment.search.ExperimentTypeSearchCriteria",
    DataSetType(DataSetTypeSearchCriteria) = "as.dto.dataset.search.DataSetTypeSearchCriteria",
    MaterialType(MaterialTypeSearchCriteria) = "as.dto.material.search.MaterialTypeSearchCriteria",
}

impl SearchCriteria {
    /// Role-carrying kinds share one Rust type across several discriminators.
    /// The discriminator decides the role, whatever the `relation` field said.
    fn with_role_from_tag(mut self) -> Self {
        match &mut self {
            SearchCriteria::Sample(c) => c.set_relation(SampleSearchRelation::Sample),
            SearchCriteria::SampleParents(c) => c.set_relation(SampleSearchRelation::Parents),
            SearchCriteria::SampleChildren(c) => c.set_relation(SampleSearchRelation::Children),
            SearchCriteria::SampleContainer(c) => c.set_relation(SampleSearchRelation::Container),
            SearchCriteria::DataSet(c) => c.set_relation(DataSetSearchRelation::DataSet),
            SearchCriteria::DataSetParents(c) => c.set_relation(DataSetSearchRelation::Parents),
            SearchCriteria::DataSetChildren(c) => c.set_relation(DataSetSearchRelation::Children),
            SearchCriteria::DataSetContainer(c) => c.set_relation(DataSetSearchRelation::Container),
            SearchCriteria::Person(c) => c.set_relation(PersonSearchRelation::Person),
            SearchCriteria::Registrator(c) => c.set_relation(PersonSearchRelation::Registrator),
            SearchCriteria::Modifier(c) => c.set_relation(PersonSearchRelation::Modifier),
            _ => {}
        }
        self
    }
}

/// A concrete criterion kind that can be placed into a [`SearchCriteria`]
/// tree and read back out of it.
///
/// Implementations must keep the two directions in step: `downcast_mut`
/// returns `Some` for every node that `into()` can produce from `Self`.
/// [`CompositeSearchCriteria::add_criteria`] relies on this to hand the
/// appended child back.
pub trait Criterion: Into<SearchCriteria> {
    fn downcast_mut(node: &mut SearchCriteria) -> Option<&mut Self>;
}

/// Implements [`Criterion`] for kinds that map onto exactly one variant.
macro_rules! criterion {
    ($($variant:ident => $ty:ty,)*) => {
        $(
            impl From<$ty> for SearchCriteria {
                fn from(criteria: $ty) -> Self {
                    SearchCriteria::$variant(criteria)
                }
            }

            impl Criterion for $ty {
                fn downcast_mut(node: &mut SearchCriteria) -> Option<&mut Self> {
                    match node {
                        SearchCriteria::$variant(criteria) => Some(criteria),
                        _ => None,
                    }
                }
            }
        )*
    };
}

criterion! {
    Code => CodeSearchCriteria,
    PermId => PermIdSearchCriteria,
    Identifier => IdentifierSearchCriteria,
    StringProperty => StringPropertySearchCriteria,
    NumberProperty => NumberPropertySearchCriteria,
    DateProperty => DatePropertySearchCriteria,
    AnyProperty => AnyPropertySearchCriteria,
    AnyField => AnyFieldSearchCriteria,
    RegistrationDate => RegistrationDateSearchCriteria,
    ModificationDate => ModificationDateSearchCriteria,
    UserId => UserIdSearchCriteria,
    FirstName => FirstNameSearchCriteria,
    LastName => LastNameSearchCriteria,
    Email => EmailSearchCriteria,
    ShareId => ShareIdSearchCriteria,
    Location => LocationSearchCriteria,
    GlobalSearchText => GlobalSearchTextCriteria,
    Global => GlobalSearchCriteria,
    Space => SpaceSearchCriteria,
    Project => ProjectSearchCriteria,
    NoProject => NoProjectSearchCriteria,
    Experiment => ExperimentSearchCriteria,
    NoExperiment => NoExperimentSearchCriteria,
    NoSample => NoSampleSearchCriteria,
    NoSampleContainer => NoSampleContainerSearchCriteria,
    PhysicalData => PhysicalDataSearchCriteria,
    StorageFormat => StorageFormatSearchCriteria,
    FileFormatType => FileFormatTypeSearchCriteria,
    LocatorType => LocatorTypeSearchCriteria,
    Material => MaterialSearchCriteria,
    Tag => TagSearchCriteria,
    SampleType => SampleTypeSearchCriteria,
    ExperimentType => ExperimentTypeSearchCriteria,
    DataSetType => DataSetTypeSearchCriteria,
    MaterialType => MaterialTypeSearchCriteria,
}

/// Boolean container of child criteria. Children keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeSearchCriteria {
    #[serde(default)]
    operator: SearchOperator,
    #[serde(default)]
    criteria: Vec<SearchCriteria>,
}

impl CompositeSearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operator(&self) -> SearchOperator {
        self.operator
    }

    pub fn criteria(&self) -> &[SearchCriteria] {
        &self.criteria
    }

    pub fn with_or_operator(&mut self) -> &mut Self {
        self.operator = SearchOperator::Or;
        self
    }

    pub fn with_and_operator(&mut self) -> &mut Self {
        self.operator = SearchOperator::And;
        self
    }

    /// Appends `child` and returns it, not `self`, so the caller keeps
    /// configuring the child.
    ///
    /// # Panics
    ///
    /// Only if `C` breaks the [`Criterion`] contract; every kind in this
    /// crate upholds it.
    pub fn add_criteria<C: Criterion>(&mut self, child: C) -> &mut C {
        self.criteria.push(child.into());
        match self.criteria.last_mut().and_then(C::downcast_mut) {
            Some(child) => child,
            None => unreachable!("criterion does not convert into its own variant"),
        }
    }
}

impl fmt::Display for CompositeSearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.criteria.is_empty() {
            return write!(f, "(*)");
        }
        let separator = format!(" {} ", self.operator);
        write!(f, "({})", self.criteria.iter().join(&separator))
    }
}
