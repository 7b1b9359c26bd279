//! Entity DTOs as the server returns them.
//!
//! Scalar attributes are public fields. Relations are private and reachable
//! only through getters that fail with [`Error::NotFetched`] unless the fetch
//! options the entity was loaded with requested the relation. A requested
//! relation may still be empty: a sample without parents yields an empty slice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::fetch::*;
use crate::model::ids::*;
use crate::model::{
    ArchivingStatus, Complete, DataSetKind, DtoType, OperationExecutionAvailability, OperationExecutionState, TypeTag,
};

/// Servers send `null` for collections they did not populate.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! entity {
    (
        $(#[$meta:meta])*
        $name:ident = $type_name:literal, fetch: $fetch:ident {
            $($(#[$field_meta:meta])* $field:ident: $field_ty:ty,)*
        }
        one {
            $($one:ident: $one_ty:ident = $one_json:literal => $one_has:ident, $one_set:ident;)*
        }
        many {
            $($many:ident: $many_ty:ident = $many_json:literal => $many_has:ident, $many_set:ident;)*
        }
        properties {
            $($props:ident => $props_has:ident, $props_set:ident;)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(rename = "@type", default)]
            type_tag: TypeTag<$name>,
            #[serde(default)]
            fetch_options: Option<$fetch>,
            $(
                $(#[$field_meta])*
                pub $field: $field_ty,
            )*
            $(
                #[serde(rename = $one_json, default)]
                $one: Option<Box<$one_ty>>,
            )*
            $(
                #[serde(rename = $many_json, default, deserialize_with = "null_as_default")]
                $many: Vec<$many_ty>,
            )*
            $(
                #[serde(default, deserialize_with = "null_as_default")]
                $props: HashMap<String, String>,
            )?
        }

        impl DtoType for $name {
            const TYPE_NAME: &'static str = $type_name;
        }

        impl $name {
            /// Fetch options this object was loaded with.
            pub fn fetch_options(&self) -> Option<&$fetch> {
                self.fetch_options.as_ref()
            }

            pub fn set_fetch_options(&mut self, fetch_options: $fetch) {
                self.fetch_options = Some(fetch_options);
            }

            #[allow(dead_code)]
            fn ensure_fetched(&self, requested: fn(&$fetch) -> bool, relation: &'static str) -> Result<()> {
                match &self.fetch_options {
                    Some(fetch_options) if requested(fetch_options) => Ok(()),
                    _ => Err(Error::NotFetched {
                        entity: stringify!($name),
                        relation,
                    }),
                }
            }

            $(
                pub fn $one(&self) -> Result<Option<&$one_ty>> {
                    self.ensure_fetched($fetch::$one_has, $one_json)?;
                    Ok(self.$one.as_deref())
                }

                pub fn $one_set(&mut self, value: Option<$one_ty>) {
                    self.$one = value.map(Box::new);
                }
            )*

            $(
                pub fn $many(&self) -> Result<&[$many_ty]> {
                    self.ensure_fetched($fetch::$many_has, $many_json)?;
                    Ok(&self.$many)
                }

                pub fn $many_set(&mut self, value: Vec<$many_ty>) {
                    self.$many = value;
                }
            )*

            $(
                pub fn $props(&self) -> Result<&HashMap<String, String>> {
                    self.ensure_fetched($fetch::$props_has, "properties")?;
                    Ok(&self.$props)
                }

                /// Value of a single property, `None` if the entity has no such property.
                pub fn property(&self, name: &str) -> Result<Option<&str>> {
                    Ok(self.$props()?.get(name).map(String::as_str))
                }

                pub fn $props_set(&mut self, value: HashMap<String, String>) {
                    self.$props = value;
                }
            )?
        }
    };
}

entity! {
    Space = "as.dto.space.Space", fetch: SpaceFetchOptions {
        perm_id: Option<SpacePermId>,
        code: Option<String>,
        description: Option<String>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        registrator: Person = "registrator" => has_registrator, set_registrator;
    }
    many {
        samples: Sample = "samples" => has_samples, set_samples;
        projects: Project = "projects" => has_projects, set_projects;
    }
    properties {}
}

entity! {
    Project = "as.dto.project.Project", fetch: ProjectFetchOptions {
        perm_id: Option<ProjectPermId>,
        identifier: Option<ProjectIdentifier>,
        code: Option<String>,
        description: Option<String>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        space: Space = "space" => has_space, set_space;
        registrator: Person = "registrator" => has_registrator, set_registrator;
        modifier: Person = "modifier" => has_modifier, set_modifier;
        leader: Person = "leader" => has_leader, set_leader;
    }
    many {
        experiments: Experiment = "experiments" => has_experiments, set_experiments;
        history: HistoryEntry = "history" => has_history, set_history;
        attachments: Attachment = "attachments" => has_attachments, set_attachments;
    }
    properties {}
}

entity! {
    Experiment = "as.dto.experiment.Experiment", fetch: ExperimentFetchOptions {
        perm_id: Option<ExperimentPermId>,
        identifier: Option<ExperimentIdentifier>,
        code: Option<String>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        entity_type: ExperimentType = "type" => has_type, set_entity_type;
        project: Project = "project" => has_project, set_project;
        registrator: Person = "registrator" => has_registrator, set_registrator;
        modifier: Person = "modifier" => has_modifier, set_modifier;
    }
    many {
        data_sets: DataSet = "dataSets" => has_data_sets, set_data_sets;
        samples: Sample = "samples" => has_samples, set_samples;
        history: HistoryEntry = "history" => has_history, set_history;
        tags: Tag = "tags" => has_tags, set_tags;
        attachments: Attachment = "attachments" => has_attachments, set_attachments;
    }
    properties {
        properties => has_properties, set_properties;
    }
}

entity! {
    Sample = "as.dto.sample.Sample", fetch: SampleFetchOptions {
        perm_id: Option<SamplePermId>,
        identifier: Option<SampleIdentifier>,
        code: Option<String>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        entity_type: SampleType = "type" => has_type, set_entity_type;
        space: Space = "space" => has_space, set_space;
        experiment: Experiment = "experiment" => has_experiment, set_experiment;
        container: Sample = "container" => has_container, set_container;
        registrator: Person = "registrator" => has_registrator, set_registrator;
        modifier: Person = "modifier" => has_modifier, set_modifier;
    }
    many {
        parents: Sample = "parents" => has_parents, set_parents;
        children: Sample = "children" => has_children, set_children;
        contained: Sample = "contained" => has_contained, set_contained;
        data_sets: DataSet = "dataSets" => has_data_sets, set_data_sets;
        history: HistoryEntry = "history" => has_history, set_history;
        tags: Tag = "tags" => has_tags, set_tags;
        attachments: Attachment = "attachments" => has_attachments, set_attachments;
    }
    properties {
        properties => has_properties, set_properties;
    }
}

entity! {
    DataSet = "as.dto.dataset.DataSet", fetch: DataSetFetchOptions {
        perm_id: Option<DataSetPermId>,
        code: Option<String>,
        kind: Option<DataSetKind>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        access_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        entity_type: DataSetType = "type" => has_type, set_entity_type;
        external_data: ExternalData = "externalData" => has_external_data, set_external_data;
        experiment: Experiment = "experiment" => has_experiment, set_experiment;
        sample: Sample = "sample" => has_sample, set_sample;
        registrator: Person = "registrator" => has_registrator, set_registrator;
        modifier: Person = "modifier" => has_modifier, set_modifier;
    }
    many {
        parents: DataSet = "parents" => has_parents, set_parents;
        children: DataSet = "children" => has_children, set_children;
        containers: DataSet = "containers" => has_containers, set_containers;
        contained: DataSet = "contained" => has_contained, set_contained;
        tags: Tag = "tags" => has_tags, set_tags;
        history: HistoryEntry = "history" => has_history, set_history;
    }
    properties {
        properties => has_properties, set_properties;
    }
}

entity! {
    /// Where and how the files of a physical data set are stored.
    ExternalData = "as.dto.dataset.ExternalData", fetch: ExternalDataFetchOptions {
        share_id: Option<String>,
        location: Option<String>,
        size: Option<i64>,
        complete: Option<Complete>,
        status: Option<ArchivingStatus>,
        present_in_archive: Option<bool>,
        storage_confirmation: Option<bool>,
        speed_hint: Option<i32>,
    }
    one {
        storage_format: VocabularyTerm = "storageFormat" => has_storage_format, set_storage_format;
        file_format_type: FileFormatType = "fileFormatType" => has_file_format_type, set_file_format_type;
        locator_type: LocatorType = "locatorType" => has_locator_type, set_locator_type;
    }
    many {}
    properties {}
}

entity! {
    FileFormatType = "as.dto.dataset.FileFormatType", fetch: FileFormatTypeFetchOptions {
        code: Option<String>,
        description: Option<String>,
    }
    one {}
    many {}
    properties {}
}

entity! {
    LocatorType = "as.dto.dataset.LocatorType", fetch: LocatorTypeFetchOptions {
        code: Option<String>,
    }
    one {}
    many {}
    properties {}
}

entity! {
    Material = "as.dto.material.Material", fetch: MaterialFetchOptions {
        perm_id: Option<MaterialPermId>,
        code: Option<String>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        entity_type: MaterialType = "type" => has_type, set_entity_type;
        registrator: Person = "registrator" => has_registrator, set_registrator;
    }
    many {
        history: HistoryEntry = "history" => has_history, set_history;
        tags: Tag = "tags" => has_tags, set_tags;
    }
    properties {
        properties => has_properties, set_properties;
    }
}

entity! {
    Person = "as.dto.person.Person", fetch: PersonFetchOptions {
        perm_id: Option<PersonPermId>,
        user_id: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
        active: Option<bool>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
    }
    one {
        space: Space = "space" => has_space, set_space;
        registrator: Person = "registrator" => has_registrator, set_registrator;
    }
    many {}
    properties {}
}

entity! {
    Tag = "as.dto.tag.Tag", fetch: TagFetchOptions {
        perm_id: Option<TagPermId>,
        code: Option<String>,
        description: Option<String>,
        private: Option<bool>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
    }
    one {
        owner: Person = "owner" => has_owner, set_owner;
    }
    many {}
    properties {}
}

entity! {
    Attachment = "as.dto.attachment.Attachment", fetch: AttachmentFetchOptions {
        file_name: Option<String>,
        title: Option<String>,
        description: Option<String>,
        permlink: Option<String>,
        latest_version_permlink: Option<String>,
        version: Option<i32>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
    }
    one {
        registrator: Person = "registrator" => has_registrator, set_registrator;
        previous_version: Attachment = "previousVersion" => has_previous_version, set_previous_version;
        content: String = "content" => has_content, set_content;
    }
    many {}
    properties {}
}

entity! {
    HistoryEntry = "as.dto.history.HistoryEntry", fetch: HistoryEntryFetchOptions {
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        valid_from: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        valid_to: Option<DateTime<Utc>>,
    }
    one {
        author: Person = "author" => has_author, set_author;
    }
    many {}
    properties {}
}

entity! {
    Vocabulary = "as.dto.vocabulary.Vocabulary", fetch: VocabularyFetchOptions {
        code: Option<String>,
        description: Option<String>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        registrator: Person = "registrator" => has_registrator, set_registrator;
    }
    many {}
    properties {}
}

entity! {
    VocabularyTerm = "as.dto.vocabulary.VocabularyTerm", fetch: VocabularyTermFetchOptions {
        code: Option<String>,
        label: Option<String>,
        description: Option<String>,
        ordinal: Option<i64>,
        official: Option<bool>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        registration_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        modification_date: Option<DateTime<Utc>>,
    }
    one {
        vocabulary: Vocabulary = "vocabulary" => has_vocabulary, set_vocabulary;
        registrator: Person = "registrator" => has_registrator, set_registrator;
    }
    many {}
    properties {}
}

macro_rules! entity_type {
    ($($name:ident = $type_name:literal, fetch: $fetch:ident;)*) => {
        $(
            entity! {
                $name = $type_name, fetch: $fetch {
                    perm_id: Option<EntityTypePermId>,
                    code: Option<String>,
                    description: Option<String>,
                    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
                    modification_date: Option<DateTime<Utc>>,
                }
                one {}
                many {}
                properties {}
            }
        )*
    };
}

entity_type! {
    SampleType = "as.dto.sample.SampleType", fetch: SampleTypeFetchOptions;
    ExperimentType = "as.dto.experiment.ExperimentType", fetch: ExperimentTypeFetchOptions;
    DataSetType = "as.dto.dataset.DataSetType", fetch: DataSetTypeFetchOptions;
    MaterialType = "as.dto.material.MaterialType", fetch: MaterialTypeFetchOptions;
}

entity! {
    /// An object moved to the trash can by a deletion.
    DeletedObject = "as.dto.deletion.DeletedObject", fetch: EmptyFetchOptions {
        id: Option<serde_json::Value>,
    }
    one {}
    many {}
    properties {}
}

entity! {
    Deletion = "as.dto.deletion.Deletion", fetch: DeletionFetchOptions {
        id: Option<DeletionTechId>,
        reason: Option<String>,
    }
    one {}
    many {
        deleted_objects: DeletedObject = "deletedObjects" => has_deleted_objects, set_deleted_objects;
    }
    properties {}
}

entity! {
    /// A batch of operations run by the server, possibly asynchronously.
    OperationExecution = "as.dto.operation.OperationExecution", fetch: OperationExecutionFetchOptions {
        perm_id: Option<OperationExecutionPermId>,
        code: Option<String>,
        state: Option<OperationExecutionState>,
        description: Option<String>,
        availability: Option<OperationExecutionAvailability>,
        availability_time: Option<i32>,
        summary_availability: Option<OperationExecutionAvailability>,
        summary_availability_time: Option<i32>,
        details_availability: Option<OperationExecutionAvailability>,
        details_availability_time: Option<i32>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        creation_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        start_date: Option<DateTime<Utc>>,
        #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
        finish_date: Option<DateTime<Utc>>,
    }
    one {
        owner: Person = "owner" => has_owner, set_owner;
        summary: OperationExecutionSummary = "summary" => has_summary, set_summary;
    }
    many {}
    properties {}
}

entity! {
    /// Text rendering of the operations and results of an execution.
    OperationExecutionSummary = "as.dto.operation.OperationExecutionSummary",
        fetch: OperationExecutionSummaryFetchOptions {}
    one {
        progress: String = "progress" => has_progress, set_progress;
        error: String = "error" => has_error, set_error;
    }
    many {
        operations: String = "operations" => has_operations, set_operations;
        results: String = "results" => has_results, set_results;
    }
    properties {}
}
