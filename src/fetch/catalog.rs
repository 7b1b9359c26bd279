use serde::{Deserialize, Serialize};

use crate::fetch::sort::*;
use crate::model::{DtoType, TypeTag};

fetch_options! {
    SampleFetchOptions = "as.dto.sample.fetchoptions.SampleFetchOptions", sort: SampleSortOptions {
        entity_type: SampleTypeFetchOptions = "type" => with_type, with_type_using, has_type;
        space: SpaceFetchOptions = "space" => with_space, with_space_using, has_space;
        experiment: ExperimentFetchOptions = "experiment" => with_experiment, with_experiment_using, has_experiment;
        properties: PropertyFetchOptions = "properties" => with_properties, with_properties_using, has_properties;
        parents: SampleFetchOptions = "parents" => with_parents, with_parents_using, has_parents;
        children: SampleFetchOptions = "children" => with_children, with_children_using, has_children;
        container: SampleFetchOptions = "container" => with_container, with_container_using, has_container;
        contained: SampleFetchOptions = "contained" => with_contained, with_contained_using, has_contained;
        data_sets: DataSetFetchOptions = "dataSets" => with_data_sets, with_data_sets_using, has_data_sets;
        history: HistoryEntryFetchOptions = "history" => with_history, with_history_using, has_history;
        tags: TagFetchOptions = "tags" => with_tags, with_tags_using, has_tags;
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
        modifier: PersonFetchOptions = "modifier" => with_modifier, with_modifier_using, has_modifier;
        attachments: AttachmentFetchOptions = "attachments" => with_attachments, with_attachments_using, has_attachments;
    }
}

fetch_options! {
    ExperimentFetchOptions = "as.dto.experiment.fetchoptions.ExperimentFetchOptions", sort: ExperimentSortOptions {
        entity_type: ExperimentTypeFetchOptions = "type" => with_type, with_type_using, has_type;
        project: ProjectFetchOptions = "project" => with_project, with_project_using, has_project;
        data_sets: DataSetFetchOptions = "dataSets" => with_data_sets, with_data_sets_using, has_data_sets;
        samples: SampleFetchOptions = "samples" => with_samples, with_samples_using, has_samples;
        history: HistoryEntryFetchOptions = "history" => with_history, with_history_using, has_history;
        properties: PropertyFetchOptions = "properties" => with_properties, with_properties_using, has_properties;
        tags: TagFetchOptions = "tags" => with_tags, with_tags_using, has_tags;
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
        modifier: PersonFetchOptions = "modifier" => with_modifier, with_modifier_using, has_modifier;
        attachments: AttachmentFetchOptions = "attachments" => with_attachments, with_attachments_using, has_attachments;
    }
}

fetch_options! {
    DataSetFetchOptions = "as.dto.dataset.fetchoptions.DataSetFetchOptions", sort: DataSetSortOptions {
        parents: DataSetFetchOptions = "parents" => with_parents, with_parents_using, has_parents;
        children: DataSetFetchOptions = "children" => with_children, with_children_using, has_children;
        containers: DataSetFetchOptions = "containers" => with_containers, with_containers_using, has_containers;
        contained: DataSetFetchOptions = "contained" => with_contained, with_contained_using, has_contained;
        external_data: ExternalDataFetchOptions = "externalData" => with_external_data, with_external_data_using, has_external_data;
        tags: TagFetchOptions = "tags" => with_tags, with_tags_using, has_tags;
        entity_type: DataSetTypeFetchOptions = "type" => with_type, with_type_using, has_type;
        history: HistoryEntryFetchOptions = "history" => with_history, with_history_using, has_history;
        modifier: PersonFetchOptions = "modifier" => with_modifier, with_modifier_using, has_modifier;
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
        experiment: ExperimentFetchOptions = "experiment" => with_experiment, with_experiment_using, has_experiment;
        sample: SampleFetchOptions = "sample" => with_sample, with_sample_using, has_sample;
        properties: PropertyFetchOptions = "properties" => with_properties, with_properties_using, has_properties;
    }
}

fetch_options! {
    /// Physical storage details of a data set.
    ExternalDataFetchOptions = "as.dto.dataset.fetchoptions.ExternalDataFetchOptions" {
        storage_format: VocabularyTermFetchOptions = "storageFormat" => with_storage_format, with_storage_format_using, has_storage_format;
        file_format_type: FileFormatTypeFetchOptions = "fileFormatType" => with_file_format_type, with_file_format_type_using, has_file_format_type;
        locator_type: LocatorTypeFetchOptions = "locatorType" => with_locator_type, with_locator_type_using, has_locator_type;
    }
}

fetch_options! {
    FileFormatTypeFetchOptions = "as.dto.dataset.fetchoptions.FileFormatTypeFetchOptions" {}
}

fetch_options! {
    LocatorTypeFetchOptions = "as.dto.dataset.fetchoptions.LocatorTypeFetchOptions" {}
}

fetch_options! {
    AttachmentFetchOptions = "as.dto.attachment.fetchoptions.AttachmentFetchOptions" {
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
        previous_version: AttachmentFetchOptions = "previousVersion" => with_previous_version, with_previous_version_using, has_previous_version;
        content: EmptyFetchOptions = "content" => with_content, with_content_using, has_content;
    }
}

fetch_options! {
    PersonFetchOptions = "as.dto.person.fetchoptions.PersonFetchOptions", sort: PersonSortOptions {
        space: SpaceFetchOptions = "space" => with_space, with_space_using, has_space;
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
    }
}

fetch_options! {
    ProjectFetchOptions = "as.dto.project.fetchoptions.ProjectFetchOptions", sort: ProjectSortOptions {
        experiments: ExperimentFetchOptions = "experiments" => with_experiments, with_experiments_using, has_experiments;
        history: HistoryEntryFetchOptions = "history" => with_history, with_history_using, has_history;
        space: SpaceFetchOptions = "space" => with_space, with_space_using, has_space;
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
        modifier: PersonFetchOptions = "modifier" => with_modifier, with_modifier_using, has_modifier;
        leader: PersonFetchOptions = "leader" => with_leader, with_leader_using, has_leader;
        attachments: AttachmentFetchOptions = "attachments" => with_attachments, with_attachments_using, has_attachments;
    }
}

fetch_options! {
    SpaceFetchOptions = "as.dto.space.fetchoptions.SpaceFetchOptions", sort: SpaceSortOptions {
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
        samples: SampleFetchOptions = "samples" => with_samples, with_samples_using, has_samples;
        projects: ProjectFetchOptions = "projects" => with_projects, with_projects_using, has_projects;
    }
}

fetch_options! {
    TagFetchOptions = "as.dto.tag.fetchoptions.TagFetchOptions", sort: TagSortOptions {
        owner: PersonFetchOptions = "owner" => with_owner, with_owner_using, has_owner;
    }
}

fetch_options! {
    MaterialFetchOptions = "as.dto.material.fetchoptions.MaterialFetchOptions", sort: MaterialSortOptions {
        entity_type: MaterialTypeFetchOptions = "type" => with_type, with_type_using, has_type;
        history: HistoryEntryFetchOptions = "history" => with_history, with_history_using, has_history;
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
        properties: PropertyFetchOptions = "properties" => with_properties, with_properties_using, has_properties;
        tags: TagFetchOptions = "tags" => with_tags, with_tags_using, has_tags;
    }
}

fetch_options! {
    VocabularyFetchOptions = "as.dto.vocabulary.fetchoptions.VocabularyFetchOptions" {
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
    }
}

fetch_options! {
    VocabularyTermFetchOptions = "as.dto.vocabulary.fetchoptions.VocabularyTermFetchOptions", sort: VocabularyTermSortOptions {
        vocabulary: VocabularyFetchOptions = "vocabulary" => with_vocabulary, with_vocabulary_using, has_vocabulary;
        registrator: PersonFetchOptions = "registrator" => with_registrator, with_registrator_using, has_registrator;
    }
}

fetch_options! {
    HistoryEntryFetchOptions = "as.dto.history.fetchoptions.HistoryEntryFetchOptions" {
        author: PersonFetchOptions = "author" => with_author, with_author_using, has_author;
    }
}

fetch_options! {
    DeletionFetchOptions = "as.dto.deletion.fetchoptions.DeletionFetchOptions" {
        deleted_objects: EmptyFetchOptions = "deletedObjects" => with_deleted_objects, with_deleted_objects_using, has_deleted_objects;
    }
}

fetch_options! {
    OperationExecutionFetchOptions = "as.dto.operation.fetchoptions.OperationExecutionFetchOptions" {
        owner: PersonFetchOptions = "owner" => with_owner, with_owner_using, has_owner;
        summary: OperationExecutionSummaryFetchOptions = "summary" => with_summary, with_summary_using, has_summary;
    }
}

fetch_options! {
    OperationExecutionSummaryFetchOptions = "as.dto.operation.fetchoptions.OperationExecutionSummaryFetchOptions" {
        operations: EmptyFetchOptions = "operations" => with_operations, with_operations_using, has_operations;
        progress: EmptyFetchOptions = "progress" => with_progress, with_progress_using, has_progress;
        error: EmptyFetchOptions = "error" => with_error, with_error_using, has_error;
        results: EmptyFetchOptions = "results" => with_results, with_results_using, has_results;
    }
}

fetch_options! {
    /// Requests the property map of an entity. Has no nested relations.
    PropertyFetchOptions = "as.dto.property.fetchoptions.PropertyFetchOptions" {}
}

fetch_options! {
    /// Requests a value that has no relations of its own.
    EmptyFetchOptions = "as.dto.common.fetchoptions.EmptyFetchOptions" {}
}

fetch_options! {
    SampleTypeFetchOptions = "as.dto.sample.fetchoptions.SampleTypeFetchOptions", sort: EntityTypeSortOptions {}
}

fetch_options! {
    ExperimentTypeFetchOptions = "as.dto.experiment.fetchoptions.ExperimentTypeFetchOptions", sort: EntityTypeSortOptions {}
}

fetch_options! {
    DataSetTypeFetchOptions = "as.dto.dataset.fetchoptions.DataSetTypeFetchOptions", sort: EntityTypeSortOptions {}
}

fetch_options! {
    MaterialTypeFetchOptions = "as.dto.material.fetchoptions.MaterialTypeFetchOptions", sort: EntityTypeSortOptions {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_is_false_until_requested() {
        let fetch_options = SampleFetchOptions::new();
        assert!(!fetch_options.has_type());
        assert!(!fetch_options.has_parents());
        assert!(fetch_options.entity_type().is_none());
    }

    #[test]
    fn test_with_is_idempotent() {
        let mut fetch_options = SampleFetchOptions::new();
        fetch_options.with_parents().with_type();
        fetch_options.with_parents().with_space();

        let parents = fetch_options.parents().unwrap();
        assert!(parents.has_type());
        assert!(parents.has_space());
    }

    #[test]
    fn test_with_using_overwrites() {
        let mut fetch_options = ExperimentFetchOptions::new();
        fetch_options.with_project().with_space();

        let mut custom = ProjectFetchOptions::new();
        custom.with_leader();
        fetch_options.with_project_using(custom.clone());

        assert_eq!(fetch_options.project(), Some(&custom));
        assert!(!fetch_options.project().unwrap().has_space());
    }

    #[test]
    fn test_cross_entity_nesting() {
        let mut fetch_options = ExperimentFetchOptions::new();
        fetch_options.with_samples().with_experiment().with_samples();

        let inner = fetch_options.samples().and_then(|s| s.experiment()).unwrap();
        assert!(inner.has_samples());
        assert!(!inner.has_project());
    }

    #[test]
    fn test_only_requested_slots_are_serialized() {
        let mut fetch_options = DataSetFetchOptions::new();
        fetch_options.with_external_data().with_storage_format();
        fetch_options.with_type();

        assert_eq!(
            serde_json::to_value(&fetch_options).unwrap(),
            json!({
                "@type": "as.dto.dataset.fetchoptions.DataSetFetchOptions",
                "externalData": {
                    "@type": "as.dto.dataset.fetchoptions.ExternalDataFetchOptions",
                    "storageFormat": {"@type": "as.dto.vocabulary.fetchoptions.VocabularyTermFetchOptions"}
                },
                "type": {"@type": "as.dto.dataset.fetchoptions.DataSetTypeFetchOptions"}
            })
        );
    }

    #[test]
    fn test_paging_and_sort() {
        let mut fetch_options = SampleFetchOptions::new();
        fetch_options.from(20).count(10);
        fetch_options.sort_by().code().desc();
        fetch_options.sort_by().property("NAME");

        assert_eq!(fetch_options.page_from(), Some(20));
        assert_eq!(fetch_options.page_count(), Some(10));
        assert_eq!(fetch_options.sort_options().map(|s| s.sortings().len()), Some(2));

        let json = serde_json::to_value(&fetch_options).unwrap();
        assert_eq!(json["from"], 20);
        assert_eq!(json["count"], 10);
        assert_eq!(json["sort"]["sortings"][1]["field"], "PROPERTYNAME");
    }

    #[test]
    fn test_reads_back_server_echo() {
        let fetch_options: ProjectFetchOptions = serde_json::from_value(json!({
            "@type": "as.dto.project.fetchoptions.ProjectFetchOptions",
            "space": {"@type": "as.dto.space.fetchoptions.SpaceFetchOptions"},
            "experiments": null
        }))
        .unwrap();
        assert!(fetch_options.has_space());
        assert!(!fetch_options.has_experiments());
    }
}
