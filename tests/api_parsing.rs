use tileset_lab::models::{
    BoundingBox, ClassificationMethod, JobProgress, JobRef, JobStatus, TileMetadataResponse,
};
use tileset_lab::BoundingBoxError;

#[test]
fn progress_accepts_numbers_and_strings() {
    let a: JobProgress = serde_json::from_str(r#"{"status":"completed","progress":100}"#).unwrap();
    assert_eq!(a, JobProgress::new(JobStatus::Completed, 100.0));

    let b: JobProgress = serde_json::from_str(r#"{"status":"in_progress","progress":"37.50"}"#).unwrap();
    assert_eq!(b.progress, 37.5);

    let c: JobProgress = serde_json::from_str(r#"{"status":"failed","progress":null}"#).unwrap();
    assert_eq!(c, JobProgress::new(JobStatus::Failed, 0.0));
}

#[test]
fn progress_fields_default_when_missing() {
    let p: JobProgress = serde_json::from_str("{}").unwrap();
    assert_eq!(p.status, JobStatus::InProgress);
    assert_eq!(p.progress, 0.0);
    assert!(!p.status.is_terminal());
}

#[test]
fn unknown_status_is_rejected() {
    assert!(serde_json::from_str::<JobProgress>(r#"{"status":"queued"}"#).is_err());
    assert!(serde_json::from_str::<JobProgress>(r#"{"progress":"n/a"}"#).is_err());
}

#[test]
fn job_refs_display_and_dataset() {
    let t = JobRef::TilesetGeneration {
        dataset_id: 3,
        tileset_id: 8,
    };
    assert_eq!(t.to_string(), "dataset 3 / tileset 8");
    assert_eq!(t.dataset_id(), 3);
    assert_eq!(JobRef::DatasetIngestion { dataset_id: 5 }.to_string(), "dataset 5");
}

#[test]
fn classification_methods_map_to_query_values() {
    assert_eq!(ClassificationMethod::NaturalBreaks.as_query_param(), "natural_breaks");
    assert_eq!(
        serde_json::to_string(&ClassificationMethod::Percentile).unwrap(),
        "\"percentile\""
    );
    assert_eq!(ClassificationMethod::Quantile.label(), "Quantile");
}

#[test]
fn metadata_tolerates_missing_optional_fields() {
    let body = r#"{
        "header": {"min_zoom": 2, "max_zoom": 9, "bounds": [5.8, 47.2, 15.1, 55.1], "center": [10.4, 51.1, 5]},
        "metadata": {"vector_layers": [{"id": "districts"}]}
    }"#;
    let meta: TileMetadataResponse = serde_json::from_str(body).unwrap();
    let layer = &meta.metadata.vector_layers[0];
    assert_eq!(layer.id, "districts");
    assert!(layer.fields.is_empty());
    assert_eq!(meta.metadata.name, "");
    let bbox = meta.header.bounding_box();
    assert_eq!(bbox, BoundingBox::new(5.8, 47.2, 15.1, 55.1));
    assert!(bbox.validate().is_ok());
}

#[test]
fn bounding_box_validation() {
    assert!(matches!(
        BoundingBox::new(10.0, 0.0, -10.0, 1.0).validate(),
        Err(BoundingBoxError::InvertedLongitude { .. })
    ));
    assert!(matches!(
        BoundingBox::new(0.0, 5.0, 1.0, 5.0).validate(),
        Err(BoundingBoxError::InvertedLatitude { .. })
    ));
    assert_eq!(
        BoundingBox::new(0.0, -91.0, 1.0, 5.0).validate(),
        Err(BoundingBoxError::LatitudeOutOfRange(-91.0))
    );
    assert_eq!(
        BoundingBox::new(-181.0, 0.0, 1.0, 5.0).validate(),
        Err(BoundingBoxError::LongitudeOutOfRange(-181.0))
    );
    assert!(BoundingBox::point(13.4, 52.5).validate().is_err());
}
