mod common;

use common::{Reply, ok, serve};
use std::net::TcpListener;
use tileset_lab::models::{ClassificationMethod, ClassificationRequest};
use tileset_lab::poller::JobStatusSource;
use tileset_lab::{Client, JobRef, JobStatus, TransportError};

const JOB: JobRef = JobRef::TilesetGeneration {
    dataset_id: 3,
    tileset_id: 8,
};

#[test]
fn progress_is_fetched_without_cache() {
    let (base, server) = serve(vec![ok(r#"{"status":"in_progress","progress":"40.00"}"#)]);
    let client = Client::new(base).unwrap();
    let p = client.job_progress(&JOB).unwrap();
    assert_eq!(p.status, JobStatus::InProgress);
    assert_eq!(p.progress, 40.0);

    let requests = server.join().unwrap();
    let head = requests[0].to_ascii_lowercase();
    assert!(head.starts_with("get /api/datasets/3/tilesets/8/progress/ http/1.1"));
    assert!(head.contains("cache-control: no-cache"));
}

#[test]
fn http_errors_become_status_errors() {
    let (base, server) = serve(vec![Reply {
        status: 404,
        body: r#"{"detail":"Not found."}"#,
    }]);
    let client = Client::new(base).unwrap();
    let err = client.fetch_progress(&JOB).unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 404, .. }));
    // Never retried: exactly one request reached the server.
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn garbage_bodies_become_decode_errors() {
    let (base, server) = serve(vec![ok("<html>oops</html>")]);
    let client = Client::new(base).unwrap();
    let err = client.job_progress(&JOB).unwrap_err();
    assert!(matches!(err, TransportError::Decode { .. }), "{err:?}");
    server.join().unwrap();
}

#[test]
fn refused_connections_become_network_errors() {
    let addr = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap()
    };
    let client = Client::new(format!("http://{addr}/api")).unwrap();
    let err = client
        .job_progress(&JobRef::DatasetIngestion { dataset_id: 1 })
        .unwrap_err();
    match err {
        TransportError::Network { url, .. } => {
            assert!(url.ends_with("/api/datasets/1/progress/"))
        }
        other => panic!("expected a network error, got {other:?}"),
    }
}

#[test]
fn classify_retries_server_errors() {
    let (base, server) = serve(vec![
        Reply {
            status: 503,
            body: "{}",
        },
        ok(r#"{"breaks":[12.5,40,87]}"#),
    ]);
    let client = Client::new(base).unwrap();
    let req = ClassificationRequest {
        field: "density".into(),
        method: ClassificationMethod::Quantile,
        classes: 3,
    };
    let breaks = client.classify(3, 8, &req).unwrap();
    assert_eq!(breaks, vec![12.5, 40.0, 87.0]);

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].contains("/tiers/?field=density&method=quantile&classes=3"));
}

#[test]
fn classify_rejects_empty_field_without_a_request() {
    let client = Client::new("http://127.0.0.1:9/api").unwrap();
    let req = ClassificationRequest {
        field: "  ".into(),
        method: ClassificationMethod::Percentile,
        classes: 4,
    };
    assert!(client.classify(1, 1, &req).is_err());
}

#[test]
fn tileset_metadata_is_decoded() {
    let body = r#"{
        "header": {"min_zoom": 0, "max_zoom": 14, "bounds": [-74.1, 40.6, -73.8, 40.9], "center": [-73.95, 40.75, 10]},
        "metadata": {
            "name": "parcels",
            "vector_layers": [
                {"id": "parcels", "fields": {"area": "Number", "owner": "String"}, "minzoom": 0, "maxzoom": 14}
            ]
        }
    }"#;
    let (base, server) = serve(vec![ok(body)]);
    let client = Client::new(base).unwrap();
    let meta = client.tileset_metadata(3, 8).unwrap();
    assert_eq!(meta.header.max_zoom, 14);
    assert_eq!(meta.metadata.vector_layers.len(), 1);
    assert_eq!(meta.metadata.vector_layers[0].fields["area"], "Number");
    let requests = server.join().unwrap();
    assert!(requests[0].contains("/api/datasets/3/tilesets/8/metadata/"));
}
