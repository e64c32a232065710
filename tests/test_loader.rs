mod common;

use common::*;
use esflow::{
    verify, DatasetGenerator, Document, ErrorKind, EsflowError, LoadMode, LoadReport, Loader,
};
use serde_json::{json, Value};
use wiremock::matchers::{any, method, path, path_regex};
use wiremock::Mock;

#[tokio::test]
async fn test_single_mode_reports_created() {
    let (server, client) = mock_cluster().await;
    let docs = DatasetGenerator::new(5).generate().into_documents();
    for doc in &docs {
        Mock::given(method("PUT"))
            .and(path(format!("/test_index_2/_doc/{}", doc.id)))
            .respond_with(write_result("test_index_2", &doc.id, "created"))
            .expect(1)
            .mount(&server)
            .await;
    }

    let report = Loader::new(client)
        .load_single("test_index_2", &docs)
        .await
        .unwrap();
    assert_eq!(report, LoadReport { created: 5, updated: 0 });
}

#[tokio::test]
async fn test_reindexing_same_id_reports_updated() {
    let (server, client) = mock_cluster().await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/test_index_1/_doc/[^/]+$"))
        .respond_with(DocumentEcho::default())
        .mount(&server)
        .await;

    let docs = DatasetGenerator::new(1).with_seed(11).generate().into_documents();
    let loader = Loader::new(client);
    let first = loader.load_single("test_index_1", &docs).await.unwrap();
    let second = loader.load_single("test_index_1", &docs).await.unwrap();
    assert_eq!(first.created, 1);
    assert_eq!(second.updated, 1);
    assert_eq!(second.created, 0);
}

#[tokio::test]
async fn test_single_mode_rejects_noop() {
    let (server, client) = mock_cluster().await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/test_index_2/_doc/[^/]+$"))
        .respond_with(write_result("test_index_2", "x", "noop"))
        .expect(1)
        .mount(&server)
        .await;

    let docs = DatasetGenerator::new(3).generate().into_documents();
    let err = Loader::new(client)
        .load_single("test_index_2", &docs)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteResult);
    match err {
        EsflowError::UnexpectedWriteResult { id, result } => {
            assert_eq!(id, docs[0].id);
            assert_eq!(result, "noop");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_bulk_mode_all_succeed() {
    let (server, client) = mock_cluster().await;
    let docs = DatasetGenerator::new(50).generate().into_documents();
    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .respond_with(bulk_all_created("test_index_2", &docs))
        .expect(1)
        .mount(&server)
        .await;

    let summary = Loader::new(client)
        .load_bulk("test_index_2", &docs)
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 50);
    assert!(summary.failed.is_empty());

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 100);
    let source: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(source["seq"], 0);
    assert_eq!(source["id"], docs[0].id.as_str());
    assert!(received[0].url.query().is_none());
}

#[tokio::test]
async fn test_bulk_loaded_documents_read_back_by_id() {
    let (server, client) = mock_cluster().await;
    Mock::given(any())
        .respond_with(BulkEcho::default())
        .mount(&server)
        .await;

    let docs = DatasetGenerator::new(25).with_seed(3).generate().into_documents();
    let summary = Loader::new(client.clone())
        .load_bulk("test_index_2", &docs)
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 25);

    for i in [0, 12, 24] {
        let fetched = client
            .get_document::<Document>("test_index_2", &docs[i].id)
            .await
            .unwrap();
        verify::found(&fetched).unwrap();
        assert_eq!(fetched.source.unwrap(), docs[i]);
    }

    let other_index = client
        .get_document::<Document>("test_index_1", &docs[0].id)
        .await
        .unwrap();
    assert!(verify::found(&other_index).is_err());
}

#[tokio::test]
async fn test_bulk_partial_failure() {
    let (server, client) = mock_cluster().await;
    let docs = DatasetGenerator::new(3).generate().into_documents();
    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .respond_with(json_response(
            200,
            json!({
                "took": 4,
                "errors": true,
                "items": [
                    {"index": {"_index": "test_index_2", "_id": docs[0].id, "status": 201, "result": "created"}},
                    {"index": {"_index": "test_index_2", "_id": docs[1].id, "status": 429,
                        "error": {"type": "es_rejected_execution_exception", "reason": "rejected execution"}}},
                    {"index": {"_index": "test_index_2", "_id": docs[2].id, "status": 201, "result": "created"}}
                ]
            }),
        ))
        .mount(&server)
        .await;

    let loader = Loader::new(client);
    let summary = loader
        .submit_bulk("test_index_2", &docs, esflow::Refresh::False)
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].position, 1);
    assert_eq!(summary.failed[0].status, 429);

    let err = loader.load_bulk("test_index_2", &docs).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PartialBulk);
    assert!(err.to_string().contains("es_rejected_execution_exception"));
}

#[tokio::test]
async fn test_load_dispatches_on_mode() {
    let (server, client) = mock_cluster().await;
    let docs = DatasetGenerator::new(4).generate().into_documents();
    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .respond_with(bulk_all_created("test_index_2", &docs))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/test_index_2/_doc/[^/]+$"))
        .respond_with(write_result("test_index_2", "x", "created"))
        .expect(4)
        .mount(&server)
        .await;

    let loader = Loader::new(client);
    assert_eq!(
        loader.load("test_index_2", &docs, LoadMode::Bulk).await.unwrap(),
        4
    );
    assert_eq!(
        loader
            .load("test_index_2", &docs, LoadMode::Single)
            .await
            .unwrap(),
        4
    );
}
