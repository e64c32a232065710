#![allow(dead_code)]

use esflow::{ClientConfig, Document, SearchClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub async fn mock_cluster() -> (MockServer, SearchClient) {
    let server = MockServer::start().await;
    let client = SearchClient::connect(ClientConfig::new(server.uri())).unwrap();
    (server, client)
}

pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}

pub fn acknowledged(ack: bool) -> ResponseTemplate {
    json_response(200, json!({ "acknowledged": ack }))
}

pub fn index_created(index: &str) -> ResponseTemplate {
    json_response(
        200,
        json!({"acknowledged": true, "shards_acknowledged": true, "index": index}),
    )
}

pub fn write_result(index: &str, id: &str, result: &str) -> ResponseTemplate {
    let status = if result == "created" { 201 } else { 200 };
    json_response(
        status,
        json!({
            "_index": index, "_id": id, "_version": 1, "result": result,
            "_shards": {"total": 1, "successful": 1, "failed": 0}
        }),
    )
}

pub fn refreshed() -> ResponseTemplate {
    json_response(
        200,
        json!({"_shards": {"total": 1, "successful": 1, "failed": 0}}),
    )
}

pub fn bulk_all_created(index: &str, documents: &[Document]) -> ResponseTemplate {
    let items: Vec<Value> = documents
        .iter()
        .map(|d| {
            json!({"index": {
                "_index": index, "_id": d.id, "_version": 1,
                "result": "created", "status": 201
            }})
        })
        .collect();
    json_response(200, json!({"took": 12, "errors": false, "items": items}))
}

pub fn hit(index: &str, doc: &Document) -> Value {
    json!({
        "_index": index,
        "_id": doc.id,
        "_score": 1.0,
        "_source": doc,
    })
}

pub fn search_response(index: &str, total: u64, page: &[Document], aggregations: Value) -> Value {
    json!({
        "took": 2,
        "timed_out": false,
        "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0},
        "hits": {
            "total": {"value": total, "relation": "eq"},
            "max_score": 1.0,
            "hits": page.iter().map(|d| hit(index, d)).collect::<Vec<_>>(),
        },
        "aggregations": aggregations,
    })
}

pub fn not_found_index(index: &str) -> ResponseTemplate {
    json_response(
        404,
        json!({
            "error": {
                "type": "index_not_found_exception",
                "reason": format!("no such index [{}]", index)
            },
            "status": 404
        }),
    )
}

/// Stores the body of the last `PUT /{index}/_doc/{id}` and serves it back
/// on `GET` of the same path.
#[derive(Clone, Default)]
pub struct DocumentEcho {
    stored: Arc<Mutex<Option<Value>>>,
}

impl Respond for DocumentEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut segments = request.url.path().trim_start_matches('/').split('/');
        let index = segments.next().unwrap_or_default().to_string();
        let id = segments.nth(1).unwrap_or_default().to_string();
        let mut stored = self.stored.lock().unwrap();

        match request.method.as_str() {
            "PUT" => {
                let result = if stored.is_some() { "updated" } else { "created" };
                *stored = Some(serde_json::from_slice(&request.body).unwrap());
                write_result(&index, &id, result)
            }
            _ => match stored.as_ref() {
                Some(source) => json_response(
                    200,
                    json!({
                        "_index": index, "_id": id, "_version": 1,
                        "found": true, "_source": source
                    }),
                ),
                None => json_response(404, json!({"_index": index, "_id": id, "found": false})),
            },
        }
    }
}

/// Accepts `POST /_bulk` index operations, keeping each source line, and
/// serves them back on `GET /{index}/_doc/{id}`.
#[derive(Clone, Default)]
pub struct BulkEcho {
    stored: Arc<Mutex<HashMap<(String, String), Value>>>,
}

impl Respond for BulkEcho {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut stored = self.stored.lock().unwrap();

        if request.method.as_str() == "POST" {
            let body = String::from_utf8(request.body.clone()).unwrap();
            let mut lines = body.lines();
            let mut items = Vec::new();
            while let (Some(action), Some(source)) = (lines.next(), lines.next()) {
                let action: Value = serde_json::from_str(action).unwrap();
                let index = action["index"]["_index"].as_str().unwrap().to_string();
                let id = action["index"]["_id"].as_str().unwrap().to_string();
                let source: Value = serde_json::from_str(source).unwrap();
                items.push(json!({"index": {
                    "_index": index, "_id": id, "_version": 1,
                    "result": "created", "status": 201
                }}));
                stored.insert((index, id), source);
            }
            return json_response(200, json!({"took": 3, "errors": false, "items": items}));
        }

        let mut segments = request.url.path().trim_start_matches('/').split('/');
        let index = segments.next().unwrap_or_default().to_string();
        let id = segments.nth(1).unwrap_or_default().to_string();
        match stored.get(&(index.clone(), id.clone())) {
            Some(source) => json_response(
                200,
                json!({
                    "_index": index, "_id": id, "_version": 1,
                    "found": true, "_source": source
                }),
            ),
            None => json_response(404, json!({"_index": index, "_id": id, "found": false})),
        }
    }
}

/// Methods and paths of everything the mock received, in order.
pub async fn request_log(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect()
}
