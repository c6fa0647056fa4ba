//! End-to-end behaviour of `POST /api/analyze` through the public filter

use crop_core::{AnalysisResult, Language};
use crop_server::analyzer::canned_result;
use crop_server::{routes, AppState, PlaceholderAnalyzer};
use crop_store::{JsonlStore, MemoryStore};
use crop_test_utils::{sample_jpeg, sample_png, MultipartBody};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;

const LIMIT: u64 = 10 * 1024 * 1024;

fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Arc::new(PlaceholderAnalyzer::instant()), store.clone());
    (state, store)
}

async fn post(state: AppState, body: &MultipartBody) -> warp::http::Response<bytes::Bytes> {
    warp::test::request()
        .method("POST")
        .path("/api/analyze")
        .header("content-type", body.content_type())
        .body(body.to_bytes())
        .reply(&routes(state, LIMIT))
        .await
}

async fn wait_for_records(store: &MemoryStore, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.len() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("store appends did not arrive");
}

#[tokio::test]
async fn english_request_returns_canned_english() {
    let (state, store) = memory_state();
    let body = MultipartBody::analyze_request(sample_jpeg(), Language::En);

    let response = post(state, &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let result: AnalysisResult = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(result, canned_result(Language::En));
    assert_eq!(result.disease_name, "Leaf Blight");

    wait_for_records(&store, 1).await;
    let record = &store.records()[0];
    assert_eq!(record.record.language, Language::En);
    assert_eq!(record.record.disease_name, "Leaf Blight");
    assert_eq!(
        record.record.causes,
        "Prolonged high humidity, Poor air circulation, Infected soil or debris"
    );
}

#[tokio::test]
async fn hindi_request_returns_canned_hindi() {
    let (state, _) = memory_state();
    let body = MultipartBody::analyze_request(sample_jpeg(), Language::Hi);

    let response = post(state, &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let result: AnalysisResult = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(result, canned_result(Language::Hi));
}

#[tokio::test]
async fn response_uses_camel_case_keys() {
    let (state, _) = memory_state();
    let body = MultipartBody::analyze_request(sample_jpeg(), Language::En);

    let response = post(state, &body).await;
    let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();

    for key in ["diseaseName", "description", "causes", "organicTreatment", "chemicalTreatment"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn unknown_or_missing_language_falls_back_to_english() {
    let (state, _) = memory_state();

    let unknown = MultipartBody::new()
        .file("image", "leaf.png", "image/png", sample_png())
        .text("language", "fr");
    let response = post(state.clone(), &unknown).await;
    let result: AnalysisResult = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(result, canned_result(Language::En));

    let missing = MultipartBody::new().file("image", "leaf.png", "image/png", sample_png());
    let response = post(state, &missing).await;
    let result: AnalysisResult = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(result, canned_result(Language::En));
}

#[tokio::test]
async fn missing_image_is_rejected_without_store_write() {
    let (state, store) = memory_state();
    let body = MultipartBody::new().text("language", "hi");

    let response = post(state, &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "message": "No image file uploaded", "field": "image" })
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn image_text_field_is_not_an_upload() {
    let (state, store) = memory_state();
    let body = MultipartBody::new()
        .text("image", "leaf.jpg")
        .text("language", "en");

    let response = post(state, &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "message": "No image file uploaded", "field": "image" })
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn empty_image_is_still_analyzed() {
    let (state, store) = memory_state();
    let body = MultipartBody::new().file("image", "empty.jpg", "image/jpeg", Vec::new());

    let response = post(state, &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    wait_for_records(&store, 1).await;
}

#[tokio::test]
async fn identical_requests_append_twice() {
    let (state, store) = memory_state();
    let body = MultipartBody::analyze_request(sample_jpeg(), Language::Hi);

    let first = post(state.clone(), &body).await;
    let second = post(state, &body).await;
    assert_eq!(first.body(), second.body());

    wait_for_records(&store, 2).await;
    let ids: Vec<u64> = store.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn jsonl_store_receives_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    let store = Arc::new(JsonlStore::open(&path).await.unwrap());
    let state = AppState::new(Arc::new(PlaceholderAnalyzer::instant()), store);

    let response = post(state, &MultipartBody::analyze_request(sample_jpeg(), Language::En)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let appended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let text = tokio::fs::read_to_string(&path).await.unwrap_or_default();
            if text.lines().count() == 1 {
                return text;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert!(appended.contains("\"disease_name\":\"Leaf Blight\""));
}
