//! Client against a live analysis server on a loopback port

use crop_client::{
    Analyze, ClientError, FileCandidate, HttpAnalyzeClient, NoticeKind, UiPhase, UiState,
    ViewStateMachine, FALLBACK_MESSAGE,
};
use crop_core::{Language, StaticTranslations};
use crop_server::analyzer::canned_result;
use crop_server::{spawn_ephemeral, AppState, PlaceholderAnalyzer};
use crop_store::MemoryStore;
use crop_test_utils::{fixture_dir, sample_jpeg};
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use warp::Filter;

const LIMIT: u64 = 10 * 1024 * 1024;

fn server(delay: Duration) -> (SocketAddr, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Arc::new(PlaceholderAnalyzer::new(delay)), store.clone());
    (spawn_ephemeral(state, LIMIT), store)
}

fn client(addr: SocketAddr) -> HttpAnalyzeClient {
    HttpAnalyzeClient::new(&format!("http://{addr}"), Duration::from_secs(10)).unwrap()
}

fn view(addr: SocketAddr, language: Language) -> ViewStateMachine<HttpAnalyzeClient> {
    ViewStateMachine::new(client(addr), Arc::new(StaticTranslations::new()), language)
}

fn leaf() -> FileCandidate {
    FileCandidate::new("leaf.jpg", "image/jpeg", sample_jpeg())
}

/// Stub server answering every analyze request with `status` and `body`
fn stub(status: u16, body: &'static str) -> SocketAddr {
    let route = warp::path!("api" / "analyze").map(move || {
        warp::reply::with_status(
            body,
            warp::http::StatusCode::from_u16(status).unwrap(),
        )
    });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn leaf_jpg_resolves_to_english_leaf_blight() {
    let (addr, store) = server(Duration::from_millis(200));
    let mut view = view(addr, Language::En);
    let dir = fixture_dir();

    view.select_file(FileCandidate::from_path(dir.path().join("leaf.jpg")).await.unwrap())
        .unwrap();
    let started = Instant::now();
    let state = view.submit().await.unwrap().clone();

    assert!(started.elapsed() >= Duration::from_millis(200));
    let UiState::Resolved(result) = &state else {
        panic!("expected Resolved, got {state:?}");
    };
    assert_eq!(result, &canned_result(Language::En));
    assert_eq!(result.disease_name, "Leaf Blight");
    assert_eq!(result.causes.len(), 3);
    assert_eq!(result.organic_treatment.len(), 3);
    assert_eq!(result.chemical_treatment.len(), 2);

    tokio::time::timeout(Duration::from_secs(5), async {
        while store.is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn hindi_view_gets_hindi_result() {
    let (addr, _) = server(Duration::ZERO);
    let mut view = view(addr, Language::Hi);

    view.select_file(leaf()).unwrap();
    let state = view.submit().await.unwrap();

    assert_eq!(state, &UiState::Resolved(canned_result(Language::Hi)));
}

#[tokio::test]
async fn pdf_drop_is_rejected_locally() {
    let (addr, store) = server(Duration::ZERO);
    let mut view = view(addr, Language::En);
    let dir = fixture_dir();
    let pdf = FileCandidate::new("report.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    let text = FileCandidate::from_path(dir.path().join("notes.txt")).await.unwrap();

    assert!(view.select_dropped(vec![pdf, text]).is_err());

    assert_eq!(view.phase(), UiPhase::Idle);
    assert_eq!(view.take_notices()[0].kind, NoticeKind::NotAnImage);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn connection_refused_keeps_image_for_retry() {
    // Bind then drop a listener so the port is known to be closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut view = view(addr, Language::En);
    view.select_file(leaf()).unwrap();
    let selected = view.selected_image().cloned().unwrap();

    let state = view.submit().await.unwrap().clone();

    assert_eq!(state, UiState::ImageSelected(selected));
    assert_eq!(view.previews().live_count(), 1);
    let notices = view.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::RequestFailed);
    assert!(!notices[0].description.is_empty());
}

#[tokio::test]
async fn reset_after_result_releases_preview() {
    let (addr, _) = server(Duration::ZERO);
    let mut view = view(addr, Language::En);
    view.select_file(leaf()).unwrap();
    view.submit().await.unwrap();
    assert_eq!(view.phase(), UiPhase::Resolved);

    view.reset().unwrap();

    assert_eq!(view.state(), &UiState::Idle);
    assert!(view.selected_image().is_none());
    assert_eq!(view.previews().live_count(), 0);
}

#[tokio::test]
async fn error_status_carries_body_text() {
    let addr = stub(400, r#"{"message":"No image file uploaded","field":"image"}"#);
    let mut capture = crop_client::ImageCapture::new(Arc::new(crop_client::PreviewRegistry::new()));
    let crop_client::CaptureEvent::ImageSelected(image) = capture.select_file(leaf()).unwrap() else {
        panic!("expected a selection");
    };

    let err = client(addr).analyze(&image, Language::En).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::RequestFailed(r#"{"message":"No image file uploaded","field":"image"}"#.to_string())
    );
}

#[tokio::test]
async fn empty_error_body_uses_fallback() {
    let addr = stub(500, "");
    let mut capture = crop_client::ImageCapture::new(Arc::new(crop_client::PreviewRegistry::new()));
    let crop_client::CaptureEvent::ImageSelected(image) = capture.select_file(leaf()).unwrap() else {
        panic!("expected a selection");
    };

    let err = client(addr).analyze(&image, Language::En).await.unwrap_err();

    assert_eq!(err, ClientError::RequestFailed(FALLBACK_MESSAGE.to_string()));
}

#[tokio::test]
async fn partial_body_is_malformed() {
    let addr = stub(200, r#"{"diseaseName":"Leaf Blight","description":"x","causes":["a"],"organicTreatment":[1]}"#);
    let mut view = view(addr, Language::En);
    view.select_file(leaf()).unwrap();

    let outcome = client(addr)
        .analyze(view.selected_image().unwrap(), Language::En)
        .await;
    assert!(matches!(outcome, Err(ClientError::MalformedResponse(_))));

    view.submit().await.unwrap();
    assert_eq!(view.phase(), UiPhase::ImageSelected);
    assert_eq!(view.take_notices()[0].description, FALLBACK_MESSAGE);
}
