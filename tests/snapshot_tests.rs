mod common;

use common::builders::{FakeOcr, button, input_with_placeholder, snapshot, token};
use common::fake_browser::{FakeBrowser, FakePage};
use ui_explorer::browser::driver::BrowserDriver;
use ui_explorer::screen::ocr::{NullOcrEngine, OcrResult};
use ui_explorer::screen::provider::PageSnapshotProvider;
use ui_explorer::screen::screen_model::PageSnapshot;
use ui_explorer::screen::store::SnapshotStore;

const URL: &str = "http://localhost:3001/";

fn todo_browser() -> FakeBrowser {
    let mut browser = FakeBrowser::new().with_page(
        URL,
        FakePage {
            fill_elements: vec![
                input_with_placeholder(1, "Title", 20.0, 40.0),
                button(2, "Add", 240.0, 40.0),
            ],
            candidates: vec![button(2, "Add", 240.0, 40.0)],
            content: "<body>todo</body>".into(),
        },
    );
    browser.navigate(URL).unwrap();
    browser
}

// =========================================================================
// Capture
// =========================================================================

#[test]
fn capture_merges_ocr_and_dom() {
    let mut browser = todo_browser();
    let provider = PageSnapshotProvider::new(
        Box::new(FakeOcr::with_words(&[("Title", 50.0, 20.0), ("Add", 290.0, 60.0)])),
        "shot.png",
    );

    let snap = provider.capture(&mut browser, URL).unwrap();

    assert_eq!(snap.url, URL);
    assert_eq!(snap.ocr_tokens.len(), 2);
    assert_eq!(snap.ocr_tokens[0].text, "Title");
    assert_eq!(snap.text_blocks, vec!["Title".to_string(), "Add".to_string()]);
    assert_eq!(snap.elements.len(), 2);
    assert_eq!(snap.candidates.len(), 1);
    assert!(!snap.is_degraded());
}

#[test]
fn ocr_failure_degrades_to_structural_data() {
    let mut browser = todo_browser();
    let provider = PageSnapshotProvider::new(Box::new(FakeOcr::failing()), "shot.png");

    let snap = provider.capture(&mut browser, URL).unwrap();

    assert!(snap.ocr_tokens.is_empty());
    assert!(snap.text_blocks.is_empty());
    assert!(snap.is_degraded());
    assert_eq!(snap.elements.len(), 2);
}

#[test]
fn screenshot_failure_also_degrades() {
    let mut browser = todo_browser();
    browser.fail_screenshot = true;
    let provider = PageSnapshotProvider::new(
        Box::new(FakeOcr::with_words(&[("Title", 50.0, 20.0)])),
        "shot.png",
    );

    let snap = provider.capture(&mut browser, URL).unwrap();
    assert!(snap.ocr_tokens.is_empty());
    assert_eq!(snap.candidates.len(), 1);
}

#[test]
fn null_engine_yields_nothing() {
    let result = ui_explorer::screen::ocr::OcrEngine::recognize(
        &NullOcrEngine,
        std::path::Path::new("missing.png"),
    )
    .unwrap();
    assert!(result.words.is_empty());
    assert!(result.text_blocks().is_empty());
}

#[test]
fn ocr_response_shape_parses() {
    let json = r#"{
        "text": "Title\n\n  Add task \n",
        "words": [
            {"text": "Title", "bbox": {"x0": 10, "y0": 12, "x1": 60, "y1": 28}, "confidence": 93.5},
            {"text": "  ", "bbox": {"x0": 0, "y0": 0, "x1": 1, "y1": 1}, "confidence": 10}
        ]
    }"#;
    let result: OcrResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.text_blocks(), vec!["Title".to_string(), "Add task".to_string()]);

    let tokens = result.into_tokens();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].bbox.center(), (35.0, 20.0));
}

// =========================================================================
// Persistence
// =========================================================================

#[test]
fn snapshot_json_uses_camel_case_and_skips_candidates() {
    let snap = snapshot(
        vec![token("Title", 50.0, 20.0)],
        vec![input_with_placeholder(1, "Title", 20.0, 40.0)],
        vec![button(2, "Add", 240.0, 40.0)],
    );
    let value = serde_json::to_value(&snap).unwrap();

    assert!(value.get("capturedAt").is_some());
    assert!(value.get("ocrTokens").is_some());
    assert!(value.get("candidates").is_none());
    assert_eq!(value["elements"][0]["boundingBox"]["width"], 200.0);
    assert_eq!(value["elements"][0]["placeholder"], "Title");

    let back: PageSnapshot = serde_json::from_value(value).unwrap();
    assert!(back.candidates.is_empty());
    assert_eq!(back.elements, snap.elements);
}

#[test]
fn store_deduplicates_on_url_and_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("ui-extracted.json"));
    store.reset().unwrap();

    let first = snapshot(vec![], vec![], vec![]);
    let later = PageSnapshot {
        captured_at: first.captured_at + 1,
        ..first.clone()
    };
    let elsewhere = PageSnapshot {
        url: "http://localhost:3001/done".into(),
        ..first.clone()
    };

    assert!(store.append(&first).unwrap());
    assert!(!store.append(&first).unwrap());
    assert!(store.append(&later).unwrap());
    assert!(store.append(&elsewhere).unwrap());
    assert_eq!(store.load().len(), 3);
}

#[test]
fn store_treats_malformed_content_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ui-extracted.json");
    std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();

    let store = SnapshotStore::new(&path);
    assert!(store.load().is_empty());
    assert!(store.append(&snapshot(vec![], vec![], vec![])).unwrap());
    assert_eq!(store.load().len(), 1);
}

#[test]
fn provider_appends_each_capture_to_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path().join("ui-extracted.json"));
    let provider = PageSnapshotProvider::new(Box::new(NullOcrEngine), "shot.png").with_store(store);

    let mut browser = todo_browser();
    provider.capture(&mut browser, URL).unwrap();

    let entries = provider.store().unwrap().load();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["url"], URL);
    assert_eq!(entries[0]["elements"].as_array().unwrap().len(), 2);
}
