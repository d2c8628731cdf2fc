use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use dirsift_core::schedule::EventLoop;
use dirsift_wasm::{default_config, resolve_config, BrowserLoop, DirectoryExplorer};

wasm_bindgen_test_configure!(run_in_browser);

const COMPANIES: &str = r#"[
    {"company_name": "Acme", "tags": ["ev"]},
    {"company_name": "Beta", "tags": ["ev", "fast"]},
    "not a record"
]"#;

fn explorer() -> DirectoryExplorer {
    let noop = js_sys::Function::new_no_args("");
    DirectoryExplorer::new(noop.clone(), noop, None).expect("explorer")
}

#[wasm_bindgen_test]
fn loads_and_filters() {
    #[cfg(target_arch = "wasm32")]
    dirsift_wasm::start();

    let explorer = explorer();
    let loaded = explorer.load_json(COMPANIES, r#"["Beta"]"#).unwrap();
    assert_eq!(loaded, 2, "non-object entries are skipped");

    assert!(explorer.toggle_tag("fast"));
    assert_eq!(explorer.result_ids(), vec![1]);

    assert!(!explorer.toggle_tag("fast"));
    assert_eq!(explorer.result_ids(), vec![1, 0], "popular first");
    assert!(explorer.is_popular("beta"));
    explorer.dispose();
}

#[wasm_bindgen_test]
fn config_defaults_fill_in() {
    let partial = js_sys::JSON::parse(r#"{"rendering":{"batch_size":5}}"#).unwrap();
    let resolved = resolve_config(partial).unwrap();
    let search = js_sys::Reflect::get(&resolved, &JsValue::from_str("search")).unwrap();
    let min_len = js_sys::Reflect::get(&search, &JsValue::from_str("min_len")).unwrap();
    assert_eq!(min_len.as_f64(), Some(2.0));
    assert!(default_config().is_object());
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    let bad = js_sys::JSON::parse(r#"{"search":{"min_len":0}}"#).unwrap();
    assert!(resolve_config(bad).is_err());
}

#[wasm_bindgen_test]
fn cancel_disarms_browser_callbacks() {
    let ev = BrowserLoop::new().unwrap();
    let timeout = ev.set_timeout(10_000, Box::new(|| panic!("cancelled timeout ran")));
    let frame = ev.request_frame(Box::new(|| panic!("cancelled frame ran")));
    assert_eq!(ev.pending_count(), 2);

    ev.cancel(timeout);
    ev.cancel(frame);
    assert_eq!(ev.pending_count(), 0);

    // Unknown IDs are ignored.
    ev.cancel(timeout);
    assert_eq!(ev.pending_count(), 0);
}

