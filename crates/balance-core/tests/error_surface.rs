use balance_core::errors::{BalanceError, ErrorInfo};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("coins", 4)
        .with_hint("use an odd coin count")
}

#[test]
fn input_error_surface() {
    let err = BalanceError::Input(sample_info("even-coin-count", "coin count must be odd"));
    assert_eq!(err.code(), "even-coin-count");
    assert_eq!(err.info().context.get("coins").map(String::as_str), Some("4"));
}

#[test]
fn display_lists_context_and_hint() {
    let err = BalanceError::Config(sample_info("config-parse", "bad yaml"));
    let rendered = err.to_string();
    assert_eq!(
        rendered,
        "config error: [config-parse] bad yaml (coins=4); hint: use an odd coin count"
    );
}

#[test]
fn bare_payload_has_no_suffixes() {
    let err = BalanceError::Search(ErrorInfo::new("no-root", "engine has no root"));
    assert_eq!(err.to_string(), "search error: [no-root] engine has no root");
}

#[test]
fn errors_round_trip_through_json() {
    let err = BalanceError::Partition(sample_info("empty-partition", "no parts"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Partition\""));
    let back: BalanceError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, err);
}

#[test]
fn context_entries_render_in_key_order() {
    let info = ErrorInfo::new("stop-depth", "stop depth too small")
        .with_context("stop_depth", 0)
        .with_context("coins", 5);
    assert_eq!(
        BalanceError::Input(info).to_string(),
        "input error: [stop-depth] stop depth too small (coins=5, stop_depth=0)"
    );
}
