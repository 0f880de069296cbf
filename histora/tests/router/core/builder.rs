use crate::helpers::*;
use histora::{Granularity, Histora, HistoraConfig, HistoraError};

#[test]
fn build_requires_a_connector() {
    let err = Histora::builder().build().err().unwrap();
    assert!(matches!(err, HistoraError::InvalidArg(ref m) if m.contains("connector")));
}

#[test]
fn build_rejects_degenerate_settings() {
    let (b, _) = scripted(Granularity::Day, 10);
    assert_eq!(
        b.lookback(0).build().err().unwrap(),
        HistoraError::InvalidLookback(0)
    );

    let (b, _) = scripted(Granularity::Day, 10);
    assert!(b.concurrency(0).build().err().unwrap().is_validation());

    let (b, _) = scripted(Granularity::Day, 10);
    assert!(b.page_cap(0).build().err().unwrap().is_validation());
}

#[test]
fn page_cap_override_is_clamped_to_connector_cap() {
    let (b, _) = scripted(Granularity::Hour, 2000);
    let histora = b.page_cap(5000).build().unwrap();
    assert_eq!(histora.effective_page_cap(), 2000);

    let (b, _) = scripted(Granularity::Hour, 2000);
    let histora = b.page_cap(500).build().unwrap();
    assert_eq!(histora.effective_page_cap(), 500);

    let plan = histora.plan(1200, hour(2000)).unwrap();
    assert_eq!(plan.sizes(), vec![500, 500, 200]);
    assert_eq!(plan.window.granularity(), Granularity::Hour);
}

#[test]
fn config_can_be_loaded_wholesale() {
    let cfg: HistoraConfig = serde_json::from_str(
        r#"{
            "lookback": 90,
            "end": "2024-03-01T00:00:00Z",
            "page_cap": null,
            "concurrency": 2,
            "failure_policy": "Continue",
            "gap_policy": "Mark",
            "provider_timeout": null
        }"#,
    )
    .unwrap();
    let (b, _) = scripted(Granularity::Day, 2000);
    let histora = b.config(cfg).build().unwrap();
    assert_eq!(histora.config().lookback, 90);
    assert_eq!(histora.config().concurrency, 2);
    assert_eq!(histora.config().end, Some(dt(2024, 3, 1, 0, 0, 0)));
}
