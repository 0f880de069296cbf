use crate::helpers::*;
use histora::{Granularity, HistoraError};

#[tokio::test]
async fn symbols_list_rejects_duplicates_and_empty_names() {
    let (builder, _ctl) = scripted(Granularity::Day, 10);
    let histora = builder.end(day(5)).build().unwrap();

    let err = histora.download().symbols(&[BTC, ETH, BTC]).err().unwrap();
    assert!(matches!(err, HistoraError::InvalidArg(ref m) if m.contains("duplicate")));

    let err = histora.download().symbols(&["BTC", " "]).err().unwrap();
    assert!(err.is_validation());

    let err = histora
        .download()
        .add_symbol(ETH)
        .unwrap()
        .add_symbol(ETH)
        .err()
        .unwrap();
    assert!(matches!(err, HistoraError::InvalidArg(_)));
}

#[tokio::test]
async fn run_validates_before_any_provider_call() {
    let (builder, ctl) = scripted(Granularity::Day, 10);
    let histora = builder.build().unwrap();

    let err = histora.download().run().await.unwrap_err();
    assert!(matches!(err, HistoraError::InvalidArg(ref m) if m.contains("no symbols")));

    // end is required
    let err = histora
        .download()
        .symbols(&[BTC])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, HistoraError::InvalidArg(ref m) if m.contains("end")));

    let err = histora
        .download()
        .symbols(&[BTC])
        .unwrap()
        .end(day(3))
        .lookback(0)
        .run()
        .await
        .unwrap_err();
    assert_eq!(err, HistoraError::InvalidLookback(0));

    assert!(ctl.requests().await.is_empty());
}

#[tokio::test]
async fn per_run_overrides_take_precedence() {
    let (builder, ctl) = scripted(Granularity::Day, 10);
    ctl.push_pages(BTC, [page(Granularity::Day, day(7), &[7.0, 8.0, 9.0])])
        .await;
    let histora = builder.lookback(30).end(day(100)).build().unwrap();

    let report = histora
        .download()
        .add_symbol(BTC)
        .unwrap()
        .lookback(2)
        .end(day(9))
        .run()
        .await
        .unwrap();

    let reqs = ctl.requests().await;
    assert_eq!(reqs[0].size, 2);
    assert_eq!(reqs[0].cursor, Some(day(9)));
    assert_eq!(report.table.len(), 3);
}
