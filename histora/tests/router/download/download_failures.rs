use std::time::Duration;

use crate::helpers::*;
use histora::{FailurePolicy, Granularity, HistoraError};
use histora_mock::MockBehavior;

#[tokio::test]
async fn provider_error_mid_chain_fails_the_run_with_its_message() {
    let (builder, ctl) = scripted(Granularity::Day, 2);
    let boom = HistoraError::provider("scripted", BTC, "You are over your rate limit");
    ctl.push(
        BTC,
        MockBehavior::Return(page(Granularity::Day, day(8), &[8.0, 9.0, 10.0])),
    )
    .await;
    ctl.push(BTC, MockBehavior::Fail(boom.clone())).await;
    ctl.push_pages(BTC, [page(Granularity::Day, day(4), &[4.0, 5.0, 6.0])])
        .await;

    let histora = builder.lookback(6).end(day(10)).build().unwrap();
    let err = histora
        .download()
        .symbols(&[BTC])
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(err, boom);
    // not retried, no further pages requested
    assert_eq!(ctl.requests().await.len(), 2);
    assert_eq!(ctl.remaining(BTC).await, 1);
}

#[tokio::test]
async fn abort_run_stops_before_later_symbols() {
    let (builder, ctl) = scripted(Granularity::Day, 10);
    ctl.push_pages(BTC, [page(Granularity::Day, day(1), &[1.0, 2.0])])
        .await;
    ctl.push(
        ETH,
        MockBehavior::Fail(HistoraError::provider("scripted", ETH, "unknown symbol")),
    )
    .await;
    ctl.push_pages(LTC, [page(Granularity::Day, day(1), &[1.0, 2.0])])
        .await;

    let histora = builder.lookback(1).end(day(2)).build().unwrap();
    let err = histora
        .download()
        .symbols(&[BTC, ETH, LTC])
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.symbol(), Some(ETH));
    assert!(ctl.requests_for(LTC).await.is_empty());
}

#[tokio::test]
async fn continue_policy_keeps_successful_columns() {
    let (builder, ctl) = scripted(Granularity::Day, 10);
    ctl.push_pages(BTC, [page(Granularity::Day, day(1), &[1.0, 2.0])])
        .await;
    ctl.push(
        ETH,
        MockBehavior::Fail(HistoraError::provider("scripted", ETH, "unknown symbol")),
    )
    .await;
    ctl.push_pages(LTC, [page(Granularity::Day, day(1), &[3.0, 4.0])])
        .await;

    let histora = builder
        .lookback(1)
        .end(day(2))
        .failure_policy(FailurePolicy::Continue)
        .build()
        .unwrap();
    let report = histora
        .download()
        .symbols(&[BTC, ETH, LTC])
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.table.symbols().collect::<Vec<_>>(), vec![BTC, LTC]);
    assert_eq!(report.raw.symbols().collect::<Vec<_>>(), vec![BTC, LTC]);
    assert_eq!(report.failed_symbols().collect::<Vec<_>>(), vec![ETH]);
    assert!(report.table.column(ETH).is_none());
    assert_eq!(report.table.column(LTC).unwrap().cells, vec![Some(3.0), Some(4.0)]);
}

#[tokio::test]
async fn continue_policy_with_every_symbol_failing_is_an_error() {
    let (builder, ctl) = scripted(Granularity::Day, 10);
    for s in [BTC, ETH] {
        ctl.push(
            s,
            MockBehavior::Fail(HistoraError::provider("scripted", s, "down")),
        )
        .await;
    }
    let histora = builder
        .lookback(1)
        .end(day(2))
        .failure_policy(FailurePolicy::Continue)
        .build()
        .unwrap();
    let err = histora
        .download()
        .symbols(&[BTC, ETH])
        .unwrap()
        .run()
        .await
        .unwrap_err();

    let parts = err.flatten();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].symbol(), Some(BTC));
    assert_eq!(parts[1].symbol(), Some(ETH));
}

#[tokio::test]
async fn page_newer_than_previous_is_a_data_error() {
    let (builder, ctl) = scripted(Granularity::Day, 2);
    ctl.push_pages(
        BTC,
        [
            page(Granularity::Day, day(8), &[8.0, 9.0, 10.0]),
            page(Granularity::Day, day(9), &[9.0, 10.0]),
        ],
    )
    .await;
    let histora = builder.lookback(4).end(day(10)).build().unwrap();
    let err = histora
        .download()
        .symbols(&[BTC])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, HistoraError::Data(_)));
}

#[tokio::test(start_paused = true)]
async fn stalled_call_maps_to_provider_timeout() {
    let (builder, ctl) = scripted(Granularity::Day, 10);
    ctl.push(BTC, MockBehavior::Hang).await;
    let histora = builder
        .lookback(1)
        .end(day(2))
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = histora
        .download()
        .symbols(&[BTC])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert_eq!(err, HistoraError::provider_timeout("scripted", BTC));
}
