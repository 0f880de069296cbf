use crate::helpers::*;
use histora::{GapPolicy, Granularity, HistoraError};

#[tokio::test]
async fn missing_days_are_forward_filled() {
    let (builder, ctl) = scripted(Granularity::Day, 2000);
    ctl.push_pages(
        BTC,
        [page_at(&[(day(1), 1.0), (day(3), 3.0), (day(5), 5.0)])],
    )
    .await;
    let histora = builder.lookback(4).end(day(5)).build().unwrap();
    let report = histora.download().symbols(&[BTC]).unwrap().run().await.unwrap();

    assert_eq!(report.table.len(), 5);
    assert_eq!(
        report.table.column(BTC).unwrap().cells,
        vec![Some(1.0), Some(1.0), Some(3.0), Some(3.0), Some(5.0)]
    );
}

#[tokio::test]
async fn leading_gap_is_unpopulated_not_zero() {
    let (builder, ctl) = scripted(Granularity::Day, 2000);
    ctl.push_pages(BTC, [page_at(&[(day(3), 3.0), (day(5), 5.0)])])
        .await;
    let histora = builder.lookback(4).end(day(5)).build().unwrap();
    let report = histora.download().symbols(&[BTC]).unwrap().run().await.unwrap();

    let col = report.table.column(BTC).unwrap();
    assert_eq!(col.cells, vec![None, None, Some(3.0), Some(3.0), Some(5.0)]);
    assert_eq!(report.table.cell(BTC, day(1)), Some(None));
    assert!(matches!(
        report.table.require_complete(),
        Err(HistoraError::DataGap { .. })
    ));
}

#[tokio::test]
async fn reject_policy_fails_on_leading_gap() {
    let (builder, ctl) = scripted(Granularity::Day, 2000);
    ctl.push_pages(BTC, [page_at(&[(day(3), 3.0), (day(5), 5.0)])])
        .await;
    let histora = builder
        .lookback(4)
        .end(day(5))
        .gap_policy(GapPolicy::Reject)
        .build()
        .unwrap();
    let err = histora
        .download()
        .symbols(&[BTC])
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert_eq!(
        err,
        HistoraError::DataGap {
            symbol: BTC.into(),
            at: day(1)
        }
    );
}

#[tokio::test]
async fn intraday_end_is_floored_onto_the_daily_grid() {
    let (builder, ctl) = scripted(Granularity::Day, 2000);
    ctl.push_pages(
        BTC,
        [page_at(&[(day(1), 1.0), (day(2), 2.0), (day(3), 3.0)])],
    )
    .await;
    let end = day(3) + chrono::TimeDelta::hours(15);
    let histora = builder.lookback(2).end(end).build().unwrap();
    let report = histora.download().symbols(&[BTC]).unwrap().run().await.unwrap();

    assert_eq!(report.table.index(), &[day(1), day(2), day(3)]);
    // the cursor itself is passed through unfloored
    assert_eq!(ctl.requests().await[0].cursor, Some(end));
}
