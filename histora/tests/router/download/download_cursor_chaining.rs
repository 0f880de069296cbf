use crate::helpers::*;
use std::sync::Arc;

use histora::{Granularity, Histora, QuoteCurrency};

#[tokio::test]
async fn each_call_is_anchored_at_previous_page_earliest() {
    let (builder, ctl) = scripted(Granularity::Hour, 2);
    ctl.push_pages(
        BTC,
        [
            page(Granularity::Hour, hour(8), &[8.0, 9.0, 10.0]),
            page(Granularity::Hour, hour(6), &[6.0, 7.0, 8.0]),
            page(Granularity::Hour, hour(5), &[5.0, 6.0]),
        ],
    )
    .await;
    let histora = builder.lookback(5).end(hour(10)).build().unwrap();

    let report = histora.download().symbols(&[BTC]).unwrap().run().await.unwrap();

    let reqs = ctl.requests_for(BTC).await;
    let sizes: Vec<u32> = reqs.iter().map(|r| r.size).collect();
    let cursors: Vec<_> = reqs.iter().map(|r| r.cursor).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(cursors, vec![Some(hour(10)), Some(hour(8)), Some(hour(6))]);

    // chronological concatenation, boundary duplicates kept
    let series = report.raw.get(BTC).unwrap();
    let hours: Vec<i64> = series
        .records
        .iter()
        .map(|r| (r.time - hour(0)).num_hours())
        .collect();
    assert_eq!(hours, vec![5, 6, 6, 7, 8, 8, 9, 10]);

    let col = report.table.column(BTC).unwrap();
    assert_eq!(
        col.cells,
        vec![Some(5.0), Some(6.0), Some(7.0), Some(8.0), Some(9.0), Some(10.0)]
    );
    assert_eq!(report.table.index().first(), Some(&hour(5)));
    assert_eq!(report.table.index().last(), Some(&hour(10)));

    let trace = &report.traces[0];
    assert_eq!(trace.pages.len(), 3);
    assert_eq!(trace.connector, "scripted");
    assert!(!trace.exhausted);
    assert_eq!(trace.received(), 8);
}

#[tokio::test]
async fn exact_multiple_never_sends_an_empty_page() {
    let (builder, ctl) = scripted(Granularity::Hour, 2);
    ctl.push_pages(
        ETH,
        [
            page(Granularity::Hour, hour(8), &[1.0, 1.0, 1.0]),
            page(Granularity::Hour, hour(6), &[1.0, 1.0, 1.0]),
        ],
    )
    .await;
    let histora = builder.lookback(4).end(hour(10)).build().unwrap();
    histora.download().symbols(&[ETH]).unwrap().run().await.unwrap();

    let sizes: Vec<u32> = ctl.requests().await.iter().map(|r| r.size).collect();
    assert_eq!(sizes, vec![2, 2]);
}

#[tokio::test]
async fn empty_page_stops_pagination_and_marks_trace() {
    let (builder, ctl) = scripted(Granularity::Day, 2);
    ctl.push_pages(
        BTC,
        [
            page(Granularity::Day, day(8), &[8.0, 9.0, 10.0]),
            histora::Page::default(),
        ],
    )
    .await;
    let histora = builder.lookback(6).end(day(10)).build().unwrap();
    let report = histora.download().symbols(&[BTC]).unwrap().run().await.unwrap();

    assert_eq!(ctl.requests().await.len(), 2);
    assert!(report.traces[0].exhausted);
    let col = report.table.column(BTC).unwrap();
    assert_eq!(
        col.cells,
        vec![None, None, None, None, Some(8.0), Some(9.0), Some(10.0)]
    );
}

#[tokio::test]
async fn history_shorter_than_lookback_leaves_leading_gaps() {
    let mock = histora_mock::MockConnector::new(Granularity::Day, QuoteCurrency::Usd)
        .with_page_cap(3)
        .with_listing(day(5));
    let histora = Histora::builder()
        .with_connector(Arc::new(mock.clone()))
        .lookback(10)
        .end(day(10))
        .build()
        .unwrap();

    let report = histora.download().symbols(&[BTC]).unwrap().run().await.unwrap();

    let trace = &report.traces[0];
    // plan is [3, 3, 3, 1]; the third call only sees the listing bar
    assert_eq!(trace.pages.len(), 3);
    assert_eq!(trace.pages[2].received, 1);
    assert!(trace.exhausted);

    let col = report.table.column(BTC).unwrap();
    assert_eq!(col.cells.len(), 11);
    assert!(col.cells[..5].iter().all(Option::is_none));
    for (i, cell) in col.cells.iter().enumerate().skip(5) {
        assert_eq!(*cell, Some(mock.close_at(BTC, day(i as i64))));
    }

    let series = report.raw.get(BTC).unwrap();
    assert_eq!(series.records.first().map(|r| r.time), Some(day(5)));
}

#[tokio::test]
async fn empty_final_page_does_not_mark_trace() {
    let (builder, ctl) = scripted(Granularity::Day, 2);
    ctl.push_pages(
        BTC,
        [
            page(Granularity::Day, day(8), &[8.0, 9.0, 10.0]),
            histora::Page::default(),
        ],
    )
    .await;
    let histora = builder.lookback(4).end(day(10)).build().unwrap();
    let report = histora.download().symbols(&[BTC]).unwrap().run().await.unwrap();

    assert_eq!(ctl.requests().await.len(), 2);
    assert!(!report.traces[0].exhausted);
    assert_eq!(report.traces[0].pages.len(), 2);
}
