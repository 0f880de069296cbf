use crate::helpers::*;
use histora::{Granularity, HistoryProvider};
use histora_mock::MockConnector;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn columns_follow_request_order_regardless_of_concurrency() {
    let symbols = [LTC, BTC, ETH, "XRP", "DOGE"];
    let sequential = mock_histora(Granularity::Hour, 50, 120, hour(500));
    let concurrent = {
        let mock = MockConnector::new(Granularity::Hour, histora::QuoteCurrency::Usd)
            .with_page_cap(50);
        histora::Histora::builder()
            .with_connector(std::sync::Arc::new(mock))
            .lookback(120)
            .end(hour(500))
            .concurrency(3)
            .build()
            .unwrap()
    };

    let a = sequential.download().symbols(&symbols).unwrap().run().await.unwrap();
    let b = concurrent.download().symbols(&symbols).unwrap().run().await.unwrap();

    assert_eq!(a.table.symbols().collect::<Vec<_>>(), symbols.to_vec());
    assert_eq!(a, b);
}

#[tokio::test]
async fn mock_values_land_in_matching_cells() {
    let histora = mock_histora(Granularity::Day, 7, 20, day(40));
    let report = histora
        .download()
        .symbols(&[BTC, ETH])
        .unwrap()
        .run()
        .await
        .unwrap();

    let mock = MockConnector::new(Granularity::Day, histora::QuoteCurrency::Usd);
    for sym in [BTC, ETH] {
        for (i, at) in report.table.index().iter().enumerate() {
            let cell = report.table.column(sym).unwrap().cells[i];
            assert_eq!(cell, Some(mock.close_at(sym, *at)), "{sym} at {at}");
        }
    }
    assert_eq!(report.table.len(), 21);
    // 20 ticks at 7 per page
    assert_eq!(report.traces[0].pages.len(), 3);
    assert_eq!(histora.connector().page_cap(), 7);
}
