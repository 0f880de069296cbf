use proptest::prelude::*;

use crate::helpers::*;
use histora::Granularity;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn paging_covers_the_whole_calendar(lookback in 1u32..400, cap in 1u32..60) {
        let histora = mock_histora(Granularity::Hour, cap, lookback, hour(10_000));
        let report = tokio_test::block_on(async move {
            histora.download().symbols(&[BTC]).unwrap().run().await.unwrap()
        });

        let trace = &report.traces[0];
        prop_assert_eq!(trace.pages.len() as u32, lookback.div_ceil(cap));
        prop_assert!(trace.pages.iter().all(|p| p.requested >= 1 && p.requested <= cap));
        prop_assert_eq!(
            trace.pages.iter().map(|p| u64::from(p.requested)).sum::<u64>(),
            u64::from(lookback)
        );
        prop_assert_eq!(report.table.len(), lookback as usize + 1);
        prop_assert_eq!(report.table.column(BTC).unwrap().first_gap(), None);
    }
}
