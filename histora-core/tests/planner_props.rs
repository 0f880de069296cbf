use chrono::{DateTime, Utc};
use histora_core::{Granularity, plan};
use proptest::prelude::*;

fn end() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn arb_granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![
        Just(Granularity::Minute),
        Just(Granularity::Hour),
        Just(Granularity::Day),
    ]
}

proptest! {
    #[test]
    fn sizes_cover_lookback_exactly(
        g in arb_granularity(),
        lookback in 1u32..20_000,
        cap in 1u32..3_000,
    ) {
        let p = plan(g, lookback, end(), cap).unwrap();
        let sizes = p.sizes();

        prop_assert_eq!(p.total(), u64::from(lookback));
        prop_assert!(sizes.iter().all(|s| *s > 0 && *s <= cap));
        prop_assert_eq!(sizes.len() as u32, lookback.div_ceil(cap));
        // only the last page may be short
        prop_assert!(sizes[..sizes.len() - 1].iter().all(|s| *s == cap));
    }

    #[test]
    fn window_start_is_lookback_ticks_before_end(
        g in arb_granularity(),
        lookback in 1u32..100_000,
    ) {
        let p = plan(g, lookback, end(), 2000).unwrap();
        let span = (p.window.end() - p.window.start()).num_seconds();
        prop_assert_eq!(span, g.seconds() * i64::from(lookback));
        prop_assert_eq!(p.anchor, Some(end()));
    }
}
