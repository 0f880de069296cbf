//! Fetch history for a list of symbols and write raw and aligned files.
//!
//! Usage: `fetch_to_csv [RAW_OUT] [ALIGNED_OUT]` (defaults `raw.csv`, `aligned.csv`).
//! Both paths must share an extension: `.csv` or `.json`.

use histora::{FailurePolicy, Histora, HistorySink, open_sink};
use histora_demos::common::{DemoSettings, get_connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,histora=debug,histora_cryptocompare=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let mut args = std::env::args().skip(1);
    let raw_out = args.next().unwrap_or_else(|| "raw.csv".into());
    let aligned_out = args.next().unwrap_or_else(|| "aligned.csv".into());
    // Fail on bad output paths before touching the network
    let sink = open_sink(&raw_out, &aligned_out)?;

    let settings = DemoSettings::from_env()?;
    let (connector, end) = get_connector(&settings)?;

    let histora = Histora::builder()
        .with_connector(connector)
        .lookback(settings.lookback)
        .end(end)
        .failure_policy(FailurePolicy::Continue)
        .build()?;

    let report = histora
        .download()
        .symbols(settings.symbols.as_slice())?
        .run()
        .await?;

    for f in &report.failures {
        tracing::warn!(symbol = %f.symbol, error = %f.error, "skipped");
    }
    for t in &report.traces {
        println!(
            "{}: {} calls, {} records{}",
            t.symbol,
            t.pages.len(),
            t.received(),
            if t.exhausted { " (history exhausted)" } else { "" }
        );
    }

    sink.write_report(&report)?;
    println!(
        "wrote {} rows x {} symbols to {aligned_out} and raw records to {raw_out}",
        report.table.len(),
        report.table.columns().len()
    );
    Ok(())
}
