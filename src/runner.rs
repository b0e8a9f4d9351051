use crate::aggregator::{Aggregator, Report};
use crate::settings::Settings;
use crate::summary::SummaryGenerator;
use digest_api::client::ScoreboardApi;
use log::info;
use std::io::{self, Write};

/// One pass: every scoreboard fetch, then a single summary, then one
/// block of text on `out`. Only a failing writer is an error.
pub async fn run<W: Write>(settings: &Settings, out: &mut W) -> io::Result<Report> {
    let scoreboards = ScoreboardApi::new(&settings.scoreboard_url, settings.scoreboard_timeout);
    let mut report = Aggregator::new(&scoreboards).aggregate().await;
    debug_assert!(report.is_complete());

    let failed = [&report.today, &report.yesterday]
        .iter()
        .flat_map(|day| day.leagues.values())
        .filter(|result| result.is_err())
        .count();
    info!("collected scoreboards for {} and {} ({failed} failed)", report.today.date, report.yesterday.date);

    report.summary = SummaryGenerator::new(settings).summarize(&report).await;

    writeln!(out, "{}", report.summary)?;
    out.flush()?;
    Ok(report)
}
