//! Tracker command - weekly metric trends.

use vitalsync_core::{seed, HealthMetric, MetricSummary};

pub(crate) fn run() -> miette::Result<()> {
    print_series("Weight", "kg", &seed::weight_series());
    println!();
    print_series("Sleep", "h", &seed::sleep_series());
    Ok(())
}

fn print_series(name: &str, unit: &str, series: &[HealthMetric]) {
    println!("{} (last {} days)", name, series.len());
    for m in series {
        println!("  {:<4} {:>6.1} {}", m.date, m.value, unit);
    }

    if let Some(summary) = MetricSummary::of(series) {
        println!(
            "  latest {:.1} {unit}, range {:.1}-{:.1}, mean {:.1}, change {:+.1}",
            summary.latest, summary.min, summary.max, summary.mean, summary.change
        );
    }
}
