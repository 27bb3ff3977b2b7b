//! Build-order output.

use serde::Serialize;

use planner_core::economy::Tick;
use planner_core::node::{BuildOrder, BuildStep};
use planner_core::search::{SearchStats, Solution};

use crate::error::CliError;

/// Render a tick count as `[Mm Ss Tt]`.
#[must_use]
pub fn format_timestamp(ticks: Tick, ticks_per_second: Tick) -> String {
    let per_minute = ticks_per_second * 60;
    let minutes = ticks / per_minute;
    let seconds = (ticks % per_minute) / ticks_per_second;
    let rest = ticks % ticks_per_second;
    format!("[{minutes}m {seconds}s {rest}t]")
}

/// One build-order line: `[Mm Ss Tt] <label> LC: X QP: Y`.
#[must_use]
pub fn format_step(step: &BuildStep, ticks_per_second: Tick) -> String {
    format!(
        "{} {} LC: {} QP: {}",
        format_timestamp(step.elapsed, ticks_per_second),
        step.label,
        step.lc,
        step.qp
    )
}

/// The whole build order, one line per step.
#[must_use]
pub fn format_text(order: &BuildOrder, ticks_per_second: Tick) -> String {
    order
        .steps()
        .iter()
        .map(|step| format_step(step, ticks_per_second) + "\n")
        .collect()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total_ticks: Tick,
    ticks_per_second: Tick,
    steps: &'a [BuildStep],
    stats: SearchStats,
}

/// The solution as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CliError::Json`] if serialization fails.
pub fn format_json(solution: &Solution, ticks_per_second: Tick) -> Result<String, CliError> {
    let report = JsonReport {
        total_ticks: solution.total_time(),
        ticks_per_second,
        steps: solution.build_order.steps(),
        stats: solution.stats,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_splits_ticks() {
        assert_eq!(format_timestamp(0, 18), "[0m 0s 0t]");
        assert_eq!(format_timestamp(268, 18), "[0m 14s 16t]");
        assert_eq!(format_timestamp(18 * 60 + 18 + 1, 18), "[1m 1s 1t]");
        assert_eq!(format_timestamp(18 * 60 * 12, 18), "[12m 0s 0t]");
    }
}
