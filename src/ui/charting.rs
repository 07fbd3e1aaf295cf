use itertools::Itertools;
use typesprint::time_series::TimeSeriesPoint;

/// X (seconds) and Y (wpm) upper bounds for the results chart.
///
/// Timed sessions always span the whole limit so runs of the same length
/// line up; untimed ones stretch to the last sample.
pub fn compute_chart_params(points: &[TimeSeriesPoint], limit_seconds: Option<u64>) -> (f64, f64) {
    let highest_wpm = points
        .iter()
        .map(|p| p.wpm)
        .minmax()
        .into_option()
        .map_or(0.0, |(_, max)| max);

    let last_sample = points.last().map_or(0.0, |p| p.t);
    let overall_duration = limit_seconds
        .map_or(last_sample, |limit| (limit as f64).max(last_sample))
        .max(1.0);

    (overall_duration, highest_wpm.round())
}

pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
