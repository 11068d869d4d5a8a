//! Interval and window speed computation.
//!
//! A window of `n` samples has `n - 1` intervals. Each interval speed is the
//! height change divided by the elapsed time in seconds, and the window speed
//! is the arithmetic mean of the interval speeds. Averaging over every
//! interval spreads the per-frame position jitter across the window instead
//! of relying on the two endpoint readings.

use serde::{Deserialize, Serialize};

use crate::sample::Sample;
use crate::{Error, Result};

/// What to do with an interval whose elapsed time is not strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimingPolicy {
    /// Leave degenerate intervals out of the average. Fails only when no
    /// interval is usable.
    #[default]
    ExcludeDegenerate,
    /// Fail the whole window on the first degenerate interval.
    Fail,
}

/// Average speed of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpeed {
    /// Mean of the usable interval speeds in meters per second.
    pub average_mps: f64,
    /// Number of intervals left out of the average.
    pub excluded: usize,
}

/// Speed between two samples in meters per second.
///
/// Returns `None` when the elapsed time is zero, negative or not finite, or
/// when the quotient itself is not finite.
pub fn interval_speed(from: &Sample, to: &Sample) -> Option<f64> {
    let elapsed_ms = to.timestamp_ms - from.timestamp_ms;
    if !(elapsed_ms > 0.0 && elapsed_ms.is_finite()) {
        return None;
    }
    let speed = (to.vertical_position_m - from.vertical_position_m) / (elapsed_ms / 1000.0);
    speed.is_finite().then_some(speed)
}

/// Mean interval speed over a window of samples.
///
/// `speeds` is a caller-owned work buffer; on success it holds the interval
/// speeds that went into the average, in temporal order.
///
/// # Errors
/// * `Error::InvalidSample` if fewer than two samples are given
/// * `Error::DegenerateTiming` per `policy`
pub fn average_interval_speed(
    samples: &[Sample],
    policy: TimingPolicy,
    speeds: &mut Vec<f64>,
) -> Result<WindowSpeed> {
    speeds.clear();

    if samples.len() < 2 {
        return Err(Error::InvalidSample(format!(
            "a speed needs at least 2 samples, got {}",
            samples.len()
        )));
    }

    let mut first_degenerate: Option<(usize, f64)> = None;
    let mut excluded = 0;

    for (interval, pair) in samples.windows(2).enumerate() {
        match interval_speed(&pair[0], &pair[1]) {
            Some(speed) => speeds.push(speed),
            None => {
                let elapsed_ms = pair[1].timestamp_ms - pair[0].timestamp_ms;
                if policy == TimingPolicy::Fail {
                    return Err(Error::DegenerateTiming { interval, elapsed_ms });
                }
                first_degenerate.get_or_insert((interval, elapsed_ms));
                excluded += 1;
            }
        }
    }

    if speeds.is_empty() {
        let (interval, elapsed_ms) = first_degenerate.unwrap_or((0, 0.0));
        return Err(Error::DegenerateTiming { interval, elapsed_ms });
    }

    let average_mps = speeds.iter().sum::<f64>() / speeds.len() as f64;

    Ok(WindowSpeed { average_mps, excluded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window(points: &[(f64, f64)]) -> Vec<Sample> {
        points.iter().map(|&(t, y)| Sample::new(t, y)).collect()
    }

    #[test]
    fn test_interval_speed() {
        let speed = interval_speed(&Sample::new(0.0, 1.0), &Sample::new(250.0, 1.5)).unwrap();
        assert_relative_eq!(speed, 2.0, epsilon = 1e-12);

        let down = interval_speed(&Sample::new(0.0, 1.5), &Sample::new(500.0, 1.0)).unwrap();
        assert_relative_eq!(down, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interval_speed_degenerate() {
        assert!(interval_speed(&Sample::new(100.0, 1.0), &Sample::new(100.0, 1.2)).is_none());
        assert!(interval_speed(&Sample::new(100.0, 1.0), &Sample::new(90.0, 1.2)).is_none());
        assert!(interval_speed(&Sample::new(0.0, 1.0), &Sample::new(f64::INFINITY, 1.2)).is_none());
        assert!(interval_speed(&Sample::new(0.0, 1.0), &Sample::new(f64::MIN_POSITIVE, 1e300)).is_none());
    }

    #[test]
    fn test_uniform_motion_average() {
        let samples = window(&[(0.0, 0.0), (100.0, 0.10), (200.0, 0.20)]);
        let mut speeds = Vec::new();
        let result = average_interval_speed(&samples, TimingPolicy::ExcludeDegenerate, &mut speeds).unwrap();

        assert_relative_eq!(result.average_mps, 1.0, epsilon = 1e-12);
        assert_eq!(result.excluded, 0);
        assert_eq!(speeds.len(), 2);
        assert_relative_eq!(speeds[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(speeds[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_accelerating_motion_average() {
        let samples = window(&[(0.0, 0.0), (100.0, 0.05), (200.0, 0.20)]);
        let mut speeds = Vec::new();
        let result = average_interval_speed(&samples, TimingPolicy::Fail, &mut speeds).unwrap();

        assert_relative_eq!(speeds[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(speeds[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(result.average_mps, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exclude_policy_skips_duplicate_timestamp() {
        let samples = window(&[(0.0, 0.0), (100.0, 0.10), (100.0, 0.12), (200.0, 0.42)]);
        let mut speeds = Vec::new();
        let result = average_interval_speed(&samples, TimingPolicy::ExcludeDegenerate, &mut speeds).unwrap();

        // 1.0 m/s and 3.0 m/s survive, the zero-length middle interval does not
        assert_eq!(result.excluded, 1);
        assert_eq!(speeds.len(), 2);
        assert_relative_eq!(result.average_mps, 2.0, epsilon = 1e-12);
        assert!(result.average_mps.is_finite());
    }

    #[test]
    fn test_exclude_policy_all_degenerate() {
        let samples = window(&[(50.0, 0.0), (50.0, 0.1), (50.0, 0.2)]);
        let mut speeds = Vec::new();
        let err = average_interval_speed(&samples, TimingPolicy::ExcludeDegenerate, &mut speeds).unwrap_err();

        match err {
            Error::DegenerateTiming { interval, elapsed_ms } => {
                assert_eq!(interval, 0);
                assert_eq!(elapsed_ms, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(speeds.is_empty());
    }

    #[test]
    fn test_fail_policy_reports_interval() {
        let samples = window(&[(0.0, 0.0), (100.0, 0.1), (100.0, 0.2)]);
        let mut speeds = Vec::new();
        let err = average_interval_speed(&samples, TimingPolicy::Fail, &mut speeds).unwrap_err();

        assert!(matches!(err, Error::DegenerateTiming { interval: 1, .. }));
    }

    #[test]
    fn test_too_few_samples() {
        let mut speeds = Vec::new();
        let err = average_interval_speed(&window(&[(0.0, 0.0)]), TimingPolicy::Fail, &mut speeds);
        assert!(matches!(err, Err(Error::InvalidSample(_))));
    }

    #[test]
    fn test_work_buffer_is_cleared() {
        let mut speeds = vec![99.0; 5];
        let samples = window(&[(0.0, 0.0), (1000.0, 2.0)]);
        average_interval_speed(&samples, TimingPolicy::Fail, &mut speeds).unwrap();

        assert_eq!(speeds, vec![2.0]);
    }
}
