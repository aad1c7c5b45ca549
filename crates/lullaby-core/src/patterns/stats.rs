//! Small descriptive statistics over hour and minute samples.

use std::collections::BTreeMap;

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population variance (divides by `n`).
pub(crate) fn population_variance(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    Some(values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64)
}

pub(crate) fn population_std_dev(values: &[f64]) -> Option<f64> {
    population_variance(values).map(f64::sqrt)
}

/// Most frequent value after rounding to whole hours.
///
/// Ties go to the earliest hour.
pub(crate) fn rounded_mode(hours: &[f64]) -> Option<f64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for hour in hours {
        *counts.entry(hour.round() as i64).or_insert(0) += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (hour, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((hour, count));
        }
    }
    best.map(|(hour, _)| hour as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
        assert_eq!(population_variance(&[2.0, 4.0]), Some(1.0));
        assert_eq!(population_std_dev(&[1.0, 1.0, 1.0]), Some(0.0));
    }

    #[test]
    fn test_mode_rounds_and_prefers_earliest() {
        assert_eq!(rounded_mode(&[6.4, 6.6, 7.2]), Some(7.0));
        assert_eq!(rounded_mode(&[6.0, 7.0]), Some(6.0));
        assert_eq!(rounded_mode(&[]), None);
    }
}
