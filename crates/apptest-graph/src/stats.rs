//! Geometry helpers for plots: trend line, histogram bins, quartiles

/// Least-squares fit `y = slope * x + intercept` over sample index
#[allow(clippy::cast_precision_loss)]
pub(crate) fn linear_fit(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    if samples.len() < 2 {
        return (0.0, samples.first().copied().unwrap_or(0.0));
    }

    let mean_x = (n - 1.0) / 2.0;
    let mean_y = samples.iter().sum::<f64>() / n;

    let (num, den) = samples
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });

    let slope = num / den;
    (slope, mean_y - slope * mean_x)
}

/// Closed value range, widened when degenerate
pub(crate) fn padded_range(samples: &[f64]) -> (f64, f64) {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Equal-width histogram: `(lower edge, upper edge, count)` per bin
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(crate) fn histogram(samples: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    let bins = bins.max(1);
    let (lo, hi) = padded_range(samples);
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &s in samples {
        let idx = ((s - lo) / width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = lo + width * i as f64;
            (start, start + width, count)
        })
        .collect()
}

/// Five-number summary for a box plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Quartiles {
    pub(crate) min: f64,
    pub(crate) q1: f64,
    pub(crate) median: f64,
    pub(crate) q3: f64,
    pub(crate) max: f64,
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(crate) fn quartiles(samples: &[f64]) -> Quartiles {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let at = |p: f64| {
        let rank = p * (sorted.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
    };

    Quartiles {
        min: sorted[0],
        q1: at(0.25),
        median: at(0.5),
        q3: at(0.75),
        max: sorted[sorted.len() - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fit_exact_line() {
        let (slope, intercept) = linear_fit(&[1.0, 3.0, 5.0, 7.0]);
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_fit_single_sample() {
        assert_eq!(linear_fit(&[0.4]), (0.0, 0.4));
    }

    #[test]
    fn histogram_counts_all_samples() {
        let samples = [0.1, 0.2, 0.2, 0.5, 0.9];
        let bins = histogram(&samples, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), samples.len());
    }

    #[test]
    fn padded_range_degenerate() {
        assert_eq!(padded_range(&[2.0, 2.0]), (1.5, 2.5));
    }

    #[test]
    fn quartiles_of_five() {
        let q = quartiles(&[5.0, 1.0, 3.0, 2.0, 4.0]);
        assert_eq!(q.min, 1.0);
        assert_eq!(q.q1, 2.0);
        assert_eq!(q.median, 3.0);
        assert_eq!(q.q3, 4.0);
        assert_eq!(q.max, 5.0);
    }
}
