//! Statistical helper functions for the cauce analysis crates.
//!
//! Missing values are represented as `NaN` throughout the workspace. The
//! plain helpers (`mean`, `variance`, `sd`) expect clean input; use
//! [`finite_values`] or the `nan_*` variants when the data may contain gaps.

use statrs::distribution::{ContinuousCDF, Normal};

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator (matching R's `var()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator (matching R's `sd()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Standard deviation with `N - ddof` denominator.
///
/// `ddof = 0` is the population form, `ddof = 1` the sample form.
/// Returns 0.0 when `N <= ddof`.
pub fn sd_ddof(data: &[f64], ddof: usize) -> f64 {
    let n = data.len();
    if n <= ddof || n == 0 {
        return 0.0;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|&x| (x - m) * (x - m)).sum();
    (ss / (n - ddof) as f64).sqrt()
}

/// Population standard deviation (N denominator). Returns 0.0 if empty.
pub fn population_sd(data: &[f64]) -> f64 {
    sd_ddof(data, 0)
}

/// R's default quantile algorithm (type=7).
///
/// **Expects pre-sorted input** (caller's responsibility).
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

/// Median of pre-sorted data. For even length, averages the middle two values.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn median(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median: input must not be empty");
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Copies the finite values of `data`, dropping `NaN` and infinities.
pub fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Sorts a slice of finite values in ascending order.
pub fn sort_finite(data: &mut [f64]) {
    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

/// Mean of the finite values of `data`. Returns `NaN` if there are none.
pub fn nan_mean(data: &[f64]) -> f64 {
    let finite = finite_values(data);
    if finite.is_empty() {
        return f64::NAN;
    }
    mean(&finite)
}

/// Sum of the finite values of `data`. Returns `NaN` if there are none.
pub fn nan_sum(data: &[f64]) -> f64 {
    let finite = finite_values(data);
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.iter().sum()
}

/// 1-based ranks of `data`, averaging the ranks of tied values.
///
/// Ranks are returned in the original order of `data`.
pub fn average_ranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        data[a]
            .partial_cmp(&data[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && data[order[j]] == data[order[i]] {
            j += 1;
        }
        // Positions i..j share the mean of ranks i+1..=j.
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        i = j;
    }
    ranks
}

/// Sizes of the groups of tied values in `data` (only groups larger than 1).
pub fn tie_counts(data: &[f64]) -> Vec<usize> {
    let mut sorted = data.to_vec();
    sort_finite(&mut sorted);
    let mut counts = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > 1 {
            counts.push(j - i);
        }
        i = j;
    }
    counts
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(z: f64) -> f64 {
    // N(0, 1) parameters are always valid.
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.cdf(z),
        Err(_) => f64::NAN,
    }
}

/// Count, mean, sample SD, minimum and maximum of a set of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

/// Describes the finite values of `data`.
///
/// Returns `None` if there are no finite values.
pub fn describe(data: &[f64]) -> Option<Description> {
    let finite = finite_values(data);
    if finite.is_empty() {
        return None;
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(Description {
        count: finite.len(),
        mean: mean(&finite),
        sd: sd(&finite),
        min,
        max,
    })
}
