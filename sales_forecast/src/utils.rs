//! Numeric helpers shared by the model code

use statrs::statistics::Statistics;

/// Apply `d` rounds of lag-`lag` differencing.
///
/// Only fully observed windows are kept, so each round shortens the series by
/// `lag`. Returns an empty vector once the series runs out.
pub fn difference(data: &[f64], lag: usize, d: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..d {
        if lag == 0 || result.len() <= lag {
            return Vec::new();
        }
        result = (lag..result.len())
            .map(|i| result[i] - result[i - lag])
            .collect();
    }
    result
}

/// Multiply two lag polynomials given as coefficient vectors (index = power of B)
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        if x == 0.0 {
            continue;
        }
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Coefficients of `(1 - B^lag)^d`
pub fn difference_poly(lag: usize, d: usize) -> Vec<f64> {
    let mut factor = vec![0.0; lag + 1];
    factor[0] = 1.0;
    factor[lag] -= 1.0;

    (0..d).fold(vec![1.0], |acc, _| poly_mul(&acc, &factor))
}

/// Whether every value lies within `tolerance` of the last one
pub fn is_flat(data: &[f64], tolerance: f64) -> bool {
    match data.last() {
        Some(&last) => data.iter().all(|v| (v - last).abs() <= tolerance),
        None => true,
    }
}

/// Lag-1 autocorrelation, clamped into (-1, 1). Zero for short or flat input.
pub fn lag1_autocorrelation(data: &[f64]) -> f64 {
    if data.len() < 3 {
        return 0.0;
    }

    let mean = data.iter().mean();
    let denom: f64 = data.iter().map(|v| (v - mean).powi(2)).sum();
    if denom <= f64::EPSILON {
        return 0.0;
    }

    let num: f64 = data
        .windows(2)
        .map(|w| (w[0] - mean) * (w[1] - mean))
        .sum();

    (num / denom).clamp(-0.95, 0.95)
}
