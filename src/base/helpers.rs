use ndarray::prelude::*;

pub fn sensible_round(x: f64, n_digits: usize) -> f64 {
    let factor = ("1e".to_owned() + &n_digits.to_string())
        .parse::<f64>()
        .unwrap_or(1.0);
    (x * factor).round() / factor
}

/// Mean of the non-missing (non-NaN) values, None if every value is missing
pub fn mean_ignore_nan(x: ArrayView1<f64>) -> Option<f64> {
    let (sum, n) = x.fold((0.0, 0usize), |(sum, n), &x| {
        if x.is_nan() {
            (sum, n)
        } else {
            (sum + x, n + 1)
        }
    });
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

/// Sum of squared deviations of all entries from their mean
pub fn sum_of_squares(x: &Array2<f64>) -> f64 {
    match x.mean() {
        Some(mu) => x.fold(0.0, |sum, &d| sum + (d - mu).powi(2)),
        None => 0.0,
    }
}
