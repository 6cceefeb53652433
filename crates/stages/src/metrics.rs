//! Regression metrics

use rill_pipeline::Metric;
use std::fmt::Display;

use crate::stats::Mean;

/// Mean absolute error
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae {
	error: Mean,
}

impl Mae {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Metric for Mae {
	fn update(&mut self, y_true: f64, y_pred: f64) {
		self.error.update((y_true - y_pred).abs());
	}

	fn get(&self) -> f64 {
		self.error.get()
	}

	fn name(&self) -> &str {
		"MAE"
	}
}

impl Display for Mae {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.report())
	}
}

/// Root mean squared error
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse {
	squared_error: Mean,
}

impl Rmse {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Metric for Rmse {
	fn update(&mut self, y_true: f64, y_pred: f64) {
		self.squared_error.update((y_true - y_pred).powi(2));
	}

	fn get(&self) -> f64 {
		self.squared_error.get().sqrt()
	}

	fn name(&self) -> &str {
		"RMSE"
	}
}

impl Display for Rmse {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.report())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn mae() {
		let mut m = Mae::new();
		for (y, p) in [(3.0, 2.5), (-0.5, 0.0), (2.0, 2.0), (7.0, 8.0)] {
			m.update(y, p);
		}
		assert!((m.get() - 0.5).abs() < 1e-12);
		assert_eq!(m.to_string(), "MAE: 0.500000");
	}

	#[test]
	fn rmse() {
		let mut m = Rmse::new();
		for (y, p) in [(0.0, 3.0), (0.0, -4.0)] {
			m.update(y, p);
		}
		assert!((m.get() - 12.5f64.sqrt()).abs() < 1e-12);
		assert_eq!(m.to_string(), "RMSE: 3.535534");
	}
}
