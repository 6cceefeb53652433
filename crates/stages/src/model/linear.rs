use rill_pipeline::{
	ConstructionError, FieldName, Record, Stage, StageError, StageName, StageRoles,
};
use std::collections::BTreeMap;
use tracing::trace;

use crate::optim::{ConstantLr, LrSchedule};

/// Linear regression on every numeric field,
/// trained with one step of stochastic gradient descent per record.
///
/// Weights start at 0. A feature that appears for the first time gets
/// a weight of 0, so the feature set may grow as the stream goes on.
#[derive(Debug)]
pub struct LinearRegression {
	weights: BTreeMap<FieldName, f64>,
	intercept: f64,

	lr: Box<dyn LrSchedule>,
	l2: f64,

	/// The number of updates we've made
	t: u64,
}

impl LinearRegression {
	/// A model with a constant learning rate of 0.01 and no regularization
	pub fn new() -> Self {
		Self {
			weights: BTreeMap::new(),
			intercept: 0.0,
			lr: Box::new(ConstantLr(0.01)),
			l2: 0.0,
			t: 0,
		}
	}

	/// Use the given learning rate schedule
	pub fn with_lr(mut self, lr: impl LrSchedule + 'static) -> Self {
		self.lr = Box::new(lr);
		self
	}

	/// Penalize large weights. `l2` must be non-negative.
	pub fn with_l2(mut self, l2: f64) -> Result<Self, ConstructionError> {
		if l2.is_nan() || l2 < 0.0 {
			return Err(ConstructionError::BadParameter {
				parameter: "l2",
				message: format!("must be non-negative, got {l2}"),
			});
		}

		self.l2 = l2;
		return Ok(self);
	}

	pub fn weight(&self, field: &str) -> Option<f64> {
		self.weights.get(field).copied()
	}

	pub fn intercept(&self) -> f64 {
		self.intercept
	}

	fn predict(&self, record: &Record) -> f64 {
		self.intercept
			+ record
				.numeric()
				.map(|(k, x)| self.weights.get(k).copied().unwrap_or(0.0) * x)
				.sum::<f64>()
	}
}

impl Stage for LinearRegression {
	fn name(&self) -> StageName {
		"linear_regression".into()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::PREDICTOR
	}

	fn fit_one(&mut self, record: &Record, target: f64) -> Result<(), StageError> {
		// Gradient of 0.5 * (y_pred - y)^2
		let g = self.predict(record) - target;
		let lr = self.lr.get(self.t);
		trace!(message = "SGD step", t = self.t, lr, gradient = g);

		for (k, x) in record.numeric() {
			let w = self.weights.entry(k.clone()).or_insert(0.0);
			*w -= lr * (g * x + self.l2 * *w);
		}
		self.intercept -= lr * g;
		self.t += 1;

		return Ok(());
	}

	fn predict_one(&self, record: &Record) -> Result<f64, StageError> {
		return Ok(self.predict(record));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::optim::InverseScalingLr;

	#[test]
	fn learns_a_line() {
		let mut m = LinearRegression::new().with_lr(ConstantLr(0.05));

		for i in 0..5000 {
			let x = f64::from(i % 10) / 10.0;
			m.fit_one(&Record::from([("x", x)]), 3.0 * x + 1.0).unwrap();
		}

		let w = m.weight("x").unwrap();
		assert!((w - 3.0).abs() < 0.05, "w = {w}");
		assert!((m.intercept() - 1.0).abs() < 0.05);
		assert!((m.predict_one(&Record::from([("x", 0.5)])).unwrap() - 2.5).abs() < 0.05);
	}

	#[test]
	fn first_step() {
		let mut m = LinearRegression::new().with_lr(InverseScalingLr::new(0.1));
		m.fit_one(&Record::from([("x", 2.0)]), 1.0).unwrap();

		// g = 0 - 1, lr = 0.1
		assert!((m.weight("x").unwrap() - 0.2).abs() < 1e-12);
		assert!((m.intercept() - 0.1).abs() < 1e-12);
	}

	#[test]
	fn negative_l2() {
		assert!(matches!(
			LinearRegression::new().with_l2(-1.0),
			Err(ConstructionError::BadParameter { parameter: "l2", .. })
		));
	}
}
