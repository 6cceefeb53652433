//! Learning rate schedules

use std::fmt::Debug;

/// Decides how big a step to take at each iteration
pub trait LrSchedule: Debug {
	/// The learning rate at iteration `t`, counting from 0
	fn get(&self, t: u64) -> f64;
}

/// Always the same learning rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantLr(pub f64);

impl LrSchedule for ConstantLr {
	fn get(&self, _t: u64) -> f64 {
		self.0
	}
}

/// `lr / (t + 1)^power`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseScalingLr {
	pub lr: f64,
	pub power: f64,
}

impl InverseScalingLr {
	pub fn new(lr: f64) -> Self {
		Self { lr, power: 0.5 }
	}
}

impl LrSchedule for InverseScalingLr {
	fn get(&self, t: u64) -> f64 {
		self.lr / (t as f64 + 1.0).powf(self.power)
	}
}

/// `1 / (alpha * (t0 + t))`, from Léon Bottou's SGD notes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalLr {
	pub t0: f64,
	pub alpha: f64,
}

impl Default for OptimalLr {
	fn default() -> Self {
		Self {
			t0: 1000.0,
			alpha: 1e-4,
		}
	}
}

impl LrSchedule for OptimalLr {
	fn get(&self, t: u64) -> f64 {
		1.0 / (self.alpha * (self.t0 + t as f64))
	}
}
