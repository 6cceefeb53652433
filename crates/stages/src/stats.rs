//! Running statistics

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The running mean of every value seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mean {
	n: u64,
	mean: f64,
}

impl Mean {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn update(&mut self, x: f64) {
		self.n += 1;
		self.mean += (x - self.mean) / self.n as f64;
	}

	/// The number of values seen
	pub fn count(&self) -> u64 {
		self.n
	}

	/// The mean of all values seen, or 0 if we haven't seen any.
	pub fn get(&self) -> f64 {
		self.mean
	}
}

/// The mean of the last `window` values seen
#[derive(Debug, Clone, PartialEq)]
pub struct RollingMean {
	window: usize,
	values: VecDeque<f64>,
}

impl RollingMean {
	/// Make a new rolling mean. `window` must be positive.
	pub fn new(window: usize) -> Self {
		Self {
			window,
			values: VecDeque::with_capacity(window),
		}
	}

	pub fn update(&mut self, x: f64) {
		if self.values.len() == self.window {
			self.values.pop_front();
		}
		self.values.push_back(x);
	}

	/// The number of values in the window
	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// The mean of the window, or 0 if it is empty.
	pub fn get(&self) -> f64 {
		if self.values.is_empty() {
			return 0.0;
		}

		self.values.iter().sum::<f64>() / self.values.len() as f64
	}
}

/// Running mean and variance, using Welford's algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Variance {
	mean: Mean,
	m2: f64,
}

impl Variance {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn update(&mut self, x: f64) {
		let old_mean = self.mean.get();
		self.mean.update(x);
		self.m2 += (x - old_mean) * (x - self.mean.get());
	}

	pub fn count(&self) -> u64 {
		self.mean.count()
	}

	pub fn mean(&self) -> f64 {
		self.mean.get()
	}

	/// The population variance of all values seen, or 0 if we've seen fewer than two.
	pub fn get(&self) -> f64 {
		if self.count() < 2 {
			return 0.0;
		}
		self.m2 / self.count() as f64
	}
}
