use rill_pipeline::{FieldName, Record, Stage, StageError, StageName, StageRoles};
use std::collections::BTreeMap;

use crate::stats::Variance;

/// Scales every numeric field to zero mean and unit variance,
/// using the running statistics of the records it was fit on.
///
/// Fields we have no variance for yet are set to 0.
/// Booleans and non-numeric fields pass through untouched.
#[derive(Debug, Default)]
pub struct StandardScaler {
	stats: BTreeMap<FieldName, Variance>,
}

impl StandardScaler {
	pub fn new() -> Self {
		Self::default()
	}

	/// The running mean and variance of `field`, if we've seen it
	pub fn stats(&self, field: &str) -> Option<&Variance> {
		self.stats.get(field)
	}
}

impl Stage for StandardScaler {
	fn name(&self) -> StageName {
		"standard_scaler".into()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::TRANSFORMER
	}

	fn fit_one(&mut self, record: &Record, _target: f64) -> Result<(), StageError> {
		for (field, x) in record.numeric() {
			self.stats.entry(field.clone()).or_default().update(x);
		}
		return Ok(());
	}

	fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		let mut out = record.clone();
		for (field, x) in record.numeric() {
			let scaled = match self.stats.get(field) {
				Some(v) if v.get() > 0.0 => (x - v.mean()) / v.get().sqrt(),
				_ => 0.0,
			};
			out.insert(field.clone(), scaled);
		}
		return Ok(out);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rill_pipeline::Value;

	#[test]
	fn scales_with_past_statistics() {
		let mut s = StandardScaler::new();
		let r = |x: f64| Record::from([("x", Value::Float(x)), ("flag", Value::Boolean(true))]);

		// Nothing seen yet
		assert_eq!(s.transform_one(&r(5.0)).unwrap().get_f64("x"), Ok(0.0));

		for x in [1.0, 3.0] {
			s.fit_one(&r(x), 0.0).unwrap();
		}

		// mean 2, std 1
		let out = s.transform_one(&r(5.0)).unwrap();
		assert_eq!(out.get_f64("x"), Ok(3.0));
		assert_eq!(out.get("flag"), Some(&Value::Boolean(true)));
		assert!(s.stats("flag").is_none());
	}
}
