use rill_pipeline::{Record, Stage, StageError, StageName, StageRoles};

use crate::stats::Mean;

/// Predicts the mean of every target seen so far, ignoring features.
/// Predicts 0 before the first fit.
#[derive(Debug, Default)]
pub struct MeanRegressor {
	mean: Mean,
}

impl MeanRegressor {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Stage for MeanRegressor {
	fn name(&self) -> StageName {
		"mean_regressor".into()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::PREDICTOR
	}

	fn fit_one(&mut self, _record: &Record, target: f64) -> Result<(), StageError> {
		self.mean.update(target);
		Ok(())
	}

	fn predict_one(&self, _record: &Record) -> Result<f64, StageError> {
		Ok(self.mean.get())
	}
}
