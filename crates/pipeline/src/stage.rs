//! The contract every pipeline element implements

use std::{
	cell::RefCell,
	fmt::Debug,
	rc::Rc,
	sync::atomic::{AtomicU64, Ordering},
};

use crate::{
	errors::{CapabilityError, StageError},
	labels::StageName,
	record::Record,
};

/// The roles a stage can play.
///
/// Interior pipeline steps and union members are used as transformers;
/// the last step of a pipeline is used as a predictor when we ask the
/// pipeline for a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRoles {
	pub transformer: bool,
	pub predictor: bool,
}

impl StageRoles {
	pub const NONE: Self = Self {
		transformer: false,
		predictor: false,
	};

	pub const TRANSFORMER: Self = Self {
		transformer: true,
		predictor: false,
	};

	pub const PREDICTOR: Self = Self {
		transformer: false,
		predictor: true,
	};

	pub const BOTH: Self = Self {
		transformer: true,
		predictor: true,
	};
}

/// One element of a pipeline.
///
/// Stages learn incrementally: `fit_one` sees one record and its target at a time.
/// `transform_one` and `predict_one` take `&self`, so producing an output
/// can never change what a stage has learned.
///
/// A stage must implement the methods for every role it reports in [`Stage::roles`].
/// The defaults for the others return a [`CapabilityError`].
pub trait Stage {
	/// This stage's display name.
	/// This is read once, when the stage is wrapped in a [`StageRef`].
	fn name(&self) -> StageName;

	/// The roles this stage supports
	fn roles(&self) -> StageRoles;

	/// Learn from one record and its target.
	/// Stateless stages do nothing here.
	fn fit_one(&mut self, record: &Record, target: f64) -> Result<(), StageError>;

	/// Produce the record the next stage should see.
	fn transform_one(&self, _record: &Record) -> Result<Record, StageError> {
		return Err(CapabilityError::CannotTransform { stage: self.name() }.into());
	}

	/// Predict this record's target.
	fn predict_one(&self, _record: &Record) -> Result<f64, StageError> {
		return Err(CapabilityError::CannotPredict { stage: self.name() }.into());
	}
}

/// The identity of a stage instance.
/// Every [`StageRef`] created with [`StageRef::new`] gets a fresh id;
/// clones share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageId(u64);

impl StageId {
	fn next() -> Self {
		static NEXT_ID: AtomicU64 = AtomicU64::new(0);
		Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// A shared handle to a stage.
///
/// Cloning a [`StageRef`] does not copy the stage: both handles refer to
/// the same instance and the same learned state. This is how one stage
/// instance is recognized when it is added to a union twice.
#[derive(Clone)]
pub struct StageRef {
	id: StageId,
	name: StageName,
	roles: StageRoles,
	stage: Rc<RefCell<dyn Stage>>,
}

impl Debug for StageRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StageRef")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("roles", &self.roles)
			.finish()
	}
}

impl StageRef {
	pub fn new<S: Stage + 'static>(stage: S) -> Self {
		Self {
			id: StageId::next(),
			name: stage.name(),
			roles: stage.roles(),
			stage: Rc::new(RefCell::new(stage)),
		}
	}

	pub fn id(&self) -> StageId {
		self.id
	}

	pub fn name(&self) -> &StageName {
		&self.name
	}

	pub fn roles(&self) -> StageRoles {
		self.roles
	}

	/// Are these two handles the same stage instance?
	pub fn same_stage(&self, other: &StageRef) -> bool {
		self.id == other.id
	}

	pub fn fit_one(&self, record: &Record, target: f64) -> Result<(), StageError> {
		let Ok(mut stage) = self.stage.try_borrow_mut() else {
			return Err(self.busy());
		};
		return stage.fit_one(record, target);
	}

	pub fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		if !self.roles.transformer {
			return Err(CapabilityError::CannotTransform {
				stage: self.name.clone(),
			}
			.into());
		}

		let Ok(stage) = self.stage.try_borrow() else {
			return Err(self.busy());
		};
		return stage.transform_one(record);
	}

	pub fn predict_one(&self, record: &Record) -> Result<f64, StageError> {
		if !self.roles.predictor {
			return Err(CapabilityError::CannotPredict {
				stage: self.name.clone(),
			}
			.into());
		}

		let Ok(stage) = self.stage.try_borrow() else {
			return Err(self.busy());
		};
		return stage.predict_one(record);
	}

	fn busy(&self) -> StageError {
		StageError::StageBusy {
			stage: self.name.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Counter {
		seen: usize,
	}

	impl Stage for Counter {
		fn name(&self) -> StageName {
			"counter".into()
		}

		fn roles(&self) -> StageRoles {
			StageRoles::PREDICTOR
		}

		fn fit_one(&mut self, _record: &Record, _target: f64) -> Result<(), StageError> {
			self.seen += 1;
			Ok(())
		}

		fn predict_one(&self, _record: &Record) -> Result<f64, StageError> {
			Ok(self.seen as f64)
		}
	}

	#[test]
	fn clones_share_state_and_identity() {
		let a = StageRef::new(Counter { seen: 0 });
		let b = a.clone();
		let c = StageRef::new(Counter { seen: 0 });

		a.fit_one(&Record::new(), 1.0).unwrap();
		assert_eq!(b.predict_one(&Record::new()), Ok(1.0));
		assert_eq!(c.predict_one(&Record::new()), Ok(0.0));

		assert!(a.same_stage(&b));
		assert!(!a.same_stage(&c));
	}

	#[test]
	fn unsupported_roles_fail_before_reaching_the_stage() {
		let a = StageRef::new(Counter { seen: 0 });
		assert_eq!(
			a.transform_one(&Record::new()),
			Err(CapabilityError::CannotTransform {
				stage: "counter".into()
			}
			.into())
		);
	}
}
