//! Small stages for tests

use std::{cell::RefCell, rc::Rc};

use crate::{
	errors::StageError,
	labels::{FieldName, StageName},
	record::Record,
	stage::{Stage, StageRoles},
};

/// Predicts `x + (sum of all targets seen)`, where `x` is 0 if missing
pub struct RunningSum {
	name: StageName,
	sum: f64,
}

impl RunningSum {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.into(),
			sum: 0.0,
		}
	}
}

impl Stage for RunningSum {
	fn name(&self) -> StageName {
		self.name.clone()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::PREDICTOR
	}

	fn fit_one(&mut self, _record: &Record, target: f64) -> Result<(), StageError> {
		self.sum += target;
		Ok(())
	}

	fn predict_one(&self, record: &Record) -> Result<f64, StageError> {
		let x = if record.contains("x") {
			record.get_f64("x")?
		} else {
			0.0
		};
		Ok(x + self.sum)
	}
}

/// Adds `field`, set to the last target seen (0 before any fit)
pub struct Memory {
	name: StageName,
	field: FieldName,
	last: f64,
}

impl Memory {
	pub fn new(name: &str, field: &str) -> Self {
		Self {
			name: name.into(),
			field: field.into(),
			last: 0.0,
		}
	}
}

impl Stage for Memory {
	fn name(&self) -> StageName {
		self.name.clone()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::TRANSFORMER
	}

	fn fit_one(&mut self, _record: &Record, target: f64) -> Result<(), StageError> {
		self.last = target;
		Ok(())
	}

	fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		let mut out = record.clone();
		out.insert(self.field.clone(), self.last);
		Ok(out)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	Transform(&'static str),
	Fit(&'static str),
	Predict(&'static str),
}

/// A shared log of stage calls
#[derive(Clone, Default)]
pub struct EventLog {
	events: Rc<RefCell<Vec<Event>>>,
	records: Rc<RefCell<Vec<Record>>>,
}

impl EventLog {
	pub fn new() -> Self {
		Self::default()
	}

	/// A stage that records every call made to it in this log.
	/// Transforms return their input, predictions are always 0.
	pub fn stage(&self, name: &'static str, roles: StageRoles) -> Logged {
		Logged {
			name,
			roles,
			log: self.clone(),
		}
	}

	/// Return and clear all events
	pub fn take(&self) -> Vec<Event> {
		std::mem::take(&mut *self.events.borrow_mut())
	}

	/// Every record a logged stage was fit on
	pub fn records(&self) -> Vec<Record> {
		self.records.borrow().clone()
	}
}

pub struct Logged {
	name: &'static str,
	roles: StageRoles,
	log: EventLog,
}

impl Stage for Logged {
	fn name(&self) -> StageName {
		self.name.into()
	}

	fn roles(&self) -> StageRoles {
		self.roles
	}

	fn fit_one(&mut self, record: &Record, _target: f64) -> Result<(), StageError> {
		self.log.events.borrow_mut().push(Event::Fit(self.name));
		self.log.records.borrow_mut().push(record.clone());
		Ok(())
	}

	fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		self.log.events.borrow_mut().push(Event::Transform(self.name));
		Ok(record.clone())
	}

	fn predict_one(&self, _record: &Record) -> Result<f64, StageError> {
		self.log.events.borrow_mut().push(Event::Predict(self.name));
		Ok(0.0)
	}
}
