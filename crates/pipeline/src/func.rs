use rill_util::names::check_name;
use std::{any::type_name, fmt::Debug};

use crate::{
	errors::{ConstructionError, SchemaError, StageError},
	labels::StageName,
	record::Record,
	stage::{Stage, StageRoles},
};

type RecordFn = dyn Fn(&Record) -> Record;

/// A stateless stage built from a function.
///
/// The function receives the current record and returns the fields it
/// wants to add or overwrite. It never modifies its input;
/// this stage merges what it returns into a copy of the input.
///
/// Functions never become stages implicitly: wrap them with
/// [`FuncStage::new`] or [`FuncStage::with_name`] before composing them.
pub struct FuncStage {
	name: StageName,
	func: Box<RecordFn>,
}

impl Debug for FuncStage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FuncStage")
			.field("name", &self.name)
			.finish()
	}
}

impl FuncStage {
	/// Wrap `func`, naming the stage after it.
	///
	/// Named functions keep their name (`fn day_of_week` becomes `day_of_week`).
	/// Closures are named after the function that defines them.
	pub fn new<F>(func: F) -> Self
	where
		F: Fn(&Record) -> Record + 'static,
	{
		Self {
			name: func_name::<F>(),
			func: Box::new(func),
		}
	}

	/// Wrap `func` under an explicit name
	pub fn with_name<F>(name: &str, func: F) -> Result<Self, ConstructionError>
	where
		F: Fn(&Record) -> Record + 'static,
	{
		check_name(name).map_err(|error| ConstructionError::InvalidName {
			name: name.into(),
			error,
		})?;

		return Ok(Self {
			name: name.into(),
			func: Box::new(func),
		});
	}
}

/// Derive a readable name from a function's type.
fn func_name<F>() -> StageName {
	let mut path: Vec<&str> = type_name::<F>().split("::").collect();
	while path.len() > 1 && path.last() == Some(&"{{closure}}") {
		path.pop();
	}

	return path.last().copied().unwrap_or("func").into();
}

impl Stage for FuncStage {
	fn name(&self) -> StageName {
		self.name.clone()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::TRANSFORMER
	}

	fn fit_one(&mut self, _record: &Record, _target: f64) -> Result<(), StageError> {
		Ok(())
	}

	fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		let partial = (self.func)(record);

		for field in partial.keys() {
			check_name(field.as_str()).map_err(|error| SchemaError::InvalidFieldName {
				stage: self.name.clone(),
				field: field.clone(),
				error,
			})?;
		}

		return Ok(record.clone().merge(partial));
	}
}
