use itertools::Itertools;
use std::collections::BTreeSet;

use crate::{
	errors::StageError,
	labels::{FieldName, StageName},
	record::Record,
	stage::{Stage, StageRoles},
};

/// A stateless stage that drops a fixed set of fields.
#[derive(Debug, Clone)]
pub struct FilterStage {
	fields: BTreeSet<FieldName>,
}

impl FilterStage {
	pub fn new<I, F>(fields: I) -> Self
	where
		I: IntoIterator<Item = F>,
		F: Into<FieldName>,
	{
		Self {
			fields: fields.into_iter().map(Into::into).collect(),
		}
	}

	/// The fields this stage removes
	pub fn fields(&self) -> &BTreeSet<FieldName> {
		&self.fields
	}
}

impl Stage for FilterStage {
	/// Renders as `~[a, b]`
	fn name(&self) -> StageName {
		format!("~[{}]", self.fields.iter().join(", ")).into()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::TRANSFORMER
	}

	fn fit_one(&mut self, _record: &Record, _target: f64) -> Result<(), StageError> {
		Ok(())
	}

	fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		Ok(record.without(&self.fields))
	}
}
