use rill_pipeline::{
	ConstructionError, FieldName, Record, Stage, StageError, StageName, StageRoles, Value,
};
use rill_util::names::check_name;
use smartstring::{LazyCompact, SmartString};
use std::collections::HashMap;
use tracing::trace;

use crate::stats::RollingMean;

/// A group, as given by the value of the grouping field.
/// Values of different types are never the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
	/// Bit pattern of the float, with -0.0 folded into 0.0
	Float(u64),
	Integer(i64),
	Boolean(bool),
	Text(SmartString<LazyCompact>),
	/// Nanoseconds since the unix epoch
	Timestamp(i128),
}

impl From<&Value> for GroupKey {
	fn from(value: &Value) -> Self {
		match value {
			Value::Float(x) if *x == 0.0 => Self::Float(0.0f64.to_bits()),
			Value::Float(x) => Self::Float(x.to_bits()),
			Value::Integer(x) => Self::Integer(*x),
			Value::Boolean(x) => Self::Boolean(*x),
			Value::Text(x) => Self::Text(x.clone()),
			Value::Timestamp(x) => Self::Timestamp(x.unix_timestamp_nanos()),
		}
	}
}

/// Adds the mean of the last `window` targets seen for this record's group.
///
/// Records are grouped by the value of field `by`. The new field is named
/// after this stage, `target_rolling_{window}_mean_by_{by}`, and is 0 for
/// groups we have no history for.
///
/// Only targets passed to [`Stage::fit_one`] are ever aggregated,
/// so in a pipeline this never sees the target of the record it is transforming.
#[derive(Debug)]
pub struct TargetRollingMean {
	by: FieldName,
	window: usize,
	output: FieldName,
	groups: HashMap<GroupKey, RollingMean>,
}

impl TargetRollingMean {
	pub fn new(by: &str, window: usize) -> Result<Self, ConstructionError> {
		check_name(by).map_err(|error| ConstructionError::InvalidName {
			name: by.into(),
			error,
		})?;

		if window == 0 {
			return Err(ConstructionError::BadParameter {
				parameter: "window",
				message: "window must be positive".into(),
			});
		}

		return Ok(Self {
			by: by.into(),
			window,
			output: format!("target_rolling_{window}_mean_by_{by}").into(),
			groups: HashMap::new(),
		});
	}

	/// The field this stage adds
	pub fn output(&self) -> &FieldName {
		&self.output
	}

	/// The group `record` belongs to
	fn group<'r>(&self, record: &'r Record) -> Result<(GroupKey, &'r Value), StageError> {
		let value = record.get_required(self.by.as_str())?;
		return Ok((GroupKey::from(value), value));
	}
}

impl Stage for TargetRollingMean {
	fn name(&self) -> StageName {
		self.output.as_str().into()
	}

	fn roles(&self) -> StageRoles {
		StageRoles::TRANSFORMER
	}

	fn fit_one(&mut self, record: &Record, target: f64) -> Result<(), StageError> {
		let (group, _) = self.group(record)?;
		let window = self.window;
		self.groups
			.entry(group)
			.or_insert_with(|| RollingMean::new(window))
			.update(target);
		return Ok(());
	}

	fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		let (group, value) = self.group(record)?;
		let mean = self.groups.get(&group).map(|x| x.get()).unwrap_or(0.0);
		trace!(message = "Rolling mean", group = %value, kind = value.type_name(), mean);

		let mut out = record.clone();
		out.insert(self.output.clone(), mean);
		return Ok(out);
	}
}
