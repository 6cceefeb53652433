//! Errors we may encounter when building or running a pipeline.
//!
//! None of these are recovered from inside the engine.
//! They always propagate to whoever called `fit_one`, `predict_one`,
//! `transform_one`, or a composition method.

use rill_util::names::NameError;
use thiserror::Error;

use crate::labels::{FieldName, StageName};

/// A stage was asked to play a role it doesn't support
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
	/// We asked a stage for a prediction, but it isn't a predictor
	#[error("stage `{stage}` cannot predict")]
	CannotPredict { stage: StageName },

	/// We asked a stage to transform a record, but it isn't a transformer
	#[error("stage `{stage}` cannot transform")]
	CannotTransform { stage: StageName },

	/// A stage that isn't a transformer would end up before
	/// the last step of a pipeline.
	#[error("stage `{stage}` at step {position} is not a transformer and cannot precede another step")]
	NotATransformer { stage: StageName, position: usize },

	/// Union members must be transformers
	#[error("stage `{stage}` is not a transformer and cannot be part of a union")]
	UnionMemberNotTransformer { stage: StageName },
}

/// A record didn't have the shape a stage expected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
	/// A stage needed a field that isn't in the record
	#[error("missing field `{field}`")]
	MissingField { field: FieldName },

	/// A field had an unexpected type
	#[error("field `{field}` should be {expected}, found {found}")]
	BadFieldType {
		field: FieldName,
		expected: &'static str,
		found: &'static str,
	},

	/// A stage produced a field with an invalid name
	#[error("stage `{stage}` produced an invalid field name `{field}`")]
	InvalidFieldName {
		stage: StageName,
		field: FieldName,
		#[source]
		error: NameError,
	},
}

/// We could not compose or configure a stage
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
	/// A pipeline with no steps was used where a stage was expected
	#[error("pipeline has no steps")]
	EmptyPipeline,

	/// A union with no members was used where a stage was expected
	#[error("union has no members")]
	EmptyUnion,

	/// We tried to give a stage an invalid name
	#[error("invalid stage name `{name}`")]
	InvalidName {
		name: String,
		#[source]
		error: NameError,
	},

	/// Composite operands are flattened into their parent,
	/// so they cannot be given a name of their own.
	#[error("cannot name a {what}, its members are added individually")]
	CannotName { what: &'static str },

	/// A stage was constructed with a bad parameter
	#[error("bad parameter `{parameter}`: {message}")]
	BadParameter {
		parameter: &'static str,
		message: String,
	},
}

/// Any error a stage or a composition may produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
	#[error(transparent)]
	Capability(#[from] CapabilityError),

	#[error(transparent)]
	Schema(#[from] SchemaError),

	#[error(transparent)]
	Construction(#[from] ConstructionError),

	/// A stage was used while it was already being used.
	/// This only happens if a stage calls into a pipeline that contains it.
	#[error("stage `{stage}` is already in use")]
	StageBusy { stage: StageName },
}
