//! Composition operands

use crate::{
	errors::StageError,
	labels::StageName,
	pipeline::Pipeline,
	record::Record,
	stage::{Stage, StageId, StageRef, StageRoles},
	union::Union,
};

/// Anything that can be composed into a [`Pipeline`] or a [`Union`].
///
/// Leaves are shared [`StageRef`] handles. Composites are owned:
/// composing them again copies their structure, never their stages.
#[derive(Debug, Clone)]
pub enum Node {
	/// A single stage
	Leaf(StageRef),

	/// Stages run side by side
	Union(Union),

	/// Stages run one after another
	Pipeline(Pipeline),
}

/// What makes two nodes "the same".
///
/// Leaves are identified by stage instance, composites by
/// the ordered identities of their members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeIdentity {
	Leaf(StageId),
	Union(Vec<NodeIdentity>),
	Pipeline(Vec<NodeIdentity>),
}

impl Node {
	/// Wrap a stage in a fresh handle
	pub fn stage<S: Stage + 'static>(stage: S) -> Self {
		Self::Leaf(StageRef::new(stage))
	}

	pub fn name(&self) -> StageName {
		match self {
			Self::Leaf(x) => x.name().clone(),
			Self::Union(x) => x.name(),
			Self::Pipeline(x) => x.name(),
		}
	}

	pub fn roles(&self) -> StageRoles {
		match self {
			Self::Leaf(x) => x.roles(),
			Self::Union(x) => x.roles(),
			Self::Pipeline(x) => x.roles(),
		}
	}

	pub fn identity(&self) -> NodeIdentity {
		match self {
			Self::Leaf(x) => NodeIdentity::Leaf(x.id()),
			Self::Union(x) => NodeIdentity::Union(x.identity()),
			Self::Pipeline(x) => NodeIdentity::Pipeline(x.identity()),
		}
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Leaf(_) => false,
			Self::Union(x) => x.is_empty(),
			Self::Pipeline(x) => x.is_empty(),
		}
	}

	pub fn fit_one(&mut self, record: &Record, target: f64) -> Result<(), StageError> {
		match self {
			Self::Leaf(x) => x.fit_one(record, target),
			Self::Union(x) => x.fit_one(record, target),
			Self::Pipeline(x) => x.fit_one(record, target),
		}
	}

	pub fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		match self {
			Self::Leaf(x) => x.transform_one(record),
			Self::Union(x) => x.transform_one(record),
			Self::Pipeline(x) => x.transform_one(record),
		}
	}

	pub fn predict_one(&self, record: &Record) -> Result<f64, StageError> {
		match self {
			Self::Leaf(x) => x.predict_one(record),
			Self::Union(x) => x.predict_one(record),
			Self::Pipeline(x) => x.predict_one(record),
		}
	}

	/// Sequential composition (`self | next`)
	pub fn then(self, next: impl Into<Node>) -> Result<Pipeline, StageError> {
		return crate::compose::then(self, next);
	}

	/// Parallel composition (`self + other`)
	pub fn parallel(self, other: impl Into<Node>) -> Result<Union, StageError> {
		return crate::compose::parallel(self, other);
	}
}

impl From<StageRef> for Node {
	fn from(value: StageRef) -> Self {
		Self::Leaf(value)
	}
}

impl From<&StageRef> for Node {
	fn from(value: &StageRef) -> Self {
		Self::Leaf(value.clone())
	}
}

impl From<Union> for Node {
	fn from(value: Union) -> Self {
		Self::Union(value)
	}
}

impl From<Pipeline> for Node {
	fn from(value: Pipeline) -> Self {
		Self::Pipeline(value)
	}
}

impl<S: Stage + 'static> From<S> for Node {
	fn from(value: S) -> Self {
		Self::stage(value)
	}
}
