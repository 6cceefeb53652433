//! Sequential composition

use itertools::Itertools;
use rill_util::names::check_name;
use std::borrow::Cow;
use tracing::{debug, trace};

use crate::{
	errors::{CapabilityError, ConstructionError, StageError},
	graph::StageGraph,
	labels::StageName,
	node::{Node, NodeIdentity},
	record::Record,
	stage::StageRoles,
};

/// An ordered list of named steps.
///
/// Every step but the last is used as a transformer: each one sees the
/// record produced by the step before it. The last step is used as a
/// predictor by [`Pipeline::predict_one`] and as a transformer by
/// [`Pipeline::transform_one`].
///
/// Step names don't need to be unique. Steps are addressed by position;
/// [`Pipeline::get`] returns the first step with a given name.
///
/// A pipeline never contains another pipeline as a step.
/// Pipelines added to a pipeline are spliced in.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
	steps: Vec<(StageName, Node)>,
}

//
// MARK: Structure
//

impl Pipeline {
	/// Create an empty pipeline
	pub fn new() -> Self {
		Self { steps: Vec::new() }
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Iterate over this pipeline's steps, in order
	pub fn steps(&self) -> impl Iterator<Item = (&StageName, &Node)> {
		self.steps.iter().map(|(name, node)| (name, node))
	}

	/// The name of every step, in order
	pub fn names(&self) -> impl Iterator<Item = &StageName> {
		self.steps.iter().map(|(name, _)| name)
	}

	/// Find the first step with the given name
	pub fn get(&self, name: &str) -> Option<&Node> {
		self.steps
			.iter()
			.find(|(n, _)| n.as_str() == name)
			.map(|(_, node)| node)
	}

	/// This pipeline's last step
	pub fn terminal(&self) -> Option<&Node> {
		self.steps.last().map(|(_, node)| node)
	}

	/// The display names of all steps, joined with ` | `
	pub fn name(&self) -> StageName {
		self.steps.iter().map(|(_, node)| node.name()).join(" | ").into()
	}

	/// A pipeline plays whatever roles its last step plays
	pub fn roles(&self) -> StageRoles {
		self.terminal().map(|x| x.roles()).unwrap_or(StageRoles::NONE)
	}

	pub fn identity(&self) -> Vec<NodeIdentity> {
		self.steps.iter().map(|(_, node)| node.identity()).collect()
	}

	/// The data flow graph of this pipeline
	pub fn graph(&self) -> StageGraph {
		StageGraph::of_pipeline(self)
	}

	/// Append a node to this pipeline, named after its display name.
	///
	/// Pipelines are spliced in step by step, keeping their step names.
	/// If this fails, `self` is left unchanged.
	pub fn push(&mut self, node: impl Into<Node>) -> Result<(), StageError> {
		let node = node.into();
		let new_steps = match node {
			Node::Pipeline(p) => {
				if p.is_empty() {
					return Err(ConstructionError::EmptyPipeline.into());
				}
				debug!(
					message = "Splicing pipeline",
					into = %self.name(),
					steps = p.len()
				);
				p.steps
			}
			Node::Union(ref u) if u.is_empty() => {
				return Err(ConstructionError::EmptyUnion.into());
			}
			node => vec![(node.name(), node)],
		};

		return self.append(new_steps);
	}

	/// Append a node to this pipeline under an explicit name.
	///
	/// Pipelines cannot be named, since they are spliced in.
	pub fn push_named(&mut self, name: &str, node: impl Into<Node>) -> Result<(), StageError> {
		check_name(name).map_err(|error| ConstructionError::InvalidName {
			name: name.into(),
			error,
		})?;

		let node = node.into();
		match &node {
			Node::Pipeline(_) => return Err(ConstructionError::CannotName { what: "pipeline" }.into()),
			Node::Union(u) if u.is_empty() => return Err(ConstructionError::EmptyUnion.into()),
			_ => {}
		}

		return self.append(vec![(name.into(), node)]);
	}

	/// Sequential composition (`self | next`).
	/// Consumes `self` and returns the extended pipeline.
	pub fn then(mut self, next: impl Into<Node>) -> Result<Pipeline, StageError> {
		self.push(next)?;
		return Ok(self);
	}

	/// Add steps to the end of this pipeline,
	/// making sure only transformers end up before the last step.
	fn append(&mut self, new_steps: Vec<(StageName, Node)>) -> Result<(), StageError> {
		let n_total = self.steps.len() + new_steps.len();
		for (position, (_, node)) in self.steps.iter().chain(new_steps.iter()).enumerate() {
			if position + 1 < n_total && !node.roles().transformer {
				return Err(CapabilityError::NotATransformer {
					stage: node.name(),
					position,
				}
				.into());
			}
		}

		self.steps.extend(new_steps);
		return Ok(());
	}
}

//
// MARK: Execution
//

impl Pipeline {
	/// Split this pipeline into its interior steps and its last step
	fn split(&self) -> Result<(&[(StageName, Node)], &Node), StageError> {
		match self.steps.split_last() {
			Some(((_, last), interior)) => return Ok((interior, last)),
			None => return Err(ConstructionError::EmptyPipeline.into()),
		}
	}

	/// Run `record` through every interior step.
	fn transform_interior<'r>(
		interior: &[(StageName, Node)],
		record: &'r Record,
	) -> Result<Cow<'r, Record>, StageError> {
		let mut x = Cow::Borrowed(record);
		for (position, (name, step)) in interior.iter().enumerate() {
			trace!(message = "Transforming", step = %name, position);
			x = Cow::Owned(step.transform_one(&x)?);
		}
		return Ok(x);
	}

	/// Predict the target of `record`.
	///
	/// This never changes any stage's learned state:
	/// calling it repeatedly with the same record returns the same prediction.
	pub fn predict_one(&self, record: &Record) -> Result<f64, StageError> {
		let (interior, last) = self.split()?;
		let x = Self::transform_interior(interior, record)?;
		trace!(message = "Predicting", step = %last.name());
		return last.predict_one(&x);
	}

	/// Run `record` through every step, including the last.
	/// The last step must be a transformer.
	pub fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		let (interior, last) = self.split()?;
		let x = Self::transform_interior(interior, record)?;
		trace!(message = "Transforming", step = %last.name(), position = interior.len());
		return last.transform_one(&x);
	}

	/// Learn from `record` and its target.
	///
	/// Each interior step transforms the record it receives *before* it
	/// is fit on that same record, and passes that transform downstream.
	/// A step therefore never produces features from the target it is
	/// about to learn, and every step is fit on the record as its
	/// upstream steps transformed it.
	///
	/// This does not check that [`Pipeline::predict_one`] was called first.
	/// Callers who need out-of-fold predictions must predict before fitting.
	pub fn fit_one(&mut self, record: &Record, target: f64) -> Result<(), StageError> {
		if self.steps.is_empty() {
			return Err(ConstructionError::EmptyPipeline.into());
		}

		let last_position = self.steps.len() - 1;
		let mut x = Cow::Borrowed(record);
		for (position, (name, step)) in self.steps.iter_mut().enumerate() {
			if position == last_position {
				trace!(message = "Fitting", step = %name, position);
				step.fit_one(&x, target)?;
				break;
			}

			trace!(message = "Transforming", step = %name, position);
			let next = step.transform_one(&x)?;
			trace!(message = "Fitting", step = %name, position);
			step.fit_one(&x, target)?;
			x = Cow::Owned(next);
		}

		return Ok(());
	}
}
