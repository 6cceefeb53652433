//! Parallel composition

use itertools::Itertools;
use rill_util::names::check_name;
use tracing::{debug, trace};

use crate::{
	errors::{CapabilityError, ConstructionError, StageError},
	graph::StageGraph,
	labels::StageName,
	node::{Node, NodeIdentity},
	record::Record,
	stage::StageRoles,
};

/// A set of transformers that all see the same input.
///
/// Their outputs are merged into one record. If two members produce the
/// same field, the member added later wins.
///
/// Unions never contain other unions: a union added to a union is
/// flattened into it. Adding a member that is already present
/// (the same stage instance, or a composite of the same instances)
/// does nothing.
#[derive(Debug, Clone, Default)]
pub struct Union {
	members: Vec<(StageName, Node)>,
}

//
// MARK: Structure
//

impl Union {
	/// Create an empty union
	pub fn new() -> Self {
		Self {
			members: Vec::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	/// Iterate over this union's members, in insertion order
	pub fn members(&self) -> impl Iterator<Item = (&StageName, &Node)> {
		self.members.iter().map(|(name, node)| (name, node))
	}

	/// The name of every member, in insertion order
	pub fn names(&self) -> impl Iterator<Item = &StageName> {
		self.members.iter().map(|(name, _)| name)
	}

	/// Find the first member with the given name
	pub fn get(&self, name: &str) -> Option<&Node> {
		self.members
			.iter()
			.find(|(n, _)| n.as_str() == name)
			.map(|(_, node)| node)
	}

	/// The display names of all members, joined with ` + `
	pub fn name(&self) -> StageName {
		self.members
			.iter()
			.map(|(_, node)| node.name())
			.join(" + ")
			.into()
	}

	/// Unions are always transformers
	pub fn roles(&self) -> StageRoles {
		StageRoles::TRANSFORMER
	}

	pub fn identity(&self) -> Vec<NodeIdentity> {
		self.members.iter().map(|(_, node)| node.identity()).collect()
	}

	/// Is `node` already a member of this union?
	pub fn contains(&self, node: &Node) -> bool {
		let id = node.identity();
		self.members.iter().any(|(_, x)| x.identity() == id)
	}

	/// The data flow graph of this union
	pub fn graph(&self) -> StageGraph {
		StageGraph::of_union(self)
	}

	/// Add a node to this union, named after its display name.
	///
	/// Unions are flattened into this one, keeping their member names.
	/// If this fails, `self` is left unchanged.
	pub fn push(&mut self, node: impl Into<Node>) -> Result<(), StageError> {
		let node = node.into();
		let new_members = match node {
			Node::Union(u) => {
				if u.is_empty() {
					return Err(ConstructionError::EmptyUnion.into());
				}
				debug!(
					message = "Flattening union",
					into = %self.name(),
					members = u.len()
				);
				u.members
			}
			Node::Pipeline(ref p) if p.is_empty() => {
				return Err(ConstructionError::EmptyPipeline.into());
			}
			node => vec![(node.name(), node)],
		};

		return self.append(new_members);
	}

	/// Add a node to this union under an explicit name.
	///
	/// Unions cannot be named, since they are flattened.
	pub fn push_named(&mut self, name: &str, node: impl Into<Node>) -> Result<(), StageError> {
		check_name(name).map_err(|error| ConstructionError::InvalidName {
			name: name.into(),
			error,
		})?;

		let node = node.into();
		match &node {
			Node::Union(_) => return Err(ConstructionError::CannotName { what: "union" }.into()),
			Node::Pipeline(p) if p.is_empty() => {
				return Err(ConstructionError::EmptyPipeline.into())
			}
			_ => {}
		}

		return self.append(vec![(name.into(), node)]);
	}

	/// Parallel composition (`self + other`).
	/// Consumes `self` and returns the extended union.
	pub fn parallel(mut self, other: impl Into<Node>) -> Result<Union, StageError> {
		self.push(other)?;
		return Ok(self);
	}

	fn append(&mut self, new_members: Vec<(StageName, Node)>) -> Result<(), StageError> {
		if let Some((_, node)) = new_members.iter().find(|(_, x)| !x.roles().transformer) {
			return Err(CapabilityError::UnionMemberNotTransformer { stage: node.name() }.into());
		}

		for (name, node) in new_members {
			if self.contains(&node) {
				debug!(
					message = "Skipping duplicate union member",
					member = %name,
					union = %self.name()
				);
				continue;
			}
			self.members.push((name, node));
		}

		return Ok(());
	}
}

//
// MARK: Execution
//

impl Union {
	/// Run every member on `record` and merge what each of them changed.
	///
	/// Members don't see each other's output. Starting from `record`, each
	/// member's output is applied in order: fields it adds or changes are set,
	/// fields it drops are removed. Fields a member passes through untouched
	/// never override another member's change. When two members change the
	/// same field, the later one wins.
	pub fn transform_one(&self, record: &Record) -> Result<Record, StageError> {
		if self.members.is_empty() {
			return Err(ConstructionError::EmptyUnion.into());
		}

		let mut out = record.clone();
		for (name, member) in &self.members {
			trace!(message = "Transforming union member", member = %name);
			out.apply_changes(record, member.transform_one(record)?);
		}

		return Ok(out);
	}

	/// Fit every member on the same (untransformed) record and target.
	pub fn fit_one(&mut self, record: &Record, target: f64) -> Result<(), StageError> {
		if self.members.is_empty() {
			return Err(ConstructionError::EmptyUnion.into());
		}

		for (name, member) in &mut self.members {
			trace!(message = "Fitting union member", member = %name);
			member.fit_one(record, target)?;
		}

		return Ok(());
	}

	/// Unions never predict
	pub fn predict_one(&self, _record: &Record) -> Result<f64, StageError> {
		return Err(CapabilityError::CannotPredict { stage: self.name() }.into());
	}
}
