//! Composition operators.
//!
//! `then(a, b)` is `a | b`: a [`Pipeline`] that runs `a`, then `b`.
//! `parallel(a, b)` is `a + b`: a [`Union`] that runs `a` and `b` on the
//! same input and merges their outputs.
//!
//! Both operators flatten: composing a pipeline into a pipeline splices
//! its steps in, composing a union into a union merges its members.
//! Neither operator modifies its operands' stages. Composites are copied,
//! leaves are shared.

use crate::{errors::StageError, node::Node, pipeline::Pipeline, union::Union};

/// Sequential composition: `first | next`.
///
/// `first` must be a transformer. The result is a predictor iff
/// `next` is one.
pub fn then(first: impl Into<Node>, next: impl Into<Node>) -> Result<Pipeline, StageError> {
	let mut p = Pipeline::new();
	p.push(first)?;
	p.push(next)?;
	return Ok(p);
}

/// Parallel composition: `a + b`.
///
/// Both operands must be transformers.
pub fn parallel(a: impl Into<Node>, b: impl Into<Node>) -> Result<Union, StageError> {
	let mut u = Union::new();
	u.push(a)?;
	u.push(b)?;
	return Ok(u);
}

/// Chain any number of nodes into one pipeline
pub fn chain<I>(nodes: I) -> Result<Pipeline, StageError>
where
	I: IntoIterator,
	I::Item: Into<Node>,
{
	let mut p = Pipeline::new();
	for node in nodes {
		p.push(node)?;
	}
	return Ok(p);
}

/// Put any number of nodes side by side in one union
pub fn union_of<I>(nodes: I) -> Result<Union, StageError>
where
	I: IntoIterator,
	I::Item: Into<Node>,
{
	let mut u = Union::new();
	for node in nodes {
		u.push(node)?;
	}
	return Ok(u);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		errors::ConstructionError,
		func::FuncStage,
		labels::StageName,
		record::Record,
		stage::{StageRef, StageRoles},
		testing::{EventLog, Memory, RunningSum},
	};

	fn identity(name: &str) -> StageRef {
		StageRef::new(FuncStage::with_name(name, |r: &Record| r.clone()).unwrap())
	}

	#[test]
	fn sequential_composition_is_associative() {
		let (a, b, c) = (identity("a"), identity("b"), identity("c"));

		let left = then(then(&a, &b).unwrap(), &c).unwrap();
		let right = then(&a, then(&b, &c).unwrap()).unwrap();

		assert_eq!(left.len(), 3);
		assert_eq!(left.identity(), right.identity());
		assert_eq!(left.name(), StageName::from("a | b | c"));
		assert_eq!(left.name(), right.name());
	}

	#[test]
	fn parallel_composition_is_associative() {
		let (a, b, c) = (identity("a"), identity("b"), identity("c"));

		let left = parallel(parallel(&a, &b).unwrap(), &c).unwrap();
		let right = parallel(&a, parallel(&b, &c).unwrap()).unwrap();

		assert_eq!(left.len(), 3);
		assert_eq!(left.identity(), right.identity());
		assert_eq!(left.name(), StageName::from("a + b + c"));
	}

	#[test]
	fn parallel_composition_is_idempotent() {
		let a = identity("a");
		let u = parallel(&a, &a).unwrap();
		assert_eq!(u.len(), 1);

		let uu = parallel(u.clone(), u.clone()).unwrap();
		assert_eq!(uu.identity(), u.identity());
	}

	#[test]
	fn composition_does_not_touch_operands() {
		let a = Pipeline::new().then(identity("a")).unwrap();
		let b = Pipeline::new().then(identity("b")).unwrap();

		let ab = then(a.clone(), b.clone()).unwrap();
		assert_eq!(ab.len(), 2);
		assert_eq!(a.len(), 1);
		assert_eq!(b.len(), 1);
	}

	#[test]
	fn composites_share_their_stages() {
		let memory = StageRef::new(Memory::new("memory", "last"));
		let sum = RunningSum::new("sum");

		let mut p = then(parallel(&memory, identity("id")).unwrap(), sum).unwrap();
		p.fit_one(&Record::new(), 4.0).unwrap();

		assert_eq!(
			memory.transform_one(&Record::new()),
			Ok(Record::from([("last", 4.0)]))
		);
	}

	#[test]
	fn chain_and_union_of() {
		let log = EventLog::new();
		let p = chain([
			Node::stage(Memory::new("m", "last")),
			Node::from(log.stage("end", StageRoles::PREDICTOR)),
		])
		.unwrap();
		assert_eq!(p.len(), 2);

		let u = union_of([identity("a"), identity("b"), identity("c")]).unwrap();
		assert_eq!(u.len(), 3);

		assert_eq!(
			chain(Vec::<Node>::new()).map(|p| p.len()),
			Ok(0)
		);
		assert_eq!(
			then(Pipeline::new(), identity("a")).map(|p| p.len()),
			Err(ConstructionError::EmptyPipeline.into())
		);
	}
}
