//! Convenient graph manipulation.
//! We don't use petgraph directly because we need parallel edges
//! and stable, insertion-ordered indices.

pub mod finalized;
#[expect(clippy::module_inception)]
pub mod graph;
pub mod util;
