//! Compose stateful, record-at-a-time stages into pipelines and run them
//! over a stream without leaking targets into predictions.

pub mod compose;
pub mod errors;
pub mod evaluate;
pub mod filter;
pub mod func;
pub mod graph;
pub mod labels;
pub mod node;
pub mod pipeline;
pub mod record;
pub mod stage;
pub mod union;

#[cfg(test)]
mod testing;

pub use compose::{parallel, then};
pub use errors::{CapabilityError, ConstructionError, SchemaError, StageError};
pub use evaluate::{
	online_score, online_score_with, online_trace, Metric, OnlineScoreConfig, ScoreTrace,
};
pub use filter::FilterStage;
pub use func::FuncStage;
pub use graph::{GraphEdge, GraphNode, StageGraph};
pub use labels::{FieldName, StageName};
pub use node::{Node, NodeIdentity};
pub use pipeline::Pipeline;
pub use record::{Record, Value};
pub use stage::{Stage, StageId, StageRef, StageRoles};
pub use union::Union;
