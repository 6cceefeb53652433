//! The data flow graph of a composite

use rill_util::graph::{
	finalized::FinalizedGraph,
	graph::Graph,
	util::{GraphEdgeIdx, GraphNodeIdx},
};
use serde::{Serialize, Serializer};

use crate::{
	labels::StageName,
	node::Node,
	pipeline::Pipeline,
	stage::StageId,
	union::Union,
};

/// A node in a [`StageGraph`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphNode {
	/// Where records enter
	Input,

	/// Where records leave
	Output,

	/// One appearance of a stage.
	/// A stage used twice appears twice.
	Stage {
		name: StageName,

		#[serde(skip)]
		id: StageId,
	},
}

/// How records move along an edge in a [`StageGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphEdge {
	/// Output of one step becomes the input of the next
	Sequential,

	/// One record is copied to every member of a union.
	/// Always used for edges that enter a union member.
	FanOut,

	/// Outputs of a union's members are merged
	FanIn,
}

/// A read-only view of how records flow through a composite.
///
/// Every graph has exactly one [`GraphNode::Input`] and one
/// [`GraphNode::Output`] and is acyclic.
#[derive(Debug)]
pub struct StageGraph {
	graph: FinalizedGraph<GraphNode, GraphEdge>,
	input: GraphNodeIdx,
	output: GraphNodeIdx,
}

/// Nodes whose outputs flow into the next thing we add,
/// with the kind of edge they'll be connected by.
type Sources = Vec<(GraphNodeIdx, GraphEdge)>;

impl StageGraph {
	pub fn of_pipeline(pipeline: &Pipeline) -> Self {
		return Self::build(|graph, sources| {
			pipeline
				.steps()
				.fold(sources, |s, (_, step)| add_node(graph, step, s))
		});
	}

	pub fn of_union(union: &Union) -> Self {
		return Self::build(|graph, sources| add_union(graph, union, sources));
	}

	fn build(inner: impl FnOnce(&mut Graph<GraphNode, GraphEdge>, Sources) -> Sources) -> Self {
		let mut graph = Graph::new();
		let input = graph.add_node(GraphNode::Input);
		let sinks = inner(&mut graph, vec![(input, GraphEdge::Sequential)]);

		let output = graph.add_node(GraphNode::Output);
		for (from, kind) in sinks {
			graph.add_edge(from, output, kind);
		}

		return Self {
			graph: graph.finalize(),
			input,
			output,
		};
	}

	pub fn input(&self) -> GraphNodeIdx {
		self.input
	}

	pub fn output(&self) -> GraphNodeIdx {
		self.output
	}

	pub fn len_nodes(&self) -> usize {
		self.graph.len_nodes()
	}

	pub fn len_edges(&self) -> usize {
		self.graph.len_edges()
	}

	pub fn get_node(&self, node: GraphNodeIdx) -> Option<&GraphNode> {
		self.graph.get_node(node)
	}

	/// Iterate over all nodes in insertion order
	pub fn nodes(&self) -> impl Iterator<Item = (GraphNodeIdx, &GraphNode)> {
		self.graph.iter_nodes_idx()
	}

	/// Iterate over all edges as `(from, to, kind)`
	pub fn edges(&self) -> impl Iterator<Item = (GraphNodeIdx, GraphNodeIdx, GraphEdge)> + '_ {
		self.graph.iter_edges().map(|(f, t, k)| (f, t, *k))
	}

	/// The nodes `node` has an edge to
	pub fn successors(&self, node: GraphNodeIdx) -> Vec<GraphNodeIdx> {
		self.follow(self.graph.edges_starting_at(node), |(_, to, _)| to)
	}

	/// The nodes that have an edge to `node`
	pub fn predecessors(&self, node: GraphNodeIdx) -> Vec<GraphNodeIdx> {
		self.follow(self.graph.edges_ending_at(node), |(from, _, _)| from)
	}

	fn follow(
		&self,
		edges: Option<&[GraphEdgeIdx]>,
		pick: impl Fn((GraphNodeIdx, GraphNodeIdx, &GraphEdge)) -> GraphNodeIdx,
	) -> Vec<GraphNodeIdx> {
		edges
			.unwrap_or_default()
			.iter()
			.filter_map(|e| self.graph.get_edge(*e))
			.map(pick)
			.collect()
	}

	/// All nodes, ordered so that every edge points forward.
	///
	/// Graphs built from composites are always acyclic,
	/// so this only returns `None` if that invariant is broken.
	pub fn topological_order(&self) -> Option<Vec<GraphNodeIdx>> {
		self.graph.toposort()
	}

	/// The names of all stages in topological order
	pub fn stage_names(&self) -> Vec<StageName> {
		self.topological_order()
			.unwrap_or_default()
			.into_iter()
			.filter_map(|idx| match self.graph.get_node(idx) {
				Some(GraphNode::Stage { name, .. }) => Some(name.clone()),
				_ => None,
			})
			.collect()
	}
}

fn add_node(graph: &mut Graph<GraphNode, GraphEdge>, node: &Node, sources: Sources) -> Sources {
	match node {
		Node::Leaf(stage) => {
			let idx = graph.add_node(GraphNode::Stage {
				name: stage.name().clone(),
				id: stage.id(),
			});
			for (from, kind) in sources {
				graph.add_edge(from, idx, kind);
			}
			return vec![(idx, GraphEdge::Sequential)];
		}

		Node::Pipeline(p) => {
			return p
				.steps()
				.fold(sources, |s, (_, step)| add_node(graph, step, s));
		}

		Node::Union(u) => return add_union(graph, u, sources),
	}
}

fn add_union(graph: &mut Graph<GraphNode, GraphEdge>, union: &Union, sources: Sources) -> Sources {
	// Every member gets a copy of the input...
	// An edge out of one union's member straight into another's is `FanOut`.
	let fan_out: Sources = sources
		.into_iter()
		.map(|(from, _)| (from, GraphEdge::FanOut))
		.collect();

	// ...and all member outputs are merged.
	let mut sinks = Vec::new();
	for (_, member) in union.members() {
		sinks.extend(
			add_node(graph, member, fan_out.clone())
				.into_iter()
				.map(|(from, _)| (from, GraphEdge::FanIn)),
		);
	}

	return sinks;
}

//
// MARK: Serialize
//

#[derive(Serialize)]
struct GraphDump {
	nodes: Vec<GraphNode>,
	edges: Vec<EdgeDump>,
}

#[derive(Serialize)]
struct EdgeDump {
	from: usize,
	to: usize,
	kind: GraphEdge,
}

impl Serialize for StageGraph {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		GraphDump {
			nodes: self.graph.iter_nodes().cloned().collect(),
			edges: self
				.edges()
				.map(|(from, to, kind)| EdgeDump {
					from: from.as_usize(),
					to: to.as_usize(),
					kind,
				})
				.collect(),
		}
		.serialize(serializer)
	}
}
