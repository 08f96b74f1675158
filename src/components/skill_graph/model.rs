use std::collections::HashMap;

use log::info;
use rand::Rng;

use super::config::GraphConfig;
use super::error::Result;
use super::inference::infer_edges;
use super::normalize::normalize_skills;
use super::types::{Connection, GraphEdge, GraphNode, SelectedNode, SkillRecord};

/// Nodes and inferred edges for one skill list. Rebuilt wholesale whenever
/// the list changes; node slots are stable for the lifetime of one instance.
#[derive(Clone, Debug, Default)]
pub struct SkillGraph {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	by_id: HashMap<String, usize>,
}

impl SkillGraph {
	pub fn build<R: Rng + ?Sized>(
		records: &[SkillRecord],
		config: &GraphConfig,
		rng: &mut R,
	) -> Result<Self> {
		let nodes = normalize_skills(records, config)?;
		let edges = infer_edges(&nodes, config, rng);
		let by_id = nodes
			.iter()
			.enumerate()
			.map(|(slot, node)| (node.id.clone(), slot))
			.collect();
		info!(
			"skill graph built: {} nodes, {} edges from {} records",
			nodes.len(),
			edges.len(),
			records.len()
		);
		Ok(Self { nodes, edges, by_id })
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn slot(&self, id: &str) -> Option<usize> {
		self.by_id.get(id).copied()
	}

	/// Directly linked nodes, one entry per neighbour, in edge order.
	pub fn connections(&self, slot: usize) -> Vec<Connection> {
		let mut connections: Vec<Connection> = Vec::new();
		for edge in &self.edges {
			let (other, other_id) = if edge.source == slot {
				(edge.target, &edge.target_id)
			} else if edge.target == slot {
				(edge.source, &edge.source_id)
			} else {
				continue;
			};
			match connections.iter_mut().find(|c| &c.node.id == other_id) {
				Some(existing) => existing.kinds.push(edge.kind),
				None => connections.push(Connection {
					node: self.nodes[other].clone(),
					kinds: vec![edge.kind],
				}),
			}
		}
		connections
	}

	pub fn selection(&self, slot: usize) -> Option<SelectedNode> {
		let node = self.nodes.get(slot)?.clone();
		Some(SelectedNode {
			node,
			connections: self.connections(slot),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_graph::types::EdgeKind;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	fn build(records: &[SkillRecord], config: &GraphConfig) -> SkillGraph {
		SkillGraph::build(records, config, &mut SmallRng::seed_from_u64(5)).unwrap()
	}

	#[test]
	fn connections_merge_reasons_per_neighbour() {
		let config = GraphConfig::default().with_complementary_pairs(&[("Nmap", "Wireshark")]);
		let graph = build(
			&[
				SkillRecord::new("a", "Nmap", "Network Security", 80.0),
				SkillRecord::new("b", "Wireshark", "Network Security", 80.0),
				SkillRecord::new("c", "Ghidra", "Reverse Engineering", 80.0),
			],
			&config,
		);
		let a = graph.slot("a").unwrap();
		let connections = graph.connections(a);
		assert_eq!(connections.len(), 1);
		assert_eq!(connections[0].node.id, "b");
		assert_eq!(
			connections[0].kinds,
			vec![EdgeKind::Category, EdgeKind::Complementary]
		);
		assert!(graph.connections(graph.slot("c").unwrap()).is_empty());
	}

	#[test]
	fn selection_carries_node_and_neighbours() {
		let config = GraphConfig::default();
		let graph = build(
			&[
				SkillRecord::new("a", "AWS", "Cloud Security", 80.0),
				SkillRecord::new("b", "Azure", "Cloud Security", 70.0),
			],
			&config,
		);
		let selected = graph.selection(graph.slot("b").unwrap()).unwrap();
		assert_eq!(selected.node.name, "Azure");
		assert_eq!(selected.connections[0].node.id, "a");
		assert!(graph.selection(99).is_none());
	}
}
