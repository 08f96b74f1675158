//! Derives relationships between skills.
//!
//! Three independent rules feed one deduplicated edge list. Two skills may be
//! linked more than once, but never twice for the same reason.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use rand::Rng;

use super::config::GraphConfig;
use super::types::{EdgeKind, GraphEdge, GraphNode};

struct EdgeSet<'a> {
	nodes: &'a [GraphNode],
	seen: HashSet<(usize, usize, EdgeKind)>,
	edges: Vec<GraphEdge>,
}

impl<'a> EdgeSet<'a> {
	fn new(nodes: &'a [GraphNode]) -> Self {
		Self {
			nodes,
			seen: HashSet::new(),
			edges: Vec::new(),
		}
	}

	/// Returns false for self-loops and repeats.
	fn insert(&mut self, a: usize, b: usize, kind: EdgeKind, strength: f64) -> bool {
		if a == b || !self.seen.insert((a.min(b), a.max(b), kind)) {
			return false;
		}
		self.edges.push(GraphEdge {
			source: a,
			target: b,
			source_id: self.nodes[a].id.clone(),
			target_id: self.nodes[b].id.clone(),
			kind,
			strength: strength.clamp(0.0, 1.0),
		});
		true
	}
}

pub fn infer_edges<R: Rng + ?Sized>(
	nodes: &[GraphNode],
	config: &GraphConfig,
	rng: &mut R,
) -> Vec<GraphEdge> {
	if nodes.len() < 2 {
		return Vec::new();
	}
	let mut set = EdgeSet::new(nodes);
	category_edges(&mut set, config);
	complementary_edges(&mut set, config);
	sampled_edges(&mut set, config, rng);
	set.edges
}

fn category_edges(set: &mut EdgeSet<'_>, config: &GraphConfig) {
	let nodes = set.nodes;
	let mut buckets: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
	for (slot, node) in nodes.iter().enumerate() {
		if node.proficiency >= config.category_threshold {
			buckets.entry(node.category.as_str()).or_default().push(slot);
		}
	}

	for members in buckets.values() {
		for (i, &a) in members.iter().enumerate() {
			for &b in &members[i + 1..] {
				let avg = (nodes[a].proficiency as f64 + nodes[b].proficiency as f64) / 2.0;
				set.insert(a, b, EdgeKind::Category, avg / 100.0);
			}
		}
	}
}

/// First node whose name contains `pattern`, falling back to category.
fn find_match(nodes: &[GraphNode], pattern: &str) -> Option<usize> {
	let pattern = pattern.to_lowercase();
	nodes
		.iter()
		.position(|n| n.name.to_lowercase().contains(&pattern))
		.or_else(|| {
			nodes
				.iter()
				.position(|n| n.category.to_lowercase().contains(&pattern))
		})
}

fn complementary_edges(set: &mut EdgeSet<'_>, config: &GraphConfig) {
	for (first, second) in &config.complementary_pairs {
		match (find_match(set.nodes, first), find_match(set.nodes, second)) {
			(Some(a), Some(b)) => {
				set.insert(a, b, EdgeKind::Complementary, config.complementary_strength);
			}
			_ => debug!("complementary pair {first:?} / {second:?} has no match"),
		}
	}
}

fn sampled_edges<R: Rng + ?Sized>(set: &mut EdgeSet<'_>, config: &GraphConfig, rng: &mut R) {
	let nodes = set.nodes;
	let top: Vec<usize> = (0..nodes.len())
		.filter(|&slot| nodes[slot].proficiency >= config.sampled_threshold)
		.collect();
	if top.len() < config.sampled_min_members.max(2) {
		return;
	}

	for _ in 0..config.sampled_max_edges {
		let i = rng.gen_range(0..top.len());
		let mut j = rng.gen_range(0..top.len() - 1);
		if j >= i {
			j += 1;
		}
		set.insert(top[i], top[j], EdgeKind::Sampled, config.sampled_strength);
	}
}
