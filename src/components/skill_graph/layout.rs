//! Force simulation over the skill graph.
//!
//! `force_graph` supplies many-body repulsion and a uniform spring; the
//! layout layers strength-weighted link attraction, collision and centering
//! on top, and cools the whole system so it comes to rest.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::debug;

use super::config::ForceConfig;
use super::types::{GraphEdge, GraphNode, Point};

#[derive(Clone, Debug, Default)]
pub struct LayoutNode {
	pub slot: usize,
}

#[derive(Clone, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	distance: f64,
}

pub struct ForceLayout {
	graph: ForceGraph<LayoutNode, ()>,
	indices: Vec<DefaultNodeIdx>,
	links: Vec<Link>,
	radii: Vec<f64>,
	positions: Vec<Option<Point>>,
	center: Point,
	config: ForceConfig,
	alpha: f64,
	stopped: bool,
}

impl ForceLayout {
	pub fn new(
		nodes: &[GraphNode],
		edges: &[GraphEdge],
		config: &ForceConfig,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(config.simulation_parameters());
		let center = Point::new(width / 2.0, height / 2.0);
		let ring = 60.0 + 8.0 * nodes.len() as f64;

		let indices: Vec<DefaultNodeIdx> = nodes
			.iter()
			.enumerate()
			.map(|(slot, node)| {
				let angle = slot as f64 * 2.0 * PI / nodes.len() as f64;
				graph.add_node(NodeData {
					x: (center.x + ring * angle.cos()) as f32,
					y: (center.y + ring * angle.sin()) as f32,
					mass: (node.weight / 2.0) as f32,
					is_anchor: false,
					user_data: LayoutNode { slot },
				})
			})
			.collect();

		let links = edges
			.iter()
			.map(|edge| {
				graph.add_edge(indices[edge.source], indices[edge.target], EdgeData::default());
				Link {
					source: edge.source,
					target: edge.target,
					strength: edge.strength,
					distance: config.link_distance + (1.0 - edge.strength) * config.link_distance_spread,
				}
			})
			.collect();

		Self {
			graph,
			indices,
			links,
			radii: nodes.iter().map(|n| n.weight).collect(),
			positions: vec![None; nodes.len()],
			center,
			config: config.clone(),
			alpha: if nodes.is_empty() { 0.0 } else { 1.0 },
			stopped: false,
		}
	}

	pub fn positions(&self) -> &[Option<Point>] {
		&self.positions
	}

	pub fn position(&self, slot: usize) -> Option<Point> {
		self.positions.get(slot).copied().flatten()
	}

	pub fn is_settled(&self) -> bool {
		self.stopped || self.alpha <= 0.0
	}

	/// Advance one step. Returns whether the layout is still moving.
	pub fn tick(&mut self, dt: f32) -> bool {
		if self.is_settled() {
			return false;
		}
		self.graph.update(dt * self.alpha as f32);

		let mut pos = vec![Point::default(); self.indices.len()];
		let mut anchored = vec![false; self.indices.len()];
		self.graph.visit_nodes(|node| {
			let slot = node.data.user_data.slot;
			pos[slot] = Point::new(node.x() as f64, node.y() as f64);
			anchored[slot] = node.data.is_anchor;
		});

		self.apply_links(&mut pos, &anchored);
		self.apply_collisions(&mut pos, &anchored);
		self.apply_centering(&mut pos, &anchored);

		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				let p = pos[node.data.user_data.slot];
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
			}
		});
		for (slot, p) in pos.into_iter().enumerate() {
			self.positions[slot] = Some(p);
		}

		self.alpha -= self.alpha * self.config.alpha_decay;
		if self.alpha < self.config.alpha_min {
			self.alpha = 0.0;
			debug!("layout settled with {} nodes", self.indices.len());
		}
		!self.is_settled()
	}

	fn apply_links(&self, pos: &mut [Point], anchored: &[bool]) {
		for link in &self.links {
			let (a, b) = (pos[link.source], pos[link.target]);
			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 1e-6 {
				continue;
			}
			let k = (dist - link.distance) / dist * link.strength * self.config.link_strength * self.alpha;
			let (mx, my) = (dx * k, dy * k);
			let share = match (anchored[link.source], anchored[link.target]) {
				(true, true) => continue,
				(true, false) | (false, true) => 1.0,
				(false, false) => 0.5,
			};
			if !anchored[link.source] {
				pos[link.source].x += mx * share;
				pos[link.source].y += my * share;
			}
			if !anchored[link.target] {
				pos[link.target].x -= mx * share;
				pos[link.target].y -= my * share;
			}
		}
	}

	fn apply_collisions(&self, pos: &mut [Point], anchored: &[bool]) {
		let margin = self.config.collision_margin;
		for i in 0..pos.len() {
			for j in i + 1..pos.len() {
				let min = self.radii[i] + self.radii[j] + margin;
				let (mut dx, mut dy) = (pos[j].x - pos[i].x, pos[j].y - pos[i].y);
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min {
					continue;
				}
				if dist < 1e-6 {
					// coincident: separate along an angle derived from the pair
					let angle = (i * 31 + j * 17) as f64;
					(dx, dy, dist) = (angle.cos(), angle.sin(), 1.0);
				}
				let overlap = min - dist;
				let (ux, uy) = (dx / dist, dy / dist);
				let (si, sj) = match (anchored[i], anchored[j]) {
					(true, true) => continue,
					(true, false) => (0.0, 1.0),
					(false, true) => (1.0, 0.0),
					(false, false) => (0.5, 0.5),
				};
				pos[i].x -= ux * overlap * si;
				pos[i].y -= uy * overlap * si;
				pos[j].x += ux * overlap * sj;
				pos[j].y += uy * overlap * sj;
			}
		}
	}

	fn apply_centering(&self, pos: &mut [Point], anchored: &[bool]) {
		let free: Vec<usize> = (0..pos.len()).filter(|&s| !anchored[s]).collect();
		if free.is_empty() {
			return;
		}
		let n = pos.len() as f64;
		let (cx, cy) = pos
			.iter()
			.fold((0.0, 0.0), |(x, y), p| (x + p.x / n, y + p.y / n));
		let (sx, sy) = (
			(self.center.x - cx) * self.config.center_strength,
			(self.center.y - cy) * self.config.center_strength,
		);
		for slot in free {
			pos[slot].x += sx;
			pos[slot].y += sy;
		}
	}

	/// Pin a node where the user dropped it.
	pub fn pin(&mut self, slot: usize, at: Point) {
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.slot == slot {
				node.data.x = at.x as f32;
				node.data.y = at.y as f32;
				node.data.is_anchor = true;
			}
		});
		if let Some(p) = self.positions.get_mut(slot) {
			*p = Some(at);
		}
		self.reheat();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.center = Point::new(width / 2.0, height / 2.0);
		self.reheat();
	}

	pub fn reheat(&mut self) {
		if !self.stopped && !self.indices.is_empty() {
			self.alpha = self.alpha.max(self.config.reheat_alpha);
		}
	}

	/// Stop stepping for good. A stopped layout keeps its last positions.
	pub fn stop(&mut self) {
		if !self.stopped {
			debug!("stopping layout with {} nodes", self.indices.len());
		}
		self.stopped = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_graph::config::GraphConfig;
	use crate::components::skill_graph::normalize::normalize_skills;
	use crate::components::skill_graph::types::SkillRecord;

	fn graph(n: usize) -> Vec<GraphNode> {
		let records: Vec<_> = (0..n)
			.map(|i| SkillRecord::new(&format!("s{i}"), &format!("Skill {i}"), "Tools", 60.0))
			.collect();
		normalize_skills(&records, &GraphConfig::default()).unwrap()
	}

	fn run_to_rest(layout: &mut ForceLayout) -> usize {
		let mut ticks = 0;
		while layout.tick(0.016) {
			ticks += 1;
			assert!(ticks < 10_000, "layout never settled");
		}
		ticks
	}

	#[test]
	fn empty_layout_settles_immediately() {
		let mut layout = ForceLayout::new(&[], &[], &ForceConfig::default(), 800.0, 600.0);
		assert!(layout.is_settled());
		assert!(!layout.tick(0.016));
		assert!(layout.positions().is_empty());
	}

	#[test]
	fn positions_are_unknown_until_first_tick() {
		let nodes = graph(3);
		let mut layout = ForceLayout::new(&nodes, &[], &ForceConfig::default(), 800.0, 600.0);
		assert!(layout.positions().iter().all(Option::is_none));
		layout.tick(0.016);
		assert!(layout.positions().iter().all(Option::is_some));
	}

	#[test]
	fn settles_without_overlap_near_center() {
		let nodes = graph(3);
		let mut layout = ForceLayout::new(&nodes, &[], &ForceConfig::default(), 800.0, 600.0);
		run_to_rest(&mut layout);

		let pos: Vec<Point> = layout.positions().iter().map(|p| p.unwrap()).collect();
		for i in 0..pos.len() {
			for j in i + 1..pos.len() {
				assert!(pos[i].distance(pos[j]) >= nodes[i].weight + nodes[j].weight);
			}
		}
		let cx = pos.iter().map(|p| p.x).sum::<f64>() / 3.0;
		let cy = pos.iter().map(|p| p.y).sum::<f64>() / 3.0;
		assert!(Point::new(cx, cy).distance(Point::new(400.0, 300.0)) < 50.0);
	}

	#[test]
	fn pinned_node_stays_put() {
		let nodes = graph(4);
		let mut layout = ForceLayout::new(&nodes, &[], &ForceConfig::default(), 800.0, 600.0);
		layout.tick(0.016);
		let at = Point::new(100.0, 100.0);
		layout.pin(0, at);
		run_to_rest(&mut layout);
		assert_eq!(layout.position(0), Some(at));
	}

	#[test]
	fn stopped_layout_no_longer_moves() {
		let nodes = graph(4);
		let mut layout = ForceLayout::new(&nodes, &[], &ForceConfig::default(), 800.0, 600.0);
		layout.tick(0.016);
		let before = layout.positions().to_vec();
		layout.stop();
		layout.reheat();
		assert!(!layout.tick(0.016));
		assert_eq!(layout.positions(), &before[..]);
	}

	#[test]
	fn resize_moves_center_and_reheats() {
		let nodes = graph(2);
		let mut layout = ForceLayout::new(&nodes, &[], &ForceConfig::default(), 800.0, 600.0);
		run_to_rest(&mut layout);
		layout.resize(400.0, 400.0);
		assert_eq!(layout.center, Point::new(200.0, 200.0));
		assert!(!layout.is_settled());
	}
}
