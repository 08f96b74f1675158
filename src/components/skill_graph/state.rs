use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::GraphConfig;
use super::error::Result;
use super::interaction::InteractionController;
use super::layout::ForceLayout;
use super::model::SkillGraph;
use super::types::{Point, SelectedNode, SkillRecord};

/// Extra hit area around a node, in graph units.
pub const HIT_PADDING: f64 = 4.0;
/// Pointer travel (screen px) below which a press/release counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;
const FOCUS_EASE: f64 = 0.12;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<usize>,
	pub start: Point,
	pub node_start: Point,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start: Point,
	pub transform_start: Point,
	pub moved: bool,
}

/// What a completed press/release meant.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
	None,
	Selected(SelectedNode),
	Cleared,
}

pub struct SkillGraphState {
	pub graph: SkillGraph,
	pub layout: ForceLayout,
	pub interaction: InteractionController,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	config: GraphConfig,
	rng: SmallRng,
}

impl SkillGraphState {
	pub fn new(config: GraphConfig, width: f64, height: f64, seed: u64) -> Self {
		let graph = SkillGraph::default();
		Self {
			layout: ForceLayout::new(graph.nodes(), graph.edges(), &config.force, width, height),
			interaction: InteractionController::new(&graph),
			graph,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			config,
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	/// Replace the graph with one built from `records`.
	///
	/// The old simulation is stopped first and all interaction state is
	/// dropped. On error the state is left holding an empty graph.
	pub fn rebuild(&mut self, records: &[SkillRecord]) -> Result<()> {
		self.layout.stop();
		self.drag = DragState::default();
		self.pan = PanState::default();

		let (graph, result) = match SkillGraph::build(records, &self.config, &mut self.rng) {
			Ok(graph) => (graph, Ok(())),
			Err(e) => (SkillGraph::default(), Err(e)),
		};
		self.graph = graph;
		self.layout = ForceLayout::new(
			self.graph.nodes(),
			self.graph.edges(),
			&self.config.force,
			self.width,
			self.height,
		);
		self.interaction.reset(&self.graph);
		result
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost visible node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let at = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (slot, node) in self.graph.nodes().iter().enumerate() {
			if !self.interaction.is_visible(slot) {
				continue;
			}
			let Some(p) = self.layout.position(slot) else {
				continue;
			};
			if p.distance(at) < node.weight + HIT_PADDING {
				found = Some(slot);
			}
		}
		found
	}

	pub fn set_search(&mut self, term: &str) -> usize {
		self.interaction.set_search(&self.graph, term)
	}

	pub fn set_category(&mut self, category: Option<&str>) -> bool {
		self.interaction.set_category(&self.graph, category)
	}

	pub fn select_id(&mut self, id: &str) -> Option<SelectedNode> {
		self.interaction.select_id(&self.graph, id)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		let start = Point::new(x, y);
		if let Some(slot) = self.node_at_position(x, y) {
			let Some(node_start) = self.layout.position(slot) else {
				return;
			};
			self.drag = DragState {
				node: Some(slot),
				start,
				node_start,
				moved: false,
			};
		} else {
			self.pan = PanState {
				active: true,
				start,
				transform_start: Point::new(self.transform.x, self.transform.y),
				moved: false,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let at = Point::new(x, y);
		if let Some(slot) = self.drag.node {
			self.drag.moved |= at.distance(self.drag.start) >= CLICK_TOLERANCE;
			if self.drag.moved {
				let k = self.transform.k;
				let to = Point::new(
					self.drag.node_start.x + (x - self.drag.start.x) / k,
					self.drag.node_start.y + (y - self.drag.start.y) / k,
				);
				self.layout.pin(slot, to);
			}
		} else if self.pan.active {
			self.pan.moved |= at.distance(self.pan.start) >= CLICK_TOLERANCE;
			if self.pan.moved {
				self.interaction.clear_focus();
				self.transform.x = self.pan.transform_start.x + (x - self.pan.start.x);
				self.transform.y = self.pan.transform_start.y + (y - self.pan.start.y);
			}
		} else {
			let hovered = self.node_at_position(x, y);
			self.interaction.set_hovered(&self.graph, hovered);
		}
	}

	/// Finish a press. A press that barely moved is a click: on a node it
	/// selects, on empty canvas it clears the selection.
	pub fn pointer_up(&mut self) -> PointerOutcome {
		let drag = std::mem::take(&mut self.drag);
		let pan = std::mem::take(&mut self.pan);

		match (drag.node, pan.active) {
			(Some(slot), _) if !drag.moved => self
				.interaction
				.select(&self.graph, slot)
				.map_or(PointerOutcome::None, PointerOutcome::Selected),
			(None, true) if !pan.moved => {
				if self.interaction.selected().is_some() {
					self.interaction.clear_selection();
					PointerOutcome::Cleared
				} else {
					PointerOutcome::None
				}
			}
			_ => PointerOutcome::None,
		}
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.interaction.set_hovered(&self.graph, None);
	}

	/// Zoom around the pointer.
	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.layout.tick(dt);
		self.follow_focus();
	}

	/// Ease the camera toward the focused node once it has a position.
	fn follow_focus(&mut self) {
		let Some(slot) = self.interaction.focus() else {
			return;
		};
		let Some(p) = self.layout.position(slot) else {
			return;
		};
		let (tx, ty) = (
			self.width / 2.0 - p.x * self.transform.k,
			self.height / 2.0 - p.y * self.transform.k,
		);
		self.transform.x += (tx - self.transform.x) * FOCUS_EASE;
		self.transform.y += (ty - self.transform.y) * FOCUS_EASE;
		if (tx - self.transform.x).abs() < 0.5 && (ty - self.transform.y).abs() < 0.5 {
			self.interaction.clear_focus();
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		debug!("resizing skill graph to {width}x{height}");
		self.width = width;
		self.height = height;
		self.layout.resize(width, height);
	}
}
