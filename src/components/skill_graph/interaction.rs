//! Search, category filter, hover and selection over one graph.
//!
//! Each input is tracked independently; the per-node style is resolved from
//! all of them at once in [`InteractionController::emphasis`].

use super::model::SkillGraph;
use super::types::{GraphEdge, SelectedNode};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
	pub search_term: String,
	/// `None` shows every category.
	pub active_category: Option<String>,
	pub hovered_node_id: Option<String>,
	pub selected_node_id: Option<String>,
}

/// Visual precedence, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Emphasis {
	Default,
	Highlighted,
	Hovered,
	Selected,
}

#[derive(Debug, Default)]
pub struct InteractionController {
	state: InteractionState,
	hovered: Option<usize>,
	selected: Option<usize>,
	highlighted: Vec<bool>,
	visible: Vec<bool>,
	focus: Option<usize>,
}

impl InteractionController {
	pub fn new(graph: &SkillGraph) -> Self {
		let mut controller = Self::default();
		controller.reset(graph);
		controller
	}

	/// Forget everything; used when the graph is rebuilt.
	pub fn reset(&mut self, graph: &SkillGraph) {
		let n = graph.nodes().len();
		*self = Self {
			highlighted: vec![false; n],
			visible: vec![true; n],
			..Self::default()
		};
	}

	pub fn state(&self) -> &InteractionState {
		&self.state
	}

	/// Mark every node whose name or category contains `term`, ignoring case.
	/// Returns the number of matches.
	pub fn set_search(&mut self, graph: &SkillGraph, term: &str) -> usize {
		self.state.search_term = term.to_string();
		let needle = term.trim().to_lowercase();

		for (slot, node) in graph.nodes().iter().enumerate() {
			self.highlighted[slot] = !needle.is_empty()
				&& (node.name.to_lowercase().contains(&needle)
					|| node.category.to_lowercase().contains(&needle));
		}
		self.focus = self.first_visible_match();
		self.highlighted.iter().filter(|&&hit| hit).count()
	}

	fn first_visible_match(&self) -> Option<usize> {
		(0..self.highlighted.len()).find(|&slot| self.highlighted[slot] && self.visible[slot])
	}

	/// Hide nodes outside `category`. Hidden nodes stay in the simulation.
	/// Returns true when this cleared the selection.
	pub fn set_category(&mut self, graph: &SkillGraph, category: Option<&str>) -> bool {
		self.state.active_category = category.map(String::from);
		for (slot, node) in graph.nodes().iter().enumerate() {
			self.visible[slot] = category.is_none_or(|c| node.category == c);
		}
		if self.hovered.is_some_and(|slot| !self.visible[slot]) {
			self.set_hovered(graph, None);
		}
		// a match revealed by the new filter becomes the camera target
		if self.focus.is_none_or(|slot| !self.visible[slot]) {
			self.focus = self.first_visible_match();
		}
		if self.selected.is_some_and(|slot| !self.visible[slot]) {
			self.clear_selection();
			return true;
		}
		false
	}

	/// Returns whether the hovered node changed.
	pub fn set_hovered(&mut self, graph: &SkillGraph, slot: Option<usize>) -> bool {
		let slot = slot.filter(|&s| self.is_visible(s));
		if self.hovered == slot {
			return false;
		}
		self.hovered = slot;
		self.state.hovered_node_id = slot.map(|s| graph.nodes()[s].id.clone());
		true
	}

	pub fn select(&mut self, graph: &SkillGraph, slot: usize) -> Option<SelectedNode> {
		if !self.is_visible(slot) {
			return None;
		}
		let selection = graph.selection(slot)?;
		self.selected = Some(slot);
		self.state.selected_node_id = Some(selection.node.id.clone());
		Some(selection)
	}

	/// Select by id, e.g. from a connection listed in the detail panel.
	/// Unknown ids clear the selection.
	pub fn select_id(&mut self, graph: &SkillGraph, id: &str) -> Option<SelectedNode> {
		match graph.slot(id).and_then(|slot| self.select(graph, slot)) {
			Some(selection) => Some(selection),
			None => {
				self.clear_selection();
				None
			}
		}
	}

	pub fn clear_selection(&mut self) {
		self.selected = None;
		self.state.selected_node_id = None;
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	pub fn is_visible(&self, slot: usize) -> bool {
		self.visible.get(slot).copied().unwrap_or(false)
	}

	pub fn is_highlighted(&self, slot: usize) -> bool {
		self.highlighted.get(slot).copied().unwrap_or(false)
	}

	pub fn emphasis(&self, slot: usize) -> Emphasis {
		if self.selected == Some(slot) {
			Emphasis::Selected
		} else if self.hovered == Some(slot) {
			Emphasis::Hovered
		} else if self.is_highlighted(slot) {
			Emphasis::Highlighted
		} else {
			Emphasis::Default
		}
	}

	/// Labels only for search matches and the selection, to keep the resting
	/// graph uncluttered.
	pub fn shows_label(&self, slot: usize) -> bool {
		self.is_highlighted(slot) || self.selected == Some(slot)
	}

	pub fn edge_visible(&self, edge: &GraphEdge) -> bool {
		self.is_visible(edge.source) && self.is_visible(edge.target)
	}

	pub fn edge_emphasized(&self, edge: &GraphEdge) -> bool {
		[self.hovered, self.selected]
			.into_iter()
			.flatten()
			.any(|slot| edge.touches(slot))
	}

	/// Node the camera should move to, if any.
	pub fn focus(&self) -> Option<usize> {
		self.focus
	}

	pub fn clear_focus(&mut self) {
		self.focus = None;
	}
}
