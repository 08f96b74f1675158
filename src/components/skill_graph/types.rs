use std::fmt;

use serde::Deserialize;

/// A skill as it arrives from the content store.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SkillRecord {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub proficiency: Option<f64>,
	#[serde(default)]
	pub description: Option<String>,
}

impl SkillRecord {
	#[cfg(test)]
	pub fn new(id: &str, name: &str, category: &str, proficiency: f64) -> Self {
		Self {
			id: Some(id.into()),
			name: name.into(),
			category: Some(category.into()),
			proficiency: Some(proficiency),
			description: None,
		}
	}
}

/// A normalized skill, ready for layout.
///
/// Positions are held by the layout and highlight flags by the interaction
/// controller, both indexed by the node's slot in the node list.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	pub category: String,
	pub proficiency: u8,
	/// Display radius.
	pub weight: f64,
	pub color: String,
	pub description: Option<String>,
}

/// Why two skills are linked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
	Category,
	Complementary,
	Sampled,
}

impl fmt::Display for EdgeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			EdgeKind::Category => "same category",
			EdgeKind::Complementary => "complementary",
			EdgeKind::Sampled => "related",
		})
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
	pub source_id: String,
	pub target_id: String,
	pub kind: EdgeKind,
	/// Attraction in `0.0..=1.0`.
	pub strength: f64,
}

impl GraphEdge {
	pub fn touches(&self, slot: usize) -> bool {
		self.source == slot || self.target == slot
	}
}

/// Data readiness, supplied by the host. An empty list alone cannot tell
/// "still fetching" from "nothing to show".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphStatus {
	#[default]
	Loading,
	Empty,
	Ready,
	/// The skill list could not be turned into a graph.
	Invalid,
}

impl GraphStatus {
	pub fn message(self) -> Option<&'static str> {
		match self {
			GraphStatus::Loading => Some("Loading skills..."),
			GraphStatus::Empty => Some("No skills to display."),
			GraphStatus::Invalid => Some("Skill data could not be displayed."),
			GraphStatus::Ready => None,
		}
	}
}

/// A node directly linked to the selection, with every reason it is linked.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub node: GraphNode,
	pub kinds: Vec<EdgeKind>,
}

/// Payload of the "node selected" event.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedNode {
	pub node: GraphNode,
	pub connections: Vec<Connection>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}
