use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::interaction::Emphasis;
use super::state::{SkillGraphState, ViewTransform};
use super::types::Point;

const BACKGROUND: &str = "#05070d";

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite<'a> {
	pub slot: usize,
	pub center: Point,
	pub radius: f64,
	pub color: &'a str,
	pub emphasis: Emphasis,
	pub glow: bool,
	pub label: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStroke {
	pub from: Point,
	pub to: Point,
	pub strength: f64,
	pub emphasized: bool,
}

/// Everything one frame draws, in draw order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FramePlan<'a> {
	pub transform: ViewTransform,
	pub edges: Vec<EdgeStroke>,
	pub nodes: Vec<NodeSprite<'a>>,
}

/// Collect visible, positioned nodes and edges. Anything without a position
/// yet is left out of this frame.
pub fn plan_frame(state: &SkillGraphState) -> FramePlan<'_> {
	let (graph, ui) = (&state.graph, &state.interaction);
	let positions = state.layout.positions();

	let edges = graph
		.edges()
		.iter()
		.filter(|edge| ui.edge_visible(edge))
		.filter_map(|edge| {
			Some(EdgeStroke {
				from: positions[edge.source]?,
				to: positions[edge.target]?,
				strength: edge.strength,
				emphasized: ui.edge_emphasized(edge),
			})
		})
		.collect();

	let mut nodes: Vec<NodeSprite<'_>> = graph
		.nodes()
		.iter()
		.enumerate()
		.filter(|&(slot, _)| ui.is_visible(slot))
		.filter_map(|(slot, node)| {
			Some(NodeSprite {
				slot,
				center: positions[slot]?,
				radius: node.weight,
				color: &node.color,
				emphasis: ui.emphasis(slot),
				glow: ui.is_highlighted(slot),
				label: ui.shows_label(slot).then_some(node.name.as_str()),
			})
		})
		.collect();
	// emphasized nodes paint last so they sit on top
	nodes.sort_by_key(|sprite| sprite.emphasis);

	FramePlan {
		transform: state.transform.clone(),
		edges,
		nodes,
	}
}

pub fn render(state: &SkillGraphState, ctx: &CanvasRenderingContext2d) {
	let plan = plan_frame(state);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(plan.transform.x, plan.transform.y);
	let _ = ctx.scale(plan.transform.k, plan.transform.k);
	draw_edges(&plan, ctx);
	draw_nodes(&plan, ctx);
	ctx.restore();
}

fn draw_edges(plan: &FramePlan<'_>, ctx: &CanvasRenderingContext2d) {
	let k = plan.transform.k;
	for edge in &plan.edges {
		let (alpha, boost) = if edge.emphasized { (0.85, 1.5) } else { (0.18, 1.0) };
		ctx.set_stroke_style_str(&format!("rgba(0, 255, 170, {})", alpha));
		ctx.set_line_width((0.5 + 2.5 * edge.strength) * boost / k);
		ctx.begin_path();
		ctx.move_to(edge.from.x, edge.from.y);
		ctx.line_to(edge.to.x, edge.to.y);
		ctx.stroke();
	}
}

fn draw_nodes(plan: &FramePlan<'_>, ctx: &CanvasRenderingContext2d) {
	let k = plan.transform.k;
	for sprite in &plan.nodes {
		let Point { x, y } = sprite.center;
		let radius = sprite.radius;

		if sprite.glow {
			draw_glow(ctx, sprite.center, radius, sprite.color);
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_global_alpha(if sprite.emphasis == Emphasis::Default { 0.8 } else { 1.0 });
		ctx.set_fill_style_str(sprite.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		let (border, width) = match sprite.emphasis {
			Emphasis::Selected => ("#ffffff", 3.0),
			Emphasis::Hovered => ("rgba(224, 247, 255, 0.95)", 2.0),
			Emphasis::Highlighted => ("rgba(0, 255, 170, 0.8)", 1.5),
			Emphasis::Default => ("rgba(255, 255, 255, 0.25)", 1.0),
		};
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(width / k);
		ctx.stroke();

		if let Some(label) = sprite.label {
			ctx.set_fill_style_str("#e6fff7");
			ctx.set_font(&format!("{}px monospace", 11.0 / k.max(0.5)));
			let _ = ctx.fill_text(label, x + radius + 4.0, y + 4.0);
		}
	}
}

fn draw_glow(ctx: &CanvasRenderingContext2d, at: Point, radius: f64, color: &str) {
	let Ok(gradient) = ctx.create_radial_gradient(at.x, at.y, radius * 0.5, at.x, at.y, radius * 2.4)
	else {
		return;
	};
	let stops: [(f32, &str); 2] = [(0.0, color), (1.0, "rgba(0, 0, 0, 0)")];
	if stops
		.iter()
		.any(|&(offset, c)| gradient.add_color_stop(offset, c).is_err())
	{
		return;
	}
	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius * 2.4, 0.0, 2.0 * PI);
	ctx.set_global_alpha(0.45);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
	ctx.set_global_alpha(1.0);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::skill_graph::config::GraphConfig;
	use crate::components::skill_graph::types::SkillRecord;

	fn state() -> SkillGraphState {
		let mut state = SkillGraphState::new(GraphConfig::default(), 800.0, 600.0, 3);
		state
			.rebuild(&[
				SkillRecord::new("aws", "AWS", "Cloud Security", 80.0),
				SkillRecord::new("az", "Azure", "Cloud Security", 75.0),
				SkillRecord::new("py", "Python", "Programming", 90.0),
				SkillRecord::new("bash", "Bash", "Programming", 70.0),
			])
			.unwrap();
		state
	}

	#[test]
	fn first_frame_before_layout_draws_nothing() {
		let state = state();
		let plan = plan_frame(&state);
		assert!(plan.nodes.is_empty());
		assert!(plan.edges.is_empty());
	}

	#[test]
	fn category_filter_limits_nodes_and_edges() {
		let mut state = state();
		state.tick(0.016);
		state.set_category(Some("Cloud Security"));
		let plan = plan_frame(&state);

		assert_eq!(plan.nodes.len(), 2);
		for sprite in &plan.nodes {
			assert_eq!(state.graph.nodes()[sprite.slot].category, "Cloud Security");
		}
		let visible_edges = state
			.graph
			.edges()
			.iter()
			.filter(|e| {
				state.graph.nodes()[e.source].category == "Cloud Security"
					&& state.graph.nodes()[e.target].category == "Cloud Security"
			})
			.count();
		assert_eq!(plan.edges.len(), visible_edges);
	}

	#[test]
	fn labels_only_for_matches_and_selection() {
		let mut state = state();
		state.tick(0.016);
		assert!(plan_frame(&state).nodes.iter().all(|s| s.label.is_none()));

		state.set_search("azure");
		state.select_id("bash");
		let plan = plan_frame(&state);
		let labelled: Vec<_> = plan.nodes.iter().filter_map(|s| s.label).collect();
		assert_eq!(labelled.len(), 2);
		assert!(labelled.contains(&"Azure") && labelled.contains(&"Bash"));
		assert_eq!(plan.nodes.last().map(|s| s.emphasis), Some(Emphasis::Selected));
		assert!(plan.nodes.iter().any(|s| s.glow && s.label == Some("Azure")));
	}

	#[test]
	fn edges_touching_selection_are_emphasized() {
		let mut state = state();
		state.tick(0.016);
		state.select_id("py");
		let plan = plan_frame(&state);
		assert!(!plan.edges.is_empty());
		let py = state.layout.position(state.graph.slot("py").unwrap()).unwrap();
		for edge in &plan.edges {
			assert_eq!(edge.emphasized, edge.from == py || edge.to == py);
		}
	}
}
