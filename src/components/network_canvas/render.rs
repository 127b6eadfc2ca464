use std::f64::consts::PI;

use super::config::{BackgroundMode, EdgeStyle};
use super::node::Node;
use super::state::NetworkState;
use super::surface::{Glow, Surface};

const LABEL_FONT: &str = "10px monospace";
const PULSE_RADIUS: f64 = 2.0;
const SCAN_HALF_HEIGHT: f64 = 20.0;

/// Paints one frame. Reads state only; order is
/// background, edges, nodes, labels, overlay.
pub fn render<S: Surface>(state: &NetworkState, surface: &mut S) {
	if state.set.is_empty() || state.bounds.is_empty() {
		return;
	}
	draw_background(state, surface);
	draw_edges(state, surface);
	draw_nodes(state, surface);
	if state.config.show_labels {
		draw_labels(state, surface);
	}
	if state.config.show_activity {
		draw_scan_line(state, surface);
	}
}

fn draw_background<S: Surface>(state: &NetworkState, surface: &mut S) {
	let (w, h) = (state.bounds.width, state.bounds.height);
	match state.config.background {
		BackgroundMode::Clear => surface.clear(w, h),
		BackgroundMode::Trail => surface.fill_rect(0.0, 0.0, w, h, &state.config.colors.background),
	}
}

fn curve_control(from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
	let (dx, dy) = (to.0 - from.0, to.1 - from.1);
	let (mx, my) = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
	(mx - dy * 0.2, my + dx * 0.2)
}

fn quadratic_point(from: (f64, f64), control: (f64, f64), to: (f64, f64), t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	(
		u * u * from.0 + 2.0 * u * t * control.0 + t * t * to.0,
		u * u * from.1 + 2.0 * u * t * control.1 + t * t * to.1,
	)
}

fn draw_edges<S: Surface>(state: &NetworkState, surface: &mut S) {
	let config = &state.config;
	let colors = &config.colors;
	let t = state.phase.rem_euclid(1.0);

	for edge in &state.set.edges {
		let (Some(source), Some(target)) =
			(state.set.nodes.get(edge.source), state.set.nodes.get(edge.target))
		else {
			continue;
		};
		let (from, to) = ((source.x, source.y), (target.x, target.y));
		let pulse_at = match config.edge_style {
			EdgeStyle::Straight => {
				surface.line(from, to, &colors.edge, 1.0);
				(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
			}
			EdgeStyle::Curved => {
				let control = curve_control(from, to);
				surface.curve(from, control, to, &colors.edge, 1.0);
				quadratic_point(from, control, to, t)
			}
		};

		if config.show_activity && source.activity > config.pulse_threshold {
			surface.fill_circle(pulse_at, PULSE_RADIUS, &colors.pulse, None);
		}
	}
}

fn draw_nodes<S: Surface>(state: &NetworkState, surface: &mut S) {
	let config = &state.config;
	let colors = &config.colors;

	for node in &state.set.nodes {
		let center = (node.x, node.y);
		let (color, radius, glow) = if node.is_selected {
			(colors.selected.as_str(), node.radius, Some(Glow { color: &colors.selected, blur: 20.0 }))
		} else if node.is_hovered {
			(
				colors.hovered.as_str(),
				node.radius * 1.2,
				Some(Glow { color: &colors.hovered, blur: 15.0 }),
			)
		} else {
			(colors.for_category(node.category), node.radius, None)
		};
		surface.fill_circle(center, radius, color, glow);

		let highlighted = node.is_hovered || node.is_selected;
		if highlighted || (config.show_activity && node.activity > config.ring_threshold) {
			let ring = radius + 5.0 + (state.phase + node.activity * PI).sin() * 3.0;
			surface.ring(center, ring, color, 0.3);
		}
	}
}

fn label_text(node: &Node) -> Option<&str> {
	match &node.label {
		Some(label) => Some(label.as_str()),
		None if node.is_hovered || node.is_selected => Some(node.id.as_str()),
		None => None,
	}
}

fn draw_labels<S: Surface>(state: &NetworkState, surface: &mut S) {
	let colors = &state.config.colors;
	for node in &state.set.nodes {
		if let Some(text) = label_text(node) {
			surface.text(text, (node.x, node.y - node.radius - 5.0), LABEL_FONT, &colors.label);
		}
	}
}

fn draw_scan_line<S: Surface>(state: &NetworkState, surface: &mut S) {
	let scan_y = (state.phase * 100.0).rem_euclid(state.bounds.height);
	surface.scan_band(
		scan_y,
		SCAN_HALF_HEIGHT,
		state.bounds.width,
		&state.config.colors.scan,
		0.1,
	);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_canvas::config::EngineConfig;
	use crate::components::network_canvas::node::Bounds;
	use crate::components::network_canvas::surface::recording::{Op, RecordingSurface};
	use crate::components::network_canvas::types::{NetworkEntity, NetworkSource, RiskLevel};

	fn scenario_state(config: EngineConfig) -> NetworkState {
		let entities = vec![
			NetworkEntity::new("Alpha", RiskLevel::High).connects_to("Beta"),
			NetworkEntity::new("Beta", RiskLevel::Low),
			NetworkEntity::new("Gamma", RiskLevel::Medium).connects_to("Alpha"),
		];
		NetworkState::new(&NetworkSource::Entities(entities), Bounds::new(800.0, 600.0), config, 5)
	}

	fn rank(op: &Op) -> usize {
		match op {
			Op::Clear | Op::FillRect { .. } => 0,
			Op::Line { .. } | Op::Curve { .. } => 1,
			Op::Circle { radius, .. } if *radius == PULSE_RADIUS => 1,
			Op::Circle { .. } | Op::Ring { .. } => 2,
			Op::Text { .. } => 3,
			Op::ScanBand { .. } => 4,
		}
	}

	#[test]
	fn layers_are_painted_in_order() {
		let state = scenario_state(EngineConfig::default());
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		let ranks: Vec<usize> = surface.ops.iter().map(rank).collect();
		assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "out of order: {:?}", surface.ops);
		assert_eq!(ranks.first(), Some(&0));
		assert_eq!(ranks.last(), Some(&4));
	}

	#[test]
	fn high_risk_node_uses_high_risk_color() {
		let config = EngineConfig::default();
		let expected = config.colors.high_risk.clone();
		let state = scenario_state(config);
		let alpha = state.set.get("Alpha").unwrap();
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		assert!(surface.ops.iter().any(|op| matches!(
			op,
			Op::Circle { center, color, .. } if *center == (alpha.x, alpha.y) && *color == expected
		)));
	}

	#[test]
	fn clear_mode_and_straight_edges() {
		let mut config = EngineConfig::default();
		config.background = BackgroundMode::Clear;
		config.show_activity = false;
		let state = scenario_state(config);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);

		assert_eq!(surface.ops[0], Op::Clear);
		assert_eq!(surface.ops.iter().filter(|op| matches!(op, Op::Line { .. })).count(), 2);
		assert!(!surface.ops.iter().any(|op| matches!(op, Op::ScanBand { .. })));
	}

	#[test]
	fn curved_edges_draw_curves() {
		let mut config = EngineConfig::default();
		config.edge_style = EdgeStyle::Curved;
		let state = scenario_state(config);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		assert_eq!(surface.ops.iter().filter(|op| matches!(op, Op::Curve { .. })).count(), 2);
	}

	#[test]
	fn pulses_only_on_active_sources() {
		let mut state = scenario_state(EngineConfig::default());
		state.phase = 0.25;
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		// Alpha (high risk, 0.9) is active; Gamma (medium, 0.6) is not.
		let pulses = surface
			.ops
			.iter()
			.filter(|op| matches!(op, Op::Circle { radius, .. } if *radius == PULSE_RADIUS))
			.count();
		assert_eq!(pulses, 1);
	}

	#[test]
	fn only_labelled_or_highlighted_nodes_get_text() {
		let mut state = scenario_state(EngineConfig::default());
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		let texts = |ops: &[Op]| {
			ops.iter()
				.filter_map(|op| match op {
					Op::Text { text, .. } => Some(text.clone()),
					_ => None,
				})
				.collect::<Vec<_>>()
		};
		assert_eq!(texts(&surface.ops), vec!["Alpha".to_string()]);

		let beta = state.set.position_of("Beta").unwrap();
		state.set.nodes[beta].is_hovered = true;
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		assert!(texts(&surface.ops).contains(&"Beta".to_string()));
	}

	#[test]
	fn hidden_labels_skip_all_text() {
		let mut config = EngineConfig::default();
		config.show_labels = false;
		let mut state = scenario_state(config);
		let beta = state.set.position_of("Beta").unwrap();
		state.set.nodes[beta].is_selected = true;
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		assert!(!surface.ops.iter().any(|op| matches!(op, Op::Text { .. })));
		assert!(surface.ops.iter().any(|op| matches!(op, Op::Circle { .. })));
	}

	#[test]
	fn empty_state_paints_nothing() {
		let state = NetworkState::new(
			&NetworkSource::Random { count: 0 },
			Bounds::new(800.0, 600.0),
			EngineConfig::default(),
			1,
		);
		let mut surface = RecordingSurface::default();
		render(&state, &mut surface);
		assert!(surface.ops.is_empty());
	}
}
