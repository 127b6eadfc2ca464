use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::EngineConfig;
use super::interaction;
use super::node::{Bounds, NodeSet};
use super::simulation;
use super::types::NetworkSource;

/// Everything one mounted canvas animates.
pub struct NetworkState {
	pub set: NodeSet,
	pub config: EngineConfig,
	pub bounds: Bounds,
	pub pointer: Option<(f64, f64)>,
	pub phase: f64,
	pub hovered: Option<usize>,
	rng: SmallRng,
}

impl NetworkState {
	pub fn new(source: &NetworkSource, bounds: Bounds, config: EngineConfig, seed: u64) -> Self {
		let mut state = Self {
			set: NodeSet::default(),
			config: config.sanitized(),
			bounds,
			pointer: None,
			phase: 0.0,
			hovered: None,
			rng: SmallRng::seed_from_u64(seed),
		};
		state.reset(source);
		state
	}

	/// Rebuilds the node set from scratch; hover and selection are dropped.
	pub fn reset(&mut self, source: &NetworkSource) {
		self.set = match source {
			NetworkSource::Entities(entities) => {
				NodeSet::from_entities(entities, self.bounds, &self.config, &mut self.rng)
			}
			NetworkSource::Random { count } => {
				NodeSet::random(*count, self.bounds, &self.config, &mut self.rng)
			}
		};
		self.hovered = None;
		debug!(
			"network initialised with {} nodes, {} edges",
			self.set.len(),
			self.set.edges.len()
		);
	}

	pub fn tick(&mut self) {
		if self.set.is_empty() {
			return;
		}
		simulation::step(&mut self.set, self.bounds, self.pointer, &self.config);
		self.phase += self.config.phase_step;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds::new(width, height);
		self.set.clamp_into(self.bounds, self.config.margin);
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		interaction::node_at_position(
			&self.set,
			x,
			y,
			self.config.hit_radius,
			self.config.hit_policy,
		)
	}

	/// Updates hover from a pointer move. Returns the hovered node index.
	pub fn pointer_moved(&mut self, x: f64, y: f64) -> Option<usize> {
		self.pointer = Some((x, y));
		let hit = self.node_at_position(x, y);
		self.hovered = interaction::set_hover(&mut self.set, hit);
		self.hovered
	}

	pub fn pointer_left(&mut self) {
		self.pointer = None;
		self.hovered = interaction::set_hover(&mut self.set, None);
	}

	/// Selects the node under the click, or clears the selection on a miss.
	/// Returns `Some(new_selection)` only when the selection changed.
	pub fn click(&mut self, x: f64, y: f64) -> Option<Option<String>> {
		let hit = self.node_at_position(x, y);
		interaction::set_selection(&mut self.set, hit)
	}

	pub fn selected(&self) -> Option<&str> {
		self.set
			.nodes
			.iter()
			.find(|n| n.is_selected)
			.map(|n| n.id.as_str())
	}

	pub fn release(&mut self) {
		self.set.clear();
		self.pointer = None;
		self.hovered = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_canvas::types::{NetworkEntity, RiskLevel};

	fn entities() -> NetworkSource {
		NetworkSource::Entities(vec![
			NetworkEntity::new("Alpha", RiskLevel::High).connects_to("Beta"),
			NetworkEntity::new("Beta", RiskLevel::Low),
			NetworkEntity::new("Gamma", RiskLevel::Medium).connects_to("Alpha"),
		])
	}

	#[test]
	fn zero_nodes_tick_is_noop() {
		let mut state = NetworkState::new(
			&NetworkSource::Random { count: 0 },
			Bounds::new(800.0, 600.0),
			EngineConfig::default(),
			3,
		);
		state.tick();
		assert!(state.set.is_empty());
		assert_eq!(state.phase, 0.0);
		assert_eq!(state.click(10.0, 10.0), None);
	}

	#[test]
	fn pointer_on_node_hovers_it() {
		let mut state =
			NetworkState::new(&entities(), Bounds::new(800.0, 600.0), EngineConfig::default(), 3);
		let beta = state.set.position_of("Beta").unwrap();
		state.set.nodes[beta].radius = 10.0;
		let (x, y) = (state.set.nodes[beta].x, state.set.nodes[beta].y);

		assert_eq!(state.pointer_moved(x, y), Some(beta));
		assert!(state.set.nodes[beta].is_hovered);

		state.pointer_left();
		assert!(state.set.nodes.iter().all(|n| !n.is_hovered));
		assert_eq!(state.pointer, None);
	}

	#[test]
	fn clicks_move_the_single_selection() {
		let mut state =
			NetworkState::new(&entities(), Bounds::new(800.0, 600.0), EngineConfig::default(), 3);
		let alpha = &state.set.nodes[state.set.position_of("Alpha").unwrap()];
		let (ax, ay) = (alpha.x, alpha.y);

		assert_eq!(state.click(ax, ay), Some(Some("Alpha".to_string())));
		assert_eq!(state.selected(), Some("Alpha"));
		assert_eq!(state.click(ax, ay), None);
		assert_eq!(state.click(-500.0, -500.0), Some(None));
		assert_eq!(state.selected(), None);
	}

	#[test]
	fn resize_pulls_nodes_back_on_canvas() {
		let mut state =
			NetworkState::new(&entities(), Bounds::new(800.0, 600.0), EngineConfig::default(), 3);
		state.resize(200.0, 150.0);
		for node in &state.set.nodes {
			assert!(node.x <= 200.0 && node.y <= 150.0);
		}
	}

	#[test]
	fn reset_drops_hover_and_release_empties() {
		let mut state =
			NetworkState::new(&entities(), Bounds::new(800.0, 600.0), EngineConfig::default(), 3);
		state.hovered = Some(0);
		state.reset(&NetworkSource::Random { count: 20 });
		assert_eq!(state.set.len(), 20);
		assert_eq!(state.hovered, None);
		state.release();
		assert!(state.set.is_empty());
	}
}
