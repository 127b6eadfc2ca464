use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use log::debug;
use rand::Rng;

use super::config::EngineConfig;
use super::types::{Category, NetworkEntity};

/// Canvas size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub fn new(width: f64, height: f64) -> Self {
		let sane = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
		Self {
			width: sane(width),
			height: sane(height),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Allowed position range on one axis, with the margin shrunk to fit.
	pub fn axis_range(extent: f64, margin: f64) -> (f64, f64) {
		let margin = margin.min(extent / 2.0).max(0.0);
		(margin, extent - margin)
	}

	pub fn clamp(&self, x: f64, y: f64, margin: f64) -> (f64, f64) {
		let (min_x, max_x) = Self::axis_range(self.width, margin);
		let (min_y, max_y) = Self::axis_range(self.height, margin);
		(x.clamp(min_x, max_x), y.clamp(min_y, max_y))
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub label: Option<String>,
	pub category: Category,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub activity: f64,
	pub connections: Vec<String>,
	pub is_hovered: bool,
	pub is_selected: bool,
}

impl Node {
	pub fn new(id: impl Into<String>, category: Category, x: f64, y: f64) -> Self {
		let id = id.into();
		Self {
			label: category.carries_label().then(|| id.clone()),
			id,
			category,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius: category.default_radius(),
			activity: category.default_activity(),
			connections: Vec::new(),
			is_hovered: false,
			is_selected: false,
		}
	}

	pub fn speed(&self) -> f64 {
		(self.vx * self.vx + self.vy * self.vy).sqrt()
	}

	/// Sizes the node from a magnitude (log-scaled), or from its category.
	pub fn rescale(&mut self, magnitude: Option<u64>, min_radius: f64, max_radius: f64) {
		let raw = match magnitude {
			Some(m) => ((m as f64) + 1.0).log10() * 4.0,
			None => self.category.default_radius(),
		};
		self.radius = raw.clamp(min_radius, max_radius);
	}
}

/// Resolved connection between two node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
	pub strength: f64,
}

/// Nodes plus their resolved edges for one simulation run.
#[derive(Clone, Debug, Default)]
pub struct NodeSet {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	index: HashMap<String, usize>,
}

impl NodeSet {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn position_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn get(&self, id: &str) -> Option<&Node> {
		self.position_of(id).map(|i| &self.nodes[i])
	}

	/// Named entities laid out evenly on a circle around the center.
	pub fn from_entities<R: Rng>(
		entities: &[NetworkEntity],
		bounds: Bounds,
		config: &EngineConfig,
		rng: &mut R,
	) -> Self {
		let mut seen = HashSet::new();
		let entities: Vec<&NetworkEntity> = entities
			.iter()
			.filter(|entity| {
				let fresh = seen.insert(entity.name.as_str());
				if !fresh {
					debug!("skipping duplicate entity {}", entity.name);
				}
				fresh
			})
			.collect();
		let count = entities.len();
		let (cx, cy) = bounds.center();
		let ring = cx.min(cy) * config.layout_radius_ratio;

		let nodes = entities
			.iter()
			.enumerate()
			.map(|(i, entity)| {
				let angle = (i as f64 / count as f64) * TAU;
				let (jx, jy) = jitter(rng, config.jitter);
				let mut node = Node::new(
					entity.name.clone(),
					entity.risk.into(),
					cx + angle.cos() * ring + jx,
					cy + angle.sin() * ring + jy,
				);
				node.connections = entity.connections.clone();
				node.rescale(entity.audience, config.min_radius, config.max_radius);
				node
			})
			.collect();

		let strengths: HashMap<&str, f64> = entities
			.iter()
			.filter_map(|e| e.strength.map(|s| (e.name.as_str(), s.clamp(0.0, 1.0))))
			.collect();

		let mut set = Self::with_nodes(nodes);
		set.resolve_edges(|source| strengths.get(source.id.as_str()).copied());
		set
	}

	/// `count` nodes scattered over the canvas, a fraction of them hubs.
	pub fn random<R: Rng>(
		count: usize,
		bounds: Bounds,
		config: &EngineConfig,
		rng: &mut R,
	) -> Self {
		const KINDS: [Category; 3] = [Category::Regular, Category::Threat, Category::Response];

		let hub_count = ((count as f64) * config.hub_fraction).floor() as usize;
		let mut nodes = Vec::with_capacity(count);
		for i in 0..count {
			let (id, category, spread) = if i < hub_count {
				(format!("hub-{}", i), Category::Hub, 0.5)
			} else {
				let kind = KINDS[rng.gen_range(0..KINDS.len())];
				(format!("node-{}", i - hub_count), kind, 1.0)
			};
			let mut node = Node::new(
				id,
				category,
				rng.r#gen::<f64>() * bounds.width,
				rng.r#gen::<f64>() * bounds.height,
			);
			if category == Category::Hub {
				node.label = Some(format!("HUB-{}", i));
			}
			node.vx = (rng.r#gen::<f64>() - 0.5) * spread;
			node.vy = (rng.r#gen::<f64>() - 0.5) * spread;
			node.activity = rng.r#gen::<f64>();
			node.rescale(None, config.min_radius, config.max_radius);
			nodes.push(node);
		}

		for i in 0..count {
			let draws = if nodes[i].category == Category::Hub {
				5 + rng.gen_range(0..10)
			} else {
				1 + rng.gen_range(0..3)
			};
			for _ in 0..draws {
				let target = rng.gen_range(0..count);
				// Self draws are dropped, not re-drawn.
				if target != i {
					let id = nodes[target].id.clone();
					nodes[i].connections.push(id);
				}
			}
		}

		let mut set = Self::with_nodes(nodes);
		set.resolve_edges(|_| None);
		set
	}

	fn with_nodes(nodes: Vec<Node>) -> Self {
		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		Self {
			nodes,
			edges: Vec::new(),
			index,
		}
	}

	fn resolve_edges(&mut self, explicit_strength: impl Fn(&Node) -> Option<f64>) {
		let mut edges = Vec::new();
		for (source, node) in self.nodes.iter().enumerate() {
			let strength =
				explicit_strength(node).unwrap_or_else(|| node.category.default_edge_strength());
			for target_id in &node.connections {
				match self.index.get(target_id) {
					Some(&target) if target != source => edges.push(Edge {
						source,
						target,
						strength,
					}),
					Some(_) => debug!("skipping self connection on {}", node.id),
					None => debug!("skipping dangling connection {} -> {}", node.id, target_id),
				}
			}
		}
		self.edges = edges;
	}

	/// Pulls every node back inside the given bounds.
	pub fn clamp_into(&mut self, bounds: Bounds, margin: f64) {
		if bounds.is_empty() {
			return;
		}
		for node in &mut self.nodes {
			(node.x, node.y) = bounds.clamp(node.x, node.y, margin);
		}
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.index.clear();
	}
}

fn jitter<R: Rng>(rng: &mut R, amount: f64) -> (f64, f64) {
	if amount <= 0.0 {
		return (0.0, 0.0);
	}
	(
		(rng.r#gen::<f64>() - 0.5) * amount,
		(rng.r#gen::<f64>() - 0.5) * amount,
	)
}
