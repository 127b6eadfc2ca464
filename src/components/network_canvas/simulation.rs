//! Per-frame force step: repulsion, edge springs, center gravity, pointer
//! pull, then damping, speed clamp and boundary handling.

use super::config::{BoundaryPolicy, EngineConfig, ForceConfig};
use super::node::{Bounds, Node, NodeSet};

const MIN_DISTANCE: f64 = 1.0;

/// Advances every node by one frame. No-op for an empty set or canvas.
pub fn step(set: &mut NodeSet, bounds: Bounds, pointer: Option<(f64, f64)>, config: &EngineConfig) {
	if set.is_empty() || bounds.is_empty() {
		return;
	}
	let forces = accumulate_forces(set, bounds, pointer, &config.forces);
	for (node, (fx, fy)) in set.nodes.iter_mut().zip(forces) {
		integrate(node, fx, fy, &config.forces);
		keep_inside(node, bounds, config.margin, config.boundary);
	}
}

fn accumulate_forces(
	set: &NodeSet,
	bounds: Bounds,
	pointer: Option<(f64, f64)>,
	params: &ForceConfig,
) -> Vec<(f64, f64)> {
	let nodes = &set.nodes;
	let mut forces = vec![(0.0, 0.0); nodes.len()];

	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let (dx, dy) = (nodes[i].x - nodes[j].x, nodes[i].y - nodes[j].y);
			let distance = (dx * dx + dy * dy).sqrt();
			if distance >= params.repulsion_cutoff {
				continue;
			}
			let (ux, uy) = if distance > f64::EPSILON {
				(dx / distance, dy / distance)
			} else {
				separation_direction(i, j)
			};
			let d = distance.max(MIN_DISTANCE);
			let magnitude = params.repulsion / (d * d);
			forces[i].0 += ux * magnitude;
			forces[i].1 += uy * magnitude;
			forces[j].0 -= ux * magnitude;
			forces[j].1 -= uy * magnitude;
		}
	}

	// Springs pull both ends regardless of edge direction.
	for edge in &set.edges {
		let (Some(a), Some(b)) = (nodes.get(edge.source), nodes.get(edge.target)) else {
			continue;
		};
		let k = params.spring * edge.strength;
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		forces[edge.source].0 += dx * k;
		forces[edge.source].1 += dy * k;
		forces[edge.target].0 -= dx * k;
		forces[edge.target].1 -= dy * k;
	}

	let (cx, cy) = bounds.center();
	for (node, force) in nodes.iter().zip(forces.iter_mut()) {
		let (dx, dy) = (cx - node.x, cy - node.y);
		if (dx * dx + dy * dy).sqrt() > params.gravity_deadzone {
			force.0 += dx * params.center_gravity;
			force.1 += dy * params.center_gravity;
		}
		if let (true, Some((px, py))) = (node.is_hovered, pointer) {
			force.0 += (px - node.x) * params.pointer_attraction;
			force.1 += (py - node.y) * params.pointer_attraction;
		}
	}

	forces
}

/// Golden-angle direction so coincident pairs still separate.
fn separation_direction(i: usize, j: usize) -> (f64, f64) {
	let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * std::f64::consts::TAU;
	(angle.cos(), angle.sin())
}

fn integrate(node: &mut Node, fx: f64, fy: f64, params: &ForceConfig) {
	node.vx = (node.vx + fx) * params.damping;
	node.vy = (node.vy + fy) * params.damping;

	let speed = node.speed();
	if speed > params.max_speed {
		let scale = if speed > 0.0 { params.max_speed / speed } else { 0.0 };
		node.vx *= scale;
		node.vy *= scale;
	}
	if !node.vx.is_finite() || !node.vy.is_finite() {
		node.vx = 0.0;
		node.vy = 0.0;
	}

	node.x += node.vx;
	node.y += node.vy;
}

fn keep_inside(node: &mut Node, bounds: Bounds, margin: f64, policy: BoundaryPolicy) {
	let (min_x, max_x) = Bounds::axis_range(bounds.width, margin);
	let (min_y, max_y) = Bounds::axis_range(bounds.height, margin);
	let escaped_x = node.x < min_x || node.x > max_x;
	let escaped_y = node.y < min_y || node.y > max_y;

	node.x = node.x.clamp(min_x, max_x);
	node.y = node.y.clamp(min_y, max_y);

	if policy == BoundaryPolicy::Bounce {
		if escaped_x {
			node.vx = -node.vx;
		}
		if escaped_y {
			node.vy = -node.vy;
		}
	}
}
