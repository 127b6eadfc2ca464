use super::config::HitPolicy;
use super::node::{Node, NodeSet};

fn within_reach(node: &Node, x: f64, y: f64, hit_radius: f64) -> Option<f64> {
	let (dx, dy) = (node.x - x, node.y - y);
	let distance = (dx * dx + dy * dy).sqrt();
	(distance <= hit_radius.max(node.radius)).then_some(distance)
}

/// Index of the node under the pointer, if any.
pub fn node_at_position(
	set: &NodeSet,
	x: f64,
	y: f64,
	hit_radius: f64,
	policy: HitPolicy,
) -> Option<usize> {
	match policy {
		HitPolicy::FirstMatch => set
			.nodes
			.iter()
			.position(|node| within_reach(node, x, y, hit_radius).is_some()),
		HitPolicy::Nearest => set
			.nodes
			.iter()
			.enumerate()
			.filter_map(|(i, node)| within_reach(node, x, y, hit_radius).map(|d| (i, d)))
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i),
	}
}

/// Marks `hovered` as the only hovered node and returns it.
pub fn set_hover(set: &mut NodeSet, hovered: Option<usize>) -> Option<usize> {
	for (i, node) in set.nodes.iter_mut().enumerate() {
		node.is_hovered = Some(i) == hovered;
	}
	hovered
}

/// Moves the single selection. Returns the new selected id when it changed.
pub fn set_selection(set: &mut NodeSet, selected: Option<usize>) -> Option<Option<String>> {
	let previous = set.nodes.iter().position(|n| n.is_selected);
	for (i, node) in set.nodes.iter_mut().enumerate() {
		node.is_selected = Some(i) == selected;
	}
	if previous == selected {
		return None;
	}
	Some(selected.map(|i| set.nodes[i].id.clone()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_canvas::types::Category;

	fn set_of(points: &[(f64, f64)]) -> NodeSet {
		let mut set = NodeSet::default();
		set.nodes = points
			.iter()
			.enumerate()
			.map(|(i, &(x, y))| {
				let mut node = Node::new(format!("n{}", i), Category::Regular, x, y);
				node.radius = 10.0;
				node
			})
			.collect();
		set
	}

	#[test]
	fn pointer_on_node_center_hovers_it() {
		let mut set = set_of(&[(50.0, 50.0), (300.0, 300.0)]);
		let hit = node_at_position(&set, 300.0, 300.0, 30.0, HitPolicy::FirstMatch);
		set_hover(&mut set, hit);
		assert!(set.nodes[1].is_hovered);
		assert!(!set.nodes[0].is_hovered);
	}

	#[test]
	fn first_match_is_stable_for_overlapping_nodes() {
		let mut set = set_of(&[(100.0, 100.0), (110.0, 100.0)]);
		for _ in 0..5 {
			let hit = node_at_position(&set, 108.0, 100.0, 30.0, HitPolicy::FirstMatch);
			set_hover(&mut set, hit);
			assert_eq!(hit, Some(0));
			assert_eq!(set.nodes.iter().filter(|n| n.is_hovered).count(), 1);
		}
	}

	#[test]
	fn nearest_match_prefers_closest_node() {
		let set = set_of(&[(100.0, 100.0), (110.0, 100.0)]);
		let hit = node_at_position(&set, 108.0, 100.0, 30.0, HitPolicy::Nearest);
		assert_eq!(hit, Some(1));
	}

	#[test]
	fn miss_clears_hover() {
		let mut set = set_of(&[(100.0, 100.0)]);
		set_hover(&mut set, Some(0));
		let hit = node_at_position(&set, 500.0, 500.0, 30.0, HitPolicy::FirstMatch);
		set_hover(&mut set, hit);
		assert!(set.nodes.iter().all(|n| !n.is_hovered));
	}

	#[test]
	fn selection_stays_single_across_clicks() {
		let mut set = set_of(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0)]);
		let clicks = [Some(0), Some(2), None, Some(1), Some(1), Some(0)];
		for click in clicks {
			set_selection(&mut set, click);
			assert!(set.nodes.iter().filter(|n| n.is_selected).count() <= 1);
		}
		assert!(set.nodes[0].is_selected);
	}

	#[test]
	fn selection_reports_only_changes() {
		let mut set = set_of(&[(0.0, 0.0), (100.0, 0.0)]);
		assert_eq!(set_selection(&mut set, Some(1)), Some(Some("n1".to_string())));
		assert_eq!(set_selection(&mut set, Some(1)), None);
		assert_eq!(set_selection(&mut set, None), Some(None));
		assert_eq!(set_selection(&mut set, None), None);
	}
}
