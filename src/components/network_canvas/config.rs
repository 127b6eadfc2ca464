use serde::{Deserialize, Deserializer, Serialize};

use super::types::Category;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
	Clear,
	/// Translucent fill over the previous frame.
	#[default]
	Trail,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
	#[default]
	Straight,
	Curved,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
	/// Invert the offending velocity component and clamp.
	#[default]
	Bounce,
	/// Clamp position only.
	Clamp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitPolicy {
	#[default]
	FirstMatch,
	Nearest,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
	pub repulsion: f64,
	/// Pairs farther apart than this are skipped entirely.
	pub repulsion_cutoff: f64,
	pub spring: f64,
	pub center_gravity: f64,
	/// No center pull within this distance of the center.
	pub gravity_deadzone: f64,
	pub pointer_attraction: f64,
	pub damping: f64,
	pub max_speed: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			repulsion: 3000.0,
			repulsion_cutoff: 500.0,
			spring: 0.001,
			center_gravity: 0.0001,
			gravity_deadzone: 100.0,
			pointer_attraction: 0.01,
			damping: 0.85,
			max_speed: 2.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTable {
	pub background: String,
	pub hub: String,
	pub regular: String,
	pub threat: String,
	pub response: String,
	pub high_risk: String,
	pub medium_risk: String,
	pub low_risk: String,
	pub hovered: String,
	pub selected: String,
	pub edge: String,
	pub pulse: String,
	pub label: String,
	pub scan: String,
}

impl Default for ColorTable {
	fn default() -> Self {
		Self {
			background: "rgba(0, 0, 0, 0.05)".into(),
			hub: "rgba(0, 255, 255, 0.9)".into(),
			regular: "rgba(100, 200, 255, 0.7)".into(),
			threat: "rgba(255, 100, 100, 0.8)".into(),
			response: "rgba(100, 255, 100, 0.8)".into(),
			high_risk: "#D43F3F".into(),
			medium_risk: "#F59E0B".into(),
			low_risk: "#10B981".into(),
			hovered: "#6EE7B7".into(),
			selected: "#FFB700".into(),
			edge: "rgba(110, 231, 183, 0.2)".into(),
			pulse: "rgba(0, 255, 255, 0.8)".into(),
			label: "rgba(255, 255, 255, 0.9)".into(),
			scan: "0, 255, 255".into(),
		}
	}
}

impl ColorTable {
	pub fn for_category(&self, category: Category) -> &str {
		match category {
			Category::Hub => &self.hub,
			Category::Regular => &self.regular,
			Category::Threat => &self.threat,
			Category::Response => &self.response,
			Category::HighRisk => &self.high_risk,
			Category::MediumRisk => &self.medium_risk,
			Category::LowRisk => &self.low_risk,
		}
	}
}

/// Every recognised engine option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	#[serde(deserialize_with = "non_negative_count")]
	pub node_count: usize,
	pub hub_fraction: f64,
	pub hit_radius: f64,
	pub hit_policy: HitPolicy,
	pub forces: ForceConfig,
	pub colors: ColorTable,
	pub edge_style: EdgeStyle,
	pub background: BackgroundMode,
	pub boundary: BoundaryPolicy,
	pub margin: f64,
	pub min_radius: f64,
	pub max_radius: f64,
	pub layout_radius_ratio: f64,
	pub jitter: f64,
	pub show_labels: bool,
	pub show_activity: bool,
	pub pulse_threshold: f64,
	pub ring_threshold: f64,
	pub phase_step: f64,
	pub low_fps_threshold: f64,
	pub pause_on_hidden: bool,
	pub respect_reduced_motion: bool,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			node_count: 50,
			hub_fraction: 0.1,
			hit_radius: 30.0,
			hit_policy: HitPolicy::default(),
			forces: ForceConfig::default(),
			colors: ColorTable::default(),
			edge_style: EdgeStyle::default(),
			background: BackgroundMode::default(),
			boundary: BoundaryPolicy::default(),
			margin: 10.0,
			min_radius: 4.0,
			max_radius: 40.0,
			layout_radius_ratio: 0.6,
			jitter: 50.0,
			show_labels: true,
			show_activity: true,
			pulse_threshold: 0.7,
			ring_threshold: 0.5,
			phase_step: 0.02,
			low_fps_threshold: 30.0,
			pause_on_hidden: true,
			respect_reduced_motion: true,
		}
	}
}

impl EngineConfig {
	pub fn from_json(raw: &str) -> serde_json::Result<Self> {
		serde_json::from_str::<Self>(raw).map(Self::sanitized)
	}

	/// Replaces values the engine cannot work with by safe ones.
	pub fn sanitized(mut self) -> Self {
		let defaults = ForceConfig::default();
		let f = &mut self.forces;
		f.repulsion = non_negative_or(f.repulsion, defaults.repulsion);
		f.repulsion_cutoff = non_negative_or(f.repulsion_cutoff, defaults.repulsion_cutoff);
		f.spring = non_negative_or(f.spring, defaults.spring);
		f.center_gravity = non_negative_or(f.center_gravity, defaults.center_gravity);
		f.gravity_deadzone = non_negative_or(f.gravity_deadzone, defaults.gravity_deadzone);
		f.pointer_attraction = non_negative_or(f.pointer_attraction, defaults.pointer_attraction);
		f.damping = if f.damping.is_finite() {
			f.damping.clamp(0.0, 1.0)
		} else {
			defaults.damping
		};
		f.max_speed = non_negative_or(f.max_speed, defaults.max_speed);

		self.hub_fraction = if self.hub_fraction.is_finite() {
			self.hub_fraction.clamp(0.0, 1.0)
		} else {
			0.0
		};
		self.hit_radius = non_negative_or(self.hit_radius, 0.0);
		self.margin = non_negative_or(self.margin, 0.0);
		self.min_radius = non_negative_or(self.min_radius, 1.0).max(1.0);
		self.max_radius = non_negative_or(self.max_radius, self.min_radius).max(self.min_radius);
		self.jitter = non_negative_or(self.jitter, 0.0);
		self
	}
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() && value >= 0.0 {
		value
	} else {
		fallback
	}
}

fn non_negative_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
	let raw = i64::deserialize(deserializer)?;
	Ok(raw.max(0) as usize)
}
