use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
	#[default]
	#[serde(alias = "LOW")]
	Low,
	#[serde(alias = "MEDIUM")]
	Medium,
	#[serde(alias = "HIGH")]
	High,
}

/// Closed set of node kinds; drives color, default size and labelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	Hub,
	Regular,
	Threat,
	Response,
	HighRisk,
	MediumRisk,
	LowRisk,
}

impl From<RiskLevel> for Category {
	fn from(risk: RiskLevel) -> Self {
		match risk {
			RiskLevel::High => Category::HighRisk,
			RiskLevel::Medium => Category::MediumRisk,
			RiskLevel::Low => Category::LowRisk,
		}
	}
}

impl Category {
	pub fn default_radius(self) -> f64 {
		match self {
			Category::Hub => 8.0,
			Category::Threat => 6.0,
			Category::Regular | Category::Response => 4.0,
			Category::HighRisk => 14.0,
			Category::MediumRisk => 11.0,
			Category::LowRisk => 9.0,
		}
	}

	pub fn carries_label(self) -> bool {
		matches!(self, Category::Hub | Category::HighRisk)
	}

	pub fn default_edge_strength(self) -> f64 {
		match self {
			Category::Hub | Category::HighRisk => 0.8,
			_ => 0.5,
		}
	}

	pub fn default_activity(self) -> f64 {
		match self {
			Category::HighRisk => 0.9,
			Category::MediumRisk => 0.6,
			_ => 0.3,
		}
	}
}

/// A named actor supplied by the host page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkEntity {
	pub name: String,
	#[serde(default)]
	pub risk: RiskLevel,
	#[serde(default)]
	pub connections: Vec<String>,
	#[serde(default)]
	pub audience: Option<u64>,
	#[serde(default)]
	pub strength: Option<f64>,
}

impl NetworkEntity {
	pub fn new(name: impl Into<String>, risk: RiskLevel) -> Self {
		Self {
			name: name.into(),
			risk,
			connections: Vec::new(),
			audience: None,
			strength: None,
		}
	}

	pub fn connects_to(mut self, target: impl Into<String>) -> Self {
		self.connections.push(target.into());
		self
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
	#[serde(default)]
	pub risk_level: RiskLevel,
	#[serde(default)]
	pub network_connections: Vec<String>,
	#[serde(default)]
	pub audience: Option<u64>,
}

/// Actor list plus a profile lookup keyed by actor name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceTable {
	pub primary_actors: Vec<String>,
	#[serde(default)]
	pub profiles: HashMap<String, ActorProfile>,
}

impl IntelligenceTable {
	pub fn from_json(raw: &str) -> serde_json::Result<Self> {
		serde_json::from_str(raw)
	}

	/// Actors without a profile come out as low risk with no connections.
	pub fn to_entities(&self) -> Vec<NetworkEntity> {
		self.primary_actors
			.iter()
			.map(|name| {
				let profile = self.profiles.get(name).cloned().unwrap_or_default();
				NetworkEntity {
					name: name.clone(),
					risk: profile.risk_level,
					connections: profile.network_connections,
					audience: profile.audience,
					strength: None,
				}
			})
			.collect()
	}
}

/// What the canvas should be populated with.
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkSource {
	Entities(Vec<NetworkEntity>),
	Random { count: usize },
}

impl Default for NetworkSource {
	fn default() -> Self {
		NetworkSource::Entities(Vec::new())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_fills_missing_profiles_with_low_risk() {
		let table = IntelligenceTable::from_json(
			r#"{
				"primary_actors": ["Alpha", "Ghost"],
				"profiles": {
					"Alpha": { "risk_level": "HIGH", "network_connections": ["Ghost"], "audience": 2500000 }
				}
			}"#,
		)
		.unwrap();

		let entities = table.to_entities();
		assert_eq!(entities.len(), 2);
		assert_eq!(entities[0].risk, RiskLevel::High);
		assert_eq!(entities[0].connections, vec!["Ghost".to_string()]);
		assert_eq!(entities[0].audience, Some(2_500_000));
		assert_eq!(entities[1].risk, RiskLevel::Low);
		assert!(entities[1].connections.is_empty());
	}

	#[test]
	fn only_hubs_and_high_risk_are_labelled() {
		assert!(Category::Hub.carries_label());
		assert!(Category::from(RiskLevel::High).carries_label());
		assert!(!Category::Threat.carries_label());
		assert!(!Category::from(RiskLevel::Medium).carries_label());
	}
}
