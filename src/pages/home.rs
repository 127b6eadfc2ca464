use leptos::prelude::*;
use log::warn;

use crate::components::network_canvas::{
	BackgroundMode, EngineConfig, IntelligenceTable, NetworkCanvas, NetworkEntity, NetworkSource,
	RiskLevel,
};

const INTELLIGENCE_TABLE: &str = include_str!("intelligence.json");

/// Actors from the bundled table; an unreadable table gives no actors.
fn load_actors() -> Vec<NetworkEntity> {
	match IntelligenceTable::from_json(INTELLIGENCE_TABLE) {
		Ok(table) => table.to_entities(),
		Err(err) => {
			warn!("intelligence table unreadable: {}", err);
			Vec::new()
		}
	}
}

fn risk_name(risk: RiskLevel) -> &'static str {
	match risk {
		RiskLevel::High => "HIGH",
		RiskLevel::Medium => "MEDIUM",
		RiskLevel::Low => "LOW",
	}
}

/// Detail line for the selected actor.
fn describe(actors: &[NetworkEntity], id: &str) -> String {
	match actors.iter().find(|actor| actor.name == id) {
		Some(actor) => format!(
			"{} | Risk: {} | Connections: {}",
			actor.name,
			risk_name(actor.risk),
			actor.connections.len()
		),
		None => id.to_string(),
	}
}

/// Full-screen risk network with a selection read-out.
#[component]
pub fn Home() -> impl IntoView {
	let actors = StoredValue::new(load_actors());
	let source = Signal::stored(NetworkSource::Entities(actors.get_value()));
	let (selected, set_selected) = signal(None::<String>);
	let config = EngineConfig {
		background: BackgroundMode::Clear,
		jitter: 100.0,
		..EngineConfig::default()
	};

	view! {
		<div class="fullscreen-graph">
			<NetworkCanvas
				source=source
				config=config
				fullscreen=true
				on_select={move |id: Option<String>| set_selected.set(id)}
			/>
			<div class="graph-overlay">
				<h1>"Threat Network"</h1>
				<p class="subtitle">
					{move || match selected.get() {
						Some(id) => actors.with_value(|actors| describe(actors, &id)),
						None => "Hover to pull a node, click to inspect it.".to_string(),
					}}
				</p>
			</div>
		</div>
	}
}
