use leptos::prelude::*;

use crate::components::network_canvas::{EdgeStyle, EngineConfig, NetworkCanvas, NetworkSource};

/// Decorative hub network behind a landing headline.
#[component]
pub fn Ambient() -> impl IntoView {
	let config = EngineConfig {
		edge_style: EdgeStyle::Curved,
		..EngineConfig::default()
	};
	let source = Signal::stored(NetworkSource::Random {
		count: config.node_count,
	});

	view! {
		<div class="fullscreen-graph">
			<NetworkCanvas source=source config=config fullscreen=true interactive=false />
			<div class="graph-overlay">
				<h1>"Monitoring Active"</h1>
			</div>
		</div>
	}
}
