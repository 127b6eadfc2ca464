mod component;
mod config;
mod driver;
mod error;
mod fps;
mod frame_loop;
mod interaction;
mod listeners;
mod node;
mod render;
mod simulation;
mod state;
mod surface;
mod types;

pub use component::NetworkCanvas;
pub use config::{BackgroundMode, EdgeStyle, EngineConfig};
pub use types::{IntelligenceTable, NetworkEntity, NetworkSource, RiskLevel};
