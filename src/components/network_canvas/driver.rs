use log::{debug, info};

use super::config::EngineConfig;
use super::node::Bounds;
use super::render;
use super::state::NetworkState;
use super::surface::Surface;
use super::types::NetworkSource;

/// Why the loop is not scheduling frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuspendReason {
	Stopped,
	Hidden,
	Offscreen,
	ReducedMotion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Suspension {
	stopped: bool,
	hidden: bool,
	offscreen: bool,
	reduced_motion: bool,
}

impl Suspension {
	fn flag(&mut self, reason: SuspendReason) -> &mut bool {
		match reason {
			SuspendReason::Stopped => &mut self.stopped,
			SuspendReason::Hidden => &mut self.hidden,
			SuspendReason::Offscreen => &mut self.offscreen,
			SuspendReason::ReducedMotion => &mut self.reduced_motion,
		}
	}

	fn any(&self) -> bool {
		self.stopped || self.hidden || self.offscreen || self.reduced_motion
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
	Painted,
	Throttled,
	Suspended,
}

/// Receives the selected node id, or `None` on deselect.
pub type SelectHandler = Box<dyn FnMut(Option<String>)>;

/// One canvas worth of animation: node state plus start/stop/suspend
/// lifecycle and the selection callback.
pub struct NetworkEngine {
	state: NetworkState,
	suspension: Suspension,
	on_select: Option<SelectHandler>,
	frames: u64,
}

impl NetworkEngine {
	/// Builds a stopped engine; call [`start`](Self::start) to animate.
	pub fn new(source: &NetworkSource, bounds: Bounds, config: EngineConfig, seed: u64) -> Self {
		Self {
			state: NetworkState::new(source, bounds, config, seed),
			suspension: Suspension {
				stopped: true,
				hidden: false,
				offscreen: false,
				reduced_motion: false,
			},
			on_select: None,
			frames: 0,
		}
	}

	pub fn state(&self) -> &NetworkState {
		&self.state
	}

	pub fn start(&mut self) {
		self.resume(SuspendReason::Stopped);
	}

	pub fn stop(&mut self) {
		self.suspend(SuspendReason::Stopped);
	}

	pub fn on_select(&mut self, handler: impl FnMut(Option<String>) + 'static) {
		self.on_select = Some(Box::new(handler));
	}

	/// Suspends for `reason`; node state is kept. Returns whether the
	/// engine was animating before.
	pub fn suspend(&mut self, reason: SuspendReason) -> bool {
		let honoured = match reason {
			SuspendReason::Hidden => self.state.config.pause_on_hidden,
			SuspendReason::ReducedMotion => self.state.config.respect_reduced_motion,
			_ => true,
		};
		let was_animating = self.should_animate();
		if honoured {
			*self.suspension.flag(reason) = true;
			debug!("animation suspended: {:?}", reason);
		}
		was_animating
	}

	/// Applies `reason` when `active`, clears it otherwise.
	pub fn suspend_if(&mut self, reason: SuspendReason, active: bool) {
		if active {
			self.suspend(reason);
		} else {
			self.resume(reason);
		}
	}

	/// Clears `reason`. Returns whether the engine is now animating.
	pub fn resume(&mut self, reason: SuspendReason) -> bool {
		*self.suspension.flag(reason) = false;
		debug!("animation resumed from {:?}", reason);
		self.should_animate()
	}

	pub fn should_animate(&self) -> bool {
		!self.suspension.any()
	}

	/// Steps and paints one frame. Under `low_fps_threshold` only every
	/// other frame does work.
	pub fn frame<S: Surface>(&mut self, surface: &mut S, fps: f64) -> FrameOutcome {
		if !self.should_animate() {
			return FrameOutcome::Suspended;
		}
		self.frames = self.frames.wrapping_add(1);
		if fps < self.state.config.low_fps_threshold && self.frames % 2 == 1 {
			return FrameOutcome::Throttled;
		}
		self.state.tick();
		render::render(&self.state, surface);
		FrameOutcome::Painted
	}

	/// Paints the current state without advancing it.
	pub fn paint<S: Surface>(&self, surface: &mut S) {
		render::render(&self.state, surface);
	}

	/// Returns whether a node is now under the pointer.
	pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
		self.state.pointer_moved(x, y).is_some()
	}

	pub fn pointer_left(&mut self) {
		self.state.pointer_left();
	}

	pub fn click(&mut self, x: f64, y: f64) {
		if let Some(selection) = self.state.click(x, y) {
			debug!("selection changed to {:?}", selection);
			if let Some(handler) = self.on_select.as_mut() {
				handler(selection);
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.state.resize(width, height);
	}

	pub fn reset(&mut self, source: &NetworkSource) {
		self.state.reset(source);
	}

	/// Stops and drops all nodes; used on unmount.
	pub fn release(&mut self) {
		self.stop();
		self.state.release();
		self.on_select = None;
		info!("network canvas released");
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::components::network_canvas::surface::recording::RecordingSurface;
	use crate::components::network_canvas::types::{NetworkEntity, RiskLevel};

	fn engine() -> NetworkEngine {
		let source = NetworkSource::Entities(vec![
			NetworkEntity::new("Alpha", RiskLevel::High).connects_to("Beta"),
			NetworkEntity::new("Beta", RiskLevel::Low).connects_to("Missing"),
		]);
		NetworkEngine::new(&source, Bounds::new(800.0, 600.0), EngineConfig::default(), 9)
	}

	#[test]
	fn new_engine_waits_for_start() {
		let mut engine = engine();
		let mut surface = RecordingSurface::default();
		assert_eq!(engine.frame(&mut surface, 60.0), FrameOutcome::Suspended);
		assert!(surface.ops.is_empty());

		engine.start();
		assert_eq!(engine.frame(&mut surface, 60.0), FrameOutcome::Painted);
		assert!(!surface.ops.is_empty());
	}

	#[test]
	fn suspension_keeps_node_state() {
		let mut engine = engine();
		engine.start();
		let mut surface = RecordingSurface::default();
		for _ in 0..10 {
			engine.frame(&mut surface, 60.0);
		}
		let snapshot = engine.state().set.nodes.clone();
		let phase = engine.state().phase;

		for reason in [SuspendReason::Hidden, SuspendReason::Offscreen, SuspendReason::ReducedMotion] {
			assert!(engine.suspend(reason));
			assert_eq!(engine.frame(&mut surface, 60.0), FrameOutcome::Suspended);
			assert_eq!(engine.state().set.nodes, snapshot);
			assert_eq!(engine.state().phase, phase);
			assert!(engine.resume(reason));
		}
	}

	#[test]
	fn triggers_stack() {
		let mut engine = engine();
		engine.start();
		engine.suspend(SuspendReason::Hidden);
		engine.suspend(SuspendReason::Offscreen);
		assert!(!engine.resume(SuspendReason::Hidden));
		assert!(engine.resume(SuspendReason::Offscreen));
	}

	#[test]
	fn disabled_triggers_are_ignored() {
		let mut config = EngineConfig::default();
		config.respect_reduced_motion = false;
		let mut engine = NetworkEngine::new(&NetworkSource::Random { count: 5 }, Bounds::new(100.0, 100.0), config, 1);
		engine.start();
		engine.suspend(SuspendReason::ReducedMotion);
		assert!(engine.should_animate());
	}

	#[test]
	fn low_fps_skips_every_other_frame() {
		let mut engine = engine();
		engine.start();
		let mut surface = RecordingSurface::default();
		let outcomes: Vec<_> = (0..4).map(|_| engine.frame(&mut surface, 12.0)).collect();
		assert_eq!(
			outcomes,
			vec![
				FrameOutcome::Throttled,
				FrameOutcome::Painted,
				FrameOutcome::Throttled,
				FrameOutcome::Painted
			]
		);
	}

	#[test]
	fn select_callback_sees_changes_only() {
		let mut engine = engine();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		engine.on_select(move |id| sink.borrow_mut().push(id));

		let alpha = engine.state().set.get("Alpha").cloned().unwrap();
		engine.click(alpha.x, alpha.y);
		engine.click(alpha.x, alpha.y);
		engine.click(-100.0, -100.0);

		assert_eq!(*seen.borrow(), vec![Some("Alpha".to_string()), None]);
	}

	#[test]
	fn dangling_edge_frames_complete() {
		let mut engine = engine();
		engine.start();
		assert_eq!(engine.state().set.edges.len(), 1);
		let mut surface = RecordingSurface::default();
		for _ in 0..100 {
			engine.frame(&mut surface, 60.0);
		}
	}

	#[test]
	fn release_empties_and_stops() {
		let mut engine = engine();
		engine.start();
		engine.release();
		assert!(engine.state().set.is_empty());
		assert!(!engine.should_animate());
	}
}
