/// Counts frames over one-second windows and publishes the rate.
///
/// Fed by its own frame loop; the animation only ever reads [`fps`](Self::fps).
#[derive(Clone, Debug)]
pub struct FrameRateMonitor {
	window_start: Option<f64>,
	last_frame: f64,
	frames: u32,
	fps: f64,
}

impl Default for FrameRateMonitor {
	fn default() -> Self {
		Self {
			window_start: None,
			last_frame: 0.0,
			frames: 0,
			fps: 60.0,
		}
	}
}

impl FrameRateMonitor {
	const WINDOW_MS: f64 = 1000.0;

	/// Records a frame at `now_ms`; returns the new rate when a window closes.
	/// A gap longer than one window (the loop was stopped) starts a fresh window.
	pub fn record(&mut self, now_ms: f64) -> Option<f64> {
		let gap = now_ms - self.last_frame;
		self.last_frame = now_ms;
		let start = match self.window_start {
			Some(start) if gap <= Self::WINDOW_MS => start,
			_ => {
				self.window_start = Some(now_ms);
				self.frames = 0;
				return None;
			}
		};
		self.frames += 1;
		let elapsed = now_ms - start;
		if elapsed < Self::WINDOW_MS {
			return None;
		}
		self.fps = (f64::from(self.frames) * 1000.0 / elapsed).round();
		self.frames = 0;
		self.window_start = Some(now_ms);
		Some(self.fps)
	}

	pub fn fps(&self) -> f64 {
		self.fps
	}
}
