use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

/// Shadow glow applied to a filled shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow<'a> {
	pub color: &'a str,
	pub blur: f64,
}

/// The 2D drawing operations the renderer needs.
pub trait Surface {
	fn clear(&mut self, width: f64, height: f64);
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
	fn curve(&mut self, from: (f64, f64), control: (f64, f64), to: (f64, f64), color: &str, width: f64);
	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: &str, glow: Option<Glow<'_>>);
	fn ring(&mut self, center: (f64, f64), radius: f64, color: &str, alpha: f64);
	fn text(&mut self, text: &str, at: (f64, f64), font: &str, color: &str);
	/// Horizontal band fading out above and below `center_y`; `rgb` is "r, g, b".
	fn scan_band(&mut self, center_y: f64, half_height: f64, width: f64, rgb: &str, peak_alpha: f64);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn curve(&mut self, from: (f64, f64), control: (f64, f64), to: (f64, f64), color: &str, width: f64) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.quadratic_curve_to(control.0, control.1, to.0, to.1);
		self.stroke();
	}

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: &str, glow: Option<Glow<'_>>) {
		if let Some(glow) = glow {
			self.set_shadow_color(glow.color);
			self.set_shadow_blur(glow.blur);
		}
		self.begin_path();
		let _ = self.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		self.set_fill_style_str(color);
		self.fill();
		if glow.is_some() {
			self.set_shadow_blur(0.0);
		}
	}

	fn ring(&mut self, center: (f64, f64), radius: f64, color: &str, alpha: f64) {
		self.set_global_alpha(alpha);
		self.begin_path();
		let _ = self.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		self.set_stroke_style_str(color);
		self.set_line_width(1.0);
		self.stroke();
		self.set_global_alpha(1.0);
	}

	fn text(&mut self, text: &str, at: (f64, f64), font: &str, color: &str) {
		self.set_fill_style_str(color);
		self.set_font(font);
		self.set_text_align("center");
		let _ = self.fill_text(text, at.0, at.1);
	}

	fn scan_band(&mut self, center_y: f64, half_height: f64, width: f64, rgb: &str, peak_alpha: f64) {
		let gradient =
			self.create_linear_gradient(0.0, center_y - half_height, 0.0, center_y + half_height);
		let _ = gradient.add_color_stop(0.0, &format!("rgba({}, 0)", rgb));
		let _ = gradient.add_color_stop(0.5, &format!("rgba({}, {})", rgb, peak_alpha));
		let _ = gradient.add_color_stop(1.0, &format!("rgba({}, 0)", rgb));
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		CanvasRenderingContext2d::fill_rect(self, 0.0, center_y - half_height, width, half_height * 2.0);
	}
}
