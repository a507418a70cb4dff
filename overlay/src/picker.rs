//! Color math behind the options page's hue slider and saturation/value square.
//!
//! Hue runs through the picker sinusoidally rather than linearly inside each sixth of the color wheel, which spends
//! more of the slider on the pure primaries and secondaries. Converting back to HSV undoes the easing exactly.

use crate::color::Color;
use crate::error::ParseError;

use serde::Serialize;

use std::f32::consts::PI;

/// Side of the saturation/value square and height of the hue slider, in pixels.
pub const PICKER_SIZE: usize = 256;

/// Half the height of the hue thumb, which is centered on the selected hue.
const HUE_THUMB_OFFSET: f32 = 12.;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
	/// Hue in degrees, `0.0..=360.0`
	pub h: f32,
	/// Saturation `0.0..=1.0`
	pub s: f32,
	/// Value `0.0..=1.0`
	pub v: f32,
}

impl Default for Hsv {
	fn default() -> Self {
		Self { h: 0., s: 1., v: 1. }
	}
}

/// Maps `0..=1` onto itself along half a cosine wave.
pub fn sin_ease(n: f32) -> f32 {
	0.5 - (n * PI).cos() / 2.
}

/// Inverse of [`sin_ease`] on `0..=1`.
pub fn inv_sin_ease(n: f32) -> f32 {
	(1. - 2. * n).clamp(-1., 1.).acos() / PI
}

pub fn hsv_to_rgb(Hsv { h, s, v }: Hsv) -> Color {
	let mut sextant = h / 60.;
	let sextant_hue = sextant % 1.;
	sextant += sin_ease(sextant_hue) - sextant_hue;

	let channel = |n: f32| {
		let k = (n + sextant) % 6.;
		v - v * s * k.min(4. - k).clamp(0., 1.)
	};

	Color::from_rgbf32_unchecked(channel(5.), channel(3.), channel(1.))
}

/// Hue of an RGB color in sextants, `0.0..6.0`.
fn sextant_hue(color: Color, value: f32, chroma: f32) -> f32 {
	let (r, g, b, _) = color.components();
	let hue = if chroma == 0. {
		0.
	} else if value == r {
		(g - b) / chroma
	} else if value == g {
		2. + (b - r) / chroma
	} else {
		4. + (r - g) / chroma
	};
	(hue + 6.) % 6.
}

pub fn rgb_to_hsv(color: Color) -> Hsv {
	let (r, g, b, _) = color.components();
	let v = r.max(g).max(b);
	let chroma = v - r.min(g).min(b);
	let s = if v > 0. { chroma / v } else { 0. };

	let mut sextant = sextant_hue(color, v, chroma);
	let fraction = sextant % 1.;
	sextant += inv_sin_ease(fraction) - fraction;

	Hsv { h: sextant * 60., s, v }
}

/// Renders the saturation/value square for `hue` as RGBA bytes, row by row from the top.
/// Saturation grows from left to right and value from bottom to top.
pub fn render_slice(hue: f32, size: usize) -> Vec<u8> {
	let last = size.saturating_sub(1).max(1) as f32;
	let mut pixels = Vec::with_capacity(size * size * 4);

	for row in 0..size {
		for column in 0..size {
			let hsv = Hsv {
				h: hue,
				s: column as f32 / last,
				v: 1. - row as f32 / last,
			};
			let [r, g, b, _] = hsv_to_rgb(hsv).to_rgba8();
			pixels.extend_from_slice(&[r, g, b, 0xFF]);
		}
	}

	pixels
}

/// Where the picker's thumbs go and how they're painted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerLayout {
	pub hue_thumb_top: f32,
	pub sv_thumb_top: f32,
	pub sv_thumb_left: f32,
	/// The selected color, as stored in settings
	pub color: String,
	/// Border keeping the saturation/value thumb visible against the square
	pub thumb_border: &'static str,
}

/// Selection state of the color picker.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Picker {
	hsv: Hsv,
}

impl Picker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn hsv(&self) -> Hsv {
		self.hsv
	}

	pub fn color(&self) -> Color {
		hsv_to_rgb(self.hsv)
	}

	/// Selects the hue at `y`, the fraction of the way down the hue slider.
	pub fn set_hue_fraction(&mut self, y: f32) {
		self.hsv.h = y.clamp(0., 1.) * 360.;
	}

	/// Selects the saturation and value at `(x, y)`, fractions of the square's width and height from its top left corner.
	pub fn set_saturation_value_fraction(&mut self, x: f32, y: f32) {
		self.hsv.s = x.clamp(0., 1.);
		self.hsv.v = 1. - y.clamp(0., 1.);
	}

	pub fn set_color(&mut self, color: Color) {
		self.hsv = rgb_to_hsv(color);
	}

	/// Selects a color given in any format [`Color::parse`] accepts.
	pub fn set_color_str(&mut self, color: &str) -> Result<(), ParseError> {
		self.set_color(Color::parse(color)?);
		Ok(())
	}

	pub fn layout(&self) -> PickerLayout {
		let size = PICKER_SIZE as f32;
		let Hsv { h, s, v } = self.hsv;

		PickerLayout {
			hue_thumb_top: -HUE_THUMB_OFFSET + h * size / 360.,
			sv_thumb_top: (1. - v) * size,
			sv_thumb_left: s * size,
			color: self.color().to_rgb_string(),
			thumb_border: if s + (1. - v) < 0.25 { "#000" } else { "#fff" },
		}
	}

	/// The saturation/value square for the current hue.
	pub fn render_slice(&self) -> Vec<u8> {
		render_slice(self.hsv.h, PICKER_SIZE)
	}
}
