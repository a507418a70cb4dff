use crate::error::ParseError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structure that represents a color as the options page edits it.
/// Every component, alpha included, is stored as `f32` ranging from `0.0` to `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
	red: f32,
	green: f32,
	blue: f32,
	alpha: f32,
}

impl Color {
	pub const BLACK: Color = Color::from_rgbf32_unchecked(0., 0., 0.);
	pub const WHITE: Color = Color::from_rgbf32_unchecked(1., 1., 1.);

	/// Returns `Some(Color)` if every component lies within `0.0..=1.0`. NaN and infinity are rejected.
	///
	/// # Examples
	/// ```
	/// use fancyground_overlay::color::Color;
	/// let color = Color::from_rgbaf32(0.3, 0.14, 0.15, 0.92).unwrap();
	/// assert!(color.components() == (0.3, 0.14, 0.15, 0.92));
	///
	/// assert!(Color::from_rgbaf32(1., 1.2, 1., 1.).is_none());
	/// ```
	pub fn from_rgbaf32(red: f32, green: f32, blue: f32, alpha: f32) -> Option<Color> {
		[red, green, blue, alpha].iter().all(|c| (0.0..=1.).contains(c)).then_some(Color { red, green, blue, alpha })
	}

	/// Return an opaque `Color` from given `f32` RGB channels.
	pub const fn from_rgbf32_unchecked(red: f32, green: f32, blue: f32) -> Color {
		Color { red, green, blue, alpha: 1. }
	}

	/// Return an opaque `Color` given RGB channels from `0` to `255`.
	pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Color {
		Color::from_rgba8(red, green, blue, 255)
	}

	/// Return a `Color` given RGBA channels from `0` to `255`.
	pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
		let map_range = |int_color| int_color as f32 / 255.;
		Color {
			red: map_range(red),
			green: map_range(green),
			blue: map_range(blue),
			alpha: map_range(alpha),
		}
	}

	pub fn r(&self) -> f32 {
		self.red
	}

	pub fn g(&self) -> f32 {
		self.green
	}

	pub fn b(&self) -> f32 {
		self.blue
	}

	pub fn a(&self) -> f32 {
		self.alpha
	}

	pub fn components(&self) -> (f32, f32, f32, f32) {
		(self.red, self.green, self.blue, self.alpha)
	}

	/// Every component scaled to `0..=255` and rounded, in RGBA order.
	pub fn to_rgba8(&self) -> [u8; 4] {
		let to_byte = |channel: f32| (channel.clamp(0., 1.) * 255.).round() as u8;
		[to_byte(self.red), to_byte(self.green), to_byte(self.blue), to_byte(self.alpha)]
	}

	/// Return a 6-character RGB hex string (without a # prefix).
	///
	/// # Examples
	/// ```
	/// use fancyground_overlay::color::Color;
	/// let color = Color::from_rgba8(0x7C, 0x67, 0xFA, 0x61);
	/// assert_eq!("7C67FA", color.rgb_hex())
	/// ```
	pub fn rgb_hex(&self) -> String {
		let [r, g, b, _] = self.to_rgba8();
		format!("{r:02X}{g:02X}{b:02X}")
	}

	/// Return an 8-character RGBA hex string (without a # prefix).
	pub fn rgba_hex(&self) -> String {
		let [r, g, b, a] = self.to_rgba8();
		format!("{r:02X}{g:02X}{b:02X}{a:02X}")
	}

	/// The CSS `rgb(r, g, b)` form the options page stores colors in. Alpha is dropped.
	pub fn to_rgb_string(&self) -> String {
		let [r, g, b, _] = self.to_rgba8();
		format!("rgb({r}, {g}, {b})")
	}

	/// Creates a color from a 6-character RGB hex string (without a # prefix).
	pub fn from_rgb_str(color_str: &str) -> Option<Color> {
		if color_str.len() != 6 {
			return None;
		}
		let r = u8::from_str_radix(color_str.get(0..2)?, 16).ok()?;
		let g = u8::from_str_radix(color_str.get(2..4)?, 16).ok()?;
		let b = u8::from_str_radix(color_str.get(4..6)?, 16).ok()?;

		Some(Color::from_rgb8(r, g, b))
	}

	/// Creates a color from an 8-character RGBA hex string (without a # prefix).
	pub fn from_rgba_str(color_str: &str) -> Option<Color> {
		if color_str.len() != 8 {
			return None;
		}
		let alpha = u8::from_str_radix(color_str.get(6..8)?, 16).ok()?;
		let rgb = Color::from_rgb_str(color_str.get(0..6)?)?;

		Some(Color { alpha: alpha as f32 / 255., ..rgb })
	}

	/// Creates a color from a 3-character shorthand hex string (without a # prefix), where `F0A` means `FF00AA`.
	pub fn from_short_rgb_str(color_str: &str) -> Option<Color> {
		if color_str.len() != 3 || !color_str.is_ascii() {
			return None;
		}
		let doubled: String = color_str.chars().flat_map(|digit| [digit, digit]).collect();
		Color::from_rgb_str(&doubled)
	}

	/// Reads the `rgb(r, g, b)` and `rgba(r, g, b, a)` functional forms, with channels from `0` to `255` and alpha from `0` to `1`.
	fn from_functional_str(color_str: &str) -> Option<Color> {
		let (arguments, has_alpha) = if let Some(arguments) = color_str.strip_prefix("rgba(") {
			(arguments, true)
		} else {
			(color_str.strip_prefix("rgb(")?, false)
		};
		let arguments = arguments.strip_suffix(')')?;

		let values: Vec<f32> = arguments.split(',').map(|value| value.trim().parse::<f32>().ok()).collect::<Option<_>>()?;
		match (values.as_slice(), has_alpha) {
			([r, g, b], false) => Color::from_rgbaf32(r / 255., g / 255., b / 255., 1.),
			([r, g, b, a], true) => Color::from_rgbaf32(r / 255., g / 255., b / 255., *a),
			_ => None,
		}
	}

	/// Parses any of the formats colors are stored or typed in: `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(...)` and `rgba(...)`.
	pub fn parse(color_str: &str) -> Result<Color, ParseError> {
		let trimmed = color_str.trim();
		let color = match trimmed.strip_prefix('#') {
			Some(hex) => match hex.len() {
				3 => Color::from_short_rgb_str(hex),
				6 => Color::from_rgb_str(hex),
				8 => Color::from_rgba_str(hex),
				_ => None,
			},
			None => Color::from_functional_str(&trimmed.to_ascii_lowercase()),
		};
		color.ok_or_else(|| ParseError::Color(color_str.to_string()))
	}
}

impl FromStr for Color {
	type Err = ParseError;

	fn from_str(color_str: &str) -> Result<Self, Self::Err> {
		Color::parse(color_str)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.rgb_hex())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parses_every_stored_format() {
		let expected = Color::from_rgb8(0x15, 0x78, 0x1B);
		assert_eq!(Color::parse("#15781B"), Ok(expected));
		assert_eq!(Color::parse("#15781b"), Ok(expected));
		assert_eq!(Color::parse("rgb(21, 120, 27)"), Ok(expected));
		assert_eq!(Color::parse(" RGB(21,120,27) "), Ok(expected));

		assert_eq!(Color::parse("#fa0"), Ok(Color::from_rgb8(0xFF, 0xAA, 0x00)));
		assert_eq!(Color::parse("#15781BD8").map(|color| color.to_rgba8()), Ok([0x15, 0x78, 0x1B, 0xD8]));
		assert_eq!(Color::parse("rgba(0, 0, 255, 0.5)").map(|color| color.a()), Ok(0.5));
	}

	#[test]
	fn rejects_malformed_colors() {
		for malformed in ["", "#", "#12345", "#gggggg", "rgb(1, 2)", "rgba(1, 2, 3)", "rgb(300, 0, 0)", "green", "#ééé"] {
			assert_eq!(Color::parse(malformed), Err(ParseError::Color(malformed.to_string())), "{malformed:?}");
		}
	}

	#[test]
	fn formats() {
		let color = Color::from_rgb8(0x7C, 0x67, 0xFA);
		assert_eq!(color.to_rgb_string(), "rgb(124, 103, 250)");
		assert_eq!(color.to_string(), "#7C67FA");
		assert_eq!(Color::from_rgba8(0x7C, 0x67, 0xFA, 0x61).rgba_hex(), "7C67FA61");
	}
}
