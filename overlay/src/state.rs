//! In-memory colors and opacities of the overlay, shared by every board of the page.
//!
//! Only the content side keeps this state. Persisting a change is the settings store's job.

use crate::consts::{NEUTRAL_COLOR, PALETTE_SIZE, TRANSLUCENT_OPACITY_FACTOR};
use crate::palette::{ColorName, PaletteIndex, ShapeKind};
use crate::settings::{SettingsMap, default_settings};

#[derive(Clone, Debug, PartialEq)]
struct Palette {
	colors: [String; PALETTE_SIZE],
	/// Opacity applied to the whole layer of this shape kind, kept as the CSS value it was given as.
	opacity: String,
}

impl Palette {
	fn from_settings(shape: ShapeKind, settings: &SettingsMap, defaults: &SettingsMap) -> Self {
		let lookup = |key: &str| settings.get(key).or_else(|| defaults.get(key)).cloned().unwrap_or_default();

		let colors = std::array::from_fn(|offset| {
			let slot = PaletteIndex::slot(offset as u8 + 1).unwrap_or(PaletteIndex::NEUTRAL);
			ColorName::new(shape, slot).map(|name| lookup(&name.to_string())).unwrap_or_default()
		});
		let opacity = lookup(shape.opacity_key());

		Self { colors, opacity }
	}
}

/// Colors per (shape kind, palette index) plus an opacity per shape kind.
/// Every slot always holds a value, either a default or one set by the user.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorState {
	squares: Palette,
	arrows: Palette,
}

impl Default for ColorState {
	fn default() -> Self {
		Self::from_settings(&SettingsMap::new())
	}
}

impl ColorState {
	/// State holding `settings`, with built-in defaults for every key it lacks.
	pub fn from_settings(settings: &SettingsMap) -> Self {
		let defaults = default_settings();
		Self {
			squares: Palette::from_settings(ShapeKind::Square, settings, &defaults),
			arrows: Palette::from_settings(ShapeKind::Arrow, settings, &defaults),
		}
	}

	/// Replaces every slot at once. Keys missing from `settings` go back to their built-in default.
	pub fn init(&mut self, settings: &SettingsMap) {
		*self = Self::from_settings(settings);
	}

	fn palette(&self, shape: ShapeKind) -> &Palette {
		match shape {
			ShapeKind::Square => &self.squares,
			ShapeKind::Arrow => &self.arrows,
		}
	}

	fn palette_mut(&mut self, shape: ShapeKind) -> &mut Palette {
		match shape {
			ShapeKind::Square => &mut self.squares,
			ShapeKind::Arrow => &mut self.arrows,
		}
	}

	/// The color customizing `index` for `shape`, or the neutral gray for the sentinel index.
	pub fn color(&self, shape: ShapeKind, index: PaletteIndex) -> &str {
		match index.offset() {
			Some(offset) => &self.palette(shape).colors[offset],
			None => NEUTRAL_COLOR,
		}
	}

	pub fn opacity(&self, shape: ShapeKind) -> &str {
		&self.palette(shape).opacity
	}

	/// Sets one palette color. Setting the sentinel index is ignored since it isn't customizable.
	pub fn set_color(&mut self, shape: ShapeKind, index: PaletteIndex, color: impl Into<String>) {
		let Some(offset) = index.offset() else {
			log::warn!("Ignoring color change of the neutral {shape} color");
			return;
		};
		self.palette_mut(shape).colors[offset] = color.into();
	}

	pub fn set_opacity(&mut self, shape: ShapeKind, opacity: impl Into<String>) {
		self.palette_mut(shape).opacity = opacity.into();
	}
}

/// Opacity of one overlay element relative to its layer: annotations the board draws translucent
/// (while they're being dragged) are dimmed on top of the layer's own opacity.
pub fn element_opacity(translucent: bool) -> f64 {
	if translucent { TRANSLUCENT_OPACITY_FACTOR } else { 1. }
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::consts::{DEFAULT_ARROW_OPACITY, DEFAULT_SQUARE_COLORS};

	fn slot(number: u8) -> PaletteIndex {
		PaletteIndex::slot(number).unwrap()
	}

	#[test]
	fn defaults_fill_every_slot() {
		let state = ColorState::default();
		for shape in [ShapeKind::Square, ShapeKind::Arrow] {
			for index in PaletteIndex::slots() {
				assert!(!state.color(shape, index).is_empty());
			}
			assert!(!state.opacity(shape).is_empty());
		}
		assert_eq!(state.color(ShapeKind::Square, slot(1)), DEFAULT_SQUARE_COLORS[0]);
		assert_eq!(state.opacity(ShapeKind::Arrow), DEFAULT_ARROW_OPACITY);
	}

	#[test]
	fn sentinel_is_neutral_gray() {
		let state = ColorState::default();
		assert_eq!(state.color(ShapeKind::Arrow, PaletteIndex::NEUTRAL), "#4a4a4a");
		assert_eq!(state.color(ShapeKind::Square, PaletteIndex::NEUTRAL), "#4a4a4a");
	}

	#[test]
	fn init_replaces_every_slot_and_defaults_the_rest() {
		let mut state = ColorState::default();
		state.set_color(ShapeKind::Arrow, slot(3), "#123456");

		let settings = SettingsMap::from([("arrow_color_1".to_string(), "#ffffff".to_string()), ("square".to_string(), "0.4".to_string())]);
		state.init(&settings);

		assert_eq!(state.color(ShapeKind::Arrow, slot(1)), "#ffffff");
		assert_eq!(state.color(ShapeKind::Arrow, slot(3)), "#0080C6");
		assert_eq!(state.opacity(ShapeKind::Square), "0.4");
		assert_eq!(state.opacity(ShapeKind::Arrow), DEFAULT_ARROW_OPACITY);
	}

	#[test]
	fn point_mutations_are_visible_immediately_and_isolated_per_shape() {
		let mut state = ColorState::default();
		let square_before = state.color(ShapeKind::Square, slot(2)).to_string();

		state.set_color(ShapeKind::Arrow, slot(2), "rgb(1, 2, 3)");
		state.set_opacity(ShapeKind::Arrow, "0.3");
		state.set_color(ShapeKind::Arrow, PaletteIndex::NEUTRAL, "#000");

		assert_eq!(state.color(ShapeKind::Arrow, slot(2)), "rgb(1, 2, 3)");
		assert_eq!(state.opacity(ShapeKind::Arrow), "0.3");
		assert_eq!(state.color(ShapeKind::Square, slot(2)), square_before);
		assert_eq!(state.color(ShapeKind::Arrow, PaletteIndex::NEUTRAL), "#4a4a4a");
	}

	#[test]
	fn translucent_elements_are_dimmed() {
		assert_eq!(element_opacity(false), 1.);
		assert_eq!(element_opacity(true), 0.25);
	}
}
