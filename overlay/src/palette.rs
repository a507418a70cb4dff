use crate::consts::PALETTE_SIZE;
use crate::error::ParseError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};

/// The two kinds of annotation drawn on a board. Each has its own palette and opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShapeKind {
	/// A highlighted square
	Square,
	Arrow,
}

impl ShapeKind {
	/// Settings key holding the opacity of this shape kind.
	pub fn opacity_key(self) -> &'static str {
		match self {
			ShapeKind::Square => "square",
			ShapeKind::Arrow => "arrow",
		}
	}

	pub fn parse(name: &str) -> Result<Self, ParseError> {
		Self::from_str(name).map_err(|_| ParseError::ShapeKind(name.to_string()))
	}
}

impl fmt::Display for ShapeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_ref())
	}
}

/// Selects one of the colors of a shape kind's palette.
///
/// Slots `1..=PALETTE_SIZE` are user assignable. Index `0` is the neutral sentinel used for
/// annotations drawn in a color outside the known vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PaletteIndex(u8);

impl PaletteIndex {
	pub const NEUTRAL: PaletteIndex = PaletteIndex(0);

	/// A user assignable slot, or `None` outside `1..=PALETTE_SIZE`.
	pub fn slot(number: u8) -> Option<Self> {
		(1..=PALETTE_SIZE as u8).contains(&number).then_some(Self(number))
	}

	/// Every user assignable slot, in order.
	pub fn slots() -> impl Iterator<Item = Self> {
		(1..=PALETTE_SIZE as u8).map(Self)
	}

	/// The neutral sentinel followed by every slot.
	pub fn all() -> impl Iterator<Item = Self> {
		std::iter::once(Self::NEUTRAL).chain(Self::slots())
	}

	pub fn number(self) -> u8 {
		self.0
	}

	pub fn is_neutral(self) -> bool {
		self == Self::NEUTRAL
	}

	/// Zero-based position in a palette array, `None` for the sentinel.
	pub(crate) fn offset(self) -> Option<usize> {
		(!self.is_neutral()).then(|| self.0 as usize - 1)
	}

	/// Reads the tag written on overlay elements. Tags that aren't a valid index read as `None`.
	pub fn from_tag(tag: &str) -> Option<Self> {
		let number = tag.trim().parse::<u8>().ok()?;
		if number == 0 { Some(Self::NEUTRAL) } else { Self::slot(number) }
	}

	pub fn tag(self) -> String {
		self.0.to_string()
	}
}

impl TryFrom<u8> for PaletteIndex {
	type Error = ParseError;

	fn try_from(number: u8) -> Result<Self, Self::Error> {
		if number == 0 {
			return Ok(Self::NEUTRAL);
		}
		Self::slot(number).ok_or(ParseError::PaletteSlot {
			value: number.to_string(),
			max: PALETTE_SIZE,
		})
	}
}

impl From<PaletteIndex> for u8 {
	fn from(index: PaletteIndex) -> Self {
		index.0
	}
}

impl fmt::Display for PaletteIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Colors the board draws annotations in, listed in palette slot order.
/// Each entry holds the stroke color and the brush names that use it.
const UPSTREAM_VOCABULARY: [(&str, &[&str]); PALETTE_SIZE] = [
	("#15781b", &["green", "palegreen"]),
	("#882020", &["red", "palered"]),
	("#003088", &["blue", "paleblue"]),
	("#e68f00", &["yellow"]),
];

/// Maps a color the board drew an annotation in, either its stroke color or its brush name,
/// to the palette index customizing it. Unknown colors map to [`PaletteIndex::NEUTRAL`].
pub fn palette_index_of(upstream_color: &str) -> PaletteIndex {
	let color = upstream_color.trim().to_ascii_lowercase();
	UPSTREAM_VOCABULARY
		.iter()
		.zip(PaletteIndex::slots())
		.find(|((stroke, brushes), _)| *stroke == color || brushes.contains(&color.as_str()))
		.map(|(_, index)| index)
		.unwrap_or(PaletteIndex::NEUTRAL)
}

/// Name of the setting holding one palette color, such as `arrow_color_2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorName {
	pub shape: ShapeKind,
	slot: PaletteIndex,
}

impl ColorName {
	/// The color the options page edits first.
	pub const FIRST: ColorName = ColorName {
		shape: ShapeKind::Arrow,
		slot: PaletteIndex(1),
	};

	/// `None` when `slot` is the neutral sentinel, which is never user assignable.
	pub fn new(shape: ShapeKind, slot: PaletteIndex) -> Option<Self> {
		(!slot.is_neutral()).then_some(Self { shape, slot })
	}

	pub fn slot(self) -> PaletteIndex {
		self.slot
	}

	/// Every color setting, arrows first.
	pub fn all() -> impl Iterator<Item = Self> {
		[ShapeKind::Arrow, ShapeKind::Square]
			.into_iter()
			.flat_map(|shape| PaletteIndex::slots().map(move |slot| Self { shape, slot }))
	}
}

impl fmt::Display for ColorName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}_color_{}", self.shape, self.slot)
	}
}

impl FromStr for ColorName {
	type Err = ParseError;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		let invalid = || ParseError::ColorName(name.to_string());

		let (shape, slot) = name.split_once("_color_").ok_or_else(invalid)?;
		let shape = ShapeKind::parse(shape).map_err(|_| invalid())?;
		let slot = slot.parse::<u8>().ok().and_then(PaletteIndex::slot).ok_or_else(invalid)?;
		Ok(Self { shape, slot })
	}
}

impl TryFrom<String> for ColorName {
	type Error = ParseError;

	fn try_from(name: String) -> Result<Self, Self::Error> {
		name.parse()
	}
}

impl From<ColorName> for String {
	fn from(name: ColorName) -> Self {
		name.to_string()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn upstream_colors_resolve_to_stable_slots() {
		let expected = [("#15781B", 1), ("#882020", 2), ("#003088", 3), ("#e68f00", 4), ("green", 1), ("paleBlue", 3), ("yellow", 4)];
		for (color, number) in expected {
			assert_eq!(palette_index_of(color), PaletteIndex::slot(number).unwrap(), "{color}");
			assert_eq!(palette_index_of(color), palette_index_of(color));
		}
	}

	#[test]
	fn unknown_colors_resolve_to_neutral() {
		for color in ["#4a4a4a", "paleGrey", "", "purple", "#15781"] {
			assert_eq!(palette_index_of(color), PaletteIndex::NEUTRAL, "{color}");
		}
	}

	#[test]
	fn palette_index_tags() {
		assert_eq!(PaletteIndex::from_tag("0"), Some(PaletteIndex::NEUTRAL));
		assert_eq!(PaletteIndex::from_tag("4"), PaletteIndex::slot(4));
		assert_eq!(PaletteIndex::from_tag("5"), None);
		assert_eq!(PaletteIndex::from_tag("NaN"), None);
		assert_eq!(PaletteIndex::slot(0), None);
		assert_eq!(PaletteIndex::all().count(), PALETTE_SIZE + 1);
	}

	#[test]
	fn color_names() {
		let name: ColorName = "arrow_color_2".parse().unwrap();
		assert_eq!(name.shape, ShapeKind::Arrow);
		assert_eq!(name.slot(), PaletteIndex::slot(2).unwrap());
		assert_eq!(name.to_string(), "arrow_color_2");

		for invalid in ["arrow_color_0", "arrow_color_5", "circle_color_1", "arrow_colour_1", "square"] {
			assert!(invalid.parse::<ColorName>().is_err(), "{invalid}");
		}

		let all: Vec<String> = ColorName::all().map(|name| name.to_string()).collect();
		assert_eq!(
			all,
			["arrow_color_1", "arrow_color_2", "arrow_color_3", "arrow_color_4", "square_color_1", "square_color_2", "square_color_3", "square_color_4"]
		);
	}

	#[test]
	fn shape_kind_names() {
		assert_eq!(ShapeKind::parse("square"), Ok(ShapeKind::Square));
		assert_eq!(ShapeKind::Arrow.to_string(), "arrow");
		assert!(ShapeKind::parse("circle").is_err());
	}
}
