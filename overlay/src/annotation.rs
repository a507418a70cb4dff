//! Reading the annotations the board currently draws out of its shape layer.
//!
//! The board describes each drawn shape with a comma separated hash attribute. Its layout changed between
//! board versions, so the parsers below accept every layout seen so far and skip anything else.

use crate::consts::{ARROW_CURRENT_WIDTH, ARROW_NATURAL_WIDTH, SHAPE_HASH_ATTRIBUTE};
use crate::dom::Dom;
use crate::geometry::Square;
use crate::palette::{PaletteIndex, palette_index_of};
use crate::state::element_opacity;

/// Squares and brush named by a shape hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeHash {
	Circle { square: Square, brush: String },
	Line { from: Square, to: Square, brush: String },
}

/// Parses a shape hash.
///
/// Boolean tokens (the shape-is-being-drawn flag and the shared-destination marker) are dropped first.
/// What remains is read by length, most specific layout first:
/// - `width,height,square,brush` or `width,height,from,to,brush`
/// - `square,brush` or `from,to,brush`
pub fn parse_shape_hash(hash: &str) -> Option<ShapeHash> {
	let tokens: Vec<&str> = hash.split(',').map(str::trim).filter(|token| !matches!(*token, "true" | "false")).collect();

	let is_counter = |token: &str| token.parse::<f64>().is_ok();
	let fields = match tokens.as_slice() {
		[width, height, rest @ ..] if is_counter(*width) && is_counter(*height) && (rest.len() == 2 || rest.len() == 3) => rest,
		rest @ ([_, _] | [_, _, _]) => rest,
		_ => return None,
	};

	match fields {
		[square, brush] => Some(ShapeHash::Circle {
			square: Square::parse(square)?,
			brush: brush.to_string(),
		}),
		[from, to, brush] => Some(ShapeHash::Line {
			from: Square::parse(from)?,
			to: Square::parse(to)?,
			brush: brush.to_string(),
		}),
		_ => None,
	}
}

/// A highlighted square drawn by the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleAnnotation {
	pub square: Square,
	pub index: PaletteIndex,
	pub translucent: bool,
}

impl CircleAnnotation {
	pub fn element_opacity(&self) -> f64 {
		element_opacity(self.translucent)
	}
}

/// An arrow drawn by the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineAnnotation {
	pub from: Square,
	pub to: Square,
	pub index: PaletteIndex,
	pub width: f64,
	pub translucent: bool,
}

impl LineAnnotation {
	pub fn element_opacity(&self) -> f64 {
		element_opacity(self.translucent)
	}
}

/// The line width to draw an arrow with, given the width the board used.
///
/// The board narrows an arrow while it's being drawn. That width maps back to the natural one since the overlay
/// shows the drag state through opacity instead. A missing or unreadable width also gets the natural width.
pub fn normalize_arrow_width(width: Option<&str>) -> f64 {
	match width.and_then(|width| width.trim().parse::<f64>().ok()) {
		Some(width) if width == ARROW_CURRENT_WIDTH => ARROW_NATURAL_WIDTH,
		Some(width) if width.is_finite() && width > 0. => width,
		_ => ARROW_NATURAL_WIDTH,
	}
}

/// The board marks shapes it draws mid-interaction with an opacity other than one.
fn is_translucent(opacity: Option<&str>) -> bool {
	opacity.and_then(|opacity| opacity.trim().parse::<f64>().ok()).is_some_and(|opacity| opacity != 1.)
}

fn resolve_palette_index(stroke: Option<&str>, brush: &str) -> PaletteIndex {
	match stroke {
		Some(stroke) => palette_index_of(stroke),
		None => palette_index_of(brush),
	}
}

/// Every well formed circle of the shape layer, in document order.
pub fn circle_annotations<D: Dom>(dom: &D, shapes: &D::Node) -> Vec<CircleAnnotation> {
	dom.elements_by_tag_name(shapes, "circle")
		.iter()
		.filter_map(|circle| {
			let hash = dom.attribute(circle, SHAPE_HASH_ATTRIBUTE)?;
			let Some(ShapeHash::Circle { square, brush }) = parse_shape_hash(&hash) else {
				log::trace!("Skipping circle with unrecognized hash {hash:?}");
				return None;
			};
			let stroke = dom.attribute(circle, "stroke");

			Some(CircleAnnotation {
				square,
				index: resolve_palette_index(stroke.as_deref(), &brush),
				translucent: is_translucent(dom.attribute(circle, "opacity").as_deref()),
			})
		})
		.collect()
}

/// Every well formed line of the shape layer, in document order.
pub fn line_annotations<D: Dom>(dom: &D, shapes: &D::Node) -> Vec<LineAnnotation> {
	dom.elements_by_tag_name(shapes, "line")
		.iter()
		.filter_map(|line| {
			let hash = dom.attribute(line, SHAPE_HASH_ATTRIBUTE)?;
			let Some(ShapeHash::Line { from, to, brush }) = parse_shape_hash(&hash) else {
				log::trace!("Skipping line with unrecognized hash {hash:?}");
				return None;
			};
			let stroke = dom.attribute(line, "stroke");

			Some(LineAnnotation {
				from,
				to,
				index: resolve_palette_index(stroke.as_deref(), &brush),
				width: normalize_arrow_width(dom.attribute(line, "stroke-width").as_deref()),
				translucent: is_translucent(dom.attribute(line, "opacity").as_deref()),
			})
		})
		.collect()
}

#[cfg(test)]
mod test {
	use super::*;

	fn square(label: &str) -> Square {
		Square::parse(label).unwrap()
	}

	#[test]
	fn parses_every_known_hash_layout() {
		let circle = ShapeHash::Circle {
			square: square("e4"),
			brush: "green".to_string(),
		};
		let line = ShapeHash::Line {
			from: square("e2"),
			to: square("e4"),
			brush: "red".to_string(),
		};

		assert_eq!(parse_shape_hash("e4,green"), Some(circle.clone()));
		assert_eq!(parse_shape_hash("512,512,e4,green"), Some(circle.clone()));
		assert_eq!(parse_shape_hash("512,512,true,e4,green"), Some(circle));
		assert_eq!(parse_shape_hash("e2,e4,red"), Some(line.clone()));
		assert_eq!(parse_shape_hash("512,512,e2,e4,red"), Some(line.clone()));
		assert_eq!(parse_shape_hash("512,512,true,e2,e4,red,true"), Some(line.clone()));
		assert_eq!(parse_shape_hash("496.5,496.5,false,e2,e4,red"), Some(line));
	}

	#[test]
	fn skips_malformed_hashes() {
		for hash in ["", "e4", "512,512,e9,green", "512,512,e2,e4,red,wP", "512,e4,green", "a,b,c,d,e,f", "512,512,x1,e4,red"] {
			assert_eq!(parse_shape_hash(hash), None, "{hash:?}");
		}
	}

	#[test]
	fn arrow_widths() {
		assert_eq!(normalize_arrow_width(Some("0.1328125")), 0.15625);
		assert_eq!(normalize_arrow_width(Some("0.15625")), 0.15625);
		assert_eq!(normalize_arrow_width(Some("0.09")), 0.09);
		assert_eq!(normalize_arrow_width(Some("wide")), ARROW_NATURAL_WIDTH);
		assert_eq!(normalize_arrow_width(None), ARROW_NATURAL_WIDTH);
	}

	#[test]
	fn translucency_flag() {
		assert!(!is_translucent(Some("1")));
		assert!(is_translucent(Some("0.4")));
		assert!(!is_translucent(None));
	}
}
