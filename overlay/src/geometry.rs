use crate::consts::{ARROW_TIP_SHORTENING, BOARD_FILES, BOARD_RANKS_FROM_TOP, BOARD_SQUARES_PER_SIDE};

use glam::{DVec2, UVec2};
use std::fmt;
use std::str::FromStr;

/// A square of the board in algebraic notation, such as `e4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
	/// File index, `a` = 0
	file: u8,
	/// Rank index, rank `1` = 0
	rank: u8,
}

impl Square {
	pub fn new(file: u8, rank: u8) -> Option<Self> {
		let side = BOARD_SQUARES_PER_SIDE as u8;
		(file < side && rank < side).then_some(Self { file, rank })
	}

	/// Parses a label like `e4`. Anything other than exactly a file letter followed by a rank digit is rejected.
	pub fn parse(label: &str) -> Option<Self> {
		let mut chars = label.chars();
		let (file, rank) = (chars.next()?, chars.next()?);
		if chars.next().is_some() {
			return None;
		}
		let file = BOARD_FILES.find(file)?;
		let rank = rank.to_digit(10).filter(|rank| (1..=BOARD_SQUARES_PER_SIDE).contains(rank))?;
		Self::new(file as u8, rank as u8 - 1)
	}

	/// Zero-based column and row of this square as seen from the top left corner of the board.
	/// A flipped board is viewed from the other side, mirroring both axes.
	pub fn grid(self, flipped: bool) -> UVec2 {
		let last = BOARD_SQUARES_PER_SIDE - 1;
		let column = self.file as u32;
		let row = last - self.rank as u32;
		if flipped { UVec2::new(last - column, last - row) } else { UVec2::new(column, row) }
	}
}

impl fmt::Display for Square {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let file = BOARD_FILES.as_bytes()[self.file as usize] as char;
		write!(f, "{file}{}", self.rank + 1)
	}
}

impl FromStr for Square {
	type Err = crate::error::ParseError;

	fn from_str(label: &str) -> Result<Self, Self::Err> {
		Self::parse(label).ok_or_else(|| crate::error::ParseError::Square(label.to_string()))
	}
}

/// Grid position of a square label, or `None` for a malformed label.
pub fn square_to_grid(label: &str, flipped: bool) -> Option<UVec2> {
	Square::parse(label).map(|square| square.grid(flipped))
}

/// Position inside a container whose children are each one square large, as a CSS transform.
pub fn grid_to_percent_transform(grid: UVec2) -> String {
	format!("translate({}%,{}%)", 100 * grid.x, 100 * grid.y)
}

/// The inline style the board puts on a piece element standing on `grid`, for a board `board_size` pixels wide.
/// The board drops the vertical offset entirely on the top row, so this does too.
pub fn grid_to_pixel_transform(grid: UVec2, board_size: f64) -> String {
	let square_size = board_size / BOARD_SQUARES_PER_SIDE as f64;
	let x = grid.x as f64 * square_size;
	let y = grid.y as f64 * square_size;
	if y == 0. { format!("transform: translate({x}px);") } else { format!("transform: translate({x}px, {y}px);") }
}

/// Pulls the tip of an arrow back towards its tail by [`ARROW_TIP_SHORTENING`], keeping its direction.
///
/// Every arrow is shortened by the same amount, whether or not other arrows share its destination,
/// so drawing a new arrow never changes the length of one already on the board.
/// A segment shorter than the shortening collapses onto its tail.
pub fn shorten_arrow_tip(tail: DVec2, tip: DVec2) -> (DVec2, DVec2) {
	let direction = tip - tail;
	let length = direction.length();
	if length <= ARROW_TIP_SHORTENING {
		return (tail, tail);
	}

	let scale = (length - ARROW_TIP_SHORTENING) / length;
	(tail, tail + direction * scale)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parse_square_labels() {
		assert_eq!(Square::parse("a1"), Square::new(0, 0));
		assert_eq!(Square::parse("h8"), Square::new(7, 7));
		assert_eq!(Square::parse("e4").map(|square| square.to_string()).as_deref(), Some("e4"));

		for malformed in ["", "e", "e9", "e0", "i4", "e44", "E4", "4e"] {
			assert_eq!(Square::parse(malformed), None, "{malformed:?} should be rejected");
		}
	}

	#[test]
	fn grid_positions() {
		assert_eq!(square_to_grid("a8", false), Some(UVec2::new(0, 0)));
		assert_eq!(square_to_grid("a1", false), Some(UVec2::new(0, 7)));
		assert_eq!(square_to_grid("e4", false), Some(UVec2::new(4, 4)));
		assert_eq!(square_to_grid("e4", true), Some(UVec2::new(3, 3)));
		assert_eq!(square_to_grid("z9", true), None);
	}

	#[test]
	fn flipping_reflects_about_the_center() {
		for file in 0..8 {
			for rank in 0..8 {
				let square = Square::new(file, rank).unwrap();
				let normal = square.grid(false);
				let flipped = square.grid(true);
				assert_eq!(normal + flipped, UVec2::splat(7));

				// Mirroring the flipped position again lands back on the unflipped one
				assert_eq!(UVec2::splat(7) - flipped, normal);
			}
		}
	}

	#[test]
	fn transforms() {
		assert_eq!(grid_to_percent_transform(UVec2::new(4, 4)), "translate(400%,400%)");
		assert_eq!(grid_to_percent_transform(UVec2::ZERO), "translate(0%,0%)");
		assert_eq!(grid_to_pixel_transform(UVec2::new(4, 4), 512.), "transform: translate(256px, 256px);");
		assert_eq!(grid_to_pixel_transform(UVec2::new(3, 0), 512.), "transform: translate(192px);");
		assert_eq!(grid_to_pixel_transform(UVec2::new(1, 2), 500.), "transform: translate(62.5px, 125px);");
	}

	#[test]
	fn shortened_tip_keeps_direction() {
		let tail = DVec2::new(4., 6.);
		let tip = DVec2::new(4., 4.);
		let (new_tail, new_tip) = shorten_arrow_tip(tail, tip);

		assert_eq!(new_tail, tail);
		assert!((new_tip.y - (4. + ARROW_TIP_SHORTENING)).abs() < 1e-12);
		assert_eq!(new_tip.x, 4.);
		assert!(new_tip.distance(tail) < tip.distance(tail));
		assert!((tip - tail).normalize().dot((new_tip - tail).normalize()) > 1. - 1e-12);
	}

	#[test]
	fn shortened_tip_never_overshoots_the_tail() {
		let tail = DVec2::new(2., 2.);
		assert_eq!(shorten_arrow_tip(tail, tail), (tail, tail));
		assert_eq!(shorten_arrow_tip(tail, DVec2::new(2.1, 2.1)), (tail, tail));
	}

	#[test]
	fn knight_arrow_is_shortened_by_a_fixed_amount() {
		let tail = DVec2::new(1., 7.);
		let tip = DVec2::new(2., 5.);
		let (_, new_tip) = shorten_arrow_tip(tail, tip);
		assert!((tip.distance(new_tip) - ARROW_TIP_SHORTENING).abs() < 1e-12);
	}
}
