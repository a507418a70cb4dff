//! The overlay drawn on top of each board: square highlights and arrows.
//!
//! Both layers are rebuilt from scratch whenever the board's shape layer changes, and patched in place when
//! only a color or an opacity changes.

pub mod arrows;
pub mod defs;
pub mod highlights;

use crate::consts::FLIPPED_ORIENTATION_CLASS;
use crate::dom::Dom;

/// Whether `board` is shown from the black side.
pub fn is_flipped<D: Dom>(dom: &D, board: &D::Node) -> bool {
	dom.has_ancestor_with_class(board, FLIPPED_ORIENTATION_CLASS)
}
