use crate::annotation::circle_annotations;
use crate::consts::{HIGHLIGHT_TAG, HIGHLIGHTS_CLASS, PALETTE_INDEX_ATTRIBUTE, SQUARE_ATTRIBUTE};
use crate::dom::{Dom, Namespace};
use crate::geometry::grid_to_percent_transform;
use crate::palette::{PaletteIndex, ShapeKind};
use crate::render::is_flipped;
use crate::state::ColorState;

fn highlight_container<D: Dom>(dom: &D, board: &D::Node) -> Option<D::Node> {
	dom.first_element_by_class_name(board, HIGHLIGHTS_CLASS)
}

fn create_highlight_container<D: Dom>(dom: &D, state: &ColorState, board: &D::Node) -> D::Node {
	let container = dom.create_element("div", Namespace::Html);
	dom.set_attribute(&container, "class", HIGHLIGHTS_CLASS);
	dom.set_style(&container, "opacity", state.opacity(ShapeKind::Square));
	dom.append_child(board, &container);
	container
}

/// Rebuilds the highlights of `board` from the circles currently in its shape layer.
///
/// Each highlight is tagged with its palette index. Its own opacity only carries the dimming of translucent
/// circles, the base opacity lives on the container.
pub fn render_highlights<D: Dom>(dom: &D, state: &ColorState, shapes: &D::Node, board: &D::Node) {
	let container = highlight_container(dom, board).unwrap_or_else(|| create_highlight_container(dom, state, board));
	dom.clear_children(&container);

	let flipped = is_flipped(dom, board);
	for circle in circle_annotations(dom, shapes) {
		let highlight = dom.create_element(HIGHLIGHT_TAG, Namespace::Html);
		dom.set_attribute(&highlight, SQUARE_ATTRIBUTE, &circle.square.to_string());
		dom.set_attribute(&highlight, PALETTE_INDEX_ATTRIBUTE, &circle.index.tag());
		dom.set_style(&highlight, "background", state.color(ShapeKind::Square, circle.index));
		dom.set_style(&highlight, "opacity", &circle.element_opacity().to_string());
		dom.set_style(&highlight, "transform", &grid_to_percent_transform(circle.square.grid(flipped)));
		dom.append_child(&container, &highlight);
	}
}

fn highlights<D: Dom>(dom: &D, board: &D::Node) -> Vec<D::Node> {
	highlight_container(dom, board)
		.map(|container| dom.elements_by_tag_name(&container, HIGHLIGHT_TAG))
		.unwrap_or_default()
}

/// Repaints the highlights tagged with `index` in `color`, leaving every other highlight untouched.
pub fn patch_color<D: Dom>(dom: &D, board: &D::Node, index: PaletteIndex, color: &str) {
	let tag = index.tag();
	for highlight in highlights(dom, board) {
		if dom.attribute(&highlight, PALETTE_INDEX_ATTRIBUTE).as_deref() == Some(tag.as_str()) {
			dom.set_style(&highlight, "background", color);
		}
	}
}

/// Repaints every highlight from the current state, using the palette index it's tagged with.
pub fn patch_all_colors<D: Dom>(dom: &D, state: &ColorState, board: &D::Node) {
	for highlight in highlights(dom, board) {
		let Some(index) = dom.attribute(&highlight, PALETTE_INDEX_ATTRIBUTE).as_deref().and_then(PaletteIndex::from_tag) else {
			continue;
		};
		dom.set_style(&highlight, "background", state.color(ShapeKind::Square, index));
	}
}

/// Applies the current square opacity to the whole highlight layer at once.
pub fn patch_opacity<D: Dom>(dom: &D, state: &ColorState, board: &D::Node) {
	if let Some(container) = highlight_container(dom, board) {
		dom.set_style(&container, "opacity", state.opacity(ShapeKind::Square));
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::consts::{BOARD_TAG, FLIPPED_ORIENTATION_CLASS, SHAPES_CLASS, SHAPE_HASH_ATTRIBUTE};
	use crate::memory_dom::{MemoryDom, MemoryNode};

	fn setup(dom: &MemoryDom, flipped: bool) -> (MemoryNode, MemoryNode) {
		let wrap = dom.create_element("div", Namespace::Html);
		if flipped {
			dom.set_attribute(&wrap, "class", FLIPPED_ORIENTATION_CLASS);
		}
		let shapes = dom.create_element("svg", Namespace::Svg);
		dom.set_attribute(&shapes, "class", SHAPES_CLASS);
		let board = dom.create_element(BOARD_TAG, Namespace::Html);
		dom.append_child(&dom.root(), &wrap);
		dom.append_child(&wrap, &shapes);
		dom.append_child(&wrap, &board);
		(shapes, board)
	}

	fn circle(dom: &MemoryDom, shapes: &MemoryNode, hash: &str, stroke: &str, opacity: &str) {
		let circle = dom.create_element("circle", Namespace::Svg);
		dom.set_attribute(&circle, SHAPE_HASH_ATTRIBUTE, hash);
		dom.set_attribute(&circle, "stroke", stroke);
		dom.set_attribute(&circle, "opacity", opacity);
		dom.append_child(shapes, &circle);
	}

	#[test]
	fn renders_one_highlight_per_circle() {
		let dom = MemoryDom::new();
		let state = ColorState::default();
		let (shapes, board) = setup(&dom, false);
		circle(&dom, &shapes, "512,512,e4,green", "#15781B", "1");
		circle(&dom, &shapes, "512,512,true,a8,red", "#882020", "0.4");
		circle(&dom, &shapes, "garbage", "#882020", "1");

		render_highlights(&dom, &state, &shapes, &board);

		let highlights = highlights(&dom, &board);
		assert_eq!(highlights.len(), 2);

		let green = PaletteIndex::slot(1).unwrap();
		assert_eq!(dom.attribute(&highlights[0], SQUARE_ATTRIBUTE).as_deref(), Some("e4"));
		assert_eq!(dom.style(&highlights[0], "background").as_deref(), Some(state.color(ShapeKind::Square, green)));
		assert_eq!(dom.style(&highlights[0], "transform").as_deref(), Some("translate(400%,400%)"));
		assert_eq!(dom.style(&highlights[0], "opacity").as_deref(), Some("1"));

		assert_eq!(dom.style(&highlights[1], "transform").as_deref(), Some("translate(0%,0%)"));
		assert_eq!(dom.style(&highlights[1], "opacity").as_deref(), Some("0.25"));
		assert_eq!(dom.attribute(&highlights[1], PALETTE_INDEX_ATTRIBUTE).as_deref(), Some("2"));

		let container = highlight_container(&dom, &board).unwrap();
		assert_eq!(dom.style(&container, "opacity").as_deref(), Some(state.opacity(ShapeKind::Square)));
	}

	#[test]
	fn flipped_boards_mirror_positions() {
		let dom = MemoryDom::new();
		let state = ColorState::default();
		let (shapes, board) = setup(&dom, true);
		circle(&dom, &shapes, "a8,green", "#15781B", "1");

		render_highlights(&dom, &state, &shapes, &board);
		assert_eq!(dom.style(&highlights(&dom, &board)[0], "transform").as_deref(), Some("translate(700%,700%)"));
	}

	#[test]
	fn rerendering_replaces_instead_of_accumulating() {
		let dom = MemoryDom::new();
		let state = ColorState::default();
		let (shapes, board) = setup(&dom, false);
		circle(&dom, &shapes, "e4,green", "#15781B", "1");

		render_highlights(&dom, &state, &shapes, &board);
		let first = dom.markup(&board);
		render_highlights(&dom, &state, &shapes, &board);
		assert_eq!(dom.markup(&board), first);
		assert_eq!(dom.elements_by_class_name(&board, HIGHLIGHTS_CLASS).len(), 1);

		dom.clear_children(&shapes);
		render_highlights(&dom, &state, &shapes, &board);
		assert!(highlights(&dom, &board).is_empty());
	}

	#[test]
	fn patches_only_the_requested_index() {
		let dom = MemoryDom::new();
		let mut state = ColorState::default();
		let (shapes, board) = setup(&dom, false);
		circle(&dom, &shapes, "e4,green", "#15781B", "1");
		circle(&dom, &shapes, "d4,blue", "#003088", "1");
		render_highlights(&dom, &state, &shapes, &board);

		patch_color(&dom, &board, PaletteIndex::slot(3).unwrap(), "#abcdef");
		let highlights = highlights(&dom, &board);
		assert_eq!(dom.style(&highlights[0], "background").as_deref(), Some(state.color(ShapeKind::Square, PaletteIndex::slot(1).unwrap())));
		assert_eq!(dom.style(&highlights[1], "background").as_deref(), Some("#abcdef"));

		state.set_color(ShapeKind::Square, PaletteIndex::slot(1).unwrap(), "#111111");
		state.set_opacity(ShapeKind::Square, "0.2");
		patch_all_colors(&dom, &state, &board);
		patch_opacity(&dom, &state, &board);
		assert_eq!(dom.style(&highlights[0], "background").as_deref(), Some("#111111"));
		assert_eq!(dom.style(&highlights[1], "background").as_deref(), Some(state.color(ShapeKind::Square, PaletteIndex::slot(3).unwrap())));
		assert_eq!(dom.style(&highlight_container(&dom, &board).unwrap(), "opacity").as_deref(), Some("0.2"));
	}
}
