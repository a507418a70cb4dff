use crate::consts::*;
use crate::dom::{Dom, Namespace};
use crate::geometry::{Square, grid_to_pixel_transform};
use crate::palette::{PaletteIndex, ShapeKind};
use crate::state::ColorState;

/// Id of the arrowhead marker for `index` on the board using `prefix`.
pub fn arrowhead_id(prefix: &str, index: PaletteIndex) -> String {
	format!("{prefix}arrowhead{index}")
}

/// Value of a line's `marker-end` attribute pointing at the arrowhead for `index`.
pub fn arrowhead_reference(prefix: &str, index: PaletteIndex) -> String {
	format!("url(#{})", arrowhead_id(prefix, index))
}

pub fn mask_id(prefix: &str, square: Square) -> String {
	format!("{prefix}{square}")
}

fn silhouette_filter_id(prefix: &str) -> String {
	format!("{prefix}toBlack")
}

/// Extracts the address from a CSS `url("...")` value.
fn image_url(background_image: &str) -> Option<&str> {
	background_image.split(['\'', '"']).nth(1).filter(|url| !url.is_empty())
}

/// The image of the piece standing on `square`, or `None` if the square is empty.
///
/// Pieces only carry their position as an inline pixel transform, so the piece is found by comparing that
/// style against the transform the board would give a piece on `square`.
pub fn resolve_piece_image<D: Dom>(dom: &D, square: Square, flipped: bool, board: &D::Node) -> Option<String> {
	let expected = grid_to_pixel_transform(square.grid(flipped), dom.width(board));
	let piece = dom
		.elements_by_tag_name(board, PIECE_TAG)
		.into_iter()
		.find(|piece| dom.attribute(piece, "style").is_some_and(|style| style.trim() == expected))?;

	let background_image = dom.computed_style(&piece, "background-image")?;
	image_url(&background_image).map(str::to_string)
}

fn svg_element<D: Dom>(dom: &D, tag: &str, attributes: &[(&str, &str)]) -> D::Node {
	let element = dom.create_element(tag, Namespace::Svg);
	for (name, value) in attributes {
		dom.set_attribute(&element, name, value);
	}
	element
}

/// Filter turning a piece image into a solid black silhouette.
fn silhouette_filter<D: Dom>(dom: &D, prefix: &str) -> D::Node {
	let filter = svg_element(dom, "filter", &[("id", silhouette_filter_id(prefix).as_str())]);
	let matrix = svg_element(dom, "feColorMatrix", &[("type", "matrix"), ("values", TO_BLACK_MATRIX)]);
	dom.append_child(&filter, &matrix);
	filter
}

/// Builds the definitions of the arrow layer of one board, and the masks its arrows need.
pub struct DefsBuilder<'a, D: Dom> {
	dom: &'a D,
	defs: D::Node,
	prefix: &'a str,
	/// Squares a mask was already built for during this render, with the resulting mask id
	masks: Vec<(Square, Option<String>)>,
	has_filter: bool,
}

impl<'a, D: Dom> DefsBuilder<'a, D> {
	/// Starts the `<defs>` block with one arrowhead marker per palette index, including the neutral sentinel,
	/// so recoloring a palette slot can repaint its marker in place.
	pub fn build_defs(dom: &'a D, state: &ColorState, prefix: &'a str) -> Self {
		let defs = dom.create_element("defs", Namespace::Svg);
		for index in PaletteIndex::all() {
			let marker = svg_element(
				dom,
				"marker",
				&[
					("id", arrowhead_id(prefix, index).as_str()),
					("orient", "auto"),
					("markerWidth", ARROWHEAD_MARKER_WIDTH),
					("markerHeight", ARROWHEAD_MARKER_HEIGHT),
					("refX", ARROWHEAD_REF_X),
					("refY", ARROWHEAD_REF_Y),
				],
			);
			let path = svg_element(
				dom,
				"path",
				&[("d", ARROWHEAD_PATH), ("fill", state.color(ShapeKind::Arrow, index)), (PALETTE_INDEX_ATTRIBUTE, index.tag().as_str())],
			);
			dom.append_child(&marker, &path);
			dom.append_child(&defs, &marker);
		}

		Self {
			dom,
			defs,
			prefix,
			masks: Vec::new(),
			has_filter: false,
		}
	}

	pub fn defs(&self) -> &D::Node {
		&self.defs
	}

	/// Returns the id of a mask hiding the piece on `square` from an arrow, or `None` when the square is empty.
	///
	/// The mask is an opaque backdrop covering the whole board with a black silhouette of the piece cut out of it.
	pub fn build_mask(&mut self, square: Square, flipped: bool, board: &D::Node) -> Option<String> {
		if let Some((_, id)) = self.masks.iter().find(|(built, _)| *built == square) {
			return id.clone();
		}

		let id = self.create_mask(square, flipped, board);
		self.masks.push((square, id.clone()));
		id
	}

	fn create_mask(&mut self, square: Square, flipped: bool, board: &D::Node) -> Option<String> {
		let dom = self.dom;
		let url = resolve_piece_image(dom, square, flipped, board)?;

		if !self.has_filter {
			dom.prepend_child(&self.defs, &silhouette_filter(dom, self.prefix));
			self.has_filter = true;
		}

		let id = mask_id(self.prefix, square);
		let mask = svg_element(
			dom,
			"mask",
			&[("id", id.as_str()), ("maskUnits", "userSpaceOnUse"), ("x", "-0.5"), ("y", "-0.5"), ("width", "8"), ("height", "8")],
		);
		let backdrop = svg_element(dom, "rect", &[("fill", "#fff"), ("x", "-0.5"), ("y", "-0.5"), ("width", "8"), ("height", "8")]);

		// Image coordinates are of its corner, and grid coordinates are of the square centers
		let grid = square.grid(flipped);
		let silhouette = svg_element(
			dom,
			"image",
			&[
				("href", url.as_str()),
				("width", "1"),
				("height", "1"),
				("filter", format!("url(#{})", silhouette_filter_id(self.prefix)).as_str()),
				("x", (grid.x as f64 - 0.5).to_string().as_str()),
				("y", (grid.y as f64 - 0.5).to_string().as_str()),
			],
		);

		dom.append_child(&mask, &backdrop);
		dom.append_child(&mask, &silhouette);
		dom.append_child(&self.defs, &mask);
		Some(id)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::memory_dom::MemoryDom;

	fn board_with_piece(dom: &MemoryDom, style: &str) -> crate::memory_dom::MemoryNode {
		let board = dom.create_element(BOARD_TAG, Namespace::Html);
		dom.set_width(&board, 512.);
		let piece = dom.create_element(PIECE_TAG, Namespace::Html);
		dom.set_attribute(&piece, "class", "white pawn");
		dom.set_attribute(&piece, "style", style);
		dom.set_computed_style(&piece, "background-image", r#"url("https://example.org/piece/wP.svg")"#);
		dom.append_child(&dom.root(), &board);
		dom.append_child(&board, &piece);
		board
	}

	fn square(label: &str) -> Square {
		Square::parse(label).unwrap()
	}

	#[test]
	fn image_urls() {
		assert_eq!(image_url(r#"url("a.svg")"#), Some("a.svg"));
		assert_eq!(image_url("url('b.svg')"), Some("b.svg"));
		assert_eq!(image_url("none"), None);
	}

	#[test]
	fn finds_the_piece_by_its_transform() {
		let dom = MemoryDom::new();
		let board = board_with_piece(&dom, "transform: translate(256px, 256px);");

		assert_eq!(resolve_piece_image(&dom, square("e4"), false, &board).as_deref(), Some("https://example.org/piece/wP.svg"));
		assert_eq!(resolve_piece_image(&dom, square("d5"), true, &board).as_deref(), Some("https://example.org/piece/wP.svg"));
		assert_eq!(resolve_piece_image(&dom, square("e4"), true, &board), None);
		assert_eq!(resolve_piece_image(&dom, square("e5"), false, &board), None);
	}

	#[test]
	fn finds_pieces_on_the_top_row() {
		let dom = MemoryDom::new();
		let board = board_with_piece(&dom, "transform: translate(192px);");
		assert!(resolve_piece_image(&dom, square("d8"), false, &board).is_some());
	}

	#[test]
	fn defs_hold_one_marker_per_palette_index() {
		let dom = MemoryDom::new();
		let state = ColorState::default();
		let builder = DefsBuilder::build_defs(&dom, &state, "board3_");

		let markers = dom.elements_by_tag_name(builder.defs(), "marker");
		let ids: Vec<_> = markers.iter().filter_map(|marker| dom.attribute(marker, "id")).collect();
		assert_eq!(ids, ["board3_arrowhead0", "board3_arrowhead1", "board3_arrowhead2", "board3_arrowhead3", "board3_arrowhead4"]);

		let paths = dom.elements_by_tag_name(builder.defs(), "path");
		let red = PaletteIndex::slot(2).unwrap();
		assert_eq!(dom.attribute(&paths[2], "fill").as_deref(), Some(state.color(ShapeKind::Arrow, red)));
		assert_eq!(dom.attribute(&paths[2], PALETTE_INDEX_ATTRIBUTE).as_deref(), Some("2"));
	}

	#[test]
	fn masks_are_built_once_per_occupied_square() {
		let dom = MemoryDom::new();
		let state = ColorState::default();
		let board = board_with_piece(&dom, "transform: translate(256px, 256px);");
		let mut builder = DefsBuilder::build_defs(&dom, &state, "board0_");

		assert_eq!(builder.build_mask(square("e4"), false, &board).as_deref(), Some("board0_e4"));
		assert_eq!(builder.build_mask(square("e4"), false, &board).as_deref(), Some("board0_e4"));
		assert_eq!(builder.build_mask(square("a1"), false, &board), None);

		assert_eq!(dom.elements_by_tag_name(builder.defs(), "mask").len(), 1);
		assert_eq!(dom.elements_by_tag_name(builder.defs(), "filter").len(), 1);

		let image = &dom.elements_by_tag_name(builder.defs(), "image")[0];
		assert_eq!(dom.attribute(image, "x").as_deref(), Some("3.5"));
		assert_eq!(dom.attribute(image, "y").as_deref(), Some("3.5"));
		assert_eq!(dom.attribute(image, "filter").as_deref(), Some("url(#board0_toBlack)"));
		assert_eq!(dom.attribute(image, "href").as_deref(), Some("https://example.org/piece/wP.svg"));
	}

	#[test]
	fn empty_board_needs_no_filter() {
		let dom = MemoryDom::new();
		let state = ColorState::default();
		let board = dom.create_element(BOARD_TAG, Namespace::Html);
		let mut builder = DefsBuilder::build_defs(&dom, &state, "board0_");

		assert_eq!(builder.build_mask(square("e4"), false, &board), None);
		assert!(dom.elements_by_tag_name(builder.defs(), "filter").is_empty());
	}
}
