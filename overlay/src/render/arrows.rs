use crate::annotation::line_annotations;
use crate::consts::{ARROW_VIEW_BOX, ARROWS_CLASS, PALETTE_INDEX_ATTRIBUTE};
use crate::dom::{Dom, Namespace};
use crate::geometry::shorten_arrow_tip;
use crate::palette::{PaletteIndex, ShapeKind};
use crate::render::defs::{DefsBuilder, arrowhead_reference};
use crate::render::is_flipped;
use crate::state::ColorState;

use glam::DVec2;

fn arrow_layer<D: Dom>(dom: &D, board: &D::Node) -> Option<D::Node> {
	dom.first_element_by_class_name(board, ARROWS_CLASS)
}

fn create_arrow_layer<D: Dom>(dom: &D, state: &ColorState, board: &D::Node) -> D::Node {
	let svg = dom.create_element("svg", Namespace::Svg);
	dom.set_attribute(&svg, "class", ARROWS_CLASS);
	dom.set_attribute(&svg, "viewBox", ARROW_VIEW_BOX);
	dom.set_style(&svg, "opacity", state.opacity(ShapeKind::Arrow));
	dom.append_child(board, &svg);
	svg
}

/// Rebuilds the arrows of `board` from the lines currently in its shape layer.
///
/// The layer's view box puts the center of every square on whole coordinates, so grid positions are used
/// as they are. Arrows ending on an occupied square are masked so they pass under the piece.
pub fn render_arrows<D: Dom>(dom: &D, state: &ColorState, shapes: &D::Node, board: &D::Node, prefix: &str) {
	let svg = arrow_layer(dom, board).unwrap_or_else(|| create_arrow_layer(dom, state, board));
	dom.clear_children(&svg);

	let flipped = is_flipped(dom, board);
	let mut defs = DefsBuilder::build_defs(dom, state, prefix);
	let mut lines = Vec::new();

	for arrow in line_annotations(dom, shapes) {
		let (tail, tip) = shorten_arrow_tip(arrow.from.grid(flipped).as_dvec2(), arrow.to.grid(flipped).as_dvec2());
		let mask = defs.build_mask(arrow.to, flipped, board);

		let line = dom.create_element("line", Namespace::Svg);
		set_endpoints(dom, &line, tail, tip);
		dom.set_attribute(&line, "stroke", state.color(ShapeKind::Arrow, arrow.index));
		dom.set_attribute(&line, "stroke-width", &arrow.width.to_string());
		dom.set_attribute(&line, "marker-end", &arrowhead_reference(prefix, arrow.index));
		dom.set_attribute(&line, "opacity", &arrow.element_opacity().to_string());
		dom.set_attribute(&line, PALETTE_INDEX_ATTRIBUTE, &arrow.index.tag());
		if let Some(mask) = mask {
			dom.set_attribute(&line, "mask", &format!("url(#{mask})"));
		}
		lines.push(line);
	}

	dom.append_child(&svg, defs.defs());
	for line in &lines {
		dom.append_child(&svg, line);
	}
}

fn set_endpoints<D: Dom>(dom: &D, line: &D::Node, tail: DVec2, tip: DVec2) {
	dom.set_attribute(line, "x1", &tail.x.to_string());
	dom.set_attribute(line, "y1", &tail.y.to_string());
	dom.set_attribute(line, "x2", &tip.x.to_string());
	dom.set_attribute(line, "y2", &tip.y.to_string());
}

/// Elements of the arrow layer painted with a palette color: the lines with their `stroke`, the arrowheads with their `fill`.
fn painted_elements<D: Dom>(dom: &D, board: &D::Node) -> Vec<(D::Node, &'static str)> {
	let Some(svg) = arrow_layer(dom, board) else { return Vec::new() };
	let lines = dom.elements_by_tag_name(&svg, "line").into_iter().map(|line| (line, "stroke"));
	let heads = dom.elements_by_tag_name(&svg, "path").into_iter().map(|path| (path, "fill"));
	lines.chain(heads).collect()
}

/// Repaints the arrows and arrowheads tagged with `index` in `color`.
pub fn patch_color<D: Dom>(dom: &D, board: &D::Node, index: PaletteIndex, color: &str) {
	let tag = index.tag();
	for (element, property) in painted_elements(dom, board) {
		if dom.attribute(&element, PALETTE_INDEX_ATTRIBUTE).as_deref() == Some(tag.as_str()) {
			dom.set_attribute(&element, property, color);
		}
	}
}

/// Repaints every arrow and arrowhead from the current state.
pub fn patch_all_colors<D: Dom>(dom: &D, state: &ColorState, board: &D::Node) {
	for (element, property) in painted_elements(dom, board) {
		if let Some(index) = dom.attribute(&element, PALETTE_INDEX_ATTRIBUTE).as_deref().and_then(PaletteIndex::from_tag) {
			dom.set_attribute(&element, property, state.color(ShapeKind::Arrow, index));
		}
	}
}

pub fn patch_opacity<D: Dom>(dom: &D, state: &ColorState, board: &D::Node) {
	if let Some(svg) = arrow_layer(dom, board) {
		dom.set_style(&svg, "opacity", state.opacity(ShapeKind::Arrow));
	}
}
