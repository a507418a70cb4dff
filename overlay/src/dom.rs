use crate::watcher::WatcherMessage;

use std::fmt::Debug;

/// Namespace an element is created in. Overlay arrows are SVG, highlights are HTML.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
	Html,
	Svg,
}

impl Namespace {
	pub fn uri(self) -> Option<&'static str> {
		match self {
			Namespace::Html => None,
			Namespace::Svg => Some("http://www.w3.org/2000/svg"),
		}
	}
}

/// A subscription to structural changes of a subtree, made with [`Dom::observe`].
pub trait Observer {
	/// Stops delivery permanently. No notification from this subscription arrives afterwards.
	fn disconnect(&mut self);
}

/// The page markup, as far as the overlay needs to read and write it.
///
/// Queries return elements in document order and never include the element they start from.
/// All calls are synchronous and complete before returning.
pub trait Dom {
	type Node: Clone + PartialEq + Debug;
	type Observer: Observer;

	/// The element every board of the page lives under.
	fn root(&self) -> Self::Node;

	fn elements_by_tag_name(&self, root: &Self::Node, tag: &str) -> Vec<Self::Node>;

	fn elements_by_class_name(&self, root: &Self::Node, class: &str) -> Vec<Self::Node>;

	/// Whether `node` or any of its ancestors has `class`.
	fn has_ancestor_with_class(&self, node: &Self::Node, class: &str) -> bool;

	/// Whether `node` is still part of the page.
	fn is_connected(&self, node: &Self::Node) -> bool;

	/// Rendered width in pixels.
	fn width(&self, node: &Self::Node) -> f64;

	fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

	/// Sets one inline style property.
	fn set_style(&self, node: &Self::Node, property: &str, value: &str);

	/// The value of a style property after stylesheets are applied.
	fn computed_style(&self, node: &Self::Node, property: &str) -> Option<String>;

	fn create_element(&self, tag: &str, namespace: Namespace) -> Self::Node;

	fn append_child(&self, parent: &Self::Node, child: &Self::Node);

	fn prepend_child(&self, parent: &Self::Node, child: &Self::Node);

	fn clear_children(&self, node: &Self::Node);

	/// Delivers `notification` after every batch of structural changes (children added or removed) anywhere under `target`.
	/// Batches of one subtree arrive in the order the changes happened.
	fn observe(&self, target: &Self::Node, notification: WatcherMessage) -> Self::Observer;

	fn first_element_by_class_name(&self, root: &Self::Node, class: &str) -> Option<Self::Node> {
		self.elements_by_class_name(root, class).into_iter().next()
	}

	fn first_element_by_tag_name(&self, root: &Self::Node, tag: &str) -> Option<Self::Node> {
		self.elements_by_tag_name(root, tag).into_iter().next()
	}
}
