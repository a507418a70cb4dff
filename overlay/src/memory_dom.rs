//! A self-contained [`Dom`] kept entirely in memory.
//!
//! It stands in for the browser when running headless and in tests: structural changes under an observed
//! subtree queue that observer's notification, and [`MemoryDom::take_notifications`] hands them out in order.

use crate::dom::{Dom, Namespace, Observer};
use crate::watcher::WatcherMessage;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt::{self, Write};
use std::rc::{Rc, Weak};

#[derive(Debug, Default)]
struct NodeData {
	tag: String,
	attributes: Vec<(String, String)>,
	/// Inline style properties, in the order they were first set
	style: Vec<(String, String)>,
	/// Style properties coming from stylesheets rather than the inline style
	computed: Vec<(String, String)>,
	width: f64,
	children: Vec<MemoryNode>,
	parent: Weak<RefCell<NodeData>>,
}

/// Handle to an element of a [`MemoryDom`]. Handles compare equal when they refer to the same element.
#[derive(Clone)]
pub struct MemoryNode(Rc<RefCell<NodeData>>);

impl PartialEq for MemoryNode {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for MemoryNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let data = self.0.borrow();
		write!(f, "<{}", data.tag)?;
		if let Some((_, class)) = data.attributes.iter().find(|(name, _)| name == "class") {
			write!(f, " class={class:?}")?;
		}
		write!(f, "> ({} children)", data.children.len())
	}
}

impl MemoryNode {
	fn parent(&self) -> Option<MemoryNode> {
		self.0.borrow().parent.upgrade().map(MemoryNode)
	}

	/// This node followed by each of its ancestors.
	fn ancestors(&self) -> impl Iterator<Item = MemoryNode> {
		std::iter::successors(Some(self.clone()), MemoryNode::parent)
	}

	fn has_class(&self, class: &str) -> bool {
		let data = self.0.borrow();
		data.attributes
			.iter()
			.find(|(name, _)| name == "class")
			.is_some_and(|(_, classes)| classes.split_whitespace().any(|candidate| candidate == class))
	}

	fn descendants(&self, matches: &impl Fn(&MemoryNode) -> bool, found: &mut Vec<MemoryNode>) {
		for child in self.0.borrow().children.iter() {
			if matches(child) {
				found.push(child.clone());
			}
			child.descendants(matches, found);
		}
	}

	fn style_attribute(&self) -> Option<String> {
		let data = self.0.borrow();
		if data.style.is_empty() {
			return None;
		}
		Some(data.style.iter().map(|(property, value)| format!("{property}: {value};")).collect::<Vec<_>>().join(" "))
	}
}

struct Subscription {
	target: MemoryNode,
	notification: WatcherMessage,
	active: Rc<Cell<bool>>,
}

/// Subscription handle returned by [`MemoryDom::observe`].
#[derive(Debug)]
pub struct MemoryObserver {
	active: Rc<Cell<bool>>,
}

impl Observer for MemoryObserver {
	fn disconnect(&mut self) {
		self.active.set(false);
	}
}

pub struct MemoryDom {
	root: MemoryNode,
	subscriptions: RefCell<Vec<Subscription>>,
	/// Notifications waiting for delivery. One observer has at most one pending entry, like a batch of change records.
	pending: RefCell<VecDeque<WatcherMessage>>,
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDom {
	pub fn new() -> Self {
		let root = MemoryNode(Rc::new(RefCell::new(NodeData {
			tag: "body".to_string(),
			..Default::default()
		})));
		Self {
			root,
			subscriptions: RefCell::default(),
			pending: RefCell::default(),
		}
	}

	/// Hands out every pending notification, oldest first.
	pub fn take_notifications(&self) -> Vec<WatcherMessage> {
		self.pending.borrow_mut().drain(..).collect()
	}

	/// Detaches `node` from its parent.
	pub fn remove(&self, node: &MemoryNode) {
		let Some(parent) = node.parent() else { return };
		parent.0.borrow_mut().children.retain(|child| child != node);
		node.0.borrow_mut().parent = Weak::new();
		self.notify_structural_change(&parent);
	}

	pub fn set_width(&self, node: &MemoryNode, width: f64) {
		node.0.borrow_mut().width = width;
	}

	/// Sets a style value as if a stylesheet rule applied it.
	pub fn set_computed_style(&self, node: &MemoryNode, property: &str, value: &str) {
		let mut data = node.0.borrow_mut();
		upsert(&mut data.computed, property, value);
	}

	/// The inline style value of `property`.
	pub fn style(&self, node: &MemoryNode, property: &str) -> Option<String> {
		node.0.borrow().style.iter().find(|(name, _)| name == property).map(|(_, value)| value.clone())
	}

	pub fn children(&self, node: &MemoryNode) -> Vec<MemoryNode> {
		node.0.borrow().children.clone()
	}

	pub fn tag_name(&self, node: &MemoryNode) -> String {
		node.0.borrow().tag.clone()
	}

	/// Serializes `node` and its subtree.
	pub fn markup(&self, node: &MemoryNode) -> String {
		let mut markup = String::new();
		write_markup(node, &mut markup);
		markup
	}

	fn notify_structural_change(&self, changed: &MemoryNode) {
		let subscriptions = self.subscriptions.borrow();
		let mut pending = self.pending.borrow_mut();
		for subscription in subscriptions.iter().filter(|subscription| subscription.active.get()) {
			let observed = changed.ancestors().any(|node| node == subscription.target);
			if observed && !pending.contains(&subscription.notification) {
				pending.push_back(subscription.notification);
			}
		}
	}

	fn attach(&self, parent: &MemoryNode, child: &MemoryNode) {
		if let Some(previous) = child.parent() {
			previous.0.borrow_mut().children.retain(|node| node != child);
		}
		child.0.borrow_mut().parent = Rc::downgrade(&parent.0);
	}
}

fn upsert(entries: &mut Vec<(String, String)>, key: &str, value: &str) {
	match entries.iter_mut().find(|(name, _)| name == key) {
		Some((_, existing)) => *existing = value.to_string(),
		None => entries.push((key.to_string(), value.to_string())),
	}
}

fn escape_attribute(value: &str) -> String {
	value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

fn write_markup(node: &MemoryNode, markup: &mut String) {
	let data = node.0.borrow();
	markup.push('<');
	markup.push_str(&data.tag);
	for (name, value) in data.attributes.iter() {
		let _ = write!(markup, r#" {name}="{}""#, escape_attribute(value));
	}
	if let Some(style) = node.style_attribute() {
		let _ = write!(markup, r#" style="{}""#, escape_attribute(&style));
	}

	if data.children.is_empty() {
		markup.push_str("/>");
		return;
	}
	markup.push('>');
	for child in data.children.iter() {
		write_markup(child, markup);
	}
	let _ = write!(markup, "</{}>", data.tag);
}

impl Dom for MemoryDom {
	type Node = MemoryNode;
	type Observer = MemoryObserver;

	fn root(&self) -> MemoryNode {
		self.root.clone()
	}

	fn elements_by_tag_name(&self, root: &MemoryNode, tag: &str) -> Vec<MemoryNode> {
		let mut found = Vec::new();
		root.descendants(&|node: &MemoryNode| node.0.borrow().tag.eq_ignore_ascii_case(tag), &mut found);
		found
	}

	fn elements_by_class_name(&self, root: &MemoryNode, class: &str) -> Vec<MemoryNode> {
		let mut found = Vec::new();
		root.descendants(&|node: &MemoryNode| node.has_class(class), &mut found);
		found
	}

	fn has_ancestor_with_class(&self, node: &MemoryNode, class: &str) -> bool {
		node.ancestors().any(|ancestor| ancestor.has_class(class))
	}

	fn is_connected(&self, node: &MemoryNode) -> bool {
		node.ancestors().any(|ancestor| ancestor == self.root)
	}

	fn width(&self, node: &MemoryNode) -> f64 {
		node.0.borrow().width
	}

	fn attribute(&self, node: &MemoryNode, name: &str) -> Option<String> {
		if name == "style" {
			return node.style_attribute();
		}
		node.0.borrow().attributes.iter().find(|(attribute, _)| attribute == name).map(|(_, value)| value.clone())
	}

	fn set_attribute(&self, node: &MemoryNode, name: &str, value: &str) {
		let mut data = node.0.borrow_mut();
		if name == "style" {
			data.style = value
				.split(';')
				.filter_map(|declaration| declaration.split_once(':'))
				.map(|(property, value)| (property.trim().to_string(), value.trim().to_string()))
				.collect();
			return;
		}
		upsert(&mut data.attributes, name, value);
	}

	fn set_style(&self, node: &MemoryNode, property: &str, value: &str) {
		let mut data = node.0.borrow_mut();
		upsert(&mut data.style, property, value);
	}

	fn computed_style(&self, node: &MemoryNode, property: &str) -> Option<String> {
		let data = node.0.borrow();
		let inline = data.style.iter().find(|(name, _)| name == property);
		let computed = data.computed.iter().find(|(name, _)| name == property);
		inline.or(computed).map(|(_, value)| value.clone())
	}

	fn create_element(&self, tag: &str, _namespace: Namespace) -> MemoryNode {
		MemoryNode(Rc::new(RefCell::new(NodeData {
			tag: tag.to_string(),
			..Default::default()
		})))
	}

	fn append_child(&self, parent: &MemoryNode, child: &MemoryNode) {
		self.attach(parent, child);
		parent.0.borrow_mut().children.push(child.clone());
		self.notify_structural_change(parent);
	}

	fn prepend_child(&self, parent: &MemoryNode, child: &MemoryNode) {
		self.attach(parent, child);
		parent.0.borrow_mut().children.insert(0, child.clone());
		self.notify_structural_change(parent);
	}

	fn clear_children(&self, node: &MemoryNode) {
		let children = std::mem::take(&mut node.0.borrow_mut().children);
		if children.is_empty() {
			return;
		}
		for child in children {
			child.0.borrow_mut().parent = Weak::new();
		}
		self.notify_structural_change(node);
	}

	fn observe(&self, target: &MemoryNode, notification: WatcherMessage) -> MemoryObserver {
		let active = Rc::new(Cell::new(true));
		self.subscriptions.borrow_mut().push(Subscription {
			target: target.clone(),
			notification,
			active: active.clone(),
		});
		MemoryObserver { active }
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::watcher::BoardId;

	#[test]
	fn queries_find_descendants_in_document_order() {
		let dom = MemoryDom::new();
		let root = dom.root();
		let outer = dom.create_element("div", Namespace::Html);
		let inner = dom.create_element("piece", Namespace::Html);
		let sibling = dom.create_element("piece", Namespace::Html);
		dom.set_attribute(&outer, "class", "cg-wrap orientation-black");
		dom.append_child(&root, &outer);
		dom.append_child(&outer, &inner);
		dom.append_child(&root, &sibling);

		assert_eq!(dom.elements_by_tag_name(&root, "piece"), vec![inner.clone(), sibling.clone()]);
		assert_eq!(dom.elements_by_class_name(&root, "orientation-black"), vec![outer.clone()]);
		assert!(dom.elements_by_class_name(&outer, "orientation-black").is_empty());
		assert!(dom.has_ancestor_with_class(&inner, "orientation-black"));
		assert!(!dom.has_ancestor_with_class(&sibling, "orientation-black"));
	}

	#[test]
	fn style_attribute_mirrors_inline_style() {
		let dom = MemoryDom::new();
		let piece = dom.create_element("piece", Namespace::Html);
		dom.set_attribute(&piece, "style", "transform: translate(64px, 128px);");
		assert_eq!(dom.attribute(&piece, "style").as_deref(), Some("transform: translate(64px, 128px);"));
		assert_eq!(dom.style(&piece, "transform").as_deref(), Some("translate(64px, 128px)"));

		dom.set_computed_style(&piece, "background-image", r#"url("wP.svg")"#);
		assert_eq!(dom.computed_style(&piece, "background-image").as_deref(), Some(r#"url("wP.svg")"#));
		assert_eq!(dom.attribute(&piece, "style").as_deref(), Some("transform: translate(64px, 128px);"));
	}

	#[test]
	fn connectivity_follows_removal() {
		let dom = MemoryDom::new();
		let container = dom.create_element("cg-container", Namespace::Html);
		let board = dom.create_element("cg-board", Namespace::Html);
		dom.append_child(&dom.root(), &container);
		dom.append_child(&container, &board);
		assert!(dom.is_connected(&board));

		dom.remove(&container);
		assert!(!dom.is_connected(&board));
		assert!(!dom.is_connected(&container));
	}

	#[test]
	fn observers_receive_batched_notifications_until_disconnected() {
		let dom = MemoryDom::new();
		let shapes = dom.create_element("g", Namespace::Svg);
		dom.append_child(&dom.root(), &shapes);
		let notification = WatcherMessage::ShapesChanged { board: BoardId(7) };
		let mut observer = dom.observe(&shapes, notification);

		let circle = dom.create_element("circle", Namespace::Svg);
		dom.append_child(&shapes, &circle);
		dom.clear_children(&shapes);
		assert_eq!(dom.take_notifications(), vec![notification]);
		assert!(dom.take_notifications().is_empty());

		observer.disconnect();
		dom.append_child(&shapes, &circle);
		assert!(dom.take_notifications().is_empty());
	}

	#[test]
	fn markup_serializes_the_subtree() {
		let dom = MemoryDom::new();
		let svg = dom.create_element("svg", Namespace::Svg);
		let line = dom.create_element("line", Namespace::Svg);
		dom.set_attribute(&svg, "viewBox", "-0.5 -0.5 8 8");
		dom.set_style(&svg, "opacity", "0.5");
		dom.set_attribute(&line, "marker-end", "url(#board0_arrowhead1)");
		dom.append_child(&svg, &line);

		assert_eq!(
			dom.markup(&svg),
			r#"<svg viewBox="-0.5 -0.5 8 8" style="opacity: 0.5;"><line marker-end="url(#board0_arrowhead1)"/></svg>"#
		);
	}
}
