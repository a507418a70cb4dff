//! The page's own document, seen through the overlay's [`Dom`] trait.

use fancyground_overlay::dom::{Dom, Namespace, Observer};
use fancyground_overlay::watcher::WatcherMessage;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlCollection, HtmlElement, MutationObserver, MutationObserverInit, SvgElement};

type MutationCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

pub struct WebDom {
	document: Document,
	root: Element,
}

impl WebDom {
	/// The document of the current window, rooted at its body. `None` outside a page with a body.
	pub fn from_window() -> Option<Self> {
		let document = web_sys::window()?.document()?;
		let root = document.body()?.into();
		Some(Self { document, root })
	}
}

fn collect(collection: HtmlCollection) -> Vec<Element> {
	(0..collection.length()).filter_map(|index| collection.item(index)).collect()
}

fn inline_style(node: &Element) -> Option<CssStyleDeclaration> {
	if let Some(element) = node.dyn_ref::<HtmlElement>() {
		return Some(element.style());
	}
	node.dyn_ref::<SvgElement>().map(SvgElement::style)
}

fn log_failure(operation: &str, result: Result<impl Sized, JsValue>) {
	if let Err(error) = result {
		log::warn!("Failed to {operation}: {error:?}");
	}
}

/// A `MutationObserver` together with the callback it calls, which has to live as long as the observer.
pub struct WebObserver {
	observer: Option<MutationObserver>,
	_callback: Option<MutationCallback>,
}

impl Observer for WebObserver {
	fn disconnect(&mut self) {
		if let Some(observer) = self.observer.take() {
			observer.disconnect();
		}
	}
}

impl Dom for WebDom {
	type Node = Element;
	type Observer = WebObserver;

	fn root(&self) -> Element {
		self.root.clone()
	}

	fn elements_by_tag_name(&self, root: &Element, tag: &str) -> Vec<Element> {
		collect(root.get_elements_by_tag_name(tag))
	}

	fn elements_by_class_name(&self, root: &Element, class: &str) -> Vec<Element> {
		collect(root.get_elements_by_class_name(class))
	}

	fn has_ancestor_with_class(&self, node: &Element, class: &str) -> bool {
		node.closest(&format!(".{class}")).ok().flatten().is_some()
	}

	fn is_connected(&self, node: &Element) -> bool {
		node.is_connected() && self.root.contains(Some(node.as_ref()))
	}

	fn width(&self, node: &Element) -> f64 {
		node.get_bounding_client_rect().width()
	}

	fn attribute(&self, node: &Element, name: &str) -> Option<String> {
		node.get_attribute(name)
	}

	fn set_attribute(&self, node: &Element, name: &str, value: &str) {
		log_failure("set an attribute", node.set_attribute(name, value));
	}

	fn set_style(&self, node: &Element, property: &str, value: &str) {
		match inline_style(node) {
			Some(style) => log_failure("set a style", style.set_property(property, value)),
			None => log::warn!("Element {} has no inline style", node.tag_name()),
		}
	}

	fn computed_style(&self, node: &Element, property: &str) -> Option<String> {
		let style = web_sys::window()?.get_computed_style(node).ok()??;
		style.get_property_value(property).ok().filter(|value| !value.is_empty())
	}

	fn create_element(&self, tag: &str, namespace: Namespace) -> Element {
		// Only the overlay's own constant tag names are created here, which are always valid
		match namespace.uri() {
			Some(uri) => self.document.create_element_ns(Some(uri), tag),
			None => self.document.create_element(tag),
		}
		.expect("Failed to create overlay element")
	}

	fn append_child(&self, parent: &Element, child: &Element) {
		log_failure("append an element", parent.append_child(child));
	}

	fn prepend_child(&self, parent: &Element, child: &Element) {
		log_failure("prepend an element", parent.prepend_with_node_1(child));
	}

	fn clear_children(&self, node: &Element) {
		while let Some(child) = node.first_child() {
			if node.remove_child(&child).is_err() {
				log::warn!("Failed to clear the children of {}", node.tag_name());
				return;
			}
		}
	}

	fn observe(&self, target: &Element, notification: WatcherMessage) -> WebObserver {
		let callback: MutationCallback = Closure::new(move |_records: js_sys::Array, _observer: MutationObserver| crate::dispatch(notification));

		let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
			Ok(observer) => observer,
			Err(error) => {
				log::error!("Failed to observe page changes: {error:?}");
				return WebObserver { observer: None, _callback: None };
			}
		};

		let options = MutationObserverInit::new();
		options.set_child_list(true);
		options.set_subtree(true);
		if let Err(error) = observer.observe_with_options(target, &options) {
			log::error!("Failed to observe page changes: {error:?}");
			return WebObserver { observer: None, _callback: None };
		}

		WebObserver {
			observer: Some(observer),
			_callback: Some(callback),
		}
	}
}
