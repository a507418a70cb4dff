//! Browser extension bindings of the fancyground overlay.
//!
//! The content script entry point runs the overlay on the page's document, forwarding page mutations and messages from
//! the options page to a single [`ContentScript`]. The options page gets its color editor from [`options_page`].

extern crate log;

pub mod extension_api;
pub mod helpers;
pub mod options_page;
pub mod web_dom;

use extension_api::SyncStorage;
use fancyground_overlay::content_script::{ContentMessage, ContentScript};
use fancyground_overlay::settings::load_settings;
use helpers::{WasmLog, panic_hook};
use std::cell::RefCell;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_dom::WebDom;

// Set up the persistent overlay backend state
pub static OVERLAY_HAS_CRASHED: AtomicBool = AtomicBool::new(false);
static LOGGER: WasmLog = WasmLog;
thread_local! {
	static CONTENT_SCRIPT: RefCell<Option<ContentScript<WebDom>>> = const { RefCell::new(None) };
}

/// Initialize the backend
#[wasm_bindgen(start)]
pub fn init() {
	// Set up the panic hook
	panic::set_hook(Box::new(panic_hook));

	// Set up the logger with a default level of debug
	if log::set_logger(&LOGGER).is_ok() {
		log::set_max_level(log::LevelFilter::Debug);
	}
}

/// Starts the overlay on the current page and keeps it in sync with the settings.
#[wasm_bindgen(js_name = startContentScript)]
pub fn start_content_script() -> Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window to run the overlay in"))?;
	let dom = WebDom::from_window().ok_or_else(|| JsValue::from_str("The page has no body to watch"))?;

	let mut content_script = ContentScript::new(dom);
	content_script.start();
	CONTENT_SCRIPT.with(|cell| cell.replace(Some(content_script)));

	extension_api::listen_for_connections(|message| dispatch(message));

	spawn_settings_reload();
	// Settings may have been changed on another page while this one was in the background
	let on_focus = Closure::<dyn FnMut()>::new(spawn_settings_reload);
	window.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref())?;
	on_focus.forget();

	Ok(())
}

fn spawn_settings_reload() {
	wasm_bindgen_futures::spawn_local(async {
		let settings = load_settings(&SyncStorage).await;
		if OVERLAY_HAS_CRASHED.load(Ordering::SeqCst) {
			return;
		}

		let applied = CONTENT_SCRIPT.with(|cell| match cell.try_borrow_mut() {
			Ok(mut content_script) => content_script.as_mut().map(|content_script| content_script.apply_settings(settings)).is_some(),
			Err(_) => false,
		});
		if !applied {
			log::warn!("Dropped a settings reload while the overlay was busy");
		}
	});
}

/// Hands a page change or a message from the options page to the overlay.
pub(crate) fn dispatch(message: impl Into<ContentMessage>) {
	// Process no further messages after a crash to avoid spamming the console
	if OVERLAY_HAS_CRASHED.load(Ordering::SeqCst) {
		return;
	}

	let message = message.into();
	CONTENT_SCRIPT.with(|cell| match cell.try_borrow_mut() {
		Ok(mut content_script) => match content_script.as_mut() {
			Some(content_script) => content_script.process_message(message),
			None => log::warn!("Dropped {message:?} before the overlay started"),
		},
		Err(_) => log::error!("Dropped {message:?} sent while the overlay was handling another message"),
	});
}
