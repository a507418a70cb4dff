//! The browser extension APIs the overlay talks to: synced storage and connections from the options page.

use fancyground_overlay::bridge::SyncMessage;
use fancyground_overlay::error::SettingsError;
use fancyground_overlay::settings::{SettingsMap, SettingsStore};

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
	async fn storage_sync_get(keys: JsValue) -> Result<JsValue, JsValue>;

	#[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
	async fn storage_sync_set(items: JsValue) -> Result<JsValue, JsValue>;

	/// A `runtime.Port`, one end of a connection between two parts of the extension
	#[derive(Clone, Debug)]
	pub type Port;

	#[wasm_bindgen(method, getter)]
	pub fn name(this: &Port) -> String;

	#[wasm_bindgen(method, getter, js_name = onMessage)]
	fn on_message(this: &Port) -> Event;

	#[wasm_bindgen(method, getter, js_name = onDisconnect)]
	fn on_disconnect(this: &Port) -> Event;

	/// An extension API event, such as `runtime.onConnect`
	type Event;

	#[wasm_bindgen(method, js_name = addListener)]
	fn add_listener(this: &Event, callback: &js_sys::Function);

	#[wasm_bindgen(thread_local_v2, js_namespace = ["chrome", "runtime"], js_name = onConnect)]
	static ON_CONNECT: Event;
}

/// Converts to the plain object form the extension APIs take, rather than a JS `Map`.
pub(crate) fn to_js_object<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
	value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

/// Settings kept in `chrome.storage.sync`, shared by every page and the options page.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncStorage;

impl SettingsStore for SyncStorage {
	async fn get(&self, defaults: &SettingsMap) -> Result<SettingsMap, SettingsError> {
		let keys = to_js_object(defaults).map_err(|error| SettingsError::Read(error.to_string()))?;
		let values = storage_sync_get(keys).await.map_err(|error| SettingsError::Read(format!("{error:?}")))?;
		serde_wasm_bindgen::from_value(values).map_err(|error| SettingsError::Decode(error.to_string()))
	}

	async fn set(&self, values: SettingsMap) -> Result<(), SettingsError> {
		let items = to_js_object(&values).map_err(|error| SettingsError::Write(error.to_string()))?;
		storage_sync_set(items).await.map_err(|error| SettingsError::Write(format!("{error:?}")))?;
		Ok(())
	}
}

/// Forwards every message arriving on connections opened to this page, such as live edits from the options page,
/// to `handler`. The listener stays registered for the life of the page.
pub fn listen_for_connections(handler: fn(SyncMessage)) {
	let on_connect = Closure::<dyn FnMut(Port)>::new(move |port: Port| {
		log::debug!("Connection {:?} opened", port.name());

		let on_message = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| match serde_wasm_bindgen::from_value::<SyncMessage>(message) {
			Ok(message) => handler(message),
			Err(error) => log::warn!("Ignoring unrecognized message: {error}"),
		});
		port.on_message().add_listener(on_message.as_ref().unchecked_ref());
		on_message.forget();

		let name = port.name();
		let on_disconnect = Closure::once_into_js(move || log::debug!("Connection {name:?} closed"));
		port.on_disconnect().add_listener(on_disconnect.unchecked_ref());
	});

	ON_CONNECT.with(|event| event.add_listener(on_connect.as_ref().unchecked_ref()));
	on_connect.forget();
}
