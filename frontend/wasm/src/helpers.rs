use crate::OVERLAY_HAS_CRASHED;

use std::panic;
use std::sync::atomic::Ordering;
use wasm_bindgen::prelude::*;

/// When a panic occurs, stop handling page changes and log the error to the JS console
pub fn panic_hook(info: &panic::PanicHookInfo) {
	OVERLAY_HAS_CRASHED.store(true, Ordering::SeqCst);

	log::error!("The board overlay crashed and stopped updating. Reload the page to restore it.\n{info}");
}

/// Logging to the JS console
#[wasm_bindgen]
extern "C" {
	#[wasm_bindgen(js_namespace = console)]
	fn log(msg: &str, format: &str);
	#[wasm_bindgen(js_namespace = console)]
	fn info(msg: &str, format: &str);
	#[wasm_bindgen(js_namespace = console)]
	fn warn(msg: &str, format: &str);
	#[wasm_bindgen(js_namespace = console)]
	fn error(msg: &str, format: &str);
}

#[derive(Default)]
pub struct WasmLog;

impl log::Log for WasmLog {
	fn enabled(&self, metadata: &log::Metadata) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &log::Record) {
		if !self.enabled(record.metadata()) {
			return;
		}

		let (log, name, color): (fn(&str, &str), &str, &str) = match record.level() {
			log::Level::Trace => (log, "trace", "color:plum"),
			log::Level::Debug => (log, "debug", "color:cyan"),
			log::Level::Warn => (warn, "warn", "color:goldenrod"),
			log::Level::Info => (info, "info", "color:mediumseagreen"),
			log::Level::Error => (error, "error", "color:red"),
		};
		let msg = &format!("%c[fancyground] {name}\t{}", record.args());
		log(msg, color)
	}

	fn flush(&self) {}
}
