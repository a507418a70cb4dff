//! The options page's color editor. Every live edit returns the message to broadcast to open boards, and commits
//! persist to synced storage in the background.

use crate::extension_api::{SyncStorage, to_js_object};
use fancyground_overlay::error::SettingsError;
use fancyground_overlay::options::ColorEditor;
use fancyground_overlay::palette::{ColorName, ShapeKind};
use fancyground_overlay::picker::PICKER_SIZE;

use js_sys::Promise;
use serde::Serialize;
use std::future::Future;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{CanvasRenderingContext2d, ImageData};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
	to_js_object(value).map_err(|error| JsValue::from_str(&error.to_string()))
}

fn js_error(error: impl ToString) -> JsValue {
	JsValue::from_str(&error.to_string())
}

/// Runs a save against a snapshot of the editor, so later edits don't wait on storage.
fn save(save: impl Future<Output = Result<(), SettingsError>> + 'static) -> Promise {
	future_to_promise(async move {
		save.await.map_err(|error| {
			log::error!("{error}");
			js_error(error)
		})?;
		Ok(JsValue::UNDEFINED)
	})
}

#[wasm_bindgen]
pub struct OptionsEditor {
	editor: ColorEditor,
}

/// Reads the stored settings and starts editing the first arrow color.
#[wasm_bindgen(js_name = loadOptionsEditor)]
pub async fn load_options_editor() -> Result<OptionsEditor, JsValue> {
	let editor = ColorEditor::load(&SyncStorage).await.map_err(js_error)?;
	Ok(OptionsEditor { editor })
}

#[wasm_bindgen]
impl OptionsEditor {
	#[wasm_bindgen(js_name = activeColor)]
	pub fn active_color(&self) -> String {
		self.editor.active().to_string()
	}

	/// The value of a setting as the page should show it.
	pub fn value(&self, key: &str) -> Option<String> {
		self.editor.value(key).map(str::to_string)
	}

	#[wasm_bindgen(js_name = switchActiveColor)]
	pub fn switch_active_color(&mut self, name: &str) -> Result<(), JsValue> {
		let name = name.parse::<ColorName>().map_err(js_error)?;
		self.editor.switch_active_color(name);
		Ok(())
	}

	#[wasm_bindgen(js_name = dragHue)]
	pub fn drag_hue(&mut self, y: f32) -> Result<JsValue, JsValue> {
		to_js(&self.editor.drag_hue(y))
	}

	#[wasm_bindgen(js_name = dragSaturationValue)]
	pub fn drag_saturation_value(&mut self, x: f32, y: f32) -> Result<JsValue, JsValue> {
		to_js(&self.editor.drag_saturation_value(x, y))
	}

	#[wasm_bindgen(js_name = typeColor)]
	pub fn type_color(&mut self, name: &str, text: &str) -> Result<JsValue, JsValue> {
		let name = name.parse::<ColorName>().map_err(js_error)?;
		let message = self.editor.type_color(name, text).map_err(js_error)?;
		to_js(&message)
	}

	#[wasm_bindgen(js_name = setOpacity)]
	pub fn set_opacity(&mut self, shape: &str, opacity: f32) -> Result<JsValue, JsValue> {
		let shape = ShapeKind::parse(shape).map_err(js_error)?;
		to_js(&self.editor.set_opacity(shape, opacity))
	}

	/// Messages previewing the defaults on every open board. They're saved by [`OptionsEditor::commit_all`].
	#[wasm_bindgen(js_name = resetToDefaults)]
	pub fn reset_to_defaults(&mut self) -> Result<JsValue, JsValue> {
		to_js(&self.editor.reset_to_defaults())
	}

	pub fn commit(&self) -> Promise {
		let editor = self.editor.clone();
		save(async move { editor.commit(&SyncStorage).await })
	}

	#[wasm_bindgen(js_name = commitColor)]
	pub fn commit_color(&self, name: &str) -> Result<Promise, JsValue> {
		let name = name.parse::<ColorName>().map_err(js_error)?;
		let editor = self.editor.clone();
		Ok(save(async move { editor.commit_color(&SyncStorage, name).await }))
	}

	#[wasm_bindgen(js_name = commitOpacity)]
	pub fn commit_opacity(&self, shape: &str) -> Result<Promise, JsValue> {
		let shape = ShapeKind::parse(shape).map_err(js_error)?;
		let editor = self.editor.clone();
		Ok(save(async move { editor.commit_opacity(&SyncStorage, shape).await }))
	}

	#[wasm_bindgen(js_name = commitAll)]
	pub fn commit_all(&self) -> Promise {
		let editor = self.editor.clone();
		save(async move { editor.commit_all(&SyncStorage).await })
	}

	/// Thumb positions and colors for the current selection.
	pub fn layout(&self) -> Result<JsValue, JsValue> {
		to_js(&self.editor.picker().layout())
	}

	/// Paints the saturation/value square of the current hue at the canvas origin.
	#[wasm_bindgen(js_name = drawSlice)]
	pub fn draw_slice(&self, context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
		let pixels = self.editor.picker().render_slice();
		let size = PICKER_SIZE as u32;
		let image = ImageData::new_with_u8_clamped_array_and_sh(wasm_bindgen::Clamped(&pixels[..]), size, size)?;
		context.put_image_data(&image, 0., 0.)
	}
}
