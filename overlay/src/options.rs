//! The options page's editing model: which palette color is being edited, the picker selecting it, and the values
//! the page shows. Live edits produce [`SyncMessage`]s for the boards to preview, commits go to the settings store.

use crate::bridge::SyncMessage;
use crate::color::Color;
use crate::error::{ParseError, SettingsError};
use crate::palette::{ColorName, ShapeKind};
use crate::picker::Picker;
use crate::settings::{SettingsMap, SettingsStore, default_settings, load_settings};

#[derive(Clone, Debug)]
pub struct ColorEditor {
	active: ColorName,
	picker: Picker,
	/// Every setting as currently shown on the page, including live edits not committed yet
	values: SettingsMap,
}

impl ColorEditor {
	/// Starts editing the first arrow color, showing `settings`. Keys `settings` lacks show their default.
	pub fn new(settings: &SettingsMap) -> Self {
		let mut values = default_settings();
		values.extend(settings.iter().map(|(key, value)| (key.clone(), value.clone())));

		let mut editor = Self {
			active: ColorName::FIRST,
			picker: Picker::new(),
			values,
		};
		editor.load_picker();
		editor
	}

	pub async fn load<S: SettingsStore>(store: &S) -> Result<Self, SettingsError> {
		Ok(Self::new(&load_settings(store).await?))
	}

	pub fn active(&self) -> ColorName {
		self.active
	}

	pub fn picker(&self) -> &Picker {
		&self.picker
	}

	/// The value of a setting as the page shows it.
	pub fn value(&self, key: &str) -> Option<&str> {
		self.values.get(key).map(String::as_str)
	}

	fn load_picker(&mut self) {
		let Some(stored) = self.values.get(&self.active.to_string()) else { return };
		if let Err(error) = self.picker.set_color_str(stored) {
			log::warn!("Showing the picker's previous color for {}: {error}", self.active);
		}
	}

	/// Makes `name` the color being edited and moves the picker to its value.
	pub fn switch_active_color(&mut self, name: ColorName) {
		self.active = name;
		self.load_picker();
	}

	fn picked(&mut self) -> SyncMessage {
		let color = self.picker.color().to_rgb_string();
		self.values.insert(self.active.to_string(), color.clone());
		SyncMessage::Color { color_name: self.active, color }
	}

	pub fn drag_hue(&mut self, y: f32) -> SyncMessage {
		self.picker.set_hue_fraction(y);
		self.picked()
	}

	pub fn drag_saturation_value(&mut self, x: f32, y: f32) -> SyncMessage {
		self.picker.set_saturation_value_fraction(x, y);
		self.picked()
	}

	/// Takes a color typed into the text field of `name`. It's kept as typed, and rejected unless it's a color.
	pub fn type_color(&mut self, name: ColorName, text: &str) -> Result<SyncMessage, ParseError> {
		Color::parse(text)?;
		let color = text.trim().to_string();
		self.values.insert(name.to_string(), color.clone());
		if name == self.active {
			self.load_picker();
		}
		Ok(SyncMessage::Color { color_name: name, color })
	}

	pub fn set_opacity(&mut self, shape: ShapeKind, opacity: f32) -> SyncMessage {
		let opacity = opacity.clamp(0., 1.).to_string();
		self.values.insert(shape.opacity_key().to_string(), opacity.clone());
		SyncMessage::Opacity { shape, opacity }
	}

	async fn persist<S: SettingsStore>(&self, store: &S, key: &str) -> Result<(), SettingsError> {
		let Some(value) = self.values.get(key) else { return Ok(()) };
		store.set(SettingsMap::from([(key.to_string(), value.clone())])).await
	}

	/// Saves the color being edited, once a drag ends.
	pub async fn commit<S: SettingsStore>(&self, store: &S) -> Result<(), SettingsError> {
		self.persist(store, &self.active.to_string()).await
	}

	pub async fn commit_color<S: SettingsStore>(&self, store: &S, name: ColorName) -> Result<(), SettingsError> {
		self.persist(store, &name.to_string()).await
	}

	pub async fn commit_opacity<S: SettingsStore>(&self, store: &S, shape: ShapeKind) -> Result<(), SettingsError> {
		self.persist(store, shape.opacity_key()).await
	}

	/// Saves every setting as currently shown.
	pub async fn commit_all<S: SettingsStore>(&self, store: &S) -> Result<(), SettingsError> {
		store.set(self.values.clone()).await
	}

	/// Puts every setting back to its default, returning the messages previewing the change. Nothing is saved until
	/// [`ColorEditor::commit_all`].
	pub fn reset_to_defaults(&mut self) -> Vec<SyncMessage> {
		self.values = default_settings();
		self.load_picker();

		let colors = ColorName::all().filter_map(|name| {
			let color = self.values.get(&name.to_string())?.clone();
			Some(SyncMessage::Color { color_name: name, color })
		});
		let opacities = [ShapeKind::Arrow, ShapeKind::Square].into_iter().filter_map(|shape| {
			let opacity = self.values.get(shape.opacity_key())?.clone();
			Some(SyncMessage::Opacity { shape, opacity })
		});
		colors.chain(opacities).collect()
	}
}
