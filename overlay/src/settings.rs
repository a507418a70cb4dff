use crate::consts::{DEFAULT_ARROW_COLORS, DEFAULT_ARROW_OPACITY, DEFAULT_SQUARE_COLORS, DEFAULT_SQUARE_OPACITY};
use crate::error::SettingsError;
use crate::palette::{ColorName, ShapeKind};

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Persisted settings, keyed by color name (`arrow_color_1`) or shape kind (`arrow`, holding its opacity).
pub type SettingsMap = BTreeMap<String, String>;

/// Every setting with its built-in default value.
pub fn default_settings() -> SettingsMap {
	let colors = ColorName::all().map(|name| {
		let defaults = match name.shape {
			ShapeKind::Arrow => DEFAULT_ARROW_COLORS,
			ShapeKind::Square => DEFAULT_SQUARE_COLORS,
		};
		let offset = name.slot().number() as usize - 1;
		(name.to_string(), defaults[offset].to_string())
	});
	let opacities = [
		(ShapeKind::Arrow.opacity_key().to_string(), DEFAULT_ARROW_OPACITY.to_string()),
		(ShapeKind::Square.opacity_key().to_string(), DEFAULT_SQUARE_OPACITY.to_string()),
	];
	colors.chain(opacities).collect()
}

/// The settings persistence service. Writes are last-writer-wins; a read returns the last written value of each key.
#[allow(async_fn_in_trait)]
pub trait SettingsStore {
	/// Reads the keys of `defaults`, using the given default for every key that was never written.
	async fn get(&self, defaults: &SettingsMap) -> Result<SettingsMap, SettingsError>;

	async fn set(&self, values: SettingsMap) -> Result<(), SettingsError>;
}

/// Pulls every setting from `store`, filling in built-in defaults.
pub async fn load_settings<S: SettingsStore>(store: &S) -> Result<SettingsMap, SettingsError> {
	store.get(&default_settings()).await
}

/// Settings store kept in memory, used headless and in tests.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
	values: RefCell<SettingsMap>,
	failing: Cell<bool>,
}

impl MemorySettingsStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads values previously written by [`MemorySettingsStore::to_json`].
	pub fn from_json(json: &str) -> Result<Self, SettingsError> {
		let values: SettingsMap = serde_json::from_str(json)?;
		Ok(Self {
			values: RefCell::new(values),
			failing: Cell::new(false),
		})
	}

	pub fn to_json(&self) -> Result<String, SettingsError> {
		Ok(serde_json::to_string_pretty(&*self.values.borrow())?)
	}

	/// Makes every following access fail, like an unavailable browser storage area.
	pub fn set_failing(&self, failing: bool) {
		self.failing.set(failing);
	}

	pub fn value(&self, key: &str) -> Option<String> {
		self.values.borrow().get(key).cloned()
	}
}

impl SettingsStore for MemorySettingsStore {
	async fn get(&self, defaults: &SettingsMap) -> Result<SettingsMap, SettingsError> {
		if self.failing.get() {
			return Err(SettingsError::Read("storage area unavailable".to_string()));
		}

		let values = self.values.borrow();
		let settings = defaults
			.iter()
			.map(|(key, default)| (key.clone(), values.get(key).unwrap_or(default).clone()))
			.collect();
		Ok(settings)
	}

	async fn set(&self, values: SettingsMap) -> Result<(), SettingsError> {
		if self.failing.get() {
			return Err(SettingsError::Write("storage area unavailable".to_string()));
		}

		self.values.borrow_mut().extend(values);
		Ok(())
	}
}
