use thiserror::Error;

/// Failure to interpret a value coming from settings, messages or the board's markup.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("Not a square of the board: {0:?}")]
	Square(String),

	#[error("Unknown shape kind: {0:?}")]
	ShapeKind(String),

	#[error("Not a palette slot between 1 and {max}: {value:?}")]
	PaletteSlot { value: String, max: usize },

	#[error("Unknown color setting name: {0:?}")]
	ColorName(String),

	#[error("Unsupported color format: {0:?}")]
	Color(String),
}

/// Failure of the external settings store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettingsError {
	#[error("Failed to read settings:\n{0}")]
	Read(String),

	#[error("Failed to write settings:\n{0}")]
	Write(String),

	#[error("Stored settings could not be decoded:\n{0}")]
	Decode(String),
}

impl From<serde_json::Error> for SettingsError {
	fn from(error: serde_json::Error) -> Self {
		SettingsError::Decode(error.to_string())
	}
}
