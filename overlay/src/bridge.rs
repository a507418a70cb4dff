//! Applying color and opacity changes made on the options page to the boards already drawn.

use crate::dom::Dom;
use crate::palette::{ColorName, ShapeKind};
use crate::render::{arrows, highlights};
use crate::settings::SettingsMap;
use crate::state::ColorState;
use crate::watcher::BoardInstance;

use serde::{Deserialize, Serialize};

/// A live edit sent by the options page, tagged by the `property` it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "property", rename_all = "lowercase")]
pub enum SyncMessage {
	Color {
		#[serde(rename = "colorName")]
		color_name: ColorName,
		color: String,
	},
	Opacity {
		shape: ShapeKind,
		opacity: String,
	},
}

/// Stores the change carried by `message`, then repaints the affected elements of every board in place.
pub fn apply_sync_message<D: Dom>(dom: &D, state: &mut ColorState, boards: &[BoardInstance<D>], message: SyncMessage) {
	match message {
		SyncMessage::Color { color_name, color } => {
			let (shape, index) = (color_name.shape, color_name.slot());
			state.set_color(shape, index, color);

			let color = state.color(shape, index);
			for instance in boards {
				match shape {
					ShapeKind::Square => highlights::patch_color(dom, &instance.board, index, color),
					ShapeKind::Arrow => arrows::patch_color(dom, &instance.board, index, color),
				}
			}
		}
		SyncMessage::Opacity { shape, opacity } => {
			state.set_opacity(shape, opacity);

			for instance in boards {
				match shape {
					ShapeKind::Square => highlights::patch_opacity(dom, state, &instance.board),
					ShapeKind::Arrow => arrows::patch_opacity(dom, state, &instance.board),
				}
			}
		}
	}
}

/// Replaces the whole state with freshly loaded `settings` and repaints every board to match.
pub fn refresh<D: Dom>(dom: &D, state: &mut ColorState, boards: &[BoardInstance<D>], settings: &SettingsMap) {
	state.init(settings);

	for instance in boards {
		highlights::patch_all_colors(dom, state, &instance.board);
		highlights::patch_opacity(dom, state, &instance.board);
		arrows::patch_all_colors(dom, state, &instance.board);
		arrows::patch_opacity(dom, state, &instance.board);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::palette::PaletteIndex;

	#[test]
	fn messages_use_the_options_page_format() {
		let color: SyncMessage = serde_json::from_str(r##"{"property":"color","colorName":"arrow_color_2","color":"#123456"}"##).unwrap();
		assert_eq!(
			color,
			SyncMessage::Color {
				color_name: ColorName::new(ShapeKind::Arrow, PaletteIndex::slot(2).unwrap()).unwrap(),
				color: "#123456".to_string(),
			}
		);

		let opacity = SyncMessage::Opacity {
			shape: ShapeKind::Square,
			opacity: "0.5".to_string(),
		};
		assert_eq!(serde_json::to_string(&opacity).unwrap(), r#"{"property":"opacity","shape":"square","opacity":"0.5"}"#);
	}

	#[test]
	fn rejects_unknown_color_names() {
		let result = serde_json::from_str::<SyncMessage>(r##"{"property":"color","colorName":"arrow_color_9","color":"#123456"}"##);
		assert!(result.is_err());

		let result = serde_json::from_str::<SyncMessage>(r#"{"property":"width","shape":"arrow"}"#);
		assert!(result.is_err());
	}
}
