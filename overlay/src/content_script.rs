use crate::bridge::{self, SyncMessage};
use crate::dom::Dom;
use crate::error::SettingsError;
use crate::memory_dom::MemoryDom;
use crate::settings::{SettingsMap, SettingsStore, load_settings};
use crate::state::ColorState;
use crate::watcher::{BoardId, BoardWatcher, WatcherMessage, WatcherMessageContext};

/// Everything the page side of the extension reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentMessage {
	Watcher(WatcherMessage),
	Sync(SyncMessage),
}

impl From<WatcherMessage> for ContentMessage {
	fn from(message: WatcherMessage) -> Self {
		ContentMessage::Watcher(message)
	}
}

impl From<SyncMessage> for ContentMessage {
	fn from(message: SyncMessage) -> Self {
		ContentMessage::Sync(message)
	}
}

/// The overlay of one page: owns the page markup, the color state and the boards found on the page.
pub struct ContentScript<D: Dom> {
	dom: D,
	state: ColorState,
	watcher: BoardWatcher<D>,
}

impl<D: Dom> ContentScript<D> {
	/// Starts out with the built-in defaults until settings are loaded.
	pub fn new(dom: D) -> Self {
		Self {
			dom,
			state: ColorState::default(),
			watcher: BoardWatcher::new(),
		}
	}

	pub fn start(&mut self) {
		self.watcher.start(&self.dom, &self.state);
	}

	pub fn process_message(&mut self, message: impl Into<ContentMessage>) {
		match message.into() {
			ContentMessage::Watcher(message) => {
				let context = WatcherMessageContext { dom: &self.dom, state: &self.state };
				self.watcher.process_message(message, context);
			}
			ContentMessage::Sync(message) => {
				log::trace!("Applying {message:?}");
				bridge::apply_sync_message(&self.dom, &mut self.state, self.watcher.boards(), message);
			}
		}
	}

	/// Takes in the outcome of a settings read. A failed read is logged and leaves the current colors in place.
	pub fn apply_settings(&mut self, settings: Result<SettingsMap, SettingsError>) {
		match settings {
			Ok(settings) => bridge::refresh(&self.dom, &mut self.state, self.watcher.boards(), &settings),
			Err(error) => log::error!("Keeping the current overlay colors: {error}"),
		}
	}

	/// Pulls the settings from `store` and applies them.
	pub async fn reload_settings<S: SettingsStore>(&mut self, store: &S) {
		let settings = load_settings(store).await;
		self.apply_settings(settings);
	}

	/// Ties `listener` to the lifetime of `board`. See [`BoardWatcher::add_release_listener`].
	pub fn add_release_listener(&mut self, board: BoardId, listener: impl FnOnce() + 'static) -> bool {
		self.watcher.add_release_listener(board, listener)
	}

	pub fn dom(&self) -> &D {
		&self.dom
	}

	pub fn state(&self) -> &ColorState {
		&self.state
	}

	pub fn watcher(&self) -> &BoardWatcher<D> {
		&self.watcher
	}
}

impl ContentScript<MemoryDom> {
	/// Delivers queued change notifications until none are left, including those caused by rendering.
	/// Returns how many were processed.
	pub fn deliver_notifications(&mut self) -> usize {
		let mut delivered = 0;
		loop {
			let notifications = self.dom.take_notifications();
			if notifications.is_empty() {
				return delivered;
			}
			delivered += notifications.len();
			for notification in notifications {
				self.process_message(notification);
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::palette::{PaletteIndex, ShapeKind};
	use crate::settings::MemorySettingsStore;

	#[test]
	fn failed_settings_reads_keep_the_state() {
		let mut script = ContentScript::new(MemoryDom::new());
		let store = MemorySettingsStore::new();
		let mut settings = SettingsMap::new();
		settings.insert("square".to_string(), "0.4".to_string());
		futures::executor::block_on(store.set(settings)).unwrap();

		futures::executor::block_on(script.reload_settings(&store));
		assert_eq!(script.state().opacity(ShapeKind::Square), "0.4");

		store.set_failing(true);
		futures::executor::block_on(script.reload_settings(&store));
		assert_eq!(script.state().opacity(ShapeKind::Square), "0.4");
		assert_eq!(script.state().color(ShapeKind::Arrow, PaletteIndex::slot(1).unwrap()), "#15781B");
	}
}
