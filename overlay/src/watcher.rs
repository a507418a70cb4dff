//! Finding the boards of a page and keeping each board's overlay in step with its shape layer.

use crate::consts::{BOARD_TAG, CONTAINER_TAG, SHAPES_CLASS};
use crate::dom::{Dom, Observer};
use crate::render::{arrows, highlights};
use crate::state::ColorState;

use std::fmt;

/// Identifies one board for as long as it stays on the page. Never reused within a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardId(pub u64);

impl fmt::Display for BoardId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "board{}", self.0)
	}
}

/// Structural change notifications, delivered by the [`Dom`] observers the watcher subscribes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatcherMessage {
	/// Something was added to or removed from the page
	DocumentChanged,
	/// The annotations drawn on one board changed
	ShapesChanged { board: BoardId },
}

/// Run once when the board it was registered for leaves the page.
pub type ReleaseListener = Box<dyn FnOnce()>;

/// One board on the page, with the subscription keeping its overlay current.
pub struct BoardInstance<D: Dom> {
	pub id: BoardId,
	pub container: D::Node,
	/// The board's own annotation layer, read on every render
	pub shapes: D::Node,
	/// The element both overlay layers are appended to
	pub board: D::Node,
	/// Prepended to every id generated for this board
	pub prefix: String,
	observer: D::Observer,
	release_listeners: Vec<ReleaseListener>,
}

impl<D: Dom> BoardInstance<D> {
	/// Rebuilds both overlay layers from the shape layer.
	pub fn render(&self, dom: &D, state: &ColorState) {
		highlights::render_highlights(dom, state, &self.shapes, &self.board);
		arrows::render_arrows(dom, state, &self.shapes, &self.board, &self.prefix);
	}

	fn teardown(mut self) {
		self.observer.disconnect();
		for listener in self.release_listeners.drain(..) {
			listener();
		}
		log::debug!("Detached {}", self.id);
	}
}

impl<D: Dom> fmt::Debug for BoardInstance<D> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BoardInstance")
			.field("id", &self.id)
			.field("container", &self.container)
			.field("prefix", &self.prefix)
			.field("release_listeners", &self.release_listeners.len())
			.finish_non_exhaustive()
	}
}

pub struct WatcherMessageContext<'a, D: Dom> {
	pub dom: &'a D,
	pub state: &'a ColorState,
}

pub struct BoardWatcher<D: Dom> {
	boards: Vec<BoardInstance<D>>,
	document_observer: Option<D::Observer>,
	next_id: u64,
}

impl<D: Dom> Default for BoardWatcher<D> {
	fn default() -> Self {
		Self {
			boards: Vec::new(),
			document_observer: None,
			next_id: 0,
		}
	}
}

impl<D: Dom> BoardWatcher<D> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Subscribes to changes of the whole page, then picks up the boards already on it.
	pub fn start(&mut self, dom: &D, state: &ColorState) {
		if self.document_observer.is_none() {
			self.document_observer = Some(dom.observe(&dom.root(), WatcherMessage::DocumentChanged));
		}
		self.discover(dom, state);
	}

	pub fn process_message(&mut self, message: WatcherMessage, context: WatcherMessageContext<'_, D>) {
		let WatcherMessageContext { dom, state } = context;

		match message {
			WatcherMessage::DocumentChanged => {
				self.sweep(dom);
				self.discover(dom, state);
			}
			WatcherMessage::ShapesChanged { board } => {
				let Some(position) = self.boards.iter().position(|instance| instance.id == board) else {
					log::trace!("Ignoring shape change of unknown {board}");
					return;
				};

				if !dom.is_connected(&self.boards[position].container) {
					self.boards.remove(position).teardown();
					return;
				}
				self.boards[position].render(dom, state);
			}
		}
	}

	/// Registers every board container of the page that isn't known yet.
	///
	/// A container the board hasn't finished building (no shape layer or no board element yet) is left
	/// unregistered so a later page change can pick it up.
	pub fn discover(&mut self, dom: &D, state: &ColorState) {
		for container in dom.elements_by_tag_name(&dom.root(), CONTAINER_TAG) {
			if self.boards.iter().any(|instance| instance.container == container) {
				continue;
			}

			let (Some(shapes), Some(board)) = (dom.first_element_by_class_name(&container, SHAPES_CLASS), dom.first_element_by_tag_name(&container, BOARD_TAG)) else {
				log::trace!("Board container {container:?} is incomplete, retrying on the next page change");
				continue;
			};

			let id = BoardId(self.next_id);
			self.next_id += 1;

			let instance = BoardInstance {
				id,
				observer: dom.observe(&shapes, WatcherMessage::ShapesChanged { board: id }),
				prefix: format!("{id}_"),
				container,
				shapes,
				board,
				release_listeners: Vec::new(),
			};
			instance.render(dom, state);
			log::debug!("Attached {id}");
			self.boards.push(instance);
		}
	}

	/// Tears down every board whose container left the page.
	pub fn sweep(&mut self, dom: &D) {
		let (detached, attached): (Vec<_>, Vec<_>) = std::mem::take(&mut self.boards).into_iter().partition(|instance| !dom.is_connected(&instance.container));
		self.boards = attached;
		for instance in detached {
			instance.teardown();
		}
	}

	/// Registers `listener` to run when `board` is torn down. Returns `false`, dropping the listener, when the board isn't live.
	pub fn add_release_listener(&mut self, board: BoardId, listener: impl FnOnce() + 'static) -> bool {
		match self.boards.iter_mut().find(|instance| instance.id == board) {
			Some(instance) => {
				instance.release_listeners.push(Box::new(listener));
				true
			}
			None => false,
		}
	}

	/// Every live board, in the order they were discovered.
	pub fn boards(&self) -> &[BoardInstance<D>] {
		&self.boards
	}

	pub fn board(&self, id: BoardId) -> Option<&BoardInstance<D>> {
		self.boards.iter().find(|instance| instance.id == id)
	}
}
