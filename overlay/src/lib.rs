//! Redraws the annotations of the chessboards on a page in user chosen colors.
//!
//! The board widget keeps drawing its own circles and arrows. This crate reads them back out of the widget's markup
//! and draws an overlay in their place, through the [`dom::Dom`] trait so the same code runs in the browser and headless.

extern crate log;

pub mod annotation;
pub mod bridge;
pub mod color;
pub mod consts;
pub mod content_script;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod memory_dom;
pub mod options;
pub mod palette;
pub mod picker;
pub mod render;
pub mod settings;
pub mod state;
pub mod watcher;
