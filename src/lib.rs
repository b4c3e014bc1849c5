//! Headless model of a drag-to-edit discrete probability distribution.
//!
//! The host forwards pointer and button events to an [`Editor`], paints the
//! [`Scene`] it describes and lets it snapshot into a [`Store`]. The numeric
//! core is [`math::redistribute`].

pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod math;
pub mod persist;
pub mod scene;
pub mod vector;

#[cfg(feature = "python")]
mod bindings;

pub use config::EditorConfig;
pub use editor::{Clipboard, Editor, LabelTarget, PointerDown};
pub use error::{EditorError, Result};
pub use geometry::{Layout, Point};
pub use math::redistribute;
pub use persist::{DebouncedWriter, FileStore, MemoryStore, Store};
pub use scene::{Color, Scene, Shape, Surface};
pub use vector::ProbabilityVector;
