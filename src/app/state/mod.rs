//! Zustand der Editor-Sitzung: Dokument, Auswahl, Viewer, Modusflags.

pub mod app_state;
pub mod editor;
pub mod selection;
pub mod view;

pub use app_state::AppState;
pub use editor::{DrawState, EditorState};
pub use selection::{SelectionState, TileSelection};
pub use view::ViewerState;
