//! Application-Layer: Controller, State, Commands und Use-Cases.

pub mod buffer;
pub mod command_log;
pub mod commands;
pub mod controller;
pub mod history;
pub mod registry;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Sitzung (Dokument, Auswahl,
/// Viewer, History).
pub mod state;
pub mod use_cases;

pub use buffer::{Buffer, ClipEntry};
pub use command_log::CommandLog;
pub use commands::{CommandResult, LayerCommand};
pub use controller::MapController;
pub use history::{EditorHistory, Memento, MAX_BUFFER_LENGTH};
pub use registry::{HandlerRegistry, LayerHandler};
pub use state::{AppState, DrawState, EditorState, SelectionState, TileSelection, ViewerState};
