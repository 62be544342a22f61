//! Duckietown Map Editor — Dokumentmodell-Kern.
//! Layer-Speicher, Command-Dispatch, Frame-Tree, History und Clipboard
//! als Library exportiert fuer Tests und den UI-Kollaborateur.

pub mod app;
pub mod core;
pub mod shared;
pub mod storage;

pub use app::{
    AppState, Buffer, ClipEntry, CommandLog, CommandResult, DrawState, EditorHistory, EditorState,
    HandlerRegistry, LayerCommand, LayerHandler, MapController, Memento, SelectionState,
    TileSelection, ViewerState,
};
pub use core::{
    CoordinatesTransformer, EntityConfig, FieldType, FieldValue, FrameTree, Layer, LayerSchema,
    MapDocument, Pose,
};
pub use shared::EditorOptions;
pub use storage::{load_map_directory, save_map_directory};
