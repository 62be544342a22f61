//! Hauptzustand der Editor-Sitzung.

use anyhow::Result;

use crate::app::buffer::Buffer;
use crate::app::command_log::CommandLog;
use crate::app::commands::LayerCommand;
use crate::app::history::{EditorHistory, Memento};
use crate::app::registry::HandlerRegistry;
use crate::core::schema::FRAMES;
use crate::core::{EntityConfig, FrameTree, Layer, MapDocument};
use crate::shared::EditorOptions;

use super::{EditorState, SelectionState, ViewerState};

/// Gesamtzustand einer Editor-Sitzung.
///
/// Das Dokument besitzt alle Entity-Daten exklusiv; Registry und
/// Frame-Tree sind pro Dokument aufgebaute, abgeleitete Strukturen.
pub struct AppState {
    /// Layer-Speicher (alleiniger Eigentuemer der Entity-Daten)
    pub document: MapDocument,
    /// Handler-Liste fuer das aktuell geoeffnete Dokument
    pub registry: HandlerRegistry,
    /// Abgeleiteter Vorgaenger/Nachfolger-Index ueber den frames-Layer
    pub frame_tree: FrameTree,
    /// Anzeige-Metadaten (Teil jedes Mementos)
    pub viewer: ViewerState,
    /// Editor-Modusflags
    pub editor: EditorState,
    /// Aktuelle Auswahl
    pub selection: SelectionState,
    /// Undo/Redo-History (Snapshot-basiert)
    pub history: EditorHistory,
    /// Clipboard-Puffer, unabhaengig von der History
    pub buffer: Buffer,
    /// Verlauf ausgefuehrter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
}

impl AppState {
    /// Erstellt eine Sitzung mit leerem Dokument und Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        let mut document = MapDocument::new("map_1");
        let registry = HandlerRegistry::for_document(&mut document);
        Self {
            document,
            registry,
            frame_tree: FrameTree::new(),
            viewer: ViewerState::new(),
            editor: EditorState::new(),
            selection: SelectionState::new(),
            history: EditorHistory::with_capacity(options.history_capacity),
            buffer: Buffer::new(),
            command_log: CommandLog::new(),
            options,
        }
    }

    /// Read-only Sicht auf einen Layer.
    pub fn layer(&self, layer_name: &str) -> Option<&Layer> {
        self.document.layer(layer_name)
    }

    /// Default-Konfiguration eines Layers (None bei unbekanntem Layer).
    pub fn default_config(&self, layer_name: &str) -> Option<EntityConfig> {
        self.registry
            .handler(layer_name)
            .map(|handler| handler.default_config())
    }

    /// Validiert eine Konfiguration gegen das Layer-Schema.
    pub fn check_config(&self, layer_name: &str, config: &EntityConfig) -> bool {
        match self.registry.handler(layer_name) {
            Some(handler) => handler.check_config(config),
            None => {
                log::warn!("check_config: unbekannter Layer '{}'", layer_name);
                false
            }
        }
    }

    /// Abgekoppelte Tiefkopie eines Layers ueber den Command-Pfad.
    pub fn deep_copy_layer(&mut self, layer_name: &str) -> Result<Layer> {
        let result = self.registry.dispatch(
            &mut self.document,
            &LayerCommand::DeepCopyLayer {
                layer_name: layer_name.to_string(),
            },
        )?;
        Ok(result.into_layer_copy().unwrap_or_default())
    }

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    pub fn record_snapshot(&mut self) {
        let memento = Memento::capture(&self.document, &self.viewer);
        self.history.push(memento);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Baut den Frame-Tree aus dem frames-Layer neu auf.
    pub fn rebuild_frame_tree(&mut self) {
        self.frame_tree
            .rebuild_from_layer(self.document.ensure_layer(FRAMES));
    }

    /// Kartenbreite in Tiles (aus dem tiles-Layer abgeleitet).
    pub fn map_width(&self) -> i64 {
        self.document.map_width()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
