//! Clipboard-Puffer fuer Copy/Cut/Paste.
//!
//! Der Puffer lebt unabhaengig von der Undo-History: er ueberlebt
//! Undo/Redo und beliebig viele Pastes, bis ihn der naechste Copy/Cut
//! ueberschreibt.

use crate::core::EntityConfig;

/// Ein kopiertes Objekt: Layer-Name plus Tiefkopien von Entity- und
/// Frame-Konfiguration.
#[derive(Debug, Clone)]
pub struct ClipEntry {
    pub layer_name: String,
    pub object_name: String,
    pub config: EntityConfig,
    pub frame: EntityConfig,
}

/// Haelt die zuletzt kopierte Auswahl.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    entries: Vec<ClipEntry>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ueberschreibt den Puffer mit einer neuen Auswahl.
    pub fn save(&mut self, entries: Vec<ClipEntry>) {
        self.entries = entries;
    }

    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
