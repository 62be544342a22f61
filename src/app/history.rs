//! Snapshot-basierte Undo/Redo-History (Memento-Puffer mit Cursor).

use indexmap::IndexMap;

use crate::core::{Layer, MapDocument};

use super::state::ViewerState;

/// Maximale Anzahl gehaltener Snapshots.
pub const MAX_BUFFER_LENGTH: usize = 100;

/// Unveraenderlicher Voll-Snapshot des Dokuments: alle Layer als Tiefkopie
/// plus die Viewer-Metadaten. Teilt keinerlei veraenderlichen Zustand mit
/// dem lebenden Dokument.
#[derive(Debug, Clone)]
pub struct Memento {
    layers: IndexMap<String, Layer>,
    viewer: ViewerState,
}

impl Memento {
    /// Erstellt einen Snapshot aus Dokument und Viewer-Zustand.
    pub fn capture(document: &MapDocument, viewer: &ViewerState) -> Self {
        Self {
            layers: document.clone_layers(),
            viewer: viewer.clone(),
        }
    }

    pub fn layers(&self) -> &IndexMap<String, Layer> {
        &self.layers
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    /// Zerlegt den Snapshot fuer den Total-State-Restore.
    pub fn into_parts(self) -> (IndexMap<String, Layer>, ViewerState) {
        (self.layers, self.viewer)
    }
}

/// Begrenzter Undo/Redo-Puffer mit einem Cursor auf den aktuellen Zustand.
///
/// `cursor == -1` heisst: vor dem aeltesten Snapshot (oder Puffer leer).
#[derive(Debug)]
pub struct EditorHistory {
    buffer: Vec<Memento>,
    cursor: isize,
    capacity: usize,
}

impl Default for EditorHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHistory {
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_LENGTH)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: -1,
            capacity: capacity.max(1),
        }
    }

    /// Haengt einen Snapshot ans Ende an.
    ///
    /// "Zukunft" hinter dem Cursor (durch Undo erreichte Zustaende) wird
    /// verworfen — lineare History, keine Verzweigung. Bei voller Kapazitaet
    /// wird der aelteste Snapshot verdraengt.
    pub fn push(&mut self, memento: Memento) {
        let keep = (self.cursor + 1).max(0) as usize;
        self.buffer.truncate(keep);
        if self.buffer.len() >= self.capacity {
            self.buffer.remove(0);
        }
        self.buffer.push(memento);
        self.cursor = self.buffer.len() as isize - 1;
    }

    /// Schritt in Richtung aelterer Zustaende.
    ///
    /// Am aeltesten Snapshot liefert der letzte Schritt diesen noch einmal,
    /// danach `None` — Underflow ist kein Fehler, sondern "nichts zu tun".
    pub fn undo(&mut self) -> Option<Memento> {
        if self.cursor >= 1 {
            self.cursor -= 1;
            Some(self.buffer[self.cursor as usize].clone())
        } else if self.cursor == 0 {
            self.cursor = -1;
            Some(self.buffer[0].clone())
        } else {
            None
        }
    }

    /// Schritt in Richtung neuerer Zustaende.
    ///
    /// Am neuesten Zustand kommt der aktuelle Snapshot unveraendert zurueck;
    /// `None` nur bei leerem Puffer.
    pub fn redo(&mut self) -> Option<Memento> {
        if self.buffer.is_empty() {
            return None;
        }
        if self.cursor + 1 < self.buffer.len() as isize {
            self.cursor += 1;
        }
        Some(self.buffer[self.cursor.max(0) as usize].clone())
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = -1;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.buffer.len() as isize
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
