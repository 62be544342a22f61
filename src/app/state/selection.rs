//! Auswahlzustand: selektierte Objekte und rechteckige Tile-Selektion.

use glam::DVec2;
use indexmap::IndexSet;

/// Rechteckige Tile-Selektion in Weltkoordinaten (Meter).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSelection {
    pub min: DVec2,
    pub max: DVec2,
}

impl TileSelection {
    /// Normalisiert zwei beliebige Eckpunkte zu min/max.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Prueft ob die Tile (i, j) das Selektionsrechteck schneidet.
    pub fn contains_tile(&self, index: (i64, i64), tile_width: f64, tile_height: f64) -> bool {
        let (i, j) = index;
        (i + 1) as f64 * tile_width >= self.min.x
            && i as f64 * tile_width <= self.max.x
            && (j + 1) as f64 * tile_height >= self.min.y
            && j as f64 * tile_height <= self.max.y
    }
}

/// Aktuelle Auswahl des Editors.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    /// Namen der selektierten (draggablen) Objekte, Reihenfolge stabil
    pub selected_objects: IndexSet<String>,
    /// Aktive Tile-Selektion (None = keine)
    pub tile_selection: Option<TileSelection>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.selected_objects.clear();
        self.tile_selection = None;
    }

    pub fn select_object(&mut self, name: impl Into<String>) {
        self.selected_objects.insert(name.into());
    }

    pub fn select_tiles(&mut self, selection: TileSelection) {
        self.tile_selection = Some(selection);
    }

    pub fn is_empty(&self) -> bool {
        self.selected_objects.is_empty() && self.tile_selection.is_none()
    }
}
