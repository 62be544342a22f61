//! Viewer-Metadaten des Dokuments (Teil jedes Mementos).

use glam::DVec2;

use crate::core::schema::DEFAULT_TILE_SIZE;
use crate::core::CoordinatesTransformer;

/// Standard-Aufloesung des Gitters: Pixel pro Tile-Kantenlaenge.
pub const DEFAULT_GRID_SCALE: f64 = 100.0;

/// Vom Dokument abgeleitete Anzeige-Metadaten.
///
/// Wandert vollstaendig in jedes Memento, damit Undo/Redo auch
/// Tile-Groesse und aktive Tile-Map wiederherstellt.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    /// Kartenhoehe in Tiles
    pub map_height: i64,
    /// Tile-Breite in Metern
    pub tile_width: f64,
    /// Tile-Hoehe in Metern
    pub tile_height: f64,
    /// Pixel pro Tile-Kantenlaenge
    pub grid_scale: f64,
    /// Gitterzellen-Breite in Pixeln (`tile_width * grid_scale`)
    pub grid_width: f64,
    /// Gitterzellen-Hoehe in Pixeln
    pub grid_height: f64,
    /// Name der aktiven Tile-Map (zugleich Root-Frame)
    pub tile_map: String,
}

impl ViewerState {
    pub fn new() -> Self {
        let mut state = Self {
            map_height: 10,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            grid_scale: DEFAULT_GRID_SCALE,
            grid_width: 0.0,
            grid_height: 0.0,
            tile_map: "map_1".to_string(),
        };
        state.set_tile_size(DVec2::splat(DEFAULT_TILE_SIZE));
        state
    }

    /// Setzt die Tile-Groesse und berechnet die Gittergroesse neu.
    pub fn set_tile_size(&mut self, size: DVec2) {
        self.tile_width = size.x;
        self.tile_height = size.y;
        self.grid_width = self.tile_width * self.grid_scale;
        self.grid_height = self.tile_height * self.grid_scale;
    }

    /// Kartenausdehnung in Metern bei `map_width` Tiles Breite.
    pub fn world_extent(&self, map_width: i64) -> DVec2 {
        DVec2::new(
            map_width as f64 * self.tile_width,
            self.map_height as f64 * self.tile_height,
        )
    }

    /// Transformer fuer den aktuellen Viewer-Zustand.
    pub fn transformer(&self, scale: f64) -> CoordinatesTransformer {
        CoordinatesTransformer::new(
            scale,
            self.map_height,
            self.grid_width,
            self.grid_height,
            self.tile_width,
            self.tile_height,
        )
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}
