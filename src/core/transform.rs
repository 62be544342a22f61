//! Koordinaten-Transformation zwischen Weltmetern, Tile-Gitter und View.
//!
//! Reine Funktionen ohne Dokument-Zugriff. Die View-Achse y zeigt nach
//! unten, die Weltachse y nach oben; eine Gitterzelle ist
//! `tile_size * grid_scale` Pixel gross.

use glam::DVec2;

/// Transformation Welt ⇄ View fuer eine Karte fester Hoehe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatesTransformer {
    scale: f64,
    map_height: i64,
    grid_width: f64,
    grid_height: f64,
    tile_width: f64,
    tile_height: f64,
}

impl CoordinatesTransformer {
    pub fn new(
        scale: f64,
        map_height: i64,
        grid_width: f64,
        grid_height: f64,
        tile_width: f64,
        tile_height: f64,
    ) -> Self {
        Self {
            scale,
            map_height,
            grid_width,
            grid_height,
            tile_width,
            tile_height,
        }
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn set_map_height(&mut self, map_height: i64) {
        self.map_height = map_height;
    }

    pub fn set_grid_size(&mut self, size: DVec2) {
        self.grid_width = size.x;
        self.grid_height = size.y;
    }

    pub fn set_tile_size(&mut self, size: DVec2) {
        self.tile_width = size.x;
        self.tile_height = size.y;
    }

    /// Welt-x (Meter) → View-x (Pixel); `obj_width` zentriert ein Objekt.
    pub fn x_to_view(&self, x: f64, obj_width: f64) -> f64 {
        x / self.tile_width * self.grid_width * self.scale - obj_width / 2.0
    }

    /// Welt-y (Meter) → View-y (Pixel), Achse gespiegelt.
    pub fn y_to_view(&self, y: f64, obj_height: f64) -> f64 {
        (self.map_height as f64 - y / self.tile_height) * self.grid_height * self.scale
            - obj_height / 2.0
    }

    /// View-x (Pixel) → Welt-x (Meter).
    pub fn x_from_view(&self, view_x: f64, obj_width: f64, offset_x: f64) -> f64 {
        (view_x - offset_x + obj_width / 2.0) / (self.grid_width * self.scale) * self.tile_width
    }

    /// View-y (Pixel) → Welt-y (Meter), Achse gespiegelt.
    pub fn y_from_view(&self, view_y: f64, obj_height: f64, offset_y: f64) -> f64 {
        (self.map_height as f64
            - (view_y - offset_y + obj_height / 2.0) / (self.grid_height * self.scale))
            * self.tile_height
    }

    /// Gitterindex (i, j) → Weltposition der Tile-Ecke.
    pub fn tile_index_to_world(&self, index: (i64, i64)) -> DVec2 {
        DVec2::new(
            index.0 as f64 * self.tile_width,
            index.1 as f64 * self.tile_height,
        )
    }

    /// Weltposition → Gitterindex der enthaltenden Tile.
    pub fn world_to_tile_index(&self, position: DVec2) -> (i64, i64) {
        (
            (position.x / self.tile_width).floor() as i64,
            (position.y / self.tile_height).floor() as i64,
        )
    }
}

impl Default for CoordinatesTransformer {
    fn default() -> Self {
        use crate::core::schema::DEFAULT_TILE_SIZE;
        let grid = DEFAULT_TILE_SIZE * 100.0;
        Self::new(1.0, 10, grid, grid, DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn transformer() -> CoordinatesTransformer {
        CoordinatesTransformer::new(1.0, 5, 58.5, 58.5, 0.585, 0.585)
    }

    #[test]
    fn x_roundtrip() {
        let t = transformer();
        let view = t.x_to_view(1.17, 32.0);
        let world = t.x_from_view(view, 32.0, 0.0);
        assert_abs_diff_eq!(world, 1.17, epsilon = 1e-9);
    }

    #[test]
    fn y_achse_ist_gespiegelt() {
        let t = transformer();
        // Weltursprung liegt am unteren Kartenrand
        assert_abs_diff_eq!(t.y_to_view(0.0, 0.0), 5.0 * 58.5, epsilon = 1e-9);
        assert_abs_diff_eq!(
            t.y_from_view(t.y_to_view(2.0, 0.0), 0.0, 0.0),
            2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn skalierung_wirkt_auf_view_koordinaten() {
        let mut t = transformer();
        t.set_scale(2.0);
        assert_abs_diff_eq!(t.x_to_view(0.585, 0.0), 117.0, epsilon = 1e-9);
    }

    #[test]
    fn tile_index_mapping() {
        let t = transformer();
        assert_eq!(t.world_to_tile_index(DVec2::new(1.0, 0.3)), (1, 0));
        let corner = t.tile_index_to_world((2, 3));
        assert_abs_diff_eq!(corner.x, 1.17, epsilon = 1e-9);
        assert_abs_diff_eq!(corner.y, 1.755, epsilon = 1e-9);
    }
}
