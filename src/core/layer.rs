//! Layer-Speicher: benannte Entity-Sammlungen und das Gesamtdokument.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entity::EntityConfig;
use super::schema;

/// Ein Layer: geordnete Map von Entity-Name auf Konfiguration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layer {
    entities: IndexMap<String, EntityConfig>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&EntityConfig> {
        self.entities.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EntityConfig> {
        self.entities.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, config: EntityConfig) {
        self.entities.insert(name.into(), config);
    }

    pub fn remove(&mut self, name: &str) -> Option<EntityConfig> {
        self.entities.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EntityConfig)> {
        self.entities.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entities.keys()
    }

    /// Erste Entity des Layers (Schema-Quelle fuer unbekannte Layer).
    pub fn first(&self) -> Option<(&String, &EntityConfig)> {
        self.entities.first()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl FromIterator<(String, EntityConfig)> for Layer {
    fn from_iter<T: IntoIterator<Item = (String, EntityConfig)>>(iter: T) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

/// Das Kartendokument: alle Layer plus der Kartenname.
///
/// Alleiniger Eigentuemer saemtlicher Entity-Daten. Der Frame-Tree ist
/// nur ein abgeleiteter Index ueber den `frames`-Layer und haelt selbst
/// keine Entity-Daten.
#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    /// Kartenname; identisch mit dem Namen des Root-Frames.
    pub name: String,
    layers: IndexMap<String, Layer>,
}

impl MapDocument {
    /// Erstellt ein leeres Dokument ohne Layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: IndexMap::new(),
        }
    }

    pub fn layer(&self, layer_name: &str) -> Option<&Layer> {
        self.layers.get(layer_name)
    }

    pub fn layer_mut(&mut self, layer_name: &str) -> Option<&mut Layer> {
        self.layers.get_mut(layer_name)
    }

    /// Liefert den Layer und legt ihn bei Bedarf leer an.
    pub fn ensure_layer(&mut self, layer_name: &str) -> &mut Layer {
        self.layers
            .entry(layer_name.to_string())
            .or_insert_with(|| {
                log::debug!("Layer '{}' leer angelegt", layer_name);
                Layer::new()
            })
    }

    pub fn insert_layer(&mut self, layer_name: impl Into<String>, layer: Layer) {
        self.layers.insert(layer_name.into(), layer);
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &String> {
        self.layers.keys()
    }

    pub fn layers(&self) -> impl Iterator<Item = (&String, &Layer)> {
        self.layers.iter()
    }

    /// Ersetzt alle Layer wholesale (Total-State-Restore beim Undo/Redo).
    pub fn replace_layers(&mut self, layers: IndexMap<String, Layer>) {
        self.layers = layers;
    }

    /// Tiefkopie aller Layer (Memento-Erzeugung).
    pub fn clone_layers(&self) -> IndexMap<String, Layer> {
        self.layers.clone()
    }

    /// Kartenbreite in Tiles: groesster i-Index + 1.
    pub fn map_width(&self) -> i64 {
        self.tile_extent().0
    }

    /// Kartenhoehe in Tiles: groesster j-Index + 1.
    pub fn map_height(&self) -> i64 {
        self.tile_extent().1
    }

    /// (Breite, Hoehe) des Tile-Gitters, aus dem `tiles`-Layer abgeleitet.
    pub fn tile_extent(&self) -> (i64, i64) {
        let Some(tiles) = self.layer(schema::TILES) else {
            return (0, 0);
        };
        let mut width = 0;
        let mut height = 0;
        for (_, tile) in tiles.iter() {
            if let Some((i, j)) = tile.tile_index() {
                width = width.max(i + 1);
                height = height.max(j + 1);
            }
        }
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    fn tile(i: i64, j: i64) -> EntityConfig {
        [
            ("i", FieldValue::Int(i)),
            ("j", FieldValue::Int(j)),
            ("type", FieldValue::from("floor")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn tile_extent_aus_tiles_layer() {
        let mut document = MapDocument::new("map_1");
        let tiles = document.ensure_layer(schema::TILES);
        tiles.insert("map_1/tile_0_0", tile(0, 0));
        tiles.insert("map_1/tile_4_2", tile(4, 2));
        assert_eq!(document.tile_extent(), (5, 3));
    }

    #[test]
    fn tile_extent_ohne_tiles_layer_ist_null() {
        let document = MapDocument::new("map_1");
        assert_eq!(document.tile_extent(), (0, 0));
    }

    #[test]
    fn ensure_layer_legt_leer_an() {
        let mut document = MapDocument::new("map_1");
        assert!(document.layer("citizens").is_none());
        document.ensure_layer("citizens");
        assert!(document.layer("citizens").is_some_and(Layer::is_empty));
    }
}
