//! Entity-Konfigurationen: flache Feld-Maps mit typisierten Zugriffen.

use glam::DVec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::FieldValue;
use super::pose::Pose;

/// Konfiguration einer einzelnen Entity innerhalb eines Layers.
///
/// Die Feld-Reihenfolge ist stabil (IndexMap), damit gespeicherte
/// Layer-Dateien deterministisch bleiben. `Clone` ist eine echte
/// Tiefkopie — Grundlage fuer Mementos und den Clipboard-Puffer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityConfig {
    fields: IndexMap<String, FieldValue>,
}

impl EntityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Uebernimmt alle Felder aus `other` (bestehende Werte werden ersetzt,
    /// nicht genannte Felder bleiben erhalten).
    pub fn merge(&mut self, other: &EntityConfig) {
        for (name, value) in other.iter() {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    // ── Typisierte Zugriffe auf konventionelle Felder ───────────────

    /// `pose` einer Frame-Konfiguration.
    pub fn pose(&self) -> Option<Pose> {
        self.get("pose").and_then(Pose::from_field)
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.set("pose", pose.to_field());
    }

    /// `relative_to` einer Frame-Konfiguration.
    pub fn relative_to(&self) -> Option<&str> {
        self.get("relative_to").and_then(FieldValue::as_str)
    }

    pub fn set_relative_to(&mut self, parent: &str) {
        self.set("relative_to", parent);
    }

    /// Gitterindex (i, j) einer Tile-Konfiguration.
    pub fn tile_index(&self) -> Option<(i64, i64)> {
        let i = self.get("i")?.as_int()?;
        let j = self.get("j")?.as_int()?;
        Some((i, j))
    }

    pub fn set_tile_index(&mut self, index: (i64, i64)) {
        self.set("i", index.0);
        self.set("j", index.1);
    }

    /// `type`-Feld (Tiles, Traffic-Signs).
    pub fn type_name(&self) -> Option<&str> {
        self.get("type").and_then(FieldValue::as_str)
    }

    /// `tile_size` einer Tile-Map-Konfiguration.
    pub fn tile_size(&self) -> Option<DVec2> {
        let map = self.get("tile_size")?.as_map()?;
        let x = map.get("x")?.as_float()?;
        let y = map.get("y")?.as_float()?;
        Some(DVec2::new(x, y))
    }

    pub fn set_tile_size(&mut self, size: DVec2) {
        let mut map = IndexMap::new();
        map.insert("x".to_string(), FieldValue::Float(size.x));
        map.insert("y".to_string(), FieldValue::Float(size.y));
        self.set("tile_size", FieldValue::Map(map));
    }
}

impl<S: Into<String>, V: Into<FieldValue>> FromIterator<(S, V)> for EntityConfig {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
