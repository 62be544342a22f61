//! Planare Pose eines Frames.

use glam::DVec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::FieldValue;

/// 6-Komponenten-Pose eines Frames.
///
/// Die Engine rechnet nur mit x, y und yaw; z, roll und pitch werden
/// unveraendert mitgefuehrt, damit Karten mit 3-D-Posen verlustfrei
/// durch Laden/Editieren/Speichern laufen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
    pub roll: f64,
    pub pitch: f64,
}

impl Pose {
    /// Erstellt eine planare Pose an (x, y) ohne Rotation.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Gibt die planare Position zurueck.
    pub fn xy(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Setzt die planare Position, laesst die uebrigen Komponenten unberuehrt.
    pub fn set_xy(&mut self, position: DVec2) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Konvertiert die Pose in die generische Map-Repraesentation
    /// des `pose`-Felds einer Frame-Konfiguration.
    pub fn to_field(&self) -> FieldValue {
        let mut map = IndexMap::new();
        map.insert("x".to_string(), FieldValue::Float(self.x));
        map.insert("y".to_string(), FieldValue::Float(self.y));
        map.insert("z".to_string(), FieldValue::Float(self.z));
        map.insert("yaw".to_string(), FieldValue::Float(self.yaw));
        map.insert("roll".to_string(), FieldValue::Float(self.roll));
        map.insert("pitch".to_string(), FieldValue::Float(self.pitch));
        FieldValue::Map(map)
    }

    /// Liest eine Pose aus der generischen Map-Repraesentation.
    /// Fehlende Komponenten werden als 0.0 gelesen.
    pub fn from_field(value: &FieldValue) -> Option<Self> {
        let map = value.as_map()?;
        let component = |name: &str| map.get(name).and_then(FieldValue::as_float).unwrap_or(0.0);
        Some(Self {
            x: component("x"),
            y: component("y"),
            z: component("z"),
            yaw: component("yaw"),
            roll: component("roll"),
            pitch: component("pitch"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_roundtrip() {
        let pose = Pose {
            x: 1.17,
            y: 0.585,
            z: 0.0,
            yaw: 90.0,
            roll: 0.0,
            pitch: 0.0,
        };
        let restored = Pose::from_field(&pose.to_field()).expect("Pose erwartet");
        assert_eq!(pose, restored);
    }

    #[test]
    fn from_field_ergaenzt_fehlende_komponenten() {
        let mut map = IndexMap::new();
        map.insert("x".to_string(), FieldValue::Float(2.0));
        map.insert("y".to_string(), FieldValue::Float(3.0));
        let pose = Pose::from_field(&FieldValue::Map(map)).expect("Pose erwartet");
        assert_eq!(pose.xy(), DVec2::new(2.0, 3.0));
        assert_eq!(pose.yaw, 0.0);
    }

    #[test]
    fn from_field_auf_skalar_ist_none() {
        assert!(Pose::from_field(&FieldValue::Int(1)).is_none());
    }
}
