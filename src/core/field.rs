//! Generische Feldwerte fuer Entity-Konfigurationen.
//!
//! Layer-Dateien tragen beliebige YAML-Skalare und verschachtelte Maps
//! (z.B. die `pose` eines Frames). `FieldValue` bildet diese Werte typisiert
//! ab, ohne pro Layer eigene Structs zu brauchen — unbekannte Layer werden
//! damit genauso getragen wie die statisch bekannten.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Laufzeit-Typ eines Feldwerts. Grundlage der Schema-Pruefung:
/// ein vorgeschlagener Wert ist nur gueltig, wenn sein `FieldType` dem
/// des Default-Werts im Layer-Schema entspricht.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
}

/// Ein einzelner Feldwert einer Entity-Konfiguration.
///
/// `untagged`: die YAML-Repraesentation ist der nackte Skalar bzw. die
/// verschachtelte Map, ohne Typ-Tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// Gibt den Laufzeit-Typ des Werts zurueck.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Str(_) => FieldType::Str,
            FieldValue::List(_) => FieldType::List,
            FieldValue::Map(_) => FieldType::Map,
        }
    }

    /// Prueft ob zwei Werte denselben Laufzeit-Typ tragen.
    /// Int und Float sind bewusst verschieden (ein `id`-Feld mit
    /// Integer-Default akzeptiert keine Gleitkommazahl).
    pub fn matches_type(&self, other: &FieldValue) -> bool {
        self.field_type() == other.field_type()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numerischer Wert als f64; akzeptiert Int und Float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_und_float_sind_verschiedene_typen() {
        let id = FieldValue::Int(1);
        let size = FieldValue::Float(0.15);
        assert!(!id.matches_type(&size));
        assert!(id.matches_type(&FieldValue::Int(42)));
    }

    #[test]
    fn as_float_akzeptiert_int() {
        assert_eq!(FieldValue::Int(3).as_float(), Some(3.0));
        assert_eq!(FieldValue::Float(0.585).as_float(), Some(0.585));
        assert_eq!(FieldValue::Str("x".into()).as_float(), None);
    }

    #[test]
    fn yaml_roundtrip_erhaelt_skalartypen() {
        let v: FieldValue = serde_yaml::from_str("0.585").expect("Float erwartet");
        assert_eq!(v.field_type(), FieldType::Float);
        let v: FieldValue = serde_yaml::from_str("7").expect("Int erwartet");
        assert_eq!(v.field_type(), FieldType::Int);
        let v: FieldValue = serde_yaml::from_str("grass").expect("String erwartet");
        assert_eq!(v.field_type(), FieldType::Str);
    }
}
