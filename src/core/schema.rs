//! Layer-Schemata: statisch bekannte Layer und aus Daten abgeleitete.
//!
//! Bekannte Layer haben eine feste Default-Konfiguration und
//! enum-beschraenkte Felder. Unbekannte Layer aus Kartendateien bekommen
//! ihr Schema aus dem ersten gefundenen Datensatz abgeleitet.

use indexmap::IndexMap;

use super::entity::EntityConfig;
use super::field::{FieldType, FieldValue};
use super::pose::Pose;

// ── Layer-Namen ─────────────────────────────────────────────────────

pub const TILES: &str = "tiles";
pub const FRAMES: &str = "frames";
pub const TILE_MAPS: &str = "tile_maps";
pub const WATCHTOWERS: &str = "watchtowers";
pub const TRAFFIC_SIGNS: &str = "traffic_signs";
pub const GROUND_TAGS: &str = "ground_tags";
pub const VEHICLES: &str = "vehicles";
pub const CITIZENS: &str = "citizens";

/// Alle Layer mit statisch bekanntem Schema, in Registrierungs-Reihenfolge.
pub const KNOWN_LAYERS: [&str; 8] = [
    FRAMES,
    TILES,
    TILE_MAPS,
    WATCHTOWERS,
    CITIZENS,
    TRAFFIC_SIGNS,
    GROUND_TAGS,
    VEHICLES,
];

/// Ohne diese Layer-Dateien ist ein Kartenverzeichnis nicht ladbar.
pub const REQUIRED_LAYERS: [&str; 3] = [TILES, FRAMES, TILE_MAPS];

// ── Enum-Wertebereiche ──────────────────────────────────────────────

pub const TILE_TYPES: [&str; 7] = [
    "straight", "curve", "3way", "4way", "asphalt", "grass", "floor",
];

pub const TRAFFIC_SIGN_TYPES: [&str; 15] = [
    "stop",
    "yield",
    "no_right_turn",
    "no_left_turn",
    "do_not_enter",
    "oneway_right",
    "oneway_left",
    "four_way_intersect",
    "right_t_intersect",
    "left_t_intersect",
    "t_intersection",
    "pedestrian",
    "t_light_ahead",
    "duck_crossing",
    "parking",
];

pub const WATCHTOWER_CONFIGURATIONS: [&str; 2] = ["WT18", "WT19"];

pub const VEHICLE_CONFIGURATIONS: [&str; 6] = ["DB18", "DB19", "DB20", "DB21M", "DB21J", "DB21R"];

pub const CITIZEN_COLORS: [&str; 4] = ["yellow", "red", "green", "grey"];

pub const VEHICLE_COLORS: [&str; 4] = ["blue", "red", "green", "grey"];

/// Standard-Tile-Kantenlaenge in Metern.
pub const DEFAULT_TILE_SIZE: f64 = 0.585;

/// AprilTag-ID-Pools je Schildtyp. Neue Schilder bekommen die erste
/// freie ID ihres Typs.
pub fn traffic_sign_id_pool(sign_type: &str) -> &'static [i64] {
    match sign_type {
        "stop" => &[
            1, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 162,
            163, 164, 165, 166, 167, 168, 169, 170, 171, 172, 173, 174, 175, 176, 177, 178, 179,
            180, 181, 182, 183, 184, 185, 186, 187, 188, 189, 190, 191, 192, 193, 194, 195, 196,
        ],
        "yield" => &[2, 39],
        "no_right_turn" => &[3, 40],
        "no_left_turn" => &[4, 41],
        "do_not_enter" => &[5, 69],
        "oneway_right" => &[6, 42],
        "oneway_left" => &[7, 43],
        "four_way_intersect" => &[
            8, 13, 14, 15, 16, 17, 18, 19, 44, 45, 46, 47, 48, 49, 50, 51, 52, 53, 54, 55, 56,
            197, 198, 199, 231, 232, 233, 234, 262, 263, 264,
        ],
        "right_t_intersect" => &[
            9, 57, 58, 59, 60, 132, 133, 134, 135, 136, 137, 138, 139, 140, 141, 235, 238, 241,
            244, 260, 261,
        ],
        "left_t_intersect" => &[
            10, 61, 62, 63, 64, 152, 153, 154, 155, 156, 157, 158, 159, 160, 161, 237, 240, 242,
            245, 248, 249,
        ],
        "t_intersection" => &[
            11, 65, 66, 67, 68, 142, 143, 144, 145, 146, 147, 148, 149, 150, 151, 236, 239, 243,
            246, 247,
        ],
        "pedestrian" => &[12, 70, 71, 72, 73],
        "t_light_ahead" => &[
            74, 75, 76, 77, 78, 79, 80, 81, 82, 83, 84, 85, 86, 87, 88, 89, 90, 91, 92, 93, 94,
            200, 201, 202, 203, 204, 205, 206, 207, 208, 209, 210, 211, 212, 213, 214, 215, 216,
            217, 218, 219, 220, 221, 222, 223, 224, 225, 226, 227, 228, 229, 230,
        ],
        "duck_crossing" => &[
            95, 96, 97, 98, 99, 100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111, 112,
            113, 114, 115, 116, 117, 118, 119, 120, 121, 122, 123, 124,
        ],
        "parking" => &[125, 126, 127, 128, 129, 130, 131],
        _ => &[],
    }
}

// ── Schema-Varianten ────────────────────────────────────────────────

/// Schema eines Layers mit statisch bekannter Struktur.
#[derive(Debug, Clone)]
pub struct KnownLayerSchema {
    default_config: EntityConfig,
    /// Felder mit explizitem Wertebereich: (Feldname, erlaubte Werte).
    enum_fields: &'static [(&'static str, &'static [&'static str])],
}

/// Schema eines unbekannten Layers, aus dem ersten Datensatz abgeleitet.
#[derive(Debug, Clone)]
pub struct InferredLayerSchema {
    fields: IndexMap<String, FieldType>,
    template: EntityConfig,
}

/// Schema eines Layers: statisch bekannt oder aus Daten abgeleitet.
#[derive(Debug, Clone)]
pub enum LayerSchema {
    Known(KnownLayerSchema),
    Inferred(InferredLayerSchema),
}

impl LayerSchema {
    /// Statisches Schema fuer einen bekannten Layer-Namen, sonst `None`.
    pub fn known_for(layer_name: &str) -> Option<Self> {
        let schema = match layer_name {
            TILES => KnownLayerSchema {
                default_config: [
                    ("i", FieldValue::Int(0)),
                    ("j", FieldValue::Int(0)),
                    ("type", FieldValue::from("floor")),
                ]
                .into_iter()
                .collect(),
                enum_fields: &[("type", &TILE_TYPES)],
            },
            FRAMES => {
                let mut default_config = EntityConfig::new();
                default_config.set_pose(Pose::at(1.0, 1.0));
                default_config.set_relative_to("");
                KnownLayerSchema {
                    default_config,
                    enum_fields: &[],
                }
            }
            TILE_MAPS => {
                let mut default_config = EntityConfig::new();
                default_config.set_tile_size(glam::DVec2::splat(DEFAULT_TILE_SIZE));
                KnownLayerSchema {
                    default_config,
                    enum_fields: &[],
                }
            }
            WATCHTOWERS => KnownLayerSchema {
                default_config: [
                    ("configuration", FieldValue::from("WT18")),
                    ("id", FieldValue::from("")),
                ]
                .into_iter()
                .collect(),
                enum_fields: &[("configuration", &WATCHTOWER_CONFIGURATIONS)],
            },
            TRAFFIC_SIGNS => KnownLayerSchema {
                default_config: [
                    ("type", FieldValue::from("stop")),
                    ("id", FieldValue::Int(1)),
                    ("family", FieldValue::from("36h11")),
                ]
                .into_iter()
                .collect(),
                enum_fields: &[("type", &TRAFFIC_SIGN_TYPES)],
            },
            GROUND_TAGS => KnownLayerSchema {
                default_config: [
                    ("size", FieldValue::Float(0.15)),
                    ("id", FieldValue::Int(0)),
                    ("family", FieldValue::from("36h11")),
                ]
                .into_iter()
                .collect(),
                enum_fields: &[],
            },
            VEHICLES => KnownLayerSchema {
                default_config: [
                    ("color", FieldValue::from("blue")),
                    ("configuration", FieldValue::from("DB18")),
                    ("id", FieldValue::from("")),
                ]
                .into_iter()
                .collect(),
                enum_fields: &[
                    ("configuration", &VEHICLE_CONFIGURATIONS),
                    ("color", &VEHICLE_COLORS),
                ],
            },
            CITIZENS => KnownLayerSchema {
                default_config: [("color", FieldValue::from("yellow"))].into_iter().collect(),
                enum_fields: &[("color", &CITIZEN_COLORS)],
            },
            _ => return None,
        };
        Some(LayerSchema::Known(schema))
    }

    /// Leitet ein Schema aus dem ersten Datensatz eines unbekannten
    /// Layers ab. Bei leerem Layer entsteht ein leeres Schema, das jede
    /// nicht-leere Konfiguration ablehnt.
    pub fn inferred_from(template: &EntityConfig) -> Self {
        let fields = template
            .iter()
            .map(|(name, value)| (name.clone(), value.field_type()))
            .collect();
        LayerSchema::Inferred(InferredLayerSchema {
            fields,
            template: template.clone(),
        })
    }

    /// Default-Konfiguration fuer neue Entities dieses Layers.
    pub fn default_config(&self) -> EntityConfig {
        match self {
            LayerSchema::Known(schema) => schema.default_config.clone(),
            LayerSchema::Inferred(schema) => schema.template.clone(),
        }
    }

    /// Prueft eine vorgeschlagene Konfiguration gegen das Schema.
    ///
    /// Gueltig heisst: jedes vorhandene Feld existiert im Schema, der
    /// Laufzeit-Typ stimmt mit dem Default ueberein, und enum-beschraenkte
    /// Felder tragen einen erlaubten Wert. Ein ungueltiges Feld macht die
    /// gesamte Konfiguration ungueltig; es wird nie teilweise geschrieben.
    pub fn check_config(&self, config: &EntityConfig) -> bool {
        match self {
            LayerSchema::Known(schema) => {
                for (name, value) in config.iter() {
                    let Some(default) = schema.default_config.get(name) else {
                        return false;
                    };
                    if !value.matches_type(default) {
                        return false;
                    }
                }
                for &(field, allowed) in schema.enum_fields {
                    if let Some(value) = config.get(field) {
                        match value.as_str() {
                            Some(s) if allowed.contains(&s) => {}
                            _ => return false,
                        }
                    }
                }
                true
            }
            LayerSchema::Inferred(schema) => {
                for (name, value) in config.iter() {
                    match schema.fields.get(name) {
                        Some(expected) if value.field_type() == *expected => {}
                        _ => return false,
                    }
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles_schema() -> LayerSchema {
        LayerSchema::known_for(TILES).expect("tiles ist bekannt")
    }

    #[test]
    fn tile_typ_wird_gegen_enum_geprueft() {
        let schema = tiles_schema();
        let valid: EntityConfig = [("type", FieldValue::from("grass"))].into_iter().collect();
        let invalid: EntityConfig = [("type", FieldValue::from("moon"))].into_iter().collect();
        assert!(schema.check_config(&valid));
        assert!(!schema.check_config(&invalid));
    }

    #[test]
    fn unbekanntes_feld_ist_ungueltig() {
        let schema = tiles_schema();
        let config: EntityConfig = [("elevation", FieldValue::Float(1.0))].into_iter().collect();
        assert!(!schema.check_config(&config));
    }

    #[test]
    fn falscher_laufzeittyp_ist_ungueltig() {
        let schema = tiles_schema();
        let config: EntityConfig = [("i", FieldValue::Float(1.0))].into_iter().collect();
        assert!(!schema.check_config(&config));
    }

    #[test]
    fn vehicles_pruefen_konfiguration_und_farbe() {
        let schema = LayerSchema::known_for(VEHICLES).expect("vehicles ist bekannt");
        let valid: EntityConfig = [
            ("color", FieldValue::from("red")),
            ("configuration", FieldValue::from("DB21M")),
        ]
        .into_iter()
        .collect();
        let wrong_color: EntityConfig = [("color", FieldValue::from("pink"))].into_iter().collect();
        assert!(schema.check_config(&valid));
        assert!(!schema.check_config(&wrong_color));
    }

    #[test]
    fn abgeleitetes_schema_prueft_feldtypen() {
        let template: EntityConfig = [
            ("label", FieldValue::from("a")),
            ("weight", FieldValue::Float(1.0)),
        ]
        .into_iter()
        .collect();
        let schema = LayerSchema::inferred_from(&template);
        let valid: EntityConfig = [("weight", FieldValue::Float(2.5))].into_iter().collect();
        let invalid: EntityConfig = [("weight", FieldValue::from("schwer"))].into_iter().collect();
        assert!(schema.check_config(&valid));
        assert!(!schema.check_config(&invalid));
    }

    #[test]
    fn leeres_abgeleitetes_schema_lehnt_felder_ab() {
        let schema = LayerSchema::inferred_from(&EntityConfig::new());
        let config: EntityConfig = [("x", FieldValue::Int(1))].into_iter().collect();
        assert!(!schema.check_config(&config));
        assert!(schema.check_config(&EntityConfig::new()));
    }

    #[test]
    fn id_pool_fuer_schildtyp() {
        assert_eq!(traffic_sign_id_pool("yield"), &[2, 39]);
        assert!(traffic_sign_id_pool("unbekannt").is_empty());
    }
}
