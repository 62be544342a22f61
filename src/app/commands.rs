//! Commands sind kleine Wertobjekte: genau eine Mutation oder Leseabfrage
//! gegen genau einen Layer. Sie sind zustandslos und werden vom passenden
//! Layer-Handler angewendet; den Frame-Tree ruehren sie nie direkt an —
//! das erledigt die Engine als Folgeschritt.

use glam::DVec2;

use crate::core::schema::{FRAMES, TILES, TILE_MAPS};
use crate::core::{EntityConfig, FieldValue, Layer};

/// Alle Mutations- und Leseoperationen des Dokumentmodells.
#[derive(Debug, Clone)]
pub enum LayerCommand {
    /// Entity mit Default-Konfiguration des Layers anlegen
    AddObject {
        layer_name: String,
        object_name: String,
    },
    /// Entity entfernen
    DeleteObject {
        layer_name: String,
        object_name: String,
    },
    /// Pose-Position eines Frames setzen (lokale Koordinaten)
    MoveObject {
        frame_name: String,
        new_position: DVec2,
    },
    /// Yaw eines Frames setzen
    RotateObject { frame_name: String, new_yaw: f64 },
    /// `type`-Feld einer Entity aendern (schema-geprueft)
    ChangeType {
        layer_name: String,
        object_name: String,
        new_type: String,
    },
    /// `id`-Feld einer Entity aendern (schema-geprueft)
    ChangeId {
        layer_name: String,
        object_name: String,
        new_id: FieldValue,
    },
    /// Mehrere Felder einer Entity aendern (schema-geprueft, atomar)
    ChangeConfig {
        layer_name: String,
        object_name: String,
        new_config: EntityConfig,
    },
    /// `relative_to` eines Frames setzen
    SetRelativeTo {
        frame_name: String,
        relative_to: String,
    },
    /// Gitterindex einer Tile setzen
    MoveTile {
        tile_name: String,
        tile_index: (i64, i64),
    },
    /// Tile-Groesse einer Tile-Map setzen
    SetTileSize {
        tile_map_name: String,
        new_size: DVec2,
    },
    /// Konfiguration gegen das Layer-Schema pruefen (lesend)
    CheckConfig {
        layer_name: String,
        config: EntityConfig,
    },
    /// Tiefkopie eines Layers fuer Snapshots (lesend)
    DeepCopyLayer { layer_name: String },
}

impl LayerCommand {
    /// Layer, dessen Handler diesen Command erkennt.
    pub fn target_layer(&self) -> &str {
        match self {
            LayerCommand::AddObject { layer_name, .. }
            | LayerCommand::DeleteObject { layer_name, .. }
            | LayerCommand::ChangeType { layer_name, .. }
            | LayerCommand::ChangeId { layer_name, .. }
            | LayerCommand::ChangeConfig { layer_name, .. }
            | LayerCommand::CheckConfig { layer_name, .. }
            | LayerCommand::DeepCopyLayer { layer_name } => layer_name,
            LayerCommand::MoveObject { .. }
            | LayerCommand::RotateObject { .. }
            | LayerCommand::SetRelativeTo { .. } => FRAMES,
            LayerCommand::MoveTile { .. } => TILES,
            LayerCommand::SetTileSize { .. } => TILE_MAPS,
        }
    }

    /// `true` fuer Commands, die den Layer-Speicher veraendern.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            LayerCommand::CheckConfig { .. } | LayerCommand::DeepCopyLayer { .. }
        )
    }
}

/// Ergebnis einer Command-Ausfuehrung.
///
/// `Rejected` ist der reguläre, lokal behebbare Validierungsfehler —
/// der Command hat dann keinerlei beobachtbaren Effekt.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Mutation vollstaendig angewendet
    Applied,
    /// Validierung fehlgeschlagen oder Ziel nicht vorhanden; nichts geschrieben
    Rejected,
    /// Ergebnis einer `CheckConfig`-Abfrage
    Checked(bool),
    /// Abgekoppelte Tiefkopie aus `DeepCopyLayer`
    LayerCopy(Layer),
}

impl CommandResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandResult::Applied)
    }

    pub fn as_checked(&self) -> Option<bool> {
        match self {
            CommandResult::Checked(value) => Some(*value),
            _ => None,
        }
    }

    pub fn into_layer_copy(self) -> Option<Layer> {
        match self {
            CommandResult::LayerCopy(layer) => Some(layer),
            _ => None,
        }
    }
}
