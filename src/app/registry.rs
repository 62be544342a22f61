//! Layer-Handler und Handler-Registry.
//!
//! Pro Layer existiert genau ein Handler; er kennt das Schema seines Layers,
//! validiert Konfigurationen und wendet Commands an. Die Registry ist eine
//! geordnete Handler-Liste, die pro geoeffnetem Dokument einmal aufgebaut
//! wird — der Dispatch iteriert die Liste, bis ein Handler den Command
//! erkennt. Es gibt keinen prozessweiten Zustand.

use anyhow::{bail, Result};

use crate::core::schema::{self, LayerSchema};
use crate::core::{EntityConfig, FieldValue, MapDocument};

use super::commands::{CommandResult, LayerCommand};

/// Handler fuer genau einen Layer: Schema + Command-Anwendung.
#[derive(Debug, Clone)]
pub struct LayerHandler {
    layer_name: String,
    schema: LayerSchema,
}

impl LayerHandler {
    pub fn new(layer_name: impl Into<String>, schema: LayerSchema) -> Self {
        Self {
            layer_name: layer_name.into(),
            schema,
        }
    }

    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    /// Ein Handler erkennt einen Command nur, wenn dessen Ziel-Layer
    /// sein eigener ist.
    pub fn recognizes(&self, command: &LayerCommand) -> bool {
        command.target_layer() == self.layer_name
    }

    /// Default-Konfiguration fuer neue Entities dieses Layers.
    pub fn default_config(&self) -> EntityConfig {
        self.schema.default_config()
    }

    /// Validiert eine vorgeschlagene Konfiguration gegen das Layer-Schema.
    pub fn check_config(&self, config: &EntityConfig) -> bool {
        self.schema.check_config(config)
    }

    /// Wendet einen erkannten Command auf das Dokument an.
    /// Validierung geht der Mutation voraus; bei `Rejected` wurde nichts
    /// geschrieben.
    pub fn apply(&self, document: &mut MapDocument, command: &LayerCommand) -> CommandResult {
        match command {
            LayerCommand::AddObject { object_name, .. } => {
                let default_config = self.default_config();
                let layer = document.ensure_layer(&self.layer_name);
                if layer.contains(object_name) {
                    log::warn!(
                        "AddObject: '{}' existiert bereits in Layer '{}'",
                        object_name,
                        self.layer_name
                    );
                    return CommandResult::Rejected;
                }
                layer.insert(object_name.clone(), default_config);
                CommandResult::Applied
            }
            LayerCommand::DeleteObject { object_name, .. } => {
                let layer = document.ensure_layer(&self.layer_name);
                if layer.remove(object_name).is_some() {
                    CommandResult::Applied
                } else {
                    log::debug!(
                        "DeleteObject: '{}' nicht in Layer '{}'",
                        object_name,
                        self.layer_name
                    );
                    CommandResult::Rejected
                }
            }
            LayerCommand::MoveObject {
                frame_name,
                new_position,
            } => {
                let layer = document.ensure_layer(&self.layer_name);
                let Some(frame) = layer.get_mut(frame_name) else {
                    log::warn!("MoveObject: Frame '{}' nicht vorhanden", frame_name);
                    return CommandResult::Rejected;
                };
                let Some(mut pose) = frame.pose() else {
                    return CommandResult::Rejected;
                };
                pose.set_xy(*new_position);
                frame.set_pose(pose);
                CommandResult::Applied
            }
            LayerCommand::RotateObject {
                frame_name,
                new_yaw,
            } => {
                let layer = document.ensure_layer(&self.layer_name);
                let Some(frame) = layer.get_mut(frame_name) else {
                    log::warn!("RotateObject: Frame '{}' nicht vorhanden", frame_name);
                    return CommandResult::Rejected;
                };
                let Some(mut pose) = frame.pose() else {
                    return CommandResult::Rejected;
                };
                pose.yaw = *new_yaw;
                frame.set_pose(pose);
                CommandResult::Applied
            }
            LayerCommand::ChangeType {
                object_name,
                new_type,
                ..
            } => {
                let proposed: EntityConfig =
                    [("type", FieldValue::from(new_type.as_str()))].into_iter().collect();
                self.apply_checked_fields(document, object_name, &proposed)
            }
            LayerCommand::ChangeId {
                object_name,
                new_id,
                ..
            } => {
                let proposed: EntityConfig =
                    [("id", new_id.clone())].into_iter().collect();
                self.apply_checked_fields(document, object_name, &proposed)
            }
            LayerCommand::ChangeConfig {
                object_name,
                new_config,
                ..
            } => self.apply_checked_fields(document, object_name, new_config),
            LayerCommand::SetRelativeTo {
                frame_name,
                relative_to,
            } => {
                let layer = document.ensure_layer(&self.layer_name);
                let Some(frame) = layer.get_mut(frame_name) else {
                    log::warn!("SetRelativeTo: Frame '{}' nicht vorhanden", frame_name);
                    return CommandResult::Rejected;
                };
                frame.set_relative_to(relative_to);
                CommandResult::Applied
            }
            LayerCommand::MoveTile {
                tile_name,
                tile_index,
            } => {
                let layer = document.ensure_layer(&self.layer_name);
                let Some(tile) = layer.get_mut(tile_name) else {
                    log::warn!("MoveTile: Tile '{}' nicht vorhanden", tile_name);
                    return CommandResult::Rejected;
                };
                tile.set_tile_index(*tile_index);
                CommandResult::Applied
            }
            LayerCommand::SetTileSize {
                tile_map_name,
                new_size,
            } => {
                let layer = document.ensure_layer(&self.layer_name);
                let Some(tile_map) = layer.get_mut(tile_map_name) else {
                    log::warn!("SetTileSize: Tile-Map '{}' nicht vorhanden", tile_map_name);
                    return CommandResult::Rejected;
                };
                tile_map.set_tile_size(*new_size);
                CommandResult::Applied
            }
            LayerCommand::CheckConfig { config, .. } => {
                CommandResult::Checked(self.check_config(config))
            }
            LayerCommand::DeepCopyLayer { .. } => {
                let layer = document.ensure_layer(&self.layer_name);
                CommandResult::LayerCopy(layer.clone())
            }
        }
    }

    /// Validiert die vorgeschlagenen Felder und uebernimmt sie erst danach.
    fn apply_checked_fields(
        &self,
        document: &mut MapDocument,
        object_name: &str,
        proposed: &EntityConfig,
    ) -> CommandResult {
        if !self.check_config(proposed) {
            log::warn!(
                "Ungueltige Konfiguration fuer '{}' in Layer '{}'",
                object_name,
                self.layer_name
            );
            return CommandResult::Rejected;
        }
        let layer = document.ensure_layer(&self.layer_name);
        let Some(entity) = layer.get_mut(object_name) else {
            log::warn!(
                "Entity '{}' nicht in Layer '{}'",
                object_name,
                self.layer_name
            );
            return CommandResult::Rejected;
        };
        entity.merge(proposed);
        CommandResult::Applied
    }
}

/// Geordnete Liste aller Layer-Handler eines geoeffneten Dokuments.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<LayerHandler>,
}

impl HandlerRegistry {
    /// Baut die Registry fuer ein Dokument auf.
    ///
    /// Registriert werden alle auf der Platte gefundenen Layer plus alle
    /// strukturell bekannten Layer; Letztere werden bei Bedarf leer im
    /// Dokument angelegt. Unbekannte Layer bekommen ihr Schema aus dem
    /// ersten Datensatz abgeleitet.
    pub fn for_document(document: &mut MapDocument) -> Self {
        let mut layer_names: Vec<String> = document.layer_names().cloned().collect();
        for known in schema::KNOWN_LAYERS {
            if !layer_names.iter().any(|name| name == known) {
                layer_names.push(known.to_string());
            }
        }

        let mut handlers = Vec::with_capacity(layer_names.len());
        for layer_name in layer_names {
            let layer = document.ensure_layer(&layer_name);
            let layer_schema = match LayerSchema::known_for(&layer_name) {
                Some(known) => known,
                None => {
                    let template = layer
                        .first()
                        .map(|(_, config)| config.clone())
                        .unwrap_or_default();
                    log::info!(
                        "Unbekannter Layer '{}': Schema aus erstem Datensatz abgeleitet",
                        layer_name
                    );
                    LayerSchema::inferred_from(&template)
                }
            };
            handlers.push(LayerHandler::new(layer_name, layer_schema));
        }
        Self { handlers }
    }

    /// Fuehrt einen Command aus: genau der Handler mit passendem Layer
    /// wendet ihn an. Ein unbekannter Ziel-Layer ist ein Strukturfehler.
    pub fn dispatch(
        &self,
        document: &mut MapDocument,
        command: &LayerCommand,
    ) -> Result<CommandResult> {
        for handler in &self.handlers {
            if handler.recognizes(command) {
                return Ok(handler.apply(document, command));
            }
        }
        bail!("Kein Handler fuer Layer '{}'", command.target_layer());
    }

    pub fn handler(&self, layer_name: &str) -> Option<&LayerHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.layer_name() == layer_name)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(LayerHandler::layer_name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
