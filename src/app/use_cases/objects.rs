//! Use-Cases fuer Objekte: Anlegen, Loeschen mit Umhaengen, Verschieben,
//! Rotieren, Konfigurations-Aenderung.

use anyhow::{bail, Result};
use glam::DVec2;
use indexmap::IndexSet;

use crate::app::commands::{CommandResult, LayerCommand};
use crate::app::controller::dispatch_command;
use crate::app::state::AppState;
use crate::core::field::FieldValue;
use crate::core::schema::{self, FRAMES, TILES, TILE_MAPS, TRAFFIC_SIGNS, VEHICLES, WATCHTOWERS};
use crate::core::EntityConfig;

/// Layer (ausser `frames`), der ein Objekt dieses Namens enthaelt.
pub fn layer_of_object(state: &AppState, object_name: &str) -> Option<String> {
    state
        .document
        .layers()
        .find(|(layer_name, layer)| layer_name.as_str() != FRAMES && layer.contains(object_name))
        .map(|(layer_name, _)| layer_name.clone())
}

/// Absolute Weltposition eines Frames: Vorgaenger-Kette bis zum
/// Karten-Root ablaufen und Posen-Offsets aufsummieren.
///
/// Der Lauf terminiert, weil der Graph per Invariante azyklisch ist;
/// das Visited-Set laesst einen Invariantenbruch schnell scheitern
/// statt zu haengen.
pub fn resolve_absolute_position(state: &AppState, frame_name: &str) -> Result<DVec2> {
    let root = state.viewer.tile_map.as_str();
    let Some(frames) = state.layer(FRAMES) else {
        bail!("frames-Layer fehlt");
    };
    let Some(frame) = frames.get(frame_name) else {
        bail!("Frame '{}' nicht vorhanden", frame_name);
    };
    let Some(pose) = frame.pose() else {
        bail!("Frame '{}' traegt keine Pose", frame_name);
    };

    let mut position = pose.xy();
    let mut visited: IndexSet<&str> = IndexSet::new();
    let mut current = frame.relative_to().unwrap_or("");
    while !current.is_empty() && current != root {
        if !visited.insert(current) {
            bail!("Zyklus in der Frame-Kette von '{}'", frame_name);
        }
        let Some(parent) = frames.get(current) else {
            bail!("Frame-Kette von '{}' verweist auf fehlenden Frame '{}'", frame_name, current);
        };
        let Some(parent_pose) = parent.pose() else {
            bail!("Frame '{}' traegt keine Pose", current);
        };
        position += parent_pose.xy();
        current = parent.relative_to().unwrap_or("");
    }
    Ok(position)
}

/// Erzeugt den ersten freien Objektnamen `{tile_map}/{art}{i}` im
/// Namensraum der aktiven Tile-Map.
pub fn generate_object_name(state: &AppState, layer_name: &str) -> (String, i64) {
    let kind = layer_name.strip_suffix('s').unwrap_or(layer_name);
    let frames = state.layer(FRAMES);
    let layer = state.layer(layer_name);
    let mut index = 1;
    loop {
        let candidate = format!("{}/{}{}", state.viewer.tile_map, kind, index);
        let taken = frames.is_some_and(|l| l.contains(&candidate))
            || layer.is_some_and(|l| l.contains(&candidate));
        if !taken {
            return (candidate, index);
        }
        index += 1;
    }
}

/// Erste freie AprilTag-ID fuer einen Schildtyp; Fallback ist die
/// letzte ID des Pools.
pub fn next_free_sign_id(state: &AppState, sign_type: &str) -> Option<i64> {
    let pool = schema::traffic_sign_id_pool(sign_type);
    let used: Vec<i64> = state
        .layer(TRAFFIC_SIGNS)
        .map(|layer| {
            layer
                .iter()
                .filter_map(|(_, sign)| sign.get("id").and_then(FieldValue::as_int))
                .collect()
        })
        .unwrap_or_default();
    pool.iter()
        .find(|&&id| !used.contains(&id))
        .or(pool.last())
        .copied()
}

/// Legt ein Objekt an: Frame zuerst, dann die Entity, danach Typ und ID.
/// Liefert den erzeugten Namen.
pub fn add_object(
    state: &mut AppState,
    layer_name: &str,
    type_name: Option<&str>,
) -> Result<String> {
    let root = state.viewer.tile_map.clone();
    let (object_name, index) = generate_object_name(state, layer_name);

    // Reihenfolge: erst der Frame, dann die Entity
    dispatch_command(
        state,
        LayerCommand::AddObject {
            layer_name: FRAMES.to_string(),
            object_name: object_name.clone(),
        },
    )?;
    dispatch_command(
        state,
        LayerCommand::SetRelativeTo {
            frame_name: object_name.clone(),
            relative_to: root,
        },
    )?;
    dispatch_command(
        state,
        LayerCommand::AddObject {
            layer_name: layer_name.to_string(),
            object_name: object_name.clone(),
        },
    )?;

    if let Some(type_name) = type_name {
        dispatch_command(
            state,
            LayerCommand::ChangeType {
                layer_name: layer_name.to_string(),
                object_name: object_name.clone(),
                new_type: type_name.to_string(),
            },
        )?;
    }

    // ID nur fuer Layer, deren Schema ein id-Feld kennt
    let has_id_field = state
        .default_config(layer_name)
        .is_some_and(|config| config.contains("id"));
    if has_id_field {
        let new_id = match layer_name {
            WATCHTOWERS | VEHICLES => FieldValue::from(index.to_string()),
            TRAFFIC_SIGNS => {
                let sign_type = type_name.unwrap_or("stop");
                FieldValue::Int(next_free_sign_id(state, sign_type).unwrap_or(index))
            }
            _ => FieldValue::Int(index),
        };
        dispatch_command(
            state,
            LayerCommand::ChangeId {
                layer_name: layer_name.to_string(),
                object_name: object_name.clone(),
                new_id,
            },
        )?;
    }

    log::info!("Objekt '{}' in Layer '{}' angelegt", object_name, layer_name);
    Ok(object_name)
}

/// Loescht ein Objekt samt Frame.
///
/// Direkte Kinder werden vorher auf den Karten-Root umgehaengt und ihre
/// Pose auf die aufgeloeste absolute Position umgeschrieben — die
/// Weltposition bleibt erhalten, haengende Referenzen entstehen nicht.
pub fn delete_object(state: &mut AppState, object_name: &str) -> Result<()> {
    let root = state.viewer.tile_map.clone();

    // Direkte Kinder: Frames, deren relative_to auf das Objekt zeigt
    let direct_children: Vec<String> = state
        .layer(FRAMES)
        .map(|frames| {
            frames
                .iter()
                .filter(|(_, frame)| frame.relative_to() == Some(object_name))
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default();

    for child in direct_children {
        let absolute = resolve_absolute_position(state, &child)?;
        dispatch_command(
            state,
            LayerCommand::MoveObject {
                frame_name: child.clone(),
                new_position: absolute,
            },
        )?;
        dispatch_command(
            state,
            LayerCommand::SetRelativeTo {
                frame_name: child.clone(),
                relative_to: root.clone(),
            },
        )?;
        log::info!("Kind '{}' auf Root '{}' umgehaengt", child, root);
    }

    // Reihenfolge: erst die Entity, dann der Frame
    if let Some(layer_name) = layer_of_object(state, object_name) {
        dispatch_command(
            state,
            LayerCommand::DeleteObject {
                layer_name,
                object_name: object_name.to_string(),
            },
        )?;
    }
    dispatch_command(
        state,
        LayerCommand::DeleteObject {
            layer_name: FRAMES.to_string(),
            object_name: object_name.to_string(),
        },
    )?;

    log::info!("Objekt '{}' geloescht", object_name);
    Ok(())
}

/// Loescht alle selektierten Objekte und leert die Auswahl.
pub fn delete_selected(state: &mut AppState) -> Result<()> {
    let names: Vec<String> = state.selection.selected_objects.iter().cloned().collect();
    if names.is_empty() {
        log::debug!("Nichts zum Loeschen selektiert");
        return Ok(());
    }
    for name in &names {
        delete_object(state, name)?;
    }
    state.selection.clear();
    log::info!("{} Objekt(e) geloescht", names.len());
    Ok(())
}

/// Verschiebt ein Objekt so, dass seine absolute Weltposition
/// `absolute` wird. Relativ verankerte Frames behalten ihre Kette; nur
/// die lokale Pose wird um die Differenz verschoben.
pub fn move_object_absolute(
    state: &mut AppState,
    object_name: &str,
    absolute: DVec2,
) -> Result<CommandResult> {
    let current_absolute = resolve_absolute_position(state, object_name)?;
    let local = state
        .layer(FRAMES)
        .and_then(|frames| frames.get(object_name))
        .and_then(|frame| frame.pose())
        .map(|pose| pose.xy())
        .unwrap_or_default();
    let new_local = local + (absolute - current_absolute);
    dispatch_command(
        state,
        LayerCommand::MoveObject {
            frame_name: object_name.to_string(),
            new_position: new_local,
        },
    )
}

/// Verschiebt die Selektion um ein Welt-Delta.
///
/// Selektierte Frames, die selbst Nachfolger eines anderen selektierten
/// Frames sind, werden uebersprungen — sie folgen implizit ueber die
/// Frame-Kette.
pub fn move_selection_by(state: &mut AppState, delta: DVec2) -> Result<()> {
    let selected: Vec<String> = state.selection.selected_objects.iter().cloned().collect();
    let mut successors: IndexSet<String> = IndexSet::new();
    for name in &selected {
        successors.extend(state.frame_tree.all_successors(name));
    }

    for name in selected {
        if successors.contains(&name) {
            continue;
        }
        let Some(local) = state
            .layer(FRAMES)
            .and_then(|frames| frames.get(&name))
            .and_then(|frame| frame.pose())
            .map(|pose| pose.xy())
        else {
            log::warn!("Selektion: Frame '{}' ohne Pose", name);
            continue;
        };
        dispatch_command(
            state,
            LayerCommand::MoveObject {
                frame_name: name,
                new_position: local + delta,
            },
        )?;
    }
    Ok(())
}

/// Tiles im aktuellen Selektionsrechteck.
pub fn tiles_in_selection(state: &AppState) -> Vec<String> {
    let Some(selection) = state.selection.tile_selection else {
        return Vec::new();
    };
    let (tile_width, tile_height) = (state.viewer.tile_width, state.viewer.tile_height);
    state
        .layer(TILES)
        .map(|tiles| {
            tiles
                .iter()
                .filter(|(_, tile)| {
                    tile.tile_index()
                        .is_some_and(|index| selection.contains_tile(index, tile_width, tile_height))
                })
                .map(|(name, _)| name.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Dreht selektierte Objekte und Tiles im Selektionsrechteck um +90 Grad.
pub fn rotate_selection(state: &mut AppState) -> Result<()> {
    let mut names: Vec<String> = state.selection.selected_objects.iter().cloned().collect();
    names.extend(tiles_in_selection(state));

    for name in names {
        let Some(yaw) = state
            .layer(FRAMES)
            .and_then(|frames| frames.get(&name))
            .and_then(|frame| frame.pose())
            .map(|pose| pose.yaw)
        else {
            continue;
        };
        dispatch_command(
            state,
            LayerCommand::RotateObject {
                frame_name: name,
                new_yaw: yaw + 90.0,
            },
        )?;
    }
    Ok(())
}

/// Uebermalt alle Tiles im Selektionsrechteck mit einem Fuell-Typ und
/// setzt ihre Rotation zurueck.
pub fn painting_tiles(state: &mut AppState, fill: &str) -> Result<()> {
    let tiles = tiles_in_selection(state);
    let count = tiles.len();
    for tile_name in tiles {
        dispatch_command(
            state,
            LayerCommand::ChangeType {
                layer_name: TILES.to_string(),
                object_name: tile_name.clone(),
                new_type: fill.to_string(),
            },
        )?;
        dispatch_command(
            state,
            LayerCommand::RotateObject {
                frame_name: tile_name,
                new_yaw: 0.0,
            },
        )?;
    }
    if count > 0 {
        log::info!("{} Tile(s) mit '{}' uebermalt", count, fill);
    }
    Ok(())
}

/// Aendert Entity- und Frame-Konfiguration eines Objekts atomar.
///
/// Beide Konfigurationen werden vor der ersten Mutation geprueft;
/// bei `false` wurde nichts geschrieben.
pub fn change_object(
    state: &mut AppState,
    layer_name: &str,
    object_name: &str,
    new_config: &EntityConfig,
    new_frame: &EntityConfig,
) -> Result<bool> {
    if !state.check_config(layer_name, new_config) || !state.check_config(FRAMES, new_frame) {
        log::warn!("Ungueltige Konfiguration fuer '{}': nichts geschrieben", object_name);
        return Ok(false);
    }
    let config_result = dispatch_command(
        state,
        LayerCommand::ChangeConfig {
            layer_name: layer_name.to_string(),
            object_name: object_name.to_string(),
            new_config: new_config.clone(),
        },
    )?;
    if !config_result.is_applied() {
        return Ok(false);
    }
    let frame_result = dispatch_command(
        state,
        LayerCommand::ChangeConfig {
            layer_name: FRAMES.to_string(),
            object_name: object_name.to_string(),
            new_config: new_frame.clone(),
        },
    )?;
    Ok(frame_result.is_applied())
}

/// Frames, auf die ein Objekt umgehaengt werden darf: der Karten-Root
/// plus alle Objekt-Frames, die weder das Objekt selbst noch einer
/// seiner Nachfolger sind. Tiles und Tile-Maps sind keine Anker.
pub fn possible_relative_objects(state: &AppState, object_name: &str) -> Vec<String> {
    let mut result = vec![state.viewer.tile_map.clone()];
    let successors: IndexSet<String> =
        state.frame_tree.all_successors(object_name).into_iter().collect();
    let is_anchor = |name: &str| {
        name != object_name
            && name != state.viewer.tile_map
            && !successors.contains(name)
            && !state.layer(TILES).is_some_and(|l| l.contains(name))
            && !state.layer(TILE_MAPS).is_some_and(|l| l.contains(name))
    };
    if let Some(frames) = state.layer(FRAMES) {
        for (name, _) in frames.iter() {
            if is_anchor(name) {
                result.push(name.clone());
            }
        }
    }
    result
}
