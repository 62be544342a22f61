//! Use-Cases fuer das Clipboard: Kopieren, Ausschneiden und Einfuegen
//! mit Re-Basing der Frames auf den neuen Anker.

use anyhow::Result;

use crate::app::buffer::ClipEntry;
use crate::app::commands::LayerCommand;
use crate::app::controller::dispatch_command;
use crate::app::state::AppState;
use crate::core::schema::{FRAMES, TILES};

use super::objects;

/// Kopiert die aktuelle Auswahl in den Puffer: alle selektierten
/// Objekte plus jede Tile im Selektionsrechteck, jeweils als Tiefkopie
/// von Entity- und Frame-Konfiguration.
pub fn copy_selection(state: &mut AppState) {
    let mut entries: Vec<ClipEntry> = Vec::new();

    let selected: Vec<String> = state.selection.selected_objects.iter().cloned().collect();
    for name in selected {
        let Some(layer_name) = objects::layer_of_object(state, &name) else {
            continue;
        };
        if layer_name == TILES {
            continue;
        }
        let (Some(config), Some(frame)) = (
            state.layer(&layer_name).and_then(|l| l.get(&name)).cloned(),
            state.layer(FRAMES).and_then(|l| l.get(&name)).cloned(),
        ) else {
            log::warn!("Copy: '{}' ohne Konfiguration oder Frame", name);
            continue;
        };
        entries.push(ClipEntry {
            layer_name,
            object_name: name,
            config,
            frame,
        });
    }

    for tile_name in objects::tiles_in_selection(state) {
        let (Some(config), Some(frame)) = (
            state.layer(TILES).and_then(|l| l.get(&tile_name)).cloned(),
            state.layer(FRAMES).and_then(|l| l.get(&tile_name)).cloned(),
        ) else {
            continue;
        };
        entries.push(ClipEntry {
            layer_name: TILES.to_string(),
            object_name: tile_name,
            config,
            frame,
        });
    }

    log::info!("{} Objekt(e) kopiert", entries.len());
    state.buffer.save(entries);
}

/// Ausschneiden: kopieren, betroffene Tiles neutral uebermalen,
/// selektierte Objekte loeschen (mit Umhaengen der Kinder).
pub fn cut_selection(state: &mut AppState) -> Result<()> {
    copy_selection(state);
    let cut_fill = state.options.cut_fill.clone();
    objects::painting_tiles(state, &cut_fill)?;
    objects::delete_selected(state)?;
    Ok(())
}

/// Links-unterste Tile-Koordinate: simultane Paarminimierung.
fn left_low_tile(indices: &[(i64, i64)], init: (i64, i64)) -> (i64, i64) {
    let (mut min_i, mut min_j) = init;
    for &(i, j) in indices {
        if i <= min_i && j <= min_j {
            min_i = i;
            min_j = j;
        }
    }
    (min_i, min_j)
}

/// Links-unterste Frame-Pose der kopierten Objekte.
fn left_low_pose(entries: &[ClipEntry], init: (f64, f64)) -> (f64, f64) {
    let (mut min_x, mut min_y) = init;
    for entry in entries {
        let Some(pose) = entry.frame.pose() else {
            continue;
        };
        if pose.x <= min_x && pose.y <= min_y {
            min_x = pose.x;
            min_y = pose.y;
        }
    }
    (min_x, min_y)
}

/// Fuegt den Pufferinhalt an der aktuellen Tile-Selektion ein.
///
/// Tiles werden um das Tile-Delta verschoben und ausserhalb der Karte
/// uebersprungen; Objekte bekommen frische Namen, werden um das
/// Pose-Delta verschoben und in die Kartenausdehnung geklemmt. War ein
/// Frame relativ zu etwas anderem als dem Karten-Root verankert, wird
/// er auf den Root umgehaengt und seine Pose auf das rohe Delta gesetzt
/// (die indirekte Kette geht dabei dokumentiert verloren). Alles laeuft
/// ueber den normalen Command-Pfad, Validierung und Frame-Tree-Pflege
/// inklusive.
pub fn paste(state: &mut AppState) -> Result<()> {
    let entries: Vec<ClipEntry> = state.buffer.entries().to_vec();
    if entries.is_empty() {
        log::debug!("Paste: Puffer ist leer");
        return Ok(());
    }

    let (map_width, map_height) = state.document.tile_extent();
    let (tile_width, tile_height) = (state.viewer.tile_width, state.viewer.tile_height);

    // Anker: links-unterste Tile der aktuellen Selektion
    let selected_tiles: Vec<(i64, i64)> = objects::tiles_in_selection(state)
        .iter()
        .filter_map(|name| {
            state
                .layer(TILES)
                .and_then(|l| l.get(name))
                .and_then(|tile| tile.tile_index())
        })
        .collect();
    if selected_tiles.is_empty() {
        log::warn!("Paste: keine Tile-Selektion als Anker");
        return Ok(());
    }
    let (anchor_i, anchor_j) = left_low_tile(&selected_tiles, (map_width, map_height));

    // Quelle: links-unterste kopierte Tile und Frame-Pose
    let copied_tiles: Vec<(i64, i64)> = entries
        .iter()
        .filter(|entry| entry.layer_name == TILES)
        .filter_map(|entry| entry.config.tile_index())
        .collect();
    let (source_i, source_j) = left_low_tile(&copied_tiles, (map_width, map_height));
    let (source_x, source_y) = left_low_pose(
        &entries,
        (
            map_width as f64 * tile_width,
            map_height as f64 * tile_height,
        ),
    );

    let diff_i = anchor_i - source_i;
    let diff_j = anchor_j - source_j;
    let diff_x = anchor_i as f64 * tile_width - source_x;
    let diff_y = anchor_j as f64 * tile_height - source_y;

    let root = state.viewer.tile_map.clone();
    let extent_x = map_width as f64 * tile_width;
    let extent_y = map_height as f64 * tile_height;
    let mut pasted = 0usize;

    for entry in entries {
        if entry.layer_name == TILES {
            let Some((i, j)) = entry.config.tile_index() else {
                continue;
            };
            let (new_i, new_j) = (i + diff_i, j + diff_j);
            if !(0..map_width).contains(&new_i) || !(0..map_height).contains(&new_j) {
                log::debug!("Paste: Tile ({}, {}) liegt ausserhalb der Karte", new_i, new_j);
                continue;
            }
            let target = format!("{}/tile_{}_{}", state.document.name, new_i, new_j);
            let Some(tile_type) = entry.config.type_name().map(str::to_string) else {
                continue;
            };
            dispatch_command(
                state,
                LayerCommand::ChangeType {
                    layer_name: TILES.to_string(),
                    object_name: target.clone(),
                    new_type: tile_type,
                },
            )?;
            let yaw = entry.frame.pose().map(|pose| pose.yaw).unwrap_or(0.0);
            dispatch_command(
                state,
                LayerCommand::RotateObject {
                    frame_name: target,
                    new_yaw: yaw,
                },
            )?;
            pasted += 1;
        } else {
            let (new_name, _) = objects::generate_object_name(state, &entry.layer_name);
            let mut frame = entry.frame.clone();
            let Some(mut pose) = frame.pose() else {
                log::warn!("Paste: '{}' ohne Pose uebersprungen", entry.object_name);
                continue;
            };

            if frame.relative_to() != Some(root.as_str()) {
                // Re-Basing auf den Karten-Root: die indirekte
                // relative-Kette wird verworfen (dokumentiertes Verhalten)
                frame.set_relative_to(&root);
                pose.x = diff_x;
                pose.y = diff_y;
            } else {
                pose.x += diff_x;
                pose.y += diff_y;
            }
            pose.x = pose.x.clamp(0.0, extent_x);
            pose.y = pose.y.clamp(0.0, extent_y);
            frame.set_pose(pose);

            dispatch_command(
                state,
                LayerCommand::AddObject {
                    layer_name: FRAMES.to_string(),
                    object_name: new_name.clone(),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::AddObject {
                    layer_name: entry.layer_name.clone(),
                    object_name: new_name.clone(),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::ChangeConfig {
                    layer_name: entry.layer_name.clone(),
                    object_name: new_name.clone(),
                    new_config: entry.config.clone(),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::ChangeConfig {
                    layer_name: FRAMES.to_string(),
                    object_name: new_name,
                    new_config: frame,
                },
            )?;
            pasted += 1;
        }
    }

    log::info!("{} Objekt(e) eingefuegt", pasted);
    Ok(())
}
