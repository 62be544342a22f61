//! Use-Cases fuer Karten: Anlegen, Laden, Speichern und der
//! Total-State-Restore fuer Undo/Redo.

use anyhow::Result;
use glam::DVec2;

use crate::app::commands::LayerCommand;
use crate::app::controller::dispatch_command;
use crate::app::history::Memento;
use crate::app::registry::HandlerRegistry;
use crate::app::state::AppState;
use crate::core::schema::{FRAMES, TILES, TILE_MAPS};
use crate::core::MapDocument;
use crate::storage;

/// Erstellt eine neue Karte: Root-Frame, Tile-Map-Eintrag und ein
/// `width × height` Tile-Gitter mit dem Default-Fill.
pub fn new_map(
    state: &mut AppState,
    map_name: &str,
    size: (i64, i64),
    tile_size: DVec2,
) -> Result<()> {
    let (width, height) = size;

    let mut document = MapDocument::new(map_name);
    state.registry = HandlerRegistry::for_document(&mut document);
    state.document = document;
    state.frame_tree.clear();
    state.selection.clear();
    state.history.clear();
    state.viewer.tile_map = map_name.to_string();
    state.viewer.set_tile_size(tile_size);
    state.viewer.map_height = height;

    // Root-Frame und Tile-Map-Eintrag
    dispatch_command(
        state,
        LayerCommand::AddObject {
            layer_name: FRAMES.to_string(),
            object_name: map_name.to_string(),
        },
    )?;
    dispatch_command(
        state,
        LayerCommand::AddObject {
            layer_name: TILE_MAPS.to_string(),
            object_name: map_name.to_string(),
        },
    )?;
    dispatch_command(
        state,
        LayerCommand::SetTileSize {
            tile_map_name: map_name.to_string(),
            new_size: tile_size,
        },
    )?;

    let default_fill = state.options.default_fill.clone();
    for i in 0..width {
        for j in 0..height {
            let tile_name = format!("{}/tile_{}_{}", map_name, i, j);
            dispatch_command(
                state,
                LayerCommand::AddObject {
                    layer_name: FRAMES.to_string(),
                    object_name: tile_name.clone(),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::SetRelativeTo {
                    frame_name: tile_name.clone(),
                    relative_to: map_name.to_string(),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::AddObject {
                    layer_name: TILES.to_string(),
                    object_name: tile_name.clone(),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::ChangeType {
                    layer_name: TILES.to_string(),
                    object_name: tile_name.clone(),
                    new_type: default_fill.clone(),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::MoveObject {
                    frame_name: tile_name.clone(),
                    new_position: DVec2::new(i as f64 * tile_size.x, j as f64 * tile_size.y),
                },
            )?;
            dispatch_command(
                state,
                LayerCommand::MoveTile {
                    tile_name,
                    tile_index: (i, j),
                },
            )?;
        }
    }

    state.record_snapshot();
    log::info!(
        "Neue Karte '{}' mit {}x{} Tiles angelegt",
        map_name,
        width,
        height
    );
    Ok(())
}

/// Laedt eine Karte aus einem Verzeichnis.
///
/// Das Dokument wird erst uebernommen, wenn das Laden vollstaendig
/// gelungen ist — bei einem Fehler bleibt der bisherige Zustand
/// unangetastet.
pub fn open_map(state: &mut AppState, path: &std::path::Path) -> Result<()> {
    let mut document = storage::load_map_directory(path)?;

    state.registry = HandlerRegistry::for_document(&mut document);
    state.document = document;
    state.selection.clear();
    state.history.clear();
    state.rebuild_frame_tree();

    // Aktive Tile-Map: erster Eintrag des tile_maps-Layers
    let active_tile_map = state
        .layer(TILE_MAPS)
        .and_then(|layer| layer.first())
        .map(|(name, tile_map)| (name.clone(), tile_map.tile_size()));
    if let Some((tile_map_name, tile_size)) = active_tile_map {
        state.viewer.tile_map = tile_map_name;
        if let Some(tile_size) = tile_size {
            state.viewer.set_tile_size(tile_size);
        }
    }
    state.viewer.map_height = state.document.map_height();

    state.record_snapshot();
    log::info!(
        "Karte '{}' geladen ({} Layer)",
        state.document.name,
        state.document.layer_names().count()
    );
    Ok(())
}

/// Speichert das Dokument als Layer-Dateien in ein Verzeichnis.
pub fn save_map(state: &AppState, path: &std::path::Path) -> Result<()> {
    storage::save_map_directory(&state.document, path)
}

/// Total-State-Restore aus einem Memento: Layer wholesale ersetzen,
/// Registry, Frame-Tree und Viewer-Zustand neu ableiten.
pub fn restore(state: &mut AppState, memento: Memento) {
    let (layers, viewer) = memento.into_parts();
    state.document.replace_layers(layers);
    state.registry = HandlerRegistry::for_document(&mut state.document);
    state.viewer = viewer;
    state.rebuild_frame_tree();
}

/// Fuehrt einen Undo-Schritt aus, falls vorhanden.
pub fn undo(state: &mut AppState) {
    if let Some(memento) = state.history.undo() {
        restore(state, memento);
        log::info!("Undo ausgefuehrt");
    } else {
        log::debug!("Undo: nichts zu tun");
    }
}

/// Stellt einen rueckgaengig gemachten Zustand wieder her.
pub fn redo(state: &mut AppState) {
    if let Some(memento) = state.history.redo() {
        restore(state, memento);
        log::info!("Redo ausgefuehrt");
    } else {
        log::debug!("Redo: nichts zu tun");
    }
}
