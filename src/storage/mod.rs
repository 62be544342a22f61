//! Laden und Speichern von Karten: eine YAML-Datei pro Layer.
//!
//! Pflicht sind `tiles.yaml`, `frames.yaml` und `tile_maps.yaml`; fehlt
//! eine davon, schlaegt das Laden fehl, bevor irgendetwas uebernommen
//! wird. Unbekannte Layer-Dateien werden generisch geladen und beim
//! Speichern unveraendert wieder herausgeschrieben.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::schema::REQUIRED_LAYERS;
use crate::core::{Layer, MapDocument};

/// Laedt ein Kartenverzeichnis in ein frisches Dokument.
/// Der Kartenname ist der Verzeichnisname.
pub fn load_map_directory(path: &Path) -> Result<MapDocument> {
    let map_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("map_1");

    for required in REQUIRED_LAYERS {
        let layer_path = path.join(format!("{}.yaml", required));
        if !layer_path.is_file() {
            bail!(
                "Kartenverzeichnis {}: Pflichtdatei {}.yaml fehlt",
                path.display(),
                required
            );
        }
    }

    let mut layer_files: Vec<std::path::PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("Kartenverzeichnis {} nicht lesbar", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("yaml"))
        .collect();
    layer_files.sort();

    let mut document = MapDocument::new(map_name);
    for layer_path in layer_files {
        let Some(layer_name) = layer_path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let content = std::fs::read_to_string(&layer_path)
            .with_context(|| format!("Layer-Datei {} nicht lesbar", layer_path.display()))?;
        // Leere Dateien parsen zu None
        let layer: Layer = serde_yaml::from_str::<Option<Layer>>(&content)
            .with_context(|| format!("Layer-Datei {} fehlerhaft", layer_path.display()))?
            .unwrap_or_default();
        log::debug!("Layer '{}' geladen: {} Entities", layer_name, layer.len());
        document.insert_layer(layer_name.to_string(), layer);
    }

    Ok(document)
}

/// Schreibt jedes Layer des Dokuments als `<layer>.yaml` ins Verzeichnis.
pub fn save_map_directory(document: &MapDocument, path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Kartenverzeichnis {} nicht anlegbar", path.display()))?;
    for (layer_name, layer) in document.layers() {
        let layer_path = path.join(format!("{}.yaml", layer_name));
        let content = serde_yaml::to_string(layer)
            .with_context(|| format!("Layer '{}' nicht serialisierbar", layer_name))?;
        std::fs::write(&layer_path, content)
            .with_context(|| format!("Layer-Datei {} nicht schreibbar", layer_path.display()))?;
    }
    log::info!(
        "Karte '{}' gespeichert nach {}",
        document.name,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{FRAMES, TILES, TILE_MAPS};
    use crate::core::EntityConfig;

    fn minimal_document() -> MapDocument {
        let mut document = MapDocument::new("tm1");
        let tiles = document.ensure_layer(TILES);
        let mut tile: EntityConfig = [("i", 0i64), ("j", 0i64)].into_iter().collect();
        tile.set("type", "grass");
        tiles.insert("tm1/tile_0_0", tile);

        let frames = document.ensure_layer(FRAMES);
        let mut frame = EntityConfig::new();
        frame.set_pose(crate::core::Pose::at(0.0, 0.0));
        frame.set_relative_to("tm1");
        frames.insert("tm1/tile_0_0", frame);

        let tile_maps = document.ensure_layer(TILE_MAPS);
        let mut tile_map = EntityConfig::new();
        tile_map.set_tile_size(glam::DVec2::splat(0.585));
        tile_maps.insert("tm1", tile_map);

        document
    }

    #[test]
    fn roundtrip_ueber_verzeichnis() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let map_dir = dir.path().join("tm1");
        let document = minimal_document();
        save_map_directory(&document, &map_dir).expect("speicherbar");

        let loaded = load_map_directory(&map_dir).expect("ladbar");
        assert_eq!(loaded.name, "tm1");
        let tile = loaded
            .layer(TILES)
            .and_then(|layer| layer.get("tm1/tile_0_0"))
            .expect("Tile erwartet");
        assert_eq!(tile.type_name(), Some("grass"));
        assert_eq!(tile.tile_index(), Some((0, 0)));
    }

    #[test]
    fn fehlende_pflichtdatei_bricht_ab() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let map_dir = dir.path().join("tm1");
        let document = minimal_document();
        save_map_directory(&document, &map_dir).expect("speicherbar");
        std::fs::remove_file(map_dir.join("frames.yaml")).expect("loeschbar");

        let result = load_map_directory(&map_dir);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("frames.yaml"));
    }

    #[test]
    fn unbekannte_layer_datei_wird_generisch_geladen() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let map_dir = dir.path().join("tm1");
        save_map_directory(&minimal_document(), &map_dir).expect("speicherbar");
        std::fs::write(
            map_dir.join("decorations.yaml"),
            "tm1/deco1:\n  kind: tree\n  height: 0.3\n",
        )
        .expect("schreibbar");

        let loaded = load_map_directory(&map_dir).expect("ladbar");
        let deco = loaded
            .layer("decorations")
            .and_then(|layer| layer.get("tm1/deco1"))
            .expect("Entity erwartet");
        assert_eq!(
            deco.get("kind").and_then(crate::core::FieldValue::as_str),
            Some("tree")
        );
    }

    #[test]
    fn leere_layer_datei_ist_leerer_layer() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis");
        let map_dir = dir.path().join("tm1");
        save_map_directory(&minimal_document(), &map_dir).expect("speicherbar");
        std::fs::write(map_dir.join("citizens.yaml"), "").expect("schreibbar");

        let loaded = load_map_directory(&map_dir).expect("ladbar");
        assert!(loaded.layer("citizens").is_some_and(Layer::is_empty));
    }
}
