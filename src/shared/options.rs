//! Zentrale Konfiguration des Map-Editor-Kerns.
//!
//! `EditorOptions` enthaelt alle zur Laufzeit aenderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── History ─────────────────────────────────────────────────────────

/// Maximale Anzahl gehaltener Undo-Snapshots.
pub const HISTORY_CAPACITY: usize = 100;

// ── Tiles ───────────────────────────────────────────────────────────

/// Fuell-Typ fuer neu angelegte Tiles.
pub const DEFAULT_FILL: &str = "floor";
/// Fuell-Typ, mit dem Cut die ausgeschnittenen Tiles uebermalt.
pub const CUT_FILL: &str = "asphalt";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit aenderbaren Editor-Optionen.
/// Wird als `dt_map_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorOptions {
    /// Kapazitaet der Undo/Redo-History
    pub history_capacity: usize,
    /// Fuell-Typ fuer neu angelegte Tiles
    pub default_fill: String,
    /// Fuell-Typ beim Ausschneiden von Tiles
    pub cut_fill: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            default_fill: DEFAULT_FILL.to_string(),
            cut_fill: CUT_FILL.to_string(),
        }
    }
}

impl EditorOptions {
    /// Laedt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("dt_map_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("dt_map_editor.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip() {
        let mut options = EditorOptions::default();
        options.history_capacity = 25;
        let text = toml::to_string_pretty(&options).expect("serialisierbar");
        let restored: EditorOptions = toml::from_str(&text).expect("parsebar");
        assert_eq!(restored.history_capacity, 25);
        assert_eq!(restored.default_fill, DEFAULT_FILL);
    }

    #[test]
    fn fehlende_datei_liefert_defaults() {
        let options =
            EditorOptions::load_from_file(std::path::Path::new("/nirgendwo/dt.toml"));
        assert_eq!(options.history_capacity, HISTORY_CAPACITY);
    }
}
