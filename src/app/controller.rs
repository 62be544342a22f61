//! Zentraler Controller: einziger Mutations-Einstiegspunkt des Kerns.
//!
//! Alle Mutationen laufen als `LayerCommand` durch die Handler-Registry.
//! Der Controller haelt als Folgeschritt den Frame-Tree synchron und
//! verhindert Kanten auf nicht existierende oder zyklische Vorgaenger,
//! bevor etwas geschrieben wird.

use anyhow::Result;
use glam::DVec2;

use crate::core::schema::FRAMES;
use crate::core::EntityConfig;

use super::commands::{CommandResult, LayerCommand};
use super::state::AppState;
use super::use_cases;

/// Fuehrt einen Command aus und haelt den Frame-Tree synchron.
///
/// Freistehende Funktion, damit Use-Cases denselben Pfad nehmen wie
/// externe Aufrufer.
pub(crate) fn dispatch_command(
    state: &mut AppState,
    command: LayerCommand,
) -> Result<CommandResult> {
    state.command_log.record(&command);

    if let Some(rejected) = validate_frame_reference(state, &command) {
        return Ok(rejected);
    }

    let result = state.registry.dispatch(&mut state.document, &command)?;
    if result.is_applied() {
        sync_frame_tree(state, &command);
    }
    Ok(result)
}

/// Prueft Vorgaenger-Referenzen, bevor eine Frame-Tree-Kante entstehen
/// wuerde: der Vorgaenger muss existieren (oder der Kartenname sein) und
/// darf keinen Zyklus erzeugen.
fn validate_frame_reference(state: &AppState, command: &LayerCommand) -> Option<CommandResult> {
    let (frame_name, relative_to) = match command {
        LayerCommand::SetRelativeTo {
            frame_name,
            relative_to,
        } => (frame_name.as_str(), relative_to.clone()),
        LayerCommand::ChangeConfig {
            layer_name,
            object_name,
            new_config,
        } if layer_name == FRAMES => match new_config.relative_to() {
            Some(parent) => (object_name.as_str(), parent.to_string()),
            None => return None,
        },
        _ => return None,
    };

    if relative_to.is_empty() {
        return None;
    }
    let exists = relative_to == state.document.name
        || state
            .layer(FRAMES)
            .is_some_and(|frames| frames.contains(&relative_to));
    if !exists {
        log::warn!(
            "relative_to '{}' von '{}' referenziert keinen Frame",
            relative_to,
            frame_name
        );
        return Some(CommandResult::Rejected);
    }
    if relative_to == frame_name
        || state
            .frame_tree
            .all_successors(frame_name)
            .contains(&relative_to)
    {
        log::warn!(
            "relative_to '{}' wuerde einen Zyklus unter '{}' erzeugen",
            relative_to,
            frame_name
        );
        return Some(CommandResult::Rejected);
    }
    None
}

/// Folgeschritt nach einer angewendeten Mutation: Frame-Tree-Kanten an
/// den frames-Layer angleichen.
fn sync_frame_tree(state: &mut AppState, command: &LayerCommand) {
    match command {
        LayerCommand::SetRelativeTo {
            frame_name,
            relative_to,
        } => {
            if relative_to.is_empty() {
                state.frame_tree.detach(frame_name);
            } else {
                state.frame_tree.add(frame_name, relative_to);
            }
        }
        LayerCommand::ChangeConfig {
            layer_name,
            object_name,
            new_config,
        } if layer_name == FRAMES => {
            if let Some(parent) = new_config.relative_to() {
                if parent.is_empty() {
                    state.frame_tree.detach(object_name);
                } else {
                    state.frame_tree.add(object_name, parent);
                }
            }
        }
        LayerCommand::DeleteObject {
            layer_name,
            object_name,
        } if layer_name == FRAMES => {
            state.frame_tree.remove(object_name);
        }
        _ => {}
    }
}

/// Orchestriert die Operationen des Kerns auf dem `AppState`.
#[derive(Default)]
pub struct MapController;

impl MapController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Einziger Mutations-Einstiegspunkt fuer den UI-Kollaborateur.
    pub fn dispatch(
        &mut self,
        state: &mut AppState,
        command: LayerCommand,
    ) -> Result<CommandResult> {
        dispatch_command(state, command)
    }

    // ── Objekte ─────────────────────────────────────────────────────

    /// Legt ein Objekt samt Frame an und liefert den erzeugten Namen.
    /// `type_name` setzt optional das `type`-Feld (z.B. Schildtyp).
    pub fn add_object(
        &mut self,
        state: &mut AppState,
        layer_name: &str,
        type_name: Option<&str>,
    ) -> Result<String> {
        let name = use_cases::objects::add_object(state, layer_name, type_name)?;
        state.record_snapshot();
        Ok(name)
    }

    /// Loescht ein Objekt; direkte Kinder werden positionserhaltend auf
    /// den Karten-Root umgehaengt.
    pub fn delete_object(&mut self, state: &mut AppState, object_name: &str) -> Result<()> {
        use_cases::objects::delete_object(state, object_name)?;
        state.record_snapshot();
        Ok(())
    }

    /// Loescht alle selektierten Objekte.
    pub fn delete_selected(&mut self, state: &mut AppState) -> Result<()> {
        use_cases::objects::delete_selected(state)?;
        state.record_snapshot();
        Ok(())
    }

    /// Verschiebt ein Objekt auf eine absolute Weltposition.
    pub fn move_object(
        &mut self,
        state: &mut AppState,
        object_name: &str,
        absolute: DVec2,
    ) -> Result<CommandResult> {
        let result = use_cases::objects::move_object_absolute(state, object_name, absolute)?;
        state.record_snapshot();
        Ok(result)
    }

    /// Setzt den Yaw eines Objekts.
    pub fn rotate_object(
        &mut self,
        state: &mut AppState,
        object_name: &str,
        new_yaw: f64,
    ) -> Result<CommandResult> {
        let result = dispatch_command(
            state,
            LayerCommand::RotateObject {
                frame_name: object_name.to_string(),
                new_yaw,
            },
        )?;
        state.record_snapshot();
        Ok(result)
    }

    /// Verschiebt die Selektion um ein Welt-Delta (Nachfolger folgen
    /// implizit ueber die Frame-Kette).
    pub fn move_selection(&mut self, state: &mut AppState, delta: DVec2) -> Result<()> {
        use_cases::objects::move_selection_by(state, delta)?;
        state.record_snapshot();
        Ok(())
    }

    /// Dreht selektierte Tiles und Objekte um +90 Grad.
    pub fn rotate_selection(&mut self, state: &mut AppState) -> Result<()> {
        use_cases::objects::rotate_selection(state)?;
        state.record_snapshot();
        Ok(())
    }

    /// Uebermalt die Tile-Selektion mit einem Fuell-Typ.
    pub fn paint_selected_tiles(&mut self, state: &mut AppState, fill: &str) -> Result<()> {
        use_cases::objects::painting_tiles(state, fill)?;
        state.record_snapshot();
        Ok(())
    }

    /// Aendert Entity- und Frame-Konfiguration eines Objekts atomar.
    /// `false`, wenn eine der beiden Konfigurationen ungueltig ist —
    /// dann wurde nichts geschrieben.
    pub fn change_object(
        &mut self,
        state: &mut AppState,
        layer_name: &str,
        object_name: &str,
        new_config: &EntityConfig,
        new_frame: &EntityConfig,
    ) -> Result<bool> {
        let changed =
            use_cases::objects::change_object(state, layer_name, object_name, new_config, new_frame)?;
        if changed {
            state.record_snapshot();
        }
        Ok(changed)
    }

    // ── Clipboard ───────────────────────────────────────────────────

    /// Kopiert die aktuelle Auswahl in den Puffer.
    pub fn copy(&mut self, state: &mut AppState) {
        use_cases::clipboard::copy_selection(state);
    }

    /// Schneidet die Auswahl aus: kopieren, Tiles neutral uebermalen,
    /// Objekte loeschen.
    pub fn cut(&mut self, state: &mut AppState) -> Result<()> {
        use_cases::clipboard::cut_selection(state)?;
        state.record_snapshot();
        Ok(())
    }

    /// Fuegt den Pufferinhalt an der aktuellen Tile-Selektion ein.
    pub fn paste(&mut self, state: &mut AppState) -> Result<()> {
        use_cases::clipboard::paste(state)?;
        state.record_snapshot();
        Ok(())
    }

    // ── History ─────────────────────────────────────────────────────

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    pub fn push_snapshot(&mut self, state: &mut AppState) {
        state.record_snapshot();
    }

    /// Fuehrt einen Undo-Schritt aus, falls vorhanden.
    pub fn undo(&mut self, state: &mut AppState) {
        use_cases::map_io::undo(state);
    }

    /// Stellt einen rueckgaengig gemachten Zustand wieder her.
    pub fn redo(&mut self, state: &mut AppState) {
        use_cases::map_io::redo(state);
    }

    /// Verwirft die komplette History.
    pub fn clear_history(&mut self, state: &mut AppState) {
        state.history.clear();
    }

    // ── Karten ──────────────────────────────────────────────────────

    /// Erstellt eine neue Karte mit Tile-Gitter und Root-Frame.
    pub fn new_map(
        &mut self,
        state: &mut AppState,
        map_name: &str,
        size: (i64, i64),
        tile_size: DVec2,
    ) -> Result<()> {
        use_cases::map_io::new_map(state, map_name, size, tile_size)
    }

    /// Laedt eine Karte aus einem Verzeichnis. Schlaegt das Laden fehl,
    /// bleibt das bisherige Dokument unveraendert.
    pub fn open_map(&mut self, state: &mut AppState, path: &std::path::Path) -> Result<()> {
        use_cases::map_io::open_map(state, path)
    }
}
