//! Editor-Modusflags als explizites Wertobjekt.
//!
//! Kein prozessweiter Zustand: der `EditorState` gehoert dem `AppState`
//! und wird per Referenz weitergereicht, wo er gebraucht wird.

/// Aktiver Zeichenmodus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    /// Kein Werkzeug aktiv (Selektieren/Verschieben)
    #[default]
    Idle,
    /// Pinsel: Tile-Selektion wird mit dem Default-Fill uebermalt
    Brush,
}

/// Modusflags der Editor-Sitzung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorState {
    /// Aktiver Zeichenmodus
    pub draw_state: DrawState,
    /// Karte wird verschoben statt selektiert
    pub is_move: bool,
    /// Debug-Anzeige aktiv
    pub debug_mode: bool,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_move(&mut self, value: bool) {
        self.is_move = value;
    }
}
