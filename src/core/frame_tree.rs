//! Frame-Tree: Vorgaenger/Nachfolger-Index ueber Frame-Namen.
//!
//! Der Tree haelt ausschliesslich Namens-Kanten ("Nachfolger ist relativ zu
//! Vorgaenger positioniert") und keine Entity-Daten; er ist jederzeit aus dem
//! `frames`-Layer rekonstruierbar. Die Engine haelt ihn synchron, sobald sich
//! `relative_to` oder die Existenz eines Frames aendert.

use anyhow::{bail, Result};
use indexmap::{IndexMap, IndexSet};

use super::layer::Layer;

/// Gerichteter Graph mit Single-Parent-Invariante: jeder Frame hat zu
/// jedem Zeitpunkt hoechstens einen direkten Vorgaenger.
#[derive(Debug, Clone, Default)]
pub struct FrameTree {
    /// Nachfolger → Vorgaenger
    parent: IndexMap<String, String>,
    /// Vorgaenger → direkte Nachfolger
    children: IndexMap<String, IndexSet<String>>,
}

impl FrameTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fuegt die Kante `predecessor → successor` ein.
    /// Eine bestehende Vorgaenger-Kante von `successor` wird ersetzt.
    pub fn add(&mut self, successor: &str, predecessor: &str) {
        self.detach(successor);
        self.parent
            .insert(successor.to_string(), predecessor.to_string());
        self.children
            .entry(predecessor.to_string())
            .or_default()
            .insert(successor.to_string());
    }

    /// Entfernt nur die Vorgaenger-Kante von `name` (Kind-Kanten bleiben).
    pub fn detach(&mut self, name: &str) {
        if let Some(old_parent) = self.parent.shift_remove(name) {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.shift_remove(name);
            }
        }
    }

    /// Eindeutiger Vorgaenger eines Frames.
    /// Fehlt nur fuer den Root-Frame des Dokuments.
    pub fn predecessor(&self, name: &str) -> Result<&str> {
        match self.parent.get(name) {
            Some(parent) => Ok(parent),
            None => bail!("Frame '{}' hat keinen Vorgaenger", name),
        }
    }

    /// Direkte Nachfolger eines Frames.
    pub fn successors(&self, name: &str) -> Vec<String> {
        self.children
            .get(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Transitive Huelle aller Nachfolger, Reihenfolge unspezifiziert.
    ///
    /// Das Visited-Set terminiert die Traversierung auch auf fehlerhaften
    /// Zyklen — Zyklen verletzen die Invariante, duerfen die Datenstruktur
    /// aber nicht in eine Endlosschleife treiben.
    pub fn all_successors(&self, name: &str) -> Vec<String> {
        let mut visited: IndexSet<String> = IndexSet::new();
        let mut queue: Vec<String> = self.successors(name);
        while let Some(current) = queue.pop() {
            if current == name || !visited.insert(current.clone()) {
                continue;
            }
            queue.extend(self.successors(&current));
        }
        visited.into_iter().collect()
    }

    /// Entfernt den Knoten samt aller anliegenden Kanten.
    /// Nachfolger werden nicht rekursiv geloescht; was mit verwaisten
    /// Kindern passiert, entscheidet die Engine.
    pub fn remove(&mut self, name: &str) {
        self.detach(name);
        if let Some(orphans) = self.children.shift_remove(name) {
            for orphan in orphans {
                self.parent.shift_remove(&orphan);
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parent.contains_key(name) || self.children.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.parent.clear();
        self.children.clear();
    }

    /// Baut den Tree vollstaendig aus einem `frames`-Layer neu auf.
    ///
    /// Frames ohne `relative_to` bekommen, wenn ihr Name ein `/`-Praefix
    /// traegt, dieses Praefix als Vorgaenger; sonst gelten sie als Root.
    pub fn rebuild_from_layer(&mut self, frames: &Layer) {
        self.clear();
        for (name, config) in frames.iter() {
            match config.relative_to() {
                Some(parent) if !parent.is_empty() => self.add(name, parent),
                _ => {
                    if let Some((prefix, _)) = name.rsplit_once('/') {
                        self.add(name, prefix);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::EntityConfig;
    use crate::core::pose::Pose;

    fn tree_a_b_c() -> FrameTree {
        // map_1 → a → b, a → c
        let mut tree = FrameTree::new();
        tree.add("map_1/a", "map_1");
        tree.add("map_1/b", "map_1/a");
        tree.add("map_1/c", "map_1/a");
        tree
    }

    #[test]
    fn predecessor_liefert_eindeutigen_vorgaenger() {
        let tree = tree_a_b_c();
        assert_eq!(tree.predecessor("map_1/b").unwrap(), "map_1/a");
        assert!(tree.predecessor("map_1").is_err());
    }

    #[test]
    fn add_ersetzt_bestehende_vorgaenger_kante() {
        let mut tree = tree_a_b_c();
        tree.add("map_1/b", "map_1");
        assert_eq!(tree.predecessor("map_1/b").unwrap(), "map_1");
        // b darf nicht mehr als Kind von a gefuehrt werden
        assert!(!tree.successors("map_1/a").contains(&"map_1/b".to_string()));
    }

    #[test]
    fn all_successors_ist_transitiv() {
        let tree = tree_a_b_c();
        let mut successors = tree.all_successors("map_1");
        successors.sort();
        assert_eq!(successors, vec!["map_1/a", "map_1/b", "map_1/c"]);
    }

    #[test]
    fn all_successors_terminiert_auf_zyklus() {
        let mut tree = FrameTree::new();
        tree.add("a", "b");
        tree.add("b", "c");
        // Invariantenbruch von Hand herbeigefuehrt
        tree.add("c", "a");
        let successors = tree.all_successors("a");
        assert!(successors.len() <= 3);
    }

    #[test]
    fn remove_kappt_kanten_ohne_rekursives_loeschen() {
        let mut tree = tree_a_b_c();
        tree.remove("map_1/a");
        assert!(!tree.successors("map_1").contains(&"map_1/a".to_string()));
        assert!(tree.predecessor("map_1/b").is_err());
        assert!(tree.predecessor("map_1/c").is_err());
    }

    #[test]
    fn rebuild_aus_frames_layer() {
        let mut frames = Layer::new();
        let mut root = EntityConfig::new();
        root.set_pose(Pose::default());
        root.set_relative_to("");
        frames.insert("map_1", root);

        let mut sign = EntityConfig::new();
        sign.set_pose(Pose::at(1.0, 2.0));
        sign.set_relative_to("map_1");
        frames.insert("map_1/sign1", sign);

        let mut tree = FrameTree::new();
        tree.rebuild_from_layer(&frames);
        assert_eq!(tree.predecessor("map_1/sign1").unwrap(), "map_1");
        assert!(tree.predecessor("map_1").is_err());
    }
}
