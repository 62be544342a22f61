//! Use-Cases: fachliche Operationen auf dem `AppState`.

pub mod clipboard;
pub mod map_io;
pub mod objects;
