//! Core-Domaenentypen: Feldwerte, Entities, Layer, Frame-Tree, Transformation.

pub mod entity;
pub mod field;
pub mod frame_tree;
pub mod layer;
pub mod pose;
/// Layer-Schemata mit Default-Konfigurationen und Enum-Wertebereichen.
pub mod schema;
pub mod transform;

pub use entity::EntityConfig;
pub use field::{FieldType, FieldValue};
pub use frame_tree::FrameTree;
pub use layer::{Layer, MapDocument};
pub use pose::Pose;
pub use schema::LayerSchema;
pub use transform::CoordinatesTransformer;
