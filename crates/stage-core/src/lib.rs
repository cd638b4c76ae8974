pub mod catalog;
pub mod config;
pub mod error;
pub mod id;
pub mod model;
pub mod snapshot;
pub mod transform;

pub use catalog::{Catalog, Category, FurnitureCatalogItem};
pub use config::{CanvasSize, StagingConfig};
pub use error::{Result, StageError};
pub use id::{InstanceId, ItemId};
pub use model::*;
pub use snapshot::SceneSnapshot;
pub use transform::{Position, TransformPatch};
