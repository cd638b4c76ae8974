pub mod browser;
pub mod compare;
pub mod gateway;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use browser::{BrowseMode, CatalogBrowser};
pub use compare::{CompareView, RenderRequest};
pub use gateway::{
    ExportRejected, ExportService, ExportedImage, MemoryGateway, MemoryGatewayError,
    PersistenceGateway, RecordingExporter, SceneId, export_scene, save_scene,
};
pub use input::{InputEvent, Modifiers};
pub use session::{
    InteractionController, SessionContext, StageAction, StagingState, Theme, ViewMode,
};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::PlacementTool;
