//! Collaborator boundaries: scene persistence and image export.
//!
//! Both collaborators are asynchronous. The helpers here take the snapshot
//! synchronously and return a future that owns it, so the controller is
//! free to keep mutating the scene while a save or export is in flight.
//! Dropping that future cancels the request and leaves the scene alone.
//!
//! Collaborator errors pass through untouched: each trait names its own
//! error type and the helpers return it as-is.

use crate::compare::RenderRequest;
use crate::session::InteractionController;
use serde::{Deserialize, Serialize};
use stage_core::{SceneSnapshot, StageError};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Identifier handed out by the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a composited image produced by the export service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedImage {
    pub uri: String,
}

pub trait PersistenceGateway {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save(
        &self,
        snapshot: SceneSnapshot,
    ) -> impl Future<Output = Result<SceneId, Self::Error>> + Send;

    fn load(&self, id: &SceneId) -> impl Future<Output = Result<SceneSnapshot, Self::Error>> + Send;
}

pub trait ExportService {
    type Error: std::error::Error + Send + Sync + 'static;

    fn export(
        &self,
        request: RenderRequest,
    ) -> impl Future<Output = Result<ExportedImage, Self::Error>> + Send;
}

/// Snapshot the open scene and start saving it.
///
/// Fails up front only if no photo is open. The returned future does not
/// borrow the controller.
pub fn save_scene<'g, G: PersistenceGateway>(
    gateway: &'g G,
    controller: &InteractionController,
) -> stage_core::Result<impl Future<Output = Result<SceneId, G::Error>> + Send + use<'g, G>> {
    let snapshot = controller.snapshot()?;
    log::debug!(
        "saving {} ({} instances)",
        snapshot.photo_ref,
        snapshot.instances.len()
    );
    Ok(gateway.save(snapshot))
}

/// Build the render request for the open scene and start exporting it.
pub fn export_scene<'e, E: ExportService>(
    exporter: &'e E,
    controller: &InteractionController,
) -> stage_core::Result<impl Future<Output = Result<ExportedImage, E::Error>> + Send + use<'e, E>>
{
    let request = controller.render_request()?;
    log::debug!("exporting {}", request.photo_ref);
    Ok(exporter.export(request))
}

// ─── In-memory implementations ───────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryGatewayError {
    #[error("no saved scene with id '{0}'")]
    UnknownScene(SceneId),
    #[error(transparent)]
    Codec(#[from] StageError),
}

/// Persistence gateway that keeps MessagePack-encoded snapshots in memory.
/// An optional latency simulates a remote store.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    scenes: Mutex<HashMap<SceneId, Vec<u8>>>,
    next_id: AtomicU64,
    latency: Option<Duration>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub async fn saved_count(&self) -> usize {
        self.scenes.lock().await.len()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl PersistenceGateway for MemoryGateway {
    type Error = MemoryGatewayError;

    async fn save(&self, snapshot: SceneSnapshot) -> Result<SceneId, Self::Error> {
        let bytes = snapshot.to_bytes()?;
        self.delay().await;
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let id = SceneId(format!("scene_{n}"));
        self.scenes.lock().await.insert(id.clone(), bytes);
        log::debug!("saved {id}");
        Ok(id)
    }

    async fn load(&self, id: &SceneId) -> Result<SceneSnapshot, Self::Error> {
        self.delay().await;
        let scenes = self.scenes.lock().await;
        let bytes = scenes
            .get(id)
            .ok_or_else(|| MemoryGatewayError::UnknownScene(id.clone()))?;
        Ok(SceneSnapshot::from_bytes(bytes)?)
    }
}

#[derive(Debug, Error)]
#[error("export rejected: {0}")]
pub struct ExportRejected(pub String);

/// Export service that records requests instead of compositing them.
#[derive(Debug, Default)]
pub struct RecordingExporter {
    requests: Mutex<Vec<RenderRequest>>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().await.clone()
    }
}

impl ExportService for RecordingExporter {
    type Error = ExportRejected;

    async fn export(&self, request: RenderRequest) -> Result<ExportedImage, Self::Error> {
        if request.instances.is_empty() {
            return Err(ExportRejected(format!("{} has nothing staged", request.photo_ref)));
        }
        let mut requests = self.requests.lock().await;
        requests.push(request);
        Ok(ExportedImage {
            uri: format!("memory://exports/{}", requests.len()),
        })
    }
}
