//! Interaction controller: the single mutator of a staging scene.
//!
//! The controller owns the scene for the photo currently open and the
//! explicit `SessionContext` (selection, view mode, theme). Every user
//! action, whether it comes from a tool, a shortcut or a direct call, ends
//! up as one of the methods below or as a `StageAction` passed to `apply`.
//!
//! ## States
//!
//! | State | Condition |
//! |-------|-----------|
//! | `Browsing` | no photo open |
//! | `EditingUnselected` | photo open, editing, nothing selected |
//! | `EditingSelected` | photo open, editing, one instance selected |
//! | `Comparing` | photo open, before/after view (selection kept but inert) |

use crate::compare::{CompareView, RenderRequest};
use serde::{Deserialize, Serialize};
use stage_core::{
    Catalog, InstanceId, ItemId, PhotoRef, PlacedInstance, Position, Result, Scene,
    SceneSnapshot, StageError, StagingConfig, TransformPatch,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Editing,
    Comparing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Observable interaction state, derived from the scene and context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingState {
    Browsing,
    EditingUnselected,
    EditingSelected,
    Comparing,
}

/// Per-session UI state passed around explicitly instead of living in
/// component-local flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionContext {
    /// At most one selected instance; always refers to an instance in the scene.
    pub selected: Option<InstanceId>,
    pub view_mode: ViewMode,
    pub theme: Theme,
}

/// A mutation request against the open scene.
#[derive(Debug, Clone, PartialEq)]
pub enum StageAction {
    /// Place a catalog item; `None` uses the configured drop position.
    Add {
        item: ItemId,
        position: Option<Position>,
    },
    Remove(InstanceId),
    Select(InstanceId),
    DeselectAll,
    /// Pointer-move update: replaces the instance's position.
    Drag {
        id: InstanceId,
        position: Position,
    },
    Transform {
        id: InstanceId,
        patch: TransformPatch,
    },
    BringToFront(InstanceId),
    BringForward(InstanceId),
    SendBackward(InstanceId),
    Duplicate(InstanceId),
    ToggleCompare,
}

pub struct InteractionController {
    catalog: Arc<Catalog>,
    config: StagingConfig,
    /// The scene for the open photo; `None` while browsing.
    scene: Option<Scene>,
    context: SessionContext,
}

impl InteractionController {
    pub fn new(catalog: Arc<Catalog>, config: StagingConfig) -> Self {
        Self {
            catalog,
            config,
            scene: None,
            context: SessionContext::default(),
        }
    }

    // ─── Session lifecycle ───────────────────────────────────────────────

    /// Start staging `photo` with an empty scene. Replaces any open scene.
    pub fn open_photo(&mut self, photo: PhotoRef) {
        log::debug!("opened {photo} for staging");
        self.scene = Some(Scene::new(photo));
        self.reset_context();
    }

    /// Open a previously saved scene. Nothing is selected afterwards.
    pub fn restore(&mut self, snapshot: SceneSnapshot) -> Result<()> {
        let scene = Scene::restore(snapshot)?;
        log::debug!(
            "restored {} with {} instances",
            scene.photo(),
            scene.len()
        );
        self.scene = Some(scene);
        self.reset_context();
        Ok(())
    }

    /// Clear every placement on the open photo. No-op while browsing.
    pub fn reset(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        scene.clear();
        log::debug!("reset staging for {}", scene.photo());
        self.reset_context();
    }

    /// Close the staging screen. The scene is discarded.
    pub fn close(&mut self) {
        if let Some(scene) = self.scene.take() {
            log::debug!("closed staging for {}", scene.photo());
        }
        self.reset_context();
    }

    /// Selection and view mode start fresh; the theme carries over.
    fn reset_context(&mut self) {
        self.context = SessionContext {
            theme: self.context.theme,
            ..SessionContext::default()
        };
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &StagingConfig {
        &self.config
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn selected(&self) -> Option<InstanceId> {
        self.context.selected
    }

    /// The selected instance, if any.
    pub fn selected_instance(&self) -> Option<&PlacedInstance> {
        let id = self.context.selected?;
        self.scene.as_ref()?.get(id)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.context.view_mode
    }

    pub fn state(&self) -> StagingState {
        if self.scene.is_none() {
            StagingState::Browsing
        } else if self.context.view_mode == ViewMode::Comparing {
            StagingState::Comparing
        } else if self.context.selected.is_some() {
            StagingState::EditingSelected
        } else {
            StagingState::EditingUnselected
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.context.theme = theme;
    }

    // ─── Scene operations ────────────────────────────────────────────────

    /// Place a catalog item and select it.
    pub fn add_instance(&mut self, item: ItemId, position: Position) -> Result<InstanceId> {
        let scene = self.scene.as_mut().ok_or(StageError::NoActiveScene)?;
        let id = scene.add_instance(&self.catalog, item, position)?;
        self.context.selected = Some(id);
        Ok(id)
    }

    /// Catalog click: place the item at the configured drop position.
    pub fn add_from_catalog(&mut self, item: ItemId) -> Result<InstanceId> {
        self.add_instance(item, self.config.drop_position)
    }

    /// Remove an instance, clearing the selection if it pointed there.
    /// Never fails: missing ids and an empty session are no-ops.
    pub fn remove_instance(&mut self, id: InstanceId) -> Option<PlacedInstance> {
        let removed = self.scene.as_mut()?.remove_instance(id)?;
        if self.context.selected == Some(id) {
            self.context.selected = None;
        }
        Some(removed)
    }

    pub fn update_transform(&mut self, id: InstanceId, patch: TransformPatch) -> Result<()> {
        let scene = self.scene.as_mut().ok_or(StageError::NoActiveScene)?;
        scene.update_transform(id, patch)?;
        Ok(())
    }

    /// Replace the selection with `id`.
    pub fn select(&mut self, id: InstanceId) -> Result<()> {
        let scene = self.scene.as_ref().ok_or(StageError::NoActiveScene)?;
        if !scene.contains(id) {
            return Err(StageError::InstanceNotFound(id));
        }
        if self.context.selected != Some(id) {
            log::debug!("selected {id}");
        }
        self.context.selected = Some(id);
        Ok(())
    }

    /// Clear the selection. Always succeeds.
    pub fn deselect_all(&mut self) {
        if let Some(id) = self.context.selected.take() {
            log::debug!("deselected {id}");
        }
    }

    /// One pointer-move step: the new position replaces the previous one.
    pub fn drag_update(&mut self, id: InstanceId, position: Position) -> Result<()> {
        log::trace!("drag {id} to ({}, {})", position.x, position.y);
        self.update_transform(id, TransformPatch::position(position))
    }

    pub fn bring_to_front(&mut self, id: InstanceId) -> Result<()> {
        let scene = self.scene.as_mut().ok_or(StageError::NoActiveScene)?;
        scene.bring_to_front(id)
    }

    pub fn bring_forward(&mut self, id: InstanceId) -> Result<bool> {
        let scene = self.scene.as_mut().ok_or(StageError::NoActiveScene)?;
        scene.bring_forward(id)
    }

    pub fn send_backward(&mut self, id: InstanceId) -> Result<bool> {
        let scene = self.scene.as_mut().ok_or(StageError::NoActiveScene)?;
        scene.send_backward(id)
    }

    /// Duplicate an instance and select the copy.
    pub fn duplicate(&mut self, id: InstanceId) -> Result<InstanceId> {
        let scene = self.scene.as_mut().ok_or(StageError::NoActiveScene)?;
        let copy = scene.duplicate_instance(id, self.config.duplicate_offset)?;
        self.context.selected = Some(copy);
        Ok(copy)
    }

    /// Flip between editing and the before/after view. Scene state and
    /// selection are untouched.
    pub fn toggle_compare(&mut self) -> Result<ViewMode> {
        if self.scene.is_none() {
            return Err(StageError::NoActiveScene);
        }
        self.context.view_mode = match self.context.view_mode {
            ViewMode::Editing => ViewMode::Comparing,
            ViewMode::Comparing => ViewMode::Editing,
        };
        log::debug!("view mode -> {:?}", self.context.view_mode);
        Ok(self.context.view_mode)
    }

    /// Dispatch an action. Returns the id of a newly created instance for
    /// `Add` and `Duplicate`.
    pub fn apply(&mut self, action: StageAction) -> Result<Option<InstanceId>> {
        match action {
            StageAction::Add { item, position } => {
                let position = position.unwrap_or(self.config.drop_position);
                return self.add_instance(item, position).map(Some);
            }
            StageAction::Duplicate(id) => return self.duplicate(id).map(Some),
            StageAction::Remove(id) => {
                self.remove_instance(id);
            }
            StageAction::Select(id) => self.select(id)?,
            StageAction::DeselectAll => self.deselect_all(),
            StageAction::Drag { id, position } => self.drag_update(id, position)?,
            StageAction::Transform { id, patch } => self.update_transform(id, patch)?,
            StageAction::BringToFront(id) => self.bring_to_front(id)?,
            StageAction::BringForward(id) => {
                self.bring_forward(id)?;
            }
            StageAction::SendBackward(id) => {
                self.send_backward(id)?;
            }
            StageAction::ToggleCompare => {
                self.toggle_compare()?;
            }
        }
        Ok(None)
    }

    // ─── Collaborator hand-off ───────────────────────────────────────────

    /// Detached `{ photoRef, instances }` copy for persistence.
    pub fn snapshot(&self) -> Result<SceneSnapshot> {
        self.scene
            .as_ref()
            .map(Scene::snapshot)
            .ok_or(StageError::NoActiveScene)
    }

    /// The unrendered "after" image for the export service.
    pub fn render_request(&self) -> Result<RenderRequest> {
        Ok(RenderRequest::new(self.snapshot()?, self.context.theme))
    }

    pub fn compare_view(&self) -> Result<CompareView> {
        Ok(CompareView::new(self.render_request()?))
    }
}
