//! Scene model for photo staging.
//!
//! A `Scene` is the ordered set of furniture placements on one property
//! photo. Instances are kept sorted by `z_order` ascending, which is also
//! paint order (last painted = topmost). The scene is rendering-independent:
//! it exposes state transitions only, and presentation layers read it.

use crate::catalog::Catalog;
use crate::error::{Result, StageError};
use crate::id::{InstanceId, ItemId};
use crate::snapshot::SceneSnapshot;
use crate::transform::{Position, TransformPatch};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ─── Photo reference ─────────────────────────────────────────────────────

/// Opaque identifier or URL of the photo being staged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ─── Placed instances ────────────────────────────────────────────────────

/// One placement of a catalog item on the photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedInstance {
    pub instance_id: InstanceId,
    /// Lookup-only reference into the catalog.
    pub catalog_item_id: ItemId,
    pub position: Position,
    /// Degrees in `[0, 360)`.
    pub rotation_degrees: f32,
    /// Uniform scale in `[0.1, 5]`.
    pub scale: f32,
    pub z_order: u32,
}

impl PlacedInstance {
    /// Apply an already-normalized patch. `z_order` is never touched.
    fn apply(&mut self, patch: TransformPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation_degrees = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
    }

    /// Normalize every transform field in place.
    fn normalize(&mut self) -> Result<()> {
        let patch = TransformPatch {
            position: Some(self.position),
            rotation: Some(self.rotation_degrees),
            scale: Some(self.scale),
        }
        .normalized()?;
        self.apply(patch);
        Ok(())
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// Placements for one photo-staging session.
#[derive(Debug, Clone)]
pub struct Scene {
    photo: PhotoRef,
    /// Sorted by `z_order` ascending.
    instances: Vec<PlacedInstance>,
    /// Last counter value handed out for `I{n}` ids. Never decreases, so
    /// ids are not reused after removal.
    next_instance: u64,
}

impl Scene {
    #[must_use]
    pub fn new(photo: PhotoRef) -> Self {
        Self {
            photo,
            instances: Vec::new(),
            next_instance: 0,
        }
    }

    /// Rebuild a scene from a snapshot. Transforms are normalized, instances
    /// re-sorted by `z_order` and renumbered `1..=n`, and duplicate instance
    /// ids rejected.
    ///
    /// Catalog ids are not checked: the reference is lookup-only and an item
    /// may have left the catalog since the snapshot was taken.
    pub fn restore(snapshot: SceneSnapshot) -> Result<Self> {
        let SceneSnapshot { photo_ref, mut instances } = snapshot;

        let mut seen = HashSet::with_capacity(instances.len());
        for inst in &mut instances {
            if !seen.insert(inst.instance_id) {
                return Err(StageError::validation(
                    "snapshot",
                    format!("duplicate instance id '{}'", inst.instance_id),
                ));
            }
            inst.normalize()?;
        }
        instances.sort_by_key(|i| i.z_order);

        let mut scene = Self {
            photo: photo_ref,
            next_instance: instances.len() as u64,
            instances,
        };
        scene.renumber_z();
        Ok(scene)
    }

    pub fn photo(&self) -> &PhotoRef {
        &self.photo
    }

    /// Instances in paint order (`z_order` ascending).
    pub fn instances(&self) -> &[PlacedInstance] {
        &self.instances
    }

    pub fn get(&self, id: InstanceId) -> Option<&PlacedInstance> {
        self.instances.iter().find(|i| i.instance_id == id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Highest `z_order` in the scene, or 0 when empty.
    pub fn max_z_order(&self) -> u32 {
        self.instances.last().map_or(0, |i| i.z_order)
    }

    /// Place a catalog item. The new instance gets rotation 0, scale 1 and
    /// sits on top of everything else.
    pub fn add_instance(
        &mut self,
        catalog: &Catalog,
        item: ItemId,
        position: Position,
    ) -> Result<InstanceId> {
        if !catalog.contains(item) {
            return Err(StageError::CatalogItemNotFound(item));
        }
        let position = position.normalized()?;
        let id = self.next_id();
        let z_order = self.next_z_order();
        self.instances.push(PlacedInstance {
            instance_id: id,
            catalog_item_id: item,
            position,
            rotation_degrees: 0.0,
            scale: 1.0,
            z_order,
        });
        log::debug!("added {id} ({item}) at ({}, {})", position.x, position.y);
        Ok(id)
    }

    /// Remove an instance. Missing ids are a no-op.
    pub fn remove_instance(&mut self, id: InstanceId) -> Option<PlacedInstance> {
        let pos = self.position_of(id)?;
        log::debug!("removed {id}");
        Some(self.instances.remove(pos))
    }

    /// Apply the provided fields of `patch`, normalized.
    pub fn update_transform(
        &mut self,
        id: InstanceId,
        patch: TransformPatch,
    ) -> Result<&PlacedInstance> {
        let pos = self
            .position_of(id)
            .ok_or(StageError::InstanceNotFound(id))?;
        let patch = patch.normalized()?;
        self.instances[pos].apply(patch);
        Ok(&self.instances[pos])
    }

    /// Move an instance on top of every other one (`z_order = max + 1`).
    pub fn bring_to_front(&mut self, id: InstanceId) -> Result<()> {
        let pos = self
            .position_of(id)
            .ok_or(StageError::InstanceNotFound(id))?;
        let z = self.next_z_order();
        let mut inst = self.instances.remove(pos);
        inst.z_order = z;
        self.instances.push(inst);
        Ok(())
    }

    /// Swap paint order with the next instance up.
    /// Returns false if the instance is already topmost.
    pub fn bring_forward(&mut self, id: InstanceId) -> Result<bool> {
        let pos = self
            .position_of(id)
            .ok_or(StageError::InstanceNotFound(id))?;
        if pos + 1 >= self.instances.len() {
            return Ok(false);
        }
        self.swap_z(pos, pos + 1);
        Ok(true)
    }

    /// Swap paint order with the next instance down.
    /// Returns false if the instance is already at the back.
    pub fn send_backward(&mut self, id: InstanceId) -> Result<bool> {
        let pos = self
            .position_of(id)
            .ok_or(StageError::InstanceNotFound(id))?;
        if pos == 0 {
            return Ok(false);
        }
        self.swap_z(pos - 1, pos);
        Ok(true)
    }

    /// Clone an instance (item, rotation, scale), offset on both axes and
    /// placed on top.
    pub fn duplicate_instance(&mut self, id: InstanceId, offset: f32) -> Result<InstanceId> {
        let original = self.get(id).ok_or(StageError::InstanceNotFound(id))?.clone();
        let position = original.position.offset(offset, offset).normalized()?;
        let new_id = self.next_id();
        let z_order = self.next_z_order();
        self.instances.push(PlacedInstance {
            instance_id: new_id,
            position,
            z_order,
            ..original
        });
        log::debug!("duplicated {id} as {new_id}");
        Ok(new_id)
    }

    /// Remove every instance. The id counter keeps running.
    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Detached copy of the scene for persistence and export.
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            photo_ref: self.photo.clone(),
            instances: self.instances.clone(),
        }
    }

    fn position_of(&self, id: InstanceId) -> Option<usize> {
        self.instances.iter().position(|i| i.instance_id == id)
    }

    fn next_id(&mut self) -> InstanceId {
        loop {
            self.next_instance += 1;
            let id = InstanceId::numbered(self.next_instance);
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// `max + 1`. When that would overflow, every instance is renumbered
    /// `1..=n` first; paint order is unchanged.
    fn next_z_order(&mut self) -> u32 {
        if let Some(z) = self.max_z_order().checked_add(1) {
            return z;
        }
        log::debug!("z_order exhausted on {}, renumbering", self.photo);
        self.renumber_z();
        self.max_z_order().saturating_add(1)
    }

    /// Assign `1..=n` in current paint order.
    fn renumber_z(&mut self) {
        for (z, inst) in (1..=u32::MAX).zip(self.instances.iter_mut()) {
            inst.z_order = z;
        }
    }

    /// Swap the z-orders of two adjacent slots (`lo < hi`) and their places.
    fn swap_z(&mut self, lo: usize, hi: usize) {
        let z_lo = self.instances[lo].z_order;
        self.instances[lo].z_order = self.instances[hi].z_order;
        self.instances[hi].z_order = z_lo;
        self.instances.swap(lo, hi);
    }
}
