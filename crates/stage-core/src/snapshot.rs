//! Scene snapshots exchanged with persistence and export collaborators.
//!
//! A snapshot is a detached copy: once taken, the scene it came from can
//! keep changing without affecting it.

use crate::error::Result;
use crate::model::{PhotoRef, PlacedInstance};
use serde::{Deserialize, Serialize};

/// `{ photoRef, instances }`, instances in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub photo_ref: PhotoRef,
    pub instances: Vec<PlacedInstance>,
}

impl SceneSnapshot {
    /// An empty scene for `photo_ref`.
    pub fn empty(photo_ref: PhotoRef) -> Self {
        Self {
            photo_ref,
            instances: Vec::new(),
        }
    }

    /// Encode as MessagePack with field names, for transport and storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
