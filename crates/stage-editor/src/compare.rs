//! Before/after comparison.
//!
//! Comparing is a view toggle only. "Before" is the untouched photo;
//! "after" is the photo plus its placements, handed unrendered to the
//! export service. No compositing happens here.

use crate::session::Theme;
use serde::{Deserialize, Serialize};
use stage_core::{PhotoRef, PlacedInstance, SceneSnapshot};

/// What an external renderer needs to composite the staged photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub photo_ref: PhotoRef,
    /// Paint order: first entry is painted first (bottom-most).
    pub instances: Vec<PlacedInstance>,
    pub theme: Theme,
}

impl RenderRequest {
    pub fn new(snapshot: SceneSnapshot, theme: Theme) -> Self {
        let SceneSnapshot {
            photo_ref,
            mut instances,
        } = snapshot;
        // Scenes already keep this order; snapshots from elsewhere may not.
        instances.sort_by_key(|i| i.z_order);
        Self {
            photo_ref,
            instances,
            theme,
        }
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            photo_ref: self.photo_ref.clone(),
            instances: self.instances.clone(),
        }
    }
}

/// The two panes of the comparison view.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareView {
    pub before: PhotoRef,
    pub after: RenderRequest,
}

impl CompareView {
    pub fn new(after: RenderRequest) -> Self {
        Self {
            before: after.photo_ref.clone(),
            after,
        }
    }

    /// True when the two panes would look identical.
    pub fn is_unstaged(&self) -> bool {
        self.after.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stage_core::{InstanceId, ItemId, Position};

    fn inst(id: &str, z: u32) -> PlacedInstance {
        PlacedInstance {
            instance_id: InstanceId::intern(id),
            catalog_item_id: ItemId::intern("sofa1"),
            position: Position::CENTER,
            rotation_degrees: 0.0,
            scale: 1.0,
            z_order: z,
        }
    }

    #[test]
    fn render_request_is_in_paint_order() {
        let req = RenderRequest::new(
            SceneSnapshot {
                photo_ref: "p.jpg".into(),
                instances: vec![inst("I2", 9), inst("I1", 3)],
            },
            Theme::Light,
        );
        let ids: Vec<_> = req.instances.iter().map(|i| i.instance_id.as_str()).collect();
        assert_eq!(ids, ["I1", "I2"]);
    }

    #[test]
    fn before_pane_is_the_bare_photo() {
        let view = CompareView::new(RenderRequest::new(
            SceneSnapshot {
                photo_ref: "p.jpg".into(),
                instances: vec![inst("I1", 1)],
            },
            Theme::Dark,
        ));
        assert_eq!(view.before.as_str(), "p.jpg");
        assert!(!view.is_unstaged());
        assert_eq!(view.after.theme, Theme::Dark);
    }
}
