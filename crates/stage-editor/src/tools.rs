//! Placement tool: translates pointer input into `StageAction`s.
//!
//! Hit testing belongs to the presentation layer, which knows how big each
//! furniture image is drawn; it passes the instance under the pointer (or
//! `None` for empty canvas) alongside each event.
//!
//! ## Pointer behaviors
//!
//! | Event | On an instance | On empty canvas |
//! |-------|----------------|-----------------|
//! | **down** | select and start drag | deselect all |
//! | **Alt+down** | duplicate, drag the copy | deselect all |
//! | **move** | drag the selection | — |
//! | **up** | end drag | — |
//!
//! While comparing, pointer input is ignored. Key events are forwarded to
//! the shortcut map by `dispatch`.

use crate::input::InputEvent;
use crate::session::{InteractionController, StageAction, StagingState};
use smallvec::{SmallVec, smallvec};
use stage_core::{InstanceId, Position, Result};

/// An in-progress drag gesture.
#[derive(Debug, Clone, Copy)]
struct DragState {
    /// The instance being dragged: the hit instance, or its copy after an
    /// Alt-duplicate.
    target: InstanceId,
    /// Pointer position (percent) at pointer-down.
    anchor: Position,
    /// Instance position minus pointer position, fixed on the first move so
    /// the instance does not jump to the cursor.
    grab_offset: Option<(f32, f32)>,
}

#[derive(Debug, Default)]
pub struct PlacementTool {
    drag: Option<DragState>,
}

impl PlacementTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The instance the current drag moves, if any.
    pub fn drag_target(&self) -> Option<InstanceId> {
        self.drag.map(|drag| drag.target)
    }

    /// Point the current drag at an instance created by one of this tool's
    /// actions (the copy from an Alt-duplicate). Hosts that apply actions
    /// themselves pass the id returned by `InteractionController::apply`.
    pub fn follow(&mut self, created: InstanceId) {
        if let Some(drag) = self.drag.as_mut() {
            drag.target = created;
        }
    }

    /// Handle an input event, returning zero or more actions to apply.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<InstanceId>,
        controller: &InteractionController,
    ) -> SmallVec<[StageAction; 2]> {
        if matches!(
            controller.state(),
            StagingState::Browsing | StagingState::Comparing
        ) {
            self.drag = None;
            return SmallVec::new();
        }
        let canvas = controller.config().canvas;
        let Some((x, y)) = event.position() else {
            return SmallVec::new();
        };

        match event {
            InputEvent::PointerDown { .. } => match hit {
                Some(id) => {
                    self.drag = Some(DragState {
                        target: id,
                        anchor: canvas.to_percent(x, y),
                        grab_offset: None,
                    });
                    if event.modifiers().alt {
                        smallvec![StageAction::Duplicate(id)]
                    } else {
                        smallvec![StageAction::Select(id)]
                    }
                }
                None => {
                    self.drag = None;
                    smallvec![StageAction::DeselectAll]
                }
            },
            InputEvent::PointerMove { .. } => {
                let Some(drag) = self.drag.as_mut() else {
                    return SmallVec::new();
                };
                let Some(target) = controller.scene().and_then(|scene| scene.get(drag.target))
                else {
                    log::debug!("drag target {} is gone, ending drag", drag.target);
                    self.drag = None;
                    return SmallVec::new();
                };
                let (dx, dy) = *drag.grab_offset.get_or_insert((
                    target.position.x - drag.anchor.x,
                    target.position.y - drag.anchor.y,
                ));
                smallvec![StageAction::Drag {
                    id: target.instance_id,
                    position: canvas.to_percent(x, y).offset(dx, dy),
                }]
            }
            InputEvent::PointerUp { .. } => {
                self.drag = None;
                SmallVec::new()
            }
            InputEvent::Key { .. } => SmallVec::new(),
        }
    }

    /// Handle an event and apply the resulting actions to `controller`.
    ///
    /// Key events go to the shortcut map. A failed action ends any drag it
    /// started.
    pub fn dispatch(
        &mut self,
        controller: &mut InteractionController,
        event: &InputEvent,
        hit: Option<InstanceId>,
    ) -> Result<()> {
        if let InputEvent::Key { key, modifiers } = event {
            controller.handle_key(key, *modifiers)?;
            return Ok(());
        }
        for action in self.handle(event, hit, controller) {
            match controller.apply(action) {
                Ok(Some(created)) => self.follow(created),
                Ok(None) => {}
                Err(err) => {
                    self.drag = None;
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}
