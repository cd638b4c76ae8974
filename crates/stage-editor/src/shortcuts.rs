//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s, then to
//! `StageAction`s against the current selection. `key` is the
//! `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`, `"ArrowLeft"`).

use crate::input::Modifiers;
use crate::session::{InteractionController, StageAction, StagingState};
use stage_core::{Result, TransformPatch};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    // ── Edit ──
    Delete,
    Duplicate,
    Deselect,
    /// Move the selection by a percent offset.
    Nudge { dx: f32, dy: f32 },
    /// Rotate the selection by degrees (positive = clockwise).
    Rotate(f32),
    /// Multiply the selection's scale.
    Scale(f32),

    // ── Z-order ──
    BringForward,
    SendBackward,
    BringToFront,

    // ── View ──
    ToggleCompare,
}

/// Resolves key events into shortcut actions.
///
/// Step sizes come from the staging config so hosts can tune them.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, or `None` if the combo is unbound.
    pub fn resolve(
        key: &str,
        modifiers: Modifiers,
        controller: &InteractionController,
    ) -> Option<ShortcutAction> {
        let config = controller.config();
        let cmd = modifiers.command();

        // ── Modifier combos first (most specific) ──
        if cmd && modifiers.shift {
            return match key {
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "]" => Some(ShortcutAction::BringForward),
                "[" => Some(ShortcutAction::SendBackward),
                _ => None,
            };
        }

        let step = if modifiers.shift {
            config.nudge_step_large
        } else {
            config.nudge_step
        };
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "c" | "C" if !modifiers.shift => Some(ShortcutAction::ToggleCompare),
            "ArrowLeft" => Some(ShortcutAction::Nudge { dx: -step, dy: 0.0 }),
            "ArrowRight" => Some(ShortcutAction::Nudge { dx: step, dy: 0.0 }),
            "ArrowUp" => Some(ShortcutAction::Nudge { dx: 0.0, dy: -step }),
            "ArrowDown" => Some(ShortcutAction::Nudge { dx: 0.0, dy: step }),
            "r" if !modifiers.shift => Some(ShortcutAction::Rotate(config.rotate_step)),
            "R" | "r" => Some(ShortcutAction::Rotate(-config.rotate_step)),
            "=" | "+" => Some(ShortcutAction::Scale(config.scale_step)),
            "-" | "_" => Some(ShortcutAction::Scale(1.0 / config.scale_step)),
            _ => None,
        }
    }
}

impl ShortcutAction {
    /// Translate into a stage action against the current selection.
    ///
    /// Edit actions need a selection and are dropped without one. While
    /// comparing only `ToggleCompare` gets through.
    pub fn to_stage_action(self, controller: &InteractionController) -> Option<StageAction> {
        match controller.state() {
            StagingState::Browsing => return None,
            StagingState::Comparing => {
                return (self == ShortcutAction::ToggleCompare).then_some(StageAction::ToggleCompare);
            }
            StagingState::EditingSelected | StagingState::EditingUnselected => {}
        }

        match self {
            ShortcutAction::ToggleCompare => return Some(StageAction::ToggleCompare),
            ShortcutAction::Deselect => return Some(StageAction::DeselectAll),
            _ => {}
        }

        let inst = controller.selected_instance()?;
        let id = inst.instance_id;
        Some(match self {
            ShortcutAction::Delete => StageAction::Remove(id),
            ShortcutAction::Duplicate => StageAction::Duplicate(id),
            ShortcutAction::Nudge { dx, dy } => StageAction::Transform {
                id,
                patch: TransformPatch::position(inst.position.offset(dx, dy)),
            },
            ShortcutAction::Rotate(degrees) => StageAction::Transform {
                id,
                patch: TransformPatch::rotation(inst.rotation_degrees + degrees),
            },
            ShortcutAction::Scale(factor) => StageAction::Transform {
                id,
                patch: TransformPatch::scale(inst.scale * factor),
            },
            ShortcutAction::BringForward => StageAction::BringForward(id),
            ShortcutAction::SendBackward => StageAction::SendBackward(id),
            ShortcutAction::BringToFront => StageAction::BringToFront(id),
            ShortcutAction::ToggleCompare | ShortcutAction::Deselect => return None,
        })
    }
}

impl InteractionController {
    /// Resolve and apply a key press. Returns whether the key was handled.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Result<bool> {
        let Some(action) = ShortcutMap::resolve(key, modifiers, self)
            .and_then(|shortcut| shortcut.to_stage_action(self))
        else {
            return Ok(false);
        };
        log::trace!("shortcut {key:?} -> {action:?}");
        self.apply(action)?;
        Ok(true)
    }
}
