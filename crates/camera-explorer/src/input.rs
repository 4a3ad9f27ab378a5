//! Keyboard and pointer mapping for the explorer view.
//!
//! - digit keys: lens presets
//! - `G` / `H`: grid / HUD overlays
//! - `R`: reset camera
//! - space: capture snapshot
//! - WASD / arrows: move (held, polled every tick)
//! - pointer drag: look
//! - scroll: height

use std::collections::HashSet;

use explorer_core::{lens, MoveDirection};
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// A discrete action triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerAction {
    /// Switch to a lens preset.
    SelectLens(&'static str),
    ToggleGrid,
    ToggleHud,
    ResetCamera,
    CaptureSnapshot,
}

/// Maps a key to its discrete action, if any.
pub fn action_for_key(key: KeyCode) -> Option<ExplorerAction> {
    if let Some(digit) = digit_for_key(key) {
        return lens::lens_for_shortcut(digit).map(ExplorerAction::SelectLens);
    }
    match key {
        KeyCode::KeyG => Some(ExplorerAction::ToggleGrid),
        KeyCode::KeyH => Some(ExplorerAction::ToggleHud),
        KeyCode::KeyR => Some(ExplorerAction::ResetCamera),
        KeyCode::Space => Some(ExplorerAction::CaptureSnapshot),
        _ => None,
    }
}

/// Maps a key to the movement it drives while held.
pub fn move_direction_for_key(key: KeyCode) -> Option<MoveDirection> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(MoveDirection::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(MoveDirection::Back),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(MoveDirection::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(MoveDirection::Right),
        _ => None,
    }
}

fn digit_for_key(key: KeyCode) -> Option<char> {
    let digit = match key {
        KeyCode::Digit0 | KeyCode::Numpad0 => '0',
        KeyCode::Digit1 | KeyCode::Numpad1 => '1',
        KeyCode::Digit2 | KeyCode::Numpad2 => '2',
        KeyCode::Digit3 | KeyCode::Numpad3 => '3',
        KeyCode::Digit4 | KeyCode::Numpad4 => '4',
        KeyCode::Digit5 | KeyCode::Numpad5 => '5',
        KeyCode::Digit6 | KeyCode::Numpad6 => '6',
        KeyCode::Digit7 | KeyCode::Numpad7 => '7',
        KeyCode::Digit8 | KeyCode::Numpad8 => '8',
        KeyCode::Digit9 | KeyCode::Numpad9 => '9',
        _ => return None,
    };
    Some(digit)
}

/// Converts a scroll event to lines; positive raises the camera.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
    }
}

/// Held keys and pointer drag state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    dragging: bool,
    pointer: Option<(f64, f64)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a movement key. Returns whether the key drives movement.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if move_direction_for_key(key).is_none() {
            return false;
        }
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
        true
    }

    /// Directions currently held, each at most once, in a fixed order.
    pub fn held_directions(&self) -> Vec<MoveDirection> {
        MoveDirection::ALL
            .into_iter()
            .filter(|d| {
                self.keys_down
                    .iter()
                    .any(|k| move_direction_for_key(*k) == Some(*d))
            })
            .collect()
    }

    /// Starts or ends a pointer drag.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Records a pointer position; returns the delta while dragging.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let previous = self.pointer.replace((x, y));
        match previous {
            Some((px, py)) if self.dragging => Some(((x - px) as f32, (y - py) as f32)),
            _ => None,
        }
    }

    /// Forgets held keys and drag state, e.g. when the view loses focus.
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.dragging = false;
        self.pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_shortcuts() {
        assert_eq!(
            action_for_key(KeyCode::Digit3),
            Some(ExplorerAction::SelectLens("35mm"))
        );
        assert_eq!(
            action_for_key(KeyCode::Numpad1),
            Some(ExplorerAction::SelectLens("14mm"))
        );
        assert_eq!(action_for_key(KeyCode::Digit9), None);
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(action_for_key(KeyCode::KeyG), Some(ExplorerAction::ToggleGrid));
        assert_eq!(action_for_key(KeyCode::KeyH), Some(ExplorerAction::ToggleHud));
        assert_eq!(action_for_key(KeyCode::KeyR), Some(ExplorerAction::ResetCamera));
        assert_eq!(
            action_for_key(KeyCode::Space),
            Some(ExplorerAction::CaptureSnapshot)
        );
        assert_eq!(action_for_key(KeyCode::KeyW), None);
    }

    #[test]
    fn test_held_directions_dedupe() {
        let mut input = InputState::new();
        assert!(input.set_key(KeyCode::KeyW, true));
        assert!(input.set_key(KeyCode::ArrowUp, true));
        assert!(input.set_key(KeyCode::KeyD, true));
        assert!(!input.set_key(KeyCode::KeyG, true));
        assert_eq!(
            input.held_directions(),
            vec![MoveDirection::Forward, MoveDirection::Right]
        );

        input.set_key(KeyCode::KeyW, false);
        assert_eq!(
            input.held_directions(),
            vec![MoveDirection::Forward, MoveDirection::Right]
        );
        input.set_key(KeyCode::ArrowUp, false);
        assert_eq!(input.held_directions(), vec![MoveDirection::Right]);
    }

    #[test]
    fn test_pointer_delta_only_while_dragging() {
        let mut input = InputState::new();
        assert_eq!(input.pointer_moved(10.0, 10.0), None);
        assert_eq!(input.pointer_moved(12.0, 10.0), None);
        input.set_dragging(true);
        assert_eq!(input.pointer_moved(15.0, 6.0), Some((3.0, -4.0)));
        input.release_all();
        assert!(input.held_directions().is_empty());
        assert_eq!(input.pointer_moved(20.0, 6.0), None);
    }

    #[test]
    fn test_scroll_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        let pixels = MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, -30.0));
        assert!((scroll_lines(pixels) + 3.0).abs() < 1e-6);
    }
}
