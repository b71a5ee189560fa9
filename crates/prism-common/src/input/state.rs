use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an event to the held state and records deltas into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered while unfocused; drop held
                    // state so nothing stays stuck.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                // The first position after entering the window only sets the anchor.
                if let Some((px, py)) = self.pointer_pos {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                let (lx, ly) = delta.lines();
                frame.wheel_lines.0 += lx;
                frame.wheel_lines.1 += ly;
            }
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;
    use approx::assert_relative_eq;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn button(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers::default(),
        })
    }

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    #[test]
    fn first_move_only_anchors_the_pointer() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, moved(10.0, 10.0));
        assert_eq!(frame.pointer_delta, (0.0, 0.0));
        assert_eq!(state.pointer_pos, Some((10.0, 10.0)));
    }

    #[test]
    fn pointer_motion_accumulates_within_a_frame() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, moved(0.0, 0.0));
        state.apply_event(&mut frame, moved(3.0, -1.0));
        state.apply_event(&mut frame, moved(5.0, 2.0));
        assert_eq!(frame.pointer_delta, (5.0, 2.0));

        frame.clear();
        assert_eq!(frame.pointer_delta, (0.0, 0.0));
        assert!(frame.events.is_empty());
    }

    #[test]
    fn leaving_the_window_resets_the_anchor() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, moved(0.0, 0.0));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        state.apply_event(&mut frame, moved(100.0, 100.0));
        assert_eq!(frame.pointer_delta, (0.0, 0.0));
    }

    #[test]
    fn button_transitions_are_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, button(MouseButtonState::Pressed));
        state.apply_event(&mut frame, button(MouseButtonState::Pressed));
        assert!(state.button_down(MouseButton::Left));
        assert!(frame.button_pressed(MouseButton::Left));

        frame.clear();
        state.apply_event(&mut frame, button(MouseButtonState::Released));
        assert!(!state.button_down(MouseButton::Left));
        assert!(frame.buttons_released.contains(&MouseButton::Left));
        assert!(!frame.button_pressed(MouseButton::Left));
    }

    #[test]
    fn key_repeat_does_not_retrigger_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::S, KeyState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, key(Key::S, KeyState::Pressed));
        assert!(state.key_down(Key::S));
        assert!(!frame.key_pressed(Key::S));
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        state.apply_event(&mut frame, button(MouseButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(state.keys_down.is_empty());
        assert!(state.buttons_down.is_empty());
    }

    #[test]
    fn wheel_is_accumulated_in_lines() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        let wheel = |delta| InputEvent::MouseWheel {
            delta,
            modifiers: Modifiers::default(),
        };
        state.apply_event(&mut frame, wheel(MouseWheelDelta::Line { x: 0.0, y: 1.0 }));
        state.apply_event(&mut frame, wheel(MouseWheelDelta::Pixel { x: 0.0, y: 40.0 }));

        assert_relative_eq!(frame.wheel_lines.1, 3.0);
    }
}
