use std::collections::HashSet;

use sdl2::keyboard::Keycode;

/// Window-system input, reduced to what the render loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    KeyUp(Keycode),
    /// New drawable size in pixels.
    Resized(u32, u32),
}

impl InputEvent {
    /// Converts an SDL event, dropping the ones the loop ignores.
    pub fn from_sdl(event: &sdl2::event::Event, window: &sdl2::video::Window) -> Option<Self> {
        match event {
            sdl2::event::Event::Quit { .. } => Some(InputEvent::Quit),
            sdl2::event::Event::Window {
                win_event: sdl2::event::WindowEvent::Resized(..),
                ..
            } => {
                let (width, height) = window.drawable_size();
                Some(InputEvent::Resized(width, height))
            }
            sdl2::event::Event::KeyDown {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => Some(InputEvent::KeyDown(*keycode)),
            sdl2::event::Event::KeyUp {
                keycode: Some(keycode),
                repeat: false,
                ..
            } => Some(InputEvent::KeyUp(*keycode)),
            _ => None,
        }
    }
}

/// The current state of the keyboard.
#[derive(Default)]
pub struct KeyboardState {
    pub down: HashSet<Keycode>,
    /// Keys that went down since the last [`KeyboardState::begin_frame`], even if they were
    /// released again before it ended.
    pub pressed: HashSet<Keycode>,
}

impl KeyboardState {
    /// Forgets the keys pressed during the previous frame.
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn key_down(&mut self, keycode: Keycode) {
        self.down.insert(keycode);
        self.pressed.insert(keycode);
    }

    pub fn key_up(&mut self, keycode: Keycode) {
        self.down.remove(&keycode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_state() {
        let mut keyboard = KeyboardState::default();
        keyboard.key_down(Keycode::Escape);
        assert!(keyboard.down.contains(&Keycode::Escape));
        assert!(keyboard.pressed.contains(&Keycode::Escape));

        keyboard.begin_frame();
        assert!(keyboard.down.contains(&Keycode::Escape));
        assert!(keyboard.pressed.is_empty());

        keyboard.key_down(Keycode::Space);
        keyboard.key_up(Keycode::Space);
        keyboard.key_up(Keycode::Escape);
        assert!(keyboard.down.is_empty());
        assert!(keyboard.pressed.contains(&Keycode::Space));
        assert!(!keyboard.pressed.contains(&Keycode::Escape));
    }
}
