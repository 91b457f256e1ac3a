//! The render loop.
//!
//! [`run`] drives a [`Frontend`] until the close flag is set: each iteration polls input,
//! renders one frame and presents it. The flag is checked at the top of the iteration, so a
//! frame that requests the close is still finished.

use sdl2::keyboard::Keycode;

use crate::other::{InputEvent, KeyboardState};

/// Whether the loop renders another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
}

/// The window side of the render loop.
pub trait Frontend {
    /// Returns the input that arrived since the last call.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Called when the drawable area changes size.
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Clears the frame and draws the scene.
    fn render(&mut self);

    /// Presents the finished frame.
    fn present(&mut self);
}

/// Returns `true` when the input asks for the window to close: Escape is held, or was tapped
/// since the last frame.
pub fn process_input(keyboard: &KeyboardState) -> bool {
    keyboard.down.contains(&Keycode::Escape) || keyboard.pressed.contains(&Keycode::Escape)
}

/// Runs the loop until the close flag is observed and returns the number of frames presented.
pub fn run<F: Frontend>(frontend: &mut F) -> u64 {
    let mut keyboard = KeyboardState::default();
    let mut state = LoopState::Running;
    let mut frames = 0;

    while state == LoopState::Running {
        keyboard.begin_frame();
        for event in frontend.poll_events() {
            match event {
                InputEvent::Quit => {
                    log::info!("Quit requested, closing window");
                    state = LoopState::Closing;
                }
                InputEvent::KeyDown(keycode) => keyboard.key_down(keycode),
                InputEvent::KeyUp(keycode) => keyboard.key_up(keycode),
                InputEvent::Resized(width, height) => {
                    log::debug!("Resized to {width}x{height}");
                    frontend.resize(width, height);
                }
            }
        }

        if state == LoopState::Running && process_input(&keyboard) {
            log::info!("Escape pressed, closing window");
            state = LoopState::Closing;
        }

        frontend.render();
        frontend.present();
        frames += 1;
    }

    frames
}
