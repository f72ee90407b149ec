use std::sync::Arc;

use winit::window::Window as WinitWindow;

/// Window properties the engine tracks from window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    pub focused: bool,
    pub minimized: bool,
    pub width: u32,
    pub height: u32,
}

impl WindowState {
    pub fn new(width: u32, height: u32) -> Self {
        WindowState {
            focused: false,
            minimized: width == 0 || height == 0,
            width,
            height,
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Most platforms report minimisation as a resize to zero.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.minimized = width == 0 || height == 0;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub struct Window {
    winit_window: Arc<WinitWindow>,
}

impl Window {
    pub fn new(winit_window: Arc<WinitWindow>) -> Self {
        Window { winit_window }
    }

    pub fn get_winit_window(&self) -> Arc<WinitWindow> {
        self.winit_window.clone()
    }

    /// Reads the current size and minimisation from the platform window.
    pub fn current_state(&self) -> WindowState {
        let size = self.winit_window.inner_size();
        let mut state = WindowState::new(size.width, size.height);
        if self.winit_window.is_minimized().unwrap_or(false) {
            state.minimized = true;
        }
        state.focused = self.winit_window.has_focus();
        state
    }

    pub fn request_redraw(&self) {
        self.winit_window.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_unfocused() {
        let state = WindowState::new(1280, 720);
        assert!(!state.focused);
        assert!(!state.minimized);
        assert_eq!(state.size(), (1280, 720));
    }

    #[test]
    fn zero_size_counts_as_minimized() {
        let mut state = WindowState::new(800, 600);
        state.set_size(0, 0);
        assert!(state.minimized);
        state.set_size(1024, 0);
        assert!(state.minimized);
        state.set_size(1024, 768);
        assert!(!state.minimized);
        assert_eq!(state.size(), (1024, 768));
    }

    #[test]
    fn tracks_focus() {
        let mut state = WindowState::new(1, 1);
        state.set_focused(true);
        assert!(state.focused);
        state.set_focused(false);
        assert!(!state.focused);
    }
}
