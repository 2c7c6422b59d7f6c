//! Run configuration for the frame loop and the terminal backend.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// A key plus the exact modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Whether `event` is a press (or repeat) of this chord.
    pub fn matches(&self, event: &Event) -> bool {
        match event {
            Event::Key(key) => {
                key.kind != KeyEventKind::Release && key.code == self.code && key.modifiers == self.modifiers
            }
            _ => false,
        }
    }
}

/// Configuration for [`App`](crate::App) and [`run_terminal`](crate::run_terminal).
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Keys that stop the frame loop. Never forwarded to listeners.
    pub quit_keys: Vec<KeyChord>,
    /// Pause between frames. `None` renders as fast as the runtime allows.
    pub frame_interval: Option<Duration>,
    pub mouse_capture: bool,
    pub bracketed_paste: bool,
    pub alternate_screen: bool,
    /// Log the element tree at trace level after every frame.
    pub trace_tree: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            quit_keys: vec![KeyChord::plain(KeyCode::Esc), KeyChord::ctrl('c')],
            frame_interval: None,
            mouse_capture: true,
            bracketed_paste: true,
            alternate_screen: true,
            trace_tree: false,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quit_keys(mut self, keys: impl IntoIterator<Item = KeyChord>) -> Self {
        self.quit_keys = keys.into_iter().collect();
        self
    }

    /// Leave quitting entirely to the shutdown trigger.
    pub fn without_quit_keys(mut self) -> Self {
        self.quit_keys.clear();
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    pub fn with_mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse_capture = enabled;
        self
    }

    pub fn with_bracketed_paste(mut self, enabled: bool) -> Self {
        self.bracketed_paste = enabled;
        self
    }

    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    pub fn with_trace_tree(mut self, enabled: bool) -> Self {
        self.trace_tree = enabled;
        self
    }

    pub fn is_quit_event(&self, event: &Event) -> bool {
        self.quit_keys.iter().any(|chord| chord.matches(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_default_quit_keys() {
        let config = RunConfig::default();
        assert!(config.is_quit_event(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(config.is_quit_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!config.is_quit_event(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!config.is_quit_event(&Event::FocusGained));
    }

    #[test]
    fn test_release_is_not_a_quit() {
        let mut release = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!RunConfig::default().is_quit_event(&Event::Key(release)));
    }

    #[test]
    fn test_builders() {
        let config = RunConfig::new()
            .with_quit_keys([KeyChord::plain(KeyCode::Char('q'))])
            .with_frame_interval(Duration::from_millis(16))
            .with_mouse_capture(false)
            .with_trace_tree(true);
        assert_eq!(config.quit_keys.len(), 1);
        assert_eq!(config.frame_interval, Some(Duration::from_millis(16)));
        assert!(!config.mouse_capture);
        assert!(config.trace_tree);
        assert!(config.alternate_screen);
        assert!(RunConfig::new().without_quit_keys().quit_keys.is_empty());
    }
}
