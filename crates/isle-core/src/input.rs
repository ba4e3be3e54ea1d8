//! Host-neutral input events
//!
//! Hosts translate their native pointer, touch, and keyboard events into these
//! types and feed them to an [`InputHandler`].

use serde::{Deserialize, Serialize};

/// Device that produced a drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    Pointer,
    Touch,
}

/// Keys the model reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    pub fn is_arrow(self) -> bool {
        matches!(self, Key::ArrowLeft | Key::ArrowRight)
    }
}

/// A single normalized input event; `x` is the horizontal coordinate in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    DragStart { source: InputSource, x: f32 },
    DragMove { source: InputSource, x: f32 },
    DragEnd { source: InputSource, x: f32 },
    KeyDown(Key),
    KeyUp(Key),
}

/// Whether a handler acted on an event
///
/// Hosts suppress default handling and propagation for consumed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Consumed,
    Ignored,
}

impl Handled {
    pub fn is_consumed(self) -> bool {
        self == Handled::Consumed
    }
}

/// Receiver for normalized input
pub trait InputHandler {
    fn on_drag_start(&mut self, source: InputSource, x: f32) -> Handled;
    fn on_drag_move(&mut self, source: InputSource, x: f32) -> Handled;
    fn on_drag_end(&mut self, source: InputSource, x: f32) -> Handled;
    fn on_key_down(&mut self, key: Key) -> Handled;
    fn on_key_up(&mut self, key: Key) -> Handled;

    /// Dispatch an event to the matching callback
    fn handle(&mut self, event: &InputEvent) -> Handled {
        match *event {
            InputEvent::DragStart { source, x } => self.on_drag_start(source, x),
            InputEvent::DragMove { source, x } => self.on_drag_move(source, x),
            InputEvent::DragEnd { source, x } => self.on_drag_end(source, x),
            InputEvent::KeyDown(key) => self.on_key_down(key),
            InputEvent::KeyUp(key) => self.on_key_up(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl InputHandler for Recorder {
        fn on_drag_start(&mut self, _: InputSource, _: f32) -> Handled {
            self.calls.push("start");
            Handled::Consumed
        }
        fn on_drag_move(&mut self, _: InputSource, _: f32) -> Handled {
            self.calls.push("move");
            Handled::Consumed
        }
        fn on_drag_end(&mut self, _: InputSource, _: f32) -> Handled {
            self.calls.push("end");
            Handled::Consumed
        }
        fn on_key_down(&mut self, _: Key) -> Handled {
            self.calls.push("down");
            Handled::Ignored
        }
        fn on_key_up(&mut self, _: Key) -> Handled {
            self.calls.push("up");
            Handled::Ignored
        }
    }

    #[test]
    fn test_dispatch() {
        let mut recorder = Recorder::default();
        let events = [
            InputEvent::DragStart { source: InputSource::Touch, x: 1.0 },
            InputEvent::DragMove { source: InputSource::Touch, x: 2.0 },
            InputEvent::DragEnd { source: InputSource::Touch, x: 3.0 },
            InputEvent::KeyDown(Key::ArrowLeft),
            InputEvent::KeyUp(Key::ArrowLeft),
        ];
        let handled: Vec<Handled> = events.iter().map(|e| recorder.handle(e)).collect();

        assert_eq!(recorder.calls, vec!["start", "move", "end", "down", "up"]);
        assert!(handled[0].is_consumed());
        assert!(!handled[3].is_consumed());
    }

    #[test]
    fn test_arrow_keys() {
        assert!(Key::ArrowLeft.is_arrow());
        assert!(Key::ArrowRight.is_arrow());
        assert!(!Key::Other.is_arrow());
    }
}
