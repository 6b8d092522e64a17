use std::fmt;

use crate::frame::Frame;

/// What raised an [`Event`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A camera transition reached its target.
    Camera,
    /// A pointer click hit a scene object.
    Pick,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Camera => "camera",
            EventKind::Pick => "pick",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification raised during a frame or an input callback. The app drains
/// these into the log once per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

/// Per-frame event queue; events stay queued until drained.
#[derive(Debug, Default)]
pub struct EventBus {
    queued: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, message: impl Into<String>) {
        self.queued.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.queued
    }

    /// Events of one kind, in emission order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.queued.iter().filter(move |e| e.kind == kind)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.queued)
    }
}
