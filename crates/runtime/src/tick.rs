use crate::event_bus::EventBus;
use crate::frame::{Frame, FrameClock};

/// A system advanced once per rendered frame.
///
/// Systems never schedule their own continuation; the [`FrameLoop`] is the
/// only thing that decides when a tick happens.
pub trait Tick {
    fn tick(&mut self, frame: &Frame, bus: &mut EventBus);
}

/// The single authoritative per-frame driver.
#[derive(Debug, Default)]
pub struct FrameLoop {
    clock: FrameClock,
    bus: EventBus,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `host_ms` and tick `systems` in slice order.
    pub fn step(&mut self, host_ms: f64, systems: &mut [&mut dyn Tick]) -> Frame {
        let frame = self.clock.advance(host_ms);
        for system in systems.iter_mut() {
            system.tick(&frame, &mut self.bus);
        }
        frame
    }

    pub fn current_frame(&self) -> Frame {
        self.clock.current()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameLoop, Tick};
    use crate::event_bus::{EventBus, EventKind};
    use crate::frame::Frame;

    struct Recorder(&'static str);

    impl Tick for Recorder {
        fn tick(&mut self, frame: &Frame, bus: &mut EventBus) {
            bus.emit(*frame, EventKind::Camera, self.0);
        }
    }

    #[test]
    fn ticks_systems_in_order_once_per_step() {
        let mut frame_loop = FrameLoop::new();
        let mut a = Recorder("a");
        let mut b = Recorder("b");

        frame_loop.step(0.0, &mut [&mut a, &mut b]);
        let f = frame_loop.step(16.0, &mut [&mut a, &mut b]);
        assert_eq!(f.index, 1);
        assert_eq!(f.host_ms, 16.0);

        let msgs: Vec<_> = frame_loop
            .bus()
            .events()
            .iter()
            .map(|e| (e.frame_index, e.message.as_str()))
            .collect();
        assert_eq!(msgs, vec![(0, "a"), (0, "b"), (1, "a"), (1, "b")]);
    }
}
