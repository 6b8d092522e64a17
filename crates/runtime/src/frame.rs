/// Frame metadata handed to every ticking system.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Host timestamp of this frame in milliseconds, as delivered by the
    /// display-refresh callback. Never clamped or rebased.
    pub host_ms: f64,
}

impl Frame {
    pub fn new(index: u64, host_ms: f64) -> Self {
        Self { index, host_ms }
    }
}

/// Numbers host display-refresh timestamps into [`Frame`]s.
///
/// The host timestamp is in milliseconds (`performance.now()` or the
/// `requestAnimationFrame` argument). Systems that animate over wall-clock
/// time measure against `host_ms` directly, so a long gap between frames
/// (a busy main thread, a backgrounded tab) is never lost.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    index: u64,
    last_host_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, host_ms: f64) -> Frame {
        let frame = Frame::new(self.index, host_ms);
        self.index = self.index.wrapping_add(1);
        self.last_host_ms = host_ms;
        frame
    }

    /// The frame most recently produced, or frame 0 if none yet.
    pub fn current(&self) -> Frame {
        Frame::new(self.index.saturating_sub(1), self.last_host_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameClock};

    #[test]
    fn clock_numbers_frames_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.current(), Frame::new(0, 0.0));
        assert_eq!(clock.advance(1234.0), Frame::new(0, 1234.0));
        assert_eq!(clock.advance(1250.0), Frame::new(1, 1250.0));
        assert_eq!(clock.current(), Frame::new(1, 1250.0));
    }

    #[test]
    fn long_pauses_keep_their_full_host_time() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let resumed = clock.advance(60_000.0);
        assert_eq!(resumed.host_ms, 60_000.0);

        // Repeated or backwards timestamps pass through untouched.
        assert_eq!(clock.advance(59_000.0).host_ms, 59_000.0);
    }
}
