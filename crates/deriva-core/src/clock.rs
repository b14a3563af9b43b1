use instant::Instant;

use crate::constants::MAX_FRAME_DT_SEC;

/// Delta-time source for hosts that tick from a render loop.
///
/// The first tick reports zero. Steps are capped at `max_step` seconds so a
/// paused tab or a debugger stop does not hand the smoothers a giant blend
/// factor.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    max_step: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_step(MAX_FRAME_DT_SEC)
    }

    pub fn with_max_step(max_step: f32) -> Self {
        Self {
            last: None,
            max_step,
        }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = match self.last {
            Some(prev) => (now - prev).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        dt.min(self.max_step)
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
