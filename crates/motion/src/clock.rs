/// Turns monotonically increasing millisecond timestamps into frame deltas.
///
/// The first timestamp seen is also used as the previous one, so the first
/// frame has a delta of zero.
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous_ms: Option<f64>,
    /// Upper bound for a single delta, in seconds.
    pub max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            previous_ms: None,
            max_delta: 0.1,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the previous call, clamped to `[0, max_delta]`.
    pub fn delta(&mut self, t_ms: f64) -> f32 {
        let previous = self.previous_ms.replace(t_ms).unwrap_or(t_ms);
        let dt = ((t_ms - previous) / 1000.0) as f32;
        dt.clamp(0.0, self.max_delta)
    }

    pub fn previous_ms(&self) -> Option<f64> {
        self.previous_ms
    }
}
