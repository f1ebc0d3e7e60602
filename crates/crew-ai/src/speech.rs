//! Rate limiting for spoken feedback.

use std::collections::HashMap;

/// Suppresses repeats of the same line within a minimum interval.
///
/// Lines are keyed by an identifier rather than their text so that
/// differently worded variants of the same message share one limit.
#[derive(Clone, Debug, Default)]
pub struct SpeechLimiter {
    last_spoken: HashMap<&'static str, f32>,
}

impl SpeechLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records `now` if the line may be spoken.
    pub fn allow(&mut self, identifier: &'static str, now: f32, min_interval: f32) -> bool {
        if let Some(&last) = self.last_spoken.get(identifier)
            && now - last < min_interval
        {
            return false;
        }
        self.last_spoken.insert(identifier, now);
        true
    }
}
