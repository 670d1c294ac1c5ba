//! Text-to-speech narration seam.
//!
//! The core never talks to a speech engine directly; it drives a
//! [`Narrator`] implementation. Narration is fire-and-forget: `speak`
//! returns immediately, and natural completion is reported back to the
//! session by the shell (see `CookingSession::narration_finished`).

use std::sync::Mutex;

/// Identifies one narration playback.
///
/// Completion notifications carry the id back so a stale completion, for a
/// step the user has already left, can be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub(crate) u64);

/// Trait for speech playback backends.
///
/// Implementations should be thread-safe and must make `cancel` safe to
/// call when nothing is playing.
pub trait Narrator: Send + Sync {
    /// Begin speaking the given text. Returns false if speech is
    /// unavailable; the caller must then not treat narration as active.
    fn speak(&self, id: UtteranceId, text: &str) -> bool;

    /// Stop any active playback immediately.
    fn cancel(&self);
}

/// Narrator for environments without a speech capability.
///
/// `speak` always reports unavailable, so narration toggles degrade to
/// no-ops without blocking step navigation.
#[derive(Debug, Default)]
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn speak(&self, _id: UtteranceId, _text: &str) -> bool {
        false
    }

    fn cancel(&self) {}
}

/// A fake narrator for testing.
///
/// Records every utterance started and counts cancellations.
#[derive(Debug, Default)]
pub struct FakeNarrator {
    spoken: Mutex<Vec<(UtteranceId, String)>>,
    cancels: Mutex<u64>,
}

impl FakeNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<(UtteranceId, String)> {
        self.spoken.lock().unwrap().clone()
    }

    /// The most recently started utterance, if any.
    pub fn last_utterance(&self) -> Option<(UtteranceId, String)> {
        self.spoken.lock().unwrap().last().cloned()
    }

    /// How many times playback was cancelled.
    pub fn cancel_count(&self) -> u64 {
        *self.cancels.lock().unwrap()
    }
}

impl Narrator for FakeNarrator {
    fn speak(&self, id: UtteranceId, text: &str) -> bool {
        self.spoken.lock().unwrap().push((id, text.to_string()));
        true
    }

    fn cancel(&self) {
        *self.cancels.lock().unwrap() += 1;
    }
}
