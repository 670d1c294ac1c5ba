//! Cooking session: step-by-step walkthrough of one recipe.
//!
//! A session is positioned at one instruction step and optionally narrating
//! it. Step navigation is bounded (no wrap-around), and any step change
//! cancels in-flight narration before the new position takes effect.

use std::sync::Arc;

use crate::narration::{Narrator, UtteranceId};
use crate::types::{Ingredient, Recipe};

/// Which pane of the cooking view is showing.
///
/// Keyboard step navigation only applies while instructions are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookingView {
    #[default]
    Ingredients,
    Instructions,
}

/// Transient per-recipe cooking state.
pub struct CookingSession {
    recipe: Arc<Recipe>,
    narrator: Arc<dyn Narrator>,
    step: usize,
    view: CookingView,
    active_utterance: Option<UtteranceId>,
    utterance_seq: u64,
}

impl CookingSession {
    /// Open a session at the first step.
    ///
    /// Strict acquisition validation guarantees at least one instruction;
    /// an empty recipe here is a caller bug. In release builds such a
    /// session still behaves sanely: navigation is a no-op and the current
    /// instruction reads as empty.
    pub fn new(recipe: Arc<Recipe>, narrator: Arc<dyn Narrator>) -> Self {
        debug_assert!(
            !recipe.instructions.is_empty(),
            "cooking session opened on a recipe with no instructions"
        );

        Self {
            recipe,
            narrator,
            step: 0,
            view: CookingView::default(),
            active_utterance: None,
            utterance_seq: 0,
        }
    }

    pub fn recipe(&self) -> &Arc<Recipe> {
        &self.recipe
    }

    /// Zero-based index of the current step.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.recipe.instructions.len()
    }

    /// Text of the current instruction.
    pub fn current_instruction(&self) -> &str {
        self.recipe
            .instructions
            .get(self.step)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_narrating(&self) -> bool {
        self.active_utterance.is_some()
    }

    pub fn view(&self) -> CookingView {
        self.view
    }

    /// Switch between the ingredients and instructions panes.
    pub fn set_view(&mut self, view: CookingView) {
        self.view = view;
    }

    /// Ingredients the photo did not show, candidates for the shopping list.
    pub fn missing_ingredients(&self) -> Vec<&Ingredient> {
        self.recipe
            .ingredients
            .iter()
            .filter(|ing| !ing.in_fridge)
            .collect()
    }

    /// Advance one step. Cancels active narration when the step changes;
    /// at the last step this is a no-op and narration keeps playing.
    pub fn next(&mut self) -> bool {
        if self.step + 1 < self.recipe.instructions.len() {
            self.cancel_narration();
            self.step += 1;
            true
        } else {
            false
        }
    }

    /// Go back one step. Same cancellation rule as [`next`](Self::next).
    pub fn prev(&mut self) -> bool {
        if self.step > 0 {
            self.cancel_narration();
            self.step -= 1;
            true
        } else {
            false
        }
    }

    /// Keyboard-driven `next`: only acts while instructions are visible.
    pub fn key_next(&mut self) -> bool {
        self.view == CookingView::Instructions && self.next()
    }

    /// Keyboard-driven `prev`: only acts while instructions are visible.
    pub fn key_prev(&mut self) -> bool {
        self.view == CookingView::Instructions && self.prev()
    }

    /// Start narrating the current step, or stop if already narrating.
    ///
    /// Returns whether narration is active after the call. When the
    /// narrator reports speech unavailable this stays false and nothing
    /// else changes.
    pub fn toggle_narration(&mut self) -> bool {
        if self.active_utterance.is_some() {
            self.cancel_narration();
            return false;
        }

        let id = self.next_utterance_id();
        let text = self.current_instruction().to_string();

        if self.narrator.speak(id, &text) {
            tracing::debug!(utterance = id.0, step = self.step, "narration started");
            self.active_utterance = Some(id);
            true
        } else {
            false
        }
    }

    /// Handle the narrator's natural-completion notification.
    ///
    /// Only the currently active utterance flips narration back to idle; a
    /// late notification for an utterance that was already cancelled is
    /// ignored.
    pub fn narration_finished(&mut self, id: UtteranceId) {
        if self.active_utterance == Some(id) {
            tracing::debug!(utterance = id.0, "narration finished");
            self.active_utterance = None;
        } else {
            tracing::warn!(utterance = id.0, "stale narration completion ignored");
        }
    }

    /// End the session, force-cancelling any active narration.
    pub fn close(mut self) {
        self.cancel_narration();
    }

    fn cancel_narration(&mut self) {
        if let Some(id) = self.active_utterance.take() {
            tracing::debug!(utterance = id.0, "narration cancelled");
            self.narrator.cancel();
        }
    }

    fn next_utterance_id(&mut self) -> UtteranceId {
        self.utterance_seq += 1;
        UtteranceId(self.utterance_seq)
    }
}

impl Drop for CookingSession {
    fn drop(&mut self) {
        // Narration must not outlive the session, whichever way it ends.
        self.cancel_narration();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::{FakeNarrator, NullNarrator};
    use crate::types::Difficulty;

    fn recipe_with_steps(steps: &[&str]) -> Arc<Recipe> {
        Arc::new(Recipe {
            name: "Test Dish".to_string(),
            description: "A dish for testing.".to_string(),
            difficulty: Difficulty::Easy,
            prep_time: "5 mins".to_string(),
            calories: 100,
            ingredients: vec![
                Ingredient {
                    name: "Eggs".to_string(),
                    quantity: "2".to_string(),
                    in_fridge: true,
                },
                Ingredient {
                    name: "Saffron".to_string(),
                    quantity: "1 pinch".to_string(),
                    in_fridge: false,
                },
            ],
            instructions: steps.iter().map(|s| s.to_string()).collect(),
            dietary_tags: vec![],
        })
    }

    fn session_with_narrator(steps: &[&str]) -> (CookingSession, Arc<FakeNarrator>) {
        let narrator = Arc::new(FakeNarrator::new());
        let session = CookingSession::new(recipe_with_steps(steps), narrator.clone());
        (session, narrator)
    }

    #[test]
    fn test_initial_state() {
        let (session, _) = session_with_narrator(&["one", "two", "three"]);

        assert_eq!(session.step(), 0);
        assert_eq!(session.total_steps(), 3);
        assert_eq!(session.current_instruction(), "one");
        assert_eq!(session.view(), CookingView::Ingredients);
        assert!(!session.is_narrating());
    }

    #[test]
    fn test_next_stops_at_last_step() {
        let (mut session, _) = session_with_narrator(&["one", "two", "three"]);

        assert!(session.next());
        assert_eq!(session.step(), 1);
        assert!(session.next());
        assert_eq!(session.step(), 2);
        assert!(!session.next());
        assert_eq!(session.step(), 2);
    }

    #[test]
    fn test_prev_stops_at_first_step() {
        let (mut session, _) = session_with_narrator(&["one", "two"]);

        assert!(!session.prev());
        assert_eq!(session.step(), 0);

        session.next();
        assert!(session.prev());
        assert_eq!(session.step(), 0);
    }

    #[test]
    fn test_toggle_narration_speaks_current_step() {
        let (mut session, narrator) = session_with_narrator(&["chop", "fry"]);
        session.next();

        assert!(session.toggle_narration());
        assert!(session.is_narrating());
        assert_eq!(narrator.last_utterance().unwrap().1, "fry");
    }

    #[test]
    fn test_toggle_narration_twice_cancels() {
        let (mut session, narrator) = session_with_narrator(&["chop", "fry"]);

        session.toggle_narration();
        assert!(!session.toggle_narration());
        assert!(!session.is_narrating());
        assert_eq!(narrator.cancel_count(), 1);
    }

    #[test]
    fn test_step_change_cancels_narration() {
        let (mut session, narrator) = session_with_narrator(&["chop", "fry"]);

        session.toggle_narration();
        session.next();

        assert!(!session.is_narrating());
        assert_eq!(narrator.cancel_count(), 1);
    }

    #[test]
    fn test_boundary_noop_leaves_narration_playing() {
        let (mut session, narrator) = session_with_narrator(&["chop", "fry"]);
        session.next();

        session.toggle_narration();
        assert!(!session.next());

        assert!(session.is_narrating());
        assert_eq!(narrator.cancel_count(), 0);
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let (mut session, narrator) = session_with_narrator(&["chop", "fry"]);

        session.toggle_narration();
        let first = narrator.last_utterance().unwrap().0;

        session.next();
        session.toggle_narration();
        let second = narrator.last_utterance().unwrap().0;

        // Late completion for the cancelled utterance must not stop the
        // current one.
        session.narration_finished(first);
        assert!(session.is_narrating());

        session.narration_finished(second);
        assert!(!session.is_narrating());
    }

    #[test]
    fn test_keyboard_navigation_gated_by_view() {
        let (mut session, _) = session_with_narrator(&["one", "two"]);

        assert!(!session.key_next());
        assert_eq!(session.step(), 0);

        session.set_view(CookingView::Instructions);
        assert!(session.key_next());
        assert_eq!(session.step(), 1);

        session.set_view(CookingView::Ingredients);
        assert!(!session.key_prev());
        assert_eq!(session.step(), 1);
    }

    #[test]
    fn test_close_cancels_active_narration() {
        let (mut session, narrator) = session_with_narrator(&["one"]);

        session.toggle_narration();
        session.close();

        // Exactly one cancel: close already took the utterance, so the
        // drop that follows has nothing left to stop.
        assert_eq!(narrator.cancel_count(), 1);
    }

    #[test]
    fn test_drop_cancels_narration_without_close() {
        let (mut session, narrator) = session_with_narrator(&["one", "two"]);

        session.toggle_narration();
        drop(session);

        assert_eq!(narrator.cancel_count(), 1);
    }

    #[test]
    fn test_drop_while_idle_does_not_cancel() {
        let (session, narrator) = session_with_narrator(&["one"]);

        drop(session);

        assert_eq!(narrator.cancel_count(), 0);
    }

    #[test]
    fn test_unavailable_speech_degrades_to_noop() {
        let mut session =
            CookingSession::new(recipe_with_steps(&["one", "two"]), Arc::new(NullNarrator));

        assert!(!session.toggle_narration());
        assert!(!session.is_narrating());

        // Navigation still works without speech
        assert!(session.next());
        assert_eq!(session.step(), 1);
    }

    #[test]
    fn test_missing_ingredients() {
        let (session, _) = session_with_narrator(&["one"]);

        let missing = session.missing_ingredients();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "Saffron");
    }
}
