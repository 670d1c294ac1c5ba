//! Top-level application state and coordinator.
//!
//! All state lives in one [`AppState`] owned by the shell; components never
//! mutate each other directly. Every mutation goes through a method here,
//! and the single-threaded shell drives them one event at a time.

use std::sync::Arc;

use crate::acquire::{self, AcquireResult};
use crate::ai::{AiClient, ImageData};
use crate::error::AcquireError;
use crate::filter::{filter_recipes, FilterSet};
use crate::narration::{Narrator, UtteranceId};
use crate::session::CookingSession;
use crate::shopping::ShoppingList;
use crate::types::Recipe;

/// Everything the application tracks between events.
pub struct AppState {
    ai_client: Box<dyn AiClient>,
    narrator: Arc<dyn Narrator>,
    recipes: Vec<Arc<Recipe>>,
    filters: FilterSet,
    session: Option<CookingSession>,
    shopping_list: ShoppingList,
    last_error: Option<String>,
}

impl AppState {
    pub fn new(ai_client: Box<dyn AiClient>, narrator: Arc<dyn Narrator>) -> Self {
        Self {
            ai_client,
            narrator,
            recipes: Vec::new(),
            filters: FilterSet::new(),
            session: None,
            shopping_list: ShoppingList::new(),
            last_error: None,
        }
    }

    /// Submit a fridge photo and replace the recipe collection with the
    /// suggestions it produces.
    ///
    /// The prior collection and error are cleared before the request goes
    /// out, so stale results never show alongside a pending request or a
    /// failure. Holding `&mut self` across the await means a second
    /// submission cannot start while one is pending.
    pub async fn submit_photo(&mut self, photo: ImageData) -> Result<usize, AcquireError> {
        self.recipes.clear();
        self.last_error = None;

        match acquire::suggest_recipes(self.ai_client.as_ref(), photo, self.filters.terms()).await
        {
            Ok(AcquireResult {
                recipes,
                cached,
                usage,
            }) => {
                tracing::info!(
                    count = recipes.len(),
                    cached = cached,
                    total_tokens = usage.total_tokens,
                    "acquired recipe suggestions"
                );
                self.recipes = recipes;
                Ok(self.recipes.len())
            }
            Err(e) => {
                tracing::error!(category = e.category(), error = %e, "recipe acquisition failed");
                self.last_error = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }

    /// The full collection from the last successful acquisition.
    pub fn recipes(&self) -> &[Arc<Recipe>] {
        &self.recipes
    }

    /// The subset passing the active filters, recomputed from scratch on
    /// every call so it can never lag behind the collection or the filter
    /// set.
    pub fn visible_recipes(&self) -> Vec<Arc<Recipe>> {
        filter_recipes(&self.recipes, &self.filters)
    }

    /// Toggle a dietary filter term. Returns true if it is now active.
    pub fn toggle_filter(&mut self, term: &str) -> bool {
        self.filters.toggle(term)
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// User-facing message from the last failed acquisition, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Open a cooking session on the visible recipe at `index`.
    ///
    /// Any session already open is closed first, cancelling its narration.
    pub fn open_session(&mut self, index: usize) -> bool {
        let visible = self.visible_recipes();
        let Some(recipe) = visible.get(index) else {
            return false;
        };

        self.close_session();
        self.session = Some(CookingSession::new(recipe.clone(), self.narrator.clone()));
        true
    }

    pub fn session(&self) -> Option<&CookingSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut CookingSession> {
        self.session.as_mut()
    }

    /// Close the current session, if one is open.
    pub fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
    }

    /// Forward a narration-completion notification to the open session.
    /// Harmless if the session has since closed.
    pub fn narration_finished(&mut self, id: UtteranceId) {
        if let Some(session) = &mut self.session {
            session.narration_finished(id);
        }
    }

    /// Add the session recipe's ingredient at `index` to the shopping list.
    ///
    /// Only ingredients missing from the fridge are addable; everything
    /// else (no session, bad index, ingredient on hand, duplicate) returns
    /// false.
    pub fn add_ingredient_to_shopping_list(&mut self, index: usize) -> bool {
        let Some(session) = &self.session else {
            return false;
        };

        match session.recipe().ingredients.get(index) {
            Some(ing) if !ing.in_fridge => self.shopping_list.add(&ing.name),
            _ => false,
        }
    }

    /// Remove an item from the shopping list by name.
    pub fn remove_shopping_item(&mut self, item: &str) -> bool {
        self.shopping_list.remove(item)
    }

    pub fn clear_shopping_list(&mut self) {
        self.shopping_list.clear();
    }

    pub fn shopping_list(&self) -> &ShoppingList {
        &self.shopping_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{FakeAiClient, DEMO_RECIPES_JSON};
    use crate::error::ACQUIRE_FAILED_MESSAGE;
    use crate::narration::FakeNarrator;

    fn photo() -> ImageData {
        ImageData::new("image/jpeg", "aGVsbG8=")
    }

    fn app_with_responses(client: FakeAiClient) -> (AppState, Arc<FakeNarrator>) {
        let narrator = Arc::new(FakeNarrator::new());
        let app = AppState::new(Box::new(client), narrator.clone());
        (app, narrator)
    }

    #[tokio::test]
    async fn test_submit_photo_populates_collection() {
        let (mut app, _) = app_with_responses(FakeAiClient::with_response(
            "culinary assistant",
            DEMO_RECIPES_JSON,
        ));

        let count = app.submit_photo(photo()).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(app.recipes().len(), 2);
        assert_eq!(app.visible_recipes().len(), 2);
        assert!(app.last_error().is_none());
    }

    #[tokio::test]
    async fn test_failed_submission_clears_prior_collection() {
        let mut client = FakeAiClient::new();
        client.add_response("Provide a variety", DEMO_RECIPES_JSON);
        client.add_response("MUST adhere", "not json");
        let (mut app, _) = app_with_responses(client);

        app.submit_photo(photo()).await.unwrap();
        assert_eq!(app.recipes().len(), 2);

        // Activating a filter routes the next request to the broken response
        app.toggle_filter("Vegan");
        let result = app.submit_photo(photo()).await;

        assert!(result.is_err());
        assert!(app.recipes().is_empty());
        assert!(app.visible_recipes().is_empty());
        assert_eq!(app.last_error(), Some(ACQUIRE_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_filters_narrow_visible_recipes() {
        let (mut app, _) = app_with_responses(FakeAiClient::with_response(
            "culinary assistant",
            DEMO_RECIPES_JSON,
        ));
        app.submit_photo(photo()).await.unwrap();

        // Both demo recipes are vegetarian; only one is vegan
        app.toggle_filter("Vegan");
        let visible = app.visible_recipes();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Fridge-Clearing Vegetable Stir Fry");

        app.toggle_filter("Vegan");
        assert_eq!(app.visible_recipes().len(), 2);
    }

    #[tokio::test]
    async fn test_open_session_uses_visible_index() {
        let (mut app, _) = app_with_responses(FakeAiClient::with_response(
            "culinary assistant",
            DEMO_RECIPES_JSON,
        ));
        app.submit_photo(photo()).await.unwrap();

        // With the Vegan filter the omelette is hidden, so index 0 is the
        // stir fry
        app.toggle_filter("Vegan");
        assert!(app.open_session(0));
        assert_eq!(
            app.session().unwrap().recipe().name,
            "Fridge-Clearing Vegetable Stir Fry"
        );

        assert!(!app.open_session(5));
    }

    #[tokio::test]
    async fn test_opening_new_session_cancels_prior_narration() {
        let (mut app, narrator) = app_with_responses(FakeAiClient::with_response(
            "culinary assistant",
            DEMO_RECIPES_JSON,
        ));
        app.submit_photo(photo()).await.unwrap();

        app.open_session(0);
        app.session_mut().unwrap().toggle_narration();

        app.open_session(1);
        assert_eq!(narrator.cancel_count(), 1);
        assert!(!app.session().unwrap().is_narrating());
    }

    #[tokio::test]
    async fn test_add_missing_ingredient_to_shopping_list() {
        let (mut app, _) = app_with_responses(FakeAiClient::with_response(
            "culinary assistant",
            DEMO_RECIPES_JSON,
        ));
        app.submit_photo(photo()).await.unwrap();
        app.open_session(0);

        // Stir fry ingredients: index 2 (soy sauce) is the only one not in
        // the fridge
        assert!(!app.add_ingredient_to_shopping_list(0));
        assert!(app.add_ingredient_to_shopping_list(2));
        assert!(!app.add_ingredient_to_shopping_list(2));

        assert_eq!(app.shopping_list().items(), ["Soy sauce"]);

        assert!(app.remove_shopping_item("Soy sauce"));
        assert!(app.shopping_list().is_empty());
    }

    #[tokio::test]
    async fn test_no_session_means_no_shopping_add() {
        let (mut app, _) = app_with_responses(FakeAiClient::new());
        assert!(!app.add_ingredient_to_shopping_list(0));
    }
}
