pub mod acquire;
pub mod ai;
pub mod app;
pub mod error;
pub mod filter;
pub mod image;
pub mod narration;
pub mod session;
pub mod shopping;
pub mod types;
pub mod validate;

pub use acquire::{suggest_recipes, AcquireResult};
pub use app::AppState;
pub use error::{AcquireError, PhotoError, ValidateError, ACQUIRE_FAILED_MESSAGE};
pub use filter::{filter_recipes, recipe_matches, FilterSet};
pub use image::{photo_from_bytes, photo_from_data_uri, validate_photo, MAX_PHOTO_BYTES};
pub use narration::{FakeNarrator, Narrator, NullNarrator, UtteranceId};
pub use session::{CookingSession, CookingView};
pub use shopping::ShoppingList;
pub use types::{Difficulty, Ingredient, Recipe, DIETARY_OPTIONS};
pub use validate::validate_recipe_collection;
