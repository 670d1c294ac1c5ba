//! AI prompt templates.

pub mod suggest_recipes;

pub use suggest_recipes::{recipe_collection_schema, render_suggest_recipes_prompt};
