//! Recipe filtering against the active dietary filter set.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::types::Recipe;

/// The set of active dietary filter terms.
///
/// Set semantics with insertion order preserved. Term identity is exact
/// string equality; matching against recipes is looser (case-insensitive
/// pattern match, see [`filter_recipes`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    terms: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a term: adds it at the end if absent, removes it if present.
    /// Returns true if the term is active after the call.
    pub fn toggle(&mut self, term: &str) -> bool {
        if let Some(pos) = self.terms.iter().position(|t| t == term) {
            self.terms.remove(pos);
            false
        } else {
            self.terms.push(term.to_string());
            true
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn clear(&mut self) {
        self.terms.clear();
    }
}

/// A compiled filter term.
///
/// Terms are treated as case-insensitive regular expressions. A term that
/// does not compile as a regex degrades to a case-insensitive substring
/// test instead of failing the whole filter pass.
enum TermMatcher {
    Pattern(Regex),
    Literal(String),
}

impl TermMatcher {
    fn compile(term: &str) -> Self {
        match RegexBuilder::new(term).case_insensitive(true).build() {
            Ok(re) => TermMatcher::Pattern(re),
            Err(e) => {
                tracing::warn!(term, error = %e, "filter term is not a valid pattern, matching as literal");
                TermMatcher::Literal(term.to_lowercase())
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            TermMatcher::Pattern(re) => re.is_match(text),
            TermMatcher::Literal(lit) => text.to_lowercase().contains(lit),
        }
    }

    /// A recipe matches a term if it matches the description or any tag.
    fn matches_recipe(&self, recipe: &Recipe) -> bool {
        self.is_match(&recipe.description)
            || recipe.dietary_tags.iter().any(|tag| self.is_match(tag))
    }
}

/// True if the recipe matches a single filter term.
pub fn recipe_matches(recipe: &Recipe, term: &str) -> bool {
    TermMatcher::compile(term).matches_recipe(recipe)
}

/// Filter the collection down to recipes matching every active term.
///
/// An empty filter set is the identity: the input comes back unchanged,
/// order included. Matches keep their original collection order.
pub fn filter_recipes(recipes: &[Arc<Recipe>], filters: &FilterSet) -> Vec<Arc<Recipe>> {
    if filters.is_empty() {
        return recipes.to_vec();
    }

    let matchers: Vec<TermMatcher> = filters
        .terms()
        .iter()
        .map(|term| TermMatcher::compile(term))
        .collect();

    recipes
        .iter()
        .filter(|recipe| matchers.iter().all(|m| m.matches_recipe(recipe)))
        .cloned()
        .collect()
}
