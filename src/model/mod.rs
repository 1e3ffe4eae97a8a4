//! Data types for favorited recipes.

use thiserror::Error;

mod favorite;
mod recipe_source;

pub use favorite::{FavoriteRecipe, FavoritesCollection};
pub use recipe_source::RecipeSource;

/// Errors that can occur when encoding, decoding or editing a collection.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to decode favorites: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode favorites: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Recipe is already a favorite: {0}")]
    DuplicateId(String),
}
