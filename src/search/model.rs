use crate::{FavoriteRecipe, RecipeSource};
use serde::{Deserialize, Serialize};

/// Body of a `match` query on the recipe title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    query: Query,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Query {
    #[serde(rename = "match")]
    match_: TitleMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct TitleMatch {
    title: String,
}

impl SearchRequest {
    pub fn match_title(text: impl Into<String>) -> Self {
        SearchRequest {
            query: Query {
                match_: TitleMatch { title: text.into() },
            },
        }
    }
}

/// The parts of a search response the app uses.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One matching document.
#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(
        rename = "_source",
        default,
        deserialize_with = "RecipeSource::deserialize_or_empty"
    )]
    pub source: RecipeSource,
}

impl SearchResponse {
    /// Converts every hit into a recipe that can be favorited as-is.
    pub fn into_recipes(self) -> Vec<FavoriteRecipe> {
        self.hits
            .hits
            .into_iter()
            .map(|hit| FavoriteRecipe::new(hit.id, hit.source))
            .collect()
    }
}
