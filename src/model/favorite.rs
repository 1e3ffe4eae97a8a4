use super::{ModelError, RecipeSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A recipe the user has marked as a favorite.
///
/// Serialized as `{"_id": ..., "_source": {...}}`, the same shape as a search
/// hit, so a hit can be favorited without conversion. Identity is the `id`
/// alone: two favorites with the same id are equal regardless of payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecipe {
    /// Document identifier assigned by the search backend
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Recipe payload, kept verbatim
    #[serde(
        rename = "_source",
        alias = "source",
        default,
        deserialize_with = "RecipeSource::deserialize_or_empty"
    )]
    pub source: RecipeSource,
}

impl FavoriteRecipe {
    pub fn new(id: impl Into<String>, source: RecipeSource) -> Self {
        FavoriteRecipe {
            id: id.into(),
            source,
        }
    }

    /// Returns the title for display, if the payload carries one.
    pub fn title(&self) -> Option<&str> {
        self.source.title()
    }
}

impl PartialEq for FavoriteRecipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FavoriteRecipe {}

/// The ordered set of favorites, in the order they were added.
///
/// Persisted as a bare JSON array of [`FavoriteRecipe`]. Ids are unique;
/// removing an entry never reorders the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesCollection {
    recipes: Vec<FavoriteRecipe>,
}

impl FavoritesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a persisted collection.
    ///
    /// Should the payload contain an id more than once, only the first
    /// occurrence is kept.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        let recipes: Vec<FavoriteRecipe> =
            serde_json::from_slice(bytes).map_err(ModelError::Decode)?;

        let mut seen = HashSet::new();
        let total = recipes.len();
        let recipes: Vec<FavoriteRecipe> = recipes
            .into_iter()
            .filter(|recipe| seen.insert(recipe.id.clone()))
            .collect();
        if recipes.len() != total {
            tracing::warn!(
                dropped = total - recipes.len(),
                "dropped duplicate favorites while decoding"
            );
        }

        Ok(FavoritesCollection { recipes })
    }

    /// Encodes the collection for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        serde_json::to_vec(&self.recipes).map_err(ModelError::Encode)
    }

    /// Returns true if a favorite with `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|recipe| recipe.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&FavoriteRecipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FavoriteRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn as_slice(&self) -> &[FavoriteRecipe] {
        &self.recipes
    }

    /// Returns a copy with `recipe` appended.
    ///
    /// Fails if a favorite with the same id is already present.
    pub fn with_added(&self, recipe: FavoriteRecipe) -> Result<Self, ModelError> {
        if self.contains(&recipe.id) {
            return Err(ModelError::DuplicateId(recipe.id));
        }
        let mut recipes = self.recipes.clone();
        recipes.push(recipe);
        Ok(FavoritesCollection { recipes })
    }

    /// Returns a copy without any favorite whose id is `id`.
    pub fn without(&self, id: &str) -> Self {
        FavoritesCollection {
            recipes: self
                .recipes
                .iter()
                .filter(|recipe| recipe.id != id)
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FavoritesCollection {
    type Item = &'a FavoriteRecipe;
    type IntoIter = std::slice::Iter<'a, FavoriteRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

impl IntoIterator for FavoritesCollection {
    type Item = FavoriteRecipe;
    type IntoIter = std::vec::IntoIter<FavoriteRecipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.into_iter()
    }
}

impl FromIterator<FavoriteRecipe> for FavoritesCollection {
    fn from_iter<I: IntoIterator<Item = FavoriteRecipe>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        FavoritesCollection {
            recipes: iter
                .into_iter()
                .filter(|recipe| seen.insert(recipe.id.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn recipe(id: &str, title: &str) -> FavoriteRecipe {
        let source = serde_json::from_value(serde_json::json!({ "title": title })).unwrap();
        FavoriteRecipe::new(id, source)
    }

    #[test]
    fn test_decode_reference_payload() {
        let payload = indoc! {r#"
            [
                {"_id": "recipe-1", "_source": {"title": "Test Recipe", "description": "A test recipe"}},
                {"_id": "recipe-2", "_source": {"title": "Another Recipe"}}
            ]"#};

        let collection = FavoritesCollection::from_bytes(payload.as_bytes()).unwrap();
        assert_eq!(collection.len(), 2);
        let ids: Vec<&str> = collection.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["recipe-1", "recipe-2"]);
        assert_eq!(
            collection.get("recipe-1").unwrap().source.description(),
            Some("A test recipe")
        );
    }

    #[test]
    fn test_decode_accepts_plain_field_names() {
        let payload = r#"[{"id": "r1", "source": {"title": "Soup"}}, {"id": "r2"}]"#;
        let collection = FavoritesCollection::from_bytes(payload.as_bytes()).unwrap();
        assert_eq!(collection.get("r1").unwrap().title(), Some("Soup"));
        assert!(collection.get("r2").unwrap().source.is_empty());
    }

    #[test]
    fn test_decode_null_source_as_empty() {
        let payload = r#"[{"_id":"r1","_source":{"title":"Soup"}},{"_id":"r2","_source":null}]"#;
        let collection = FavoritesCollection::from_bytes(payload.as_bytes()).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("r1").unwrap().title(), Some("Soup"));
        assert!(collection.get("r2").unwrap().source.is_empty());

        // Re-encoding writes an empty object in place of null
        let encoded = String::from_utf8(collection.to_bytes().unwrap()).unwrap();
        assert_eq!(
            encoded,
            r#"[{"_id":"r1","_source":{"title":"Soup"}},{"_id":"r2","_source":{}}]"#
        );
    }

    #[test]
    fn test_encode_uses_underscore_fields() {
        let collection = FavoritesCollection::new()
            .with_added(recipe("r1", "Soup"))
            .unwrap();
        let encoded = String::from_utf8(collection.to_bytes().unwrap()).unwrap();
        assert_eq!(encoded, r#"[{"_id":"r1","_source":{"title":"Soup"}}]"#);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            FavoritesCollection::from_bytes(b"{not json"),
            Err(ModelError::Decode(_))
        ));
        assert!(matches!(
            FavoritesCollection::from_bytes(br#"{"_id": "r1"}"#),
            Err(ModelError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_drops_duplicate_ids() {
        let payload = r#"[
            {"_id": "r1", "_source": {"title": "First"}},
            {"_id": "r1", "_source": {"title": "Second"}}
        ]"#;
        let collection = FavoritesCollection::from_bytes(payload.as_bytes()).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("r1").unwrap().title(), Some("First"));
    }

    #[test]
    fn test_with_added_rejects_duplicates() {
        let collection = FavoritesCollection::new()
            .with_added(recipe("r1", "Soup"))
            .unwrap();
        let result = collection.with_added(recipe("r1", "Other"));
        assert!(matches!(result, Err(ModelError::DuplicateId(id)) if id == "r1"));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_without_preserves_order_and_payload() {
        let a = recipe("a", "A");
        let b = recipe("b", "B");
        let c = recipe("c", "C");
        let collection: FavoritesCollection = vec![a, b.clone(), c].into_iter().collect();

        let remaining = collection.without("a");
        let ids: Vec<&str> = remaining.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(remaining.get("b").unwrap().source, b.source);

        // Unknown ids leave the collection untouched
        assert_eq!(collection.without("zzz"), collection);
    }

    #[test]
    fn test_equality_is_by_id() {
        assert_eq!(recipe("r1", "Soup"), recipe("r1", "Stew"));
        assert_ne!(recipe("r1", "Soup"), recipe("r2", "Soup"));
    }
}
