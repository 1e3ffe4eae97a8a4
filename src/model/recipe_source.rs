use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field names with dedicated accessors. Anything else is an extra field.
const DECLARED_FIELDS: &[&str] = &[
    "title",
    "description",
    "ingredients",
    "instructions",
    "cookTime",
    "servings",
    "tags",
];

/// The document body of a recipe as returned by the search backend.
///
/// The payload is kept as an open JSON object so that nothing the backend
/// sends is lost when a recipe is favorited. Common fields are reachable
/// through typed accessors, everything else through [`RecipeSource::get`]
/// and [`RecipeSource::extra_fields`].
///
/// # Examples
///
/// ```
/// # use recipe_favorites::RecipeSource;
/// let source: RecipeSource = serde_json::from_str(
///     r#"{"title": "Pancakes", "servings": 4, "cuisine": "American"}"#,
/// ).unwrap();
///
/// assert_eq!(source.title(), Some("Pancakes"));
/// assert_eq!(source.servings(), Some(4));
/// assert_eq!(
///     source.extra_fields(),
///     vec![("Cuisine".to_string(), "American".to_string())]
/// );
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RecipeSource {
    data: Map<String, Value>,
}

impl RecipeSource {
    /// Wraps an already parsed JSON object.
    pub fn from_map(data: Map<String, Value>) -> Self {
        RecipeSource { data }
    }

    /// Deserializes a payload field, reading `null` as an empty source.
    pub(crate) fn deserialize_or_empty<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RecipeSource>::deserialize(deserializer).map(Option::unwrap_or_default)
    }

    /// Returns the recipe title.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(|v| v.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.data.get("description").and_then(|v| v.as_str())
    }

    /// Returns a field by its key.
    ///
    /// This works for declared fields as well as any custom field the
    /// backend attached to the document.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the number of servings if it is an integer.
    pub fn servings(&self) -> Option<i64> {
        self.data.get("servings").and_then(|v| v.as_i64())
    }

    /// Returns the servings as display text.
    ///
    /// Unlike [`servings`](Self::servings) this keeps ranges (`"4-6"`) and
    /// fractional counts.
    pub fn servings_text(&self) -> Option<String> {
        self.data
            .get("servings")
            .filter(|v| is_truthy(v))
            .map(scalar_text)
    }

    /// Returns the cook time as display text.
    ///
    /// Backends send either a string (`"30 min"`) or a bare number of minutes.
    pub fn cook_time(&self) -> Option<String> {
        self.data
            .get("cookTime")
            .filter(|v| is_truthy(v))
            .map(scalar_text)
    }

    /// Returns the ingredients as display lines.
    ///
    /// Each array element becomes one line. Structured ingredients are
    /// rendered as `"<quantity> <unit> <name>"` with `" (<notes>)"` appended
    /// when notes are present; missing parts are skipped. A non-array value
    /// is returned as a single line.
    pub fn ingredients(&self) -> Vec<String> {
        match self.data.get("ingredients") {
            Some(Value::Array(items)) => items.iter().map(ingredient_line).collect(),
            Some(v) if is_truthy(v) => vec![scalar_text(v)],
            _ => Vec::new(),
        }
    }

    /// Returns the instruction steps in order.
    ///
    /// Structured steps use the first of `text`, `instruction` or
    /// `description` that is present, falling back to their JSON form.
    pub fn instructions(&self) -> Vec<String> {
        match self.data.get("instructions") {
            Some(Value::Array(steps)) => steps.iter().map(instruction_text).collect(),
            Some(v) if is_truthy(v) => vec![scalar_text(v)],
            _ => Vec::new(),
        }
    }

    /// Returns all tags.
    ///
    /// Tags may be an array of strings or a comma-separated string.
    pub fn tags(&self) -> Vec<String> {
        match self.data.get("tags") {
            Some(Value::String(tag_str)) => tag_str
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::Array(arr)) => arr
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns every non-empty field without a dedicated accessor.
    ///
    /// Each entry is `(label, display value)`. The label is the key with its
    /// first character upper-cased. Arrays of strings are joined with `", "`,
    /// other arrays and objects are rendered as JSON. Fields keep the order
    /// in which the backend sent them.
    pub fn extra_fields(&self) -> Vec<(String, String)> {
        self.data
            .iter()
            .filter(|(key, value)| !DECLARED_FIELDS.contains(&key.as_str()) && is_truthy(value))
            .map(|(key, value)| (field_label(key), display_value(value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }
}

/// Mirrors the truthiness the detail view uses to decide whether to show a field.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ingredient_line(ingredient: &Value) -> String {
    let Value::Object(fields) = ingredient else {
        return scalar_text(ingredient);
    };

    let parts: Vec<String> = ["quantity", "unit", "name"]
        .iter()
        .filter_map(|key| fields.get(*key).filter(|v| is_truthy(v)).map(scalar_text))
        .collect();

    match fields.get("notes").filter(|v| is_truthy(v)) {
        Some(notes) => format!("{} ({})", parts.join(" "), scalar_text(notes)),
        None => parts.join(" "),
    }
}

fn instruction_text(step: &Value) -> String {
    let Value::Object(fields) = step else {
        return scalar_text(step);
    };

    ["text", "instruction", "description"]
        .iter()
        .find_map(|key| fields.get(*key).filter(|v| is_truthy(v)).map(scalar_text))
        .unwrap_or_else(|| step.to_string())
}

fn field_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        other => scalar_text(other),
    }
}
