use serde::{ Serialize, Deserialize, Deserializer };
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub price: Option<i64>,
    #[serde(default)]
    pub price_formatted: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopee_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokopedia_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub related_products: Vec<Product>,
}

impl Product {
    /// Lowercased category name, empty when the product has none.
    pub fn category_lower(&self) -> String {
        self.category_name.as_deref().unwrap_or_default().to_lowercase()
    }

    pub fn name_lower(&self) -> String {
        self.name.to_lowercase()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub product_count: Option<i64>,
}

/// Flat site metadata. Remote payloads occasionally send `[]` for an empty
/// settings table, so anything that is not an object decodes as empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub struct Settings {
    values: BTreeMap<String, JsonValue>,
}

impl Settings {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
        where I: IntoIterator<Item = (K, V)>, K: Into<String>, V: Into<String>
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), JsonValue::String(v.into())))
                .collect(),
        }
    }

    /// Non-empty string value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(JsonValue::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<JsonValue> for Settings {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Self { values: map.into_iter().collect() },
            _ => Self::default(),
        }
    }
}

impl From<Settings> for JsonValue {
    fn from(settings: Settings) -> Self {
        JsonValue::Object(settings.values.into_iter().collect())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "fullContent", skip_serializing_if = "Option::is_none")]
    pub full_content: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HomepageStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_products: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_categories: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HomepageData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured_products: Vec<Product>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latest_products: Vec<Product>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inspirations: Vec<Article>,
    #[serde(default)]
    pub stats: Option<HomepageStats>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hero_images: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListMeta {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub page: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub limit: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: u64,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_prev: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub has_next: bool,
}

/// `{ "data": ..., "meta": ... }` wrapper used by every catalog endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub meta: ListMeta,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ArticleDetail {
    pub article: Article,
    pub related: Vec<Article>,
}

/// Accepts numbers, numeric strings (`"15000.00"`) and null, the way the
/// PHP backend tends to mix them. Strings are read like `parseInt`: leading
/// digits only.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where D: Deserializer<'de>
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(parse_lenient_int(&value))
}

pub fn parse_lenient_int(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        JsonValue::String(s) => {
            let trimmed = s.trim_start();
            let (sign, digits) = match trimmed.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
            };
            let end = digits
                .char_indices()
                .find(|(_, c)| !c.is_ascii_digit())
                .map(|(i, _)| i)
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| n * sign)
        }
        _ => None,
    }
}

/// Non-negative counter from a number, numeric string or null.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where D: Deserializer<'de>
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(parse_lenient_int(&value).map_or(0, |n| n.max(0) as u64))
}

/// `null` decodes as the field's default, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where D: Deserializer<'de>, T: Default + Deserialize<'de>
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where D: Deserializer<'de>
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(match value {
        JsonValue::Bool(b) => b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        JsonValue::String(s) => matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
        _ => false,
    })
}
