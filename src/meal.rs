// meal.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Highest ingredient/measure slot the remote record carries.
const INGREDIENT_SLOTS: usize = 20;

/// Wrapper the remote service puts around every answer; `meals` is `null`
/// when nothing matched.
#[derive(Debug, Deserialize)]
pub struct Meals<T> {
    pub meals: Option<Vec<T>>,
}

/// A search hit, enough to draw one card in the results list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal", default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(rename = "strMeal", default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "nullable")]
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// Full recipe as returned by the lookup endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMealDetail")]
pub struct MealDetail {
    pub id: String,
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub thumbnail_url: String,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Deserialize)]
struct RawMealDetail {
    #[serde(rename = "idMeal", default, deserialize_with = "nullable")]
    id: String,
    #[serde(rename = "strMeal", default, deserialize_with = "nullable")]
    name: String,
    #[serde(rename = "strCategory", default, deserialize_with = "nullable")]
    category: String,
    #[serde(rename = "strArea", default, deserialize_with = "nullable")]
    area: String,
    #[serde(rename = "strInstructions", default, deserialize_with = "nullable")]
    instructions: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "nullable")]
    thumbnail_url: String,
    #[serde(rename = "strYoutube", default, deserialize_with = "nullable")]
    video_url: String,
    #[serde(rename = "strTags", default, deserialize_with = "nullable")]
    tags: String,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

impl From<RawMealDetail> for MealDetail {
    fn from(raw: RawMealDetail) -> Self {
        let slot = |prefix: &str, n: usize| {
            raw.rest
                .get(&format!("{prefix}{n}"))
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };
        let ingredients = (1..=INGREDIENT_SLOTS)
            .map(|n| Ingredient {
                name: slot("strIngredient", n),
                measure: slot("strMeasure", n),
            })
            .filter(|i| !i.name.is_empty())
            .collect();

        let tags = raw
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        let video_url = Some(raw.video_url.trim().to_string()).filter(|v| !v.is_empty());

        MealDetail {
            id: raw.id,
            name: raw.name,
            category: raw.category,
            area: raw.area,
            instructions: raw.instructions,
            thumbnail_url: raw.thumbnail_url,
            video_url,
            tags,
            ingredients,
        }
    }
}

/// Remote fields are routinely `null`; treat that the same as missing.
fn nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
