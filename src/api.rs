use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::error::MealError;
use crate::meal::{Ingredient, MealDetail, MealSummary};
use crate::SharedState;

/// OpenAPI doc container
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "meal-finder", description = "Meal search REST API")
    )
)]
pub struct ApiDoc;

/// Utoipa-compatible router with documented routes
pub fn router() -> OpenApiRouter<SharedState> {
    OpenApiRouter::new()
        .routes(routes!(filter_meals))
        .routes(routes!(lookup_meal))
}

/// API-compatible version of a search hit
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonMealSummary {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
}

impl From<MealSummary> for JsonMealSummary {
    fn from(m: MealSummary) -> Self {
        JsonMealSummary {
            id: m.id,
            name: m.name,
            thumbnail_url: m.thumbnail_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonMealList {
    pub ingredient: String,
    pub meals: Vec<JsonMealSummary>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonIngredient {
    pub name: String,
    pub measure: String,
}

impl From<Ingredient> for JsonIngredient {
    fn from(i: Ingredient) -> Self {
        JsonIngredient {
            name: i.name,
            measure: i.measure,
        }
    }
}

/// API-compatible version of a full recipe
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JsonMealDetail {
    pub id: String,
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub thumbnail_url: String,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<JsonIngredient>,
}

impl From<MealDetail> for JsonMealDetail {
    fn from(m: MealDetail) -> Self {
        JsonMealDetail {
            id: m.id,
            name: m.name,
            category: m.category,
            area: m.area,
            instructions: m.instructions,
            thumbnail_url: m.thumbnail_url,
            video_url: m.video_url,
            tags: m.tags,
            ingredients: m.ingredients.into_iter().map(JsonIngredient::from).collect(),
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterParams {
    /// Ingredient to search for; surrounding whitespace is ignored.
    #[serde(default)]
    pub ingredient: String,
}

/// List meals that use an ingredient
#[utoipa::path(
    get,
    path = "/api/filter",
    params(FilterParams),
    responses(
        (status = 200, description = "Meals using the ingredient (possibly none)", body = JsonMealList),
        (status = 502, description = "Meal service unavailable"),
    )
)]
pub async fn filter_meals(
    State(app_state): State<SharedState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<JsonMealList>, MealError> {
    let ingredient = params.ingredient.trim().to_string();
    let meals = app_state
        .source
        .filter_by_ingredient(&ingredient)
        .await?
        .unwrap_or_default()
        .into_iter()
        .map(JsonMealSummary::from)
        .collect();
    Ok(Json(JsonMealList { ingredient, meals }))
}

/// Get a meal's recipe by id
#[utoipa::path(
    get,
    path = "/api/lookup/{id}",
    params(("id" = String, Path, description = "Meal id")),
    responses(
        (status = 200, description = "The recipe", body = JsonMealDetail),
        (status = 404, description = "No matching meal"),
        (status = 502, description = "Meal service unavailable"),
    )
)]
pub async fn lookup_meal(
    State(app_state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, MealError> {
    let meal = app_state
        .source
        .lookup(&id)
        .await?
        .and_then(|meals| meals.into_iter().next());
    match meal {
        Some(meal) => Ok(Json(JsonMealDetail::from(meal)).into_response()),
        None => {
            log::warn!("no meal with id {}", id);
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}
