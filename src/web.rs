use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{self, Redirect},
    routing,
};
use serde::Deserialize;

use crate::dom::ClickEvent;
use crate::error::MealError;
use crate::templates::IndexTemplate;
use crate::SharedState;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub ingredient: String,
}

#[derive(Deserialize)]
pub struct ClickParams {
    pub target: String,
    /// Render generation of the list the link came from.
    pub r#gen: u64,
}

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", routing::get(index))
        .route("/search", routing::get(search))
        .route("/click", routing::get(click))
        .route("/close", routing::get(close))
}

/// GET / : the page as it currently stands
pub async fn index(State(app_state): State<SharedState>) -> Result<response::Html<String>, MealError> {
    let doc = app_state.document.read().await;
    let template = IndexTemplate::new(&doc);
    Ok(response::Html(template.render()?))
}

/// GET /search?ingredient=
pub async fn search(
    State(app_state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Redirect {
    app_state
        .search
        .submit(&app_state.document, params.ingredient)
        .await;
    Redirect::to("/")
}

/// GET /click?target=i/j/k&gen=n : a click delegated from the results list
pub async fn click(
    State(app_state): State<SharedState>,
    Query(params): Query<ClickParams>,
) -> Result<Redirect, MealError> {
    let event = ClickEvent::parse(&params.target)
        .ok_or_else(|| MealError::InvalidTarget(params.target.clone()))?
        .with_generation(params.r#gen);
    app_state
        .selector
        .run(&app_state.document, event, &app_state.presenter)
        .await;
    Ok(Redirect::to("/"))
}

/// GET /close
pub async fn close(State(app_state): State<SharedState>) -> Redirect {
    let mut doc = app_state.document.write().await;
    app_state.presenter.dismiss(&mut doc.meal_details);
    Redirect::to("/")
}
