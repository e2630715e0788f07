// search.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::dom::{
    Document, Element, FETCH_ERROR_CLASS, GENERATION_KEY, MEAL_ITEM_CLASS, NOT_FOUND_CLASS,
    Node, RECIPE_BUTTON_CLASS,
};
use crate::error::MealError;
use crate::meal::MealSummary;
use crate::source::MealSource;

pub const NOT_FOUND_MESSAGE: &str = "Sorry, we didn't find any meal!";
pub const FETCH_ERROR_MESSAGE: &str =
    "Something went wrong while searching for meals. Please try again.";

/// A search that has been issued but not yet rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub ingredient: String,
    generation: u64,
}

/// Reads the search box, asks the ingredient filter endpoint, and fills the
/// results list.
///
/// Every search takes a generation number when it starts. Only the response
/// belonging to the newest generation is rendered, so a slow early search can
/// not overwrite a faster later one.
pub struct SearchTrigger {
    source: Arc<dyn MealSource>,
    generation: AtomicU64,
}

impl SearchTrigger {
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
        }
    }

    pub fn begin(&self, input: &str) -> SearchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            ingredient: input.trim().to_string(),
            generation,
        }
    }

    pub async fn fetch(
        &self,
        ticket: &SearchTicket,
    ) -> Result<Option<Vec<MealSummary>>, MealError> {
        self.source.filter_by_ingredient(&ticket.ingredient).await
    }

    /// Replaces the contents of `meal_list` with the outcome and stamps it with
    /// the ticket's generation. Returns `false` when a newer search has started
    /// since `ticket` was issued.
    pub fn render(
        &self,
        ticket: &SearchTicket,
        outcome: Result<Option<Vec<MealSummary>>, MealError>,
        meal_list: &mut Element,
    ) -> bool {
        if ticket.generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(
                ingredient = %ticket.ingredient,
                generation = ticket.generation,
                "dropping stale search response"
            );
            return false;
        }

        let classes = meal_list.class_list_mut();
        match outcome {
            Ok(Some(meals)) if !meals.is_empty() => {
                tracing::info!(ingredient = %ticket.ingredient, count = meals.len(), "meals found");
                classes.remove(NOT_FOUND_CLASS);
                classes.remove(FETCH_ERROR_CLASS);
                let cards: Vec<Node> = meals.iter().map(|meal| meal_card(meal).into()).collect();
                meal_list.replace_children(cards);
            }
            Ok(_) => {
                tracing::info!(ingredient = %ticket.ingredient, "no meals found");
                classes.remove(FETCH_ERROR_CLASS);
                classes.add(NOT_FOUND_CLASS);
                meal_list.set_text(NOT_FOUND_MESSAGE);
            }
            Err(e) => {
                tracing::warn!(ingredient = %ticket.ingredient, error = %e, "meal search failed");
                classes.remove(NOT_FOUND_CLASS);
                classes.add(FETCH_ERROR_CLASS);
                meal_list.set_text(FETCH_ERROR_MESSAGE);
            }
        }
        meal_list.set_data(GENERATION_KEY, ticket.generation.to_string());
        true
    }

    /// The whole search cycle against a shared document. No lock is held while
    /// the request is in flight.
    pub async fn run(&self, document: &RwLock<Document>) -> bool {
        let ticket = {
            let doc = document.read().await;
            self.begin(&doc.search_input)
        };
        self.complete(&ticket, document).await
    }

    /// Types `input` into the search box and starts the search under the same
    /// guard, so concurrent submissions each search their own input.
    pub async fn submit(&self, document: &RwLock<Document>, input: String) -> bool {
        let ticket = {
            let mut doc = document.write().await;
            let ticket = self.begin(&input);
            doc.search_input = input;
            ticket
        };
        self.complete(&ticket, document).await
    }

    async fn complete(&self, ticket: &SearchTicket, document: &RwLock<Document>) -> bool {
        let outcome = self.fetch(ticket).await;
        let mut doc = document.write().await;
        self.render(ticket, outcome, &mut doc.meal_list)
    }
}

fn meal_card(meal: &MealSummary) -> Element {
    Element::new("div")
        .with_class(MEAL_ITEM_CLASS)
        .with_data("id", meal.id.as_str())
        .with_child(
            Element::new("div")
                .with_class("meal-img")
                .with_child(
                    Element::new("img")
                        .with_attr("src", meal.thumbnail_url.as_str())
                        .with_attr("alt", "food"),
                ),
        )
        .with_child(
            Element::new("div")
                .with_class("meal-name")
                .with_child(Element::new("h3").with_text(meal.name.as_str()))
                .with_child(
                    Element::new("a")
                        .with_class(RECIPE_BUTTON_CLASS)
                        .with_attr("href", "#")
                        .with_text("Get Recipe"),
                ),
        )
}
