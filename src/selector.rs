// selector.rs
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::dom::{
    ClickEvent, Document, Element, GENERATION_KEY, MEAL_ITEM_CLASS, RECIPE_BUTTON_CLASS,
};
use crate::presenter::RecipePresenter;
use crate::source::MealSource;

/// Handles clicks delegated from the results container.
///
/// A single selector serves every card currently rendered, so re-rendering
/// the list never needs re-binding. Only a click whose exact target carries
/// `target_class` leads to a lookup; the id comes from the nearest enclosing
/// element carrying `item_class`. A click stamped with an older render
/// generation than the container's is dropped, since its path now points at
/// somebody else's card.
pub struct RecipeSelector {
    source: Arc<dyn MealSource>,
    target_class: &'static str,
    item_class: &'static str,
}

impl RecipeSelector {
    pub fn new(source: Arc<dyn MealSource>) -> Self {
        Self::with_classes(source, RECIPE_BUTTON_CLASS, MEAL_ITEM_CLASS)
    }

    pub fn with_classes(
        source: Arc<dyn MealSource>,
        target_class: &'static str,
        item_class: &'static str,
    ) -> Self {
        Self {
            source,
            target_class,
            item_class,
        }
    }

    /// The meal id a click refers to, if it landed on the affordance.
    pub fn resolve(&self, container: &Element, event: &mut ClickEvent) -> Option<String> {
        event.prevent_default();
        if let Some(seen) = event.generation() {
            let current = container
                .dataset(GENERATION_KEY)
                .and_then(|g| g.parse::<u64>().ok());
            if current != Some(seen) {
                tracing::debug!(seen, ?current, "click aimed at an earlier render");
                return None;
            }
        }
        let target = container.element_at(event.target())?;
        if !target.class_list().contains(self.target_class) {
            return None;
        }
        let item = container.closest(event.target(), self.item_class)?;
        item.dataset("id").map(str::to_string)
    }

    /// Resolves the click, looks the meal up, and hands the result to the
    /// presenter. Returns whether the overlay was filled.
    pub async fn run(
        &self,
        document: &RwLock<Document>,
        mut event: ClickEvent,
        presenter: &RecipePresenter,
    ) -> bool {
        let id = {
            let doc = document.read().await;
            self.resolve(&doc.meal_list, &mut event)
        };
        let Some(id) = id else {
            tracing::debug!(path = ?event.target(), "click outside recipe button ignored");
            return false;
        };

        match self.source.lookup(&id).await {
            Ok(meals) => {
                let meals = meals.unwrap_or_default();
                let mut doc = document.write().await;
                presenter.present(&meals, &mut doc.meal_details)
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "recipe lookup failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ModalState;
    use crate::search::SearchTrigger;
    use crate::source::fake::{self, FakeSource};

    async fn searched(source: &Arc<FakeSource>, input: &str) -> RwLock<Document> {
        let mut doc = Document::new();
        doc.search_input = input.to_string();
        let doc = RwLock::new(doc);
        SearchTrigger::new(source.clone()).run(&doc).await;
        doc
    }

    #[tokio::test]
    async fn recipe_button_click_looks_up_that_card() {
        let source = Arc::new(fake::chicken());
        let doc = searched(&source, "chicken_breast").await;
        let selector = RecipeSelector::new(source.clone());

        let shown = selector
            .run(&doc, ClickEvent::new(vec![1, 1, 1]), &RecipePresenter)
            .await;

        assert!(shown);
        assert_eq!(source.requests(), vec!["filter:chicken_breast", "lookup:52841"]);
        let doc = doc.read().await;
        assert_eq!(doc.modal_state(), ModalState::Visible);
        assert!(doc.meal_details.text_content().contains("Tandoori chicken"));
    }

    #[tokio::test]
    async fn clicks_elsewhere_in_a_card_do_nothing() {
        let source = Arc::new(fake::chicken());
        let doc = searched(&source, "chicken_breast").await;
        let selector = RecipeSelector::new(source.clone());

        // thumbnail, title, card body, missing node
        for path in [vec![0, 0, 0], vec![0, 1, 0], vec![0], vec![9, 1, 1]] {
            assert!(!selector.run(&doc, ClickEvent::new(path), &RecipePresenter).await);
        }

        assert_eq!(source.requests(), vec!["filter:chicken_breast"]);
        assert_eq!(doc.read().await.modal_state(), ModalState::Hidden);
    }

    #[tokio::test]
    async fn resolve_prevents_default_and_reads_the_card_id() {
        let source = Arc::new(fake::chicken());
        let selector = RecipeSelector::new(source.clone());
        let doc = searched(&source, "chicken_breast").await;

        let mut event = ClickEvent::new(vec![0, 1, 1]).with_generation(1);
        let id = selector.resolve(&doc.read().await.meal_list, &mut event);
        assert_eq!(id.as_deref(), Some("52940"));
        assert!(event.default_prevented());

        let mut thumbnail = ClickEvent::new(vec![0, 0, 0]).with_generation(1);
        assert!(selector.resolve(&doc.read().await.meal_list, &mut thumbnail).is_none());
        assert!(thumbnail.default_prevented());
    }

    #[tokio::test]
    async fn click_on_a_replaced_list_looks_nothing_up() {
        let mut both = fake::chicken();
        both.by_ingredient
            .insert("beef".to_string(), vec![fake::summary("53001", "Beef pie")]);
        both.by_id
            .insert("53001".to_string(), fake::detail("53001", "Beef pie"));
        let source = Arc::new(both);
        let selector = RecipeSelector::new(source.clone());
        let trigger = SearchTrigger::new(source.clone());
        let doc = RwLock::new(Document::new());

        // the user sees the chicken list, render generation 1
        trigger.submit(&doc, "chicken_breast".to_string()).await;
        // someone else replaces it before the click arrives
        trigger.submit(&doc, "beef".to_string()).await;

        let event = ClickEvent::new(vec![0, 1, 1]).with_generation(1);
        assert!(!selector.run(&doc, event, &RecipePresenter).await);

        assert_eq!(source.requests(), vec!["filter:chicken_breast", "filter:beef"]);
        assert_eq!(doc.read().await.modal_state(), ModalState::Hidden);

        // the current render still works
        let event = ClickEvent::new(vec![0, 1, 1]).with_generation(2);
        assert!(selector.run(&doc, event, &RecipePresenter).await);
        assert_eq!(source.requests().last().map(String::as_str), Some("lookup:53001"));
    }

    #[tokio::test]
    async fn failed_lookup_keeps_overlay_hidden() {
        let source = Arc::new(fake::chicken());
        let doc = searched(&source, "chicken_breast").await;
        let failing = Arc::new(FakeSource {
            fail: true,
            ..FakeSource::default()
        });
        let selector = RecipeSelector::new(failing.clone());

        assert!(!selector.run(&doc, ClickEvent::new(vec![0, 1, 1]), &RecipePresenter).await);
        assert_eq!(failing.requests(), vec!["lookup:52940"]);
        assert_eq!(doc.read().await.modal_state(), ModalState::Hidden);
    }
}
