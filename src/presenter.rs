// presenter.rs
use crate::dom::{DETAILS_CONTENT_CLASS, Element, Node, SHOW_RECIPE_CLASS};
use crate::meal::MealDetail;

/// Fills the recipe overlay and toggles its visibility.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecipePresenter;

impl RecipePresenter {
    /// Renders the first record into the overlay's content container and
    /// shows the overlay. Nothing changes when `meals` is empty.
    pub fn present(&self, meals: &[MealDetail], overlay: &mut Element) -> bool {
        tracing::debug!(?meals, "recipe lookup payload");
        let Some(meal) = meals.first() else {
            log::info!("recipe lookup returned no meal");
            return false;
        };
        let Some(content) = overlay.find_by_class_mut(DETAILS_CONTENT_CLASS) else {
            log::warn!("recipe overlay has no content container");
            return false;
        };
        content.replace_children(recipe_nodes(meal));
        overlay.class_list_mut().add(SHOW_RECIPE_CLASS);
        true
    }

    /// Hides the overlay. Safe to call when it is already hidden.
    pub fn dismiss(&self, overlay: &mut Element) {
        overlay.class_list_mut().remove(SHOW_RECIPE_CLASS);
    }
}

fn recipe_nodes(meal: &MealDetail) -> Vec<Node> {
    let mut nodes: Vec<Node> = vec![
        Element::new("h2")
            .with_class("recipe-title")
            .with_text(meal.name.as_str())
            .into(),
        Element::new("p")
            .with_class("recipe-category")
            .with_text(meal.category.as_str())
            .into(),
    ];

    if !meal.area.is_empty() || !meal.tags.is_empty() {
        let mut meta = vec![meal.area.clone()];
        meta.extend(meal.tags.iter().cloned());
        meta.retain(|m| !m.is_empty());
        nodes.push(
            Element::new("p")
                .with_class("recipe-meta")
                .with_text(meta.join(" \u{b7} "))
                .into(),
        );
    }

    if !meal.ingredients.is_empty() {
        let list = meal.ingredients.iter().fold(Element::new("ul"), |ul, i| {
            let line = if i.measure.is_empty() {
                i.name.clone()
            } else {
                format!("{} {}", i.measure, i.name)
            };
            ul.with_child(Element::new("li").with_text(line))
        });
        nodes.push(
            Element::new("div")
                .with_class("recipe-ingredients")
                .with_child(Element::new("h3").with_text("Ingredients:"))
                .with_child(list)
                .into(),
        );
    }

    nodes.push(
        Element::new("div")
            .with_class("recipe-instruct")
            .with_child(Element::new("h3").with_text("Instructions:"))
            .with_child(Element::new("p").with_text(meal.instructions.as_str()))
            .into(),
    );
    nodes.push(
        Element::new("div")
            .with_class("recipe-meal-img")
            .with_child(
                Element::new("img")
                    .with_attr("src", meal.thumbnail_url.as_str())
                    .with_attr("alt", ""),
            )
            .into(),
    );
    if let Some(video) = &meal.video_url {
        nodes.push(
            Element::new("div")
                .with_class("recipe-link")
                .with_child(
                    Element::new("a")
                        .with_attr("href", video.as_str())
                        .with_attr("target", "_blank")
                        .with_attr("rel", "noopener")
                        .with_text("Watch Video"),
                )
                .into(),
        );
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, ModalState};
    use crate::meal::Ingredient;
    use crate::source::fake;

    #[test]
    fn presents_first_record_and_shows_overlay() {
        let mut doc = Document::new();
        let meals = vec![fake::detail("52841", "Tandoori chicken"), fake::detail("1", "Other")];

        assert!(RecipePresenter.present(&meals, &mut doc.meal_details));

        assert_eq!(doc.modal_state(), ModalState::Visible);
        let content = doc.meal_details.find_by_class(DETAILS_CONTENT_CLASS).unwrap();
        let title = content.find_by_class("recipe-title").unwrap();
        assert_eq!(title.text_content(), "Tandoori chicken");
        assert_eq!(content.find_by_class("recipe-category").unwrap().text_content(), "Chicken");
        assert!(content.text_content().contains("Cook the Tandoori chicken."));
        assert!(!content.text_content().contains("Other"));

        let link = content.find_by_class("recipe-link").unwrap().child_elements().next().unwrap();
        assert_eq!(link.attr("href"), Some("https://www.youtube.com/watch?v=52841"));
        assert_eq!(link.attr("target"), Some("_blank"));
    }

    #[test]
    fn missing_fields_render_blank() {
        let mut overlay = Document::new().meal_details;
        assert!(RecipePresenter.present(&[MealDetail::default()], &mut overlay));

        let content = overlay.find_by_class(DETAILS_CONTENT_CLASS).unwrap();
        assert_eq!(content.find_by_class("recipe-title").unwrap().text_content(), "");
        assert!(content.find_by_class("recipe-link").is_none());
        assert!(content.find_by_class("recipe-ingredients").is_none());
    }

    #[test]
    fn ingredients_and_meta_are_listed() {
        let mut overlay = Document::new().meal_details;
        let meal = MealDetail {
            area: "Indian".into(),
            tags: vec!["Spicy".into()],
            ingredients: vec![
                Ingredient { name: "Chicken".into(), measure: "4 pieces".into() },
                Ingredient { name: "Salt".into(), measure: "".into() },
            ],
            ..fake::detail("52841", "Tandoori chicken")
        };
        RecipePresenter.present(&[meal], &mut overlay);

        let content = overlay.find_by_class(DETAILS_CONTENT_CLASS).unwrap();
        assert_eq!(content.find_by_class("recipe-meta").unwrap().text_content(), "Indian \u{b7} Spicy");
        let ingredients = content.find_by_class("recipe-ingredients").unwrap().text_content();
        assert!(ingredients.contains("4 pieces Chicken"));
        assert!(ingredients.contains("Salt"));
    }

    #[test]
    fn empty_payload_leaves_overlay_hidden() {
        let mut doc = Document::new();
        assert!(!RecipePresenter.present(&[], &mut doc.meal_details));
        assert_eq!(doc.modal_state(), ModalState::Hidden);
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut doc = Document::new();
        RecipePresenter.dismiss(&mut doc.meal_details);
        assert_eq!(doc.modal_state(), ModalState::Hidden);

        RecipePresenter.present(&[fake::detail("1", "Pie")], &mut doc.meal_details);
        RecipePresenter.dismiss(&mut doc.meal_details);
        RecipePresenter.dismiss(&mut doc.meal_details);
        assert_eq!(doc.modal_state(), ModalState::Hidden);
    }
}
