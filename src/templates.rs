// Bring in Askama templating
use askama::Template;

use crate::dom::{Document, GENERATION_KEY, format_path};

// Page shell around the rendered document
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub search_input: &'a str,
    pub meal_list: String,        // results container markup
    pub meal_details: String,     // recipe overlay markup
    pub stylesheet: &'static str, // Path to CSS file
}

impl<'a> IndexTemplate<'a> {
    /// Links inside the results list are pointed at `/click` so each anchor
    /// delivers its own path, and the render it belongs to, to the delegated
    /// handler.
    pub fn new(doc: &'a Document) -> Self {
        let generation = doc.meal_list.dataset(GENERATION_KEY).unwrap_or("0").to_string();
        let mut meal_list = doc.meal_list.clone();
        meal_list.for_each_descendant_mut(&mut |path, element| {
            if element.tag() == "a" {
                let href = format!("/click?target={}&gen={}", format_path(path), generation);
                element.set_attr("href", href);
            }
        });
        Self {
            search_input: &doc.search_input,
            meal_list: meal_list.to_string(),
            meal_details: doc.meal_details.to_string(),
            stylesheet: "/meal.css",
        }
    }
}
