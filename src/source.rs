//! The remote recipe service, behind a trait so handlers can be driven by
//! something other than the live API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::MealError;
use crate::meal::{MealDetail, MealSummary, Meals};

pub const DEFAULT_API_BASE: &str = "https://www.themealdb.com/api/json/v1/1";

#[async_trait]
pub trait MealSource: Send + Sync {
    /// Meals that use `ingredient`; `None` when the service found nothing.
    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Option<Vec<MealSummary>>, MealError>;

    /// The wrapper list for one meal id. At most one record is meaningful.
    async fn lookup(&self, id: &str) -> Result<Option<Vec<MealDetail>>, MealError>;
}

pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MealError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T>(&self, endpoint: &str, key: &str) -> Result<Option<Vec<T>>, MealError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        let body = self
            .client
            .get(&url)
            .query(&[("i", key)])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        // Empty bodies happen for some malformed queries; treat as no match.
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let envelope: Meals<T> = serde_json::from_slice(&body)?;
        Ok(envelope.meals)
    }
}

#[async_trait]
impl MealSource for MealDbClient {
    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<Option<Vec<MealSummary>>, MealError> {
        tracing::debug!(ingredient, "filtering meals by ingredient");
        self.get("filter.php", ingredient).await
    }

    async fn lookup(&self, id: &str) -> Result<Option<Vec<MealDetail>>, MealError> {
        tracing::debug!(id, "looking up meal");
        self.get("lookup.php", id).await
    }
}
