use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::destination::Destination;
use crate::domain::repositories::DestinationRepository;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::search::normalize_term;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DestinationChanges {
    #[validate(length(min = 1, max = 160, message = "Name must be 1-160 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Country must be 1-120 characters"))]
    pub country: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

pub struct DestinationService {
    destinations: Arc<dyn DestinationRepository>,
}

impl DestinationService {
    pub fn new(destinations: Arc<dyn DestinationRepository>) -> Self {
        Self { destinations }
    }

    pub async fn list(&self, q: Option<&str>, page: PageRequest) -> AppResult<Page<Destination>> {
        self.destinations.search(normalize_term(q), page).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Destination> {
        self.destinations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Destination with ID {} not found", id)))
    }

    pub async fn create(
        &self,
        name: &str,
        country: &str,
        description: &str,
        image_url: Option<String>,
    ) -> AppResult<Destination> {
        let destination = Destination::new(name, country, description, image_url);
        if destination.name.is_empty() {
            return Err(AppError::Validation("Destination name cannot be empty".to_string()));
        }

        self.destinations.create(&destination).await?;
        tracing::info!(destination = %destination.id, "destination created");
        Ok(destination)
    }

    pub async fn update(&self, id: Uuid, changes: DestinationChanges) -> AppResult<Destination> {
        let mut destination = self.get(id).await?;

        if let Some(name) = changes.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Destination name cannot be empty".to_string()));
            }
            destination.name = name.to_string();
        }
        if let Some(country) = changes.country {
            destination.country = country.trim().to_string();
        }
        if let Some(description) = changes.description {
            destination.description = description;
        }
        if changes.image_url.is_some() {
            destination.image_url = changes.image_url;
        }
        destination.updated_at = Utc::now();

        if !self.destinations.update(&destination).await? {
            return Err(AppError::NotFound(format!("Destination with ID {} not found", id)));
        }
        Ok(destination)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.destinations.delete(id).await? {
            return Err(AppError::NotFound(format!("Destination with ID {} not found", id)));
        }
        tracing::info!(destination = %id, "destination deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::mocks::MockDestinationRepo;

    #[tokio::test]
    async fn search_term_becomes_escaped_pattern() {
        let mut repo = MockDestinationRepo::new();
        repo.expect_search()
            .withf(|pattern, _| pattern.as_deref() == Some("%50\\%%"))
            .times(1)
            .returning(|_, page| Ok(Page::new(vec![], 0, page)));
        repo.expect_search()
            .withf(|pattern, _| pattern.is_none())
            .times(1)
            .returning(|_, page| Ok(Page::new(vec![], 0, page)));
        let service = DestinationService::new(Arc::new(repo));

        service.list(Some(" 50% "), PageRequest::new(1, 10)).await.unwrap();
        service.list(Some("   "), PageRequest::new(1, 10)).await.unwrap();
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let mut repo = MockDestinationRepo::new();
        repo.expect_create().never();

        let result = DestinationService::new(Arc::new(repo))
            .create("  ", "Portugal", "", None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let existing = Destination::new("Lisbon", "Portugal", "Hills and trams", None);
        let id = existing.id;
        let mut repo = MockDestinationRepo::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().times(1).returning(|_| Ok(true));

        let updated = DestinationService::new(Arc::new(repo))
            .update(
                id,
                DestinationChanges {
                    name: None,
                    country: None,
                    description: Some("Seven hills".into()),
                    image_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Lisbon");
        assert_eq!(updated.description, "Seven hills");
    }

    #[tokio::test]
    async fn update_of_deleted_row_is_not_found() {
        let existing = Destination::new("Porto", "Portugal", "", None);
        let id = existing.id;
        let mut repo = MockDestinationRepo::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().times(1).returning(|_| Ok(false));

        let changes = DestinationChanges {
            name: Some("Oporto".into()),
            country: None,
            description: None,
            image_url: None,
        };
        let result = DestinationService::new(Arc::new(repo)).update(id, changes).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
