use async_trait::async_trait;

use super::BaseRepository;
use crate::domain::models::flight::Flight;
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

#[async_trait]
pub trait FlightRepository: BaseRepository<Flight> {
    async fn search(
        &self,
        origin: Option<String>,
        destination: Option<String>,
        page: PageRequest,
    ) -> AppResult<Page<Flight>>;
}
