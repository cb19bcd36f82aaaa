use async_trait::async_trait;

use super::BaseRepository;
use crate::domain::models::destination::Destination;
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

#[async_trait]
pub trait DestinationRepository: BaseRepository<Destination> {
    /// `pattern` 是已转义的 LIKE 模式，匹配名称或国家
    async fn search(&self, pattern: Option<String>, page: PageRequest) -> AppResult<Page<Destination>>;
}
