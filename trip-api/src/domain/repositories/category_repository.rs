use async_trait::async_trait;

use super::BaseRepository;
use crate::domain::models::category::Category;
use crate::error::AppResult;

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category> {
    /// 名称比较不区分大小写
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;
}
