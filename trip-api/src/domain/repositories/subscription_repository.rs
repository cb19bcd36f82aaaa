use async_trait::async_trait;
use uuid::Uuid;

use super::BaseRepository;
use crate::domain::models::subscription::{SubscriptionPlan, VendorSubscription};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

/// 基础方法作用于订阅套餐，其余方法作用于供应商的购买记录
#[async_trait]
pub trait SubscriptionRepository: BaseRepository<SubscriptionPlan> {
    async fn list_active_plans(&self, page: PageRequest) -> AppResult<Page<SubscriptionPlan>>;

    async fn create_vendor_subscription(&self, subscription: &VendorSubscription) -> AppResult<()>;

    /// 结束时间最晚的一条
    async fn latest_for_vendor(&self, vendor_id: Uuid) -> AppResult<Option<VendorSubscription>>;

    async fn list_for_vendor(&self, vendor_id: Uuid, page: PageRequest) -> AppResult<Page<VendorSubscription>>;
}
