use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::BaseRepository;
use crate::domain::models::booking::Booking;
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

#[async_trait]
pub trait BookingRepository: BaseRepository<Booking> {
    async fn list_by_user(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<Booking>>;

    async fn list_by_vendor(&self, vendor_id: Uuid, page: PageRequest) -> AppResult<Page<Booking>>;

    /// 仅当预订仍为已确认时改为已取消，返回是否改动
    async fn cancel_confirmed(&self, id: Uuid, cancelled_at: DateTime<Utc>) -> AppResult<bool>;
}
