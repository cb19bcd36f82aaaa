use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::BookingStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub activity_id: Uuid,
    pub vendor_id: Uuid,
    pub participants: i32,
    pub travel_date: NaiveDate,
    pub total_amount: i64,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        user_id: Uuid,
        activity_id: Uuid,
        vendor_id: Uuid,
        participants: i32,
        travel_date: NaiveDate,
        total_amount: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            activity_id,
            vendor_id,
            participants,
            travel_date,
            total_amount,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_visible_to(&self, account_id: Uuid) -> bool {
        self.user_id == account_id || self.vendor_id == account_id
    }
}
