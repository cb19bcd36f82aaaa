use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{map_write_error, to_total};
use crate::domain::models::booking::Booking;
use crate::domain::models::enums::BookingStatus;
use crate::domain::repositories::{BaseRepository, BookingRepository};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

const COLUMNS: &str = "id, user_id, activity_id, vendor_id, participants, travel_date, total_amount, \
                       status, created_at, updated_at";

pub struct MySqlBookingRepository {
    pool: MySqlPool,
}

impl MySqlBookingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn list_where(&self, column: &str, owner: Uuid, page: PageRequest) -> AppResult<Page<Booking>> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bookings WHERE {} = ?", column))
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE {} = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
            COLUMNS, column
        ))
        .bind(owner)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }
}

#[async_trait]
impl BaseRepository<Booking> for MySqlBookingRepository {
    async fn create(&self, booking: &Booking) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, activity_id, vendor_id, participants, travel_date, total_amount,
                                  status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.activity_id)
        .bind(booking.vendor_id)
        .bind(booking.participants)
        .bind(booking.travel_date)
        .bind(booking.total_amount)
        .bind(booking.status.as_ref())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "booking"))?;

        Ok(())
    }

    async fn find(&self, page: PageRequest) -> AppResult<Page<Booking>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC LIMIT ? OFFSET ?",
            COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, to_total(total), page))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!("SELECT {} FROM bookings WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn update(&self, booking: &Booking) -> AppResult<bool> {
        let result = sqlx::query("UPDATE bookings SET participants = ?, travel_date = ?, status = ?, updated_at = ? WHERE id = ?")
            .bind(booking.participants)
            .bind(booking.travel_date)
            .bind(booking.status.as_ref())
            .bind(booking.updated_at)
            .bind(booking.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn list_by_user(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<Booking>> {
        self.list_where("user_id", user_id, page).await
    }

    async fn list_by_vendor(&self, vendor_id: Uuid, page: PageRequest) -> AppResult<Page<Booking>> {
        self.list_where("vendor_id", vendor_id, page).await
    }

    async fn cancel_confirmed(&self, id: Uuid, cancelled_at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query("UPDATE bookings SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(BookingStatus::Cancelled.as_ref())
            .bind(cancelled_at)
            .bind(id)
            .bind(BookingStatus::Confirmed.as_ref())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
