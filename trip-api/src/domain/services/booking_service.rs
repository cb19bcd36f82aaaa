use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::booking::Booking;
use crate::domain::models::enums::{BookingStatus, NotificationKind, Role};
use crate::domain::repositories::{ActivityRepository, BookingRepository};
use crate::domain::services::notification_service::NotificationService;
use crate::domain::services::wallet_service::WalletService;
use crate::error::{AppError, AppResult};
use crate::utils::pagination::{Page, PageRequest};

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    activities: Arc<dyn ActivityRepository>,
    wallet: Arc<WalletService>,
    notifications: Arc<NotificationService>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        activities: Arc<dyn ActivityRepository>,
        wallet: Arc<WalletService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            bookings,
            activities,
            wallet,
            notifications,
        }
    }

    /// 先扣款再写入预订，写入失败时退回扣款
    pub async fn create(
        &self,
        user: &AuthUser,
        activity_id: Uuid,
        participants: i32,
        travel_date: NaiveDate,
    ) -> AppResult<Booking> {
        user.require(Role::User)?;

        let activity = self
            .activities
            .find_by_id(activity_id)
            .await?
            .filter(|a| a.is_public())
            .ok_or_else(|| AppError::NotFound(format!("Activity with ID {} not found", activity_id)))?;

        if participants < 1 || participants > activity.max_participants {
            return Err(AppError::Validation(format!(
                "Participants must be between 1 and {}",
                activity.max_participants
            )));
        }
        if travel_date < Utc::now().date_naive() {
            return Err(AppError::Validation("Travel date cannot be in the past".to_string()));
        }
        let total = activity
            .price
            .checked_mul(i64::from(participants))
            .ok_or_else(|| AppError::Validation("Booking total is out of range".to_string()))?;

        let booking = Booking::new(user.id, activity.id, activity.vendor_id, participants, travel_date, total);

        self.wallet
            .debit(user.id, total, &format!("Booking: {}", activity.title))
            .await?;

        if let Err(e) = self.bookings.create(&booking).await {
            tracing::error!(user = %user.id, activity = %activity.id, error = %e, "booking insert failed, refunding");
            self.wallet
                .credit(user.id, total, &format!("Refund: {}", activity.title))
                .await?;
            return Err(e);
        }
        tracing::info!(booking = %booking.id, user = %user.id, total, "booking confirmed");

        let body = format!(
            "{} participant(s) booked \"{}\" for {}",
            participants, activity.title, travel_date
        );
        self.notify_vendor(&booking, "New booking", &body).await;

        Ok(booking)
    }

    /// 只能在出行日期之前取消，全额退回钱包
    pub async fn cancel(&self, user: &AuthUser, id: Uuid) -> AppResult<Booking> {
        let mut booking = self.find(id).await?;
        if booking.user_id != user.id {
            return Err(AppError::Forbidden("Only the traveller can cancel this booking".to_string()));
        }
        if booking.status != BookingStatus::Confirmed {
            return Err(AppError::BadRequest("Booking is already cancelled".to_string()));
        }
        if Utc::now().date_naive() >= booking.travel_date {
            return Err(AppError::BadRequest("Bookings can only be cancelled before the travel date".to_string()));
        }

        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();
        // 条件更新，重复取消不会重复退款
        if !self.bookings.cancel_confirmed(booking.id, booking.updated_at).await? {
            return Err(AppError::BadRequest("Booking is already cancelled".to_string()));
        }

        self.wallet
            .credit(user.id, booking.total_amount, &format!("Refund: booking {}", booking.id))
            .await?;
        tracing::info!(booking = %booking.id, refunded = booking.total_amount, "booking cancelled");

        let body = format!("Booking for {} was cancelled", booking.travel_date);
        self.notify_vendor(&booking, "Booking cancelled", &body).await;

        Ok(booking)
    }

    pub async fn list_mine(&self, user: &AuthUser, page: PageRequest) -> AppResult<Page<Booking>> {
        self.bookings.list_by_user(user.id, page).await
    }

    pub async fn list_for_vendor(&self, user: &AuthUser, page: PageRequest) -> AppResult<Page<Booking>> {
        user.require(Role::Vendor)?;
        self.bookings.list_by_vendor(user.id, page).await
    }

    pub async fn get(&self, user: &AuthUser, id: Uuid) -> AppResult<Booking> {
        let booking = self.find(id).await?;
        if booking.is_visible_to(user.id) || user.is_admin() {
            Ok(booking)
        } else {
            Err(not_found(id))
        }
    }

    async fn notify_vendor(&self, booking: &Booking, title: &str, body: &str) {
        if let Err(e) = self
            .notifications
            .notify(booking.vendor_id, NotificationKind::Booking, title, body)
            .await
        {
            tracing::warn!(booking = %booking.id, error = %e, "vendor notification failed");
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Booking> {
        self.bookings.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Booking with ID {} not found", id))
}
