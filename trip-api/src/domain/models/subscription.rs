use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub duration_days: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionPlan {
    pub fn new(name: &str, description: Option<String>, price: i64, duration_days: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description,
            price,
            duration_days,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 供应商购买的订阅周期
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VendorSubscription {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub plan_id: Uuid,
    pub amount: i64,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VendorSubscription {
    /// 已有未过期订阅时，新周期从旧周期结束时开始
    pub fn purchase(
        vendor_id: Uuid,
        plan: &SubscriptionPlan,
        current: Option<&VendorSubscription>,
        now: DateTime<Utc>,
    ) -> Self {
        let starts_at = current
            .map(|c| c.expires_at)
            .filter(|expires| *expires > now)
            .unwrap_or(now);
        Self {
            id: Uuid::new_v4(),
            vendor_id,
            plan_id: plan.id,
            amount: plan.price,
            starts_at,
            expires_at: starts_at + Duration::days(i64::from(plan.duration_days)),
            created_at: now,
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now < self.expires_at
    }
}
