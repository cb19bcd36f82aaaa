use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::enums::ApprovalStatus;

/// 供应商发布的旅游套餐
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub category_id: Uuid,
    pub destination_id: Uuid,
    pub title: String,
    pub description: String,
    /// 每位参与者的价格（分）
    pub price: i64,
    pub max_participants: i32,
    #[sqlx(try_from = "String")]
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub category_id: Uuid,
    pub destination_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub max_participants: i32,
}

impl Activity {
    pub fn new(vendor_id: Uuid, input: NewActivity) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            vendor_id,
            category_id: input.category_id,
            destination_id: input.destination_id,
            title: input.title.trim().to_string(),
            description: input.description,
            price: input.price,
            max_participants: input.max_participants,
            status: ApprovalStatus::Pending,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_public(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    /// 内容被修改后回到待审核状态
    pub fn resubmit(&mut self) {
        self.status = ApprovalStatus::Pending;
        self.rejection_reason = None;
        self.updated_at = Utc::now();
    }
}

/// 公开列表的过滤条件
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
}
