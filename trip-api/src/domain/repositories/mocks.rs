//! 测试用的仓储 mock

use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;

use super::*;
use crate::domain::models::account::Account;
use crate::domain::models::activity::Activity;
use crate::domain::models::auth::AuthUser;
use crate::domain::models::booking::Booking;
use crate::domain::models::category::Category;
use crate::domain::models::chat::{Conversation, ConversationSummary, Message};
use crate::domain::models::destination::Destination;
use crate::domain::models::enums::{ApprovalStatus, Role};
use crate::domain::models::flight::Flight;
use crate::domain::models::notification::Notification;
use crate::domain::models::subscription::{SubscriptionPlan, VendorSubscription};
use crate::domain::models::wallet::{Wallet, WalletTransaction};
use crate::error::AppResult;
use crate::utils::pagination::{Page, PageRequest};

mock! {
    pub AccountRepo {}

    #[async_trait]
    impl BaseRepository<Account> for AccountRepo {
        async fn create(&self, entity: &Account) -> AppResult<()>;
        async fn find(&self, page: PageRequest) -> AppResult<Page<Account>>;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
        async fn update(&self, entity: &Account) -> AppResult<bool>;
        async fn delete(&self, id: Uuid) -> AppResult<bool>;
    }

    #[async_trait]
    impl AccountRepository for AccountRepo {
        async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;
        async fn list_by_role(
            &self,
            role: Role,
            status: Option<ApprovalStatus>,
            page: PageRequest,
        ) -> AppResult<Page<Account>>;
        async fn find_ids_by_role(&self, role: Role, status: ApprovalStatus) -> AppResult<Vec<Uuid>>;
        async fn set_fcm_token(&self, id: Uuid, token: Option<String>) -> AppResult<bool>;
    }
}

mock! {
    pub DestinationRepo {}

    #[async_trait]
    impl BaseRepository<Destination> for DestinationRepo {
        async fn create(&self, entity: &Destination) -> AppResult<()>;
        async fn find(&self, page: PageRequest) -> AppResult<Page<Destination>>;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Destination>>;
        async fn update(&self, entity: &Destination) -> AppResult<bool>;
        async fn delete(&self, id: Uuid) -> AppResult<bool>;
    }

    #[async_trait]
    impl DestinationRepository for DestinationRepo {
        async fn search(&self, pattern: Option<String>, page: PageRequest) -> AppResult<Page<Destination>>;
    }
}

mock! {
    pub FlightRepo {}

    #[async_trait]
    impl BaseRepository<Flight> for FlightRepo {
        async fn create(&self, entity: &Flight) -> AppResult<()>;
        async fn find(&self, page: PageRequest) -> AppResult<Page<Flight>>;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Flight>>;
        async fn update(&self, entity: &Flight) -> AppResult<bool>;
        async fn delete(&self, id: Uuid) -> AppResult<bool>;
    }

    #[async_trait]
    impl FlightRepository for FlightRepo {
        async fn search(
            &self,
            origin: Option<String>,
            destination: Option<String>,
            page: PageRequest,
        ) -> AppResult<Page<Flight>>;
    }
}

mock! {
    pub CategoryRepo {}

    #[async_trait]
    impl BaseRepository<Category> for CategoryRepo {
        async fn create(&self, entity: &Category) -> AppResult<()>;
        async fn find(&self, page: PageRequest) -> AppResult<Page<Category>>;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;
        async fn update(&self, entity: &Category) -> AppResult<bool>;
        async fn delete(&self, id: Uuid) -> AppResult<bool>;
    }

    #[async_trait]
    impl CategoryRepository for CategoryRepo {
        async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;
    }
}

mock! {
    pub ActivityRepo {}

    #[async_trait]
    impl BaseRepository<Activity> for ActivityRepo {
        async fn create(&self, entity: &Activity) -> AppResult<()>;
        async fn find(&self, page: PageRequest) -> AppResult<Page<Activity>>;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Activity>>;
        async fn update(&self, entity: &Activity) -> AppResult<bool>;
        async fn delete(&self, id: Uuid) -> AppResult<bool>;
    }

    #[async_trait]
    impl ActivityRepository for ActivityRepo {
        async fn list_public(&self, query: ActivityQuery, page: PageRequest) -> AppResult<Page<Activity>>;
        async fn list_by_vendor(
            &self,
            vendor_id: Uuid,
            status: Option<ApprovalStatus>,
            page: PageRequest,
        ) -> AppResult<Page<Activity>>;
        async fn list_by_status(&self, status: ApprovalStatus, page: PageRequest) -> AppResult<Page<Activity>>;
        async fn set_status(&self, activity: &Activity, expected: ApprovalStatus) -> AppResult<bool>;
    }
}

mock! {
    pub BookingRepo {}

    #[async_trait]
    impl BaseRepository<Booking> for BookingRepo {
        async fn create(&self, entity: &Booking) -> AppResult<()>;
        async fn find(&self, page: PageRequest) -> AppResult<Page<Booking>>;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;
        async fn update(&self, entity: &Booking) -> AppResult<bool>;
        async fn delete(&self, id: Uuid) -> AppResult<bool>;
    }

    #[async_trait]
    impl BookingRepository for BookingRepo {
        async fn list_by_user(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<Booking>>;
        async fn list_by_vendor(&self, vendor_id: Uuid, page: PageRequest) -> AppResult<Page<Booking>>;
        async fn cancel_confirmed(&self, id: Uuid, cancelled_at: chrono::DateTime<chrono::Utc>) -> AppResult<bool>;
    }
}

mock! {
    pub SubscriptionRepo {}

    #[async_trait]
    impl BaseRepository<SubscriptionPlan> for SubscriptionRepo {
        async fn create(&self, entity: &SubscriptionPlan) -> AppResult<()>;
        async fn find(&self, page: PageRequest) -> AppResult<Page<SubscriptionPlan>>;
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>>;
        async fn update(&self, entity: &SubscriptionPlan) -> AppResult<bool>;
        async fn delete(&self, id: Uuid) -> AppResult<bool>;
    }

    #[async_trait]
    impl SubscriptionRepository for SubscriptionRepo {
        async fn list_active_plans(&self, page: PageRequest) -> AppResult<Page<SubscriptionPlan>>;
        async fn create_vendor_subscription(&self, subscription: &VendorSubscription) -> AppResult<()>;
        async fn latest_for_vendor(&self, vendor_id: Uuid) -> AppResult<Option<VendorSubscription>>;
        async fn list_for_vendor(&self, vendor_id: Uuid, page: PageRequest) -> AppResult<Page<VendorSubscription>>;
    }
}

mock! {
    pub WalletRepo {}

    #[async_trait]
    impl WalletRepository for WalletRepo {
        async fn find_or_create(&self, user_id: Uuid) -> AppResult<Wallet>;
        async fn credit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<WalletTransaction>;
        async fn debit(&self, user_id: Uuid, amount: i64, description: &str) -> AppResult<Option<WalletTransaction>>;
        async fn transactions(&self, user_id: Uuid, page: PageRequest) -> AppResult<Page<WalletTransaction>>;
    }
}

mock! {
    pub NotificationRepo {}

    #[async_trait]
    impl NotificationRepository for NotificationRepo {
        async fn create(&self, notification: &Notification) -> AppResult<()>;
        async fn list_for(&self, recipient_id: Uuid, unread_only: bool, page: PageRequest) -> AppResult<Page<Notification>>;
        async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64>;
        async fn mark_read(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool>;
        async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;
        async fn delete(&self, recipient_id: Uuid, id: Uuid) -> AppResult<bool>;
    }
}

mock! {
    pub ChatRepo {}

    #[async_trait]
    impl ChatRepository for ChatRepo {
        async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>>;
        async fn find_between(&self, user_id: Uuid, vendor_id: Uuid) -> AppResult<Option<Conversation>>;
        async fn create_conversation(&self, conversation: &Conversation) -> AppResult<()>;
        async fn list_for(&self, account_id: Uuid) -> AppResult<Vec<ConversationSummary>>;
        async fn insert_message(&self, message: &Message) -> AppResult<()>;
        async fn list_messages(&self, conversation_id: Uuid, page: PageRequest) -> AppResult<Page<Message>>;
        async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> AppResult<u64>;
    }
}

/// 不关心通知的测试使用：接受任意写入
pub fn quiet_notifications() -> MockNotificationRepo {
    let mut repo = MockNotificationRepo::new();
    repo.expect_create().returning(|_| Ok(()));
    repo
}

/// 没有推送令牌的账号仓储，供通知服务查询
pub fn accounts_without_tokens() -> MockAccountRepo {
    let mut repo = MockAccountRepo::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo
}

pub fn auth_user(role: Role) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        role,
        jti: Uuid::new_v4(),
        exp: chrono::Utc::now().timestamp() + 3_600,
    }
}

/// 与 `user` 同 id 的账号
pub fn account_for(user: &AuthUser, status: ApprovalStatus) -> Account {
    let mut account = Account::new("Fixture", &format!("{}@example.com", user.id), "hash", user.role);
    account.id = user.id;
    account.status = status;
    account
}
