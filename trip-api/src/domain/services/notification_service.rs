use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::enums::NotificationKind;
use crate::domain::models::notification::Notification;
use crate::domain::repositories::{AccountRepository, NotificationRepository};
use crate::error::{AppError, AppResult};
use crate::infrastructure::push::{PushMessage, PushSender};
use crate::utils::pagination::{Page, PageRequest};

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    accounts: Arc<dyn AccountRepository>,
    push: Option<Arc<dyn PushSender>>,
}

impl NotificationService {
    /// `push` 为 `None` 时只写库
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        accounts: Arc<dyn AccountRepository>,
        push: Option<Arc<dyn PushSender>>,
    ) -> Self {
        Self { notifications, accounts, push }
    }

    pub async fn notify(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        title: &str,
        body: &str,
    ) -> AppResult<Notification> {
        let notification = Notification::new(recipient_id, kind, title, body);
        self.notifications.create(&notification).await?;

        if let Some(push) = &self.push {
            self.deliver(push.as_ref(), &notification).await;
        }

        Ok(notification)
    }

    /// 逐个发送，失败的记录日志后跳过，返回成功数量
    pub async fn notify_each(&self, recipients: &[Uuid], kind: NotificationKind, title: &str, body: &str) -> usize {
        let mut delivered = 0;
        for recipient in recipients {
            match self.notify(*recipient, kind, title, body).await {
                Ok(_) => delivered += 1,
                Err(e) => tracing::warn!(recipient = %recipient, error = %e, "notification failed"),
            }
        }
        delivered
    }

    async fn deliver(&self, push: &dyn PushSender, notification: &Notification) {
        let token = match self.accounts.find_by_id(notification.recipient_id).await {
            Ok(Some(account)) => account.fcm_token,
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(recipient = %notification.recipient_id, error = %e, "push token lookup failed");
                None
            }
        };
        let Some(token) = token else {
            return;
        };

        let message = PushMessage {
            token,
            title: notification.title.clone(),
            body: notification.body.clone(),
            data: HashMap::from([
                ("notification_id".to_string(), notification.id.to_string()),
                ("kind".to_string(), notification.kind.to_string()),
            ]),
        };

        if let Err(e) = push.send(&message).await {
            tracing::warn!(notification = %notification.id, error = %e, "push delivery failed");
        }
    }

    pub async fn list(&self, user: &AuthUser, unread_only: bool, page: PageRequest) -> AppResult<Page<Notification>> {
        self.notifications.list_for(user.id, unread_only, page).await
    }

    pub async fn unread_count(&self, user: &AuthUser) -> AppResult<u64> {
        self.notifications.count_unread(user.id).await
    }

    pub async fn mark_read(&self, user: &AuthUser, id: Uuid) -> AppResult<()> {
        if !self.notifications.mark_read(user.id, id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user: &AuthUser) -> AppResult<u64> {
        self.notifications.mark_all_read(user.id).await
    }

    pub async fn delete(&self, user: &AuthUser, id: Uuid) -> AppResult<()> {
        if !self.notifications.delete(user.id, id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Notification with ID {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::account::Account;
    use crate::domain::models::enums::Role;
    use crate::domain::repositories::mocks::{accounts_without_tokens, MockAccountRepo, MockNotificationRepo};
    use crate::infrastructure::push::MockPushSender;
    use crate::domain::repositories::mocks::auth_user;

    fn account_with_token(token: &str) -> MockAccountRepo {
        let token = token.to_string();
        let mut accounts = MockAccountRepo::new();
        accounts.expect_find_by_id().returning(move |id| {
            let mut account = Account::new("Ana", "ana@example.com", "hash", Role::User);
            account.id = id;
            account.fcm_token = Some(token.clone());
            Ok(Some(account))
        });
        accounts
    }

    #[tokio::test]
    async fn push_failure_does_not_fail_notify() {
        let mut repo = MockNotificationRepo::new();
        repo.expect_create().times(1).returning(|_| Ok(()));
        let mut push = MockPushSender::new();
        push.expect_send()
            .withf(|message| message.token == "device-1" && message.title == "Hello")
            .times(1)
            .returning(|_| Err(AppError::Push("upstream 503".into())));

        let service = NotificationService::new(
            Arc::new(repo),
            Arc::new(account_with_token("device-1")),
            Some(Arc::new(push)),
        );

        let notification = service
            .notify(Uuid::new_v4(), NotificationKind::System, "Hello", "World")
            .await
            .unwrap();
        assert!(!notification.read);
    }

    #[tokio::test]
    async fn recipients_without_token_are_not_pushed() {
        let mut repo = MockNotificationRepo::new();
        repo.expect_create().returning(|_| Ok(()));
        let mut push = MockPushSender::new();
        push.expect_send().never();

        let service =
            NotificationService::new(Arc::new(repo), Arc::new(accounts_without_tokens()), Some(Arc::new(push)));

        assert!(service.notify(Uuid::new_v4(), NotificationKind::Chat, "t", "b").await.is_ok());
    }

    #[tokio::test]
    async fn notify_each_skips_failures() {
        let failing = Uuid::new_v4();
        let mut repo = MockNotificationRepo::new();
        repo.expect_create().times(3).returning(move |n| {
            if n.recipient_id == failing {
                Err(AppError::Internal("insert failed".into()))
            } else {
                Ok(())
            }
        });

        let service = NotificationService::new(Arc::new(repo), Arc::new(accounts_without_tokens()), None);
        let recipients = [Uuid::new_v4(), failing, Uuid::new_v4()];

        assert_eq!(service.notify_each(&recipients, NotificationKind::Category, "t", "b").await, 2);
    }

    #[tokio::test]
    async fn operations_are_scoped_to_the_caller() {
        let caller = auth_user(Role::User);
        let caller_id = caller.id;
        let mut repo = MockNotificationRepo::new();
        repo.expect_mark_read()
            .withf(move |recipient, _| *recipient == caller_id)
            .returning(|_, _| Ok(false));
        repo.expect_delete()
            .withf(move |recipient, _| *recipient == caller_id)
            .returning(|_, _| Ok(true));

        let service = NotificationService::new(Arc::new(repo), Arc::new(accounts_without_tokens()), None);

        assert!(matches!(
            service.mark_read(&caller, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.delete(&caller, Uuid::new_v4()).await.is_ok());
    }
}
