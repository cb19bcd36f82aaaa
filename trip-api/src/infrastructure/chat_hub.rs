use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::models::chat::Message;

const DEFAULT_CAPACITY: usize = 64;

/// 进程内的会话广播中心，每个会话一个 broadcast 通道。
///
/// 投递是尽力而为的：落后的订阅者会跳过积压消息，历史消息通过持久化的消息列表获取。
pub struct ChatHub {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<Message>>>,
    capacity: usize,
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChatHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, conversation_id: Uuid) -> broadcast::Receiver<Message> {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(conversation_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 返回收到消息的订阅者数量；没有订阅者时顺带回收通道
    pub fn publish(&self, message: &Message) -> usize {
        let delivered = {
            let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
            match channels.get(&message.conversation_id) {
                Some(sender) => sender.send(message.clone()).unwrap_or(0),
                None => return 0,
            }
        };

        if delivered == 0 {
            self.release(message.conversation_id);
        }
        delivered
    }

    /// 订阅者断开后调用，通道无人订阅时移除
    pub fn release(&self, conversation_id: Uuid) {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        if channels
            .get(&conversation_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&conversation_id);
        }
    }

    pub fn active_channels(&self) -> usize {
        self.channels.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_subscribers_of_the_same_conversation() {
        let hub = ChatHub::default();
        let conversation = Uuid::new_v4();
        let mut first = hub.subscribe(conversation);
        let mut second = hub.subscribe(conversation);
        let mut other = hub.subscribe(Uuid::new_v4());

        let message = Message::new(conversation, Uuid::new_v4(), "hello");
        assert_eq!(hub.publish(&message), 2);

        assert_eq!(first.recv().await.unwrap(), message);
        assert_eq!(second.recv().await.unwrap(), message);
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        let hub = ChatHub::default();
        let message = Message::new(Uuid::new_v4(), Uuid::new_v4(), "anyone?");
        assert_eq!(hub.publish(&message), 0);
        assert_eq!(hub.active_channels(), 0);
    }

    #[test]
    fn channels_are_released_once_everyone_leaves() {
        let hub = ChatHub::default();
        let conversation = Uuid::new_v4();
        let receiver = hub.subscribe(conversation);
        assert_eq!(hub.active_channels(), 1);

        drop(receiver);
        hub.release(conversation);
        assert_eq!(hub.active_channels(), 0);
    }

    #[tokio::test]
    async fn lagging_receivers_skip_ahead() {
        let hub = ChatHub::new(2);
        let conversation = Uuid::new_v4();
        let mut receiver = hub.subscribe(conversation);
        let sender = Uuid::new_v4();

        for body in ["one", "two", "three"] {
            hub.publish(&Message::new(conversation, sender, body));
        }

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(receiver.recv().await.unwrap().body, "two");
    }
}
