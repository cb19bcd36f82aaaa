use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, patch, post},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::domain::models::auth::AuthUser;
use crate::domain::models::chat::{Conversation, ConversationSummary, Message};
use crate::error::AppError;
use crate::middleware::auth::require_auth;
use crate::server::AppState;
use crate::utils::pagination::{Page, PaginationParams};
use crate::utils::response::ApiResponse;

pub fn routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/conversations", post(open_conversation).get(list_conversations))
        .route("/conversations/{id}/messages", get(list_messages).post(send_message))
        .route("/conversations/{id}/read", patch(mark_read))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize)]
pub struct OpenConversationRequest {
    pub vendor_id: Uuid,
}

/// 长度和空白校验在服务层完成
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct ReadReceipt {
    pub marked: u64,
}

/// 浏览器无法给 WebSocket 握手加 Authorization 头，令牌走查询参数
#[derive(Debug, Deserialize)]
pub struct SocketAuth {
    pub token: String,
}

async fn open_conversation(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<OpenConversationRequest>,
) -> Result<(StatusCode, ApiResponse<Conversation>), AppError> {
    let conversation = state.chat.open(&user, payload.vendor_id).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(conversation)))
}

async fn list_conversations(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<ApiResponse<Vec<ConversationSummary>>, AppError> {
    Ok(ApiResponse::success(state.chat.list(&user).await?))
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Page<Message>>, AppError> {
    let page = pagination.resolve(&state.config.pagination);
    Ok(ApiResponse::success(state.chat.messages(&user, id, page).await?))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, ApiResponse<Message>), AppError> {
    let message = state.chat.send(&user, id, &payload.body).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(message)))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<ReadReceipt>, AppError> {
    let marked = state.chat.mark_read(&user, id).await?;
    Ok(ApiResponse::success(ReadReceipt { marked }))
}

/// 会话的实时消息推送；握手前完成鉴权和参与者校验
pub async fn websocket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(auth): Query<SocketAuth>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let user = state.auth.authenticate(&auth.token).await?;
    let receiver = state.chat.subscribe(&user, id).await?;

    Ok(ws.on_upgrade(move |socket| stream_messages(socket, state, user, id, receiver)))
}

async fn stream_messages(
    socket: WebSocket,
    state: Arc<AppState>,
    user: AuthUser,
    conversation_id: Uuid,
    mut receiver: broadcast::Receiver<Message>,
) {
    let (mut sink, mut incoming) = socket.split();
    tracing::debug!(user = %user.id, conversation = %conversation_id, "chat socket opened");

    loop {
        tokio::select! {
            received = receiver.recv() => match received {
                Ok(message) => {
                    let payload = match serde_json::to_string(&message) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to encode chat message");
                            continue;
                        }
                    };
                    if sink.send(WsMessage::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(conversation = %conversation_id, skipped, "chat socket lagged");
                }
                Err(RecvError::Closed) => break,
            },
            // 客户端只接收推送，发送消息走 HTTP 接口
            frame = incoming.next() => match frame {
                Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    drop(receiver);
    state.chat.unsubscribe(conversation_id);
    tracing::debug!(user = %user.id, conversation = %conversation_id, "chat socket closed");
}
