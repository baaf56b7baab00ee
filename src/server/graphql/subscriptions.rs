//! GraphQL subscription root.
//!
//! Every subscription taps a shared bus topic and applies a per-subscriber
//! delivery predicate, so one published event fans out to exactly the
//! clients it concerns. Lagged broadcast receives are skipped rather than
//! surfaced as errors.

use std::pin::Pin;

use futures::stream::{self, Stream};
use juniper::{FieldError, FieldResult};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::common::UserId;
use crate::domains::conversations::data::{
    ConversationData, ConversationUpdatedData, UserInvitedData,
};
use crate::domains::conversations::events::{
    self as conversation_events, ConversationCreated, ConversationDeleted, ConversationUpdated,
    UserInvited,
};
use crate::domains::conversations::models::user_is_participant;
use crate::domains::messages::data::MessageData;
use crate::domains::messages::events::{self as message_events, MessageSent};

use super::context::GraphQLContext;

type EventStream<T> = Pin<Box<dyn Stream<Item = FieldResult<T>> + Send>>;

/// A single-error stream for connections without a valid session
fn error_stream<T: Send + 'static>(e: FieldError) -> EventStream<T> {
    Box::pin(stream::once(async move { Err(e) }))
}

/// Messages of one conversation, filtered out of the shared MESSAGE_SENT
/// topic
pub fn message_sent_stream(
    rx: broadcast::Receiver<serde_json::Value>,
    conversation_id: Uuid,
) -> impl Stream<Item = MessageData> {
    BroadcastStream::new(rx).filter_map(move |payload| {
        let event: MessageSent = serde_json::from_value(payload.ok()?).ok()?;
        (event.message.conversation_id.into_uuid() == conversation_id)
            .then(|| MessageData::from(event.message))
    })
}

/// New conversations the given user participates in
pub fn conversation_created_stream(
    rx: broadcast::Receiver<serde_json::Value>,
    user_id: UserId,
) -> impl Stream<Item = ConversationData> {
    BroadcastStream::new(rx).filter_map(move |payload| {
        let event: ConversationCreated = serde_json::from_value(payload.ok()?).ok()?;
        user_is_participant(&event.conversation.participants, user_id)
            .then(|| ConversationData::from(event.conversation))
    })
}

/// Conversation updates visible to the given user: current participants,
/// plus users the update removed (so their clients can drop it)
pub fn conversation_updated_stream(
    rx: broadcast::Receiver<serde_json::Value>,
    user_id: UserId,
) -> impl Stream<Item = ConversationUpdatedData> {
    BroadcastStream::new(rx).filter_map(move |payload| {
        let event: ConversationUpdated = serde_json::from_value(payload.ok()?).ok()?;
        let visible = user_is_participant(&event.conversation.participants, user_id)
            || event.removed_user_ids.contains(&user_id);
        visible.then(|| ConversationUpdatedData {
            conversation: ConversationData::from(event.conversation),
            removed_user_ids: event
                .removed_user_ids
                .into_iter()
                .map(UserId::into_uuid)
                .collect(),
        })
    })
}

/// Deletions of conversations the given user belonged to, judged against
/// the pre-deletion participant snapshot
pub fn conversation_deleted_stream(
    rx: broadcast::Receiver<serde_json::Value>,
    user_id: UserId,
) -> impl Stream<Item = ConversationData> {
    BroadcastStream::new(rx).filter_map(move |payload| {
        let event: ConversationDeleted = serde_json::from_value(payload.ok()?).ok()?;
        user_is_participant(&event.conversation.participants, user_id)
            .then(|| ConversationData::from(event.conversation))
    })
}

/// Invitations addressed to the given user
pub fn user_invited_stream(
    rx: broadcast::Receiver<serde_json::Value>,
    user_id: UserId,
) -> impl Stream<Item = UserInvitedData> {
    BroadcastStream::new(rx).filter_map(move |payload| {
        let event: UserInvited = serde_json::from_value(payload.ok()?).ok()?;
        event
            .invited_user_ids
            .contains(&user_id)
            .then(|| UserInvitedData {
                conversation_id: event.conversation_id.into_uuid(),
                inviter_id: event.inviter_id.into_uuid(),
                inviter_username: event.inviter_username,
                invited_user_ids: event
                    .invited_user_ids
                    .into_iter()
                    .map(UserId::into_uuid)
                    .collect(),
            })
    })
}

pub struct Subscription;

#[juniper::graphql_subscription(context = GraphQLContext)]
impl Subscription {
    /// Conversations newly created with the caller as a participant
    async fn conversation_created(ctx: &GraphQLContext) -> EventStream<ConversationData> {
        let user_id = match ctx.require_session() {
            Ok(session) => session.user_id,
            Err(e) => return error_stream(e),
        };
        let rx = ctx
            .pubsub
            .subscribe(conversation_events::topics::CONVERSATION_CREATED)
            .await;
        Box::pin(conversation_created_stream(rx, user_id).map(Ok))
    }

    /// Updates to conversations the caller participates in (or was just
    /// removed from)
    async fn conversation_updated(ctx: &GraphQLContext) -> EventStream<ConversationUpdatedData> {
        let user_id = match ctx.require_session() {
            Ok(session) => session.user_id,
            Err(e) => return error_stream(e),
        };
        let rx = ctx
            .pubsub
            .subscribe(conversation_events::topics::CONVERSATION_UPDATED)
            .await;
        Box::pin(conversation_updated_stream(rx, user_id).map(Ok))
    }

    /// Deletions of conversations the caller belonged to
    async fn conversation_deleted(ctx: &GraphQLContext) -> EventStream<ConversationData> {
        let user_id = match ctx.require_session() {
            Ok(session) => session.user_id,
            Err(e) => return error_stream(e),
        };
        let rx = ctx
            .pubsub
            .subscribe(conversation_events::topics::CONVERSATION_DELETED)
            .await;
        Box::pin(conversation_deleted_stream(rx, user_id).map(Ok))
    }

    /// Messages sent to one conversation
    async fn message_sent(
        ctx: &GraphQLContext,
        conversation_id: Uuid,
    ) -> EventStream<MessageData> {
        if let Err(e) = ctx.require_session() {
            return error_stream(e);
        }
        let rx = ctx
            .pubsub
            .subscribe(message_events::topics::MESSAGE_SENT)
            .await;
        Box::pin(message_sent_stream(rx, conversation_id).map(Ok))
    }

    /// Invitations addressed to the caller
    async fn user_invited_to_conversation(ctx: &GraphQLContext) -> EventStream<UserInvitedData> {
        let user_id = match ctx.require_session() {
            Ok(session) => session.user_id,
            Err(e) => return error_stream(e),
        };
        let rx = ctx
            .pubsub
            .subscribe(conversation_events::topics::USER_INVITED_TO_CONVERSATION)
            .await;
        Box::pin(user_invited_stream(rx, user_id).map(Ok))
    }
}
