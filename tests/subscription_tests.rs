//! Tests for the per-subscriber delivery predicates behind each
//! subscription.
//!
//! These run against the bus and the filtered stream builders directly; no
//! database is needed to decide who an event is delivered to.

use chrono::Utc;
use futures::StreamExt;
use std::time::Duration;
use uuid::Uuid;

use server_core::common::{ConversationId, MessageId, ParticipantId, UserId};
use server_core::domains::conversations::events::{
    self as conversation_events, ConversationCreated, ConversationDeleted, ConversationUpdated,
    UserInvited,
};
use server_core::domains::conversations::models::{ConversationPopulated, ParticipantPopulated};
use server_core::domains::messages::events::{self as message_events, MessageSent};
use server_core::domains::messages::models::MessagePopulated;
use server_core::kernel::PubSub;
use server_core::server::graphql::subscriptions::{
    conversation_created_stream, conversation_deleted_stream, conversation_updated_stream,
    message_sent_stream, user_invited_stream,
};

fn participant(user_id: UserId) -> ParticipantPopulated {
    ParticipantPopulated {
        id: ParticipantId::new(),
        user_id,
        username: Some(format!("user_{}", user_id)),
        has_seen_latest_message: false,
    }
}

fn conversation_with(participants: Vec<ParticipantPopulated>) -> ConversationPopulated {
    let now = Utc::now();
    ConversationPopulated {
        id: ConversationId::new(),
        participants,
        latest_message: None,
        created_at: now,
        updated_at: now,
    }
}

fn message_in(conversation_id: ConversationId, sender_id: UserId) -> MessagePopulated {
    let now = Utc::now();
    MessagePopulated {
        id: MessageId::new(),
        conversation_id,
        sender_id,
        sender_username: Some("sender".to_string()),
        body: "hello".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Poll a stream briefly and collect whatever it yields.
async fn drain<T>(stream: impl futures::Stream<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    let mut stream = std::pin::pin!(stream);
    while let Ok(Some(item)) =
        tokio::time::timeout(Duration::from_millis(200), stream.next()).await
    {
        out.push(item);
    }
    out
}

#[tokio::test]
async fn message_sent_is_filtered_by_conversation() {
    let pubsub = PubSub::new();
    let conversation_id = ConversationId::new();
    let other_conversation_id = ConversationId::new();
    let sender = UserId::new();

    let rx = pubsub.subscribe(message_events::topics::MESSAGE_SENT).await;
    let stream = message_sent_stream(rx, conversation_id.into_uuid());

    pubsub
        .publish_event(
            message_events::topics::MESSAGE_SENT,
            &MessageSent {
                message: message_in(other_conversation_id, sender),
            },
        )
        .await;
    pubsub
        .publish_event(
            message_events::topics::MESSAGE_SENT,
            &MessageSent {
                message: message_in(conversation_id, sender),
            },
        )
        .await;

    let delivered = drain(stream).await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].conversation_id, conversation_id.into_uuid());
}

#[tokio::test]
async fn conversation_created_reaches_only_participants() {
    let pubsub = PubSub::new();
    let member = UserId::new();
    let outsider = UserId::new();

    let member_rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_CREATED)
        .await;
    let outsider_rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_CREATED)
        .await;

    let member_stream = conversation_created_stream(member_rx, member);
    let outsider_stream = conversation_created_stream(outsider_rx, outsider);

    let conversation = conversation_with(vec![participant(member), participant(UserId::new())]);
    let conversation_id = conversation.id;
    pubsub
        .publish_event(
            conversation_events::topics::CONVERSATION_CREATED,
            &ConversationCreated { conversation },
        )
        .await;

    let to_member = drain(member_stream).await;
    assert_eq!(to_member.len(), 1);
    assert_eq!(to_member[0].id, conversation_id.into_uuid());

    assert!(drain(outsider_stream).await.is_empty());
}

#[tokio::test]
async fn conversation_updated_also_reaches_removed_users() {
    let pubsub = PubSub::new();
    let remaining = UserId::new();
    let removed = UserId::new();
    let outsider = UserId::new();

    let remaining_rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_UPDATED)
        .await;
    let removed_rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_UPDATED)
        .await;
    let outsider_rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_UPDATED)
        .await;

    let remaining_stream = conversation_updated_stream(remaining_rx, remaining);
    let removed_stream = conversation_updated_stream(removed_rx, removed);
    let outsider_stream = conversation_updated_stream(outsider_rx, outsider);

    // The leave already happened: the conversation no longer lists the
    // removed user, who appears only in removed_user_ids
    let conversation = conversation_with(vec![participant(remaining)]);
    pubsub
        .publish_event(
            conversation_events::topics::CONVERSATION_UPDATED,
            &ConversationUpdated {
                conversation,
                removed_user_ids: vec![removed],
            },
        )
        .await;

    assert_eq!(drain(remaining_stream).await.len(), 1);

    let to_removed = drain(removed_stream).await;
    assert_eq!(to_removed.len(), 1);
    assert_eq!(to_removed[0].removed_user_ids, vec![removed.into_uuid()]);

    assert!(drain(outsider_stream).await.is_empty());
}

#[tokio::test]
async fn conversation_deleted_uses_pre_deletion_snapshot() {
    let pubsub = PubSub::new();
    let former_member = UserId::new();
    let outsider = UserId::new();

    let member_rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_DELETED)
        .await;
    let outsider_rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_DELETED)
        .await;

    let member_stream = conversation_deleted_stream(member_rx, former_member);
    let outsider_stream = conversation_deleted_stream(outsider_rx, outsider);

    let snapshot = conversation_with(vec![participant(former_member)]);
    pubsub
        .publish_event(
            conversation_events::topics::CONVERSATION_DELETED,
            &ConversationDeleted {
                conversation: snapshot,
            },
        )
        .await;

    assert_eq!(drain(member_stream).await.len(), 1);
    assert!(drain(outsider_stream).await.is_empty());
}

#[tokio::test]
async fn user_invited_reaches_only_invited_users() {
    let pubsub = PubSub::new();
    let invited = UserId::new();
    let uninvited = UserId::new();
    let inviter = UserId::new();

    let invited_rx = pubsub
        .subscribe(conversation_events::topics::USER_INVITED_TO_CONVERSATION)
        .await;
    let uninvited_rx = pubsub
        .subscribe(conversation_events::topics::USER_INVITED_TO_CONVERSATION)
        .await;

    let invited_stream = user_invited_stream(invited_rx, invited);
    let uninvited_stream = user_invited_stream(uninvited_rx, uninvited);

    pubsub
        .publish_event(
            conversation_events::topics::USER_INVITED_TO_CONVERSATION,
            &UserInvited {
                conversation_id: ConversationId::new(),
                inviter_id: inviter,
                inviter_username: Some("inviter".to_string()),
                invited_user_ids: vec![invited],
            },
        )
        .await;

    let delivered = drain(invited_stream).await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].inviter_id, inviter.into_uuid());

    assert!(drain(uninvited_stream).await.is_empty());
}

#[tokio::test]
async fn malformed_payloads_are_skipped() {
    let pubsub = PubSub::new();
    let user_id = UserId::new();

    let rx = pubsub
        .subscribe(conversation_events::topics::CONVERSATION_CREATED)
        .await;
    let stream = conversation_created_stream(rx, user_id);

    pubsub
        .publish(
            conversation_events::topics::CONVERSATION_CREATED,
            serde_json::json!({"not": "a conversation"}),
        )
        .await;

    assert!(drain(stream).await.is_empty());
}
