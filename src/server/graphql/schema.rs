//! GraphQL schema definition.

use juniper::{FieldError, FieldResult, RootNode};
use tracing::error;
use uuid::Uuid;

use crate::common::{ChatError, ConversationId, MessageId, UserId};

// Domain actions
use crate::domains::conversations::actions as conversation_actions;
use crate::domains::messages::actions as message_actions;
use crate::domains::users::actions as user_actions;

// Domain data types (GraphQL types)
use crate::domains::conversations::data::{
    ConversationData, CreateConversationResponse, InviteUsersToConversationResponse,
    LeaveConversationResponse,
};
use crate::domains::messages::data::{MessageData, SendMessageResponse};
use crate::domains::users::data::{
    CreateUsernameResponse, RegisterUserResponse, SearchedUser, UserData,
};

// Domain events
use crate::domains::conversations::events::{
    self as conversation_events, ConversationCreated, ConversationDeleted, ConversationUpdated,
    UserInvited,
};
use crate::domains::messages::events::{self as message_events, MessageSent};

use super::context::GraphQLContext;
use super::subscriptions::Subscription;

// =============================================================================
// Helper functions
// =============================================================================

/// Convert an action error into a thrown field error.
///
/// Expected failures surface their own message; anything else is logged
/// and rewrapped with the generic fallback.
fn to_field_error(e: anyhow::Error, fallback: &str) -> FieldError {
    match e.downcast_ref::<ChatError>() {
        Some(expected) => FieldError::new(expected.to_string(), juniper::Value::null()),
        None => {
            error!(error = %e, "{}", fallback);
            FieldError::new(fallback, juniper::Value::null())
        }
    }
}

/// Error string for `{success, error}` response shapes.
fn to_error_string(e: anyhow::Error) -> String {
    match e.downcast_ref::<ChatError>() {
        Some(expected) => expected.to_string(),
        None => {
            error!(error = %e, "Mutation failed");
            e.to_string()
        }
    }
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// Search users by username substring (case-insensitive), excluding
    /// the caller and anyone already in the conversation being built
    async fn search_users(
        ctx: &GraphQLContext,
        username: String,
        usernames_in_current_convo: Option<Vec<String>>,
    ) -> FieldResult<Vec<SearchedUser>> {
        let session = ctx.require_session()?;
        let signed_in_username = session.username.clone().unwrap_or_default();

        let users = user_actions::search_users(
            &username,
            &signed_in_username,
            usernames_in_current_convo.unwrap_or_default(),
            &ctx.pool,
        )
        .await
        .map_err(|e| to_field_error(e, "Error searching users"))?;

        Ok(users.into_iter().map(SearchedUser::from).collect())
    }

    /// All conversations the signed-in user participates in
    async fn conversations(ctx: &GraphQLContext) -> FieldResult<Vec<ConversationData>> {
        let session = ctx.require_session()?;

        let conversations = conversation_actions::list_conversations(session.user_id, &ctx.pool)
            .await
            .map_err(|e| to_field_error(e, "Error fetching conversations"))?;

        Ok(conversations.into_iter().map(ConversationData::from).collect())
    }

    /// Messages of one conversation, newest first (participants only)
    async fn messages(
        ctx: &GraphQLContext,
        conversation_id: Uuid,
    ) -> FieldResult<Vec<MessageData>> {
        let session = ctx.require_session()?;

        let messages = message_actions::list_messages(
            session.user_id,
            ConversationId::from_uuid(conversation_id),
            &ctx.pool,
        )
        .await
        .map_err(|e| to_field_error(e, "Error fetching messages"))?;

        Ok(messages.into_iter().map(MessageData::from).collect())
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // User Mutations
    // =========================================================================

    /// Register (or refresh) a user by email and get back an API token.
    /// Stands in for the auth provider's first-sign-in user creation.
    async fn register_user(
        ctx: &GraphQLContext,
        email: String,
        name: Option<String>,
        image: Option<String>,
    ) -> FieldResult<RegisterUserResponse> {
        let user = user_actions::register_user(&email, name, image, &ctx.pool)
            .await
            .map_err(|e| to_field_error(e, "Error registering user"))?;

        let token = ctx
            .jwt_service
            .create_token(user.id.into_uuid(), user.username.clone())
            .map_err(|e| to_field_error(e, "Error registering user"))?;

        Ok(RegisterUserResponse {
            user: UserData::from(user),
            token,
        })
    }

    /// Choose a username for the signed-in user
    async fn create_username(
        ctx: &GraphQLContext,
        username: String,
    ) -> FieldResult<CreateUsernameResponse> {
        let Some(session) = ctx.session.as_ref() else {
            // This mutation reports auth failures in the response shape
            return Ok(CreateUsernameResponse {
                success: false,
                error: Some("Not authorized".to_string()),
            });
        };

        match user_actions::create_username(session.user_id, &username, &ctx.pool).await {
            Ok(_) => Ok(CreateUsernameResponse {
                success: true,
                error: None,
            }),
            Err(e) => Ok(CreateUsernameResponse {
                success: false,
                error: Some(to_error_string(e)),
            }),
        }
    }

    // =========================================================================
    // Conversation Mutations
    // =========================================================================

    /// Create a conversation with the given participants
    async fn create_conversation(
        ctx: &GraphQLContext,
        participant_ids: Vec<Uuid>,
    ) -> FieldResult<CreateConversationResponse> {
        let session = ctx.require_session()?;

        let participant_ids = participant_ids
            .into_iter()
            .map(UserId::from_uuid)
            .collect::<Vec<_>>();

        match conversation_actions::create_conversation(session.user_id, participant_ids, &ctx.pool)
            .await
        {
            Ok(conversation) => {
                let conversation_id = conversation.id.into_uuid();
                ctx.pubsub
                    .publish_event(
                        conversation_events::topics::CONVERSATION_CREATED,
                        &ConversationCreated { conversation },
                    )
                    .await;
                Ok(CreateConversationResponse {
                    conversation_id: Some(conversation_id),
                    success: true,
                    error: None,
                })
            }
            Err(e) => Ok(CreateConversationResponse {
                conversation_id: None,
                success: false,
                error: Some(to_error_string(e)),
            }),
        }
    }

    /// Set the given user's read flag on a conversation
    async fn mark_conversation_as_read(
        ctx: &GraphQLContext,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> FieldResult<bool> {
        ctx.require_session()?;

        conversation_actions::mark_as_read(
            UserId::from_uuid(user_id),
            ConversationId::from_uuid(conversation_id),
            &ctx.pool,
        )
        .await
        .map_err(|e| to_field_error(e, "Error marking conversation as read"))?;

        Ok(true)
    }

    /// Delete a conversation with all its participants and messages
    async fn delete_conversation(
        ctx: &GraphQLContext,
        conversation_id: Uuid,
    ) -> FieldResult<bool> {
        let session = ctx.require_session()?;

        let snapshot = conversation_actions::delete_conversation(
            session.user_id,
            ConversationId::from_uuid(conversation_id),
            &ctx.pool,
        )
        .await
        .map_err(|e| to_field_error(e, "Error deleting conversation"))?;

        ctx.pubsub
            .publish_event(
                conversation_events::topics::CONVERSATION_DELETED,
                &ConversationDeleted {
                    conversation: snapshot,
                },
            )
            .await;

        Ok(true)
    }

    /// Remove the caller from a conversation
    async fn leave_conversation(
        ctx: &GraphQLContext,
        conversation_id: Uuid,
        #[graphql(name = "conversationParticipantsIds")] _conversation_participants_ids: Vec<
            Uuid,
        >,
    ) -> FieldResult<LeaveConversationResponse> {
        let session = ctx.require_session()?;
        let caller_id = session.user_id;

        match conversation_actions::leave_conversation(
            caller_id,
            ConversationId::from_uuid(conversation_id),
            &ctx.pool,
        )
        .await
        {
            Ok(conversation) => {
                ctx.pubsub
                    .publish_event(
                        conversation_events::topics::CONVERSATION_UPDATED,
                        &ConversationUpdated {
                            conversation,
                            removed_user_ids: vec![caller_id],
                        },
                    )
                    .await;
                Ok(LeaveConversationResponse {
                    success: true,
                    error: None,
                })
            }
            Err(e) => Ok(LeaveConversationResponse {
                success: false,
                error: Some(to_error_string(e)),
            }),
        }
    }

    /// Publish an invitation event; membership itself is mutated by the
    /// invited clients
    async fn invite_users_to_conversation(
        ctx: &GraphQLContext,
        users_ids: Vec<Uuid>,
        conversation_id: Uuid,
    ) -> FieldResult<InviteUsersToConversationResponse> {
        let session = ctx.require_session()?;

        ctx.pubsub
            .publish_event(
                conversation_events::topics::USER_INVITED_TO_CONVERSATION,
                &UserInvited {
                    conversation_id: ConversationId::from_uuid(conversation_id),
                    inviter_id: session.user_id,
                    inviter_username: session.username.clone(),
                    invited_user_ids: users_ids.into_iter().map(UserId::from_uuid).collect(),
                },
            )
            .await;

        Ok(InviteUsersToConversationResponse {
            success: true,
            error: None,
        })
    }

    // =========================================================================
    // Message Mutations
    // =========================================================================

    /// Send a message to a conversation
    async fn send_message(
        ctx: &GraphQLContext,
        id: Uuid,
        conversation_id: Uuid,
        sender_id: Uuid,
        body: String,
    ) -> FieldResult<SendMessageResponse> {
        let session = ctx.require_session()?;

        // Callers may only send as themselves
        if UserId::from_uuid(sender_id) != session.user_id {
            return Err(FieldError::new("Not authorized", juniper::Value::null()));
        }

        let (message, conversation) = message_actions::send_message(
            MessageId::from_uuid(id),
            session.user_id,
            ConversationId::from_uuid(conversation_id),
            &body,
            &ctx.pool,
        )
        .await
        .map_err(|e| to_field_error(e, "Error sending message"))?;

        ctx.pubsub
            .publish_event(message_events::topics::MESSAGE_SENT, &MessageSent { message })
            .await;
        ctx.pubsub
            .publish_event(
                conversation_events::topics::CONVERSATION_UPDATED,
                &ConversationUpdated {
                    conversation,
                    removed_user_ids: vec![],
                },
            )
            .await;

        Ok(SendMessageResponse {
            success: true,
            error: None,
        })
    }
}

pub type Schema = RootNode<'static, Query, Mutation, Subscription>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, Subscription)
}
