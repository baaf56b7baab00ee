//! Integration tests for user registration, usernames and search.

mod common;

use common::{fixtures, GraphQLClient, TestHarness};
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestHarness)]
#[tokio::test]
async fn register_user_returns_user_and_token(ctx: &mut TestHarness) {
    let client = GraphQLClient::anonymous(ctx);
    let email = format!("{}@example.com", Uuid::new_v4().simple());

    let result = client
        .query(&format!(
            r#"mutation {{
                registerUser(email: "{email}", name: "Ada") {{
                    user {{ id email name username }}
                    token
                }}
            }}"#
        ))
        .await;

    assert_eq!(result["registerUser"]["user"]["email"], email.as_str());
    assert_eq!(result["registerUser"]["user"]["name"], "Ada");
    assert!(result["registerUser"]["user"]["username"].is_null());
    assert!(!result["registerUser"]["token"]
        .as_str()
        .unwrap()
        .is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn register_user_is_idempotent_per_email(ctx: &mut TestHarness) {
    let client = GraphQLClient::anonymous(ctx);
    let email = format!("{}@example.com", Uuid::new_v4().simple());

    let first = client
        .query(&format!(
            r#"mutation {{ registerUser(email: "{email}") {{ user {{ id }} }} }}"#
        ))
        .await;
    let second = client
        .query(&format!(
            r#"mutation {{ registerUser(email: "{email}", name: "Renamed") {{ user {{ id name }} }} }}"#
        ))
        .await;

    // Same row both times; the second call refreshes the profile
    assert_eq!(
        first["registerUser"]["user"]["id"],
        second["registerUser"]["user"]["id"]
    );
    assert_eq!(second["registerUser"]["user"]["name"], "Renamed");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_username_succeeds_for_fresh_name(ctx: &mut TestHarness) {
    let user = fixtures::create_user_without_username(&ctx.db_pool)
        .await
        .unwrap();
    let client = GraphQLClient::signed_in(ctx, user.id.into_uuid(), None);
    let username = format!("ada_{}", &Uuid::new_v4().simple().to_string()[..8]);

    let result = client
        .query(&format!(
            r#"mutation {{ createUsername(username: "{username}") {{ success error }} }}"#
        ))
        .await;

    assert_eq!(result["createUsername"]["success"], true);
    assert!(result["createUsername"]["error"].is_null());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_username_rejects_taken_name(ctx: &mut TestHarness) {
    let existing = fixtures::create_user(&ctx.db_pool, "taken").await.unwrap();
    let taken = existing.username.clone().unwrap();

    let user = fixtures::create_user_without_username(&ctx.db_pool)
        .await
        .unwrap();
    let client = GraphQLClient::signed_in(ctx, user.id.into_uuid(), None);

    let result = client
        .query(&format!(
            r#"mutation {{ createUsername(username: "{taken}") {{ success error }} }}"#
        ))
        .await;

    assert_eq!(result["createUsername"]["success"], false);
    assert_eq!(
        result["createUsername"]["error"],
        "Username already taken. Try another"
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_username_requires_session(ctx: &mut TestHarness) {
    let client = GraphQLClient::anonymous(ctx);

    // Auth failure comes back in the response shape, not as a thrown error
    let result = client
        .query(r#"mutation { createUsername(username: "nobody") { success error } }"#)
        .await;

    assert_eq!(result["createUsername"]["success"], false);
    assert_eq!(result["createUsername"]["error"], "Not authorized");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_users_excludes_caller_and_existing_participants(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let caller = fixtures::create_user(pool, "searcher").await.unwrap();
    let match_a = fixtures::create_user(pool, "searcher").await.unwrap();
    let match_b = fixtures::create_user(pool, "searcher").await.unwrap();

    let caller_username = caller.username.clone().unwrap();
    let excluded_username = match_b.username.clone().unwrap();

    let client = GraphQLClient::signed_in(ctx, caller.id.into_uuid(), Some(&caller_username));

    let result = client
        .query(&format!(
            r#"query {{
                searchUsers(
                    username: "searcher",
                    usernamesInCurrentConvo: ["{excluded_username}"]
                ) {{ id username }}
            }}"#
        ))
        .await;

    let found = result["searchUsers"].as_array().unwrap();
    let usernames: Vec<&str> = found
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();

    assert!(usernames.contains(&match_a.username.as_deref().unwrap()));
    assert!(!usernames.contains(&caller_username.as_str()));
    assert!(!usernames.contains(&excluded_username.as_str()));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_users_treats_wildcards_literally(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let caller = fixtures::create_user(pool, "literal").await.unwrap();
    let other = fixtures::create_user(pool, "literal").await.unwrap();
    let caller_username = caller.username.clone().unwrap();

    let client = GraphQLClient::signed_in(ctx, caller.id.into_uuid(), Some(&caller_username));

    // "%" is not a match-everything pattern; it only matches usernames
    // containing a literal percent sign
    let result = client
        .query(r#"query { searchUsers(username: "%") { username } }"#)
        .await;

    let usernames: Vec<&str> = result["searchUsers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert!(!usernames.contains(&other.username.as_deref().unwrap()));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn search_users_requires_session(ctx: &mut TestHarness) {
    let client = GraphQLClient::anonymous(ctx);

    let result = client
        .execute(r#"query { searchUsers(username: "any") { id } }"#)
        .await;

    assert!(!result.is_ok());
    assert!(result.errors.iter().any(|e| e == "Not authorized"));
}
