//! End-to-end datastore flows. Each test gets a fresh, migrated database.
//!
//! Run with a Postgres `DATABASE_URL`: `cargo test -- --ignored`

use chrono::NaiveDate;
use sqlx::PgPool;

use worldate::db::{daily_picks, interests, users};
use worldate::models::{Conversation, NewUser, UserUpdate};
use worldate::services::{matching, messaging, profiles, recommendations, MatchSubject};
use worldate::AppError;

fn new_user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        age: 28,
        location: "NYC".to_string(),
        bio: None,
        avatar_url: None,
        world_username: None,
    }
}

async fn create_users(pool: &PgPool, count: usize) -> Vec<i32> {
    let mut ids = Vec::new();
    for i in 0..count {
        let user = users::create_user(pool, &new_user(&format!("user{}", i))).await.unwrap();
        ids.push(user.id);
    }
    ids
}

async fn make_match(pool: &PgPool, a: i32, b: i32) {
    matching::record_affinity(pool, a, b).await.unwrap();
    matching::record_affinity(pool, b, a).await.unwrap();
}

fn pick_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

async fn conversation_by_pair(pool: &PgPool, user_one_id: i32, user_two_id: i32) -> Option<Conversation> {
    sqlx::query_as::<_, Conversation>(
        "SELECT id, user_one_id, user_two_id, created_at, updated_at
         FROM conversations WHERE user_one_id = $1 AND user_two_id = $2",
    )
    .bind(user_one_id)
    .bind(user_two_id)
    .fetch_optional(pool)
    .await
    .unwrap()
}

async fn stored_pick_count(pool: &PgPool, user_id: i32, date: NaiveDate) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM daily_picks WHERE user_id = $1 AND picked_for_date = $2")
        .bind(user_id)
        .bind(date)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn create_interest_ids(pool: &PgPool, names: &[&str]) -> Vec<i32> {
    let mut ids = Vec::new();
    for name in names {
        ids.push(interests::create_interest(pool, name).await.unwrap().id);
    }
    ids
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn reciprocal_likes_show_up_as_matches(pool: PgPool) {
    let ids = create_users(&pool, 2).await;
    let (a, b) = (ids[0], ids[1]);

    let first = matching::record_affinity(&pool, a, b).await.unwrap();
    assert!(first.is_new_edge);
    assert!(!first.is_mutual_match);

    let second = matching::record_affinity(&pool, b, a).await.unwrap();
    assert!(second.is_new_edge);
    assert!(second.is_mutual_match);

    let a_matches = matching::get_matches(&pool, &MatchSubject::Id(a)).await.unwrap();
    let b_matches = matching::get_matches(&pool, &MatchSubject::Id(b)).await.unwrap();
    assert_eq!(a_matches.len(), 1);
    assert_eq!(a_matches[0].user.id, b);
    assert_eq!(b_matches.len(), 1);
    assert_eq!(b_matches[0].user.id, a);
    assert_eq!(a_matches[0].matched_at, b_matches[0].matched_at);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn repeated_like_is_idempotent(pool: PgPool) {
    let ids = create_users(&pool, 2).await;

    matching::record_affinity(&pool, ids[0], ids[1]).await.unwrap();
    let again = matching::record_affinity(&pool, ids[0], ids[1]).await.unwrap();
    assert!(!again.is_new_edge);

    let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE liker_id = $1 AND liked_id = $2")
        .bind(ids[0])
        .bind(ids[1])
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(edges, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn one_sided_like_is_not_a_match(pool: PgPool) {
    let ids = create_users(&pool, 2).await;
    matching::record_affinity(&pool, ids[0], ids[1]).await.unwrap();

    assert!(matching::get_matches(&pool, &MatchSubject::Id(ids[0])).await.unwrap().is_empty());
    assert!(matching::get_matches(&pool, &MatchSubject::Id(ids[1])).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn like_of_missing_user_is_not_found(pool: PgPool) {
    let ids = create_users(&pool, 1).await;
    let err = matching::record_affinity(&pool, ids[0], 9999).await.unwrap_err();
    assert_eq!(err.code(), "LIKED_USER_NOT_FOUND");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn matches_resolve_by_world_address(pool: PgPool) {
    let ids = create_users(&pool, 2).await;
    make_match(&pool, ids[0], ids[1]).await;
    profiles::link_world_address(&pool, ids[0], "0x1108F177596f7A2a913ABf6C208FACEf152C3d8c")
        .await
        .unwrap();

    let subject = MatchSubject::Address("0x1108f177596f7a2a913abf6c208facef152c3d8c".to_string());
    let found = matching::get_matches(&pool, &subject).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].user.id, ids[1]);

    let unknown = MatchSubject::Address("0x0000000000000000000000000000000000000001".to_string());
    let err = matching::get_matches(&pool, &unknown).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn world_address_is_write_once(pool: PgPool) {
    let ids = create_users(&pool, 2).await;
    let address = "0x1108f177596f7a2a913abf6c208facef152c3d8c";
    let other = "0x61886e7d61f4086ada1829880af440aa0de3fc96";

    profiles::link_world_address(&pool, ids[0], address).await.unwrap();
    assert!(profiles::link_world_address(&pool, ids[0], address).await.is_ok());

    let changed = profiles::link_world_address(&pool, ids[0], other).await.unwrap_err();
    assert_eq!(changed.code(), "ADDRESS_ALREADY_SET");

    let taken = profiles::link_world_address(&pool, ids[1], address).await.unwrap_err();
    assert_eq!(taken.code(), "ADDRESS_TAKEN");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn messaging_requires_mutual_match(pool: PgPool) {
    let ids = create_users(&pool, 2).await;
    matching::record_affinity(&pool, ids[0], ids[1]).await.unwrap();

    let err = messaging::send_message(&pool, ids[0], ids[1], "hello").await.unwrap_err();
    assert!(matches!(err, AppError::NotMutualMatch));

    let none: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(none, 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn both_directions_share_one_canonical_conversation(pool: PgPool) {
    let ids = create_users(&pool, 9).await;
    let (low, high) = (ids[4], ids[8]);
    make_match(&pool, low, high).await;

    // The higher id writes first
    let first = messaging::send_message(&pool, high, low, "  hey  ").await.unwrap();
    let reply = messaging::send_message(&pool, low, high, "hi!").await.unwrap();
    assert_eq!(first.conversation_id, reply.conversation_id);

    let conversation = conversation_by_pair(&pool, low, high).await.expect("conversation row");
    assert_eq!(conversation.id, first.conversation_id);
    assert_eq!(conversation.user_one_id, low);
    assert_eq!(conversation.user_two_id, high);

    let messages = messaging::list_messages(&pool, first.conversation_id, low, false).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].body, "hey");
    assert_eq!(messages[1].sender_id, low);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn mark_read_only_touches_incoming_messages(pool: PgPool) {
    let ids = create_users(&pool, 2).await;
    let (a, b) = (ids[0], ids[1]);
    make_match(&pool, a, b).await;

    let sent = messaging::send_message(&pool, a, b, "one").await.unwrap();
    messaging::send_message(&pool, a, b, "two").await.unwrap();
    messaging::send_message(&pool, b, a, "three").await.unwrap();

    let inbox = messaging::list_conversations(&pool, b).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].other_user.id, a);
    assert_eq!(inbox[0].unread_count, 2);
    assert_eq!(inbox[0].last_message.as_ref().unwrap().body, "three");

    let read = messaging::list_messages(&pool, sent.conversation_id, b, true).await.unwrap();
    for message in &read {
        if message.sender_id == a {
            assert!(message.read_at.is_some());
        } else {
            assert!(message.read_at.is_none());
        }
    }

    let inbox = messaging::list_conversations(&pool, b).await.unwrap();
    assert_eq!(inbox[0].unread_count, 0);
    let sender_inbox = messaging::list_conversations(&pool, a).await.unwrap();
    assert_eq!(sender_inbox[0].unread_count, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn outsider_cannot_read_conversation(pool: PgPool) {
    let ids = create_users(&pool, 3).await;
    make_match(&pool, ids[0], ids[1]).await;
    let sent = messaging::send_message(&pool, ids[0], ids[1], "private").await.unwrap();

    let err = messaging::list_messages(&pool, sent.conversation_id, ids[2], true).await.unwrap_err();
    assert_eq!(err.code(), "NOT_CONVERSATION_PARTICIPANT");

    let missing = messaging::list_messages(&pool, 9999, ids[0], false).await.unwrap_err();
    assert_eq!(missing.code(), "CONVERSATION_NOT_FOUND");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn picks_rank_by_shared_interests(pool: PgPool) {
    let ids = create_users(&pool, 3).await;
    let travel = interests::create_interest(&pool, "Travel").await.unwrap().id;
    let music = interests::create_interest(&pool, "Music").await.unwrap().id;
    let coffee = interests::create_interest(&pool, "Coffee").await.unwrap().id;

    profiles::replace_user_interests(&pool, ids[0], &[travel, music]).await.unwrap();
    profiles::replace_user_interests(&pool, ids[1], &[travel, coffee]).await.unwrap();
    profiles::replace_user_interests(&pool, ids[2], &[travel, music]).await.unwrap();

    let outcome = recommendations::refresh_daily_picks_for_date(&pool, ids[0], pick_date())
        .await
        .unwrap();
    assert_eq!(outcome.count, 2);

    let picks = daily_picks::get_daily_picks(&pool, ids[0], pick_date()).await.unwrap();
    assert_eq!(picks[0].user.id, ids[2]);
    assert_eq!(picks[0].score, 1.0);
    assert_eq!(picks[1].user.id, ids[1]);
    assert!((picks[1].score - 1.0 / 3.0).abs() < 1e-9);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn refreshing_twice_keeps_one_batch(pool: PgPool) {
    let ids = create_users(&pool, 15).await;

    let first = recommendations::refresh_daily_picks_for_date(&pool, ids[0], pick_date()).await.unwrap();
    let second = recommendations::refresh_daily_picks_for_date(&pool, ids[0], pick_date()).await.unwrap();
    assert_eq!(first.count, 10);
    assert_eq!(second.count, 10);

    let stored = stored_pick_count(&pool, ids[0], pick_date()).await;
    assert_eq!(stored, 10);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn picks_are_empty_before_refresh(pool: PgPool) {
    let ids = create_users(&pool, 3).await;
    let picks = recommendations::get_daily_picks(&pool, ids[0], chrono_tz::Tz::UTC).await.unwrap();
    assert!(picks.is_empty());

    let err = recommendations::get_daily_picks(&pool, 9999, chrono_tz::Tz::UTC).await.unwrap_err();
    assert_eq!(err.code(), "USER_NOT_FOUND");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_interest_name_conflicts(pool: PgPool) {
    profiles::create_interest(&pool, "Yoga").await.unwrap();
    let err = profiles::create_interest(&pool, " Yoga ").await.unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_NAME");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn matches_are_ordered_by_when_they_formed(pool: PgPool) {
    let ids = create_users(&pool, 4).await;
    for other in &ids[1..] {
        matching::record_affinity(&pool, ids[0], *other).await.unwrap();
    }
    // Reciprocated out of id order
    for other in [ids[3], ids[1], ids[2]] {
        matching::record_affinity(&pool, other, ids[0]).await.unwrap();
    }

    let found = matching::get_matches(&pool, &MatchSubject::Id(ids[0])).await.unwrap();
    let order: Vec<i32> = found.iter().map(|m| m.user.id).collect();
    assert_eq!(order, vec![ids[3], ids[1], ids[2]]);
    assert!(found.windows(2).all(|w| w[0].matched_at <= w[1].matched_at));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn inbox_lists_most_recent_activity_first(pool: PgPool) {
    let ids = create_users(&pool, 3).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    make_match(&pool, a, b).await;
    make_match(&pool, a, c).await;

    let with_b = messaging::send_message(&pool, a, b, "hi b").await.unwrap();
    let with_c = messaging::send_message(&pool, a, c, "hi c").await.unwrap();

    let inbox = messaging::list_conversations(&pool, a).await.unwrap();
    let order: Vec<i32> = inbox.iter().map(|s| s.conversation_id).collect();
    assert_eq!(order, vec![with_c.conversation_id, with_b.conversation_id]);

    messaging::send_message(&pool, b, a, "back to you").await.unwrap();

    let inbox = messaging::list_conversations(&pool, a).await.unwrap();
    let order: Vec<i32> = inbox.iter().map(|s| s.conversation_id).collect();
    assert_eq!(order, vec![with_b.conversation_id, with_c.conversation_id]);
    assert_eq!(inbox[0].last_message.as_ref().unwrap().body, "back to you");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn send_reports_missing_participants(pool: PgPool) {
    let ids = create_users(&pool, 1).await;

    let err = messaging::send_message(&pool, ids[0], 9999, "anyone?").await.unwrap_err();
    assert_eq!(err.code(), "RECIPIENT_NOT_FOUND");

    let err = messaging::send_message(&pool, 9999, ids[0], "hello").await.unwrap_err();
    assert_eq!(err.code(), "SENDER_NOT_FOUND");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn target_without_interests_gets_only_random_fill(pool: PgPool) {
    let ids = create_users(&pool, 4).await;
    let tags = create_interest_ids(&pool, &["Travel", "Music"]).await;
    for other in &ids[1..] {
        profiles::replace_user_interests(&pool, *other, &tags).await.unwrap();
    }

    let outcome = recommendations::refresh_daily_picks_for_date(&pool, ids[0], pick_date())
        .await
        .unwrap();
    assert_eq!(outcome.count, 3);

    let picks = daily_picks::get_daily_picks(&pool, ids[0], pick_date()).await.unwrap();
    assert_eq!(picks.len(), 3);
    assert!(picks.iter().all(|p| p.score == 0.0 && p.user.id != ids[0]));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn tied_picks_read_back_in_rank_order(pool: PgPool) {
    let ids = create_users(&pool, 4).await;
    let tags = create_interest_ids(&pool, &["Coffee"]).await;
    for user in &ids {
        profiles::replace_user_interests(&pool, *user, &tags).await.unwrap();
    }

    recommendations::refresh_daily_picks_for_date(&pool, ids[0], pick_date()).await.unwrap();

    let picks = daily_picks::get_daily_picks(&pool, ids[0], pick_date()).await.unwrap();
    let order: Vec<i32> = picks.iter().map(|p| p.user.id).collect();
    assert_eq!(order, vec![ids[1], ids[2], ids[3]]);
    assert!(picks.iter().all(|p| p.score == 1.0));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn profile_update_changes_only_given_fields(pool: PgPool) {
    let mut seeded = new_user("Sarah");
    seeded.bio = Some("Yoga instructor".to_string());
    let user = profiles::create_user(&pool, &seeded).await.unwrap();

    let update = UserUpdate {
        age: Some(31),
        location: Some("  Austin ".to_string()),
        bio: Some(String::new()),
        ..Default::default()
    };
    let updated = profiles::update_profile(&pool, user.id, &update).await.unwrap();
    assert_eq!(updated.name, "Sarah");
    assert_eq!(updated.age, 31);
    assert_eq!(updated.location, "Austin");
    assert_eq!(updated.bio, None);
    assert!(updated.updated_at >= user.updated_at);

    let missing = profiles::update_profile(&pool, 9999, &update).await.unwrap_err();
    assert_eq!(missing.code(), "USER_NOT_FOUND");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn user_directory_searches_name_and_location(pool: PgPool) {
    for (name, location) in [("Ava", "Nashville"), ("Ben", "NYC"), ("Cleo", "New Orleans")] {
        let mut user = new_user(name);
        user.location = location.to_string();
        profiles::create_user(&pool, &user).await.unwrap();
    }

    let names = |found: Vec<worldate::models::UserSummary>| found.into_iter().map(|u| u.name).collect::<Vec<_>>();

    let newest = profiles::search_users(&pool, None, Some(2), None).await.unwrap();
    assert_eq!(names(newest), vec!["Cleo", "Ben"]);

    let by_location = profiles::search_users(&pool, Some("nyc"), None, None).await.unwrap();
    assert_eq!(names(by_location), vec!["Ben"]);

    let by_either = profiles::search_users(&pool, Some("AV"), None, None).await.unwrap();
    assert_eq!(names(by_either), vec!["Ava"]);

    let skipped = profiles::search_users(&pool, None, None, Some(2)).await.unwrap();
    assert_eq!(names(skipped), vec!["Ava"]);
}
