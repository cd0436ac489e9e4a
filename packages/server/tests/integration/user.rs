use serde_json::json;

use crate::common::{PNG_DATA_URL, TestApp, routes};

mod profiles {
    use super::*;

    #[tokio::test]
    async fn user_list_is_public_and_paginated() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;
        app.create_authenticated_user("bob").await;

        let res = app.get_without_token(routes::USERS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 2);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty_not_an_error() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice").await;

        let url = format!("{}?page={}", routes::USERS, u64::MAX);
        let res = app.get_without_token(&url).await;

        assert_eq!(res.status, 200, "huge page number failed: {}", res.text);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert!(res.body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_id_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::user(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn is_subscribed_reflects_the_calling_user() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice").await;
        let (_, bob_id) = app.create_authenticated_user("bob").await;

        let res = app
            .post_with_token(&routes::subscribe(bob_id), &json!({}), &alice)
            .await;
        assert_eq!(res.status, 201, "subscribe failed: {}", res.text);

        let seen_by_alice = app.get_with_token(&routes::user(bob_id), &alice).await;
        assert_eq!(seen_by_alice.body["is_subscribed"], true);

        let seen_anonymously = app.get_without_token(&routes::user(bob_id)).await;
        assert_eq!(seen_anonymously.body["is_subscribed"], false);
    }
}

mod avatar {
    use super::*;

    #[tokio::test]
    async fn avatar_can_be_set_and_is_served_back() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice").await;

        let res = app
            .put_with_token(routes::AVATAR, &json!({"avatar": PNG_DATA_URL}), &token)
            .await;

        assert_eq!(res.status, 200, "set_avatar failed: {}", res.text);
        let url = res.body["avatar"].as_str().unwrap();
        assert!(url.contains("/media/avatars/"), "unexpected url: {url}");

        // The returned URL is absolute and points at this server.
        let fetched = reqwest::get(url).await.unwrap();
        assert_eq!(fetched.status().as_u16(), 200);
        assert_eq!(
            fetched.headers()["content-type"].to_str().unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn avatar_can_be_removed() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice").await;
        app.put_with_token(routes::AVATAR, &json!({"avatar": PNG_DATA_URL}), &token)
            .await;

        let res = app.delete_with_token(routes::AVATAR, &token).await;
        assert_eq!(res.status, 204);

        let me = app.get_with_token(routes::ME, &token).await;
        assert!(me.body["avatar"].is_null());
    }

    #[tokio::test]
    async fn non_image_payload_is_rejected() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice").await;

        let res = app
            .put_with_token(routes::AVATAR, &json!({"avatar": "hello"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod subscriptions {
    use super::*;

    #[tokio::test]
    async fn subscribe_then_unsubscribe_roundtrip() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice").await;
        let (_, bob_id) = app.create_authenticated_user("bob").await;

        let res = app
            .post_with_token(&routes::subscribe(bob_id), &json!({}), &alice)
            .await;
        assert_eq!(res.status, 201);
        assert_eq!(res.body["username"], "bob");
        assert_eq!(res.body["is_subscribed"], true);

        let res = app.delete_with_token(&routes::subscribe(bob_id), &alice).await;
        assert_eq!(res.status, 204);
    }

    #[tokio::test]
    async fn subscribing_twice_is_a_conflict() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice").await;
        let (_, bob_id) = app.create_authenticated_user("bob").await;
        app.post_with_token(&routes::subscribe(bob_id), &json!({}), &alice)
            .await;

        let res = app
            .post_with_token(&routes::subscribe(bob_id), &json!({}), &alice)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn cannot_subscribe_to_yourself() {
        let app = TestApp::spawn().await;
        let (alice, alice_id) = app.create_authenticated_user("alice").await;

        let res = app
            .post_with_token(&routes::subscribe(alice_id), &json!({}), &alice)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "SELF_SUBSCRIPTION");
    }

    #[tokio::test]
    async fn unsubscribing_when_not_subscribed_is_not_found() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice").await;
        let (_, bob_id) = app.create_authenticated_user("bob").await;

        let res = app.delete_with_token(&routes::subscribe(bob_id), &alice).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn subscription_list_includes_author_recipes_and_count() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice").await;
        let (bob, bob_id) = app.create_authenticated_user("bob").await;

        let flour = app.create_ingredient("flour", "g").await;
        app.create_recipe(&bob, "Bread", &[(flour, 500)]).await;
        app.create_recipe(&bob, "Pancakes", &[(flour, 200)]).await;

        app.post_with_token(&routes::subscribe(bob_id), &json!({}), &alice)
            .await;

        let res = app.get_with_token(routes::SUBSCRIPTIONS, &alice).await;

        assert_eq!(res.status, 200);
        let entry = &res.body["data"][0];
        assert_eq!(entry["username"], "bob");
        assert_eq!(entry["recipes_count"], 2);
        assert_eq!(entry["recipes"].as_array().unwrap().len(), 2);
        // Newest first.
        assert_eq!(entry["recipes"][0]["name"], "Pancakes");
    }
}
