mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{bearer, create_user, create_vote, start_postgres, test_config};
use posts_service::models::{PostOut, PostResponse};
use serde_json::json;

macro_rules! create_post_via_api {
    ($app:expr, $user_id:expr, $title:expr, $published:expr) => {{
        let title: &str = $title;
        let resp = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/posts/")
                .insert_header(bearer($user_id))
                .set_json(json!({
                    "title": title,
                    "content": format!("{} body", title),
                    "published": $published,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: PostResponse = test::read_body_json(resp).await;
        created
    }};
}

#[actix_web::test]
async fn create_then_get_returns_owner_and_zero_votes() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let created = create_post_via_api!(app, owner, "first post", true);
    assert_eq!(created.owner_id, owner);
    assert_eq!(created.owner.id, owner);
    assert_eq!(created.owner.email, "owner@example.com");
    assert_eq!(created.title, "first post");
    assert!(created.published);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}", created.id))
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["votes"], 0);
    assert_eq!(body["Post"]["id"], created.id);
    assert_eq!(body["Post"]["owner_id"], owner);
    assert_eq!(body["Post"]["owner"]["email"], "owner@example.com");
}

#[actix_web::test]
async fn create_defaults_published_and_rejects_malformed_payload() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(owner))
            .set_json(json!({"title": "no flag", "content": "c"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PostResponse = test::read_body_json(resp).await;
    assert!(created.published);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/")
            .insert_header(bearer(owner))
            .set_json(json!({"title": "missing content"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 422);
    assert!(body["detail"].as_str().unwrap().contains("content"));
}

#[actix_web::test]
async fn requests_without_token_are_unauthorized() {
    let db = start_postgres().await;
    let app = test_app!(db.pool, test_config(false));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn get_missing_post_returns_404() {
    let db = start_postgres().await;
    let user = create_user(&db.pool, "reader@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/4242")
            .insert_header(bearer(user))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "post with id: 4242 was not found");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/not-a-number")
            .insert_header(bearer(user))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn vote_count_matches_vote_rows() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let voters = [
        create_user(&db.pool, "a@example.com").await,
        create_user(&db.pool, "b@example.com").await,
        create_user(&db.pool, "c@example.com").await,
    ];
    let app = test_app!(db.pool, test_config(false));

    let busy = create_post_via_api!(app, owner, "busy", true);
    let quiet = create_post_via_api!(app, owner, "quiet", true);

    // Insertion order interleaved across posts.
    create_vote(&db.pool, busy.id, voters[2]).await;
    create_vote(&db.pool, quiet.id, voters[0]).await;
    create_vote(&db.pool, busy.id, voters[0]).await;
    create_vote(&db.pool, busy.id, voters[1]).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/")
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<PostOut> = test::read_body_json(resp).await;

    let votes_for = |id: i32| posts.iter().find(|p| p.post.id == id).map(|p| p.votes);
    assert_eq!(votes_for(busy.id), Some(3));
    assert_eq!(votes_for(quiet.id), Some(1));
}

#[actix_web::test]
async fn list_search_and_paging() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    for title in ["rust tips", "python tips", "rust async", "100% done", "snake_case"] {
        create_post_via_api!(app, owner, title, true);
    }

    let app_ref = &app;
    let list = move |uri: String| {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(owner))
            .to_request();
        test::call_and_read_body_json::<_, _, Vec<PostOut>>(app_ref, req)
    };

    let all = list("/posts/".to_string()).await;
    assert_eq!(all.len(), 5);

    let empty_search = list("/posts/?search=".to_string()).await;
    assert_eq!(empty_search, all);

    let rust = list("/posts/?search=rust".to_string()).await;
    let titles: Vec<_> = rust.iter().map(|p| p.post.title.as_str()).collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.iter().all(|t| t.contains("rust")));

    // Wildcards in the search string match literally.
    let percent = list("/posts/?search=%25".to_string()).await;
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].post.title, "100% done");

    let underscore = list("/posts/?search=_".to_string()).await;
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].post.title, "snake_case");

    assert_eq!(list("/posts/?limit=2".to_string()).await.len(), 2);
    assert_eq!(list("/posts/?limit=2&skip=4".to_string()).await.len(), 1);
    assert!(list("/posts/?limit=0".to_string()).await.is_empty());
    assert!(list("/posts/?skip=5".to_string()).await.is_empty());
    assert!(list("/posts/?skip=500".to_string()).await.is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/?limit=-1")
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn default_limit_is_ten() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    for i in 0..12 {
        create_post_via_api!(app, owner, &format!("post {}", i), true);
    }

    let req = test::TestRequest::get()
        .uri("/posts/")
        .insert_header(bearer(owner))
        .to_request();
    let posts: Vec<PostOut> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 10);
}

#[actix_web::test]
async fn unpublished_posts_listed_unless_configured() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;

    let app = test_app!(db.pool, test_config(false));
    create_post_via_api!(app, owner, "visible", true);
    create_post_via_api!(app, owner, "draft", false);

    let req = test::TestRequest::get()
        .uri("/posts/")
        .insert_header(bearer(owner))
        .to_request();
    let posts: Vec<PostOut> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 2);

    let published_only = test_app!(db.pool, test_config(true));
    let req = test::TestRequest::get()
        .uri("/posts/")
        .insert_header(bearer(owner))
        .to_request();
    let posts: Vec<PostOut> = test::call_and_read_body_json(&published_only, req).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post.title, "visible");
}

#[actix_web::test]
async fn delete_by_non_owner_is_forbidden_and_keeps_post() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let intruder = create_user(&db.pool, "intruder@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let post = create_post_via_api!(app, owner, "mine", true);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(intruder))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Not Authorized to perform action");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(intruder))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: PostOut = test::read_body_json(resp).await;
    assert_eq!(body.post, post);
}

#[actix_web::test]
async fn delete_by_owner_removes_post_and_votes() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let voter = create_user(&db.pool, "voter@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let post = create_post_via_api!(app, owner, "short lived", true);
    create_vote(&db.pool, post.id, voter).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::count_votes(&db.pool, post.id).await, 0);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_by_owner_replaces_all_fields() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let post = create_post_via_api!(app, owner, "before", false);

    // `published` omitted: full replace resets it to the default, not the prior value.
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(owner))
            .set_json(json!({"title": "after", "content": "new body"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    let updated: PostResponse = test::read_body_json(resp).await;
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.title, "after");
    assert_eq!(updated.content, "new body");
    assert!(updated.published);
    assert_eq!(updated.created_at, post.created_at);
    assert_eq!(updated.owner, post.owner);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .insert_header(bearer(owner))
        .to_request();
    let fetched: PostOut = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.post, updated);
}

#[actix_web::test]
async fn update_failures() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let intruder = create_user(&db.pool, "intruder@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let post = create_post_via_api!(app, owner, "guarded", true);
    let payload = json!({"title": "hijacked", "content": "x", "published": false});

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(intruder))
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/posts/99999")
            .insert_header(bearer(owner))
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/posts/{}", post.id))
            .insert_header(bearer(owner))
            .set_json(json!({"title": "only title"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .insert_header(bearer(owner))
        .to_request();
    let fetched: PostOut = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.post, post);
}

#[actix_web::test]
async fn large_limit_returns_every_row_without_cap() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    sqlx::query(
        "INSERT INTO posts (title, content, owner_id) \
         SELECT 'bulk ' || n, 'body', $1 FROM generate_series(1, 150) AS n",
    )
    .bind(owner)
    .execute(&db.pool)
    .await
    .expect("insert posts");

    let app = test_app!(db.pool, test_config(false));
    let req = test::TestRequest::get()
        .uri("/posts/?limit=150")
        .insert_header(bearer(owner))
        .to_request();
    let posts: Vec<PostOut> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 150);

    let mut capped = test_config(false);
    capped.posts.max_limit = Some(100);
    let app = test_app!(db.pool, capped);
    let req = test::TestRequest::get()
        .uri("/posts/?limit=150")
        .insert_header(bearer(owner))
        .to_request();
    let posts: Vec<PostOut> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 100);
}

#[actix_web::test]
async fn ids_beyond_int_range_are_not_found() {
    let db = start_postgres().await;
    let owner = create_user(&db.pool, "owner@example.com").await;
    let app = test_app!(db.pool, test_config(false));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/posts/3000000000")
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "post with id: 3000000000 was not found");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/posts/3000000000")
            .insert_header(bearer(owner))
            .set_json(json!({"title": "t", "content": "c"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "post with id: 3000000000 does not exist");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/posts/-3000000000")
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/3000000000")
            .insert_header(bearer(owner))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_by_deleted_user_is_not_found() {
    let db = start_postgres().await;
    let ghost = create_user(&db.pool, "ghost@example.com").await;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(ghost)
        .execute(&db.pool)
        .await
        .expect("delete user");
    let app = test_app!(db.pool, test_config(false));

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/posts/")
            .insert_header(bearer(ghost))
            .set_json(json!({"title": "orphan", "content": "c"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], format!("user with id: {} does not exist", ghost));
}
