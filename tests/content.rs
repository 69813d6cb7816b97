#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::TestContext;
use notekeeper::{
    handlers::note::{FORM_FIELDS, FORM_NAME},
    models::{
        note::{slugify, Note},
        user::User,
    },
    routes::Route,
};

const TEST_LIMIT: usize = 10;

/// Ten numbered notes plus one with an explicit slug, all by `user`.
fn seed(ctx: &TestContext) -> (User, User, Note) {
    let author = ctx.create_user("user");
    let not_author = ctx.create_user("not_author");
    for i in 0..TEST_LIMIT {
        ctx.create_note(&author, &format!("note {i}"), "content", None);
    }
    let note = ctx.create_note(&author, "title", "content", Some("note-slug"));
    (author, not_author, note)
}

fn ids(object_list: &Value) -> Vec<i64> {
    object_list
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect()
}

#[actix_web::test]
async fn not_author_does_not_see_the_note() {
    let ctx = TestContext::new();
    let (_, not_author, note) = seed(&ctx);
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri(&Route::List.path())
        .cookie(ctx.login(&not_author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(!ids(&body["object_list"]).contains(&(note.id as i64)));
    assert_eq!(body["object_list"], json!([]));
}

#[actix_web::test]
async fn author_gets_all_notes_in_id_order() {
    let ctx = TestContext::new();
    let (author, _, note) = seed(&ctx);
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri(&Route::List.path())
        .cookie(ctx.login(&author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let all_ids = ids(&body["object_list"]);
    let mut sorted_ids = all_ids.clone();
    sorted_ids.sort_unstable();
    assert_eq!(all_ids.len(), TEST_LIMIT + 1);
    assert_eq!(all_ids, sorted_ids);

    let last = &body["object_list"][TEST_LIMIT];
    assert_eq!(last["slug"], "note-slug");
    assert_ne!(last["slug"], slugify(&note.title).as_str());
    assert_eq!(body["object_list"][0]["slug"], "note-0");
}

#[actix_web::test]
async fn list_ignores_request_parameters() {
    let ctx = TestContext::new();
    let (author, not_author, _) = seed(&ctx);
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("{}?author_id={}", Route::List.path(), author.id))
        .cookie(ctx.login(&not_author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["object_list"], json!([]));
}

#[actix_web::test]
async fn add_and_edit_pages_carry_the_note_form() {
    let ctx = TestContext::new();
    let (author, _, note) = seed(&ctx);
    let app = app!(ctx);

    for route in [Route::Add, Route::Edit(&note.slug)] {
        let req = test::TestRequest::get()
            .uri(&route.path())
            .cookie(ctx.login(&author))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", route.name());
        let body: Value = test::read_body_json(resp).await;

        assert_eq!(body["form"]["name"], FORM_NAME, "{}", route.name());
        assert_eq!(body["form"]["fields"], json!(FORM_FIELDS), "{}", route.name());
    }
}

#[actix_web::test]
async fn edit_form_is_prefilled_with_the_note() {
    let ctx = TestContext::new();
    let (author, _, note) = seed(&ctx);
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri(&Route::Edit(&note.slug).path())
        .cookie(ctx.login(&author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["form"]["data"],
        json!({ "title": "title", "text": "content", "slug": "note-slug" })
    );
    assert_eq!(body["object"]["id"], note.id);
}

#[actix_web::test]
async fn detail_shows_the_note() {
    let ctx = TestContext::new();
    let (author, _, note) = seed(&ctx);
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri(&Route::Detail(&note.slug).path())
        .cookie(ctx.login(&author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["object"]["title"], "title");
    assert_eq!(body["object"]["text"], "content");
    assert_eq!(body["object"]["author_id"], author.id);
}

#[actix_web::test]
async fn home_page_names_the_logged_in_user() {
    let ctx = TestContext::new();
    let (author, _, _) = seed(&ctx);
    let app = app!(ctx);

    let anonymous = test::TestRequest::get().uri(&Route::Home.path()).to_request();
    let body: Value = test::call_and_read_body_json(&app, anonymous).await;
    assert_eq!(body["user"], Value::Null);

    let logged_in = test::TestRequest::get()
        .uri(&Route::Home.path())
        .cookie(ctx.login(&author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, logged_in).await;
    assert_eq!(body["user"], "user");
}
