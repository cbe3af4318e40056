use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{form_body, get_body, init_test_db, location, post_form, seed_complaint, seed_plain_user};
use astra::Body;
use http::{Method, Request};

#[test]
fn posting_a_comment_shows_it_in_the_thread() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Dust clouds from the quarry", 2);

    let resp = post_form(
        &db,
        &format!("/complaints/{id}/comments"),
        &[("body", "Measured again this morning, still bad"), ("user_id", "2")],
    );

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/comments?message=Comment+posted&tone=success")
    );

    let body = get_body(&db, &format!("/complaints/{id}/comments"));

    assert!(body.contains("Measured again this morning, still bad"));
    assert!(body.contains("Luis Herrera"));
    assert!(body.contains("1 so far"));
}

#[test]
fn the_thread_reads_oldest_first_unless_flipped() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Dust clouds from the quarry", 2);

    post_form(
        &db,
        &format!("/complaints/{id}/comments"),
        &[("body", "First remark"), ("user_id", "2")],
    );
    post_form(
        &db,
        &format!("/complaints/{id}/comments"),
        &[("body", "Second remark"), ("user_id", "1")],
    );

    let body = get_body(&db, &format!("/complaints/{id}/comments"));
    let first = body.find("First remark").expect("first comment missing");
    let second = body.find("Second remark").expect("second comment missing");
    assert!(first < second, "conversation order should put the older comment first");

    let flipped = get_body(&db, &format!("/complaints/{id}/comments?order=desc"));
    let first = flipped.find("First remark").expect("first comment missing");
    let second = flipped.find("Second remark").expect("second comment missing");
    assert!(second < first, "descending order should put the newer comment first");
}

#[test]
fn editing_marks_the_comment_as_edited() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Dust clouds from the quarry", 2);

    post_form(
        &db,
        &format!("/complaints/{id}/comments"),
        &[("body", "Original wording"), ("user_id", "2")],
    );

    let before = get_body(&db, &format!("/complaints/{id}/comments"));
    assert!(!before.contains("(edited)"));

    let resp = post_form(
        &db,
        "/comments/1",
        &[("body", "Corrected wording"), ("acting_user_id", "2")],
    );

    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/comments?message=Comment+updated&tone=success")
    );

    let after = get_body(&db, &format!("/complaints/{id}/comments"));
    assert!(after.contains("Corrected wording"));
    assert!(after.contains("(edited)"));
    assert!(!after.contains("Original wording"));
}

#[test]
fn touching_someone_elses_comment_needs_the_admin_role() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Dust clouds from the quarry", 2);
    let outsider = seed_plain_user(&db, "Rosa Quispe", "rosa@example.org");
    let outsider_id = outsider.to_string();

    post_form(
        &db,
        &format!("/complaints/{id}/comments"),
        &[("body", "Posted by the moderator"), ("user_id", "2")],
    );

    let resp = post_form(
        &db,
        "/comments/1",
        &[("body", "Hijacked"), ("acting_user_id", &outsider_id)],
    );
    assert!(location(&resp).contains("Only+the+author+or+an+administrator+can+edit+a+comment"));

    let resp = post_form(&db, "/comments/1/delete", &[("acting_user_id", &outsider_id)]);
    assert!(location(&resp).contains("Only+the+author+or+an+administrator+can+delete+a+comment"));

    let body = get_body(&db, &format!("/complaints/{id}/comments"));
    assert!(body.contains("Posted by the moderator"));

    // An administrator can clean up on the author's behalf.
    let resp = post_form(&db, "/comments/1/delete", &[("acting_user_id", "1")]);
    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/comments?message=Comment+deleted&tone=success")
    );

    let body = get_body(&db, &format!("/complaints/{id}/comments"));
    assert!(body.contains("No comments yet."));
}

#[test]
fn commenting_on_a_missing_complaint_is_not_found() {
    let db = init_test_db();

    let data = form_body(&[("body", "Anyone home?"), ("user_id", "2")]);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/complaints/99/comments")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(data.as_bytes().to_vec()))
        .unwrap();

    match handle(req, &db) {
        Err(ServerError::NotFound) => {}
        Err(other) => panic!("expected NotFound, got: {other:?}"),
        Ok(resp) => panic!("expected NotFound, got a {} response", resp.status()),
    }
}
