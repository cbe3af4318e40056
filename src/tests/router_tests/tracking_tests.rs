use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{form_body, get_body, init_test_db, location, post_form, seed_complaint, seed_plain_user};
use astra::Body;
use http::{Method, Request};

#[test]
fn recording_a_status_change_updates_the_timeline() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Sewage leak on Elm Street", 2);

    let resp = post_form(
        &db,
        &format!("/complaints/{id}/tracking"),
        &[
            ("new_status", "in_review"),
            ("comment", "Crew dispatched to the site"),
            ("acting_user_id", "2"),
        ],
    );

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/tracking?message=Status+updated&tone=success")
    );

    let body = get_body(&db, &format!("/complaints/{id}/tracking"));

    assert!(body.contains("In review"));
    assert!(body.contains("from Pending"));
    assert!(body.contains("Crew dispatched to the site"));
    assert!(body.contains("Luis Herrera"));
    assert!(body.contains("Moderator"));
}

#[test]
fn an_unknown_status_value_is_flashed_back() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Sewage leak on Elm Street", 2);

    let resp = post_form(
        &db,
        &format!("/complaints/{id}/tracking"),
        &[("new_status", "paused"), ("acting_user_id", "2")],
    );

    assert_eq!(resp.status(), 302);

    let target = location(&resp);
    assert!(target.starts_with(&format!("/complaints/{id}/tracking?")));
    assert!(target.contains("Unknown+status%3A+paused"));
    assert!(target.contains("tone=error"));

    // Nothing was recorded.
    let body = get_body(&db, &format!("/complaints/{id}/tracking"));
    assert!(body.contains("No status changes recorded yet."));
}

#[test]
fn only_the_latest_entry_can_be_removed() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Sewage leak on Elm Street", 2);

    post_form(
        &db,
        &format!("/complaints/{id}/tracking"),
        &[("new_status", "in_review"), ("acting_user_id", "2")],
    );
    post_form(
        &db,
        &format!("/complaints/{id}/tracking"),
        &[("new_status", "in_progress"), ("acting_user_id", "2")],
    );

    // The first entry is no longer the newest one.
    let resp = post_form(&db, "/transitions/1/delete", &[("acting_user_id", "2")]);
    let target = location(&resp);
    assert!(target.contains("Only+the+most+recent+status+entry+can+be+removed"));
    assert!(target.contains("tone=error"));

    // The newest one goes, and the previous status comes back.
    let resp = post_form(&db, "/transitions/2/delete", &[("acting_user_id", "2")]);
    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/tracking?message=Status+entry+removed&tone=success")
    );

    let body = get_body(&db, &format!("/complaints/{id}/tracking"));
    assert!(body.contains("from Pending"));
    assert!(!body.contains("from In review"));
}

#[test]
fn undoing_someone_elses_entry_needs_the_admin_role() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Sewage leak on Elm Street", 2);
    let outsider = seed_plain_user(&db, "Rosa Quispe", "rosa@example.org");

    post_form(
        &db,
        &format!("/complaints/{id}/tracking"),
        &[("new_status", "in_review"), ("acting_user_id", "2")],
    );

    let outsider_id = outsider.to_string();
    let resp = post_form(
        &db,
        "/transitions/1/delete",
        &[("acting_user_id", &outsider_id)],
    );
    let target = location(&resp);
    assert!(target.contains("Only+the+recorder+or+an+administrator+can+undo+an+entry"));
    assert!(target.contains("tone=error"));

    let body = get_body(&db, &format!("/complaints/{id}/tracking"));
    assert!(body.contains("from Pending"));

    // An administrator may undo it on the recorder's behalf.
    let resp = post_form(&db, "/transitions/1/delete", &[("acting_user_id", "1")]);
    assert!(location(&resp).contains("Status+entry+removed"));
}

#[test]
fn editing_a_note_replaces_the_comment() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Sewage leak on Elm Street", 2);

    post_form(
        &db,
        &format!("/complaints/{id}/tracking"),
        &[
            ("new_status", "in_review"),
            ("comment", "First pass"),
            ("acting_user_id", "2"),
        ],
    );

    let resp = post_form(
        &db,
        "/transitions/1/comment",
        &[("comment", "Revised after the site visit"), ("acting_user_id", "2")],
    );

    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/tracking?message=Note+updated&tone=success")
    );

    let body = get_body(&db, &format!("/complaints/{id}/tracking"));
    assert!(body.contains("Revised after the site visit"));
    assert!(!body.contains("First pass"));
}

#[test]
fn a_missing_transition_is_not_found() {
    let db = init_test_db();
    seed_complaint(&db, "Sewage leak on Elm Street", 2);

    let data = form_body(&[("acting_user_id", "2")]);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/transitions/99/delete")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(data.as_bytes().to_vec()))
        .unwrap();

    match handle(req, &db) {
        Err(ServerError::NotFound) => {}
        Err(other) => panic!("expected NotFound, got: {other:?}"),
        Ok(resp) => panic!("expected NotFound, got a {} response", resp.status()),
    }
}
