use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    form_body, get_body, init_test_db, location, post_form, seed_complaint, seed_plain_user,
};
use astra::Body;
use http::{Method, Request};

#[test]
fn create_complaint_redirects_to_its_edit_page() {
    let db = init_test_db();

    let resp = post_form(
        &db,
        "/complaints",
        &[
            ("title", "Blocked storm drain"),
            ("description", "Water backs up after every rain"),
            ("category_id", "1"),
            ("user_id", "2"),
            ("privacy", "public"),
        ],
    );

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        "/complaints/1/edit?message=Complaint+%231+created&tone=success"
    );

    let body = get_body(&db, "/complaints/1/edit");
    assert!(body.contains("Blocked storm drain"));
    assert!(body.contains("Luis Herrera"));
}

#[test]
fn create_complaint_without_a_title_flashes_back() {
    let db = init_test_db();

    let resp = post_form(
        &db,
        "/complaints",
        &[
            ("description", "No title on purpose"),
            ("category_id", "1"),
            ("user_id", "2"),
            ("privacy", "public"),
        ],
    );

    assert_eq!(resp.status(), 302);
    let target = location(&resp);
    assert!(target.starts_with("/complaints/new?"));
    assert!(target.contains("Missing+required+field%3A+title"));
    assert!(target.contains("tone=error"));
}

#[test]
fn complaints_list_filters_by_status() {
    let db = init_test_db();
    let first = seed_complaint(&db, "Oily runoff by the mill", 2);
    seed_complaint(&db, "Smoke from the tannery", 2);

    let resp = post_form(
        &db,
        &format!("/complaints/{first}/tracking"),
        &[("new_status", "in_review"), ("acting_user_id", "2")],
    );
    assert_eq!(resp.status(), 302);

    let everything = get_body(&db, "/complaints");
    assert!(everything.contains("Oily runoff by the mill"));
    assert!(everything.contains("Smoke from the tannery"));

    let in_review = get_body(&db, "/complaints?status=in_review");
    assert!(in_review.contains("Oily runoff by the mill"));
    assert!(!in_review.contains("Smoke from the tannery"));
}

#[test]
fn list_marks_private_complaints() {
    let db = init_test_db();

    post_form(
        &db,
        "/complaints",
        &[
            ("title", "Night-time discharge"),
            ("description", "Only visible after dark"),
            ("category_id", "1"),
            ("user_id", "2"),
            ("privacy", "private"),
        ],
    );

    let body = get_body(&db, "/complaints");
    assert!(body.contains("Night-time discharge"));
    assert!(body.contains("(private)"));
}

#[test]
fn updating_someone_elses_complaint_needs_the_admin_role() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Oily runoff by the mill", 2);
    let outsider = seed_plain_user(&db, "Pia Castro", "pia@example.com");

    let fields = [
        ("title", "Renamed by an outsider"),
        ("description", "Should not land"),
        ("category_id", "1"),
        ("privacy", "public"),
    ];

    // 1. A plain user who is not the reporter is turned away
    let mut denied = fields.to_vec();
    let outsider_id = outsider.to_string();
    denied.push(("acting_user_id", &outsider_id));

    let resp = post_form(&db, &format!("/complaints/{id}"), &denied);
    assert_eq!(resp.status(), 302);
    assert!(location(&resp).contains("tone=error"));

    let body = get_body(&db, &format!("/complaints/{id}/edit"));
    assert!(body.contains("Oily runoff by the mill"));

    // 2. An administrator may edit anything
    let mut allowed = fields.to_vec();
    allowed.push(("acting_user_id", "1"));
    allowed[0] = ("title", "Renamed by the admin");

    let resp = post_form(&db, &format!("/complaints/{id}"), &allowed);
    assert_eq!(resp.status(), 302);
    assert!(location(&resp).contains("tone=success"));

    let body = get_body(&db, &format!("/complaints/{id}/edit"));
    assert!(body.contains("Renamed by the admin"));
}

#[test]
fn deleting_a_complaint_removes_it_and_its_history() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Oily runoff by the mill", 2);

    post_form(
        &db,
        &format!("/complaints/{id}/tracking"),
        &[("new_status", "in_review"), ("acting_user_id", "2")],
    );
    post_form(
        &db,
        &format!("/complaints/{id}/comments"),
        &[("body", "Inspector scheduled"), ("user_id", "2")],
    );

    let resp = post_form(
        &db,
        &format!("/complaints/{id}/delete"),
        &[("acting_user_id", "2")],
    );
    assert_eq!(resp.status(), 302);
    let target = location(&resp);
    assert!(target.starts_with("/complaints?"));
    assert!(target.contains("tone=success"));

    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/complaints/{id}"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(
            form_body(&[("acting_user_id", "2")]).as_bytes().to_vec(),
        ))
        .unwrap();
    match handle(req, &db) {
        Err(ServerError::NotFound) => {}
        Err(other) => panic!("expected NotFound, got: {other:?}"),
        Ok(resp) => panic!("expected NotFound, got a {} response", resp.status()),
    }

    let body = get_body(&db, "/complaints");
    assert!(body.contains("No complaints match."));
}
