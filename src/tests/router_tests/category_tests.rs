use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{get_body, init_test_db, location, post_form, seed_complaint};
use astra::Body;
use http::{Method, Request};

#[test]
fn managing_categories_requires_the_admin_role() {
    let db = init_test_db();

    // The moderator account is turned away.
    let resp = post_form(
        &db,
        "/categories",
        &[
            ("name", "Potholes"),
            ("priority", "high"),
            ("acting_user_id", "2"),
        ],
    );
    let target = location(&resp);
    assert!(target.contains("Only+an+administrator+can+manage+categories"));
    assert!(target.contains("tone=error"));
    assert!(!get_body(&db, "/categories").contains("Potholes"));

    // The schema seeds five categories, so the new one lands at id 6.
    let resp = post_form(
        &db,
        "/categories",
        &[
            ("name", "Potholes"),
            ("description", "Road surface damage"),
            ("priority", "high"),
            ("acting_user_id", "1"),
        ],
    );
    assert_eq!(
        location(&resp),
        "/categories?message=Category+%236+created&tone=success"
    );

    let body = get_body(&db, "/categories");
    assert!(body.contains("Potholes"));
    assert!(body.contains("Road surface damage"));
    assert!(body.contains("High"));
}

#[test]
fn updating_a_category_renames_it() {
    let db = init_test_db();

    let resp = post_form(
        &db,
        "/categories/5",
        &[
            ("name", "Tree felling"),
            ("priority", "medium"),
            ("active", "1"),
            ("acting_user_id", "1"),
        ],
    );

    assert_eq!(
        location(&resp),
        "/categories?message=Category+updated&tone=success"
    );

    let body = get_body(&db, "/categories");
    assert!(body.contains("Tree felling"));
    assert!(!body.contains("Deforestation"));
}

#[test]
fn an_unchecked_active_box_retires_the_category() {
    let db = init_test_db();

    assert!(get_body(&db, "/complaints/new").contains("Deforestation"));

    // The edit form only sends the checkbox when it is ticked.
    post_form(
        &db,
        "/categories/5",
        &[
            ("name", "Deforestation"),
            ("priority", "medium"),
            ("acting_user_id", "1"),
        ],
    );

    assert!(!get_body(&db, "/complaints/new").contains("Deforestation"));
}

#[test]
fn a_category_in_use_cannot_be_deleted() {
    let db = init_test_db();
    seed_complaint(&db, "Foam on the riverbank", 2);

    let resp = post_form(&db, "/categories/1/delete", &[("acting_user_id", "1")]);
    let target = location(&resp);
    assert!(target.contains("The+category+still+has+complaints+assigned+to+it"));
    assert!(target.contains("tone=error"));
    assert!(get_body(&db, "/categories").contains("Water pollution"));

    // Nothing points at Noise, so it can go.
    let resp = post_form(&db, "/categories/4/delete", &[("acting_user_id", "1")]);
    assert_eq!(
        location(&resp),
        "/categories?message=Category+deleted&tone=success"
    );
    assert!(!get_body(&db, "/categories").contains("Noise"));
}

#[test]
fn editing_an_unknown_category_is_not_found() {
    let db = init_test_db();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/categories?edit=42")
        .body(Body::empty())
        .unwrap();

    match handle(req, &db) {
        Err(ServerError::NotFound) => {}
        Err(other) => panic!("expected NotFound, got: {other:?}"),
        Ok(resp) => panic!("expected NotFound, got a {} response", resp.status()),
    }
}
