use crate::db::attachments;
use crate::db::Database;
use crate::errors::ServerError;
use crate::router::{handle, UPLOAD_DIR};
use crate::tests::utils::{get_body, init_test_db, location, post_form, seed_complaint, seed_plain_user};
use astra::{Body, Response};
use http::{Method, Request};
use std::fs;
use std::io::Read;

/// Posts raw file bytes the way the page script does.
fn upload(db: &Database, uri: &str, content_type: &str, data: &[u8]) -> Response {
    fs::create_dir_all(UPLOAD_DIR).expect("Could not create the upload directory");

    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", content_type)
        .body(Body::from(data.to_vec()))
        .unwrap();

    handle(req, db).expect("Handler failed")
}

fn stored_path(db: &Database, id: i64) -> String {
    db.with_conn(|conn| attachments::get_attachment(conn, id))
        .expect("Failed to load attachment")
        .expect("attachment row missing")
        .stored_path
}

#[test]
fn uploading_a_file_stores_and_serves_it() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Burned patch in the reserve", 2);
    let bytes = b"pretend png bytes";

    let resp = upload(
        &db,
        &format!("/complaints/{id}/attachments?filename=site-photo.png&acting_user_id=2"),
        "image/png",
        bytes,
    );

    assert_eq!(resp.status(), 302);
    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/attachments?message=Uploaded+site-photo.png&tone=success")
    );

    let body = get_body(&db, &format!("/complaints/{id}/attachments"));
    assert!(body.contains("site-photo.png"));
    assert!(body.contains("image/png"));

    // The stored copy comes back byte for byte under its original name.
    let req = Request::builder()
        .method(Method::GET)
        .uri("/attachments/1")
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &db).expect("Handler failed");

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "image/png"
    );
    assert!(resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("site-photo.png"));

    let mut served = Vec::new();
    resp.into_body().reader().read_to_end(&mut served).unwrap();
    assert_eq!(served, bytes);

    fs::remove_file(stored_path(&db, 1)).ok();
}

#[test]
fn deleting_a_file_unlinks_it_from_disk() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Burned patch in the reserve", 2);
    let outsider = seed_plain_user(&db, "Rosa Quispe", "rosa@example.org");
    let outsider_id = outsider.to_string();

    upload(
        &db,
        &format!("/complaints/{id}/attachments?filename=site-photo.png&acting_user_id=2"),
        "image/png",
        b"pretend png bytes",
    );
    let path = stored_path(&db, 1);
    assert!(fs::metadata(&path).is_ok(), "upload should land on disk");

    // Someone else's file stays put.
    let resp = post_form(&db, "/attachments/1/delete", &[("acting_user_id", &outsider_id)]);
    let target = location(&resp);
    assert!(target.contains("Only+the+reporter+or+an+administrator+can+remove+files"));
    assert!(target.contains("tone=error"));
    assert!(fs::metadata(&path).is_ok());

    // The reporter may remove it, row and file both.
    let resp = post_form(&db, "/attachments/1/delete", &[("acting_user_id", "2")]);
    assert_eq!(
        location(&resp),
        format!("/complaints/{id}/attachments?message=Removed+site-photo.png&tone=success")
    );
    assert!(fs::metadata(&path).is_err(), "delete should unlink the file");
    assert!(get_body(&db, &format!("/complaints/{id}/attachments")).contains("Nothing attached yet."));
}

#[test]
fn an_upload_with_an_unlisted_type_is_rejected() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Burned patch in the reserve", 2);

    let resp = upload(
        &db,
        &format!("/complaints/{id}/attachments?filename=payload.html&acting_user_id=2"),
        "text/html",
        b"<script>alert(1)</script>",
    );

    let target = location(&resp);
    assert!(target.contains("Only+images%2C+PDF+and+Office+documents+are+accepted"));
    assert!(target.contains("tone=error"));
    assert!(get_body(&db, &format!("/complaints/{id}/attachments")).contains("Nothing attached yet."));
}

#[test]
fn an_upload_without_a_filename_is_rejected() {
    let db = init_test_db();
    let id = seed_complaint(&db, "Burned patch in the reserve", 2);

    let resp = upload(
        &db,
        &format!("/complaints/{id}/attachments?acting_user_id=2"),
        "image/png",
        b"pretend png bytes",
    );

    let target = location(&resp);
    assert!(target.contains("The+upload+is+missing+its+filename"));
    assert!(target.contains("tone=error"));
}

#[test]
fn downloading_a_missing_attachment_is_not_found() {
    let db = init_test_db();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/attachments/9")
        .body(Body::empty())
        .unwrap();

    match handle(req, &db) {
        Err(ServerError::NotFound) => {}
        Err(other) => panic!("expected NotFound, got: {other:?}"),
        Ok(resp) => panic!("expected NotFound, got a {} response", resp.status()),
    }
}
