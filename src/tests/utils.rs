use crate::db::complaints::{self, NewComplaint};
use crate::db::connection::{init_db, Database};
use crate::db::users;
use crate::domain::options::{Privacy, Role};
use crate::router::handle;
use astra::{Body, Response};
use chrono::Utc;
use http::{Method, Request};
use std::io::Read;
use url::form_urlencoded;

/// A fresh database on the calling thread, using the production schema.
/// `:memory:` keeps every test thread fully isolated.
pub fn init_test_db() -> Database {
    let db = Database::new(":memory:");

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

/// Urlencode form fields for a POST body.
pub fn form_body(fields: &[(&str, &str)]) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for (name, value) in fields {
        ser.append_pair(name, value);
    }
    ser.finish()
}

/// Insert a complaint directly and return its id. The schema seeds
/// user 1 (admin), user 2 (moderator) and categories 1-5.
pub fn seed_complaint(db: &Database, title: &str, user_id: i64) -> i64 {
    db.with_conn(|conn| {
        complaints::insert_complaint(
            conn,
            &NewComplaint {
                title: title.to_string(),
                description: "Seeded directly by a test".to_string(),
                user_id,
                category_id: 1,
                address: None,
                latitude: None,
                longitude: None,
                privacy: Privacy::Public,
            },
            Utc::now().naive_utc(),
        )
    })
    .expect("Failed to seed complaint")
}

/// An account with the plain `user` role, which the schema does not seed.
pub fn seed_plain_user(db: &Database, name: &str, email: &str) -> i64 {
    db.with_conn(|conn| users::insert_user(conn, name, email, None, "hunter2", Role::User))
        .expect("Failed to seed user")
}

/// GET a page and return its HTML, asserting a 200.
pub fn get_body(db: &Database, uri: &str) -> String {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, db).expect("Handler failed");
    assert_eq!(resp.status(), 200, "GET {uri} should render");

    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

/// POST a urlencoded form the way the admin pages submit them.
pub fn post_form(db: &Database, uri: &str, fields: &[(&str, &str)]) -> Response {
    let data = form_body(fields);

    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(data.as_bytes().to_vec()))
        .unwrap();

    handle(req, db).expect("Handler failed")
}

/// The Location header of a redirect, including any flash parameters.
pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}
