use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{init_test_db, seed_complaint};
use astra::Body;
use http::{Method, Request};
use std::io::Read;

#[test]
fn dashboard_loads_with_an_empty_database() {
    let db = init_test_db();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &db).expect("Handler failed");

    assert_eq!(resp.status(), 200);

    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();

    assert!(body.contains("Dashboard"));
    assert!(body.contains("0") && body.contains("complaints on file"));
    assert!(body.contains("Nothing reported yet."));
}

#[test]
fn dashboard_counts_and_lists_recent_complaints() {
    let db = init_test_db();
    seed_complaint(&db, "Oily runoff by the mill", 2);
    seed_complaint(&db, "Smoke from the tannery", 2);

    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &db).expect("Handler failed");

    assert_eq!(resp.status(), 200);

    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();

    assert!(body.contains("2") && body.contains("complaints on file"));
    assert!(body.contains("Oily runoff by the mill"));
    assert!(body.contains("Smoke from the tannery"));
    assert!(body.contains("Luis Herrera"));
}

#[test]
fn unknown_route_is_not_found() {
    let db = init_test_db();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/no/such/page")
        .body(Body::empty())
        .unwrap();

    match handle(req, &db) {
        Err(ServerError::NotFound) => {}
        Err(other) => panic!("expected NotFound, got: {other:?}"),
        Ok(resp) => panic!("expected NotFound, got a {} response", resp.status()),
    }
}

#[test]
fn geocode_without_parameters_is_a_bad_request() {
    let db = init_test_db();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/geocode")
        .body(Body::empty())
        .unwrap();

    match handle(req, &db) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("lat")),
        Err(other) => panic!("expected BadRequest, got: {other:?}"),
        Ok(resp) => panic!("expected BadRequest, got a {} response", resp.status()),
    }
}

#[test]
fn geocode_rejects_unparseable_coordinates() {
    let db = init_test_db();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/geocode?lat=abc&lon=1.5")
        .body(Body::empty())
        .unwrap();

    match handle(req, &db) {
        Err(ServerError::BadRequest(msg)) => assert!(msg.contains("latitude")),
        Err(other) => panic!("expected BadRequest, got: {other:?}"),
        Ok(resp) => panic!("expected BadRequest, got a {} response", resp.status()),
    }
}
