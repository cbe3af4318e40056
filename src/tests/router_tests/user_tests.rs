use crate::db::users;
use crate::tests::utils::{get_body, init_test_db, location, post_form, seed_plain_user};

#[test]
fn managing_accounts_requires_the_admin_role() {
    let db = init_test_db();

    let resp = post_form(
        &db,
        "/users",
        &[
            ("name", "Marta Ibarra"),
            ("email", "marta@example.org"),
            ("role", "user"),
            ("password", "correcthorse"),
            ("acting_user_id", "2"),
        ],
    );
    let target = location(&resp);
    assert!(target.contains("Only+an+administrator+can+manage+accounts"));
    assert!(target.contains("tone=error"));
    assert!(!get_body(&db, "/users").contains("Marta Ibarra"));

    // The schema seeds two accounts, so the new one lands at id 3.
    let resp = post_form(
        &db,
        "/users",
        &[
            ("name", "Marta Ibarra"),
            ("email", "marta@example.org"),
            ("phone", "555-0199"),
            ("role", "user"),
            ("password", "correcthorse"),
            ("acting_user_id", "1"),
        ],
    );
    assert_eq!(
        location(&resp),
        "/users?message=Account+%233+created&tone=success"
    );

    let body = get_body(&db, "/users");
    assert!(body.contains("Marta Ibarra"));
    assert!(body.contains("marta@example.org"));
    assert!(body.contains("555-0199"));
}

#[test]
fn a_taken_email_is_flashed_back() {
    let db = init_test_db();

    let resp = post_form(
        &db,
        "/users",
        &[
            ("name", "Second Luis"),
            ("email", "luis.herrera@ambitrack.gob"),
            ("role", "user"),
            ("password", "correcthorse"),
            ("acting_user_id", "1"),
        ],
    );

    assert_eq!(
        location(&resp),
        "/users?message=That+email+address+is+already+registered&tone=error"
    );
    assert!(!get_body(&db, "/users").contains("Second Luis"));

    // Failing while editing keeps the form open on that account.
    let resp = post_form(
        &db,
        "/users/2",
        &[
            ("name", "Luis Herrera"),
            ("email", "ana.morales@ambitrack.gob"),
            ("role", "moderator"),
            ("active", "1"),
            ("acting_user_id", "1"),
        ],
    );
    assert_eq!(
        location(&resp),
        "/users?edit=2&message=That+email+address+is+already+registered&tone=error"
    );
}

#[test]
fn deactivating_keeps_the_account_listed() {
    let db = init_test_db();

    // Moderators cannot switch accounts off.
    let resp = post_form(&db, "/users/2/deactivate", &[("acting_user_id", "2")]);
    let target = location(&resp);
    assert!(target.contains("Only+an+administrator+can+deactivate+accounts"));
    assert!(target.contains("tone=error"));

    let resp = post_form(&db, "/users/2/deactivate", &[("acting_user_id", "1")]);
    assert_eq!(
        location(&resp),
        "/users?message=Account+deactivated&tone=success"
    );

    let body = get_body(&db, "/users");
    assert!(body.contains("Luis Herrera"));
    assert!(body.contains("(inactive)"));
}

#[test]
fn an_account_holder_may_set_their_own_password() {
    let db = init_test_db();
    let holder = seed_plain_user(&db, "Rosa Quispe", "rosa@example.org");
    let holder_id = holder.to_string();

    let resp = post_form(
        &db,
        &format!("/users/{holder}/password"),
        &[("password", "mountain-path"), ("acting_user_id", &holder_id)],
    );

    assert_eq!(
        location(&resp),
        "/users?message=Password+updated&tone=success"
    );

    let fresh = db
        .with_conn(|conn| users::check_password(conn, holder, "mountain-path"))
        .unwrap();
    let stale = db
        .with_conn(|conn| users::check_password(conn, holder, "hunter2"))
        .unwrap();
    assert!(fresh);
    assert!(!stale);
}

#[test]
fn setting_another_accounts_password_needs_the_admin_role() {
    let db = init_test_db();
    let outsider = seed_plain_user(&db, "Rosa Quispe", "rosa@example.org");
    let outsider_id = outsider.to_string();

    let resp = post_form(
        &db,
        "/users/2/password",
        &[("password", "stolen"), ("acting_user_id", &outsider_id)],
    );
    let target = location(&resp);
    assert!(target.contains("Only+the+account+holder+or+an+administrator+can+set+a+password"));
    assert!(target.contains("tone=error"));

    // An administrator resets it for them.
    let resp = post_form(
        &db,
        "/users/2/password",
        &[("password", "issued-by-ana"), ("acting_user_id", "1")],
    );
    assert_eq!(
        location(&resp),
        "/users?message=Password+updated&tone=success"
    );

    let works = db
        .with_conn(|conn| users::check_password(conn, 2, "issued-by-ana"))
        .unwrap();
    assert!(works);
}
