// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{texts_for, TestApp};
use crate::auth::{
    require_active_collector, require_admin, require_service_user, resolve_context,
};
use crate::error::AuthError;

#[test]
fn context_resolution_distinguishes_registration() {
    let mut app = TestApp::new();
    app.seed_person(1);

    let registered = resolve_context(&mut app.persistence, 1).expect("resolved");
    assert!(registered.is_registered());
    assert!(!registered.is_admin);

    let unregistered = resolve_context(&mut app.persistence, 2).expect("resolved");
    assert!(!unregistered.is_registered());
    assert_eq!(unregistered.person, None);
}

#[test]
fn context_carries_role_flags_and_collector_records() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.seed_person(2);
    app.seed_admin(1);
    app.seed_active_collector(2);
    app.persistence.set_service_user(1).expect("service set");

    let ctx = resolve_context(&mut app.persistence, 1).expect("resolved");
    assert!(ctx.is_admin);
    assert!(ctx.is_service_user);
    assert_eq!(ctx.collector, None);
    assert_eq!(
        ctx.active_collector.as_ref().map(|c| c.person_id),
        Some(2)
    );

    let collector_ctx = resolve_context(&mut app.persistence, 2).expect("resolved");
    assert!(!collector_ctx.is_admin);
    assert!(collector_ctx.collector.as_ref().is_some_and(|c| c.is_active));
}

#[test]
fn gates_reject_missing_roles() {
    let mut app = TestApp::new();
    app.seed_person(1);

    let ctx = resolve_context(&mut app.persistence, 1).expect("resolved");
    assert_eq!(require_admin(&ctx), Err(AuthError::AdminRequired));
    assert_eq!(
        require_service_user(&ctx),
        Err(AuthError::ServiceUserRequired)
    );
    assert_eq!(
        require_active_collector(&ctx),
        Err(AuthError::ActiveCollectorRequired)
    );
}

#[test]
fn inactive_collector_fails_the_active_gate() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.persistence
        .create_collector(1, "+79990001122", None)
        .expect("created");

    let ctx = resolve_context(&mut app.persistence, 1).expect("resolved");
    assert_eq!(
        require_active_collector(&ctx),
        Err(AuthError::ActiveCollectorRequired)
    );
}

#[test]
fn admin_panel_is_denied_without_the_role() {
    let mut app = TestApp::new();
    app.seed_person(1);

    let messages = app.message(1, "Admin panel");
    assert!(texts_for(&messages, 1).contains("admin rights"));
}

#[test]
fn admin_list_is_denied_without_service_role() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.seed_admin(1);

    let messages = app.message(1, "/admin_list");
    assert!(texts_for(&messages, 1).contains("service-user rights"));
}

#[test]
fn admin_phrase_grants_the_role() {
    let mut app = TestApp::new();
    app.seed_person(1);

    let messages = app.message(1, "/get_admin");
    assert!(texts_for(&messages, 1).contains("secret phrase"));

    // A wrong phrase re-prompts and keeps waiting.
    let messages = app.message(1, "guess");
    assert!(texts_for(&messages, 1).contains("Wrong phrase"));

    let messages = app.message(1, "open sesame");
    assert!(texts_for(&messages, 1).contains("Rights granted"));
    assert!(app.persistence.is_admin(1).expect("query ok"));

    // Redeeming again reports the existing grant.
    app.message(1, "/get_admin");
    let messages = app.message(1, "open sesame");
    assert!(texts_for(&messages, 1).contains("already have admin rights"));
}

#[test]
fn service_phrase_designates_the_service_user() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.seed_person(2);

    app.message(1, "/get_service_user");
    let messages = app.message(1, "mellon");
    assert!(texts_for(&messages, 1).contains("Rights granted"));
    assert_eq!(app.persistence.service_user_id().expect("query ok"), Some(1));

    // The designation is a singleton: redeeming from someone else moves it.
    app.message(2, "/get_service_user");
    app.message(2, "mellon");
    assert_eq!(app.persistence.service_user_id().expect("query ok"), Some(2));
}

#[test]
fn unknown_callback_is_answered_gracefully() {
    let mut app = TestApp::new();
    app.seed_person(1);

    let messages = app.callback(1, "no_such_action");
    assert!(texts_for(&messages, 1).contains("no longer available"));
}
