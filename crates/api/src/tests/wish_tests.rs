// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{has_button, register, texts_for, TestApp};

#[test]
fn add_wish_with_url() {
    let mut app = TestApp::new();
    register(&mut app, 1);

    let messages = app.message(1, "Add wish");
    assert!(texts_for(&messages, 1).contains("Describe your wish"));

    let messages = app.message(1, "A mechanical keyboard");
    assert!(has_button(&messages, 1, "url_no"));

    let messages = app.message(1, "https://shop.example.com/kb");
    assert!(texts_for(&messages, 1).contains("Check your wish"));

    let messages = app.callback(1, "confirm_yes");
    assert!(texts_for(&messages, 1).contains("Wish saved"));

    let wishes = app.persistence.wishes_for_person(1).expect("loaded");
    assert_eq!(wishes.len(), 1);
    assert_eq!(
        wishes[0].wish_url.as_deref(),
        Some("https://shop.example.com/kb")
    );
}

#[test]
fn add_wish_skipping_the_url() {
    let mut app = TestApp::new();
    register(&mut app, 1);

    app.message(1, "Add wish");
    app.message(1, "A new bicycle");
    let messages = app.callback(1, "url_no");
    assert!(texts_for(&messages, 1).contains("Check your wish"));
    app.callback(1, "confirm_yes");

    let wishes = app.persistence.wishes_for_person(1).expect("loaded");
    assert_eq!(wishes[0].wish_url, None);
}

#[test]
fn short_wish_text_reprompts() {
    let mut app = TestApp::new();
    register(&mut app, 1);

    app.message(1, "Add wish");
    let messages = app.message(1, "ab");
    assert!(texts_for(&messages, 1).contains("at least 3 characters"));

    // The step is still waiting for wish text.
    let messages = app.message(1, "A new bicycle");
    assert!(has_button(&messages, 1, "url_no"));
}

#[test]
fn invalid_url_reprompts() {
    let mut app = TestApp::new();
    register(&mut app, 1);

    app.message(1, "Add wish");
    app.message(1, "A new bicycle");
    let messages = app.message(1, "example.com");
    assert!(texts_for(&messages, 1).contains("http"));
}

#[test]
fn wish_list_selection_and_edit() {
    let mut app = TestApp::new();
    register(&mut app, 1);
    let wish_id = app
        .persistence
        .add_wish(1, "A new bicycle", None)
        .expect("added");

    let messages = app.message(1, "My wishes");
    assert!(texts_for(&messages, 1).contains("1. A new bicycle"));
    assert!(has_button(&messages, 1, "edit_wishlist"));

    let messages = app.callback(1, "edit_wishlist");
    assert!(has_button(&messages, 1, &format!("select_wish:{wish_id}")));

    app.callback(1, &format!("select_wish:{wish_id}"));
    let messages = app.callback(1, "edit_wish");
    assert!(texts_for(&messages, 1).contains("Choose what to change"));

    app.callback(1, "edit_wish_text");
    let messages = app.message(1, "A red bicycle");
    assert!(texts_for(&messages, 1).contains("Check your wish"));
    app.callback(1, "confirm_yes");

    let stored = app.persistence.get_wish(wish_id).expect("found");
    assert_eq!(stored.wish_text, "A red bicycle");
}

#[test]
fn wish_deletion_goes_through_selection() {
    let mut app = TestApp::new();
    register(&mut app, 1);
    let wish_id = app
        .persistence
        .add_wish(1, "A new bicycle", None)
        .expect("added");

    app.message(1, "My wishes");
    app.callback(1, "edit_wishlist");
    app.callback(1, &format!("select_wish:{wish_id}"));
    let messages = app.callback(1, "delete_wish");
    assert!(texts_for(&messages, 1).contains("Wish deleted"));
    assert!(app.persistence.wishes_for_person(1).expect("loaded").is_empty());
}

#[test]
fn selection_without_a_cached_list_reports_expiry() {
    let mut app = TestApp::new();
    register(&mut app, 1);

    let messages = app.callback(1, "edit_wishlist");
    assert!(texts_for(&messages, 1).contains("expired"));
}

#[test]
fn empty_wish_list_is_reported() {
    let mut app = TestApp::new();
    register(&mut app, 1);

    let messages = app.message(1, "My wishes");
    assert!(texts_for(&messages, 1).contains("empty"));
}
