// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_persistence, register_persons};
use crate::{Persistence, PersistenceError};

#[test]
fn add_and_list_preserves_insertion_order() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 1);

    let first = persistence
        .add_wish(1, "a new bicycle", None)
        .expect("added");
    let second = persistence
        .add_wish(1, "a mechanical keyboard", Some("https://shop.example.com/kb"))
        .expect("added");
    assert!(second > first);

    let wishes = persistence.wishes_for_person(1).expect("loaded");
    assert_eq!(wishes.len(), 2);
    assert_eq!(wishes[0].wish_text, "a new bicycle");
    assert_eq!(
        wishes[1].wish_url.as_deref(),
        Some("https://shop.example.com/kb")
    );
}

#[test]
fn wish_for_missing_owner_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    assert_eq!(
        persistence
            .add_wish(7, "a new bicycle", None)
            .expect_err("no owner"),
        PersistenceError::PersonNotFound(7)
    );
}

#[test]
fn update_requires_ownership() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 2);
    let wish_id = persistence
        .add_wish(1, "a new bicycle", None)
        .expect("added");

    // The owner may edit.
    persistence
        .update_wish(wish_id, 1, "a red bicycle", None)
        .expect("updated");
    assert_eq!(
        persistence.get_wish(wish_id).expect("found").wish_text,
        "a red bicycle"
    );

    // Anyone else gets not-found, not someone else's record.
    assert_eq!(
        persistence
            .update_wish(wish_id, 2, "mine now", None)
            .expect_err("foreign owner"),
        PersistenceError::WishNotFound { wish_id }
    );
}

#[test]
fn delete_requires_ownership() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 2);
    let wish_id = persistence
        .add_wish(1, "a new bicycle", None)
        .expect("added");

    assert_eq!(
        persistence
            .delete_wish(wish_id, 2)
            .expect_err("foreign owner"),
        PersistenceError::WishNotFound { wish_id }
    );

    persistence.delete_wish(wish_id, 1).expect("deleted");
    assert!(persistence.wishes_for_person(1).expect("loaded").is_empty());
}

#[test]
fn update_can_clear_the_url() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 1);
    let wish_id = persistence
        .add_wish(1, "a new bicycle", Some("https://shop.example.com/bike"))
        .expect("added");

    persistence
        .update_wish(wish_id, 1, "a new bicycle", None)
        .expect("updated");
    assert_eq!(persistence.get_wish(wish_id).expect("found").wish_url, None);
}
