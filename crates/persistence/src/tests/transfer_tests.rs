// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_test_persistence, person_with_birthday, register_persons, test_timestamp,
};
use crate::{Persistence, PersistenceError, TransferOutcome};
use time::{Date, Month};

#[test]
fn recording_twice_stores_exactly_one_row() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 2);

    assert_eq!(
        persistence
            .record_transfer(2, 1, test_timestamp())
            .expect("first"),
        TransferOutcome::Recorded
    );
    assert_eq!(
        persistence
            .record_transfer(2, 1, test_timestamp())
            .expect("second"),
        TransferOutcome::AlreadyRecorded
    );

    assert_eq!(
        persistence.transfers_for_honoree(1).expect("loaded").len(),
        1
    );
}

#[test]
fn idempotence_is_per_pair_not_per_sender() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 3);

    assert_eq!(
        persistence
            .record_transfer(2, 1, test_timestamp())
            .expect("recorded"),
        TransferOutcome::Recorded
    );
    // Same sender, different honoree: a separate pair.
    assert_eq!(
        persistence
            .record_transfer(2, 3, test_timestamp())
            .expect("recorded"),
        TransferOutcome::Recorded
    );
    // Different sender, same honoree: also a separate pair.
    assert_eq!(
        persistence
            .record_transfer(3, 1, test_timestamp())
            .expect("recorded"),
        TransferOutcome::Recorded
    );
}

#[test]
fn recording_requires_both_persons() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 1);

    assert_eq!(
        persistence
            .record_transfer(1, 99, test_timestamp())
            .expect_err("missing honoree"),
        PersistenceError::PersonNotFound(99)
    );
    assert_eq!(
        persistence
            .record_transfer(99, 1, test_timestamp())
            .expect_err("missing sender"),
        PersistenceError::PersonNotFound(99)
    );
}

#[test]
fn sender_ids_reflect_the_ledger() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 3);
    persistence
        .record_transfer(2, 1, test_timestamp())
        .expect("recorded");
    persistence
        .record_transfer(3, 1, test_timestamp())
        .expect("recorded");

    let mut senders = persistence.sender_ids_for_honoree(1).expect("loaded");
    senders.sort_unstable();
    assert_eq!(senders, vec![2, 3]);
}

#[test]
fn purge_is_calendar_relative() {
    let mut persistence: Persistence = create_test_persistence();

    // Honorees: early January (past), late December (not past), mid March
    // (upcoming). A fourth person acts as the sender.
    persistence
        .add_person(&person_with_birthday(1, Month::January, 5))
        .expect("added");
    persistence
        .add_person(&person_with_birthday(2, Month::December, 25))
        .expect("added");
    persistence
        .add_person(&person_with_birthday(3, Month::March, 15))
        .expect("added");
    persistence
        .add_person(&person_with_birthday(4, Month::July, 1))
        .expect("added");

    for honoree in [1, 2, 3] {
        persistence
            .record_transfer(4, honoree, test_timestamp())
            .expect("recorded");
    }

    let today: Date = Date::from_calendar_date(2026, Month::March, 10).expect("valid date");
    // Only the January honoree is calendar-past on March 10.
    let deleted = persistence.purge_past_transfers(today).expect("purged");
    assert_eq!(deleted, 1);

    assert!(persistence
        .transfers_for_honoree(1)
        .expect("loaded")
        .is_empty());
    assert_eq!(
        persistence.transfers_for_honoree(2).expect("loaded").len(),
        1
    );
    assert_eq!(
        persistence.transfers_for_honoree(3).expect("loaded").len(),
        1
    );
}

#[test]
fn purge_with_no_past_birthdays_deletes_nothing() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .add_person(&person_with_birthday(1, Month::December, 25))
        .expect("added");
    persistence
        .add_person(&person_with_birthday(2, Month::November, 1))
        .expect("added");
    persistence
        .record_transfer(2, 1, test_timestamp())
        .expect("recorded");

    let today: Date = Date::from_calendar_date(2026, Month::March, 10).expect("valid date");
    assert_eq!(persistence.purge_past_transfers(today).expect("purged"), 0);
}

#[test]
fn full_ledger_groups_by_honoree() {
    let mut persistence: Persistence = create_test_persistence();
    register_persons(&mut persistence, 4);

    persistence
        .record_transfer(3, 2, test_timestamp())
        .expect("recorded");
    persistence
        .record_transfer(4, 1, test_timestamp())
        .expect("recorded");
    persistence
        .record_transfer(3, 1, test_timestamp())
        .expect("recorded");

    let ledger = persistence.all_transfers().expect("loaded");
    let honorees: Vec<i64> = ledger.iter().map(|t| t.honoree_id).collect();
    assert_eq!(honorees, vec![1, 1, 2]);
}
