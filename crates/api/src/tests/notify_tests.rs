// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{has_button, test_now, texts_for, TestApp};
use crate::notify::upcoming_birthday_notifications;
use time::{Date, Month};

fn today() -> Date {
    test_now().date()
}

#[test]
fn no_matching_birthdays_produces_no_messages() {
    let mut app = TestApp::new();
    app.seed_person_with_birthday(1, Month::June, 1);
    app.seed_person_with_birthday(2, Month::July, 2);

    let messages =
        upcoming_birthday_notifications(&mut app.persistence, today(), 7).expect("built");
    assert!(messages.is_empty());
}

#[test]
fn week_lead_notifies_everyone_but_the_honoree() {
    let mut app = TestApp::new();
    // Today is March 10; March 17 is the 7-day target.
    app.seed_person_with_birthday(1, Month::March, 17);
    app.seed_person_with_birthday(2, Month::June, 1);
    app.seed_person_with_birthday(3, Month::July, 2);

    let messages =
        upcoming_birthday_notifications(&mut app.persistence, today(), 7).expect("built");

    assert_eq!(messages.len(), 2);
    let recipients: Vec<i64> = messages.iter().map(|m| m.recipient).collect();
    assert!(recipients.contains(&2));
    assert!(recipients.contains(&3));
    assert!(!recipients.contains(&1));

    for message in &messages {
        assert!(message.text.contains("in a week"));
        assert!(message.text.contains("17.03"));
        assert!(message.text.contains("Family1 Given1 Patron1"));
        assert!(message.text.contains("Join in on the gift"));
        assert!(has_button(
            std::slice::from_ref(message),
            message.recipient,
            "birthday_gift:1"
        ));
    }
}

#[test]
fn day_lead_suppresses_the_call_to_action_for_contributors() {
    let mut app = TestApp::new();
    // March 11 is the 1-day target.
    app.seed_person_with_birthday(1, Month::March, 11);
    app.seed_person_with_birthday(2, Month::June, 1);
    app.seed_person_with_birthday(3, Month::July, 2);

    // Person 2 already chipped in for the honoree.
    app.persistence
        .record_transfer(2, 1, test_now())
        .expect("recorded");

    let messages =
        upcoming_birthday_notifications(&mut app.persistence, today(), 1).expect("built");
    assert_eq!(messages.len(), 2);

    let contributor = texts_for(&messages, 2);
    assert!(contributor.contains("tomorrow"));
    assert!(!contributor.contains("Join in on the gift"));
    assert!(!has_button(&messages, 2, "birthday_gift:1"));

    let other = texts_for(&messages, 3);
    assert!(other.contains("Join in on the gift"));
    assert!(has_button(&messages, 3, "birthday_gift:1"));
}

#[test]
fn multiple_honorees_fan_out_independently() {
    let mut app = TestApp::new();
    app.seed_person_with_birthday(1, Month::March, 17);
    app.seed_person_with_birthday(2, Month::March, 17);
    app.seed_person_with_birthday(3, Month::June, 1);

    let messages =
        upcoming_birthday_notifications(&mut app.persistence, today(), 7).expect("built");

    // Honoree 1: recipients 2, 3. Honoree 2: recipients 1, 3.
    assert_eq!(messages.len(), 4);
    assert!(has_button(&messages, 3, "birthday_gift:1"));
    assert!(has_button(&messages, 3, "birthday_gift:2"));
    assert!(has_button(&messages, 2, "birthday_gift:1"));
    assert!(has_button(&messages, 1, "birthday_gift:2"));
}

#[test]
fn empty_store_produces_no_messages() {
    let mut app = TestApp::new();
    let messages =
        upcoming_birthday_notifications(&mut app.persistence, today(), 1).expect("built");
    assert!(messages.is_empty());
}
