// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gift_fund_domain::Person;
use gift_fund_persistence::Persistence;
use time::macros::datetime;
use time::{Date, Month, OffsetDateTime};

use crate::handlers::{dispatch, Secrets};
use crate::request_response::{InboundEvent, OutboundMessage};
use crate::sessions::SessionStore;

/// The fixed "now" used by every dispatch test: March 10, 2026.
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-10 12:00:00 UTC)
}

/// A full application state for dispatch tests.
pub struct TestApp {
    pub persistence: Persistence,
    pub sessions: SessionStore,
    pub secrets: Secrets,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            persistence: Persistence::new_in_memory().expect("in-memory database"),
            sessions: SessionStore::new(),
            secrets: Secrets {
                admin_phrase: String::from("open sesame"),
                service_phrase: String::from("mellon"),
            },
        }
    }

    /// Dispatches a free-text or command message.
    pub fn message(&mut self, identity: i64, text: &str) -> Vec<OutboundMessage> {
        let event = InboundEvent::message(identity, text);
        dispatch(
            &mut self.persistence,
            &mut self.sessions,
            &self.secrets,
            &event,
            test_now(),
        )
    }

    /// Dispatches a button-press callback.
    pub fn callback(&mut self, identity: i64, data: &str) -> Vec<OutboundMessage> {
        let event = InboundEvent::callback(identity, data);
        dispatch(
            &mut self.persistence,
            &mut self.sessions,
            &self.secrets,
            &event,
            test_now(),
        )
    }

    /// Seeds a registered person directly, bypassing the workflow.
    pub fn seed_person(&mut self, person_id: i64) {
        self.seed_person_with_birthday(person_id, Month::January, 1);
    }

    pub fn seed_person_with_birthday(&mut self, person_id: i64, month: Month, day: u8) {
        let person = Person::new(
            person_id,
            Some(format!("user{person_id}")),
            format!("Family{person_id}"),
            format!("Given{person_id}"),
            format!("Patron{person_id}"),
            Date::from_calendar_date(2000, month, day).expect("valid test date"),
        );
        self.persistence.add_person(&person).expect("person seeded");
    }

    /// Makes a seeded person an admin.
    pub fn seed_admin(&mut self, person_id: i64) {
        self.persistence
            .add_admin_grant(person_id)
            .expect("admin granted");
    }

    /// Creates and activates a collector record for a seeded person.
    pub fn seed_active_collector(&mut self, person_id: i64) {
        self.persistence
            .create_collector(person_id, "+79990001122", Some("Sber"))
            .expect("collector created");
        self.persistence
            .set_active_collector(person_id)
            .expect("collector activated");
    }
}

/// All outbound texts addressed to one recipient, joined for matching.
pub fn texts_for(messages: &[OutboundMessage], recipient: i64) -> String {
    messages
        .iter()
        .filter(|m| m.recipient == recipient)
        .map(|m| m.text.clone())
        .collect::<Vec<String>>()
        .join("\n---\n")
}

/// Whether any message to `recipient` carries the given action payload.
pub fn has_button(messages: &[OutboundMessage], recipient: i64, action: &str) -> bool {
    messages
        .iter()
        .filter(|m| m.recipient == recipient)
        .any(|m| m.buttons.iter().any(|b| b.action == action))
}

/// Drives a complete fresh registration for the identity.
pub fn register(app: &mut TestApp, identity: i64) {
    app.callback(identity, "register");
    app.message(identity, "Иванов");
    app.message(identity, "Иван");
    app.message(identity, "Иваныч");
    app.message(identity, "01.01.2000");
    let messages = app.callback(identity, "confirm_yes");
    assert!(
        texts_for(&messages, identity).contains("Data saved"),
        "registration should commit: {messages:?}"
    );
}
