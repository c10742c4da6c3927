// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{has_button, texts_for, TestApp};

#[test]
fn panel_requires_a_collector_record() {
    let mut app = TestApp::new();
    app.seed_person(1);

    let messages = app.message(1, "Collector panel");
    assert!(texts_for(&messages, 1).contains("do not have access"));
}

#[test]
fn panel_shows_status_and_routing_data() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.seed_active_collector(1);

    let messages = app.message(1, "Collector panel");
    let text = texts_for(&messages, 1);
    assert!(text.contains("+79990001122"));
    assert!(text.contains("Sber"));
    assert!(text.contains("Active"));
    assert!(has_button(&messages, 1, "update_collector_data"));
    assert!(has_button(&messages, 1, "view_transfers"));
}

#[test]
fn invitation_flow_registers_and_activates_the_collector() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.seed_person(2);
    app.seed_admin(1);

    // The admin assigns person 2, who has no record yet: person 2 gets an
    // invitation, the admin a pending notice.
    let messages = app.callback(1, "confirm_set_collector:2");
    assert!(has_button(&messages, 2, "create_collector_data"));
    assert!(texts_for(&messages, 1).contains("asked to register"));
    assert_eq!(app.persistence.active_collector().expect("query ok"), None);

    // Person 2 completes the collector registration flow.
    let messages = app.callback(2, "create_collector_data");
    assert!(texts_for(&messages, 2).contains("phone number"));

    app.message(2, "+7 999 000-11-22");
    let messages = app.message(2, "Sber");
    assert!(texts_for(&messages, 2).contains("Check your transfer details"));

    let messages = app.callback(2, "confirm_yes");
    assert!(texts_for(&messages, 2).contains("Transfer details saved"));

    // A freshly invited collector becomes active right away.
    let active = app
        .persistence
        .active_collector()
        .expect("query ok")
        .expect("someone active");
    assert_eq!(active.person_id, 2);
}

#[test]
fn collector_flow_can_skip_the_bank() {
    let mut app = TestApp::new();
    app.seed_person(1);

    app.callback(1, "create_collector_data");
    app.message(1, "89990001122");
    let messages = app.callback(1, "skip_bank");
    assert!(texts_for(&messages, 1).contains("not specified"));
    app.callback(1, "confirm_yes");

    let record = app
        .persistence
        .find_collector(1)
        .expect("query ok")
        .expect("record exists");
    assert_eq!(record.bank_name, None);
}

#[test]
fn invalid_phone_reprompts() {
    let mut app = TestApp::new();
    app.seed_person(1);

    app.callback(1, "create_collector_data");
    let messages = app.message(1, "12345");
    assert!(texts_for(&messages, 1).contains("phone number format"));

    // The step is still waiting.
    let messages = app.message(1, "+79990001122");
    assert!(texts_for(&messages, 1).contains("bank"));
}

#[test]
fn update_flow_edits_one_field() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.seed_active_collector(1);

    let messages = app.callback(1, "update_collector_data");
    assert!(texts_for(&messages, 1).contains("Choose what to change"));

    app.callback(1, "edit_bank_name");
    let messages = app.message(1, "Tinkoff");
    assert!(texts_for(&messages, 1).contains("Check your transfer details"));
    app.callback(1, "confirm_yes");

    let record = app
        .persistence
        .find_collector(1)
        .expect("query ok")
        .expect("record exists");
    assert_eq!(record.bank_name.as_deref(), Some("Tinkoff"));
    assert_eq!(record.phone_number, "+79990001122");
    assert!(record.is_active);
}

#[test]
fn transfer_report_is_gated_to_the_active_collector() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.persistence
        .create_collector(1, "+79990001122", None)
        .expect("created");

    let messages = app.callback(1, "view_transfers");
    assert!(texts_for(&messages, 1).contains("active collector only"));
}

#[test]
fn transfer_report_lists_recorded_transfers() {
    let mut app = TestApp::new();
    app.seed_person(1);
    app.seed_person(2);
    app.seed_person(3);
    app.seed_active_collector(3);
    app.callback(2, "transferred:1");

    let messages = app.callback(3, "view_transfers");
    let text = texts_for(&messages, 3);
    assert!(text.contains("Transfer report"));
    assert!(text.contains("Family1 Given1 Patron1"));
    assert!(text.contains("Family2 G. P."));
}
