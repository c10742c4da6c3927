// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::data::{CollectorDraft, FlowData, RegistrationDraft};
use crate::error::CoreError;
use crate::flow::{FlowKind, FlowMode, FlowStep};
use crate::session::{FlowSession, FlowState, StepAdvance};
use gift_fund_domain::DomainError;
use time::{Date, Month};

/// Drives a fresh registration through all four fields.
fn completed_registration() -> FlowSession {
    let mut session = FlowSession::begin(FlowKind::Registration, FlowMode::Create);
    assert_eq!(
        session.submit_text("Иванов").expect("family name"),
        StepAdvance::Next(FlowStep::GivenName)
    );
    assert_eq!(
        session.submit_text("Иван").expect("given name"),
        StepAdvance::Next(FlowStep::Patronymic)
    );
    assert_eq!(
        session.submit_text("Иваныч").expect("patronymic"),
        StepAdvance::Next(FlowStep::BirthDate)
    );
    assert_eq!(
        session.submit_text("01.01.2000").expect("birth date"),
        StepAdvance::Confirm
    );
    session
}

#[test]
fn fresh_session_waits_on_first_step() {
    let session = FlowSession::begin(FlowKind::Registration, FlowMode::Create);
    assert_eq!(session.current_step(), Some(FlowStep::FamilyName));
    assert_eq!(session.mode(), FlowMode::Create);
}

#[test]
fn full_registration_reaches_confirmation() {
    let session = completed_registration();
    assert_eq!(session.state(), FlowState::Confirming);

    let form = session.registration_form().expect("complete form");
    assert_eq!(form.family_name, "Иванов");
    assert_eq!(form.given_name, "Иван");
    assert_eq!(form.patronymic, "Иваныч");
    assert_eq!(
        form.birth_date,
        Date::from_calendar_date(2000, Month::January, 1).expect("valid date")
    );
}

#[test]
fn invalid_input_keeps_step_and_collected_fields() {
    let mut session = FlowSession::begin(FlowKind::Registration, FlowMode::Create);
    session.submit_text("Иванов").expect("family name");

    // A name with digits is rejected; the session must not advance.
    let err = session.submit_text("Ив4н").expect_err("digits rejected");
    assert!(matches!(
        err,
        CoreError::Validation(DomainError::InvalidName(_))
    ));
    assert_eq!(session.current_step(), Some(FlowStep::GivenName));

    // Previously collected fields survive the rejection.
    match session.data() {
        FlowData::Registration(draft) => {
            assert_eq!(draft.family_name.as_deref(), Some("Иванов"));
            assert_eq!(draft.given_name, None);
        }
        other => panic!("unexpected data: {other:?}"),
    }

    // The same step still accepts valid input afterwards.
    assert_eq!(
        session.submit_text("Иван").expect("retry succeeds"),
        StepAdvance::Next(FlowStep::Patronymic)
    );
}

#[test]
fn edit_round_trip_changes_only_the_selected_field() {
    let mut session = completed_registration();

    session.request_revision().expect("revise from confirming");
    assert_eq!(session.state(), FlowState::EditSelecting);

    session
        .select_step(FlowStep::GivenName)
        .expect("select field");
    assert_eq!(session.current_step(), Some(FlowStep::GivenName));

    // The corrected field returns straight to confirmation.
    assert_eq!(
        session.submit_text("Пётр").expect("corrected"),
        StepAdvance::Confirm
    );

    let form = session.registration_form().expect("complete form");
    assert_eq!(form.given_name, "Пётр");
    assert_eq!(form.family_name, "Иванов");
    assert_eq!(form.patronymic, "Иваныч");
    assert_eq!(
        form.birth_date,
        Date::from_calendar_date(2000, Month::January, 1).expect("valid date")
    );
}

#[test]
fn invalid_input_during_edit_keeps_edit_mode() {
    let mut session = completed_registration();
    session.request_revision().expect("revise");
    session.select_step(FlowStep::BirthDate).expect("select");

    assert!(session.submit_text("not a date").is_err());
    assert_eq!(session.current_step(), Some(FlowStep::BirthDate));

    // A valid retry still short-circuits back to confirmation.
    assert_eq!(
        session.submit_text("05.03.1999").expect("retry"),
        StepAdvance::Confirm
    );
}

#[test]
fn selecting_a_foreign_step_is_rejected() {
    let mut session = completed_registration();
    session.request_revision().expect("revise");

    let err = session
        .select_step(FlowStep::WishText)
        .expect_err("foreign step");
    assert!(matches!(err, CoreError::StepOutsideFlow { .. }));
}

#[test]
fn text_in_confirmation_state_is_an_invalid_transition() {
    let mut session = completed_registration();
    let err = session.submit_text("stray input").expect_err("not collecting");
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[test]
fn wish_flow_url_can_be_skipped() {
    let mut session = FlowSession::begin(FlowKind::WishEntry, FlowMode::Create);
    assert_eq!(
        session.submit_text("A mechanical keyboard").expect("text"),
        StepAdvance::Next(FlowStep::WishUrl)
    );
    assert_eq!(session.skip_step().expect("skip url"), StepAdvance::Confirm);

    let form = session.wish_form().expect("complete form");
    assert_eq!(form.wish_text, "A mechanical keyboard");
    assert_eq!(form.wish_url, None);
    assert_eq!(form.target_wish_id, None);
}

#[test]
fn wish_flow_accepts_a_valid_url() {
    let mut session = FlowSession::begin(FlowKind::WishEntry, FlowMode::Create);
    session.submit_text("A mechanical keyboard").expect("text");
    assert_eq!(
        session
            .submit_text("https://shop.example.com/kb")
            .expect("url"),
        StepAdvance::Confirm
    );
    let form = session.wish_form().expect("complete form");
    assert_eq!(form.wish_url.as_deref(), Some("https://shop.example.com/kb"));
}

#[test]
fn required_step_cannot_be_skipped() {
    let mut session = FlowSession::begin(FlowKind::WishEntry, FlowMode::Create);
    let err = session.skip_step().expect_err("text is required");
    assert!(matches!(
        err,
        CoreError::StepNotSkippable(FlowStep::WishText)
    ));
}

#[test]
fn collector_flow_collects_phone_then_bank() {
    let mut session = FlowSession::begin(FlowKind::CollectorRegistration, FlowMode::Create);
    assert_eq!(
        session.submit_text("+7 999 000-11-22").expect("phone"),
        StepAdvance::Next(FlowStep::BankName)
    );
    assert_eq!(
        session.submit_text("Sber").expect("bank"),
        StepAdvance::Confirm
    );

    let form = session.collector_form().expect("complete form");
    assert_eq!(form.phone_number, "+79990001122");
    assert_eq!(form.bank_name.as_deref(), Some("Sber"));
}

#[test]
fn revision_session_opens_in_edit_selection() {
    let mut draft = CollectorDraft::new();
    draft.phone_number = Some(String::from("+79990001122"));
    draft.bank_name = Some(String::from("Sber"));

    let mut session = FlowSession::begin_revision(FlowData::Collector(draft));
    assert_eq!(session.state(), FlowState::EditSelecting);
    assert_eq!(session.mode(), FlowMode::Update);

    session.select_step(FlowStep::BankName).expect("select bank");
    assert_eq!(
        session.submit_text("Tinkoff").expect("bank"),
        StepAdvance::Confirm
    );

    let form = session.collector_form().expect("complete form");
    assert_eq!(form.phone_number, "+79990001122");
    assert_eq!(form.bank_name.as_deref(), Some("Tinkoff"));
}

#[test]
fn incomplete_revision_draft_fails_on_missing_field() {
    let session = {
        let mut s = FlowSession::begin_revision(FlowData::Registration(
            RegistrationDraft::new(),
        ));
        s.select_step(FlowStep::FamilyName).expect("select");
        s.submit_text("Иванов").expect("family name");
        s
    };

    let err = session.registration_form().expect_err("missing fields");
    assert!(matches!(
        err,
        CoreError::IncompleteDraft { field: "given_name" }
    ));
}

#[test]
fn form_is_unavailable_outside_confirmation() {
    let session = FlowSession::begin(FlowKind::Registration, FlowMode::Create);
    assert!(matches!(
        session.registration_form(),
        Err(CoreError::InvalidTransition { .. })
    ));
}
