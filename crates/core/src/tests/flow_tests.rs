// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::flow::{FlowKind, FlowStep};

#[test]
fn registration_steps_run_in_order() {
    assert_eq!(
        FlowKind::Registration.first_step(),
        FlowStep::FamilyName
    );
    assert_eq!(FlowStep::FamilyName.next(), Some(FlowStep::GivenName));
    assert_eq!(FlowStep::GivenName.next(), Some(FlowStep::Patronymic));
    assert_eq!(FlowStep::Patronymic.next(), Some(FlowStep::BirthDate));
    assert_eq!(FlowStep::BirthDate.next(), None);
}

#[test]
fn wish_and_collector_sequences_end_on_optional_steps() {
    assert_eq!(FlowStep::WishText.next(), Some(FlowStep::WishUrl));
    assert_eq!(FlowStep::WishUrl.next(), None);
    assert!(FlowStep::WishUrl.is_optional());

    assert_eq!(FlowStep::PhoneNumber.next(), Some(FlowStep::BankName));
    assert_eq!(FlowStep::BankName.next(), None);
    assert!(FlowStep::BankName.is_optional());
}

#[test]
fn required_steps_are_not_optional() {
    for step in FlowKind::Registration.steps() {
        assert!(!step.is_optional(), "{step} must not be skippable");
    }
    assert!(!FlowStep::WishText.is_optional());
    assert!(!FlowStep::PhoneNumber.is_optional());
}

#[test]
fn every_step_maps_back_to_its_flow() {
    for kind in [
        FlowKind::Registration,
        FlowKind::WishEntry,
        FlowKind::CollectorRegistration,
    ] {
        for step in kind.steps() {
            assert_eq!(step.kind(), kind);
        }
    }
}
