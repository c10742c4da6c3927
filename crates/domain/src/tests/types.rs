// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{CollectorRecord, Person, Wish};
use time::Date;
use time::Month;

fn test_person() -> Person {
    Person::new(
        1,
        Some(String::from("ivanov")),
        String::from("Иванов"),
        String::from("Иван"),
        String::from("Иваныч"),
        Date::from_calendar_date(2000, Month::January, 1).expect("valid test date"),
    )
}

#[test]
fn full_name_joins_all_three_parts() {
    let person = test_person();
    assert_eq!(person.full_name(), "Иванов Иван Иваныч");
}

#[test]
fn short_name_abbreviates_given_and_patronymic() {
    let person = test_person();
    assert_eq!(person.short_name(), "Иванов И. И.");
}

#[test]
fn new_wish_has_no_storage_id() {
    let wish = Wish::new(1, String::from("A mechanical keyboard"), None);
    assert_eq!(wish.wish_id, None);
    assert_eq!(wish.person_id, 1);
}

#[test]
fn new_collector_record_is_inactive() {
    let record = CollectorRecord::new(1, String::from("+79990001122"), None);
    assert!(!record.is_active);
    assert_eq!(record.collector_id, None);
}
