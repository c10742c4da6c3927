// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use gift_fund_domain::Person;
use time::macros::datetime;
use time::{Date, Month, OffsetDateTime};

/// A fixed timestamp for deterministic transfer records.
pub fn test_timestamp() -> OffsetDateTime {
    datetime!(2026-03-10 12:00:00 UTC)
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// A person with a January 1st birthday and generated names.
pub fn test_person(person_id: i64) -> Person {
    person_with_birthday(person_id, Month::January, 1)
}

/// A person with the given birth month and day.
pub fn person_with_birthday(person_id: i64, month: Month, day: u8) -> Person {
    Person::new(
        person_id,
        Some(format!("user{person_id}")),
        format!("Family{person_id}"),
        format!("Given{person_id}"),
        format!("Patron{person_id}"),
        Date::from_calendar_date(2000, month, day).expect("valid test date"),
    )
}

/// Registers `count` persons with identity keys `1..=count`.
pub fn register_persons(persistence: &mut Persistence, count: i64) {
    for person_id in 1..=count {
        persistence
            .add_person(&test_person(person_id))
            .expect("person added");
    }
}
