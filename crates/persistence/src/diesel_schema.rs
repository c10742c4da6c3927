// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    persons (person_id) {
        person_id -> BigInt,
        handle -> Nullable<Text>,
        family_name -> Text,
        given_name -> Text,
        patronymic -> Text,
        birth_date -> Text,
    }
}

diesel::table! {
    wishes (wish_id) {
        wish_id -> BigInt,
        person_id -> BigInt,
        wish_text -> Text,
        wish_url -> Nullable<Text>,
    }
}

diesel::table! {
    transfers (transfer_id) {
        transfer_id -> BigInt,
        sender_id -> BigInt,
        honoree_id -> BigInt,
        recorded_at -> Text,
    }
}

diesel::table! {
    admin_grants (grant_id) {
        grant_id -> BigInt,
        person_id -> BigInt,
    }
}

diesel::table! {
    collectors (collector_id) {
        collector_id -> BigInt,
        person_id -> BigInt,
        phone_number -> Text,
        bank_name -> Nullable<Text>,
        is_active -> Integer,
    }
}

diesel::table! {
    service_user (id) {
        id -> BigInt,
        person_id -> BigInt,
    }
}

diesel::joinable!(wishes -> persons (person_id));
diesel::joinable!(admin_grants -> persons (person_id));
diesel::joinable!(collectors -> persons (person_id));

diesel::allow_tables_to_appear_in_same_query!(
    persons,
    wishes,
    transfers,
    admin_grants,
    collectors,
    service_user,
);
