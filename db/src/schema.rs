table! {
    choices (id) {
        id -> Int4,
        question_id -> Int4,
        choice_text -> Varchar,
        votes -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

table! {
    questions (id) {
        id -> Int4,
        question_text -> Varchar,
        pub_date -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

joinable!(choices -> questions (question_id));

allow_tables_to_appear_in_same_query!(
    choices,
    questions,
);
