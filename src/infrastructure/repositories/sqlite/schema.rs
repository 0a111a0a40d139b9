// src/infrastructure/repositories/sqlite/schema.rs

diesel::table! {
    bookmarks (url) {
        url -> Text,
        title -> Text,
        folder -> Text,
        date_added -> Timestamp,
        domain -> Text,
        status -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    chunks (chunk_id) {
        chunk_id -> Text,
        bookmark_url -> Text,
        chunk_text -> Text,
        chunk_index -> Integer,
        start_char -> Integer,
        end_char -> Integer,
        embedding -> Binary,
    }
}

diesel::joinable!(chunks -> bookmarks (bookmark_url));
diesel::allow_tables_to_appear_in_same_query!(bookmarks, chunks);
