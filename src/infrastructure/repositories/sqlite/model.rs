// src/infrastructure/repositories/sqlite/model.rs
use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable};
use std::fmt;

#[derive(Queryable, Clone)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::bookmarks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbBookmark {
    pub url: String,
    pub title: String,
    pub folder: String,
    pub date_added: NaiveDateTime,
    pub domain: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl fmt::Debug for DbBookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "url: {}, title: {}, folder: {}, domain: {}, status: {}, date_added: {}, updated_at: {}",
            self.url, self.title, self.folder, self.domain, self.status, self.date_added,
            self.updated_at
        )
    }
}

/// New bookmark for insertion; `created_at` comes from the column default.
#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::bookmarks)]
#[diesel(primary_key(url))]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub folder: String,
    pub date_added: NaiveDateTime,
    pub domain: String,
    pub status: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, Clone)]
#[diesel(table_name = crate::infrastructure::repositories::sqlite::schema::chunks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbChunk {
    pub chunk_id: String,
    pub bookmark_url: String,
    pub chunk_text: String,
    pub chunk_index: i32,
    pub start_char: i32,
    pub end_char: i32,
    pub embedding: Vec<u8>,
}

impl fmt::Debug for DbChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chunk_id: {}, bookmark_url: {}, chunk_index: {}, span: [{}, {}), embedding: {:X?}",
            self.chunk_id,
            self.bookmark_url,
            self.chunk_index,
            self.start_char,
            self.end_char,
            &self.embedding.iter().take(3).collect::<Vec<&u8>>() // Truncate and hex format
        )
    }
}
