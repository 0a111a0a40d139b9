// src/infrastructure/repositories/sqlite/repository.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use ndarray::Array1;
use tracing::{debug, instrument, warn};

use super::connection::{ConnectionPool, PooledConnection};
use super::error::{SqliteRepositoryError, SqliteResult};
use super::schema::{bookmarks, chunks};
use crate::domain::bookmark::Bookmark;
use crate::domain::chunk::{Chunk, ChunkSource, RetrievedChunk};
use crate::domain::embedding::{cosine_similarity, deserialize_embedding, serialize_embedding};
use crate::domain::error::DomainError;
use crate::domain::repositories::vector_repository::VectorRepository;
use crate::domain::search::SearchFilters;
use crate::infrastructure::repositories::sqlite::model::{DbBookmark, DbChunk, NewBookmark};

#[derive(Clone, Debug)]
pub struct SqliteVectorRepository {
    pool: ConnectionPool,
    embedding_dim: usize,
}

impl SqliteVectorRepository {
    /// Create a new SQLite repository with the provided connection pool.
    ///
    /// `embedding_dim` is the single dimension every stored vector must have;
    /// inserts and queries with a different dimension are rejected.
    pub fn new(pool: ConnectionPool, embedding_dim: usize) -> Self {
        Self {
            pool,
            embedding_dim,
        }
    }

    /// Create a new SQLite repository with the provided database URL
    #[instrument(skip_all, level = "debug")]
    pub fn from_url(database_url: &str, embedding_dim: usize) -> SqliteResult<Self> {
        let pool = super::connection::init_pool(database_url)?;
        Ok(Self {
            pool,
            embedding_dim,
        })
    }

    /// Get a connection from the pool
    #[instrument(skip_all, level = "debug")]
    pub fn get_connection(&self) -> SqliteResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| SqliteRepositoryError::ConnectionPoolError(e.to_string()))
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Convert a database model to a domain entity
    fn to_domain_model(&self, db_bookmark: DbBookmark) -> SqliteResult<Bookmark> {
        let date_added = DateTime::<Utc>::from_naive_utc_and_offset(db_bookmark.date_added, Utc);
        let created_at = DateTime::<Utc>::from_naive_utc_and_offset(db_bookmark.created_at, Utc);
        let updated_at = DateTime::<Utc>::from_naive_utc_and_offset(db_bookmark.updated_at, Utc);

        Bookmark::from_storage(
            db_bookmark.url.clone(),
            db_bookmark.title,
            db_bookmark.folder,
            date_added,
            db_bookmark.domain,
            db_bookmark.status,
            Some(created_at),
            updated_at,
        )
        .map_err(|e| {
            SqliteRepositoryError::ConversionError(format!(
                "Failed to create domain bookmark from DB model for url {}: {}",
                db_bookmark.url, e
            ))
        })
    }

    /// Convert a domain entity to its insert/update model
    fn to_db_model(&self, bookmark: &Bookmark) -> NewBookmark {
        NewBookmark {
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            folder: bookmark.folder.clone(),
            date_added: bookmark.date_added.naive_utc(),
            domain: bookmark.domain.clone(),
            status: bookmark.status.as_str().to_string(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<(), DomainError> {
        if embedding.len() != self.embedding_dim {
            return Err(DomainError::EmbeddingDimensionMismatch {
                expected: self.embedding_dim,
                actual: embedding.len(),
            });
        }
        Ok(())
    }
}

impl VectorRepository for SqliteVectorRepository {
    #[instrument(skip_all, level = "debug", fields(url = %bookmark.url))]
    fn upsert_bookmark(&self, bookmark: &Bookmark) -> Result<(), DomainError> {
        let mut conn = self.get_connection()?;
        let db_bookmark = self.to_db_model(bookmark);

        diesel::insert_into(bookmarks::table)
            .values(&db_bookmark)
            .on_conflict(bookmarks::url)
            .do_update()
            .set(&db_bookmark)
            .execute(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        debug!("Upserted bookmark: {}", bookmark.url);
        Ok(())
    }

    #[instrument(skip_all, level = "debug", fields(url = %url, count = new_chunks.len()))]
    fn replace_chunks(&self, url: &str, new_chunks: &[Chunk]) -> Result<(), DomainError> {
        // Validate before touching the database so a bad batch cannot leave
        // the bookmark without its previous chunks.
        for chunk in new_chunks {
            self.check_dimension(&chunk.embedding)?;
        }

        let rows: Vec<DbChunk> = new_chunks
            .iter()
            .map(|chunk| {
                Ok(DbChunk {
                    chunk_id: chunk.chunk_id.clone(),
                    bookmark_url: chunk.bookmark_url.clone(),
                    chunk_text: chunk.text.clone(),
                    chunk_index: chunk.chunk_index as i32,
                    start_char: chunk.start_char as i32,
                    end_char: chunk.end_char as i32,
                    embedding: serialize_embedding(&chunk.embedding)
                        .map_err(|e| SqliteRepositoryError::ConversionError(e.to_string()))?,
                })
            })
            .collect::<SqliteResult<_>>()?;

        let mut conn = self.get_connection()?;
        conn.transaction::<_, SqliteRepositoryError, _>(|conn| {
            diesel::delete(chunks::table.filter(chunks::bookmark_url.eq(url))).execute(conn)?;
            diesel::insert_into(chunks::table)
                .values(&rows)
                .execute(conn)?;
            Ok(())
        })?;

        debug!("Replaced chunks for {}: {} new", url, new_chunks.len());
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn get_by_url(&self, url: &str) -> Result<Option<Bookmark>, DomainError> {
        let mut conn = self.get_connection()?;

        let result = bookmarks::table
            .filter(bookmarks::url.eq(url))
            .first::<DbBookmark>(&mut conn)
            .optional()
            .map_err(SqliteRepositoryError::DatabaseError)?;

        match result {
            Some(db_bookmark) => {
                let bookmark = self.to_domain_model(db_bookmark)?;
                Ok(Some(bookmark))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip_all, level = "debug")]
    fn list_all_urls(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.get_connection()?;

        let urls = bookmarks::table
            .select(bookmarks::url)
            .load::<String>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(urls)
    }

    #[instrument(skip_all, level = "debug")]
    fn count_chunks(&self, url: &str) -> Result<usize, DomainError> {
        let mut conn = self.get_connection()?;

        let count: i64 = chunks::table
            .filter(chunks::bookmark_url.eq(url))
            .count()
            .get_result(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        Ok(count as usize)
    }

    #[instrument(skip_all, level = "debug", fields(k = k))]
    fn similarity_search(
        &self,
        query_embedding: &[f32],
        k: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<RetrievedChunk>, DomainError> {
        self.check_dimension(query_embedding)?;

        let mut conn = self.get_connection()?;

        // Metadata filters narrow the candidate set in SQL; ranking happens
        // in-process over the deserialized vectors.
        let mut query = chunks::table.inner_join(bookmarks::table).into_boxed();

        if let Some(folder) = &filters.folder {
            query = query.filter(bookmarks::folder.eq(folder.clone()));
        }
        if let Some(domain) = &filters.domain {
            query = query.filter(bookmarks::domain.eq(domain.clone()));
        }
        if let Some(from) = &filters.date_from {
            query = query.filter(bookmarks::date_added.ge(from.naive_utc()));
        }
        if let Some(to) = &filters.date_to {
            query = query.filter(bookmarks::date_added.le(to.naive_utc()));
        }

        let rows = query
            .load::<(DbChunk, DbBookmark)>(&mut conn)
            .map_err(SqliteRepositoryError::DatabaseError)?;

        let query_vector = Array1::from(query_embedding.to_vec());
        let mut results = Vec::new();

        for (chunk, bookmark) in rows {
            let embedding = match deserialize_embedding(&chunk.embedding) {
                Ok(embedding) if embedding.len() == self.embedding_dim => embedding,
                Ok(embedding) => {
                    warn!(
                        chunk_id = %chunk.chunk_id,
                        dim = embedding.len(),
                        "skipping chunk with unexpected embedding dimension"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(chunk_id = %chunk.chunk_id, "skipping undecodable embedding: {}", e);
                    continue;
                }
            };

            let chunk_vector = Array1::from(embedding);
            let similarity = cosine_similarity(&query_vector, &chunk_vector);

            results.push(RetrievedChunk {
                text: chunk.chunk_text,
                similarity,
                source: ChunkSource {
                    url: bookmark.url,
                    title: bookmark.title,
                    folder: bookmark.folder,
                    domain: bookmark.domain,
                    date_added: DateTime::<Utc>::from_naive_utc_and_offset(
                        bookmark.date_added,
                        Utc,
                    ),
                },
            });
        }

        // Sort by similarity (highest first); ties keep arbitrary order.
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }
}
