//! Movie persistence: the `MovieStore` trait and its PostgreSQL and
//! in-memory implementations. The `movies` table DDL is applied at startup.

use crate::error::AppError;
use crate::model::{Movie, MoviePayload};
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::RwLock;

/// Durable storage for movies, keyed by numeric id with a unique-title
/// constraint. `save` inserts when the payload has no id and performs a full
/// overwrite of the mutable columns when it does.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Movie>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, AppError>;
    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, AppError>;
    async fn save(&self, payload: &MoviePayload) -> Result<Movie, AppError>;
    async fn delete(&self, movie: &Movie) -> Result<(), AppError>;
    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}

const MOVIE_COLUMNS: &str = "id, title, director, rating";

/// PostgreSQL-backed store.
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        PgMovieStore { pool }
    }

    /// Create the movies table if it does not exist. Idempotent; call before
    /// serving requests.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL UNIQUE,
                director TEXT,
                rating INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn list_all(&self) -> Result<Vec<Movie>, AppError> {
        let sql = format!("SELECT {} FROM movies ORDER BY id", MOVIE_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let sql = format!("SELECT {} FROM movies WHERE id = $1", MOVIE_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, AppError> {
        let sql = format!("SELECT {} FROM movies WHERE title = $1", MOVIE_COLUMNS);
        tracing::debug!(sql = %sql, title, "query");
        let row = sqlx::query_as::<_, Movie>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, payload: &MoviePayload) -> Result<Movie, AppError> {
        let movie = match payload.id {
            None => {
                let sql = format!(
                    "INSERT INTO movies (title, director, rating) VALUES ($1, $2, $3) RETURNING {}",
                    MOVIE_COLUMNS
                );
                tracing::debug!(sql = %sql, title = %payload.title, "insert");
                sqlx::query_as::<_, Movie>(&sql)
                    .bind(&payload.title)
                    .bind(&payload.director)
                    .bind(payload.rating)
                    .fetch_one(&self.pool)
                    .await?
            }
            Some(id) => {
                let sql = format!(
                    "UPDATE movies SET title = $2, director = $3, rating = $4 WHERE id = $1 RETURNING {}",
                    MOVIE_COLUMNS
                );
                tracing::debug!(sql = %sql, id, "update");
                sqlx::query_as::<_, Movie>(&sql)
                    .bind(id)
                    .bind(&payload.title)
                    .bind(&payload.director)
                    .bind(payload.rating)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(movie)
    }

    async fn delete(&self, movie: &Movie) -> Result<(), AppError> {
        tracing::debug!(id = movie.id, "delete");
        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(movie.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// In-memory store backed by a `BTreeMap`, so `list_all` comes back in id
/// order like the PostgreSQL store. Used by the test suite and as a
/// database-free dev backend.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rows: BTreeMap<i64, Movie>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Movie>, AppError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| AppError::BadRequest("state lock".into()))?;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>, AppError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| AppError::BadRequest("state lock".into()))?;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, AppError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| AppError::BadRequest("state lock".into()))?;
        Ok(inner.rows.values().find(|m| m.title == title).cloned())
    }

    async fn save(&self, payload: &MoviePayload) -> Result<Movie, AppError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| AppError::BadRequest("state lock".into()))?;
        let id = match payload.id {
            Some(id) => id,
            None => {
                inner.next_id += 1;
                inner.next_id
            }
        };
        // Mirror the database unique-title constraint.
        if inner
            .rows
            .values()
            .any(|m| m.title == payload.title && m.id != id)
        {
            return Err(AppError::Conflict(format!(
                "title '{}' already exists",
                payload.title
            )));
        }
        let movie = Movie {
            id,
            title: payload.title.clone(),
            director: payload.director.clone(),
            rating: payload.rating,
        };
        inner.rows.insert(id, movie.clone());
        Ok(movie)
    }

    async fn delete(&self, movie: &Movie) -> Result<(), AppError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| AppError::BadRequest("state lock".into()))?;
        inner.rows.remove(&movie.id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
