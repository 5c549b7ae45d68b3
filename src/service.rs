//! Movie resource service: CRUD semantics over a `MovieStore`.

use crate::error::AppError;
use crate::model::{Movie, MoviePayload};
use crate::store::MovieStore;
use std::sync::Arc;

/// Stateless service owning the Movie operation contracts. Every call
/// round-trips to the store; nothing is cached between requests.
#[derive(Clone)]
pub struct MovieService {
    store: Arc<dyn MovieStore>,
}

impl MovieService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        MovieService { store }
    }

    /// All stored movies in store order, possibly empty.
    pub async fn list(&self) -> Result<Vec<Movie>, AppError> {
        self.store.list_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Movie, AppError> {
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Exact, case-sensitive title match.
    pub async fn find_by_title(&self, title: &str) -> Result<Movie, AppError> {
        self.store
            .find_by_title(title)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Insert a new movie; any id in the payload is ignored and the store
    /// assigns one. A duplicate title fails at the store level.
    pub async fn create(&self, mut payload: MoviePayload) -> Result<Movie, AppError> {
        payload.id = None;
        self.store.save(&payload).await
    }

    /// Remove the movie with `id`. Fails with `NotFound` (and deletes
    /// nothing) when no such row exists.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let movie = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        self.store.delete(&movie).await
    }

    /// Overwrite the movie addressed by `id` with `payload`.
    ///
    /// The payload id must equal the path id; that check comes first and
    /// never consults the store, so a mismatching payload yields
    /// `IdMismatch` even when `id` does not exist. Only then is existence
    /// checked, and only then is the row written.
    pub async fn update(&self, id: i64, payload: MoviePayload) -> Result<Movie, AppError> {
        if payload.id != Some(id) {
            return Err(AppError::IdMismatch);
        }
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        self.store.save(&payload).await
    }

    /// Store round-trip for the readiness probe.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;

    fn service() -> MovieService {
        MovieService::new(Arc::new(MemoryStore::new()))
    }

    fn payload(title: &str, director: Option<&str>, rating: i32) -> MoviePayload {
        MoviePayload::new(title, director.map(String::from), rating)
    }

    #[tokio::test]
    async fn create_assigns_id_and_keeps_fields() {
        let svc = service();
        let created = svc
            .create(payload("Alien", Some("Ridley Scott"), 5))
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Alien");
        assert_eq!(created.director.as_deref(), Some("Ridley Scott"));
        assert_eq!(created.rating, 5);

        let fetched = svc.find_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_ignores_payload_id() {
        let svc = service();
        let mut p = payload("Heat", None, 4);
        p.id = Some(999);
        let created = svc.create(p).await.unwrap();
        assert_ne!(created.id, 999);
    }

    #[tokio::test]
    async fn find_by_title_is_exact() {
        let svc = service();
        svc.create(payload("Alien", None, 3)).await.unwrap();
        let found = svc.find_by_title("Alien").await.unwrap();
        assert_eq!(found.title, "Alien");
        assert_matches!(svc.find_by_title("alien").await, Err(AppError::NotFound));
        assert_matches!(svc.find_by_title("Alie").await, Err(AppError::NotFound));
    }

    #[tokio::test]
    async fn find_unknown_id_is_not_found() {
        let svc = service();
        assert_matches!(svc.find_by_id(5).await, Err(AppError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let svc = service();
        let created = svc.create(payload("Alien", None, 3)).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert_matches!(svc.find_by_id(created.id).await, Err(AppError::NotFound));
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_store_unchanged() {
        let svc = service();
        let created = svc.create(payload("Alien", None, 3)).await.unwrap();
        assert_matches!(svc.delete(created.id + 1).await, Err(AppError::NotFound));
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_mismatch_wins_even_for_missing_id() {
        let svc = service();
        // Nothing stored under id 42, but the mismatch is reported first.
        let mut p = payload("Alien", None, 3);
        p.id = Some(7);
        assert_matches!(svc.update(42, p).await, Err(AppError::IdMismatch));
    }

    #[tokio::test]
    async fn update_missing_id_with_matching_payload_is_not_found() {
        let svc = service();
        let mut p = payload("Alien", None, 3);
        p.id = Some(42);
        assert_matches!(svc.update(42, p).await, Err(AppError::NotFound));
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields() {
        let svc = service();
        let created = svc
            .create(payload("Alien", Some("Ridley Scott"), 3))
            .await
            .unwrap();
        let mut p = payload("Aliens", Some("James Cameron"), 5);
        p.id = Some(created.id);
        let updated = svc.update(created.id, p).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Aliens");
        assert_eq!(updated.director.as_deref(), Some("James Cameron"));
        assert_eq!(updated.rating, 5);
        assert_eq!(svc.find_by_id(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn duplicate_title_fails_at_the_store() {
        let svc = service();
        svc.create(payload("Alien", None, 3)).await.unwrap();
        assert_matches!(
            svc.create(payload("Alien", None, 1)).await,
            Err(AppError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn list_returns_movies_in_store_order() {
        let svc = service();
        let a = svc.create(payload("Alien", None, 3)).await.unwrap();
        let b = svc.create(payload("Blade Runner", None, 4)).await.unwrap();
        let all = svc.list().await.unwrap();
        assert_eq!(all, vec![a, b]);
    }
}
