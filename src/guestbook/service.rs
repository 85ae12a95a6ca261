//! Wish and guest operations on top of the database handle.

use url::Url;

use crate::config::{DatabaseConfig, GuestConfig};
use crate::guestbook::slug;
use crate::guestbook::types::{
    Guest, GuestInput, GuestInvite, GuestName, GuestbookError, NewWish, WishInput,
};
use crate::store::{Database, Row, StoreError};

#[derive(Clone)]
pub struct GuestbookService {
    db: Database,
    wish_table: String,
    guest_table: String,
    invite_base: Url,
    suffix_len: usize,
}

impl GuestbookService {
    pub fn new(db: Database, database: &DatabaseConfig, guest: &GuestConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            db,
            wish_table: database.wish_table.clone(),
            guest_table: database.guest_table.clone(),
            invite_base: Url::parse(&guest.invite_base_url)?,
            suffix_len: guest.suffix_len,
        })
    }

    /// Validate, reject repeat names, then insert.
    ///
    /// The existence check and the insert are two separate round trips, so two
    /// concurrent submissions under one name can both land.
    pub async fn submit_wish(&self, input: WishInput) -> Result<NewWish, GuestbookError> {
        let wish = input.validate()?;

        let existing = self
            .db
            .from(&self.wish_table)
            .select("*")
            .eq("name", &wish.name)
            .execute()
            .await
            .map_err(GuestbookError::LookupFailed)?;

        if !existing.is_empty() {
            tracing::debug!(name = %wish.name, "Duplicate wish rejected");
            return Err(GuestbookError::DuplicateWish);
        }

        self.db
            .from(&self.wish_table)
            .insert(&wish)
            .execute()
            .await
            .map_err(GuestbookError::InsertFailed)?;

        tracing::info!(name = %wish.name, "Wish stored");
        Ok(wish)
    }

    /// Every row of the wish table, columns as stored.
    pub async fn list_wishes(&self) -> Result<Vec<Row>, GuestbookError> {
        self.db
            .from(&self.wish_table)
            .select("*")
            .execute()
            .await
            .map_err(GuestbookError::ListFailed)
    }

    /// Insert a guest under a fresh slug and build its invite link.
    pub async fn create_guest(&self, input: GuestInput) -> Result<GuestInvite, GuestbookError> {
        let name = input.validate()?;
        let slug = slug::generate(&name, self.suffix_len);

        let guest: Guest = self
            .db
            .from(&self.guest_table)
            .insert(&[Guest { name, slug }])
            .select("*")
            .single()
            .execute_as()
            .await
            .map_err(GuestbookError::GuestInsertFailed)?;

        let url = self.invite_url(&guest.slug);
        tracing::info!(slug = %guest.slug, "Guest created");
        Ok(GuestInvite {
            name: guest.name,
            slug: guest.slug,
            url,
        })
    }

    pub async fn find_guest(&self, slug: &str) -> Result<GuestName, GuestbookError> {
        self.db
            .from(&self.guest_table)
            .select("name")
            .eq("slug", slug)
            .single()
            .execute_as()
            .await
            .map_err(|e: StoreError| {
                tracing::debug!(slug = %slug, error = %e, "Guest lookup failed");
                GuestbookError::GuestNotFound
            })
    }

    fn invite_url(&self, slug: &str) -> String {
        let mut url = self.invite_base.clone();
        url.query_pairs_mut().append_pair("guest", slug);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> (GuestbookService, MemoryStore) {
        let store = MemoryStore::new();
        let config = AppConfig::default();
        let svc = GuestbookService::new(
            Database::new(Arc::new(store.clone())),
            &config.database,
            &config.guest,
        )
        .unwrap();
        (svc, store)
    }

    fn wish(name: &str, message: &str) -> WishInput {
        WishInput {
            name: Some(name.into()),
            message: Some(message.into()),
        }
    }

    #[tokio::test]
    async fn test_submit_then_duplicate() {
        let (svc, store) = service();
        svc.submit_wish(wish("Alice", "Congrats!")).await.unwrap();
        assert_eq!(store.rows("wishs")[0]["name"], "alice");

        let err = svc.submit_wish(wish("ALICE", "Again")).await.unwrap_err();
        assert!(matches!(err, GuestbookError::DuplicateWish));
        assert_eq!(store.rows("wishs").len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_stops_insert() {
        let (svc, store) = service();
        store.set_failure(Some("connection reset"));
        let err = svc.submit_wish(wish("Alice", "hi")).await.unwrap_err();
        assert!(matches!(err, GuestbookError::LookupFailed(_)));
        store.set_failure(None);
        assert!(store.rows("wishs").is_empty());
    }

    #[tokio::test]
    async fn test_list_wishes() {
        let (svc, _) = service();
        svc.submit_wish(wish("Alice", "one")).await.unwrap();
        svc.submit_wish(wish("Bobby", "two")).await.unwrap();
        let wishes = svc.list_wishes().await.unwrap();
        let mut names: Vec<_> = wishes.iter().map(|w| w["name"].as_str().unwrap()).collect();
        names.sort();
        assert_eq!(names, vec!["alice", "bobby"]);
    }

    #[tokio::test]
    async fn test_list_keeps_rows_with_null_columns() {
        let (svc, store) = service();
        let db = Database::new(Arc::new(store));
        db.from("wishs")
            .insert(&serde_json::json!([
                {"name": "alice", "message": "hi"},
                {"name": "bobby", "message": null},
                {"name": 42, "message": "from the dashboard"}
            ]))
            .execute()
            .await
            .unwrap();

        let wishes = svc.list_wishes().await.unwrap();
        assert_eq!(wishes.len(), 3);
        assert!(wishes[1]["message"].is_null());
        assert_eq!(wishes[2]["name"], 42);
        assert!(wishes.iter().all(|w| w.contains_key("id")));
    }

    #[tokio::test]
    async fn test_guest_roundtrip() {
        let (svc, _) = service();
        let invite = svc
            .create_guest(GuestInput { name: Some("John Doe".into()) })
            .await
            .unwrap();
        assert!(invite.slug.starts_with("john-doe-"));
        assert_eq!(
            invite.url,
            format!("http://wedding.local:8181/?guest={}", invite.slug)
        );

        let found = svc.find_guest(&invite.slug).await.unwrap();
        assert_eq!(found.name, "John Doe");

        assert!(matches!(
            svc.find_guest("nonexistent-slug").await,
            Err(GuestbookError::GuestNotFound)
        ));
    }

    #[tokio::test]
    async fn test_guest_insert_failure() {
        let (svc, store) = service();
        store.set_failure(Some("boom"));
        let err = svc
            .create_guest(GuestInput { name: Some("Ann".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, GuestbookError::GuestInsertFailed(_)));
    }
}
