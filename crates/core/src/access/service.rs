use chrono::Utc;

use crate::identity::ValidationError;

use super::error::AccessError;
use super::traits::{Entity, EntityStore};
use super::types::{ScanMarker, ScanPage};
use super::Result;

/// Generic persist/fetch/scan operations over any [`Entity`] kind.
///
/// The service is stateless: every operation is one or two store calls plus
/// pure merge and validation logic, so a single instance can be shared by
/// concurrent callers. Callers that need deadlines or retries impose them
/// around the store they pass in.
#[derive(Debug, Clone)]
pub struct AccessService<S> {
    store: S,
}

impl<S> AccessService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validation plus the empty-identity guard shared by the write paths.
    fn check_writable<T: Entity>(item: &T) -> Result<()> {
        if let Some(error) = item.validation_error() {
            return Err(error.into());
        }
        if item.id().trim().is_empty() {
            return Err(ValidationError::MissingId {
                entity_type: T::ENTITY_TYPE,
            }
            .into());
        }
        Ok(())
    }

    /// Writes a new entity, failing when the identity is already taken.
    pub async fn create<T>(&self, item: &T, actor: &str) -> Result<()>
    where
        T: Entity,
        S: EntityStore<T>,
    {
        Self::check_writable(item)?;
        if self.store.get(item.id()).await?.is_some() {
            return Err(AccessError::AlreadyExists {
                entity_type: T::ENTITY_TYPE,
                id: item.id().to_string(),
            });
        }
        self.write(item.clone(), actor).await
    }

    /// Upserts an entity.
    ///
    /// When a revision with the same identity is already stored, the stored
    /// revision is merged with `item` before writing, so fields unset in
    /// `item` survive. `created` is stamped on the first persist only;
    /// `modified` and `modifiedBy` on every persist.
    ///
    /// The read-merge-write is not guarded by a conditional write:
    /// concurrent persists on one identity race, and the later write wins.
    pub async fn persist<T>(&self, item: &T, actor: &str) -> Result<()>
    where
        T: Entity,
        S: EntityStore<T>,
    {
        Self::check_writable(item)?;
        let next = match self.store.get(item.id()).await? {
            Some(stored) => stored.merge(item)?,
            None => item.clone(),
        };
        self.write(next, actor).await
    }

    async fn write<T>(&self, mut item: T, actor: &str) -> Result<()>
    where
        T: Entity,
        S: EntityStore<T>,
    {
        let now = Utc::now();
        let audit = item.audit_mut();
        if audit.created.is_none() {
            audit.created = Some(now);
        }
        audit.modified = Some(now);
        audit.modified_by = Some(actor.to_string());
        self.store.put(&item).await
    }

    /// Returns the full stored revision for `item`'s identity.
    pub async fn fetch<T>(&self, item: &T) -> Result<T>
    where
        T: Entity,
        S: EntityStore<T>,
    {
        self.fetch_by_id(item.id()).await
    }

    /// Returns the full stored revision for an identity.
    pub async fn fetch_by_id<T>(&self, id: &str) -> Result<T>
    where
        T: Entity,
        S: EntityStore<T>,
    {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AccessError::NotFound {
                entity_type: T::ENTITY_TYPE,
                id: id.to_string(),
            })
    }

    /// One bounded page of entities of kind `T`.
    ///
    /// Pass `None` for the first page, then each page's `next_marker` until
    /// `has_more` is false.
    pub async fn scan<T>(&self, start: Option<&ScanMarker>) -> Result<ScanPage<T>>
    where
        T: Entity,
        S: EntityStore<T>,
    {
        self.store.scan_page(start).await
    }

    /// Every stored entity of kind `T`, gathered by paging until the store
    /// reports no more results.
    ///
    /// Order is the store's scan order. The enumeration is not a snapshot:
    /// entities persisted or removed while paging may be missed or seen
    /// twice.
    pub async fn scan_all<T>(&self) -> Result<Vec<T>>
    where
        T: Entity,
        S: EntityStore<T>,
    {
        let mut all = Vec::new();
        let mut marker: Option<ScanMarker> = None;
        loop {
            let page = self.scan::<T>(marker.as_ref()).await?;
            all.extend(page.items);
            match (page.has_more, page.next_marker) {
                (true, Some(next)) => marker = Some(next),
                _ => break,
            }
        }
        Ok(all)
    }
}
