//! In-memory directory implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use idstore_core::access::{EntityStore, Result, ScanMarker, ScanPage};
use idstore_core::identity::{Role, User};

/// Default number of entities per scan page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// In-memory storage backend for testing and local development.
///
/// Keeps one ordered map per entity kind behind `Arc<RwLock<_>>`, so scan
/// order is lexicographic id order and pages are deterministic. Data is not
/// persisted and will be lost when the directory is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryDirectory {
    users: Arc<RwLock<BTreeMap<String, User>>>,
    roles: Arc<RwLock<BTreeMap<String, Role>>>,
    page_size: usize,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    /// Creates a new empty in-memory directory.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
            roles: Arc::new(RwLock::new(BTreeMap::new())),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the scan page size. Clamped to at least one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// One page of `map`, starting strictly after the id carried by `start`.
///
/// The marker is the last id of the page; ids are unique, so resuming after
/// it can neither repeat nor skip an entity that existed for the whole scan.
fn page_of<T: Clone>(
    map: &BTreeMap<String, T>,
    start: Option<&ScanMarker>,
    page_size: usize,
) -> ScanPage<T> {
    let after = start.map(ScanMarker::as_str);
    let mut keyed: Vec<(&String, &T)> = map
        .iter()
        .filter(|(id, _)| after.is_none_or(|a| id.as_str() > a))
        .take(page_size + 1)
        .collect();

    if keyed.len() > page_size {
        keyed.truncate(page_size);
        let last = keyed.last().expect("page is non-empty").0.clone();
        let items = keyed.into_iter().map(|(_, item)| item.clone()).collect();
        ScanPage::partial(items, ScanMarker::new(last))
    } else {
        let items = keyed.into_iter().map(|(_, item)| item.clone()).collect();
        ScanPage::last(items)
    }
}

#[async_trait]
impl EntityStore<User> for InMemoryDirectory {
    async fn get(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn put(&self, item: &User) -> Result<()> {
        debug!(id = %item.id, "storing user");
        self.users
            .write()
            .await
            .insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn scan_page(&self, start: Option<&ScanMarker>) -> Result<ScanPage<User>> {
        Ok(page_of(&*self.users.read().await, start, self.page_size))
    }
}

#[async_trait]
impl EntityStore<Role> for InMemoryDirectory {
    async fn get(&self, id: &str) -> Result<Option<Role>> {
        Ok(self.roles.read().await.get(id).cloned())
    }

    async fn put(&self, item: &Role) -> Result<()> {
        debug!(id = %item.id, "storing role");
        self.roles
            .write()
            .await
            .insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn scan_page(&self, start: Option<&ScanMarker>) -> Result<ScanPage<Role>> {
        Ok(page_of(&*self.roles.read().await, start, self.page_size))
    }
}
