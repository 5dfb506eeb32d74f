//! DynamoDB directory implementation.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use idstore_core::access::{Entity, EntityStore, Result, ScanMarker, ScanPage};
use idstore_core::identity::{Role, User};

use super::conversions::{
    decode_start_key, encode_start_key, entity_to_item, item_to_entity, ATTR_ENTITY_TYPE,
    ATTR_PK, ATTR_SK,
};
use super::error::{map_get_item_error, map_put_item_error, map_scan_error};
use super::keys;

/// Default number of items evaluated per scan page.
pub const DEFAULT_PAGE_SIZE: i32 = 25;

/// DynamoDB-based directory over a single table.
///
/// Provides async access to DynamoDB storage for all entity kinds. Writes
/// are unconditional puts; callers wanting lost-update detection can layer a
/// conditional expression on an expected revision here without touching the
/// contract above.
pub struct DynamoDbDirectory {
    client: Client,
    table_name: String,
    page_size: i32,
}

impl DynamoDbDirectory {
    /// Creates a new directory with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Creates a new directory from environment configuration.
    ///
    /// Uses the AWS SDK default credential chain and reads the table name
    /// from the `IDSTORE_TABLE_NAME` environment variable (defaults to
    /// "idstore").
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);
        let table_name =
            std::env::var("IDSTORE_TABLE_NAME").unwrap_or_else(|_| "idstore".to_string());

        Ok(Self::new(client, table_name))
    }

    /// Overrides the scan page size. Clamped to at least one.
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn get_entity<T>(&self, id: &str) -> Result<Option<T>>
    where
        T: Entity + DeserializeOwned,
    {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                ATTR_PK,
                AttributeValue::S(keys::entity_pk(T::ENTITY_TYPE, id)),
            )
            .key(
                ATTR_SK,
                AttributeValue::S(keys::entity_sk(T::ENTITY_TYPE, id)),
            )
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_entity(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_entity<T>(&self, entity: &T) -> Result<()>
    where
        T: Entity + Serialize,
    {
        debug!(id = %entity.id(), entity_type = T::ENTITY_TYPE, "writing entity");
        let item = entity_to_item(entity)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    /// One scan page of entities of kind `T`.
    ///
    /// A page may hold fewer than `page_size` entities: the `entityType`
    /// filter runs after the bounded read, and DynamoDB signals remaining
    /// data through `LastEvaluatedKey` alone.
    async fn scan_entities<T>(&self, start: Option<&ScanMarker>) -> Result<ScanPage<T>>
    where
        T: Entity + DeserializeOwned,
    {
        let exclusive_start_key = start.map(decode_start_key).transpose()?;

        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression(format!("{ATTR_ENTITY_TYPE} = :entityType"))
            .expression_attribute_values(
                ":entityType",
                AttributeValue::S(T::ENTITY_TYPE.to_string()),
            )
            .limit(self.page_size)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(map_scan_error)?;

        let items: Vec<T> = result
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_entity)
            .collect::<Result<_>>()?;

        match result.last_evaluated_key {
            Some(key) => Ok(ScanPage::partial(items, encode_start_key(&key)?)),
            None => Ok(ScanPage::last(items)),
        }
    }
}

#[async_trait]
impl EntityStore<User> for DynamoDbDirectory {
    async fn get(&self, id: &str) -> Result<Option<User>> {
        self.get_entity(id).await
    }

    async fn put(&self, item: &User) -> Result<()> {
        self.put_entity(item).await
    }

    async fn scan_page(&self, start: Option<&ScanMarker>) -> Result<ScanPage<User>> {
        self.scan_entities(start).await
    }
}

#[async_trait]
impl EntityStore<Role> for DynamoDbDirectory {
    async fn get(&self, id: &str) -> Result<Option<Role>> {
        self.get_entity(id).await
    }

    async fn put(&self, item: &Role) -> Result<()> {
        self.put_entity(item).await
    }

    async fn scan_page(&self, start: Option<&ScanMarker>) -> Result<ScanPage<Role>> {
        self.scan_entities(start).await
    }
}
