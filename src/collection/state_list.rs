use crate::codec::{self, LedgerEntity};
use crate::core::ident::{DEFAULT_MAX_ID_LEN, validate_id_with_limit};
use crate::core::{LedgerError, Result};
use crate::ledger::{LedgerStore, StateStream};
use futures::StreamExt;
use serde::Serialize;
use std::marker::PhantomData;

/// Sorts after every character an identifier may contain.
pub const RANGE_TERMINATOR: char = '~';

/// Where a list keeps its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    Public,
    Private(String),
}

/// One row of a `get_all` scan. Values that fail to decode are kept as their raw
/// text so a scan never loses records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRecord<E> {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: RecordValue<E>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordValue<E> {
    Entity(E),
    Raw(String),
}

impl<E> QueryRecord<E> {
    pub fn entity(&self) -> Option<&E> {
        match &self.record {
            RecordValue::Entity(entity) => Some(entity),
            RecordValue::Raw(_) => None,
        }
    }

    pub fn into_entity(self) -> Option<E> {
        match self.record {
            RecordValue::Entity(entity) => Some(entity),
            RecordValue::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self.record, RecordValue::Raw(_))
    }
}

/// Typed CRUD over one entity namespace of the ledger.
pub struct StateList<'a, E> {
    store: &'a dyn LedgerStore,
    partition: Partition,
    max_id_len: usize,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: LedgerEntity> StateList<'a, E> {
    pub fn new(store: &'a dyn LedgerStore, partition: Partition) -> Self {
        Self {
            store,
            partition,
            max_id_len: DEFAULT_MAX_ID_LEN,
            _entity: PhantomData,
        }
    }

    pub fn with_max_id_len(mut self, max_id_len: usize) -> Self {
        self.max_id_len = max_id_len;
        self
    }

    /// Ledger key for `id`, rejecting empty or malformed identifiers
    pub fn key(&self, id: &str) -> Result<String> {
        validate_id_with_limit(&format!("{} id", E::KIND), id, self.max_id_len)?;
        Ok(format!("{}:{}", E::NAMESPACE, id))
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match &self.partition {
            Partition::Public => self.store.get_state(key).await,
            Partition::Private(collection) => self.store.get_private_data(collection, key).await,
        }
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<()> {
        match &self.partition {
            Partition::Public => self.store.put_state(key, value).await,
            Partition::Private(collection) => {
                self.store.put_private_data(collection, key, value).await
            }
        }
    }

    fn scan(&self) -> StateStream<'a> {
        let start = format!("{}:", E::NAMESPACE);
        let end = format!("{}:{}", E::NAMESPACE, RANGE_TERMINATOR);
        match &self.partition {
            Partition::Public => self.store.get_state_by_range(&start, &end),
            Partition::Private(collection) => {
                self.store.get_private_data_by_range(collection, &start, &end)
            }
        }
    }

    /// True if the key holds a value that decodes as `E`
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let key = self.key(id)?;
        Ok(match self.read(&key).await? {
            Some(bytes) => codec::decode::<E>(&key, &bytes).is_ok(),
            None => false,
        })
    }

    /// True if anything is stored under the key, decodable or not
    pub async fn contains_key(&self, id: &str) -> Result<bool> {
        let key = self.key(id)?;
        Ok(self.read(&key).await?.is_some())
    }

    /// Insert a new entity; never overwrites
    pub async fn add(&self, entity: &E) -> Result<()> {
        let key = self.key(entity.id())?;
        if self.read(&key).await?.is_some() {
            return Err(LedgerError::already_exists(E::KIND, entity.id()));
        }
        self.write(&key, codec::encode(entity)?).await
    }

    pub async fn get(&self, id: &str) -> Result<E> {
        let key = self.key(id)?;
        match self.read(&key).await? {
            Some(bytes) => codec::decode(&key, &bytes),
            None => Err(LedgerError::not_found(E::KIND, id)),
        }
    }

    /// Overwrite an existing entity; never creates
    pub async fn update(&self, entity: &E) -> Result<()> {
        let key = self.key(entity.id())?;
        if self.read(&key).await?.is_none() {
            return Err(LedgerError::not_found(E::KIND, entity.id()));
        }
        self.write(&key, codec::encode(entity)?).await
    }

    /// Insert or overwrite
    pub async fn upsert(&self, entity: &E) -> Result<()> {
        let key = self.key(entity.id())?;
        self.write(&key, codec::encode(entity)?).await
    }

    /// Best effort: deleting an absent entity is not an error
    pub async fn delete(&self, id: &str) -> Result<()> {
        let key = self.key(id)?;
        match &self.partition {
            Partition::Public => self.store.delete_state(&key).await,
            Partition::Private(collection) => {
                self.store.delete_private_data(collection, &key).await
            }
        }
    }

    /// Every record in the namespace, in key order
    pub async fn get_all(&self) -> Result<Vec<QueryRecord<E>>> {
        let mut entries = self.scan();
        let mut records = Vec::new();

        while let Some(entry) = entries.next().await {
            let entry = entry?;
            let record = match codec::decode::<E>(&entry.key, &entry.value) {
                Ok(entity) => RecordValue::Entity(entity),
                Err(err) => {
                    log::warn!(
                        "keeping undecodable {} record as raw text: key='{}' error='{}'",
                        E::KIND,
                        entry.key,
                        err
                    );
                    RecordValue::Raw(String::from_utf8_lossy(&entry.value).into_owned())
                }
            };
            records.push(QueryRecord {
                key: entry.key,
                record,
            });
        }

        Ok(records)
    }

    /// Number of records in the namespace that decode
    pub async fn count(&self) -> Result<usize> {
        Ok(self.get_all().await?.iter().filter(|r| !r.is_raw()).count())
    }
}
