//! Storage gateway boundary.
//!
//! The engine owns no wire or disk format; everything below this trait is
//! the wide-column store client's concern, including retry, timeout, and
//! connection management.

pub mod memory;

pub use memory::MemoryGateway;

use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Encoded row key bytes.
pub type RowKey = Vec<u8>;

///
/// Column
///
/// One named column value.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Column {
    pub name: String,
    pub value: Vec<u8>,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

///
/// Mutation
///
/// One insertion within a batch: a flat column, or a whole column group.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mutation {
    Column(Column),
    Group { name: String, columns: Vec<Column> },
}

///
/// MutationBatch
///
/// All mutations for one key in one storage location, applied atomically.
/// The engine submits an entity's full flat + grouped column set as a
/// single batch; there is no partial-success state.
///

#[derive(Clone, Debug)]
pub struct MutationBatch {
    pub storage: String,
    pub key: RowKey,
    pub mutations: Vec<Mutation>,
}

impl MutationBatch {
    #[must_use]
    pub fn new(storage: impl Into<String>, key: RowKey) -> Self {
        Self {
            storage: storage.into(),
            key,
            mutations: Vec::new(),
        }
    }

    pub fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

///
/// RowSlice
///
/// One row returned by a slice query: its key and the requested columns
/// that were present.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RowSlice {
    pub key: RowKey,
    pub columns: BTreeMap<String, Vec<u8>>,
}

///
/// GroupSlice
///
/// One column group returned by a grouped range query.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupSlice {
    pub name: String,
    pub columns: Vec<Column>,
}

///
/// GatewayError
///

#[derive(Debug, ThisError)]
pub enum GatewayError {
    #[error("storage location unknown: {storage}")]
    UnknownStorage { storage: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend failure: {0}")]
    Backend(String),
}

///
/// StorageGateway
///
/// Capability set the engine consumes from the wide-column store client:
/// point reads, atomic per-key mutation batches, equality-indexed slices,
/// multi-key slices, and bounded range slices (flat and grouped).
///

pub trait StorageGateway: Send + Sync {
    /// Point read of one named column.
    fn read_column(
        &self,
        storage: &str,
        key: &[u8],
        column: &str,
    ) -> Result<Option<Vec<u8>>, GatewayError>;

    /// Apply one per-key mutation batch atomically.
    fn apply(&self, batch: MutationBatch) -> Result<(), GatewayError>;

    /// Equality query against a secondary index, restricted to a column set.
    fn indexed_slice(
        &self,
        storage: &str,
        column: &str,
        value: &[u8],
        columns: &[String],
    ) -> Result<Vec<RowSlice>, GatewayError>;

    /// Multi-key fetch restricted to a column set.
    fn multiget_slice(
        &self,
        storage: &str,
        keys: &[RowKey],
        columns: &[String],
    ) -> Result<Vec<RowSlice>, GatewayError>;

    /// Bounded flat-column range read starting at `start` (inclusive).
    fn range_slice(
        &self,
        storage: &str,
        key: &[u8],
        start: Option<&str>,
        count: usize,
    ) -> Result<Vec<Column>, GatewayError>;

    /// Bounded column-group range read starting at `start` (inclusive).
    fn group_range_slice(
        &self,
        storage: &str,
        key: &[u8],
        start: Option<&str>,
        count: usize,
    ) -> Result<Vec<GroupSlice>, GatewayError>;
}
