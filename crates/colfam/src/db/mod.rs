pub mod load;
pub mod query;
pub mod save;

pub use query::RangePage;

use crate::{
    error::Error,
    gateway::StorageGateway,
    model::registry::Registry,
    serialize::{CborCodec, Codec},
    traits::Entity,
    validate::{AcceptAll, Validator},
    value::{FieldKind, Value},
};
use load::LoadExecutor;
use query::QueryExecutor;
use save::SaveExecutor;
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// ResolutionError
///
/// Per-call failures resolving keys, names, or columns against the
/// descriptor set. None are silently swallowed; the one documented
/// exception is lenient reconstruction of sparse index rows.
///

#[derive(Debug, ThisError)]
pub enum ResolutionError {
    #[error("not found: {path} key={key}")]
    NotFound { path: &'static str, key: String },

    #[error("missing mapped column '{column}': {path} key={key}")]
    MissingColumn {
        path: &'static str,
        column: String,
        key: String,
    },

    #[error("the dependee of a dependent key must be set: {path}.{field}")]
    DependeeUnset { path: &'static str, field: String },

    #[error("dependent key is unresolved: {path}")]
    UnresolvedDependentKey { path: &'static str },

    #[error("no secondary index defined for this property: {path}.{field}")]
    NotIndexed { path: &'static str, field: String },

    #[error("unknown mapped property: {path}.{field}")]
    UnknownField { path: &'static str, field: String },

    #[error("dynamic name field '{field}' yields no usable name: {path}")]
    DynamicName { path: &'static str, field: String },

    #[error("inverse column-name field '{field}' is unset: {path}")]
    InverseNameUnset { path: &'static str, field: String },

    #[error("cannot generate a key of kind {kind}: {path}")]
    KeyGeneration { path: &'static str, kind: FieldKind },
}

///
/// Db
///
/// The mapping engine: a handle over the immutable descriptor set and the
/// injected gateway, codec, and validator capabilities. Every operation is
/// one synchronous call; the handle holds no other shared mutable state
/// and is safe to clone across threads.
///

#[derive(Clone)]
pub struct Db {
    registry: Arc<Registry>,
    gateway: Arc<dyn StorageGateway>,
    codec: Arc<dyn Codec>,
    validator: Arc<dyn Validator>,
    debug: bool,
}

impl Db {
    #[must_use]
    pub fn new(registry: Registry, gateway: Arc<dyn StorageGateway>) -> Self {
        Self {
            registry: Arc::new(registry),
            gateway,
            codec: Arc::new(CborCodec),
            validator: Arc::new(AcceptAll),
            debug: false,
        }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    /// Enable `[debug]` summaries on stdout.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    // ======================================================================
    // Public operation surface
    // ======================================================================

    /// Persist one entity: validate, resolve (or generate) its key, write
    /// the full retained column set as one batch, then maintain the inverse
    /// index. Always an upsert; the full attribute set overwrites the key.
    pub fn persist<E: Entity>(&self, entity: E) -> Result<E, Error> {
        SaveExecutor::<E>::new(self).persist(entity)
    }

    /// Strict point lookup by key.
    pub fn get_by_id<E: Entity>(&self, id: &Value) -> Result<E, Error> {
        LoadExecutor::<E>::new(self).by_id(id)
    }

    /// Equality lookup through a secondary index.
    pub fn get_by_property_value<E: Entity>(
        &self,
        property: &str,
        value: &Value,
    ) -> Result<Vec<E>, Error> {
        QueryExecutor::<E>::new(self).by_property_value(property, value)
    }

    /// Multi-key batch fetch.
    pub fn get_list<E: Entity>(&self, ids: &[Value]) -> Result<Vec<E>, Error> {
        LoadExecutor::<E>::new(self).by_ids(ids)
    }

    /// Bounded range read against the primary or inverse storage location.
    pub fn get_range<E: Entity>(
        &self,
        id: &Value,
        inverse: bool,
        start: Option<&str>,
        count: usize,
    ) -> Result<RangePage, Error> {
        QueryExecutor::<E>::new(self).range(id, inverse, start, count)
    }

    // ======================================================================
    // Internal accessors
    // ======================================================================

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn gateway(&self) -> &dyn StorageGateway {
        self.gateway.as_ref()
    }

    pub(crate) fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    pub(crate) fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    pub(crate) fn debug_log(&self, s: impl AsRef<str>) {
        if self.debug {
            println!("[debug] {}", s.as_ref());
        }
    }
}
