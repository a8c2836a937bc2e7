use crate::{
    db::ResolutionError,
    gateway::GatewayError,
    model::{build::MetadataError, registry::RegistryError},
    serialize::SerializeError,
    traits::AccessError,
    validate::ValidationError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error surface. Configuration errors come out of the builder
/// before the engine serves anything; the rest are per-call failures.
/// Gateway failures carry call context (operation, storage name); the
/// engine never retries.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{op} on '{storage}': {source}")]
    Gateway {
        op: &'static str,
        storage: String,
        source: GatewayError,
    },
}

impl Error {
    pub(crate) fn gateway(op: &'static str, storage: &str, source: GatewayError) -> Self {
        Self::Gateway {
            op,
            storage: storage.to_string(),
            source,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Resolution(ResolutionError::NotFound { .. }))
    }
}
