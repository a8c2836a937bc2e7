use crate::{
    model::def::EntityDef,
    value::{FieldKind, Value},
};
use std::any::Any;
use thiserror::Error as ThisError;

///
/// AccessError
///

#[derive(Debug, ThisError)]
pub enum AccessError {
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("field '{field}' rejects value kind {found}, expects {expected}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },
}

///
/// Record
///
/// Object-safe accessor table over one mapped instance. Replaces by-name
/// reflection: each entity supplies typed get/set functions resolved once,
/// not string-dispatched property lookups at every call.
///
/// `get` returns `None` when the attribute is unset; the engine writes an
/// empty byte value in that case because the store rejects nulls.
///

pub trait Record: Any {
    fn get(&self, field: &str) -> Option<Value>;

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError>;

    /// Borrow the mapped entity referenced by a dependent-key attribute.
    ///
    /// Default is `None`; only entities whose key transits through another
    /// mapped entity override this.
    fn dependee(&self, field: &str) -> Option<&dyn Record> {
        let _ = field;
        None
    }
}

///
/// Entity
///
/// A mapped type: carries its declaration set ([`EntityDef`]) and a stable
/// path for registry diagnostics. `Default` provides the zero-valued
/// instance reconstruction starts from.
///

pub trait Entity: Record + Default + Clone + 'static {
    /// Fully-qualified type path (for dispatch and diagnostics).
    const PATH: &'static str;

    /// The declaration set consumed by the metadata builder.
    fn def() -> EntityDef;
}
