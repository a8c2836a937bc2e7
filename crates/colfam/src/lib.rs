//! Object-to-wide-column mapping engine: declarative metadata derivation
//! plus a runtime that persists and retrieves mapped entities against a
//! column-family store, with the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod gateway;
pub mod model;
pub mod obs;
pub mod serialize;
pub mod traits;
pub mod validate;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, gateways, serializers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::Db,
        model::def::{EntityDef, FieldDef, TypeToken},
        traits::{Entity, Record},
        value::{FieldKind, Value},
    };
}
