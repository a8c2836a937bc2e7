use crate::{
    model::{def::TypeToken, field::FieldDescriptor},
    value::FieldKind,
};
use std::{any::TypeId, collections::BTreeMap};

///
/// InverseDescriptor
///
/// Resolved shape of the auxiliary inverse column family: which attribute
/// supplies the dynamic index key, and which single field supplies the
/// value half (the pass-2 invariant guarantees exactly one candidate).
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InverseDescriptor {
    pub suffix: String,
    pub column_name_field: String,
    pub value_field: String,
}

///
/// EntityDescriptor
///
/// Validated runtime metadata for one mapped type. Built once by the
/// two-pass builder, immutable afterwards, shared read-only by every
/// engine call.
///

#[derive(Clone, Debug)]
pub struct EntityDescriptor {
    pub type_id: TypeId,
    pub path: &'static str,
    pub storage_name: String,
    pub key_field: String,
    pub key_kind: FieldKind,
    pub dependent_key: bool,
    pub dependent_target: Option<TypeToken>,
    /// Key field name on the referenced entity; filled in during pass 2.
    pub dependent_key_field: Option<String>,
    pub has_groups: bool,
    pub inverse: Option<InverseDescriptor>,
    pub fields: BTreeMap<String, FieldDescriptor>,
}

impl EntityDescriptor {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Storage name of the inverse column family, when declared.
    #[must_use]
    pub fn inverse_storage_name(&self) -> Option<String> {
        self.inverse
            .as_ref()
            .map(|inv| format!("{}{}", self.storage_name, inv.suffix))
    }

    /// Statically named flat columns; the set slice queries are restricted
    /// to, so arbitrary extra columns at a key are never fetched.
    #[must_use]
    pub fn retained_columns(&self) -> Vec<String> {
        self.fields
            .values()
            .filter(|fd| fd.has_static_column())
            .filter_map(|fd| fd.column_name.clone())
            .collect()
    }

    /// Fields readable as statically named flat columns.
    pub fn static_flat_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values().filter(|fd| fd.has_static_column())
    }
}
