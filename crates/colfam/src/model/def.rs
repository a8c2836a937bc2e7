use crate::{traits::Entity, value::FieldKind};
use std::any::TypeId;

///
/// TypeToken
///
/// Opaque handle to a mapped type: runtime identity plus a stable path for
/// diagnostics. Dependent-key declarations reference their target through
/// this token.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TypeToken {
    pub id: TypeId,
    pub path: &'static str,
}

impl TypeToken {
    #[must_use]
    pub fn of<E: Entity>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            path: E::PATH,
        }
    }

    #[must_use]
    pub const fn new(id: TypeId, path: &'static str) -> Self {
        Self { id, path }
    }
}

///
/// StorageDef
///
/// Storage-location declaration. Its *presence* is what marks a type as
/// mapped; the name is optional and defaults to the lower-cased simple
/// type name.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StorageDef {
    pub name: Option<String>,
}

///
/// InverseDef
///
/// Declares the auxiliary inverse column family, named by suffixing the
/// primary storage name.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InverseDef {
    pub suffix: String,
}

///
/// ColumnDef / GroupDef / IndexDef
///
/// Per-field declarations. A `None` name takes the documented default
/// (field name for columns and groups, capitalized field name for indexes).
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ColumnDef {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GroupDef {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IndexDef {
    pub name: Option<String>,
}

///
/// FieldDef
///
/// One attribute's declaration set. Mutual exclusions (column vs group,
/// literal vs dynamic name) are *not* enforced here; the builder rejects
/// conflicting sets so misdeclarations fail loudly, never silently resolve.
///

#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub key: bool,
    pub dependent_key: Option<TypeToken>,
    pub column: Option<ColumnDef>,
    pub column_name_field: Option<String>,
    pub group: Option<GroupDef>,
    pub group_name_field: Option<String>,
    pub group_parent: Option<String>,
    pub secondary_index: Option<IndexDef>,
    pub inverse_column_name: bool,
}

impl FieldDef {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            key: false,
            dependent_key: None,
            column: None,
            column_name_field: None,
            group: None,
            group_name_field: None,
            group_parent: None,
            secondary_index: None,
            inverse_column_name: false,
        }
    }

    /// Mark this attribute as the primary key.
    #[must_use]
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Mark this attribute as a dependent key referencing another mapped type.
    #[must_use]
    pub const fn dependent_key(mut self, target: TypeToken) -> Self {
        self.dependent_key = Some(target);
        self
    }

    /// Map this attribute as a flat column, optionally with an explicit name.
    #[must_use]
    pub fn column(mut self, name: Option<&str>) -> Self {
        self.column = Some(ColumnDef {
            name: name.map(str::to_string),
        });
        self
    }

    /// Name the flat column dynamically from another attribute's value.
    #[must_use]
    pub fn column_name_field(mut self, field: &str) -> Self {
        self.column_name_field = Some(field.to_string());
        self
    }

    /// Map this attribute as a column group, optionally with an explicit name.
    #[must_use]
    pub fn group(mut self, name: Option<&str>) -> Self {
        self.group = Some(GroupDef {
            name: name.map(str::to_string),
        });
        self
    }

    /// Name the column group dynamically from another attribute's value.
    #[must_use]
    pub fn group_name_field(mut self, field: &str) -> Self {
        self.group_name_field = Some(field.to_string());
        self
    }

    /// Fold this column into the group declared by the named field.
    #[must_use]
    pub fn group_parent(mut self, field: &str) -> Self {
        self.group_parent = Some(field.to_string());
        self
    }

    /// Make this attribute equality-queryable through a secondary index.
    #[must_use]
    pub fn indexed(mut self, name: Option<&str>) -> Self {
        self.secondary_index = Some(IndexDef {
            name: name.map(str::to_string),
        });
        self
    }

    /// Designate this attribute as the inverse-index column name source.
    #[must_use]
    pub const fn inverse_column_name(mut self) -> Self {
        self.inverse_column_name = true;
        self
    }
}

///
/// EntityDef
///
/// One mapped type's full declaration set: the Rust analogue of a class
/// carrying storage, key, column, group, index, and inverse annotations.
///

#[derive(Clone, Debug)]
pub struct EntityDef {
    /// Simple type name; the storage-name default derives from it.
    pub type_name: &'static str,
    pub storage: Option<StorageDef>,
    pub inverse: Option<InverseDef>,
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    #[must_use]
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            storage: None,
            inverse: None,
            fields: Vec::new(),
        }
    }

    /// Declare the storage location, optionally with an explicit name.
    #[must_use]
    pub fn storage(mut self, name: Option<&str>) -> Self {
        self.storage = Some(StorageDef {
            name: name.map(str::to_string),
        });
        self
    }

    /// Declare the inverse column family with the given suffix.
    #[must_use]
    pub fn inverse(mut self, suffix: &str) -> Self {
        self.inverse = Some(InverseDef {
            suffix: suffix.to_string(),
        });
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }
}
