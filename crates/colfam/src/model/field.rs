use crate::value::FieldKind;

///
/// FieldDescriptor
///
/// Validated runtime metadata for one mapped attribute. Name defaulting has
/// already happened: exactly one of the literal/dynamic slots is populated
/// per mapped axis.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub column_name: Option<String>,
    pub column_name_field: Option<String>,
    pub group_name: Option<String>,
    pub group_name_field: Option<String>,
    pub group_parent: Option<String>,
    pub secondary_index: Option<String>,
}

impl FieldDescriptor {
    /// Whether this field is stored as a column group rather than flat.
    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        self.group_name.is_some() || self.group_name_field.is_some()
    }

    #[must_use]
    pub const fn is_indexed(&self) -> bool {
        self.secondary_index.is_some()
    }

    /// Whether this field emits an independently readable flat column with a
    /// name known at build time. Grouped and folded fields do not; neither
    /// do dynamically named columns.
    #[must_use]
    pub const fn has_static_column(&self) -> bool {
        self.column_name.is_some() && !self.is_grouped() && self.group_parent.is_none()
    }
}
