use crate::{
    model::{
        def::{EntityDef, InverseDef, TypeToken},
        entity::{EntityDescriptor, InverseDescriptor},
        field::FieldDescriptor,
        registry::Registry,
    },
    traits::Entity,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error as ThisError;

///
/// MetadataError
///
/// Configuration errors raised while deriving descriptors. All are fatal:
/// the engine must not start serving with an invalid descriptor set.
///

#[derive(Debug, ThisError)]
pub enum MetadataError {
    #[error("type carries no storage declaration: {path}")]
    MissingStorage { path: &'static str },

    #[error("type declares no key attribute: {path}")]
    MissingKey { path: &'static str },

    #[error("duplicate key declaration: {path}.{field}")]
    DuplicateKey { path: &'static str, field: String },

    #[error("dependent key must reference a mapped type: {path}.{field} -> {target}")]
    DependentKeyUnmapped {
        path: &'static str,
        field: String,
        target: &'static str,
    },

    #[error("no descriptor for dependent-key target: {path} -> {target}")]
    DependentKeyUnresolved {
        path: &'static str,
        target: &'static str,
    },

    #[error("field maps both a flat column and a column group: {path}.{field}")]
    ConflictingAxes { path: &'static str, field: String },

    #[error("field declares both a literal and a dynamic column name: {path}.{field}")]
    ConflictingColumnName { path: &'static str, field: String },

    #[error("field declares both a literal and a dynamic group name: {path}.{field}")]
    ConflictingGroupName { path: &'static str, field: String },

    #[error("secondary index requires a literal column name: {path}.{field}")]
    IndexRequiresLiteralColumn { path: &'static str, field: String },

    #[error("more than one inverse column-name field: {path}.{field}")]
    DuplicateInverseName { path: &'static str, field: String },

    #[error("group parent does not name a group field: {path}.{field} -> {parent}")]
    UnknownGroupParent {
        path: &'static str,
        field: String,
        parent: String,
    },

    #[error(
        "inverse allows one group field, or one flat field when no group exists: \
         {path} has {groups} group field(s) and {flats} flat field(s)"
    )]
    InverseFieldCount {
        path: &'static str,
        groups: usize,
        flats: usize,
    },

    #[error("inverse requires a designated column-name field: {path}")]
    InverseNameFieldMissing { path: &'static str },

    #[error("inverse requires a column or group field as its value source: {path}")]
    InverseValueSourceMissing { path: &'static str },
}

///
/// RegistryBuilder
///
/// Two-pass metadata derivation. Each descriptor is built into a local
/// structure; the whole set is committed atomically into an immutable
/// [`Registry`], so no partially-built descriptor is ever visible.
///

#[derive(Default)]
pub struct RegistryBuilder {
    defs: Vec<(TypeToken, EntityDef)>,
}

/// Pass-1 output: a descriptor plus the raw inverse declarations that
/// pass 2 still has to validate and resolve.
struct Scanned {
    desc: EntityDescriptor,
    inverse: Option<InverseDef>,
    inverse_name_field: Option<String>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapped entity type, taking its declaration set from the trait.
    #[must_use]
    pub fn register<E: Entity>(self) -> Self {
        self.register_def(TypeToken::of::<E>(), E::def())
    }

    /// Register a declaration set directly (e.g. loaded from configuration).
    #[must_use]
    pub fn register_def(mut self, token: TypeToken, def: EntityDef) -> Self {
        self.defs.push((token, def));
        self
    }

    /// Derive and commit the descriptor set.
    pub fn build(self) -> Result<Registry, MetadataError> {
        let candidates: HashSet<_> = self.defs.iter().map(|(token, _)| token.id).collect();

        // Pass 1: per type, independent of every other type.
        let mut scanned = Vec::with_capacity(self.defs.len());
        for (token, def) in self.defs {
            scanned.push(scan(token, &def, &candidates)?);
        }

        // Pass 2 needs the key shape of every descriptor, including ones
        // scanned after the referencing type.
        let key_shapes: HashMap<_, _> = scanned
            .iter()
            .map(|s| {
                (
                    s.desc.type_id,
                    (s.desc.key_field.clone(), s.desc.key_kind),
                )
            })
            .collect();

        let mut descriptors = Vec::with_capacity(scanned.len());
        for s in scanned {
            descriptors.push(resolve(s, &key_shapes)?);
        }

        Ok(Registry::commit(descriptors))
    }
}

/// Pass 1: validate one declaration set and derive its descriptor.
fn scan(
    token: TypeToken,
    def: &EntityDef,
    candidates: &HashSet<std::any::TypeId>,
) -> Result<Scanned, MetadataError> {
    let path = token.path;

    let storage = def
        .storage
        .as_ref()
        .ok_or(MetadataError::MissingStorage { path })?;
    let storage_name = match storage.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => def.type_name.to_lowercase(),
    };

    let mut key: Option<(String, crate::value::FieldKind, Option<TypeToken>)> = None;
    let mut inverse_name_field: Option<String> = None;
    let mut fields = BTreeMap::new();
    let mut has_groups = false;

    for fd in &def.fields {
        if fd.inverse_column_name {
            if inverse_name_field.is_some() {
                return Err(MetadataError::DuplicateInverseName {
                    path,
                    field: fd.name.to_string(),
                });
            }
            inverse_name_field = Some(fd.name.to_string());
        }

        if fd.key || fd.dependent_key.is_some() {
            if key.is_some() {
                return Err(MetadataError::DuplicateKey {
                    path,
                    field: fd.name.to_string(),
                });
            }
            if let Some(target) = fd.dependent_key
                && !candidates.contains(&target.id)
            {
                return Err(MetadataError::DependentKeyUnmapped {
                    path,
                    field: fd.name.to_string(),
                    target: target.path,
                });
            }
            key = Some((fd.name.to_string(), fd.kind, fd.dependent_key));
            // Key attributes are never retained as columns; any further
            // declarations on them are ignored.
            continue;
        }

        let column_axis = fd.column.is_some() || fd.column_name_field.is_some();
        let group_axis = fd.group.is_some() || fd.group_name_field.is_some();

        if column_axis && group_axis {
            return Err(MetadataError::ConflictingAxes {
                path,
                field: fd.name.to_string(),
            });
        }
        if fd.column.is_some() && fd.column_name_field.is_some() {
            return Err(MetadataError::ConflictingColumnName {
                path,
                field: fd.name.to_string(),
            });
        }
        if fd.group.is_some() && fd.group_name_field.is_some() {
            return Err(MetadataError::ConflictingGroupName {
                path,
                field: fd.name.to_string(),
            });
        }

        let secondary_index = match &fd.secondary_index {
            Some(idx) => {
                if fd.column.is_none() {
                    return Err(MetadataError::IndexRequiresLiteralColumn {
                        path,
                        field: fd.name.to_string(),
                    });
                }
                Some(match idx.name.as_deref() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => capitalize(fd.name),
                })
            }
            None => None,
        };

        let column_name = fd.column.as_ref().map(|c| match c.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fd.name.to_string(),
        });
        let group_name = fd.group.as_ref().map(|g| match g.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fd.name.to_string(),
        });

        has_groups |= group_axis;

        // Retention rule: plain unannotated attributes are not mapped.
        if !column_axis && !group_axis {
            continue;
        }

        fields.insert(
            fd.name.to_string(),
            FieldDescriptor {
                name: fd.name.to_string(),
                kind: fd.kind,
                column_name,
                column_name_field: fd.column_name_field.clone(),
                group_name,
                group_name_field: fd.group_name_field.clone(),
                group_parent: fd.group_parent.clone(),
                secondary_index,
            },
        );
    }

    let (key_field, key_kind, dependent_target) =
        key.ok_or(MetadataError::MissingKey { path })?;

    Ok(Scanned {
        desc: EntityDescriptor {
            type_id: token.id,
            path,
            storage_name,
            key_field,
            key_kind,
            dependent_key: dependent_target.is_some(),
            dependent_target,
            dependent_key_field: None,
            has_groups,
            inverse: None,
            fields,
        },
        inverse: def.inverse.clone(),
        inverse_name_field,
    })
}

/// Pass 2: resolve cross-entity key dependencies and the inverse shape.
fn resolve(
    scanned: Scanned,
    key_shapes: &HashMap<std::any::TypeId, (String, crate::value::FieldKind)>,
) -> Result<EntityDescriptor, MetadataError> {
    let Scanned {
        mut desc,
        inverse,
        inverse_name_field,
    } = scanned;

    if let Some(target) = desc.dependent_target {
        let (key_field, key_kind) =
            key_shapes
                .get(&target.id)
                .ok_or(MetadataError::DependentKeyUnresolved {
                    path: desc.path,
                    target: target.path,
                })?;
        desc.dependent_key_field = Some(key_field.clone());
        desc.key_kind = *key_kind;
    }

    for fd in desc.fields.values() {
        if let Some(parent) = &fd.group_parent {
            let ok = desc
                .fields
                .get(parent)
                .is_some_and(FieldDescriptor::is_grouped);
            if !ok {
                return Err(MetadataError::UnknownGroupParent {
                    path: desc.path,
                    field: fd.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    if let Some(inv) = inverse {
        let groups = desc.fields.values().filter(|fd| fd.is_grouped()).count();
        let flats = desc.fields.len() - groups;

        // One group field defines the inverse value, or one flat field when
        // no group exists. More of either kind leaves the value half of the
        // key/column/value triple ambiguous.
        if groups > 1 || (groups == 0 && flats > 1) {
            return Err(MetadataError::InverseFieldCount {
                path: desc.path,
                groups,
                flats,
            });
        }

        let column_name_field =
            inverse_name_field.ok_or(MetadataError::InverseNameFieldMissing { path: desc.path })?;

        let value_field = desc
            .fields
            .values()
            .find(|fd| fd.is_grouped())
            .or_else(|| desc.fields.values().next())
            .map(|fd| fd.name.clone())
            .ok_or(MetadataError::InverseValueSourceMissing { path: desc.path })?;

        desc.inverse = Some(InverseDescriptor {
            suffix: inv.suffix,
            column_name_field,
            value_field,
        });
    }

    Ok(desc)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
