use crate::{
    db::{Db, ResolutionError},
    error::Error,
    gateway::{Column, Mutation, MutationBatch},
    model::{entity::EntityDescriptor, field::FieldDescriptor},
    obs::sink::{self, ExecKind, MetricsEvent},
    traits::{Entity, Record},
    validate::ValidationError,
    value::{FieldKind, Value},
};
use std::{collections::BTreeMap, marker::PhantomData};
use ulid::Ulid;

///
/// SaveExecutor
///

pub(crate) struct SaveExecutor<'a, E: Entity> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<'a, E: Entity> SaveExecutor<'a, E> {
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    pub(crate) fn persist(&self, mut entity: E) -> Result<E, Error> {
        sink::emit(&MetricsEvent::ExecStart {
            kind: ExecKind::Persist,
            entity_path: E::PATH,
        });

        let result = self.persist_inner(&mut entity);

        sink::emit(&MetricsEvent::ExecFinish {
            kind: ExecKind::Persist,
            entity_path: E::PATH,
            rows: u64::from(result.is_ok()),
            ok: result.is_ok(),
        });

        result.map(|()| entity)
    }

    fn persist_inner(&self, entity: &mut E) -> Result<(), Error> {
        let desc = self.db.registry().descriptor::<E>()?;

        let violations = self.db.validator().validate(entity);
        if !violations.is_empty() {
            return Err(ValidationError { violations }.into());
        }

        let key = match resolve_key(entity, &desc)? {
            Some(key) => key,
            None => {
                let key = generate_key(&desc)?;
                self.db
                    .debug_log(format!("inserting new {} under key {key}", E::PATH));
                if !desc.dependent_key {
                    entity.set(&desc.key_field, key.clone())?;
                }
                key
            }
        };
        let key_bytes = self.db.codec().encode(&key)?;

        let mut batch = MutationBatch::new(desc.storage_name.clone(), key_bytes.clone());
        let mut groups: BTreeMap<String, Vec<Column>> = BTreeMap::new();

        for fd in desc.fields.values() {
            // The store rejects null values; unset attributes become empty bytes.
            let bytes = match entity.get(&fd.name) {
                Some(value) => self.db.codec().encode(&value)?,
                None => Vec::new(),
            };

            if fd.is_grouped() {
                let group = resolve_group_name(entity, &desc, fd)?;
                groups
                    .entry(group)
                    .or_default()
                    .push(Column::new(fd.name.clone(), bytes));
            } else if let Some(parent) = &fd.group_parent {
                // Folded into its parent group; no independent column.
                let parent_fd =
                    desc.field(parent)
                        .ok_or_else(|| ResolutionError::UnknownField {
                            path: desc.path,
                            field: parent.clone(),
                        })?;
                let group = resolve_group_name(entity, &desc, parent_fd)?;
                let name = resolve_column_name(entity, &desc, fd)?;
                groups
                    .entry(group)
                    .or_default()
                    .push(Column::new(name, bytes));
            } else {
                let name = resolve_column_name(entity, &desc, fd)?;
                batch.push(Mutation::Column(Column::new(name, bytes)));
            }
        }

        for (name, columns) in groups {
            batch.push(Mutation::Group { name, columns });
        }

        self.db.debug_log(format!(
            "persisting {} mutation(s) for {} into '{}'",
            batch.mutations.len(),
            E::PATH,
            desc.storage_name
        ));
        self.db
            .gateway()
            .apply(batch)
            .map_err(|e| Error::gateway("persist", &desc.storage_name, e))?;

        self.maintain_inverse(entity, &desc, key_bytes)
    }

    /// Write the single inverse column: keyed by the primary key, named by
    /// the dynamic index key, valued by the resolved group or column name.
    ///
    /// Runs after the primary write; a failure here leaves the primary row
    /// in place with a stale or absent inverse entry, and no compensation
    /// is attempted.
    fn maintain_inverse(
        &self,
        entity: &E,
        desc: &EntityDescriptor,
        key_bytes: Vec<u8>,
    ) -> Result<(), Error> {
        let Some(inv) = &desc.inverse else {
            return Ok(());
        };
        let storage = format!("{}{}", desc.storage_name, inv.suffix);

        let index_key = entity
            .get(&inv.column_name_field)
            .and_then(|v| v.as_name())
            .ok_or_else(|| ResolutionError::InverseNameUnset {
                path: desc.path,
                field: inv.column_name_field.clone(),
            })?;

        let value_fd =
            desc.field(&inv.value_field)
                .ok_or_else(|| ResolutionError::UnknownField {
                    path: desc.path,
                    field: inv.value_field.clone(),
                })?;
        let value_name = if value_fd.is_grouped() {
            resolve_group_name(entity, desc, value_fd)?
        } else {
            resolve_column_name(entity, desc, value_fd)?
        };

        let mut batch = MutationBatch::new(storage.clone(), key_bytes);
        batch.push(Mutation::Column(Column::new(
            index_key,
            value_name.into_bytes(),
        )));

        self.db
            .gateway()
            .apply(batch)
            .map_err(|e| Error::gateway("persist-inverse", &storage, e))
    }
}

/// Read the entity's key, transiting through the dependee for dependent
/// keys. `None` means the key is unset and a fresh one must be generated;
/// an unset dependee key is a hard error, never an auto-persist.
fn resolve_key(entity: &dyn Record, desc: &EntityDescriptor) -> Result<Option<Value>, Error> {
    if !desc.dependent_key {
        return Ok(entity.get(&desc.key_field));
    }

    let field = desc
        .dependent_key_field
        .as_deref()
        .ok_or(ResolutionError::UnresolvedDependentKey { path: desc.path })?;
    let dependee =
        entity
            .dependee(&desc.key_field)
            .ok_or_else(|| ResolutionError::DependeeUnset {
                path: desc.path,
                field: desc.key_field.clone(),
            })?;
    let key = dependee
        .get(field)
        .ok_or_else(|| ResolutionError::DependeeUnset {
            path: desc.path,
            field: desc.key_field.clone(),
        })?;

    Ok(Some(key))
}

fn generate_key(desc: &EntityDescriptor) -> Result<Value, Error> {
    match desc.key_kind {
        FieldKind::Ulid => Ok(Value::Ulid(Ulid::new())),
        FieldKind::Text => Ok(Value::Text(Ulid::new().to_string())),
        kind => Err(ResolutionError::KeyGeneration {
            path: desc.path,
            kind,
        }
        .into()),
    }
}

/// Literal column name, or the value of the name field on the same instance.
pub(crate) fn resolve_column_name(
    entity: &dyn Record,
    desc: &EntityDescriptor,
    fd: &FieldDescriptor,
) -> Result<String, Error> {
    if let Some(name) = &fd.column_name {
        return Ok(name.clone());
    }

    let field = fd
        .column_name_field
        .as_deref()
        .ok_or_else(|| ResolutionError::DynamicName {
            path: desc.path,
            field: fd.name.clone(),
        })?;

    entity
        .get(field)
        .and_then(|v| v.as_name())
        .ok_or_else(|| {
            ResolutionError::DynamicName {
                path: desc.path,
                field: field.to_string(),
            }
            .into()
        })
}

/// Literal group name, or the value of the name field on the same instance.
pub(crate) fn resolve_group_name(
    entity: &dyn Record,
    desc: &EntityDescriptor,
    fd: &FieldDescriptor,
) -> Result<String, Error> {
    if let Some(name) = &fd.group_name {
        return Ok(name.clone());
    }

    let field = fd
        .group_name_field
        .as_deref()
        .ok_or_else(|| ResolutionError::DynamicName {
            path: desc.path,
            field: fd.name.clone(),
        })?;

    entity
        .get(field)
        .and_then(|v| v.as_name())
        .ok_or_else(|| {
            ResolutionError::DynamicName {
                path: desc.path,
                field: field.to_string(),
            }
            .into()
        })
}
