use crate::{
    db::{Db, ResolutionError},
    error::Error,
    gateway::RowSlice,
    model::entity::EntityDescriptor,
    obs::sink::{self, ExecKind, MetricsEvent},
    traits::Entity,
    value::Value,
};
use std::marker::PhantomData;

///
/// LoadExecutor
///

pub(crate) struct LoadExecutor<'a, E: Entity> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<'a, E: Entity> LoadExecutor<'a, E> {
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    /// Strict point lookup: every statically named column must be present.
    /// No partial objects are returned. A descriptor whose fields are all
    /// grouped, folded, or dynamically named exposes no readable column, so
    /// existence can never be established and every lookup is `NotFound`.
    pub(crate) fn by_id(&self, id: &Value) -> Result<E, Error> {
        sink::emit(&MetricsEvent::ExecStart {
            kind: ExecKind::Load,
            entity_path: E::PATH,
        });

        let result = self.by_id_inner(id);

        sink::emit(&MetricsEvent::ExecFinish {
            kind: ExecKind::Load,
            entity_path: E::PATH,
            rows: u64::from(result.is_ok()),
            ok: result.is_ok(),
        });

        result
    }

    fn by_id_inner(&self, id: &Value) -> Result<E, Error> {
        let desc = self.db.registry().descriptor::<E>()?;
        let key = self.db.codec().encode(id)?;

        let mut entity = E::default();
        let mut found = 0usize;
        let mut missing: Vec<&str> = Vec::new();

        for fd in desc.static_flat_fields() {
            let Some(name) = fd.column_name.as_deref() else {
                continue;
            };
            let column = self
                .db
                .gateway()
                .read_column(&desc.storage_name, &key, name)
                .map_err(|e| Error::gateway("get-by-id", &desc.storage_name, e))?;

            match column {
                Some(bytes) => {
                    found += 1;
                    // Empty bytes encode an unset attribute; the zero value stands.
                    if !bytes.is_empty() {
                        let value = self.db.codec().decode(&bytes, fd.kind)?;
                        entity.set(&fd.name, value)?;
                    }
                }
                None => missing.push(name),
            }
        }

        if found == 0 {
            return Err(ResolutionError::NotFound {
                path: desc.path,
                key: id.to_string(),
            }
            .into());
        }
        if let Some(column) = missing.first() {
            return Err(ResolutionError::MissingColumn {
                path: desc.path,
                column: (*column).to_string(),
                key: id.to_string(),
            }
            .into());
        }

        if !desc.dependent_key {
            entity.set(&desc.key_field, id.clone())?;
        }

        Ok(entity)
    }

    /// Multi-key batch fetch with lenient reconstruction.
    pub(crate) fn by_ids(&self, ids: &[Value]) -> Result<Vec<E>, Error> {
        sink::emit(&MetricsEvent::ExecStart {
            kind: ExecKind::Load,
            entity_path: E::PATH,
        });

        let result = self.by_ids_inner(ids);

        sink::emit(&MetricsEvent::ExecFinish {
            kind: ExecKind::Load,
            entity_path: E::PATH,
            rows: result.as_ref().map_or(0, |r| r.len() as u64),
            ok: result.is_ok(),
        });

        result
    }

    fn by_ids_inner(&self, ids: &[Value]) -> Result<Vec<E>, Error> {
        let desc = self.db.registry().descriptor::<E>()?;

        let keys = ids
            .iter()
            .map(|id| self.db.codec().encode(id))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .db
            .gateway()
            .multiget_slice(&desc.storage_name, &keys, &desc.retained_columns())
            .map_err(|e| Error::gateway("get-list", &desc.storage_name, e))?;

        self.db.debug_log(format!(
            "multiget for {} returned {} of {} row(s)",
            E::PATH,
            rows.len(),
            keys.len()
        ));

        rows.iter().map(|row| reconstruct(self.db, &desc, row)).collect()
    }
}

/// Rebuild one instance from a row slice.
///
/// Lenient by design: a missing column leaves the attribute at its zero
/// value, since index and multiget rows may be sparser than point reads.
/// The row key is assigned into the key attribute (dependent keys hold an
/// entity reference, which a key value cannot reconstruct, so those are
/// left unset).
pub(crate) fn reconstruct<E: Entity>(
    db: &Db,
    desc: &EntityDescriptor,
    row: &RowSlice,
) -> Result<E, Error> {
    let mut entity = E::default();

    for fd in desc.static_flat_fields() {
        let Some(name) = fd.column_name.as_deref() else {
            continue;
        };
        let Some(bytes) = row.columns.get(name) else {
            continue;
        };
        if bytes.is_empty() {
            continue;
        }

        let value = db.codec().decode(bytes, fd.kind)?;
        entity.set(&fd.name, value)?;
    }

    if !desc.dependent_key {
        let key = db.codec().decode(&row.key, desc.key_kind)?;
        entity.set(&desc.key_field, key)?;
    }

    Ok(entity)
}
