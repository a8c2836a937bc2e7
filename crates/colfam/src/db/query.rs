use crate::{
    db::{load::reconstruct, Db, ResolutionError},
    error::Error,
    gateway::{Column, GroupSlice},
    obs::sink::{self, ExecKind, MetricsEvent},
    traits::Entity,
    value::Value,
};
use std::marker::PhantomData;

///
/// RangePage
///
/// Raw result of a bounded range read. No object reconstruction is defined
/// for arbitrary-width group scans, so the page is returned as retrieved.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RangePage {
    Columns(Vec<Column>),
    Groups(Vec<GroupSlice>),
}

impl RangePage {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Columns(columns) => columns.len(),
            Self::Groups(groups) => groups.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// QueryExecutor
///

pub(crate) struct QueryExecutor<'a, E: Entity> {
    db: &'a Db,
    _marker: PhantomData<E>,
}

impl<'a, E: Entity> QueryExecutor<'a, E> {
    pub(crate) const fn new(db: &'a Db) -> Self {
        Self {
            db,
            _marker: PhantomData,
        }
    }

    /// Equality lookup through a secondary index, restricted to the
    /// retained column set. Reconstruction is lenient: sparse rows come
    /// back with zero-valued attributes, and the row key is assigned into
    /// the key attribute.
    pub(crate) fn by_property_value(
        &self,
        property: &str,
        value: &Value,
    ) -> Result<Vec<E>, Error> {
        sink::emit(&MetricsEvent::ExecStart {
            kind: ExecKind::Query,
            entity_path: E::PATH,
        });

        let result = self.by_property_value_inner(property, value);

        sink::emit(&MetricsEvent::ExecFinish {
            kind: ExecKind::Query,
            entity_path: E::PATH,
            rows: result.as_ref().map_or(0, |r| r.len() as u64),
            ok: result.is_ok(),
        });

        result
    }

    fn by_property_value_inner(&self, property: &str, value: &Value) -> Result<Vec<E>, Error> {
        let desc = self.db.registry().descriptor::<E>()?;

        // Usage errors fire before any query is issued.
        let fd = desc
            .field(property)
            .ok_or_else(|| ResolutionError::UnknownField {
                path: desc.path,
                field: property.to_string(),
            })?;
        if !fd.is_indexed() {
            return Err(ResolutionError::NotIndexed {
                path: desc.path,
                field: property.to_string(),
            }
            .into());
        }
        let column = fd
            .column_name
            .as_deref()
            .ok_or_else(|| ResolutionError::NotIndexed {
                path: desc.path,
                field: property.to_string(),
            })?;

        let encoded = self.db.codec().encode(value)?;
        let rows = self
            .db
            .gateway()
            .indexed_slice(
                &desc.storage_name,
                column,
                &encoded,
                &desc.retained_columns(),
            )
            .map_err(|e| Error::gateway("get-by-property-value", &desc.storage_name, e))?;

        self.db.debug_log(format!(
            "indexed query {}={value} on {} matched {} row(s)",
            column,
            E::PATH,
            rows.len()
        ));

        rows.iter().map(|row| reconstruct(self.db, &desc, row)).collect()
    }

    /// Bounded range read. Targets the inverse storage name when requested
    /// and declared; takes the grouped query shape when the descriptor has
    /// grouped columns.
    pub(crate) fn range(
        &self,
        id: &Value,
        inverse: bool,
        start: Option<&str>,
        count: usize,
    ) -> Result<RangePage, Error> {
        sink::emit(&MetricsEvent::ExecStart {
            kind: ExecKind::Query,
            entity_path: E::PATH,
        });

        let result = self.range_inner(id, inverse, start, count);

        sink::emit(&MetricsEvent::ExecFinish {
            kind: ExecKind::Query,
            entity_path: E::PATH,
            rows: result.as_ref().map_or(0, |page| page.len() as u64),
            ok: result.is_ok(),
        });

        result
    }

    fn range_inner(
        &self,
        id: &Value,
        inverse: bool,
        start: Option<&str>,
        count: usize,
    ) -> Result<RangePage, Error> {
        let desc = self.db.registry().descriptor::<E>()?;

        let storage = if inverse {
            desc.inverse_storage_name()
                .unwrap_or_else(|| desc.storage_name.clone())
        } else {
            desc.storage_name.clone()
        };
        let key = self.db.codec().encode(id)?;

        self.db.debug_log(format!(
            "range read on '{storage}' for {} (grouped={}, count={count})",
            E::PATH,
            desc.has_groups
        ));

        if desc.has_groups {
            let groups = self
                .db
                .gateway()
                .group_range_slice(&storage, &key, start, count)
                .map_err(|e| Error::gateway("get-range", &storage, e))?;
            Ok(RangePage::Groups(groups))
        } else {
            let columns = self
                .db
                .gateway()
                .range_slice(&storage, &key, start, count)
                .map_err(|e| Error::gateway("get-range", &storage, e))?;
            Ok(RangePage::Columns(columns))
        }
    }
}
