use crate::gateway::{
    Column, GatewayError, GroupSlice, Mutation, MutationBatch, RowKey, RowSlice, StorageGateway,
};
use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{Mutex, PoisonError},
};

///
/// Row
///

#[derive(Clone, Debug, Default)]
struct Row {
    columns: BTreeMap<String, Vec<u8>>,
    groups: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
}

type Family = BTreeMap<RowKey, Row>;

///
/// MemoryGateway
///
/// In-process gateway over ordered maps. Storage locations are created
/// implicitly on first write; the indexed slice is a linear scan. Intended
/// for tests and embedded use, not as a store.
///

#[derive(Debug, Default)]
pub struct MemoryGateway {
    families: Mutex<BTreeMap<String, Family>>,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_families<R>(&self, f: impl FnOnce(&mut BTreeMap<String, Family>) -> R) -> R {
        let mut families = self
            .families
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut families)
    }

    /// Test inspection: one flat column value.
    #[must_use]
    pub fn column(&self, storage: &str, key: &[u8], column: &str) -> Option<Vec<u8>> {
        self.with_families(|families| {
            families
                .get(storage)?
                .get(key)?
                .columns
                .get(column)
                .cloned()
        })
    }

    /// Test inspection: one column group's members.
    #[must_use]
    pub fn group(&self, storage: &str, key: &[u8], group: &str) -> Option<BTreeMap<String, Vec<u8>>> {
        self.with_families(|families| families.get(storage)?.get(key)?.groups.get(group).cloned())
    }

    /// Test inspection: number of rows in a storage location.
    #[must_use]
    pub fn row_count(&self, storage: &str) -> usize {
        self.with_families(|families| families.get(storage).map_or(0, BTreeMap::len))
    }

    fn restrict(row: &Row, key: &[u8], columns: &[String]) -> RowSlice {
        let columns = columns
            .iter()
            .filter_map(|name| {
                row.columns
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();

        RowSlice {
            key: key.to_vec(),
            columns,
        }
    }
}

impl StorageGateway for MemoryGateway {
    fn read_column(
        &self,
        storage: &str,
        key: &[u8],
        column: &str,
    ) -> Result<Option<Vec<u8>>, GatewayError> {
        Ok(self.column(storage, key, column))
    }

    fn apply(&self, batch: MutationBatch) -> Result<(), GatewayError> {
        self.with_families(|families| {
            let row = families
                .entry(batch.storage)
                .or_default()
                .entry(batch.key)
                .or_default();

            for mutation in batch.mutations {
                match mutation {
                    Mutation::Column(column) => {
                        row.columns.insert(column.name, column.value);
                    }
                    Mutation::Group { name, columns } => {
                        let group = row.groups.entry(name).or_default();
                        for column in columns {
                            group.insert(column.name, column.value);
                        }
                    }
                }
            }
        });

        Ok(())
    }

    fn indexed_slice(
        &self,
        storage: &str,
        column: &str,
        value: &[u8],
        columns: &[String],
    ) -> Result<Vec<RowSlice>, GatewayError> {
        Ok(self.with_families(|families| {
            families.get(storage).map_or_else(Vec::new, |family| {
                family
                    .iter()
                    .filter(|(_, row)| row.columns.get(column).is_some_and(|v| v == value))
                    .map(|(key, row)| Self::restrict(row, key, columns))
                    .collect()
            })
        }))
    }

    fn multiget_slice(
        &self,
        storage: &str,
        keys: &[RowKey],
        columns: &[String],
    ) -> Result<Vec<RowSlice>, GatewayError> {
        Ok(self.with_families(|families| {
            families.get(storage).map_or_else(Vec::new, |family| {
                keys.iter()
                    .filter_map(|key| family.get(key).map(|row| Self::restrict(row, key, columns)))
                    .collect()
            })
        }))
    }

    fn range_slice(
        &self,
        storage: &str,
        key: &[u8],
        start: Option<&str>,
        count: usize,
    ) -> Result<Vec<Column>, GatewayError> {
        Ok(self.with_families(|families| {
            let Some(row) = families.get(storage).and_then(|family| family.get(key)) else {
                return Vec::new();
            };

            let lower = start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_string()));
            row.columns
                .range((lower, Bound::Unbounded))
                .take(count)
                .map(|(name, value)| Column::new(name.clone(), value.clone()))
                .collect()
        }))
    }

    fn group_range_slice(
        &self,
        storage: &str,
        key: &[u8],
        start: Option<&str>,
        count: usize,
    ) -> Result<Vec<GroupSlice>, GatewayError> {
        Ok(self.with_families(|families| {
            let Some(row) = families.get(storage).and_then(|family| family.get(key)) else {
                return Vec::new();
            };

            let lower = start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_string()));
            row.groups
                .range((lower, Bound::Unbounded))
                .take(count)
                .map(|(name, members)| GroupSlice {
                    name: name.clone(),
                    columns: members
                        .iter()
                        .map(|(n, v)| Column::new(n.clone(), v.clone()))
                        .collect(),
                })
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(storage: &str, key: &[u8], mutations: Vec<Mutation>) -> MutationBatch {
        let mut b = MutationBatch::new(storage, key.to_vec());
        for m in mutations {
            b.push(m);
        }
        b
    }

    #[test]
    fn apply_then_read_column() {
        let gw = MemoryGateway::new();
        gw.apply(batch(
            "cf",
            b"k1",
            vec![Mutation::Column(Column::new("a", vec![1]))],
        ))
        .unwrap();

        assert_eq!(gw.read_column("cf", b"k1", "a").unwrap(), Some(vec![1]));
        assert_eq!(gw.read_column("cf", b"k1", "b").unwrap(), None);
        assert_eq!(gw.read_column("cf", b"k2", "a").unwrap(), None);
    }

    #[test]
    fn group_mutations_merge_into_one_group() {
        let gw = MemoryGateway::new();
        gw.apply(batch(
            "cf",
            b"k1",
            vec![
                Mutation::Group {
                    name: "g".into(),
                    columns: vec![Column::new("a", vec![1])],
                },
                Mutation::Group {
                    name: "g".into(),
                    columns: vec![Column::new("b", vec![2])],
                },
            ],
        ))
        .unwrap();

        let group = gw.group("cf", b"k1", "g").unwrap();
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn indexed_slice_matches_on_equality() {
        let gw = MemoryGateway::new();
        for (key, status) in [(b"k1", b"x" as &[u8]), (b"k2", b"y"), (b"k3", b"x")] {
            gw.apply(batch(
                "cf",
                key,
                vec![Mutation::Column(Column::new("status", status.to_vec()))],
            ))
            .unwrap();
        }

        let rows = gw
            .indexed_slice("cf", "status", b"x", &["status".to_string()])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, b"k1".to_vec());
    }

    #[test]
    fn range_slice_honors_start_and_count() {
        let gw = MemoryGateway::new();
        gw.apply(batch(
            "cf",
            b"k1",
            vec![
                Mutation::Column(Column::new("a", vec![])),
                Mutation::Column(Column::new("b", vec![])),
                Mutation::Column(Column::new("c", vec![])),
            ],
        ))
        .unwrap();

        let cols = gw.range_slice("cf", b"k1", Some("b"), 1).unwrap();
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].name, "b");
    }
}
