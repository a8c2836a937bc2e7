//! Shared mapped types for engine tests, exercising each declaration shape:
//! flat columns, secondary indexes, dependent keys, column groups with
//! folded members, inverse indexes, and dynamic column names.

use crate::{
    db::Db,
    gateway::MemoryGateway,
    model::{
        build::RegistryBuilder,
        def::{EntityDef, FieldDef, TypeToken},
    },
    traits::{AccessError, Entity, Record},
    value::{FieldKind, Value},
};
use std::sync::Arc;
use ulid::Ulid;

pub(crate) fn test_db() -> (Db, Arc<MemoryGateway>) {
    let registry = RegistryBuilder::new()
        .register::<Order>()
        .register::<Customer>()
        .register::<Invoice>()
        .register::<Playlist>()
        .register::<Setting>()
        .register::<Bookmark>()
        .register::<Journal>()
        .build()
        .unwrap();

    let gateway = Arc::new(MemoryGateway::new());
    (Db::new(registry, gateway.clone()), gateway)
}

fn unknown(field: &str) -> AccessError {
    AccessError::UnknownField {
        field: field.to_string(),
    }
}

fn mismatch(field: &str, expected: FieldKind, found: &Value) -> AccessError {
    AccessError::KindMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}

///
/// Order
///
/// Flat columns plus a secondary index on `status` (defaults to "Status").
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Order {
    pub id: Option<Ulid>,
    pub total: i64,
    pub status: String,
}

impl Record for Order {
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => self.id.map(Value::Ulid),
            "total" => Some(Value::Int(self.total)),
            "status" => Some(Value::Text(self.status.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value) {
            ("id", Value::Ulid(u)) => self.id = Some(u),
            ("total", Value::Int(i)) => self.total = i,
            ("status", Value::Text(s)) => self.status = s,
            ("id", v) => return Err(mismatch(field, FieldKind::Ulid, &v)),
            ("total", v) => return Err(mismatch(field, FieldKind::Int, &v)),
            ("status", v) => return Err(mismatch(field, FieldKind::Text, &v)),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Entity for Order {
    const PATH: &'static str = "test_fixtures::Order";

    fn def() -> EntityDef {
        EntityDef::new("Order")
            .storage(None)
            .field(FieldDef::new("id", FieldKind::Ulid).key())
            .field(FieldDef::new("total", FieldKind::Int).column(None))
            .field(
                FieldDef::new("status", FieldKind::Text)
                    .column(None)
                    .indexed(None),
            )
    }
}

///
/// Customer
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Customer {
    pub id: Option<Ulid>,
    pub name: String,
}

impl Record for Customer {
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => self.id.map(Value::Ulid),
            "name" => Some(Value::Text(self.name.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value) {
            ("id", Value::Ulid(u)) => self.id = Some(u),
            ("name", Value::Text(s)) => self.name = s,
            ("id", v) => return Err(mismatch(field, FieldKind::Ulid, &v)),
            ("name", v) => return Err(mismatch(field, FieldKind::Text, &v)),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Entity for Customer {
    const PATH: &'static str = "test_fixtures::Customer";

    fn def() -> EntityDef {
        EntityDef::new("Customer")
            .storage(None)
            .field(FieldDef::new("id", FieldKind::Ulid).key())
            .field(FieldDef::new("name", FieldKind::Text).column(None))
    }
}

///
/// Invoice
///
/// Dependent key: rows are stored under the referenced customer's key.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Invoice {
    pub customer: Option<Customer>,
    pub amount: i64,
}

impl Record for Invoice {
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "amount" => Some(Value::Int(self.amount)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value) {
            ("amount", Value::Int(i)) => self.amount = i,
            ("amount", v) => return Err(mismatch(field, FieldKind::Int, &v)),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn dependee(&self, field: &str) -> Option<&dyn Record> {
        match field {
            "customer" => self.customer.as_ref().map(|c| c as &dyn Record),
            _ => None,
        }
    }
}

impl Entity for Invoice {
    const PATH: &'static str = "test_fixtures::Invoice";

    fn def() -> EntityDef {
        EntityDef::new("Invoice")
            .storage(None)
            .field(
                FieldDef::new("customer", FieldKind::Unit)
                    .dependent_key(TypeToken::of::<Customer>()),
            )
            .field(FieldDef::new("amount", FieldKind::Int).column(None))
    }
}

///
/// Playlist
///
/// Column group with a folded member, and an inverse index whose column
/// name comes from `owner`.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Playlist {
    pub id: Option<Ulid>,
    pub owner: String,
    pub tracks: String,
    pub artist: String,
}

impl Record for Playlist {
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => self.id.map(Value::Ulid),
            "owner" => Some(Value::Text(self.owner.clone())),
            "tracks" => Some(Value::Text(self.tracks.clone())),
            "artist" => Some(Value::Text(self.artist.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value) {
            ("id", Value::Ulid(u)) => self.id = Some(u),
            ("owner", Value::Text(s)) => self.owner = s,
            ("tracks", Value::Text(s)) => self.tracks = s,
            ("artist", Value::Text(s)) => self.artist = s,
            ("id", v) => return Err(mismatch(field, FieldKind::Ulid, &v)),
            ("owner" | "tracks" | "artist", v) => {
                return Err(mismatch(field, FieldKind::Text, &v));
            }
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Entity for Playlist {
    const PATH: &'static str = "test_fixtures::Playlist";

    fn def() -> EntityDef {
        EntityDef::new("Playlist")
            .storage(None)
            .inverse("Inverse")
            .field(FieldDef::new("id", FieldKind::Ulid).key())
            .field(FieldDef::new("owner", FieldKind::Text).inverse_column_name())
            .field(FieldDef::new("tracks", FieldKind::Text).group(None))
            .field(
                FieldDef::new("artist", FieldKind::Text)
                    .column(None)
                    .group_parent("tracks"),
            )
    }
}

///
/// Setting
///
/// Dynamic column name: `value` is stored under whatever `label` holds.
/// `label` itself carries no mapping, so it is never written.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Setting {
    pub id: Option<Ulid>,
    pub label: String,
    pub value: String,
}

impl Record for Setting {
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => self.id.map(Value::Ulid),
            "label" => Some(Value::Text(self.label.clone())),
            // An empty value models an unset attribute.
            "value" if !self.value.is_empty() => Some(Value::Text(self.value.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value) {
            ("id", Value::Ulid(u)) => self.id = Some(u),
            ("label", Value::Text(s)) => self.label = s,
            ("value", Value::Text(s)) => self.value = s,
            ("id", v) => return Err(mismatch(field, FieldKind::Ulid, &v)),
            ("label" | "value", v) => return Err(mismatch(field, FieldKind::Text, &v)),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Entity for Setting {
    const PATH: &'static str = "test_fixtures::Setting";

    fn def() -> EntityDef {
        EntityDef::new("Setting")
            .storage(None)
            .field(FieldDef::new("id", FieldKind::Ulid).key())
            .field(FieldDef::new("label", FieldKind::Text))
            .field(FieldDef::new("value", FieldKind::Text).column_name_field("label"))
    }
}

///
/// Journal
///
/// Dynamic group name: `entry` lands under whatever group `topic` names.
/// The inverse value resolves through the same dynamic group name.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Journal {
    pub id: Option<Ulid>,
    pub owner: String,
    pub topic: String,
    pub entry: String,
}

impl Record for Journal {
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => self.id.map(Value::Ulid),
            "owner" => Some(Value::Text(self.owner.clone())),
            "topic" => Some(Value::Text(self.topic.clone())),
            "entry" => Some(Value::Text(self.entry.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value) {
            ("id", Value::Ulid(u)) => self.id = Some(u),
            ("owner", Value::Text(s)) => self.owner = s,
            ("topic", Value::Text(s)) => self.topic = s,
            ("entry", Value::Text(s)) => self.entry = s,
            ("id", v) => return Err(mismatch(field, FieldKind::Ulid, &v)),
            ("owner" | "topic" | "entry", v) => {
                return Err(mismatch(field, FieldKind::Text, &v));
            }
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Entity for Journal {
    const PATH: &'static str = "test_fixtures::Journal";

    fn def() -> EntityDef {
        EntityDef::new("Journal")
            .storage(None)
            .inverse("Inverse")
            .field(FieldDef::new("id", FieldKind::Ulid).key())
            .field(FieldDef::new("owner", FieldKind::Text).inverse_column_name())
            .field(FieldDef::new("topic", FieldKind::Text))
            .field(FieldDef::new("entry", FieldKind::Text).group_name_field("topic"))
    }
}

///
/// Bookmark
///
/// Flat entity with an inverse index; the single flat column supplies the
/// inverse value.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Bookmark {
    pub id: Option<Ulid>,
    pub tag: String,
    pub url: String,
}

impl Record for Bookmark {
    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => self.id.map(Value::Ulid),
            "tag" => Some(Value::Text(self.tag.clone())),
            "url" => Some(Value::Text(self.url.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
        match (field, value) {
            ("id", Value::Ulid(u)) => self.id = Some(u),
            ("tag", Value::Text(s)) => self.tag = s,
            ("url", Value::Text(s)) => self.url = s,
            ("id", v) => return Err(mismatch(field, FieldKind::Ulid, &v)),
            ("tag" | "url", v) => return Err(mismatch(field, FieldKind::Text, &v)),
            _ => return Err(unknown(field)),
        }
        Ok(())
    }
}

impl Entity for Bookmark {
    const PATH: &'static str = "test_fixtures::Bookmark";

    fn def() -> EntityDef {
        EntityDef::new("Bookmark")
            .storage(None)
            .inverse("Inverse")
            .field(FieldDef::new("id", FieldKind::Ulid).key())
            .field(FieldDef::new("tag", FieldKind::Text).inverse_column_name())
            .field(FieldDef::new("url", FieldKind::Text).column(None))
    }
}
