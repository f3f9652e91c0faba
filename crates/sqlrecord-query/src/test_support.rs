//! Hand-written record used by the builder tests.

use sqlrecord_core::{
    FieldInfo, HasIdentifier, HasMeta, Id, MetaBag, Record, Result, Row, Table, Value,
};

pub(crate) struct Heroes;

impl Table for Heroes {
    const NAME: &'static str = "heroes";
    type PrimaryKey = i64;
    type Record = Hero;
}

#[derive(Debug, Default, Clone)]
pub(crate) struct Hero {
    pub(crate) id: Id<Heroes>,
    pub(crate) name: String,
    pub(crate) age: i32,
    pub(crate) meta: MetaBag,
}

impl Hero {
    pub(crate) fn persisted(id: i64, name: &str, age: i32) -> Self {
        Self {
            id: Id::new(id),
            name: name.to_string(),
            age,
            meta: MetaBag::new(),
        }
    }

    pub(crate) fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self.touch("name");
        self
    }

    pub(crate) fn set_age(&mut self, age: i32) -> &mut Self {
        self.age = age;
        self.touch("age");
        self
    }
}

impl HasIdentifier for Hero {
    type Table = Heroes;

    fn id(&self) -> &Id<Heroes> {
        &self.id
    }
}

impl HasMeta for Hero {
    fn meta(&self) -> &MetaBag {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MetaBag {
        &mut self.meta
    }
}

impl Record for Hero {
    const PRIMARY_KEY: &'static str = "id";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id", "id").primary_key(true),
            FieldInfo::new("name", "name"),
            FieldInfo::new("age", "hero_age"),
        ];
        FIELDS
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            self.id.to_value(),
            Value::Text(self.name.clone()),
            Value::Int(self.age),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_named("id")?,
            name: row.get_named("name")?,
            age: row.get_named("hero_age")?,
            meta: MetaBag::new(),
        })
    }
}
