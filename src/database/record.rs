use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use surrealdb::sql::Id;

use super::{Table, Thing};

/// Id of a row in the table of `T`.
///
/// Deserializing checks the table part, so a `Record<Subscriber>` can never
/// hold an id from another table.
pub struct Record<T> {
    thing: Thing,
    table: PhantomData<fn() -> T>,
}

impl<T: Table> Record<T> {
    pub fn new(key: impl Into<Id>) -> Self {
        Self::wrap(Thing {
            tb: T::table().to_string(),
            id: key.into(),
        })
    }
}

impl<T> Record<T> {
    fn wrap(thing: Thing) -> Self {
        Self {
            thing,
            table: PhantomData,
        }
    }

    /// The key without the `table:` prefix, e.g. for CSV exports.
    pub fn key(&self) -> String {
        match &self.thing.id {
            Id::String(key) => key.clone(),
            other => other.to_string(),
        }
    }
}

impl<T> AsRef<Thing> for Record<T> {
    fn as_ref(&self) -> &Thing {
        &self.thing
    }
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self::wrap(self.thing.clone())
    }
}

impl<T> PartialEq for Record<T> {
    fn eq(&self, other: &Self) -> bool {
        self.thing == other.thing
    }
}

impl<T> Eq for Record<T> {}

impl<T> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({})", self.thing)
    }
}

impl<T> fmt::Display for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.thing.fmt(f)
    }
}

impl<T> Serialize for Record<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.thing.serialize(serializer)
    }
}

impl<'de, T: Table> Deserialize<'de> for Record<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let thing = Thing::deserialize(deserializer)?;

        if thing.tb != T::table() {
            return Err(serde::de::Error::custom(format!(
                "expected a record of `{}`, found `{}`",
                T::table(),
                thing
            )));
        }

        Ok(Self::wrap(thing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subscriber;

    #[test]
    fn key_drops_the_table_prefix() {
        let record = Record::<Subscriber>::new("abc123");

        assert_eq!(record.key(), "abc123");
        assert_eq!(record.to_string(), "subscribers:abc123");
    }

    #[test]
    fn rejects_ids_from_other_tables() {
        let thing = Thing {
            tb: "users".to_string(),
            id: Id::from("abc123"),
        };
        let value = serde_json::to_value(&thing).unwrap();

        assert!(serde_json::from_value::<Record<Subscriber>>(value).is_err());
    }
}
