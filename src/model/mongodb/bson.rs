use std::fmt::{Display, Formatter};
use std::{ops::Deref, str::FromStr};

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use rocket::request::FromParam;
use serde::{Deserialize, Serialize};

/// A database ID: a thin wrapper around an [`ObjectId`] that can be used
/// directly as a route parameter.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id(ObjectId);

impl Id {
    /// Generate a fresh, unique ID.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// A filter document matching this ID.
    pub fn as_doc(&self) -> Document {
        doc! { "_id": self.0 }
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Id {
    type Target = ObjectId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Id {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse::<ObjectId>()?))
    }
}

impl From<ObjectId> for Id {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl From<Id> for Bson {
    fn from(id: Id) -> Self {
        Bson::ObjectId(id.0)
    }
}

impl<'a> FromParam<'a> for Id {
    type Error = mongodb::bson::oid::Error;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse::<Id>()
    }
}
