use super::{Collection, activity_model};
use crate::builder::{Builder, Handle};
use crate::registry::Context;
use geostreams_types::{ModelError, Object, Value};
use std::fmt;

/// Attendance relationships of an [`Event`], each holding a [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    AttendedBy,
    Attending,
    Invited,
    MaybeAttending,
    NotAttendedBy,
    NotAttending,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::AttendedBy,
        Relation::Attending,
        Relation::Invited,
        Relation::MaybeAttending,
        Relation::NotAttendedBy,
        Relation::NotAttending,
    ];

    /// Property name the relation is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            Relation::AttendedBy => "attendedBy",
            Relation::Attending => "attending",
            Relation::Invited => "invited",
            Relation::MaybeAttending => "maybeAttending",
            Relation::NotAttendedBy => "notAttendedBy",
            Relation::NotAttending => "notAttending",
        }
    }

    pub fn from_key(key: &str) -> Option<Relation> {
        Relation::ALL.into_iter().find(|r| r.key() == key)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// An Activity Streams event (`objectType = "event"`).
///
/// # Examples
///
/// ```
/// use geostreams::activity::{ASObject, Collection, Event};
///
/// let guests = Collection::builder()
///     .add(ASObject::builder("person").display_name("Ann").build()?)
///     .build()?;
/// let party = Event::builder().attending(guests).build()?;
///
/// assert_eq!(party.attending().map(|c| c.len()), Some(1));
/// assert!(party.invited().is_none());
/// # Ok::<(), geostreams::ModelError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Event(Object);

activity_model!(Event, |type_name| type_name == "event", handle = handle_relation);

impl Event {
    pub fn builder() -> Builder<Self> {
        Builder::typed("event")
    }

    pub fn to_builder(&self) -> Builder<Self> {
        Builder::new().from_existing(self)
    }

    /// The collection stored for `relation`, `None` when unset or not a collection.
    pub fn relation(&self, relation: Relation) -> Option<Collection> {
        self.0.get_as(relation.key())
    }

    pub fn attended_by(&self) -> Option<Collection> {
        self.relation(Relation::AttendedBy)
    }

    pub fn attending(&self) -> Option<Collection> {
        self.relation(Relation::Attending)
    }

    pub fn invited(&self) -> Option<Collection> {
        self.relation(Relation::Invited)
    }

    pub fn maybe_attending(&self) -> Option<Collection> {
        self.relation(Relation::MaybeAttending)
    }

    pub fn not_attended_by(&self) -> Option<Collection> {
        self.relation(Relation::NotAttendedBy)
    }

    pub fn not_attending(&self) -> Option<Collection> {
        self.relation(Relation::NotAttending)
    }
}

impl Builder<Event> {
    pub fn relation(self, relation: Relation, collection: Collection) -> Self {
        self.set(relation.key(), collection)
    }

    /// Stage a relation from a collection builder, finalizing it first.
    pub fn relation_from(
        self,
        relation: Relation,
        collection: Builder<Collection>,
    ) -> Result<Self, ModelError> {
        Ok(self.relation(relation, collection.build()?))
    }

    pub fn attended_by(self, collection: Collection) -> Self {
        self.relation(Relation::AttendedBy, collection)
    }

    pub fn attended_by_with(self, supplier: impl FnOnce() -> Collection) -> Self {
        self.attended_by(supplier())
    }

    pub fn attending(self, collection: Collection) -> Self {
        self.relation(Relation::Attending, collection)
    }

    pub fn attending_with(self, supplier: impl FnOnce() -> Collection) -> Self {
        self.attending(supplier())
    }

    pub fn invited(self, collection: Collection) -> Self {
        self.relation(Relation::Invited, collection)
    }

    pub fn invited_with(self, supplier: impl FnOnce() -> Collection) -> Self {
        self.invited(supplier())
    }

    pub fn maybe_attending(self, collection: Collection) -> Self {
        self.relation(Relation::MaybeAttending, collection)
    }

    pub fn maybe_attending_with(self, supplier: impl FnOnce() -> Collection) -> Self {
        self.maybe_attending(supplier())
    }

    pub fn not_attended_by(self, collection: Collection) -> Self {
        self.relation(Relation::NotAttendedBy, collection)
    }

    pub fn not_attended_by_with(self, supplier: impl FnOnce() -> Collection) -> Self {
        self.not_attended_by(supplier())
    }

    pub fn not_attending(self, collection: Collection) -> Self {
        self.relation(Relation::NotAttending, collection)
    }

    pub fn not_attending_with(self, supplier: impl FnOnce() -> Collection) -> Self {
        self.not_attending(supplier())
    }
}

/// Relations written without an `objectType` still denote collections.
fn handle_relation(
    builder: &mut Builder<Event>,
    cx: Context<'_>,
    key: &str,
    value: Value,
) -> Result<Handle, ModelError> {
    let Some(relation) = Relation::from_key(key) else {
        return Ok(Handle::Pass(value));
    };

    match value {
        Value::Map(map) if !map.contains_key("objectType") => {
            let mut collection = Collection::builder();
            for (key, value) in cx.revive_entries(map)? {
                collection.insert(key, value);
            }
            builder.insert(relation.key(), collection.build()?);
            Ok(Handle::Consumed)
        }
        other => Ok(Handle::Pass(other)),
    }
}
