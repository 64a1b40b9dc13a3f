// ABOUTME: Phantom-typed identifiers for platform resources.
// ABOUTME: Prevents accidental swapping of app, package, build, droplet, route and domain GUIDs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum AppMarker {}
pub enum PackageMarker {}
pub enum BuildMarker {}
pub enum DropletMarker {}
pub enum RouteMarker {}
pub enum DomainMarker {}
pub enum SpaceMarker {}

/// A platform GUID tagged with the kind of resource it names.
///
/// Every stage of a push hands an identifier to the next one; the marker
/// makes it a compile error to hand a `BuildId` to something expecting a
/// `PackageId`.
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// T is only a marker, so these impls must not require T: Trait.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type AppId = Id<AppMarker>;
pub type PackageId = Id<PackageMarker>;
pub type BuildId = Id<BuildMarker>;
pub type DropletId = Id<DropletMarker>;
pub type RouteId = Id<RouteMarker>;
pub type DomainId = Id<DomainMarker>;
pub type SpaceId = Id<SpaceMarker>;
