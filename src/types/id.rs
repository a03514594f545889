// ABOUTME: Phantom-typed identifiers for Railway resources.
// ABOUTME: Keeps environment, service, trigger, and token IDs from being mixed up.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Empty enums cannot be constructed, so they cost nothing at runtime.
pub enum ProjectMarker {}
pub enum EnvironmentMarker {}
pub enum ServiceMarker {}
pub enum ServiceInstanceMarker {}
pub enum TriggerMarker {}
pub enum DeploymentMarker {}
pub enum TokenMarker {}

/// A remote-assigned identifier tagged with the kind of resource it names.
///
/// Railway hands out opaque UUID strings for everything. Wrapping them in
/// `Id<T>` means passing a `ServiceId` where an `EnvironmentId` is expected
/// is a compile error instead of a confusing GraphQL failure.
#[must_use = "IDs reference remote resources and should not be ignored"]
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

// Implemented by hand so that T needs no bounds.

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
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

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

pub type ProjectId = Id<ProjectMarker>;
pub type EnvironmentId = Id<EnvironmentMarker>;
pub type ServiceId = Id<ServiceMarker>;
pub type ServiceInstanceId = Id<ServiceInstanceMarker>;
pub type TriggerId = Id<TriggerMarker>;
pub type DeploymentId = Id<DeploymentMarker>;
pub type TokenId = Id<TokenMarker>;
