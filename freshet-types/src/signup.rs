use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::update::Bookmark;

/// Lifecycle state of a signup.
///
/// A signup is provisioned asynchronously: it is created in a pre-active
/// state (`Created` on newer API versions, `Activating` on older ones) and
/// transitions to [`Active`](SignupState::Active) once the backend finishes
/// provisioning. Only an active signup can serve a bookmark or updates.
/// `Expired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignupState {
    /// Accepted by the backend but not yet provisioning.
    Created,
    /// Provisioning in progress; poll until `Active`.
    Activating,
    /// Fully provisioned; a bookmark is available.
    Active,
    /// Terminal; the signup no longer serves updates.
    Expired,
}

impl SignupState {
    /// `true` for the non-terminal states preceding `Active`.
    #[must_use]
    pub const fn is_pre_active(self) -> bool {
        matches!(self, Self::Created | Self::Activating)
    }
}

/// Kind of resource a signup subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ResourceType {
    /// A data stream.
    #[default]
    Stream,
}

/// A server-side subscription scoping which resources' changes are observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    /// Server-assigned identifier.
    pub id: String,
    /// Caller-chosen display name.
    pub name: String,
    /// Kind of subscribed resources. Some API versions name this field
    /// `type`, others `resourceType`.
    #[serde(rename = "type", alias = "resourceType", default)]
    pub resource_type: ResourceType,
    /// Current lifecycle state.
    pub signup_state: SignupState,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Last-modification timestamp.
    pub modified_date: DateTime<Utc>,
    /// Update cursor, populated only once the signup is active. Depending on
    /// the API version this arrives as a body field or as a `Get-Updates`
    /// response header; the transport folds the header into this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<Bookmark>,
}

/// Request body for creating a signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSignupInput {
    /// Display name for the new signup.
    pub name: String,
    /// Kind of the subscribed resources.
    pub resource_type: ResourceType,
    /// Identifiers of the resources to subscribe to.
    pub resource_ids: Vec<String>,
}

impl CreateSignupInput {
    /// Build a stream signup over the given resource ids.
    pub fn streams(name: impl Into<String>, resource_ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: ResourceType::Stream,
            resource_ids,
        }
    }
}

/// Request body for mutating a signup's resource set.
///
/// Mutation does not change the signup's lifecycle state; newly added
/// resources start out pending and may report inaccessible until the backend
/// reconciles access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChanges {
    /// Resource ids to add to the signup.
    pub resources_to_add: Vec<String>,
    /// Resource ids to remove from the signup.
    pub resources_to_remove: Vec<String>,
}

impl ResourceChanges {
    /// Changes that only add resources.
    #[must_use]
    pub fn add(ids: Vec<String>) -> Self {
        Self {
            resources_to_add: ids,
            resources_to_remove: Vec::new(),
        }
    }

    /// Changes that only remove resources.
    #[must_use]
    pub fn remove(ids: Vec<String>) -> Self {
        Self {
            resources_to_add: Vec::new(),
            resources_to_remove: ids,
        }
    }
}

/// One subscribed resource and whether the caller's credentials can
/// currently read it.
///
/// Accessibility is recomputed server-side and can change over the signup's
/// lifetime independently of resource add/remove calls; re-query rather than
/// cache it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResource {
    /// Identifier of the subscribed resource.
    pub resource_id: String,
    /// Whether the caller can currently read the resource.
    pub is_accessible: bool,
}

/// Response envelope for the signup resources endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResources {
    /// The subscribed resources, in server order.
    pub resources: Vec<SignupResource>,
}

/// Response envelope for the signup list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupCollection {
    /// The caller's signups, in server order.
    pub signups: Vec<Signup>,
}

/// Accessibility filter for the signup resources endpoint.
///
/// The numeric ordinals of this enum differ between API versions, so it is
/// serialized by name in query strings; the names are the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ResourceFilter {
    /// Only resources the caller cannot currently read.
    Inaccessible,
    /// Only resources the caller can currently read.
    Accessible,
    /// Both accessible and inaccessible resources.
    #[default]
    All,
}

impl std::fmt::Display for ResourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Inaccessible => "Inaccessible",
            Self::Accessible => "Accessible",
            Self::All => "All",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ResourceFilter {
    type Err = UnknownResourceFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Inaccessible" => Ok(Self::Inaccessible),
            "Accessible" => Ok(Self::Accessible),
            "All" => Ok(Self::All),
            other => Err(UnknownResourceFilter(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized resource filter name.
#[derive(Debug, thiserror::Error)]
#[error("unknown resource filter: {0}")]
pub struct UnknownResourceFilter(pub String);
