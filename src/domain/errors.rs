//! Client error taxonomy
//!
//! Every failure the orchestration layer can observe collapses into one of a
//! handful of conditions. Transport details (status codes, decode errors) are
//! kept only as a human-readable `reason`; callers never branch on them.

use std::fmt;
use thiserror::Error;

/// Backend resource a request was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    User,
    Preferences,
    Categories,
    Products,
    Product,
    Recommendations,
    Ratings,
    History,
    Stats,
}

impl Resource {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::User => "user",
            Self::Preferences => "preferences",
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Product => "product",
            Self::Recommendations => "recommendations",
            Self::Ratings => "ratings",
            Self::History => "history",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Request for {resource} failed: {reason}")]
    RequestFailed { resource: Resource, reason: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    #[error("No user selected")]
    InvalidSession,

    #[error("Rating must be between 1 and 5 (got {0})")]
    InvalidRating(u8),

    #[error("No product is open for rating")]
    RatingWidgetClosed,

    #[error("A rating for product {0} is already being submitted")]
    RatingInProgress(u32),
}

impl ClientError {
    pub fn request_failed(resource: Resource, reason: impl fmt::Display) -> Self {
        Self::RequestFailed {
            resource,
            reason: reason.to_string(),
        }
    }

    pub const fn product_not_found(id: u32) -> Self {
        Self::NotFound { entity: "product", id }
    }

    pub const fn user_not_found(id: u32) -> Self {
        Self::NotFound { entity: "user", id }
    }

    /// Whether prompting for a user selection resolves this error
    pub const fn needs_user_selection(&self) -> bool {
        matches!(self, Self::InvalidSession)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
