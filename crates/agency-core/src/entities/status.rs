//! Status enums and the lifecycle rules applied to them.
//!
//! Every status type accepts any enumerated target from any current state;
//! validation is membership in the enum. Briefs move draft ↔ used freely,
//! signals may be reassigned at will, posts are set directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Behaviour shared by the per-entity status enums.
pub trait Status:
    'static + Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = ValidationError>
{
    /// Singular entity name used in diagnostics.
    const ENTITY: &'static str;
    /// Every valid value, in lifecycle order.
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Whether moving from `self` to `target` is allowed.
    fn can_transition_to(self, target: Self) -> bool {
        Self::ALL.contains(&self) && Self::ALL.contains(&target)
    }
}

/// Parse a raw status string for status type `S`, case-insensitively.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidStatus`] listing the accepted values.
pub fn parse_status<S: Status>(raw: &str) -> Result<S, ValidationError> {
    let wanted = raw.trim();
    S::ALL
        .iter()
        .copied()
        .find(|s| s.as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ValidationError::InvalidStatus {
            entity: S::ENTITY,
            value: raw.to_string(),
            allowed: allowed_values::<S>(),
        })
}

/// Validate a transition and return the new status.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidStatus`] if the lifecycle forbids the
/// move.
pub fn transition<S: Status>(from: S, to: S) -> Result<S, ValidationError> {
    if from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(ValidationError::InvalidStatus {
            entity: S::ENTITY,
            value: to.as_str().to_string(),
            allowed: allowed_values::<S>(),
        })
    }
}

fn allowed_values<S: Status>() -> String {
    S::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    #[default]
    Unused,
    Used,
    Rejected,
}

impl Status for SignalStatus {
    const ENTITY: &'static str = "signal";
    const ALL: &'static [Self] = &[Self::Unused, Self::Used, Self::Rejected];

    fn as_str(self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Used => "used",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BriefStatus {
    #[default]
    Draft,
    Used,
}

impl Status for BriefStatus {
    const ENTITY: &'static str = "brief";
    const ALL: &'static [Self] = &[Self::Draft, Self::Used];

    fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Used => "used",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Created,
    Scheduled,
    Published,
}

impl Status for PostStatus {
    const ENTITY: &'static str = "post";
    const ALL: &'static [Self] = &[Self::Created, Self::Scheduled, Self::Published];

    fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BriefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_status(s)
    }
}

impl FromStr for BriefStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_status(s)
    }
}

impl FromStr for PostStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_status(s)
    }
}

/// Marketing funnel position of a brief or post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FunnelStage {
    #[serde(alias = "tofu")]
    Tofu,
    #[serde(alias = "mofu")]
    Mofu,
    #[serde(alias = "bofu")]
    Bofu,
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunnelStage::Tofu => write!(f, "TOFU"),
            FunnelStage::Mofu => write!(f, "MOFU"),
            FunnelStage::Bofu => write!(f, "BOFU"),
        }
    }
}
