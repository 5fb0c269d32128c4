use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DomainError;

/// A normalized job-match request: the position the candidate is
/// looking for plus a reference to the resume document being matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub position: String,
    pub resume_reference: String,
}

impl MatchQuery {
    pub fn new(position: impl Into<String>, resume_reference: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            resume_reference: resume_reference.into(),
        }
    }

    /// Lowercased with whitespace runs collapsed, so "Senior  Dentist "
    /// and "senior dentist" address the same cache slot.
    pub fn normalized_position(&self) -> String {
        self.position
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Stable content-addressable key: SHA-256 over the normalized
    /// position and the resume reference.
    pub fn cache_key(&self) -> CacheKey {
        let input = format!("{}|{}", self.normalized_position(), self.resume_reference);
        CacheKey(hex::encode(Sha256::digest(input.as_bytes())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(pub String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Where a result set came from: a live call to the matching service,
/// or the static degraded dataset served when retries ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Live,
    Fallback,
}

impl ResultSource {
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
        }
    }
}

impl Display for ResultSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResultSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(Self::Live),
            "fallback" => Ok(Self::Fallback),
            other => Err(DomainError::UnknownResultSource(other.to_string())),
        }
    }
}

/// One practice/role the matching service scored against the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeMatch {
    pub id: String,
    pub name: String,
    pub location: String,
    pub score: f32,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    pub practices: Vec<PracticeMatch>,
}

impl MatchSet {
    pub fn new(practices: Vec<PracticeMatch>) -> Self {
        Self { practices }
    }

    pub fn len(&self) -> usize {
        self.practices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.practices.is_empty()
    }
}
