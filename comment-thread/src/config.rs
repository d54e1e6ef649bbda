use std::str::FromStr;

use derive_more::Display;
use payloads::Role;
use serde::{Deserialize, Serialize};

/// What else goes when a comment is deleted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CascadePolicy {
    /// The comment and its direct replies. Deeper replies stay in the
    /// collection without a visible parent.
    #[default]
    #[display("shallow")]
    Shallow,
    /// The comment and every transitive reply.
    #[display("recursive")]
    Recursive,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown delete cascade `{0}`, expected `shallow` or `recursive`")]
pub struct ParseCascadePolicyError(String);

impl FromStr for CascadePolicy {
    type Err = ParseCascadePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shallow" => Ok(Self::Shallow),
            "recursive" => Ok(Self::Recursive),
            _ => Err(ParseCascadePolicyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadConfig {
    /// Roots sit at depth 0; replying is disabled at this depth and
    /// indentation stops growing here.
    pub max_depth: usize,
    pub cascade: CascadePolicy,
    /// Roles that may edit, delete and moderate anyone's comments.
    pub elevated_roles: Vec<Role>,
}

impl ThreadConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 3;

    pub fn is_elevated(&self, role: Role) -> bool {
        self.elevated_roles.contains(&role)
    }

    /// Indentation level for a comment at `depth`.
    pub fn indent(&self, depth: usize) -> usize {
        depth.min(self.max_depth)
    }
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            cascade: CascadePolicy::default(),
            elevated_roles: vec![Role::Admin, Role::Moderator],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_parses_case_insensitively() {
        assert_eq!(" Recursive ".parse(), Ok(CascadePolicy::Recursive));
        assert_eq!("shallow".parse(), Ok(CascadePolicy::Shallow));
        assert!("deep".parse::<CascadePolicy>().is_err());
    }

    #[test]
    fn defaults() {
        let config = ThreadConfig::default();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.cascade, CascadePolicy::Shallow);
        assert!(config.is_elevated(Role::Admin));
        assert!(!config.is_elevated(Role::Author));
        assert_eq!(config.indent(7), 3);
    }
}
