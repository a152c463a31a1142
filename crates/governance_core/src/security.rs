//! Caller authorization for governance program operations.
//!
//! # Invariants
//! - Blank user ids never reach a policy; handlers reject them first.
//! - Reads are never denied by the allow-list policy.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Operation class checked against the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessAction {
    Read,
    Create,
    Update,
    Delete,
    /// Appoint or relieve role incumbents.
    Appoint,
    /// Set up or clear relationships.
    Link,
}

impl AccessAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Appoint => "appoint",
            Self::Link => "link",
        }
    }

    pub fn is_write(self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl Display for AccessAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a caller may perform an action.
pub trait AccessPolicy: Send + Sync {
    fn is_permitted(&self, user_id: &str, action: AccessAction) -> bool;
}

/// Permits every caller and action.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccessPolicy;

impl AccessPolicy for OpenAccessPolicy {
    fn is_permitted(&self, _user_id: &str, _action: AccessAction) -> bool {
        true
    }
}

/// Permits reads for everyone and writes for listed users only.
#[derive(Debug, Clone, Default)]
pub struct AllowListPolicy {
    writers: BTreeSet<String>,
}

impl AllowListPolicy {
    pub fn new<I, S>(writers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            writers: writers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn writers(&self) -> impl Iterator<Item = &str> {
        self.writers.iter().map(String::as_str)
    }
}

impl AccessPolicy for AllowListPolicy {
    fn is_permitted(&self, user_id: &str, action: AccessAction) -> bool {
        !action.is_write() || self.writers.contains(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessAction, AccessPolicy, AllowListPolicy, OpenAccessPolicy};

    #[test]
    fn open_policy_permits_everything() {
        assert!(OpenAccessPolicy.is_permitted("anyone", AccessAction::Delete));
    }

    #[test]
    fn allow_list_permits_reads_for_all_and_writes_for_listed_users() {
        let policy = AllowListPolicy::new(["erinoverview"]);
        assert!(policy.is_permitted("peterprofile", AccessAction::Read));
        assert!(!policy.is_permitted("peterprofile", AccessAction::Appoint));
        assert!(policy.is_permitted("erinoverview", AccessAction::Appoint));
        assert_eq!(policy.writers().collect::<Vec<_>>(), vec!["erinoverview"]);
    }
}
