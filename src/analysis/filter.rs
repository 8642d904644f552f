use crate::config::UserListsConfig;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    NotIncluded,
    HardExcluded,
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Eligibility::Eligible
    }
}

/// Gate on display names: only hard included users are analyzed, and the
/// exclusion list wins over the inclusion list.
pub struct UserFilter<'a> {
    hard_included: &'a BTreeSet<String>,
    hard_excluded: &'a BTreeSet<String>,
}

impl<'a> UserFilter<'a> {
    pub fn new(hard_included: &'a BTreeSet<String>, hard_excluded: &'a BTreeSet<String>) -> Self {
        Self {
            hard_included,
            hard_excluded,
        }
    }

    pub fn from_config(users: &'a UserListsConfig) -> Self {
        Self::new(&users.hard_included, &users.hard_excluded)
    }

    pub fn check(&self, name: &str) -> Eligibility {
        if !self.hard_included.contains(name) {
            Eligibility::NotIncluded
        } else if self.hard_excluded.contains(name) {
            Eligibility::HardExcluded
        } else {
            Eligibility::Eligible
        }
    }

    pub fn is_eligible(&self, name: &str) -> bool {
        self.check(name).is_eligible()
    }
}
