//! Phase declarations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::util::InternedString;

/// A named barrier that components and other phases order themselves against.
///
/// `before` lists names this phase must precede; `after` lists names that must
/// be complete before it. Names may refer to other phases or to capabilities
/// provided by components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: InternedString,
    #[serde(default)]
    pub before: BTreeSet<InternedString>,
    #[serde(default)]
    pub after: BTreeSet<InternedString>,
}

impl Phase {
    pub fn new(name: impl Into<InternedString>) -> Self {
        Phase {
            name: name.into(),
            before: BTreeSet::new(),
            after: BTreeSet::new(),
        }
    }

    /// Add names this phase must run before.
    pub fn runs_before<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<InternedString>,
    {
        self.before.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add names this phase must run after.
    pub fn runs_after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<InternedString>,
    {
        self.after.extend(names.into_iter().map(Into::into));
        self
    }

    /// Fold another declaration of the same phase into this one.
    pub fn merge(&mut self, other: Phase) {
        debug_assert_eq!(self.name, other.name);
        self.before.extend(other.before);
        self.after.extend(other.after);
    }
}
