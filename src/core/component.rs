//! Component declarations.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::InternedString;

/// Stable identity of a component.
///
/// Identities are unique within one chain and order lexicographically, which
/// is what makes submission-order independent ordering possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(InternedString);

impl ComponentId {
    pub fn new(id: impl Into<InternedString>) -> Self {
        ComponentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        ComponentId::new(s)
    }
}

/// One component to be placed in the chain.
///
/// `component` is the caller's payload and is handed back, in order, by
/// [`ChainBuilder::order_nodes`](crate::chain::ChainBuilder::order_nodes).
/// `provides` must not be empty.
#[derive(Debug, Clone)]
pub struct ComponentDeclaration<C> {
    pub id: ComponentId,
    pub component: C,
    pub provides: BTreeSet<InternedString>,
    pub before: BTreeSet<InternedString>,
    pub after: BTreeSet<InternedString>,
}

impl<C> ComponentDeclaration<C> {
    pub fn new(id: impl Into<ComponentId>, component: C) -> Self {
        ComponentDeclaration {
            id: id.into(),
            component,
            provides: BTreeSet::new(),
            before: BTreeSet::new(),
            after: BTreeSet::new(),
        }
    }

    pub fn provides<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<InternedString>,
    {
        self.provides.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn runs_before<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<InternedString>,
    {
        self.before.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn runs_after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<InternedString>,
    {
        self.after.extend(names.into_iter().map(Into::into));
        self
    }

    /// Every name this declaration mentions, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &InternedString> {
        self.provides.iter().chain(&self.before).chain(&self.after)
    }
}

impl ComponentDeclaration<ComponentId> {
    /// A declaration whose payload is its own identity.
    pub fn named(id: impl Into<ComponentId>) -> Self {
        let id = id.into();
        ComponentDeclaration::new(id.clone(), id)
    }
}
