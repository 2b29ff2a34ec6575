//! # Subdomain Constraint Module
//!
//! A [`SubdomainConstraint`] is attached to every route registered inside a
//! subdomain scope and decides which subdomain tokens the route answers to.
//!
//! | Variant     | Matches                                                        |
//! |-------------|----------------------------------------------------------------|
//! | `Fixed`     | tokens in the set; `None` in the set admits hosts without one  |
//! | `Absent`    | hosts without a subdomain only                                 |
//! | `Model`     | any well-formed subdomain, bound to the `{model}_id` parameter |
//! | `Procedure` | whatever the registered recognize callback accepts             |
//!
//! Tokens are compared lowercased. The set of variants is closed: recognition
//! and generation both match on it exhaustively.

use crate::error::Result;
use crate::host::{normalize_subdomain, valid_subdomain};
use crate::procs::SubdomainProcs;
use std::fmt;

/// The subdomain rule of a single route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubdomainConstraint {
    /// Allowed tokens, lowercased and de-duplicated in declaration order.
    /// `None` stands for "no subdomain".
    Fixed(Vec<Option<String>>),
    /// Only hosts without a subdomain.
    Absent,
    /// Any well-formed subdomain, identifying an instance of the named model.
    Model(String),
    /// Delegates to the procedure registered under this identifier.
    Procedure(String),
}

impl SubdomainConstraint {
    /// Build a `Fixed` constraint, normalising and de-duplicating the tokens.
    ///
    /// Empty strings count as "no subdomain".
    pub fn fixed<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut set: Vec<Option<String>> = Vec::new();
        for token in tokens {
            let token = token
                .map(|t| normalize_subdomain(t.as_ref()))
                .filter(|t| !t.is_empty());
            if !set.contains(&token) {
                set.push(token);
            }
        }
        SubdomainConstraint::Fixed(set)
    }

    /// Whether `token` satisfies this constraint.
    ///
    /// `token` is `None` (or empty) for a host without a subdomain.
    ///
    /// # Errors
    ///
    /// Only `Procedure` constraints can fail: the recognize callback's error is
    /// returned as [`crate::RoutingError::Callback`].
    pub fn matches(&self, token: Option<&str>, procs: &SubdomainProcs) -> Result<bool> {
        let token = token
            .map(normalize_subdomain)
            .filter(|t| !t.is_empty());
        match self {
            SubdomainConstraint::Fixed(set) => Ok(set.contains(&token)),
            SubdomainConstraint::Absent => Ok(token.is_none()),
            SubdomainConstraint::Model(_) => Ok(token.as_deref().is_some_and(valid_subdomain)),
            SubdomainConstraint::Procedure(id) => match token {
                Some(token) => procs.recognize(id, &token),
                None => Ok(false),
            },
        }
    }

    /// Named tokens of a `Fixed` constraint, in declaration order.
    ///
    /// Empty for every other variant.
    #[must_use]
    pub fn allowed_names(&self) -> Vec<String> {
        match self {
            SubdomainConstraint::Fixed(set) => set.iter().flatten().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// The only token a `Fixed`/`Absent` constraint admits, if there is exactly one.
    ///
    /// The outer `Option` is "is there a single value"; the inner one is the
    /// token itself (`None` = no subdomain).
    #[must_use]
    pub fn single_token(&self) -> Option<Option<&str>> {
        match self {
            SubdomainConstraint::Fixed(set) if set.len() == 1 => {
                set.first().map(|t| t.as_deref())
            }
            SubdomainConstraint::Absent => Some(None),
            _ => None,
        }
    }

    /// Name of the parameter a `Model` constraint binds the token to.
    #[must_use]
    pub fn model_param(&self) -> Option<String> {
        match self {
            SubdomainConstraint::Model(model) => Some(format!("{model}_id")),
            _ => None,
        }
    }
}

impl fmt::Display for SubdomainConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubdomainConstraint::Fixed(set) => {
                let names: Vec<&str> = set
                    .iter()
                    .map(|t| t.as_deref().unwrap_or("<none>"))
                    .collect();
                write!(f, "{}", names.join("|"))
            }
            SubdomainConstraint::Absent => f.write_str("<none>"),
            SubdomainConstraint::Model(model) => write!(f, "model:{model}"),
            SubdomainConstraint::Procedure(id) => write!(f, "proc:{id}"),
        }
    }
}
