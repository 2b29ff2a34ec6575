//! # Subdomain Procedure Registry
//!
//! Maps a procedure identifier (e.g. `"city"`) to the callbacks that decide
//! whether a subdomain belongs to it (*recognize*) and which subdomain a link
//! should point at (*generate*).
//!
//! ## Truthiness
//!
//! A recognize callback may return anything implementing [`Truthiness`]. Only
//! `false`, `()` and `None` reject; every other value accepts. This lets a
//! recognizer return the domain object it looked up, e.g.
//! `Option<Arc<City>>`, instead of a bare `bool`.
//!
//! ## Concurrency
//!
//! Both maps live behind [`ArcSwap`]: lookups on the request path are lock-free
//! and never block each other, and registrations replace the whole map with
//! `rcu`, so concurrent writers are serialised and the last one wins.

use crate::error::{Result, RoutingError};
use crate::request::{Params, Request};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Value returned by a recognize callback.
pub trait Truthiness {
    /// `false` only for values meaning "no" (`false`, nil, unit).
    fn is_truthy(&self) -> bool;
}

impl Truthiness for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthiness for () {
    fn is_truthy(&self) -> bool {
        false
    }
}

impl<T: Truthiness> Truthiness for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthiness::is_truthy)
    }
}

impl<T: ?Sized> Truthiness for Arc<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T: ?Sized> Truthiness for Rc<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T: ?Sized> Truthiness for Box<T> {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl<T: ?Sized> Truthiness for &T {
    fn is_truthy(&self) -> bool {
        true
    }
}

macro_rules! always_truthy {
    ($($t:ty),*) => {
        $(impl Truthiness for $t {
            fn is_truthy(&self) -> bool {
                true
            }
        })*
    };
}

// Empty strings and zero are still values, not "no".
always_truthy!(String, i32, i64, u32, u64, usize, serde_json::Map<String, serde_json::Value>);

impl Truthiness for serde_json::Value {
    fn is_truthy(&self) -> bool {
        !matches!(self, serde_json::Value::Null | serde_json::Value::Bool(false))
    }
}

type RecognizeFn = dyn Fn(&str) -> anyhow::Result<bool> + Send + Sync;
type GenerateFn = dyn Fn(Option<&Request>, Option<&Params>) -> anyhow::Result<String> + Send + Sync;

/// Registry of recognize/generate callbacks keyed by procedure identifier.
#[derive(Default)]
pub struct SubdomainProcs {
    recognizers: ArcSwap<HashMap<String, Arc<RecognizeFn>>>,
    generators: ArcSwap<HashMap<String, Arc<GenerateFn>>>,
}

impl SubdomainProcs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the recognize callback for `id`, replacing any previous one.
    ///
    /// The callback receives the lowercased subdomain token.
    ///
    /// # Example
    ///
    /// ```rust
    /// use subdomain_routes::procs::SubdomainProcs;
    ///
    /// let procs = SubdomainProcs::new();
    /// procs.register_recognize("city", |city| Ok(["boston", "hobart"].contains(&city)));
    /// assert!(procs.recognize("city", "boston").unwrap());
    /// assert!(!procs.recognize("city", "www").unwrap());
    /// ```
    pub fn register_recognize<F, T>(&self, id: &str, recognize: F)
    where
        F: Fn(&str) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Truthiness,
    {
        let callback: Arc<RecognizeFn> =
            Arc::new(move |token: &str| recognize(token).map(|v| v.is_truthy()));
        self.recognizers.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(id.to_string(), Arc::clone(&callback));
            next
        });
        debug!(proc_id = %id, "Registered subdomain recognizer");
    }

    /// Register the generate callback for `id`, replacing any previous one.
    ///
    /// The callback receives the ambient request (if any) and the `context`
    /// passed to URL generation (if any). Its output is lowercased and
    /// re-validated by the caller.
    pub fn register_generate<F, S>(&self, id: &str, generate: F)
    where
        F: Fn(Option<&Request>, Option<&Params>) -> anyhow::Result<S> + Send + Sync + 'static,
        S: Into<String>,
    {
        let callback: Arc<GenerateFn> = Arc::new(
            move |request: Option<&Request>, context: Option<&Params>| {
                generate(request, context).map(Into::into)
            },
        );
        self.generators.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(id.to_string(), Arc::clone(&callback));
            next
        });
        debug!(proc_id = %id, "Registered subdomain generator");
    }

    /// Run the recognize callback for `id` on `token`.
    ///
    /// An unregistered `id` never matches.
    ///
    /// # Errors
    ///
    /// [`RoutingError::Callback`] carrying whatever the callback returned.
    pub fn recognize(&self, id: &str, token: &str) -> Result<bool> {
        let callback = self.recognizers.load().get(id).cloned();
        let Some(callback) = callback else {
            debug!(proc_id = %id, subdomain = %token, "No recognizer registered, not matching");
            return Ok(false);
        };
        match callback(token) {
            Ok(matched) => Ok(matched),
            Err(err) => {
                warn!(proc_id = %id, subdomain = %token, error = %err, "Subdomain recognizer failed");
                Err(RoutingError::Callback(err))
            }
        }
    }

    /// Run the generate callback for `id`.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::GeneratorMissing`] if no generator is registered
    /// - [`RoutingError::Callback`] carrying whatever the callback returned
    pub fn generate(
        &self,
        id: &str,
        request: Option<&Request>,
        context: Option<&Params>,
    ) -> Result<String> {
        let callback = self.generators.load().get(id).cloned();
        let Some(callback) = callback else {
            return Err(RoutingError::GeneratorMissing { id: id.to_string() });
        };
        callback(request, context).map_err(|err| {
            warn!(proc_id = %id, error = %err, "Subdomain generator failed");
            RoutingError::Callback(err)
        })
    }

    #[must_use]
    pub fn has_recognizer(&self, id: &str) -> bool {
        self.recognizers.load().contains_key(id)
    }

    #[must_use]
    pub fn has_generator(&self, id: &str) -> bool {
        self.generators.load().contains_key(id)
    }

    /// Drop every registered callback.
    pub fn clear(&self) {
        self.recognizers.store(Arc::new(HashMap::new()));
        self.generators.store(Arc::new(HashMap::new()));
    }
}

impl fmt::Debug for SubdomainProcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut recognizers: Vec<String> = self.recognizers.load().keys().cloned().collect();
        let mut generators: Vec<String> = self.generators.load().keys().cloned().collect();
        recognizers.sort();
        generators.sort();
        f.debug_struct("SubdomainProcs")
            .field("recognizers", &recognizers)
            .field("generators", &generators)
            .finish()
    }
}
