//! The per-request override decision.
//!
//! # Responsibilities
//! - Record the transport method once per request
//! - Skip requests whose transport method is not eligible, without calling
//!   the getter
//! - Normalize and recognize the candidate, then apply it upper-cased
//! - Always hand control to the continuation
//!
//! # Design Decisions
//! - Immutable after construction; cloning shares the same configuration
//! - No error path: anything unusable leaves the method untouched

use std::sync::Arc;

use axum::http::Method;

use crate::config::OverrideConfig;
use crate::method_override::error::OverrideError;
use crate::method_override::getter::{build_getter, Getter, Source};
use crate::method_override::methods::{AllowedMethods, RecognizedMethods};
use crate::method_override::value::ParamValue;
use crate::method_override::view::{RequestView, ResponseView};

/// What a single resolution did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The transport method is not on the allow-list; the getter was not called.
    Ineligible,
    /// The getter produced nothing usable.
    NoCandidate,
    /// A candidate was found but is not a recognized method.
    Unrecognized(String),
    /// The effective method was replaced.
    Overridden { from: Method, to: Method },
}

/// A configured method override engine.
#[derive(Debug, Clone)]
pub struct MethodOverride {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    getter: Getter,
    allowed: AllowedMethods,
    recognized: RecognizedMethods,
}

impl MethodOverride {
    /// Engine for `source` with the default allow-list (`POST`).
    pub fn new(source: impl Into<Source>) -> Result<Self, OverrideError> {
        Self::builder().source(source).build()
    }

    pub fn builder() -> MethodOverrideBuilder {
        MethodOverrideBuilder::default()
    }

    pub fn from_config(config: &OverrideConfig) -> Result<Self, OverrideError> {
        Self::builder()
            .source(config.source.clone())
            .allowed_methods(config.methods.clone())
            .extension_methods(config.extension_methods.iter().cloned())
            .build()
    }

    pub fn getter(&self) -> &Getter {
        &self.inner.getter
    }

    pub fn allowed_methods(&self) -> &AllowedMethods {
        &self.inner.allowed
    }

    pub fn recognized_methods(&self) -> &RecognizedMethods {
        &self.inner.recognized
    }

    /// Decide and apply the override for one request.
    pub fn resolve<R, S>(&self, req: &mut R, res: &mut S) -> Outcome
    where
        R: RequestView,
        S: ResponseView,
    {
        if req.original_method().is_none() {
            let method = req.method().clone();
            req.set_original_method(method);
        }
        let original = req
            .original_method()
            .cloned()
            .unwrap_or_else(|| req.method().clone());

        if !self.inner.allowed.is_eligible(&original) {
            return Outcome::Ineligible;
        }

        let value = self.inner.getter.get(&*req, &mut *res);
        let candidate = match value.as_ref().and_then(ParamValue::first) {
            Some(candidate) => candidate,
            None => return Outcome::NoCandidate,
        };

        match self.inner.recognized.recognize(candidate) {
            Some(method) => {
                tracing::debug!(
                    original = %original,
                    method = %method,
                    "Method overridden"
                );
                req.set_method(method.clone());
                Outcome::Overridden {
                    from: original,
                    to: method,
                }
            }
            None => {
                tracing::trace!(original = %original, candidate = %candidate, "Ignoring unrecognized override");
                Outcome::Unrecognized(candidate.to_string())
            }
        }
    }

    /// [`resolve`](Self::resolve), then continue with `proceed` unconditionally.
    pub fn handle<R, S, F, T>(&self, req: &mut R, res: &mut S, proceed: F) -> T
    where
        R: RequestView,
        S: ResponseView,
        F: FnOnce(&mut R, &mut S) -> T,
    {
        self.resolve(req, res);
        proceed(req, res)
    }
}

impl Default for MethodOverride {
    fn default() -> Self {
        Self {
            inner: Arc::new(Inner {
                getter: Getter::default(),
                allowed: AllowedMethods::Default,
                recognized: RecognizedMethods::standard(),
            }),
        }
    }
}

/// Builder for [`MethodOverride`].
#[derive(Debug, Default)]
pub struct MethodOverrideBuilder {
    source: Source,
    allowed: AllowedMethods,
    extensions: Vec<String>,
    recognized: Option<RecognizedMethods>,
}

impl MethodOverrideBuilder {
    pub fn source(mut self, source: impl Into<Source>) -> Self {
        self.source = source.into();
        self
    }

    /// Use a custom extractor function.
    pub fn extractor<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn RequestView, &mut dyn ResponseView) -> Option<ParamValue> + Send + Sync + 'static,
    {
        self.source = Source::function(f);
        self
    }

    pub fn allowed_methods(mut self, allowed: AllowedMethods) -> Self {
        self.allowed = allowed;
        self
    }

    /// Make every transport method eligible.
    pub fn allow_any_method(self) -> Self {
        self.allowed_methods(AllowedMethods::Any)
    }

    /// Extra tokens recognized on top of the registry.
    pub fn extension_methods<I, T>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.extensions.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Replace the recognized-method registry.
    pub fn recognized_methods(mut self, recognized: RecognizedMethods) -> Self {
        self.recognized = Some(recognized);
        self
    }

    pub fn build(self) -> Result<MethodOverride, OverrideError> {
        self.allowed.validate()?;
        let getter = build_getter(self.source)?;
        let recognized = self
            .recognized
            .unwrap_or_default()
            .with_extensions(&self.extensions)?;

        Ok(MethodOverride {
            inner: Arc::new(Inner {
                getter,
                allowed: self.allowed,
                recognized,
            }),
        })
    }
}
