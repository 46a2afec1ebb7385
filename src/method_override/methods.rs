//! Method sets: which candidates are recognized, which originals are eligible.
//!
//! # Design Decisions
//! - Recognition is case-insensitive, the applied method is upper-cased
//! - Eligibility is case-sensitive against the method as received
//! - Both sets are per-engine values, never process-wide state

use std::collections::BTreeSet;
use std::fmt;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::method_override::error::OverrideError;

/// Method tokens recognized out of the box.
pub const STANDARD_METHODS: &[&str] = &[
    "ACL",
    "BIND",
    "CHECKOUT",
    "CONNECT",
    "COPY",
    "DELETE",
    "GET",
    "HEAD",
    "LINK",
    "LOCK",
    "M-SEARCH",
    "MERGE",
    "MKACTIVITY",
    "MKCALENDAR",
    "MKCOL",
    "MOVE",
    "NOTIFY",
    "OPTIONS",
    "PATCH",
    "POST",
    "PROPFIND",
    "PROPPATCH",
    "PURGE",
    "PUT",
    "QUERY",
    "REBIND",
    "REPORT",
    "SEARCH",
    "SOURCE",
    "SUBSCRIBE",
    "TRACE",
    "UNBIND",
    "UNLINK",
    "UNLOCK",
    "UNSUBSCRIBE",
];

/// The registry of methods a candidate may be overridden to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedMethods {
    tokens: BTreeSet<String>,
}

impl RecognizedMethods {
    /// The standard token set.
    pub fn standard() -> Self {
        Self {
            tokens: STANDARD_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Register an extension method. Stored upper-cased.
    pub fn register(&mut self, token: &str) -> Result<(), OverrideError> {
        let upper = token.to_ascii_uppercase();
        if upper.is_empty() || Method::from_bytes(upper.as_bytes()).is_err() {
            return Err(OverrideError::InvalidExtensionMethod(token.to_string()));
        }
        self.tokens.insert(upper);
        Ok(())
    }

    /// Builder-style [`register`](Self::register) for several tokens.
    pub fn with_extensions<I, T>(mut self, tokens: I) -> Result<Self, OverrideError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for token in tokens {
            self.register(token.as_ref())?;
        }
        Ok(self)
    }

    /// Match `candidate` case-insensitively, returning the upper-cased method.
    pub fn recognize(&self, candidate: &str) -> Option<Method> {
        let upper = candidate.to_ascii_uppercase();
        if !self.tokens.contains(&upper) {
            return None;
        }
        Method::from_bytes(upper.as_bytes()).ok()
    }
}

impl Default for RecognizedMethods {
    fn default() -> Self {
        Self::standard()
    }
}

/// Transport methods eligible for override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AllowedMethodsRepr", into = "AllowedMethodsRepr")]
pub enum AllowedMethods {
    /// Only `POST`.
    #[default]
    Default,
    /// Every method is eligible.
    Any,
    /// Exactly these tokens, compared case-sensitively.
    Only(Vec<String>),
}

impl AllowedMethods {
    pub fn only<I, T>(methods: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        AllowedMethods::Only(methods.into_iter().map(Into::into).collect())
    }

    /// Whether a request whose transport method is `original` may be overridden.
    pub fn is_eligible(&self, original: &Method) -> bool {
        match self {
            AllowedMethods::Default => *original == Method::POST,
            AllowedMethods::Any => true,
            AllowedMethods::Only(methods) => methods.iter().any(|m| m == original.as_str()),
        }
    }

    /// Reject tokens that could never appear as a request method.
    pub fn validate(&self) -> Result<(), OverrideError> {
        if let AllowedMethods::Only(methods) = self {
            for method in methods {
                if method.is_empty() || Method::from_bytes(method.as_bytes()).is_err() {
                    return Err(OverrideError::InvalidAllowedMethod(method.clone()));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for AllowedMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowedMethods::Default => write!(f, "POST"),
            AllowedMethods::Any => write!(f, "*"),
            AllowedMethods::Only(methods) => write!(f, "{}", methods.join(",")),
        }
    }
}

/// Config representation: the keyword `"any"` / `"default"` or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AllowedMethodsRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<AllowedMethodsRepr> for AllowedMethods {
    type Error = String;

    fn try_from(repr: AllowedMethodsRepr) -> Result<Self, Self::Error> {
        match repr {
            AllowedMethodsRepr::Keyword(k) if k.eq_ignore_ascii_case("any") => Ok(AllowedMethods::Any),
            AllowedMethodsRepr::Keyword(k) if k.eq_ignore_ascii_case("default") => {
                Ok(AllowedMethods::Default)
            }
            AllowedMethodsRepr::Keyword(k) => Err(format!(
                "expected \"any\", \"default\" or a list of methods, found {:?}",
                k
            )),
            AllowedMethodsRepr::List(list) => Ok(AllowedMethods::Only(list)),
        }
    }
}

impl From<AllowedMethods> for AllowedMethodsRepr {
    fn from(methods: AllowedMethods) -> Self {
        match methods {
            AllowedMethods::Default => AllowedMethodsRepr::Keyword("default".to_string()),
            AllowedMethods::Any => AllowedMethodsRepr::Keyword("any".to_string()),
            AllowedMethods::Only(list) => AllowedMethodsRepr::List(list),
        }
    }
}
