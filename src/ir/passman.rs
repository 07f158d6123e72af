//! # Pass Interface
//!
//! The common interface of the analyses that run on a single function: the
//! error type they report, the [LocalPass] trait, and the string-keyed
//! parameters passes read their options from.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::{Context, Func};

#[derive(Debug, Error)]
pub enum PassErrorKind {
    #[error("analysis error")]
    AnalysisError,
}

#[derive(Debug, Error)]
#[error("{kind} on {pass_name}: {err}")]
pub struct PassError {
    kind: PassErrorKind,
    err: Box<dyn std::error::Error + Send + Sync>,
    pass_name: String,
}

pub type PassResult<T> = Result<T, PassError>;

impl PassError {
    pub fn analysis_error(
        pass_name: impl Into<String>,
        err: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            kind: PassErrorKind::AnalysisError,
            err,
            pass_name: pass_name.into(),
        }
    }

    pub fn kind(&self) -> &PassErrorKind { &self.kind }

    pub fn pass_name(&self) -> &str { &self.pass_name }

    /// The underlying error reported by the pass.
    pub fn err(&self) -> &(dyn std::error::Error + Send + Sync + 'static) { self.err.as_ref() }
}

/// The value of a parameter could not be understood by the pass.
#[derive(Debug, Error)]
#[error("unknown option value `{0}`")]
pub struct UnknownOption(pub String);

/// A pass that can be run on a function.
pub trait LocalPass {
    /// The output of the pass.
    type Output;

    /// Run the pass on the given function.
    fn run(&mut self, ctx: &Context, func: Func) -> PassResult<Self::Output>;

    /// Read the options of the pass from `params`.
    fn fetch_params(&mut self, _params: &ParamStorage) {}
}

/// String-keyed pass parameters.
///
/// Values are stored as strings and parsed on access, a value that does not
/// parse reads as absent.
#[derive(Default)]
pub struct ParamStorage {
    parameters: FxHashMap<String, String>,
}

impl ParamStorage {
    pub fn new() -> Self { Self::default() }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.parameters.insert(name.into(), value.to_string());
    }

    /// Overwrite a parameter, only if it is already present.
    pub fn set<T: ToString>(&mut self, name: impl Into<String>, value: T) {
        if let Some(param) = self.parameters.get_mut(&name.into()) {
            *param = value.to_string();
        }
    }

    pub fn get<T: FromStr>(&self, name: impl AsRef<str>) -> Option<T> {
        self.parameters
            .get(name.as_ref())
            .and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> { self.parameters.iter() }
}

#[cfg(test)]
mod tests {
    use super::{ParamStorage, PassError, PassErrorKind, UnknownOption};

    #[test]
    fn test_param_storage() {
        let mut params = ParamStorage::new();
        params.insert("depth", 3);
        params.set("depth", 4);
        // `set` does not create parameters
        params.set("width", 1);

        assert_eq!(params.get::<u32>("depth"), Some(4));
        assert_eq!(params.get::<u32>("width"), None);

        params.insert("depth", "deep");
        assert_eq!(params.get::<u32>("depth"), None);
        assert_eq!(params.iter().count(), 1);
    }

    #[test]
    fn test_pass_error_display() {
        let err = PassError::analysis_error("dummy", Box::new(UnknownOption("x".into())));
        assert!(matches!(err.kind(), PassErrorKind::AnalysisError));
        assert_eq!(err.pass_name(), "dummy");
        assert_eq!(
            err.to_string(),
            "analysis error on dummy: unknown option value `x`"
        );
    }
}
