use crate::assertions::ExpectationFailure;
use crate::typename::TypeToken;
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return type of test bodies, setup/teardown hooks and `throws` probes.
pub type TestResult<T = ()> = std::result::Result<T, TestError>;

/// Infrastructure errors that abort a suite run. Test outcomes are never
/// reported through this type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("setup failed: {0}")]
    Setup(TestError),

    #[error("teardown failed: {0}")]
    Teardown(TestError),

    #[error("failed to write to report sink: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write report to {}: {source}", .path.display())]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize XML report: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a test body did not complete normally.
///
/// Any `std::error::Error` converts into this with `?`. An
/// [`ExpectationFailure`] lands in `AssertionFailed`; everything else lands in
/// `Error`, tagged with the static type it was converted from so `throws`
/// can compare error types.
pub enum TestError {
    AssertionFailed(ExpectationFailure),
    Error { kind: TypeToken, source: BoxError },
}

impl TestError {
    /// Wraps anything that can become a boxed error, including plain strings.
    pub fn other<E>(error: E) -> Self
    where
        E: Into<BoxError> + 'static,
    {
        TestError::Error {
            kind: TypeToken::of::<E>(),
            source: error.into(),
        }
    }

    pub fn is_assertion_failure(&self) -> bool {
        matches!(self, TestError::AssertionFailed(_))
    }
}

impl<E> From<E> for TestError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        let kind = TypeToken::of::<E>();
        let source: BoxError = Box::new(error);
        match source.downcast::<ExpectationFailure>() {
            Ok(failure) => TestError::AssertionFailed(*failure),
            Err(source) => TestError::Error { kind, source },
        }
    }
}

/// Type and text of a panic raised with a string payload, as `panic!` with a
/// message produces. `None` for any other payload.
pub(crate) fn panic_text(payload: &(dyn Any + Send)) -> Option<(TypeToken, &str)> {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        Some((TypeToken::of::<&'static str>(), text))
    } else {
        payload
            .downcast_ref::<String>()
            .map(|text| (TypeToken::of::<String>(), text.as_str()))
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::AssertionFailed(failure) => fmt::Display::fmt(failure, f),
            TestError::Error { source, .. } => fmt::Display::fmt(source, f),
        }
    }
}

impl fmt::Debug for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::AssertionFailed(failure) => {
                f.debug_tuple("AssertionFailed").field(failure).finish()
            }
            TestError::Error { kind, source } => f
                .debug_struct("Error")
                .field("kind", &kind.name())
                .field("source", source)
                .finish(),
        }
    }
}
