pub mod ordering;
pub mod text;
pub mod throws;

use std::fmt::Display;
use thiserror::Error;

/// Raised by [`Expect`] when a claim about the observed value does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExpectationFailure {
    message: String,
}

impl ExpectationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Expectation = Result<(), ExpectationFailure>;

/// Wraps one observed value. Which checks are available depends on what the
/// value's type supports: ordering needs `PartialOrd`, substring checks need
/// `AsRef<str>`, `is_true` needs `bool` and `throws` needs a probe closure.
///
/// `is` and `is_not` compare with the value's own `PartialEq`, and both
/// sides must implement `Display` because the failure message quotes them.
/// Collections have no `Display`, so compare a rendered form instead:
///
/// ```
/// use unitcheck::expect;
///
/// let values = vec![1, 2, 3];
/// assert!(expect(values.len()).is(3).is_ok());
/// assert!(expect(format!("{:?}", values)).is("[1, 2, 3]").is_ok());
/// ```
///
/// ```compile_fail
/// use unitcheck::expect;
///
/// let _ = expect(vec![1, 2, 3]).is(vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Expect<T> {
    actual: T,
    prefix: String,
}

pub fn expect<T>(actual: T) -> Expect<T> {
    Expect::new(actual)
}

impl<T> Expect<T> {
    pub fn new(actual: T) -> Self {
        Self {
            actual,
            prefix: String::new(),
        }
    }

    /// The prefix is prepended verbatim to every failure message.
    pub fn with_prefix(actual: T, prefix: impl Into<String>) -> Self {
        Self {
            actual,
            prefix: prefix.into(),
        }
    }

    pub fn actual(&self) -> &T {
        &self.actual
    }

    pub(crate) fn fail(&self, message: impl Display) -> ExpectationFailure {
        ExpectationFailure::new(format!("{}{}", self.prefix, message))
    }
}

impl<T: Display> Expect<T> {
    pub(crate) fn mismatch(&self, operation: &str, expected: &dyn Display) -> ExpectationFailure {
        ExpectationFailure::new(format_mismatch(
            &self.prefix,
            operation,
            expected,
            &self.actual,
        ))
    }

    pub fn is<U>(&self, expected: U) -> Expectation
    where
        T: PartialEq<U>,
        U: Display,
    {
        if self.actual == expected {
            Ok(())
        } else {
            Err(self.mismatch("", &expected))
        }
    }

    pub fn is_not<U>(&self, expected: U) -> Expectation
    where
        T: PartialEq<U>,
        U: Display,
    {
        if self.actual != expected {
            Ok(())
        } else {
            Err(self.mismatch("not ", &expected))
        }
    }
}

impl Expect<bool> {
    pub fn is_true(&self) -> Expectation {
        if self.actual {
            Ok(())
        } else {
            Err(self.mismatch("", &true))
        }
    }

    pub fn is_false(&self) -> Expectation {
        if !self.actual {
            Ok(())
        } else {
            Err(self.mismatch("", &false))
        }
    }
}

/// Single source of the comparison message format.
pub fn format_mismatch(
    prefix: &str,
    operation: &str,
    expected: &dyn Display,
    actual: &dyn Display,
) -> String {
    format!(
        "{}expected is '{}{}', but actual is '{}'",
        prefix, operation, expected, actual
    )
}
