use super::{Expect, Expectation};
use regex::Regex;

impl<T: AsRef<str>> Expect<T> {
    /// Passes when `expected` occurs anywhere in the observed string. The
    /// empty string is contained in every string.
    pub fn has(&self, expected: &str) -> Expectation {
        let actual = self.actual.as_ref();
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(self.fail(format_args!(
                "actual string '{}' does not contain expected string '{}'",
                actual, expected
            )))
        }
    }

    /// Passes when the regular expression `pattern` matches somewhere in the
    /// observed string. An invalid pattern fails the expectation.
    pub fn matches(&self, pattern: &str) -> Expectation {
        let actual = self.actual.as_ref();
        match Regex::new(pattern) {
            Ok(re) if re.is_match(actual) => Ok(()),
            Ok(_) => Err(self.fail(format_args!(
                "actual string '{}' does not match pattern '/{}/'",
                actual, pattern
            ))),
            Err(e) => Err(self.fail(format_args!("invalid pattern '/{}/': {}", pattern, e))),
        }
    }
}
