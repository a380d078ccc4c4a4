use super::{expect, Expect, Expectation, ExpectationFailure};
use crate::errors::{panic_text, TestError, TestResult};
use crate::typename::TypeToken;
use std::panic::{self, AssertUnwindSafe};

impl<F, R> Expect<F>
where
    F: FnOnce() -> TestResult<R>,
{
    /// Runs the probe and expects it to fail with an error of type `E`.
    pub fn throws<E: 'static>(self) -> Expectation {
        self.probe::<E>(None)
    }

    /// Like [`Expect::throws`], and the error's message must equal `message`.
    pub fn throws_with_message<E: 'static>(self, message: &str) -> Expectation {
        self.probe::<E>(Some(message))
    }

    // The type and message comparisons are ordinary nested expectations, so a
    // mismatch there reads like any other assertion failure.
    fn probe<E: 'static>(self, message: Option<&str>) -> Expectation {
        let expected = TypeToken::of::<E>();

        match panic::catch_unwind(AssertUnwindSafe(self.actual)) {
            Ok(Ok(_)) => Err(ExpectationFailure::new(
                "expected exception, but no exception thrown",
            )),
            Ok(Err(TestError::AssertionFailed(failure))) => Err(failure),
            Ok(Err(TestError::Error { kind, source })) => {
                matches_raised(expected, message, kind, &source.to_string())
            }
            Err(payload) => match payload.downcast::<ExpectationFailure>() {
                Ok(failure) => Err(*failure),
                Err(payload) => match panic_text(payload.as_ref()) {
                    Some((kind, text)) => matches_raised(expected, message, kind, text),
                    None => Err(ExpectationFailure::new(format!(
                        "expected exception of type {}",
                        expected
                    ))),
                },
            },
        }
    }
}

fn matches_raised(
    expected: TypeToken,
    message: Option<&str>,
    kind: TypeToken,
    text: &str,
) -> Expectation {
    expect(kind).is(expected)?;
    if let Some(message) = message {
        expect(text).is(message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::assertions::{expect, ExpectationFailure};
    use crate::errors::TestResult;
    use pretty_assertions::assert_eq;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("value should be greater than 0")]
    struct FizzBuzzError;

    #[derive(Error, Debug)]
    #[error("other")]
    struct OtherError;

    fn fizz_or_buzz(n: i32) -> TestResult<String> {
        if n <= 0 {
            return Err(FizzBuzzError.into());
        }
        Ok(n.to_string())
    }

    #[test]
    fn test_throws_matching_type_and_message() {
        assert!(expect(|| fizz_or_buzz(-2))
            .throws_with_message::<FizzBuzzError>("value should be greater than 0")
            .is_ok());
        assert!(expect(|| fizz_or_buzz(-2)).throws::<FizzBuzzError>().is_ok());
    }

    #[test]
    fn test_throws_with_wrong_message_cites_both_texts() {
        let failure = expect(|| fizz_or_buzz(-2))
            .throws_with_message::<FizzBuzzError>("value should be greater than 1")
            .unwrap_err();
        assert_eq!(
            failure.message(),
            "expected is 'value should be greater than 1', but actual is 'value should be greater than 0'"
        );
    }

    #[test]
    fn test_throws_with_wrong_type_names_expected_type() {
        let failure = expect(|| fizz_or_buzz(-2)).throws::<OtherError>().unwrap_err();
        assert!(failure
            .message()
            .contains("unitcheck::assertions::throws::tests::OtherError"));
        assert!(failure
            .message()
            .contains("unitcheck::assertions::throws::tests::FizzBuzzError"));
    }

    #[test]
    fn test_throws_without_error() {
        let failure = expect(|| fizz_or_buzz(2)).throws::<FizzBuzzError>().unwrap_err();
        assert_eq!(
            failure.message(),
            "expected exception, but no exception thrown"
        );

        let failure = expect(|| fizz_or_buzz(2))
            .throws_with_message::<FizzBuzzError>("message")
            .unwrap_err();
        assert_eq!(
            failure.message(),
            "expected exception, but no exception thrown"
        );
    }

    #[test]
    fn test_throws_propagates_inner_assertion_failure() {
        let failure = expect(|| -> TestResult {
            expect(1).is(2)?;
            Ok(())
        })
        .throws::<FizzBuzzError>()
        .unwrap_err();
        assert_eq!(failure.message(), "expected is '2', but actual is '1'");
    }

    #[test]
    fn test_throws_on_opaque_panic() {
        let failure = expect(|| -> TestResult { std::panic::panic_any(5) })
            .throws::<FizzBuzzError>()
            .unwrap_err();
        assert_eq!(
            failure.message(),
            "expected exception of type unitcheck::assertions::throws::tests::FizzBuzzError"
        );
    }

    #[test]
    fn test_throws_matches_text_panics() {
        assert!(expect(|| -> TestResult { panic!("value should be > 0") })
            .throws_with_message::<&str>("value should be > 0")
            .is_ok());
        assert!(expect(|| -> TestResult { panic!("value should be > {}", 0) })
            .throws_with_message::<String>("value should be > 0")
            .is_ok());
    }

    #[test]
    fn test_throws_text_panic_with_wrong_message_or_type() {
        let failure = expect(|| -> TestResult { panic!("value should be > 0") })
            .throws_with_message::<&str>("value should be > 1")
            .unwrap_err();
        assert_eq!(
            failure.message(),
            "expected is 'value should be > 1', but actual is 'value should be > 0'"
        );

        let failure = expect(|| -> TestResult { panic!("value should be > 0") })
            .throws::<FizzBuzzError>()
            .unwrap_err();
        assert_eq!(
            failure.message(),
            "expected is 'unitcheck::assertions::throws::tests::FizzBuzzError', but actual is '&str'"
        );
    }

    #[test]
    fn test_throws_propagates_panicked_assertion_failure() {
        let failure = expect(|| -> TestResult {
            std::panic::panic_any(ExpectationFailure::new("inner"))
        })
        .throws::<FizzBuzzError>()
        .unwrap_err();
        assert_eq!(failure.message(), "inner");
    }
}
