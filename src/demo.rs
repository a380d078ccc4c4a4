use std::cell::Cell;
use thiserror::Error;
use unitcheck::{expect, Expect, Result, ResultReporter, Suite, TestError, TestResult, TestRunner};

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum DemoSuite {
    /// FizzBuzz checks that all pass
    Fizzbuzz,
    /// One deliberately failing test per failure and error path
    Showcase,
}

impl DemoSuite {
    pub fn run(self, reporter: &mut dyn ResultReporter) -> Result<Suite> {
        match self {
            DemoSuite::Fizzbuzz => fizzbuzz_suite(reporter),
            DemoSuite::Showcase => showcase_suite(reporter),
        }
    }
}

#[derive(Error, Debug)]
#[error("value should be greater than 0")]
pub struct FizzBuzzError;

pub fn fizz_or_buzz(n: i32) -> std::result::Result<String, FizzBuzzError> {
    if n <= 0 {
        return Err(FizzBuzzError);
    }
    Ok(match (n % 3, n % 5) {
        (0, 0) => "fizzbuzz".to_string(),
        (_, 0) => "buzz".to_string(),
        (0, _) => "fizz".to_string(),
        _ => n.to_string(),
    })
}

fn check_all(inputs: &[i32], expected: &str) -> TestResult {
    for &n in inputs {
        Expect::with_prefix(fizz_or_buzz(n)?, format!("for {}, ", n)).is(expected)?;
    }
    Ok(())
}

pub fn fizzbuzz_suite(reporter: &mut dyn ResultReporter) -> Result<Suite> {
    let start = Cell::new(0);
    let mut runner = TestRunner::new("FizzBuzz Test", file!(), reporter)?;

    runner
        .setup(|| {
            start.set(1);
            Ok(())
        })?
        .test("Divisibility by 3", || check_all(&[3, 6, 9], "fizz"))?
        .test("Divisibility by 5", || check_all(&[5, 10, 20], "buzz"))?
        .test("Divisibility by 3 and 5", || check_all(&[15, 30, 45], "fizzbuzz"))?
        .test("Others", || {
            for n in [1, 2, 7] {
                expect(fizz_or_buzz(n)?).is(n.to_string())?;
            }
            Ok(())
        })?
        .test("Non-positive input", || {
            expect(|| -> TestResult {
                fizz_or_buzz(-2)?;
                Ok(())
            })
            .throws_with_message::<FizzBuzzError>("value should be greater than 0")?;
            expect(|| -> TestResult {
                fizz_or_buzz(0)?;
                Ok(())
            })
            .throws::<FizzBuzzError>()?;
            Ok(())
        })?
        .test("Output shape", || {
            let sequence: Vec<String> = (start.get()..=15)
                .map(fizz_or_buzz)
                .collect::<std::result::Result<_, _>>()?;
            expect(sequence.len()).is(15_usize)?;
            expect(sequence.join(",")).has("fizz,4,buzz")?;
            expect(sequence.join(",")).matches(r"^1,2,fizz")?;
            Ok(())
        })?
        .teardown(|| {
            start.set(0);
            Ok(())
        })?
        .summarize()?;

    Ok(runner.suite().clone())
}

/// Every test here fails or errors on purpose, to show how each outcome is
/// reported.
pub fn showcase_suite(reporter: &mut dyn ResultReporter) -> Result<Suite> {
    let mut runner = TestRunner::new("Failure Showcase", file!(), reporter)?;

    runner
        .test("check is not", || {
            expect(5).is_not(6)?;
            expect(5).is_not(5)?;
            Ok(())
        })?
        .test("check is true", || {
            let ten = 10;
            expect(ten == 10).is_true()?;
            expect(ten != 10).is_true()?;
            Ok(())
        })?
        .test("check numerical not less than", || {
            expect(5).not_less_than(5)?;
            expect(5).not_less_than(10)?;
            Ok(())
        })?
        .test("check numerical not greater than", || {
            expect(5).not_greater_than(5)?;
            expect(5).not_greater_than(1)?;
            Ok(())
        })?
        .test("check substring", || {
            expect("some text").has("me te")?;
            expect("some text").has("text1")?;
            Ok(())
        })?
        .test("expect error with wrong message", || {
            expect(|| -> TestResult {
                fizz_or_buzz(-2)?;
                Ok(())
            })
            .throws_with_message::<FizzBuzzError>("value should be greater than 1")?;
            Ok(())
        })?
        .test("expect error of wrong type", || {
            expect(|| -> TestResult {
                fizz_or_buzz(-2)?;
                Ok(())
            })
            .throws::<std::num::ParseIntError>()?;
            Ok(())
        })?
        .test("expect error that never happens", || {
            expect(|| -> TestResult {
                fizz_or_buzz(2)?;
                Ok(())
            })
            .throws::<FizzBuzzError>()?;
            Ok(())
        })?
        .test("unhandled error", || {
            let parsed: i32 = "fizz".parse()?;
            expect(parsed).is(0)?;
            Ok(())
        })?
        .test("explicit error", || Err(TestError::other("service unavailable")))?
        .test("unknown error", || std::panic::panic_any(5_i32))?
        .summarize()?;

    Ok(runner.suite().clone())
}
