use crate::assertions::ExpectationFailure;
use crate::errors::{panic_text, Error, Result, TestError, TestResult};
use crate::runner::outcome::{Status, Suite, TestCase};
use crate::runner::reporter::{OutputFormat, ResultReporter, StreamWriter};
use crate::runner::structured::StructuredWriter;
use crate::typename::type_name_of;
use std::any::Any;
use std::cell::Cell;
use std::io::{self, Stdout};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

const UNKNOWN_ERROR: &str = "unknown error";

thread_local! {
    static IN_TEST_BODY: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is inside a test body run by [`TestRunner::test`].
/// A panic hook can use this to tell classified panics from fatal ones.
pub fn in_test_body() -> bool {
    IN_TEST_BODY.with(Cell::get)
}

/// Marks the current thread as running a test body until dropped.
struct TestBodyGuard {
    previous: bool,
}

impl TestBodyGuard {
    fn enter() -> Self {
        Self {
            previous: IN_TEST_BODY.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for TestBodyGuard {
    fn drop(&mut self) {
        let previous = self.previous;
        IN_TEST_BODY.with(|flag| flag.set(previous));
    }
}

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    pub output_format: OutputFormat,
    /// Where to write a structured report; standard output when unset.
    pub output: Option<PathBuf>,
    /// Echo structured results to the console while they are collected.
    pub console: bool,
    pub color: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Text,
            output: None,
            console: true,
            color: false,
        }
    }
}

/// Runs the tests of one suite, strictly in the order they are declared.
///
/// Every step returns the runner again so a suite reads as one chain:
///
/// ```no_run
/// use unitcheck::{expect, TestRunner};
///
/// # fn main() -> unitcheck::Result<()> {
/// let mut runner = TestRunner::console("FizzBuzz", file!())?;
/// runner
///     .test("fizz", || {
///         expect(String::from("fizz")).is("fizz")?;
///         Ok(())
///     })?
///     .summarize()?;
/// std::process::exit(runner.suite().exit_code());
/// # }
/// ```
pub struct TestRunner<R: ResultReporter> {
    suite: Suite,
    reporter: R,
}

impl TestRunner<StreamWriter<Stdout>> {
    /// A runner that prints plain result lines to standard output.
    pub fn console(description: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        Self::new(description, source, StreamWriter::stdout())
    }
}

impl<R: ResultReporter> TestRunner<R> {
    pub fn new(
        description: impl Into<String>,
        source: impl Into<String>,
        mut reporter: R,
    ) -> Result<Self> {
        let suite = Suite::new(description, source);
        tracing::debug!("Starting suite '{}' ({})", suite.description, suite.source);
        reporter.describe(&suite.description, &suite.source)?;
        Ok(Self { suite, reporter })
    }

    /// Runs `hook` right away. A failing hook is not a test outcome; it
    /// aborts the chain.
    pub fn setup<F>(&mut self, hook: F) -> Result<&mut Self>
    where
        F: FnOnce() -> TestResult,
    {
        hook().map_err(|e| {
            tracing::warn!("Setup of suite '{}' failed: {}", self.suite.description, e);
            Error::Setup(e)
        })?;
        Ok(self)
    }

    pub fn teardown<F>(&mut self, hook: F) -> Result<&mut Self>
    where
        F: FnOnce() -> TestResult,
    {
        hook().map_err(|e| {
            tracing::warn!("Teardown of suite '{}' failed: {}", self.suite.description, e);
            Error::Teardown(e)
        })?;
        Ok(self)
    }

    /// Runs one test body, classifies and times it, and hands the result to
    /// the reporter. Only a reporter I/O failure makes this return `Err`.
    pub fn test<F>(&mut self, description: &str, body: F) -> Result<&mut Self>
    where
        F: FnOnce() -> TestResult,
    {
        let start = Instant::now();
        let outcome = {
            let _guard = TestBodyGuard::enter();
            panic::catch_unwind(AssertUnwindSafe(body))
        };
        let duration_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let (status, message) = classify(outcome);
        self.suite.record(status);
        tracing::debug!(
            "Test '{}' finished with status {} in {} ns",
            description,
            status,
            duration_ns
        );

        self.reporter
            .result(TestCase::new(description, status, message, duration_ns))?;
        Ok(self)
    }

    /// Reports the current counts. Counts are not reset, so calling this again
    /// reports the same totals.
    pub fn summarize(&mut self) -> Result<&mut Self> {
        tracing::info!(
            "Suite '{}': passed={}, failure={}, error={}",
            self.suite.description,
            self.suite.success,
            self.suite.failure,
            self.suite.error
        );
        self.reporter.summary(&self.suite)?;
        Ok(self)
    }

    pub fn suite(&self) -> &Suite {
        &self.suite
    }

    pub fn success(&self) -> usize {
        self.suite.success
    }

    pub fn failure(&self) -> usize {
        self.suite.failure
    }

    pub fn error(&self) -> usize {
        self.suite.error
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }
}

fn classify(outcome: std::thread::Result<TestResult>) -> (Status, String) {
    match outcome {
        Ok(Ok(())) => (Status::Pass, String::new()),
        Ok(Err(TestError::AssertionFailed(failure))) => failed(&failure),
        Ok(Err(TestError::Error { source, .. })) => (Status::Error, source.to_string()),
        Err(payload) => classify_panic(payload),
    }
}

fn failed(failure: &ExpectationFailure) -> (Status, String) {
    (
        Status::Failure,
        format!("{}: {}", type_name_of::<ExpectationFailure>(), failure),
    )
}

fn classify_panic(payload: Box<dyn Any + Send>) -> (Status, String) {
    if let Some(failure) = payload.downcast_ref::<ExpectationFailure>() {
        failed(failure)
    } else if let Some((_, message)) = panic_text(payload.as_ref()) {
        (Status::Error, message.to_string())
    } else {
        (Status::Error, UNKNOWN_ERROR.to_string())
    }
}

/// Runs `suite` against the reporter selected by `options`. Structured
/// reports are written once the suite closure returns.
pub fn run_with_options<F>(options: &RunnerOptions, suite: F) -> Result<Suite>
where
    F: FnOnce(&mut dyn ResultReporter) -> Result<Suite>,
{
    let Some(formatter) = options.output_format.document_formatter() else {
        let mut writer = StreamWriter::stdout().with_color(options.color);
        return suite(&mut writer);
    };

    let mut writer = StructuredWriter::with_echo(StreamWriter::stdout().with_color(options.color));
    writer.set_console_echo(options.console);
    let result = suite(&mut writer)?;

    match &options.output {
        Some(path) => writer.write_to_path_as(formatter, path)?,
        None => writer.write_as(formatter, io::stdout())?,
    }
    Ok(result)
}
