use crate::runner::outcome::{Status, Suite, TestCase};
use owo_colors::OwoColorize;
use std::io::{self, Stdout, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Xml,
    Json,
}

impl OutputFormat {
    pub fn is_structured(&self) -> bool {
        !matches!(self, OutputFormat::Text)
    }
}

/// Sink for suite events. A runner calls `describe` once, `result` once per
/// executed test in execution order, and `summary` when it is summarized.
///
/// Reporters never fail on their own; an `Err` means the underlying sink
/// could not be written.
pub trait ResultReporter {
    fn describe(&mut self, suite: &str, source: &str) -> io::Result<()>;
    fn result(&mut self, case: TestCase) -> io::Result<()>;
    fn summary(&mut self, suite: &Suite) -> io::Result<()>;

    fn set_console_echo(&mut self, _enabled: bool) {}
}

impl<R: ResultReporter + ?Sized> ResultReporter for &mut R {
    fn describe(&mut self, suite: &str, source: &str) -> io::Result<()> {
        (**self).describe(suite, source)
    }

    fn result(&mut self, case: TestCase) -> io::Result<()> {
        (**self).result(case)
    }

    fn summary(&mut self, suite: &Suite) -> io::Result<()> {
        (**self).summary(suite)
    }

    fn set_console_echo(&mut self, enabled: bool) {
        (**self).set_console_echo(enabled)
    }
}

/// Writes one line per event to its sink, without buffering anything.
pub struct StreamWriter<W> {
    sink: W,
    color: bool,
}

impl StreamWriter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StreamWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, color: false }
    }

    /// Colors the status token of result lines.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn status_token(&self, status: Status) -> String {
        if !self.color {
            return status.to_string();
        }
        match status {
            Status::Pass => status.green().to_string(),
            Status::Failure => status.red().to_string(),
            Status::Error => status.yellow().to_string(),
        }
    }
}

impl<W: Write> ResultReporter for StreamWriter<W> {
    fn describe(&mut self, suite: &str, source: &str) -> io::Result<()> {
        writeln!(self.sink, "[[ {}: {} ]]", source, suite)
    }

    fn result(&mut self, case: TestCase) -> io::Result<()> {
        let separator = if case.message.is_empty() { "" } else { " " };
        writeln!(
            self.sink,
            "[{}] [{}] {}{}[{} ns]",
            self.status_token(case.status),
            case.description,
            case.message,
            separator,
            case.duration_ns
        )
    }

    fn summary(&mut self, suite: &Suite) -> io::Result<()> {
        writeln!(
            self.sink,
            "[{}] passed={}, failure={}, error={}",
            suite.description, suite.success, suite.failure, suite.error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(writer: StreamWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_describe_line() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.describe("FizzBuzz Test", "src/demo.rs").unwrap();
        assert_eq!(output(writer), "[[ src/demo.rs: FizzBuzz Test ]]\n");
    }

    #[test]
    fn test_result_line_without_message() {
        let mut writer = StreamWriter::new(Vec::new());
        writer
            .result(TestCase::new("happy path", Status::Pass, "", 1500))
            .unwrap();
        assert_eq!(output(writer), "[pass] [happy path] [1500 ns]\n");
    }

    #[test]
    fn test_result_line_with_message() {
        let mut writer = StreamWriter::new(Vec::new());
        writer
            .result(TestCase::new("boom", Status::Error, "unknown error", 42))
            .unwrap();
        assert_eq!(output(writer), "[error] [boom] unknown error [42 ns]\n");
    }

    #[test]
    fn test_summary_line() {
        let mut writer = StreamWriter::new(Vec::new());
        let suite = Suite {
            description: "FizzBuzz Test".to_string(),
            source: "demo.rs".to_string(),
            success: 4,
            failure: 2,
            error: 1,
        };
        writer.summary(&suite).unwrap();
        assert_eq!(
            output(writer),
            "[FizzBuzz Test] passed=4, failure=2, error=1\n"
        );
    }

    #[test]
    fn test_colored_status_strips_to_plain_line() {
        let mut writer = StreamWriter::new(Vec::new()).with_color(true);
        writer
            .result(TestCase::new("t", Status::Failure, "bad", 7))
            .unwrap();
        let text = output(writer);
        assert!(text.contains('\u{1b}'));
        assert_eq!(strip_ansi_escapes::strip_str(&text), "[failure] [t] bad [7 ns]\n");
    }

    fn describe_with<R: ResultReporter>(mut reporter: R) {
        reporter.describe("suite", "file").unwrap();
    }

    #[test]
    fn test_reporter_through_mutable_reference() {
        let mut writer = StreamWriter::new(Vec::new());
        describe_with(&mut writer);
        let dynamic: &mut dyn ResultReporter = &mut writer;
        describe_with(dynamic);
        assert_eq!(output(writer), "[[ file: suite ]]\n[[ file: suite ]]\n");
    }

    #[test]
    fn test_output_format_is_structured() {
        assert!(!OutputFormat::Text.is_structured());
        assert!(OutputFormat::Xml.is_structured());
        assert!(OutputFormat::Json.is_structured());
    }
}
