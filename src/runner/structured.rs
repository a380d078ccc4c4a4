use crate::errors::{Error, Result};
use crate::runner::outcome::{Suite, TestCase};
use crate::runner::reporter::{OutputFormat, ResultReporter, StreamWriter};
use crate::runner::xml::XmlFormatter;
use serde::Serialize;
use std::io::{self, Stdout, Write};
use std::path::Path;

/// Everything a structured writer has collected for one suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub suite: String,
    pub source: String,
    pub test_cases: Vec<TestCase>,
    pub passed: usize,
    pub failures: usize,
    pub errors: usize,
}

pub trait DocumentFormatter {
    fn format(&self, document: &ReportDocument) -> Result<String>;
}

pub struct JsonFormatter;

impl DocumentFormatter for JsonFormatter {
    fn format(&self, document: &ReportDocument) -> Result<String> {
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');
        Ok(text)
    }
}

impl OutputFormat {
    /// Formatter for structured formats; `None` for plain text.
    pub fn document_formatter(&self) -> Option<&'static dyn DocumentFormatter> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Xml => Some(&XmlFormatter),
            OutputFormat::Json => Some(&JsonFormatter),
        }
    }
}

/// Buffers every result and serializes the whole report on request. While
/// console echo is on (the default) each event is also passed to a
/// [`StreamWriter`].
pub struct StructuredWriter<W: Write = Stdout> {
    document: ReportDocument,
    echo: StreamWriter<W>,
    console: bool,
}

impl StructuredWriter<Stdout> {
    pub fn new() -> Self {
        Self::with_echo(StreamWriter::stdout())
    }
}

impl Default for StructuredWriter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StructuredWriter<W> {
    pub fn with_echo(echo: StreamWriter<W>) -> Self {
        Self {
            document: ReportDocument::default(),
            echo,
            console: true,
        }
    }

    pub fn console(&self) -> bool {
        self.console
    }

    pub fn document(&self) -> &ReportDocument {
        &self.document
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.document.test_cases
    }

    pub fn echo(&self) -> &StreamWriter<W> {
        &self.echo
    }

    pub fn to_xml(&self) -> Result<String> {
        XmlFormatter.format(&self.document)
    }

    /// Writes the XML report. The buffer is left untouched, so writing again
    /// produces the same bytes.
    pub fn write<S: Write>(&self, sink: S) -> Result<()> {
        self.write_as(&XmlFormatter, sink)
    }

    pub fn write_as<S: Write>(&self, formatter: &dyn DocumentFormatter, mut sink: S) -> Result<()> {
        let text = formatter.format(&self.document)?;
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_to_path_as(&XmlFormatter, path)
    }

    /// Truncates `path` and writes the formatted report to it.
    pub fn write_to_path_as(
        &self,
        formatter: &dyn DocumentFormatter,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let text = formatter.format(&self.document)?;
        std::fs::write(path, text).map_err(|source| Error::WriteReport {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Wrote report to {}", path.display());
        Ok(())
    }
}

impl<W: Write> ResultReporter for StructuredWriter<W> {
    fn describe(&mut self, suite: &str, source: &str) -> io::Result<()> {
        self.document.suite = suite.to_string();
        self.document.source = source.to_string();
        if self.console {
            self.echo.describe(suite, source)?;
        }
        Ok(())
    }

    fn result(&mut self, case: TestCase) -> io::Result<()> {
        if self.console {
            self.echo.result(case.clone())?;
        }
        self.document.test_cases.push(case);
        Ok(())
    }

    fn summary(&mut self, suite: &Suite) -> io::Result<()> {
        self.document.passed = suite.success;
        self.document.failures = suite.failure;
        self.document.errors = suite.error;
        if self.console {
            self.echo.summary(suite)?;
        }
        Ok(())
    }

    fn set_console_echo(&mut self, enabled: bool) {
        self.console = enabled;
    }
}
