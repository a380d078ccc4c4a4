pub mod executor;
pub mod outcome;
pub mod reporter;
pub mod structured;
pub mod xml;

pub use executor::{in_test_body, run_with_options, RunnerOptions, TestRunner};
pub use outcome::{Status, Suite, TestCase};
pub use reporter::{OutputFormat, ResultReporter, StreamWriter};
pub use structured::{DocumentFormatter, JsonFormatter, ReportDocument, StructuredWriter};
pub use xml::XmlFormatter;
