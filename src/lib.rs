pub mod assertions;
pub mod errors;
pub mod runner;
pub mod typename;

pub use assertions::{expect, Expect, Expectation, ExpectationFailure};
pub use errors::{Error, Result, TestError, TestResult};
pub use runner::{
    in_test_body, run_with_options, OutputFormat, ResultReporter, RunnerOptions, Status,
    StreamWriter, StructuredWriter, Suite, TestCase, TestRunner,
};
pub use typename::{type_name_of, TypeToken};
