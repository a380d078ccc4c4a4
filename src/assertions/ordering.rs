use super::{Expect, Expectation};
use std::fmt::Display;

// The `not_` variants are satisfied by equality.
impl<T: Display> Expect<T> {
    pub fn less_than<U>(&self, expected: U) -> Expectation
    where
        T: PartialOrd<U>,
        U: Display,
    {
        if self.actual < expected {
            Ok(())
        } else {
            Err(self.mismatch("less than ", &expected))
        }
    }

    pub fn not_less_than<U>(&self, expected: U) -> Expectation
    where
        T: PartialOrd<U>,
        U: Display,
    {
        if self.actual >= expected {
            Ok(())
        } else {
            Err(self.mismatch("not less than ", &expected))
        }
    }

    pub fn greater_than<U>(&self, expected: U) -> Expectation
    where
        T: PartialOrd<U>,
        U: Display,
    {
        if self.actual > expected {
            Ok(())
        } else {
            Err(self.mismatch("greater than ", &expected))
        }
    }

    pub fn not_greater_than<U>(&self, expected: U) -> Expectation
    where
        T: PartialOrd<U>,
        U: Display,
    {
        if self.actual <= expected {
            Ok(())
        } else {
            Err(self.mismatch("not greater than ", &expected))
        }
    }
}
