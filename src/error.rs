//! Error-handling module for the crate.
//!
//! Malformed selector input is deliberately not an error: key selectors
//! coerce permissively (a missing record field plucks to `Null`, a scalar
//! "collection" enumerates as empty). The variants below are the only ways
//! a join can fail, and all of them fail synchronously before any output is
//! produced.

use thiserror::Error;

/// Error-collection for all the possible errors occurring in this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Group join was given a constant result selector; it pairs each outer
    /// element with a whole group and therefore needs a function to fold
    /// that group into an output value.
    #[error("group join requires a function result selector")]
    InvalidResultSelector,
    /// An operation that only works on true sequences was given a record,
    /// string, or scalar operand.
    #[error("{0} operates on sequence collections only")]
    SequenceRequired(&'static str),
    /// A validated unique join found its input out of contract.
    #[error("unique join input violates its ordering contract: {0}")]
    ContractViolation(String),
}

/// Result type of the fallible join operations.
pub type Result<T> = std::result::Result<T, Error>;
