//! Status checks with failure messages naming both sides.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, got {actual}")]
pub struct StatusMismatch {
    pub expected: u16,
    pub actual: u16,
}

/// `Ok` when `actual == expected`, otherwise a mismatch reporting both codes
pub fn ensure_status(expected: StatusCode, actual: StatusCode) -> Result<(), StatusMismatch> {
    if expected == actual {
        Ok(())
    } else {
        Err(StatusMismatch {
            expected: expected.as_u16(),
            actual: actual.as_u16(),
        })
    }
}
