// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Error type returned by every decode and encode operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AprsError {
    /// Input does not match the required grammar.
    #[error("format error: {0}")]
    Format(String),

    /// A numeric value lies outside its legal domain.
    #[error("value out of range: {0}")]
    Range(String),

    /// Well-understood but intentionally unimplemented operation.
    #[error("not supported: {0}")]
    NotSupported(String),
}

pub type AprsResult<T> = Result<T, AprsError>;

impl AprsError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        AprsError::Format(msg.into())
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        AprsError::Range(msg.into())
    }

    pub(crate) fn not_supported(msg: impl Into<String>) -> Self {
        AprsError::NotSupported(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_detail() {
        assert_eq!(
            AprsError::format("bad separator").to_string(),
            "format error: bad separator"
        );
        assert_eq!(
            AprsError::range("latitude 91").to_string(),
            "value out of range: latitude 91"
        );
        assert_eq!(
            AprsError::not_supported("binary envelope").to_string(),
            "not supported: binary envelope"
        );
    }
}
