//! Shared validation helpers for inbound HTTP adapters.
//!
//! Handlers collect every field problem before answering so clients can
//! highlight all invalid inputs at once.

use crate::domain::{Error, FieldError};

/// Top-level message of every validation failure.
pub const VALIDATION_FAILED_MESSAGE: &str = "input validation failed";

/// Accumulates field problems for one request.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, field: &str, code: &str, message: impl ToString) {
        self.0.push(FieldError::new(field, code, message.to_string()));
    }

    /// Keep the value or record its problem under `field`.
    pub(crate) fn check<T, E: ToString>(
        &mut self,
        field: &str,
        code: impl FnOnce(&E) -> &'static str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                let code = code(&err);
                self.push(field, code, err);
                None
            }
        }
    }

    /// `Ok(())` when nothing was recorded.
    pub(crate) fn finish(self) -> Result<(), Error> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(validation_error(self.0))
        }
    }
}

/// `InvalidRequest` carrying `errors`.
pub(crate) fn validation_error(errors: Vec<FieldError>) -> Error {
    Error::invalid_request(VALIDATION_FAILED_MESSAGE).with_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn empty_collection_passes() {
        assert!(FieldErrors::new().finish().is_ok());
    }

    #[rstest]
    fn recorded_problems_become_invalid_request() {
        let mut errors = FieldErrors::new();
        let kept = errors.check("page", |_: &String| "invalid_range", Ok::<_, String>(3));
        let dropped = errors.check(
            "limit",
            |_: &String| "invalid_range",
            Err::<u32, _>("limit must be between 1 and 100".to_owned()),
        );

        assert_eq!(kept, Some(3));
        assert_eq!(dropped, None);
        let err = errors.finish().expect_err("one problem recorded");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), VALIDATION_FAILED_MESSAGE);
        assert_eq!(
            err.errors(),
            [FieldError::new(
                "limit",
                "invalid_range",
                "limit must be between 1 and 100"
            )]
        );
    }
}
