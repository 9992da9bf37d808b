//! Result type alias for chatmod operations.

use super::chatmod_error::ChatmodError;
use super::context::ErrorContext;

/// Type alias for Results using ChatmodError.
pub type ChatmodResult<T> = Result<T, ChatmodError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use chatmod::error::{ErrorContext, ResultExt};
    ///
    /// let settings = Settings::load_from(&path)
    ///     .context(ErrorContext::new("load_settings").with_component("cli"))?;
    /// ```
    fn context(self, ctx: ErrorContext) -> ChatmodResult<T>;

    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> ChatmodResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ChatmodError>,
{
    fn context(self, ctx: ErrorContext) -> ChatmodResult<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }

    fn with_context<F>(self, f: F) -> ChatmodResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, QueueError};

    #[test]
    fn test_context_extension() {
        let result: ChatmodResult<i32> = Err(QueueError::NoRuntime.into());

        let err = result
            .context(ErrorContext::new("build_queue"))
            .unwrap_err();
        assert_eq!(err.context().unwrap().operation, "build_queue");
    }

    #[test]
    fn test_context_extension_preserves_ok() {
        let result: ChatmodResult<i32> = Ok(42);
        assert_eq!(result.context(ErrorContext::new("noop")).unwrap(), 42);
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let result: Result<i32, ConfigError> = Ok(42);
        let mut called = false;

        let with_ctx = result.with_context(|| {
            called = true;
            ErrorContext::new("test")
        });

        assert!(with_ctx.is_ok());
        assert!(!called);
    }

    #[test]
    fn test_with_context_converts_domain_errors() {
        let result: Result<(), ConfigError> = Err(ConfigError::NoConfigDir);

        let err = result
            .with_context(|| ErrorContext::new("resolve_path"))
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_NO_DIR");
        assert_eq!(err.context().unwrap().operation, "resolve_path");
    }
}
