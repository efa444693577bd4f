use std::error::Error;

/// Base trait for all application errors
pub trait AppError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type AppResult<T> = Result<T, Box<dyn AppError>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_result() {
        let _result: AppResult<i32> = Ok(42);
    }
}
