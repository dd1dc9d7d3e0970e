#[macro_export]
macro_rules! internal_error {
    ($arg: expr) => {{
        let internal_error_msg = format!(
            "{}\ninternal error: {}:{}:{}",
            $arg,
            file!(),
            line!(),
            column!()
        );
        tracing::error!(?internal_error_msg);
        internal_error_msg
    }};
}

/// For failures that are expected now and then but worth seeing in the logs.
/// Evaluates to the success value, `None` if it was an error.
#[macro_export]
macro_rules! log_err_as_warn {
    ($arg: expr) => {
        match $arg {
            Ok(value) => Some(value),
            Err(mishap) => {
                tracing::warn!(?mishap);
                None
            }
        }
    };
    ($arg: expr, $msg: literal) => {
        match $arg {
            Ok(value) => Some(value),
            Err(mishap) => {
                tracing::warn!(?mishap, $msg);
                None
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn ok_value_passes_through() {
        let actual = log_err_as_warn!(Ok::<u8, String>(7));
        assert_eq!(actual, Some(7));
    }

    #[test]
    fn error_becomes_none() {
        // Arrange
        let result: Result<u8, String> = Err("connection reset".to_string());

        // Act
        let actual = log_err_as_warn!(result, "failed to read body");

        // Assert
        assert_eq!(actual, None);
    }
}
