//! Exit codes following sysexits.h conventions.
//!
//! Scripts can tell a missing input directory apart from a run whose
//! verification reports failed.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Command line usage error (invalid arguments or parameters).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// Verification failed: a hash was unchanged or metadata survived.
/// Maps to EX_DATAERR from sysexits.h.
pub const VERIFICATION_FAILED: i32 = 65;

/// Cannot open input directory.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// I/O error (cannot write or delete output files).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Represents an exit code with optional error context.
#[derive(Debug)]
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Classify error by inspecting the chain
        let code = if message.contains("Input directory not found")
            || message.contains("Directory not found")
        {
            INPUT_ERROR
        } else if message.contains("Invalid parameter") || message.contains("Invalid crop") {
            USAGE_ERROR
        } else if message.contains("Verification failed") {
            VERIFICATION_FAILED
        } else if message.contains("Failed to write")
            || message.contains("Failed to create")
            || message.contains("IO error")
        {
            IO_ERROR
        } else {
            GENERAL_ERROR
        };

        Self {
            code,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_classification() {
        let cases = [
            (anyhow!("Input directory not found: ./photos"), INPUT_ERROR),
            (anyhow!("Invalid parameter: pixel_frequency must be at least 1"), USAGE_ERROR),
            (anyhow!("Verification failed: 1 unchanged hash"), VERIFICATION_FAILED),
            (anyhow!("Failed to write JSON report"), IO_ERROR),
            (anyhow!("something else"), GENERAL_ERROR),
        ];
        for (err, code) in cases {
            assert_eq!(ExitCode::from_anyhow(&err).code, code, "{err}");
        }
    }

    #[test]
    fn test_context_chain_is_searched() {
        let err = anyhow!("Input directory not found: x").context("Batch run failed");
        let exit = ExitCode::from_anyhow(&err);
        assert_eq!(exit.code, INPUT_ERROR);
        assert!(exit.message.unwrap().starts_with("Batch run failed"));
    }

    #[test]
    fn test_success() {
        let exit = ExitCode::success();
        assert_eq!(exit.code, SUCCESS);
        assert!(exit.message.is_none());
    }
}
