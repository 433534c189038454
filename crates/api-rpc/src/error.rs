//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use reelforge_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SYSTEM_ERROR: i32 = 5002;
    pub const UPSTREAM_ERROR: i32 = 5003;
}

/// Convert AppError to JSON-RPC ErrorObject
///
/// Only validation and not-found are expected on the query surface; the
/// pipeline's stage errors reach clients through `status_message` instead.
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Validation(_) | AppError::Domain(_) | AppError::Serialization(_) => {
            code::VALIDATION_ERROR
        }
        AppError::NotFound(_) => code::NOT_FOUND,
        AppError::Conflict(_) => code::CONFLICT,
        AppError::Provider { .. } | AppError::Transport(_) => code::UPSTREAM_ERROR,
        AppError::RenderFailed(_)
        | AppError::RenderTimeout { .. }
        | AppError::Assembly(_)
        | AppError::Io(_) => code::SYSTEM_ERROR,
        AppError::Config(_) | AppError::Internal(_) => code::INTERNAL_ERROR,
    };

    // NotFound carries a client-facing message verbatim
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = to_rpc_error(AppError::NotFound("Job x not found".to_string()));
        assert_eq!(err.code(), code::NOT_FOUND);
        assert_eq!(err.message(), "Job x not found");

        assert_eq!(
            to_rpc_error(AppError::Validation("Topic cannot be empty".to_string())).code(),
            code::VALIDATION_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::provider("OpenAI", "HTTP 429")).code(),
            code::UPSTREAM_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::RenderTimeout { attempts: 60 }).code(),
            code::SYSTEM_ERROR
        );
    }
}
