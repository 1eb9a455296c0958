use thiserror::Error;

/// HTTP-style classification of a domain error, so calling layers can pick
/// retry-vs-abort behaviour without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    Validation,
    Conflict,
    Unauthorized,
    Internal,
}

impl ErrorClass {
    pub fn status_code(self) -> u16 {
        match self {
            ErrorClass::NotFound => 404,
            ErrorClass::Validation => 400,
            ErrorClass::Conflict => 409,
            ErrorClass::Unauthorized => 403,
            ErrorClass::Internal => 500,
        }
    }

    /// Whether the whole operation can safely be retried from scratch.
    /// A lost stock race is retryable; an actor mismatch never is.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorClass::Conflict | ErrorClass::Internal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("product not found: {id}")]
    ProductNotFound { id: String },

    #[error("order not found: {id}")]
    OrderNotFound { id: String },

    #[error("user not found: {id}")]
    UserNotFound { id: String },

    #[error("{reason}")]
    Validation { reason: String },

    #[error("insufficient stock for {name}. Available: {available}")]
    OutOfStock { name: String, available: u32 },

    #[error("stock check failed for {name} during processing. Please try again.")]
    StockConflict { name: String },

    #[error("order already assigned")]
    AlreadyAssigned,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid OTP")]
    InvalidOtp,

    #[error("invalid action: {action}")]
    InvalidAction { action: String },

    #[error("cancellation period expired. Please contact support.")]
    CancellationWindowExpired,

    #[error("order is already cancelled")]
    AlreadyCancelled,

    #[error("order creation failed: {reason}")]
    OrderCreateFailed { reason: String },

    #[error("persistence failure during {operation}")]
    PersistenceFailure { operation: &'static str },
}

impl MarketError {
    pub fn validation(reason: impl Into<String>) -> Self {
        MarketError::Validation {
            reason: reason.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            MarketError::ProductNotFound { .. }
            | MarketError::OrderNotFound { .. }
            | MarketError::UserNotFound { .. } => ErrorClass::NotFound,
            MarketError::Validation { .. }
            | MarketError::OutOfStock { .. }
            | MarketError::InvalidOtp
            | MarketError::InvalidAction { .. }
            | MarketError::CancellationWindowExpired
            | MarketError::AlreadyCancelled => ErrorClass::Validation,
            MarketError::StockConflict { .. } | MarketError::AlreadyAssigned => ErrorClass::Conflict,
            MarketError::Unauthorized => ErrorClass::Unauthorized,
            MarketError::OrderCreateFailed { .. } | MarketError::PersistenceFailure { .. } => {
                ErrorClass::Internal
            }
        }
    }
}
