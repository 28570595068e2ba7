use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === TRANSPORT ERRORS ===
    #[error("API request ended in empty response")]
    EmptyApiResponse,

    #[error("API request returned invalid JSON response")]
    InvalidJsonResponse,

    // === APPLICATION ERRORS ===
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unable to create profile. Request status: {status}")]
    ProfileWasNotCreated { status: u16 },

    #[error("{message}")]
    ProfileWasNotFound { status: u16, message: String },

    #[error("Unable to spend feature \"{feature}\" because of negative balance")]
    NegativeBalanceLimitReached { feature: String },

    #[error("Your plan has no access to feature \"{feature}\"")]
    FeatureIsNotAvailable { feature: String },

    #[error("Unable to create discount. Response status: {status}")]
    DiscountWasNotCreated { status: u16 },

    #[error("Unable to apply discount. Response status: {status}")]
    DiscountWasNotApplied { status: u16 },

    #[error("Default payments provider is not configured")]
    DefaultPaymentsProviderNotConfigured,

    #[error("Unable to initialize payment session: {message}")]
    UnableToInitializePaymentSession { status: u16, message: String },

    #[error("Unable to create webhook. Service answered with status {status}")]
    UnableToCreateWebhook { status: u16 },

    #[error("Balance history request failed. Remote service answered with status {status}")]
    BalanceHistoryRequestFailed { status: u16 },

    #[error("Plans request failed. Remote service answered with status {status}")]
    PlansRequestFailed { status: u16 },

    #[error("{message} (HTTP Code: {status})")]
    Runtime { status: u16, message: String },
}

impl AppError {
    /// HTTP status of the remote answer that caused this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::Reqwest(error) => error.status().map(|status| status.as_u16()),
            AppError::ProfileWasNotCreated { status }
            | AppError::ProfileWasNotFound { status, .. }
            | AppError::DiscountWasNotCreated { status }
            | AppError::DiscountWasNotApplied { status }
            | AppError::UnableToInitializePaymentSession { status, .. }
            | AppError::UnableToCreateWebhook { status }
            | AppError::BalanceHistoryRequestFailed { status }
            | AppError::PlansRequestFailed { status }
            | AppError::Runtime { status, .. } => Some(*status),
            AppError::NegativeBalanceLimitReached { .. } => Some(402),
            AppError::FeatureIsNotAvailable { .. } => Some(403),
            _ => None,
        }
    }

    pub fn required_field(field: &str) -> Self {
        AppError::InvalidArgument(format!(
            "Field \"{}\" is required but not presented in data.",
            field
        ))
    }
}
