pub mod api {
    pub mod params;
    pub mod provider;
    pub mod response;

    pub use params::RequestParams;
    pub use provider::{Api, ApiProvider, HttpApiProvider};
    pub use response::ApiResponse;
}

pub mod env_config;
pub mod error;
pub mod misc;
pub mod webhooks;

pub use error::{AppError, Res};
