pub mod client;
pub mod error;
pub mod response;

pub use client::ApiClient;
pub use error::ClientError;
pub use response::{ApiResponse, PaginatedResponse};
