pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use error::{ClientError, FeedError};
pub use models::{Invoice, LineItem, Settings};
pub use services::feed::{FeedState, InvoiceFeed};
pub use services::genai::{ApiCredentials, GenAiClient};
pub use services::normalizer::{normalize_invoices, Normalizer};
pub use store::{SnapshotEvent, StoreError, StoreValue, Timestamp};
