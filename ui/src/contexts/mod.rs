mod api;

pub use api::{ApiProvider, use_api};
