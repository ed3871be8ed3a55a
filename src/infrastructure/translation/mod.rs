//! Translation service adapters

pub mod http;

pub use http::HttpTranslationService;
