pub mod error;
pub mod logger;
pub mod masking;
pub mod validation;
