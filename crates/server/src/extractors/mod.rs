pub mod auth_extractor;
pub mod validation_extractor;
