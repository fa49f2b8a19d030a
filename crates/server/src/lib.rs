pub mod api;
pub mod app;
pub mod auth;
pub mod docs;
pub mod dtos;
pub mod extractors;
pub mod router;
pub mod services;

#[cfg(test)]
pub mod test_support;
