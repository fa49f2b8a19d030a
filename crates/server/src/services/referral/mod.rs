pub mod referral_service;
pub mod tree;

#[cfg(test)]
mod tests;
