//! Shared building blocks used across features: response envelope,
//! constants, payload validation and test doubles.

pub mod constants;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod validation;
