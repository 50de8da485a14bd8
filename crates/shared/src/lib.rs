pub mod domain;
pub mod error;
pub mod migrate;
pub mod protocol;
