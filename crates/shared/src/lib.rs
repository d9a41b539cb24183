pub mod domain;
pub mod error;
pub mod fallback;
pub mod protocol;
