//! Domain layer for the static `AuthN` resolver plugin.

mod client;
pub mod service;

pub use service::{Service, TokenKind};
