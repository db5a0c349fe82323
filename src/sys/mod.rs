//! Definições de sistema compartilhadas (códigos de erro).

pub mod error;

pub use error::Errno;
