//! Core Module
//!
//! Infraestrutura comum a todo o driver, independente de dispositivo.

pub mod logging;
