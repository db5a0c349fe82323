//! # Driver Layer
//!
//! | Driver   | Arquivo     | Papel |
//! |----------|-------------|-------|
//! | Serial   | `serial.rs` | Saída dos logs do kernel |
//! | RNG      | `rng.rs`    | Fonte de bytes aleatórios |

pub mod rng;
pub mod serial;
