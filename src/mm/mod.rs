//! Memória: fronteira kernel/usuário.

pub mod uaccess;

pub use uaccess::{UserAccess, UserPtr, UserWindow};
