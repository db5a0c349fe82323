//! Utilitários internos.

#[cfg(any(test, feature = "self_test"))]
pub mod test_framework;
