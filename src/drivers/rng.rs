//! Fonte de entropia do driver.
//!
//! `EntropySource` é o equivalente de `get_random_bytes()`: preenche o
//! buffer inteiro e nunca falha. `XorShiftRng` é o gerador padrão
//! (xorshift64), suficiente para um dispositivo de demonstração; não é
//! criptográfico.

use core::sync::atomic::{AtomicU64, Ordering};

/// Gerador de bytes aleatórios.
pub trait EntropySource: Send + Sync {
    /// Preenche exatamente `buf.len()` bytes.
    fn fill(&self, buf: &mut [u8]);
}

impl<T: EntropySource + ?Sized> EntropySource for &T {
    fn fill(&self, buf: &mut [u8]) {
        (**self).fill(buf)
    }
}

/// Semente usada quando a semente fornecida é zero (xorshift trava em 0).
pub const DEFAULT_SEED: u64 = 0x853c_49e6_748f_ea9b;

/// Gerador xorshift64 com estado atômico.
///
/// Chamadas concorrentes nunca recebem o mesmo estado: o avanço é feito
/// com compare-exchange.
pub struct XorShiftRng {
    state: AtomicU64,
}

impl XorShiftRng {
    /// Cria um gerador com a semente dada (0 vira `DEFAULT_SEED`).
    pub const fn new(seed: u64) -> Self {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        Self {
            state: AtomicU64::new(seed),
        }
    }

    #[inline]
    const fn step(mut x: u64) -> u64 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        x
    }

    /// Próximo valor de 64 bits.
    pub fn next_u64(&self) -> u64 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = Self::step(current);
            match self.state.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for XorShiftRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl EntropySource for XorShiftRng {
    fn fill(&self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let bytes = self.next_u64().to_ne_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
