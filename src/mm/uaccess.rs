//! # User Access
//!
//! Cópia de dados através da fronteira kernel/usuário.
//!
//! Convenção igual à do Linux: `copy_to_user`/`copy_from_user` retornam o
//! número de bytes que **não** puderam ser copiados. Zero significa sucesso.
//!
//! `UserWindow` modela uma região mapeada do espaço do usuário
//! `[base, base + N)`. Ponteiro nulo ou fora da região falha por completo;
//! um destino que cruza o fim da região copia apenas o prefixo válido.

use core::fmt;
use spin::Mutex;

/// Endereço no espaço do usuário. Nunca é desreferenciado diretamente.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct UserPtr(usize);

impl UserPtr {
    /// Ponteiro nulo
    pub const NULL: Self = Self(0);

    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    pub const fn addr(self) -> usize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Avança `bytes`; `None` em overflow.
    pub const fn offset(self, bytes: usize) -> Option<Self> {
        match self.0.checked_add(bytes) {
            Some(addr) => Some(Self(addr)),
            None => None,
        }
    }
}

impl fmt::Debug for UserPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserPtr({:#x})", self.0)
    }
}

/// Primitivas de cópia kernel <-> usuário.
pub trait UserAccess: Send + Sync {
    /// Copia `src` para o endereço de usuário `dst`.
    ///
    /// Retorna quantos bytes NÃO foram copiados.
    fn copy_to_user(&self, dst: UserPtr, src: &[u8]) -> usize;

    /// Copia de `src` (usuário) para `dst` (kernel).
    ///
    /// Retorna quantos bytes NÃO foram copiados.
    fn copy_from_user(&self, dst: &mut [u8], src: UserPtr) -> usize;
}

impl<T: UserAccess + ?Sized> UserAccess for &T {
    fn copy_to_user(&self, dst: UserPtr, src: &[u8]) -> usize {
        (**self).copy_to_user(dst, src)
    }

    fn copy_from_user(&self, dst: &mut [u8], src: UserPtr) -> usize {
        (**self).copy_from_user(dst, src)
    }
}

/// Região de memória de usuário com `N` bytes mapeados a partir de `base`.
pub struct UserWindow<const N: usize> {
    base: usize,
    mem: Mutex<[u8; N]>,
}

impl<const N: usize> UserWindow<N> {
    /// Cria uma janela zerada começando em `base`.
    ///
    /// `base` zero é permitido, mas o endereço nulo continua inválido.
    pub const fn new(base: usize) -> Self {
        Self {
            base,
            mem: Mutex::new([0; N]),
        }
    }

    /// Primeiro endereço mapeado.
    pub const fn base(&self) -> UserPtr {
        UserPtr(self.base)
    }

    /// Tamanho da região.
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Endereço `offset` bytes após a base.
    pub const fn at(&self, offset: usize) -> UserPtr {
        UserPtr(self.base.wrapping_add(offset))
    }

    /// Traduz `ptr` para (offset na janela, bytes acessíveis até `len`).
    fn translate(&self, ptr: UserPtr, len: usize) -> Option<(usize, usize)> {
        if ptr.is_null() {
            return None;
        }
        let offset = ptr.0.checked_sub(self.base)?;
        if offset >= N {
            return None;
        }
        Some((offset, len.min(N - offset)))
    }
}

impl<const N: usize> UserAccess for UserWindow<N> {
    fn copy_to_user(&self, dst: UserPtr, src: &[u8]) -> usize {
        let Some((offset, avail)) = self.translate(dst, src.len()) else {
            return src.len();
        };
        let mut mem = self.mem.lock();
        mem[offset..offset + avail].copy_from_slice(&src[..avail]);
        src.len() - avail
    }

    fn copy_from_user(&self, dst: &mut [u8], src: UserPtr) -> usize {
        let Some((offset, avail)) = self.translate(src, dst.len()) else {
            return dst.len();
        };
        let mem = self.mem.lock();
        dst[..avail].copy_from_slice(&mem[offset..offset + avail]);
        dst.len() - avail
    }
}

// =============================================================================
// TESTS
// =============================================================================
