//! # Standard Error Codes (Errno)
//!
//! Códigos de erro devolvidos pelo driver ao kernel e ao usuário.
//! Numeração POSIX/Linux; valores negativos são usados nos retornos
//! (`as_isize`), como em `return -EFAULT;`.

use core::fmt;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    EPERM = 1,   // Operation not permitted
    ENOENT = 2,  // No such file or directory
    EIO = 5,     // I/O error
    ENXIO = 6,   // No such device or address
    EBADF = 9,   // Bad file number
    EAGAIN = 11, // Try again
    ENOMEM = 12, // Out of memory
    EACCES = 13, // Permission denied
    EFAULT = 14, // Bad address
    EBUSY = 16,  // Device or resource busy
    EEXIST = 17, // File exists
    ENODEV = 19, // No such device
    EINVAL = 22, // Invalid argument
    ENOSPC = 28, // No space left on device
    ENOSYS = 38, // Function not implemented
}

impl Errno {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }

    /// Converte um retorno negativo (`-errno`) de volta para `Errno`.
    pub fn from_isize(ret: isize) -> Option<Self> {
        let code = ret.checked_neg()?;
        Some(match code {
            1 => Self::EPERM,
            2 => Self::ENOENT,
            5 => Self::EIO,
            6 => Self::ENXIO,
            9 => Self::EBADF,
            11 => Self::EAGAIN,
            12 => Self::ENOMEM,
            13 => Self::EACCES,
            14 => Self::EFAULT,
            16 => Self::EBUSY,
            17 => Self::EEXIST,
            19 => Self::ENODEV,
            22 => Self::EINVAL,
            28 => Self::ENOSPC,
            38 => Self::ENOSYS,
            _ => return None,
        })
    }

    /// Descrição legível (mesmas mensagens de `strerror`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EPERM => "Operation not permitted",
            Self::ENOENT => "No such file or directory",
            Self::EIO => "I/O error",
            Self::ENXIO => "No such device or address",
            Self::EBADF => "Bad file number",
            Self::EAGAIN => "Try again",
            Self::ENOMEM => "Out of memory",
            Self::EACCES => "Permission denied",
            Self::EFAULT => "Bad address",
            Self::EBUSY => "Device or resource busy",
            Self::EEXIST => "File exists",
            Self::ENODEV => "No such device",
            Self::EINVAL => "Invalid argument",
            Self::ENOSPC => "No space left on device",
            Self::ENOSYS => "Function not implemented",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
