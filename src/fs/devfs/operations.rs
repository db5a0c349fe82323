//! Device Operations - Tabela de operações de arquivo (`file_operations`)

use core::fmt;

use super::device::DeviceNumber;
use crate::mm::UserPtr;
use crate::sys::Errno;

bitflags::bitflags! {
    /// Flags para abertura de dispositivos
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Apenas escrita
        const WRONLY = 0o1;
        /// Leitura e escrita
        const RDWR = 0o2;
        /// Criar se não existir
        const CREAT = 0o100;
        /// Truncar ao abrir
        const TRUNC = 0o1000;
        /// Append
        const APPEND = 0o2000;
        /// Non-blocking
        const NONBLOCK = 0o4000;
    }
}

impl OpenFlags {
    /// Apenas leitura (modo de acesso 0)
    pub const RDONLY: Self = Self::empty();

    const ACCMODE: u32 = 0o3;

    /// Verifica se o modo de acesso permite leitura
    pub const fn can_read(&self) -> bool {
        let mode = self.bits() & Self::ACCMODE;
        mode == 0o0 || mode == 0o2
    }

    /// Verifica se o modo de acesso permite escrita
    pub const fn can_write(&self) -> bool {
        let mode = self.bits() & Self::ACCMODE;
        mode == 0o1 || mode == 0o2
    }
}

/// Erros das operações de arquivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    /// Cópia para/de usuário falhou (endereço inválido)
    CopyFault,
    /// Operação não implementada pelo driver
    NotSupported,
    /// Caminho não corresponde a nenhum nó
    NotFound,
    /// Nó existe mas nenhum driver responde pelo major
    NoDevice,
    /// Modo de abertura não permite a operação
    BadMode,
}

impl FsError {
    /// Código errno correspondente
    pub fn errno(&self) -> Errno {
        match self {
            Self::CopyFault => Errno::EFAULT,
            Self::NotSupported => Errno::EINVAL,
            Self::NotFound => Errno::ENOENT,
            Self::NoDevice => Errno::ENXIO,
            Self::BadMode => Errno::EBADF,
        }
    }

    /// Retorno no estilo syscall (`-errno`)
    pub fn as_isize(&self) -> isize {
        self.errno().as_isize()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CopyFault => "Falha ao copiar para o usuário (bad address)",
            Self::NotSupported => "Operação não suportada pelo dispositivo",
            Self::NotFound => "Dispositivo não encontrado",
            Self::NoDevice => "Nenhum driver para o dispositivo",
            Self::BadMode => "Modo de abertura incompatível",
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado das operações de arquivo
pub type FsResult<T> = Result<T, FsError>;

/// Estado de um arquivo aberto (`struct file`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct File {
    /// Dispositivo aberto
    pub dev: DeviceNumber,
    /// Flags usadas no open
    pub flags: OpenFlags,
    /// Posição atual (`f_pos`)
    pub pos: u64,
}

impl File {
    pub const fn new(dev: DeviceNumber, flags: OpenFlags) -> Self {
        Self { dev, flags, pos: 0 }
    }
}

/// Operações de um dispositivo de caractere.
///
/// Um driver registra uma implementação junto com seu major; o devfs
/// despacha open/read/write/release para ela.
pub trait FileOperations: Send + Sync {
    /// Chamado a cada open do nó
    fn open(&self, _file: &mut File) -> FsResult<()> {
        Ok(())
    }

    /// Lê até `len` bytes para o buffer de usuário `buf`
    fn read(&self, _file: &mut File, _buf: UserPtr, _len: usize) -> FsResult<usize> {
        Err(FsError::NotSupported)
    }

    /// Escreve `len` bytes do buffer de usuário `buf`
    fn write(&self, _file: &mut File, _buf: UserPtr, _len: usize) -> FsResult<usize> {
        Err(FsError::NotSupported)
    }

    /// Chamado quando o último descritor do arquivo é fechado
    fn release(&self, _file: &mut File) -> FsResult<()> {
        Ok(())
    }
}
