//! /dev/randnumchar - Cada leitura entrega um número aleatório
//!
//! - `open()` incrementa o contador de aberturas (apenas diagnóstico)
//! - `read()` gera `RANDNUM_SIZE` bytes e os copia para o usuário
//! - `write()` aceita e descarta tudo
//! - `release()` não faz nada além de logar
//!
//! # Retorno de read()
//!
//! Por padrão uma leitura bem-sucedida retorna 0, mesmo tendo copiado os
//! 4 bytes: o chamador deve ler o buffer, não o retorno. Com a feature
//! `read_returns_len` o retorno passa a ser `RANDNUM_SIZE`.
//!
//! # Concorrência
//!
//! O buffer de transferência é local a cada chamada, então leituras
//! concorrentes nunca veem valores misturados. O contador de aberturas é
//! atômico.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::drivers::rng::EntropySource;
use crate::fs::devfs::operations::{File, FileOperations, FsError, FsResult};
use crate::mm::{UserAccess, UserPtr};

/// O nó aparece como /dev/randnumchar
pub const DEVICE_NAME: &str = "randnumchar";

/// Capacidade do buffer de transferência
pub const RANDNUM_MAXSIZE: usize = 256;

/// Bytes gerados por leitura (`sizeof(unsigned int)`)
pub const RANDNUM_SIZE: usize = core::mem::size_of::<u32>();

const _: () = assert!(RANDNUM_SIZE <= RANDNUM_MAXSIZE);

/// Valor retornado por uma leitura bem-sucedida
#[cfg(not(feature = "read_returns_len"))]
pub const READ_RETURN: usize = 0;
#[cfg(feature = "read_returns_len")]
pub const READ_RETURN: usize = RANDNUM_SIZE;

/// Dispositivo de números aleatórios
pub struct RandNumDevice<E, U> {
    entropy: E,
    uaccess: U,
    /// Aberturas desde a carga; nunca decrementa
    opens: AtomicUsize,
}

impl<E, U> RandNumDevice<E, U> {
    /// Cria o dispositivo com a fonte de entropia e o acesso a usuário dados
    pub const fn new(entropy: E, uaccess: U) -> Self {
        Self {
            entropy,
            uaccess,
            opens: AtomicUsize::new(0),
        }
    }

    /// Quantas vezes o dispositivo foi aberto
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }

    /// Fonte de entropia
    pub fn entropy(&self) -> &E {
        &self.entropy
    }

    /// Acesso à memória de usuário
    pub fn uaccess(&self) -> &U {
        &self.uaccess
    }
}

impl<E: EntropySource, U: UserAccess> FileOperations for RandNumDevice<E, U> {
    fn open(&self, _file: &mut File) -> FsResult<()> {
        let opens = self.opens.fetch_add(1, Ordering::Relaxed) + 1;
        crate::kinfo!("randnumchar: Device has been opened, times=", opens);
        Ok(())
    }

    fn read(&self, _file: &mut File, buf: UserPtr, _len: usize) -> FsResult<usize> {
        let mut randnum = [0u8; RANDNUM_MAXSIZE];
        let word = &mut randnum[..RANDNUM_SIZE];

        self.entropy.fill(word);

        let not_copied = self.uaccess.copy_to_user(buf, word);
        if not_copied == 0 {
            crate::kinfo!("randnumchar: Sent a random number to the user");
            Ok(READ_RETURN)
        } else {
            crate::kwarn!("randnumchar: Failed to send characters to the user, count=", not_copied);
            Err(FsError::CopyFault)
        }
    }

    fn write(&self, _file: &mut File, _buf: UserPtr, len: usize) -> FsResult<usize> {
        crate::kinfo!("randnumchar: Write operation is not supported.");
        Ok(len)
    }

    fn release(&self, _file: &mut File) -> FsResult<()> {
        crate::kinfo!("randnumchar: Device successfully closed");
        Ok(())
    }
}
