//! Testes para /dev/randnumchar

#![cfg(test)]

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use super::{create_test_device, create_test_window, USER_LEN};
use crate::drivers::rng::{EntropySource, XorShiftRng};
use crate::fs::devfs::devices::randnum::{RandNumDevice, READ_RETURN, RANDNUM_SIZE};
use crate::fs::devfs::{
    DevFS, DeviceNumber, DeviceRegistry, File, FileOperations, FsError, OpenFlags,
};
use crate::mm::{UserAccess, UserPtr, UserWindow};
use crate::module::RandNumModule;

fn test_file() -> File {
    File::new(DeviceNumber::new(254, 0), OpenFlags::RDONLY)
}

/// Primeiros `RANDNUM_SIZE` bytes que `XorShiftRng::new(seed)` produz
fn expected_word(seed: u64) -> [u8; RANDNUM_SIZE] {
    let bytes = XorShiftRng::new(seed).next_u64().to_ne_bytes();
    let mut word = [0u8; RANDNUM_SIZE];
    word.copy_from_slice(&bytes[..RANDNUM_SIZE]);
    word
}

fn read_back<U: UserAccess>(uaccess: &U, at: UserPtr) -> [u8; RANDNUM_SIZE] {
    let mut out = [0u8; RANDNUM_SIZE];
    assert_eq!(uaccess.copy_from_user(&mut out, at), 0);
    out
}

/// Conta chamadas e bytes pedidos; preenche com 0x5A
struct CountingRng {
    calls: AtomicUsize,
    last_len: AtomicUsize,
}

impl CountingRng {
    const fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_len: AtomicUsize::new(0),
        }
    }
}

impl EntropySource for CountingRng {
    fn fill(&self, buf: &mut [u8]) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_len.store(buf.len(), Ordering::SeqCst);
        buf.fill(0x5A);
    }
}

/// Cada chamada preenche o buffer inteiro com um único byte (1, 2, 3, ...)
struct PatternRng {
    next: AtomicU8,
}

impl EntropySource for PatternRng {
    fn fill(&self, buf: &mut [u8]) {
        let v = self.next.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        for b in buf.iter_mut() {
            *b = v;
        }
    }
}

#[test]
fn test_open_counts_each_call() {
    let window = create_test_window();
    let device = create_test_device(1, &window);
    let mut file = test_file();

    assert_eq!(device.opens(), 0);
    for expected in 1..=3 {
        assert_eq!(device.open(&mut file), Ok(()));
        assert_eq!(device.opens(), expected);
    }
}

#[test]
fn test_release_keeps_counter() {
    let window = create_test_window();
    let device = create_test_device(1, &window);
    let mut file = test_file();

    device.open(&mut file).unwrap();
    assert_eq!(device.release(&mut file), Ok(()));
    assert_eq!(device.opens(), 1);
}

#[test]
fn test_read_copies_one_word() {
    let window = create_test_window();
    let device = create_test_device(7, &window);
    let mut file = test_file();

    let result = device.read(&mut file, window.base(), RANDNUM_SIZE);
    assert_eq!(result, Ok(READ_RETURN));
    assert_eq!(read_back(&window, window.base()), expected_word(7));

    // Nada além dos 4 bytes é tocado
    let mut rest = [0xFFu8; 4];
    assert_eq!(window.copy_from_user(&mut rest, window.at(RANDNUM_SIZE)), 0);
    assert_eq!(rest, [0; 4]);
}

#[cfg(not(feature = "read_returns_len"))]
#[test]
fn test_read_returns_zero() {
    let window = create_test_window();
    let device = create_test_device(7, &window);
    assert_eq!(device.read(&mut test_file(), window.base(), 4), Ok(0));
}

#[cfg(feature = "read_returns_len")]
#[test]
fn test_read_returns_word_size() {
    let window = create_test_window();
    let device = create_test_device(7, &window);
    assert_eq!(device.read(&mut test_file(), window.base(), 4), Ok(RANDNUM_SIZE));
}

#[test]
fn test_read_ignores_requested_length() {
    let window = create_test_window();
    let device = RandNumDevice::new(CountingRng::new(), &window);
    let mut file = test_file();

    for len in [0, 1, 1000] {
        assert_eq!(device.read(&mut file, window.base(), len), Ok(READ_RETURN));
        assert_eq!(device.entropy().last_len.load(Ordering::SeqCst), RANDNUM_SIZE);
    }
    assert_eq!(device.entropy().calls.load(Ordering::SeqCst), 3);
    assert_eq!(read_back(&window, window.base()), [0x5A; RANDNUM_SIZE]);
}

#[test]
fn test_each_read_regenerates() {
    let window = create_test_window();
    let device = create_test_device(11, &window);
    let mut file = test_file();

    device.read(&mut file, window.at(0), RANDNUM_SIZE).unwrap();
    device.read(&mut file, window.at(8), RANDNUM_SIZE).unwrap();

    let rng = XorShiftRng::new(11);
    let first = rng.next_u64().to_ne_bytes();
    let second = rng.next_u64().to_ne_bytes();
    assert_eq!(read_back(&window, window.at(0))[..], first[..RANDNUM_SIZE]);
    assert_eq!(read_back(&window, window.at(8))[..], second[..RANDNUM_SIZE]);
}

#[test]
fn test_read_null_pointer_faults() {
    let window = create_test_window();
    let device = create_test_device(3, &window);
    let mut file = test_file();

    let err = device.read(&mut file, UserPtr::NULL, RANDNUM_SIZE).unwrap_err();
    assert_eq!(err, FsError::CopyFault);
    assert_eq!(err.as_isize(), -14);

    // Dispositivo continua utilizável
    assert_eq!(device.read(&mut file, window.base(), RANDNUM_SIZE), Ok(READ_RETURN));
}

#[test]
fn test_read_partial_copy_faults() {
    let window = create_test_window();
    let device = create_test_device(3, &window);

    // Só 2 dos 4 bytes cabem na janela
    let dst = window.at(USER_LEN - 2);
    assert_eq!(
        device.read(&mut test_file(), dst, RANDNUM_SIZE),
        Err(FsError::CopyFault)
    );
}

#[test]
fn test_write_accepts_and_discards() {
    let window = create_test_window();
    let device = RandNumDevice::new(CountingRng::new(), &window);
    let mut file = test_file();

    assert_eq!(device.write(&mut file, window.base(), 17), Ok(17));
    assert_eq!(device.write(&mut file, UserPtr::NULL, 0), Ok(0));
    assert_eq!(device.entropy().calls.load(Ordering::SeqCst), 0);
    assert_eq!(read_back(&window, window.base()), [0; RANDNUM_SIZE]);
}

#[test]
fn test_devfs_read_through_module() {
    let window = create_test_window();
    let device = create_test_device(5, &window);
    let registry = DeviceRegistry::new();
    let _module = RandNumModule::load(&registry, &device).unwrap();

    let devfs = DevFS::new(&registry);
    let mut file = devfs.open("/dev/randnumchar", OpenFlags::RDWR).unwrap();
    assert_eq!(device.opens(), 1);

    assert_eq!(file.read(window.base(), 64), Ok(READ_RETURN));
    assert_eq!(read_back(&window, window.base()), expected_word(5));
    assert_eq!(file.write(window.base(), 9), Ok(9));
    assert!(file.close().is_ok());
}

#[test]
fn test_devfs_write_only_cannot_read() {
    let window = create_test_window();
    let device = create_test_device(5, &window);
    let registry = DeviceRegistry::new();
    let _module = RandNumModule::load(&registry, &device).unwrap();

    let devfs = DevFS::new(&registry);
    let mut file = devfs.open("/dev/randnumchar", OpenFlags::WRONLY).unwrap();
    assert_eq!(file.read(window.base(), 4), Err(FsError::BadMode));
    assert_eq!(file.write(window.base(), 4), Ok(4));

    let mut ro = devfs.open("randnumchar", OpenFlags::RDONLY).unwrap();
    assert_eq!(ro.write(window.base(), 4), Err(FsError::BadMode));
    assert_eq!(device.opens(), 2);
}

#[test]
fn test_concurrent_opens_are_not_lost() {
    let window = create_test_window();
    let device = create_test_device(9, &window);
    const THREADS: usize = 4;
    const OPENS: usize = 100;

    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let mut file = test_file();
                for _ in 0..OPENS {
                    device.open(&mut file).unwrap();
                }
            });
        }
    });
    assert_eq!(device.opens(), THREADS * OPENS);
}

#[test]
fn test_concurrent_reads_never_tear() {
    let window: UserWindow<USER_LEN> = create_test_window();
    let device = RandNumDevice::new(PatternRng { next: AtomicU8::new(0) }, &window);

    std::thread::scope(|s| {
        for slot in [0usize, 8] {
            let device = &device;
            let window = &window;
            s.spawn(move || {
                let mut file = test_file();
                for _ in 0..200 {
                    device
                        .read(&mut file, window.at(slot), RANDNUM_SIZE)
                        .unwrap();
                    let word = read_back(window, window.at(slot));
                    assert!(word.iter().all(|b| *b == word[0]), "{:?}", word);
                }
            });
        }
    });
}

#[cfg(not(feature = "no_logs"))]
#[test]
fn test_copy_fault_is_logged() {
    let log = super::test_log();
    let window = create_test_window();
    let device = create_test_device(3, &window);

    let _ = device.read(&mut test_file(), UserPtr::NULL, RANDNUM_SIZE);
    assert!(log.contains(
        b"randnumchar: Failed to send characters to the user, count=0x0000000000000004\r\n"
    ));
}
