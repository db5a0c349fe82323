// =============================================================================
// SERIAL LOG BACKEND
// =============================================================================
//
// Backend de saída dos macros de log (kinfo!, kerror!, ...).
//
// ARQUITETURA:
// - O destino real (UART, console, buffer em memória) é um `LogSink`
//   instalado em tempo de execução via `set_sink`.
// - Sem sink instalado, toda saída é descartada.
// - SEM core::fmt - números são convertidos manualmente (hex/decimal).
// - SEM alocação.
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal (0x + 16 dígitos)
// - emit_dec(v)      : Envia u64 em decimal
// - emit_nl()        : Envia newline (\r\n)
// - LineBuf          : Monta uma linha inteira e envia de uma vez
//
// NOTA:
// O sink é lido sob um spinlock e a escrita acontece fora dele. Chamadas
// emit_* soltas de CPUs diferentes podem se intercalar; linhas montadas
// com LineBuf chegam inteiras.
//
// =============================================================================

use spin::Mutex;

/// Destino dos bytes de log.
pub trait LogSink: Sync {
    /// Escreve bytes brutos no destino.
    fn write_bytes(&self, bytes: &[u8]);
}

static SINK: Mutex<Option<&'static dyn LogSink>> = Mutex::new(None);

/// Instala o destino dos logs, substituindo o anterior.
pub fn set_sink(sink: &'static dyn LogSink) {
    *SINK.lock() = Some(sink);
}

/// Remove o destino atual. Logs seguintes são descartados.
pub fn clear_sink() -> Option<&'static dyn LogSink> {
    SINK.lock().take()
}

#[inline]
fn emit_bytes(bytes: &[u8]) {
    let sink = *SINK.lock();
    if let Some(sink) = sink {
        sink.write_bytes(bytes);
    }
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia um único byte.
#[inline]
pub fn emit(byte: u8) {
    emit_bytes(&[byte]);
}

/// Envia uma string.
#[inline]
pub fn emit_str(s: &str) {
    emit_bytes(s.as_bytes());
}

/// Envia uma nova linha (CRLF).
#[inline]
pub fn emit_nl() {
    emit_bytes(b"\r\n");
}

// =============================================================================
// FUNÇÕES DE ESCRITA - FORMATAÇÃO NUMÉRICA
// =============================================================================

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
pub fn emit_hex(value: u64) {
    let mut line = LineBuf::new();
    line.push_hex(value);
    line.flush();
}

/// Envia um valor u64 em decimal, sem zeros à esquerda.
pub fn emit_dec(value: u64) {
    let mut line = LineBuf::new();
    line.push_dec(value);
    line.flush();
}

// =============================================================================
// LINE BUFFER
// =============================================================================

/// Tamanho máximo de uma linha montada em `LineBuf`
pub const LINE_MAX: usize = 256;

/// Monta uma linha na pilha e a envia ao sink com uma única escrita.
///
/// Linhas emitidas assim não se intercalam com as de outras CPUs.
/// O que passar de `LINE_MAX` é descartado.
pub struct LineBuf {
    buf: [u8; LINE_MAX],
    len: usize,
}

impl LineBuf {
    pub const fn new() -> Self {
        Self {
            buf: [0; LINE_MAX],
            len: 0,
        }
    }

    /// Conteúdo montado até agora
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn push(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(LINE_MAX - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
    }

    pub fn push_str(&mut self, s: &str) {
        self.push(s.as_bytes());
    }

    pub fn push_nl(&mut self) {
        self.push(b"\r\n");
    }

    /// Acrescenta `0x` + 16 dígitos hexadecimais (maiúsculos)
    pub fn push_hex(&mut self, value: u64) {
        let mut digits = [0u8; 18];
        digits[0] = b'0';
        digits[1] = b'x';
        for i in 0..16 {
            let nibble = ((value >> (60 - i * 4)) & 0xF) as u8;
            digits[2 + i] = if nibble < 10 {
                b'0' + nibble
            } else {
                b'A' + (nibble - 10)
            };
        }
        self.push(&digits);
    }

    /// Acrescenta o valor em decimal
    pub fn push_dec(&mut self, value: u64) {
        // u64::MAX tem 20 dígitos
        let mut digits = [0u8; 20];
        let mut pos = digits.len();
        let mut v = value;
        loop {
            pos -= 1;
            digits[pos] = b'0' + (v % 10) as u8;
            v /= 10;
            if v == 0 {
                break;
            }
        }
        self.push(&digits[pos..]);
    }

    /// Envia a linha ao sink
    pub fn flush(self) {
        emit_bytes(self.as_bytes());
    }
}

impl Default for LineBuf {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// RING SINK
// =============================================================================

/// Sink em memória que guarda os últimos `N` bytes de log (estilo dmesg).
///
/// Quando cheio, os bytes mais antigos são sobrescritos.
pub struct RingSink<const N: usize> {
    inner: Mutex<Ring<N>>,
}

struct Ring<const N: usize> {
    buf: [u8; N],
    /// Próxima posição de escrita
    head: usize,
    /// Bytes válidos (<= N)
    len: usize,
}

impl<const N: usize> RingSink<N> {
    /// Cria um ring vazio.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Ring {
                buf: [0; N],
                head: 0,
                len: 0,
            }),
        }
    }

    /// Número de bytes guardados.
    pub fn len(&self) -> usize {
        self.inner.lock().len
    }

    /// Verifica se o ring está vazio.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descarta todo o conteúdo.
    pub fn clear(&self) {
        let mut ring = self.inner.lock();
        ring.head = 0;
        ring.len = 0;
    }

    /// Copia o conteúdo (do mais antigo ao mais novo) para `out`.
    ///
    /// Retorna quantos bytes foram copiados. Se `out` for menor que o
    /// conteúdo, apenas os bytes mais recentes são copiados.
    pub fn read_into(&self, out: &mut [u8]) -> usize {
        let ring = self.inner.lock();
        let count = ring.len.min(out.len());
        // Início dos `count` bytes mais recentes
        let start = (ring.head + N - count) % N;
        for (i, slot) in out.iter_mut().take(count).enumerate() {
            *slot = ring.buf[(start + i) % N];
        }
        count
    }

    /// Procura `needle` no conteúdo atual.
    pub fn contains(&self, needle: &[u8]) -> bool {
        if needle.is_empty() {
            return true;
        }
        let ring = self.inner.lock();
        if needle.len() > ring.len {
            return false;
        }
        let start = (ring.head + N - ring.len) % N;
        let at = |i: usize| ring.buf[(start + i) % N];
        (0..=ring.len - needle.len()).any(|off| needle.iter().enumerate().all(|(j, b)| at(off + j) == *b))
    }
}

impl<const N: usize> LogSink for RingSink<N> {
    fn write_bytes(&self, bytes: &[u8]) {
        if N == 0 {
            return;
        }
        let mut ring = self.inner.lock();
        for &b in bytes {
            let head = ring.head;
            ring.buf[head] = b;
            ring.head = (head + 1) % N;
            if ring.len < N {
                ring.len += 1;
            }
        }
    }
}

impl<const N: usize> Default for RingSink<N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
