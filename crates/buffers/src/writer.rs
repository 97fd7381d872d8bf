//! Binary buffer writer with auto-growing capacity.

/// Big-endian writer over a buffer that grows as needed.
///
/// Bytes between the last flush position `x0` and the cursor `x` form the
/// pending output; [`Writer::flush`] hands them out and starts a new segment
/// in the same allocation.
///
/// # Example
///
/// ```
/// use simplemsgpack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where the last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a writer with the default allocation size (4 KiB).
    pub fn new() -> Self {
        Self::with_alloc_size(4 * 1024)
    }

    /// Creates a writer with a custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Ensures at least `capacity` bytes are writable after the cursor.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let pending = self.x - self.x0;
            let total_required = pending + capacity;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    // Moves the pending segment to the front of a fresh allocation.
    fn grow(&mut self, new_size: usize) {
        let pending = self.x - self.x0;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..pending].copy_from_slice(&self.uint8[self.x0..self.x]);
        self.uint8 = new_buf;
        self.x = pending;
        self.x0 = 0;
    }

    /// Discards pending bytes written since the last flush.
    pub fn reset(&mut self) {
        self.x = self.x0;
    }

    /// Number of pending bytes.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    /// Returns `true` when nothing was written since the last flush.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the pending bytes and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    /// Writes two bytes, typically a marker followed by a one-byte length.
    #[inline]
    pub fn u8u8(&mut self, a: u8, b: u8) {
        self.ensure_capacity(2);
        self.uint8[self.x] = a;
        self.uint8[self.x + 1] = b;
        self.x += 2;
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.ensure_capacity(2);
        self.uint8[self.x..self.x + 2].copy_from_slice(&val.to_be_bytes());
        self.x += 2;
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.ensure_capacity(4);
        self.uint8[self.x..self.x + 4].copy_from_slice(&val.to_be_bytes());
        self.x += 4;
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.ensure_capacity(8);
        self.uint8[self.x..self.x + 8].copy_from_slice(&val.to_be_bytes());
        self.x += 8;
    }

    /// Writes a marker byte followed by a u16.
    pub fn u8u16(&mut self, marker: u8, val: u16) {
        self.ensure_capacity(3);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 3].copy_from_slice(&val.to_be_bytes());
        self.x += 3;
    }

    /// Writes a marker byte followed by a u32.
    pub fn u8u32(&mut self, marker: u8, val: u32) {
        self.ensure_capacity(5);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 5].copy_from_slice(&val.to_be_bytes());
        self.x += 5;
    }

    /// Writes a marker byte followed by a u64.
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.ensure_capacity(9);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 9].copy_from_slice(&val.to_be_bytes());
        self.x += 9;
    }

    /// Writes a marker byte followed by an f64.
    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.ensure_capacity(9);
        self.uint8[self.x] = marker;
        self.uint8[self.x + 1..self.x + 9].copy_from_slice(&val.to_be_bytes());
        self.x += 9;
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }
}
