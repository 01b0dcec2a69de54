//! In-memory EEPROM image
//!
//! An [`Image`] mirrors a fixed-size binary file. All byte access is bounds
//! checked, but out-of-range access is **not** an error:
//!
//! - [`Image::read`] returns `None` for an offset past the end
//! - [`Image::write`] silently drops a byte written past the end
//! - range writes stop at the first byte that would land past the end
//!
//! Callers that need to know whether a write landed must check the offsets
//! themselves; a silent no-op is not a success report.
//!
//! Unwritten bytes hold [`ERASED_BYTE`] (0xFF), matching erased flash.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Value of an erased (unprogrammed) byte
pub const ERASED_BYTE: u8 = 0xFF;

/// Image size used when none is configured
pub const DEFAULT_IMAGE_SIZE: usize = 256;

/// Bytes per row in [`Image::dump`]
const DUMP_COLUMNS: usize = 16;

/// A fixed-size byte buffer backed by a file
#[derive(Debug, Clone)]
pub struct Image {
    path: PathBuf,
    size: usize,
    content: Vec<u8>,
}

impl Image {
    /// Create an erased image of `size` bytes bound to `path`
    ///
    /// The file is not touched until [`reload`](Self::reload) or
    /// [`save`](Self::save) is called.
    pub fn new(path: impl Into<PathBuf>, size: usize) -> Self {
        Self {
            path: path.into(),
            size,
            content: vec![ERASED_BYTE; size],
        }
    }

    /// Create an image holding `bytes`, sized to their length
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            size: bytes.len(),
            content: bytes.to_vec(),
        }
    }

    /// Image capacity in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current image content
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Read the byte at `offset`, or `None` if it is out of range
    pub fn read(&self, offset: usize) -> Option<u8> {
        self.content.get(offset).copied()
    }

    /// Store `value` at `offset`; no-op if `offset` is out of range
    pub fn write(&mut self, offset: usize, value: u8) {
        if let Some(byte) = self.content.get_mut(offset) {
            *byte = value;
        }
    }

    /// Write `data` starting at `offset`
    ///
    /// Stops at the first byte that would land past the end of the image;
    /// the bytes before it are kept (partial write).
    pub fn write_range(&mut self, offset: usize, data: &[u8]) {
        for (i, &value) in data.iter().enumerate() {
            match offset.checked_add(i) {
                Some(addr) if addr < self.size => self.write(addr, value),
                _ => {
                    log::trace!(
                        "range write at 0x{:X} truncated after {} of {} bytes",
                        offset,
                        i,
                        data.len()
                    );
                    break;
                }
            }
        }
    }

    /// Write `text` as a fixed-width, NUL-padded string
    ///
    /// `width` defaults to the text length plus one terminator byte. When
    /// `width` is not larger than the text, the text is cut to exactly
    /// `width` bytes and no terminator is stored.
    pub fn write_string(&mut self, offset: usize, text: &str, width: Option<usize>) {
        let text = text.as_bytes();
        let width = width.unwrap_or(text.len() + 1);
        let len = text.len().min(width);

        self.write_range(offset, &text[..len]);
        self.fill(offset.saturating_add(len), 0x00, width - len);
    }

    /// Set up to `len` bytes from `offset` to `value`, stopping at the end
    fn fill(&mut self, offset: usize, value: u8, len: usize) {
        if let Some(tail) = self.content.get_mut(offset..) {
            tail.iter_mut().take(len).for_each(|b| *b = value);
        }
    }

    /// Read a string starting at `offset`
    ///
    /// Scans at most `width` bytes (default: the image size) and stops at the
    /// end of the image, a NUL byte or an erased byte. The bytes are decoded
    /// as UTF-8; invalid sequences become U+FFFD.
    pub fn read_string(&self, offset: usize, width: Option<usize>) -> String {
        let width = width.unwrap_or(self.size);

        let bytes: Vec<u8> = (0..width)
            .map_while(|i| offset.checked_add(i).and_then(|addr| self.read(addr)))
            .take_while(|&b| b != 0x00 && b != ERASED_BYTE)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Reset `size` bytes starting at `offset` to [`ERASED_BYTE`]
    pub fn erase_range(&mut self, offset: usize, size: usize) {
        log::debug!("Erasing {} bytes at 0x{:X}", size, offset);
        self.fill(offset, ERASED_BYTE, size);
    }

    /// Render the image as a hex grid, 16 bytes per row
    ///
    /// ```text
    ///      0  1  2  3  4  5  6  7  8  9  a  b  c  d  e  f
    /// 00:  53 4e 30 30 ...
    /// 10:  ff ff ff ff ...
    /// ```
    ///
    /// Rows cover the whole image; a short last row holds only the bytes
    /// that exist.
    pub fn dump(&self) -> String {
        let mut out = String::from("   ");
        for col in 0..DUMP_COLUMNS {
            out.push_str(&format!(" {:>2x}", col));
        }
        out.push('\n');

        for (row, chunk) in self.content.chunks(DUMP_COLUMNS).enumerate() {
            let line: String = chunk.iter().map(|b| format!(" {:02x}", b)).collect();
            out.push_str(&format!("{:x}0: {}\n", row, line));
        }

        out
    }

    /// Replace the content with the backing file
    ///
    /// A file shorter than the image is padded with erased bytes and a
    /// longer one is cut, so the image size never changes.
    pub fn reload(&mut self) -> Result<()> {
        let mut data = fs::read(&self.path).map_err(|e| Error::io(&self.path, e))?;

        if data.len() != self.size {
            log::warn!(
                "{} is {} bytes, expected {}; {}",
                self.path.display(),
                data.len(),
                self.size,
                if data.len() < self.size {
                    "padding with 0xFF"
                } else {
                    "ignoring trailing bytes"
                }
            );
            data.resize(self.size, ERASED_BYTE);
        }

        self.content = data;
        log::debug!("Loaded {} bytes from {}", self.size, self.path.display());
        Ok(())
    }

    /// Overwrite the backing file with the current content
    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, &self.content).map_err(|e| Error::io(&self.path, e))?;
        log::debug!("Saved {} bytes to {}", self.size, self.path.display());
        Ok(())
    }
}
