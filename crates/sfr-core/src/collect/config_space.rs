//! Bounds-checked reader over a PCI configuration-space snapshot.
//!
//! The snapshot is taken with a single read of the device's sysfs `config`
//! file and never changes afterwards. Typed getters decode little-endian
//! integers and return zero when the buffer is too short for the field: an
//! unprivileged read of `config` yields only the first 64 bytes, and a short
//! buffer must not stop device identification.

use sfr_common::{Error, Result};
use std::io::Read;

/// Standard header offsets.
pub mod offsets {
    pub const VENDOR_ID: usize = 0x00;
    pub const DEVICE_ID: usize = 0x02;
    pub const REVISION: usize = 0x08;
    pub const DEVICE_CLASS: usize = 0x0a;
    pub const SUBSYSTEM_VENDOR_ID: usize = 0x2c;
    pub const SUBSYSTEM_ID: usize = 0x2e;
}

/// Immutable configuration-space bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSpace {
    bytes: Box<[u8]>,
}

impl ConfigSpace {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        ConfigSpace {
            bytes: bytes.into(),
        }
    }

    /// Snapshot a source with one read to its end.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Exactly `length` bytes at `offset`, or `None` if any of them lies
    /// past the end of the buffer.
    pub fn read(&self, offset: usize, length: usize) -> Option<&[u8]> {
        let end = offset.checked_add(length)?;
        self.bytes.get(offset..end)
    }

    /// Like [`ConfigSpace::read`], but reports the short buffer.
    pub fn try_read(&self, offset: usize, length: usize) -> Result<&[u8]> {
        self.read(offset, length)
            .ok_or(Error::MalformedBinaryInput {
                offset,
                length,
                available: self.bytes.len(),
            })
    }

    fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.read(offset, N)?.try_into().ok()
    }

    /// Byte at `offset`, zero if absent.
    pub fn u8(&self, offset: usize) -> u8 {
        self.array::<1>(offset).map(u8::from_le_bytes).unwrap_or(0)
    }

    /// Little-endian u16 at `offset`, zero if absent.
    pub fn u16(&self, offset: usize) -> u16 {
        self.array::<2>(offset).map(u16::from_le_bytes).unwrap_or(0)
    }

    /// Little-endian u32 at `offset`, zero if absent.
    pub fn u32(&self, offset: usize) -> u32 {
        self.array::<4>(offset).map(u32::from_le_bytes).unwrap_or(0)
    }

    pub fn vendor_id(&self) -> u16 {
        self.u16(offsets::VENDOR_ID)
    }

    pub fn device_id(&self) -> u16 {
        self.u16(offsets::DEVICE_ID)
    }

    pub fn revision(&self) -> u8 {
        self.u8(offsets::REVISION)
    }

    /// Base class and subclass, e.g. `0x0200` for an Ethernet controller.
    pub fn device_class(&self) -> u16 {
        self.u16(offsets::DEVICE_CLASS)
    }

    pub fn subsystem_vendor_id(&self) -> u16 {
        self.u16(offsets::SUBSYSTEM_VENDOR_ID)
    }

    pub fn subsystem_id(&self) -> u16 {
        self.u16(offsets::SUBSYSTEM_ID)
    }
}
