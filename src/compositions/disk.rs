use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut};
use tracing::debug;

use super::{composition_count, for_each_weak_composition};
use crate::error::CompositionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    U8,
    U16,
    U32,
    U64,
}

impl ElementType {
    pub fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }

    pub fn max_value(self) -> u64 {
        match self {
            Self::U8 => u64::from(u8::MAX),
            Self::U16 => u64::from(u16::MAX),
            Self::U32 => u64::from(u32::MAX),
            Self::U64 => u64::MAX,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
        }
    }

    fn encode(self, value: u64, out: &mut [u8]) {
        let bytes = value.to_le_bytes();
        out.copy_from_slice(&bytes[..self.width()]);
    }

    fn decode(self, cell: &[u8]) -> u64 {
        let mut bytes = [0_u8; 8];
        bytes[..self.width()].copy_from_slice(cell);
        u64::from_le_bytes(bytes)
    }
}

/// Streams every composition of `total` into `parts` into a pre-sized,
/// memory-mapped file at `path`, shape `(C(total+parts-1, parts-1), parts)`,
/// row-major. Any existing file at `path` is replaced.
pub fn materialize_to_disk(
    total: i64,
    parts: i64,
    path: &Path,
    element_type: ElementType,
) -> Result<PathBuf, CompositionError> {
    let too_large = || CompositionError::TooLarge { total, parts };

    let rows = composition_count(total, parts).ok_or_else(too_large)?;
    if total > 0 && total.unsigned_abs() > element_type.max_value() {
        return Err(CompositionError::ElementOverflow {
            element_type: element_type.as_str(),
            total,
        });
    }

    let width = usize::try_from(parts.max(0)).map_err(|_| too_large())?;
    let row_bytes = width.checked_mul(element_type.width()).ok_or_else(too_large)?;
    let byte_len = usize::try_from(rows)
        .ok()
        .and_then(|rows| rows.checked_mul(row_bytes))
        .ok_or_else(too_large)?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(byte_len as u64)?;

    if byte_len > 0 {
        // SAFETY: the file was just created and truncated by this call and is
        // not shared; the mapping is dropped before returning.
        let mut map = unsafe { MmapMut::map_mut(&file)? };
        let cell_bytes = element_type.width();
        let mut offset = 0usize;
        for_each_weak_composition(total, parts, |row| {
            for value in row {
                element_type.encode(*value, &mut map[offset..offset + cell_bytes]);
                offset += cell_bytes;
            }
        });
        map.flush()?;
    }

    debug!(
        path = %path.display(),
        total,
        parts,
        rows,
        element_type = element_type.as_str(),
        "materialized weak compositions"
    );
    Ok(path.to_path_buf())
}

#[derive(Debug)]
pub struct CompositionTable {
    map: Option<Mmap>,
    parts: usize,
    element_type: ElementType,
}

impl CompositionTable {
    pub fn open(
        path: &Path,
        parts: usize,
        element_type: ElementType,
    ) -> Result<Self, CompositionError> {
        let file = File::open(path)?;
        let byte_len = usize::try_from(file.metadata()?.len()).ok();
        let (byte_len, row_bytes) = match (byte_len, parts.checked_mul(element_type.width())) {
            (Some(byte_len), Some(row_bytes)) => (byte_len, row_bytes),
            (byte_len, row_bytes) => {
                return Err(CompositionError::Layout {
                    actual: byte_len.unwrap_or(usize::MAX),
                    row_bytes: row_bytes.unwrap_or(usize::MAX),
                });
            }
        };

        if byte_len > 0 && (row_bytes == 0 || byte_len % row_bytes != 0) {
            return Err(CompositionError::Layout {
                actual: byte_len,
                row_bytes,
            });
        }

        let map = if byte_len == 0 {
            None
        } else {
            // SAFETY: the table is opened read-only; concurrent writers to the
            // same file are unsupported.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            map,
            parts,
            element_type,
        })
    }

    pub fn parts(&self) -> usize {
        self.parts
    }

    pub fn rows(&self) -> usize {
        let row_bytes = self.row_bytes();
        match &self.map {
            Some(map) if row_bytes > 0 => map.len() / row_bytes,
            _ => 0,
        }
    }

    pub fn row(&self, index: usize) -> Option<Vec<u64>> {
        if index >= self.rows() {
            return None;
        }
        let map = self.map.as_ref()?;
        let row_bytes = self.row_bytes();
        let start = index * row_bytes;
        let cells = map[start..start + row_bytes]
            .chunks_exact(self.element_type.width())
            .map(|cell| self.element_type.decode(cell))
            .collect::<Vec<u64>>();
        Some(cells)
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec<u64>> + '_ {
        (0..self.rows()).filter_map(|index| self.row(index))
    }

    fn row_bytes(&self) -> usize {
        self.parts * self.element_type.width()
    }
}
