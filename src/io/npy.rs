// File: npy.rs
// Created: 2026-10-16
// Description: Reader and writer for numpy .npy arrays
//
// Layout: magic "\x93NUMPY", major, minor, header length (u16 for 1.0,
// u32 for 2.0/3.0), a python dict literal header padded with spaces and
// terminated by '\n', then the raw data.

use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use ndarray::{ArrayD, ArrayView, Dimension, IxDyn, ShapeBuilder};
use regex::Regex;

use crate::error::{MetricError, Result};

pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";
const HEADER_ALIGNMENT: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct NpyHeader {
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl NpyHeader {
    pub fn parse(header: &str) -> Result<Self> {
        let descr_re = Regex::new(r"'descr'\s*:\s*'([^']*)'").map_err(|e| MetricError::Npy(e.to_string()))?;
        let fortran_re = Regex::new(r"'fortran_order'\s*:\s*(True|False)").map_err(|e| MetricError::Npy(e.to_string()))?;
        let shape_re = Regex::new(r"'shape'\s*:\s*\(([^)]*)\)").map_err(|e| MetricError::Npy(e.to_string()))?;

        let descr = descr_re
            .captures(header)
            .ok_or_else(|| MetricError::Npy(format!("no descr in header: {}", header)))?[1]
            .to_string();
        let fortran_order = &fortran_re
            .captures(header)
            .ok_or_else(|| MetricError::Npy(format!("no fortran_order in header: {}", header)))?[1]
            == "True";
        let shape_str = shape_re
            .captures(header)
            .ok_or_else(|| MetricError::Npy(format!("no shape in header: {}", header)))?[1]
            .to_string();
        let shape = shape_str
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            // Python 2 era files write long integers as 3L
            .map(|s| s.trim_end_matches('L').parse::<usize>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| MetricError::Npy(format!("invalid shape ({}): {}", shape_str, e)))?;
        Ok(Self {
            descr,
            fortran_order,
            shape,
        })
    }

    pub fn to_dict_string(&self) -> String {
        let shape = match self.shape.len() {
            1 => format!("({},)", self.shape[0]),
            _ => format!(
                "({})",
                self.shape.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
            ),
        };
        format!(
            "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
            self.descr,
            if self.fortran_order { "True" } else { "False" },
            shape
        )
    }

    /// Number of stored values; fails when the shape overflows `usize`
    pub fn num_elements(&self) -> Result<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| MetricError::Npy(format!("shape {:?} is too large", self.shape)))
    }
}

fn decode_values<B: ByteOrder>(data: &[u8], kind: char, size: usize, count: usize) -> Result<Vec<f64>> {
    let chunks = data.chunks_exact(size).take(count);
    let values: Vec<f64> = match (kind, size) {
        ('f', 8) => chunks.map(B::read_f64).collect(),
        ('f', 4) => chunks.map(|c| B::read_f32(c) as f64).collect(),
        ('i', 8) => chunks.map(|c| B::read_i64(c) as f64).collect(),
        ('i', 4) => chunks.map(|c| B::read_i32(c) as f64).collect(),
        ('i', 2) => chunks.map(|c| B::read_i16(c) as f64).collect(),
        ('i', 1) => chunks.map(|c| c[0] as i8 as f64).collect(),
        ('u', 8) => chunks.map(|c| B::read_u64(c) as f64).collect(),
        ('u', 4) => chunks.map(|c| B::read_u32(c) as f64).collect(),
        ('u', 2) => chunks.map(|c| B::read_u16(c) as f64).collect(),
        ('u', 1) | ('b', 1) => chunks.map(|c| c[0] as f64).collect(),
        _ => return Err(MetricError::Npy(format!("unsupported dtype {}{}", kind, size))),
    };
    Ok(values)
}

/// Parse a complete .npy payload into an `f64` array of the stored shape.
pub fn parse_npy(bytes: &[u8]) -> Result<ArrayD<f64>> {
    if bytes.len() < 10 || &bytes[..6] != NPY_MAGIC {
        return Err(MetricError::Npy("missing magic string".to_string()));
    }
    let major = bytes[6];
    let mut cursor = Cursor::new(&bytes[8..]);
    let (header_len, header_start) = match major {
        1 => (cursor.read_u16::<LE>()? as usize, 10),
        2 | 3 => (cursor.read_u32::<LE>()? as usize, 12),
        _ => return Err(MetricError::Npy(format!("unsupported format version {}", major))),
    };
    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        return Err(MetricError::Npy("truncated header".to_string()));
    }
    let header = String::from_utf8_lossy(&bytes[header_start..data_start]);
    let header = NpyHeader::parse(&header)?;

    let mut descr = header.descr.chars();
    let (endian, kind) = match (descr.next(), descr.next()) {
        (Some(endian), Some(kind)) => (endian, kind),
        _ => return Err(MetricError::Npy(format!("invalid descr {}", header.descr))),
    };
    if kind == 'O' {
        return Err(MetricError::Npy("object arrays are not supported".to_string()));
    }
    let size: usize = descr
        .as_str()
        .parse()
        .map_err(|_| MetricError::Npy(format!("invalid descr {}", header.descr)))?;

    let count = header.num_elements()?;
    let n_bytes = count
        .checked_mul(size)
        .ok_or_else(|| MetricError::Npy(format!("shape {:?} is too large", header.shape)))?;
    let data = &bytes[data_start..];
    if data.len() < n_bytes {
        return Err(MetricError::Npy(format!(
            "expected {} bytes of data, found {}",
            n_bytes,
            data.len()
        )));
    }
    let values = match endian {
        '>' => decode_values::<BigEndian>(data, kind, size, count)?,
        '<' | '|' | '=' => decode_values::<LE>(data, kind, size, count)?,
        _ => return Err(MetricError::Npy(format!("invalid byte order in {}", header.descr))),
    };

    let shape = IxDyn(&header.shape);
    let array = if header.fortran_order {
        ArrayD::from_shape_vec(shape.f(), values)
    } else {
        ArrayD::from_shape_vec(shape, values)
    };
    array.map_err(|e| MetricError::Npy(e.to_string()))
}

pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<ArrayD<f64>> {
    let mut bytes = Vec::new();
    File::open(path.as_ref())?.read_to_end(&mut bytes)?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.as_ref().display());
    parse_npy(&bytes)
}

/// Serialize an array as .npy version 1.0, little-endian `f8`, C order.
pub fn npy_bytes<D: Dimension>(array: ArrayView<f64, D>) -> Result<Vec<u8>> {
    let header = NpyHeader {
        descr: "<f8".to_string(),
        fortran_order: false,
        shape: array.shape().to_vec(),
    };
    let mut dict = header.to_dict_string();
    // magic(6) + version(2) + length(2) + dict + '\n' is padded to the alignment
    let unpadded = NPY_MAGIC.len() + 4 + dict.len() + 1;
    let padding = (HEADER_ALIGNMENT - unpadded % HEADER_ALIGNMENT) % HEADER_ALIGNMENT;
    dict.push_str(&" ".repeat(padding));
    dict.push('\n');
    let header_len = u16::try_from(dict.len())
        .map_err(|_| MetricError::Npy(format!("header too long for version 1.0: {}", dict.len())))?;

    let mut bytes = Vec::with_capacity(NPY_MAGIC.len() + 4 + dict.len() + 8 * array.len());
    bytes.write_all(NPY_MAGIC)?;
    bytes.write_all(&[1, 0])?;
    bytes.write_u16::<LE>(header_len)?;
    bytes.write_all(dict.as_bytes())?;
    for &value in array.iter() {
        bytes.write_f64::<LE>(value)?;
    }
    Ok(bytes)
}

pub fn write_npy<P: AsRef<Path>, D: Dimension>(path: P, array: ArrayView<f64, D>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&npy_bytes(array)?)?;
    writer.flush()?;
    Ok(())
}
