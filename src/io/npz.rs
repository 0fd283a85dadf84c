// File: npz.rs
// Created: 2026-10-16
// Description: numpy .npz archives (ZIP containers of .npy members)
//
// Entries are located through the central directory, so archives written to
// a stream (data descriptors) and ZIP64 archives written by numpy's
// `force_zip64` are read the same way. Members may be stored or deflated.

use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use flate2::read::DeflateDecoder;
use flate2::Crc;
use ndarray::{ArrayD, ArrayViewD};

use crate::error::{MetricError, Result};
use crate::io::npy::{npy_bytes, parse_npy};

const LOCAL_HEADER_SIG: u32 = 0x04034b50;
const CENTRAL_HEADER_SIG: u32 = 0x02014b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x06054b50;
const ZIP64_END_OF_CENTRAL_DIR_SIG: u32 = 0x06064b50;
const ZIP64_LOCATOR_SIG: u32 = 0x07064b50;
const ZIP64_EXTRA_ID: u16 = 0x0001;
const END_OF_CENTRAL_DIR_LEN: usize = 22;
const CENTRAL_HEADER_LEN: usize = 46;
const LOCAL_HEADER_LEN: usize = 30;
const METHOD_STORED: u16 = 0;
const METHOD_DEFLATED: u16 = 8;
// 1980-01-01, the earliest DOS date
const DOS_DATE_EPOCH: u16 = (1 << 5) | 1;

#[derive(Debug, Clone, PartialEq)]
pub struct NpzEntry {
    pub name: String,
    pub method: u16,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub local_header_offset: u64,
}

impl NpzEntry {
    /// Array name as used by numpy: the member name without `.npy`
    pub fn array_name(&self) -> &str {
        self.name.strip_suffix(".npy").unwrap_or(&self.name)
    }
}

fn slice(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    bytes
        .get(offset..offset.saturating_add(len))
        .ok_or_else(|| MetricError::Archive(format!("truncated at offset {}", offset)))
}

fn read_u16_at(bytes: &[u8], offset: usize) -> Result<u16> {
    Ok(LE::read_u16(slice(bytes, offset, 2)?))
}

fn read_u32_at(bytes: &[u8], offset: usize) -> Result<u32> {
    Ok(LE::read_u32(slice(bytes, offset, 4)?))
}

fn read_u64_at(bytes: &[u8], offset: usize) -> Result<u64> {
    Ok(LE::read_u64(slice(bytes, offset, 8)?))
}

fn to_offset(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| MetricError::Archive(format!("offset {} out of range", value)))
}

fn find_end_of_central_dir(bytes: &[u8]) -> Result<usize> {
    if bytes.len() < END_OF_CENTRAL_DIR_LEN {
        return Err(MetricError::Archive("file too short".to_string()));
    }
    // The record is followed by a comment of at most u16::MAX bytes
    let last = bytes.len() - END_OF_CENTRAL_DIR_LEN;
    let first = last.saturating_sub(u16::MAX as usize);
    (first..=last)
        .rev()
        .find(|&pos| LE::read_u32(&bytes[pos..pos + 4]) == END_OF_CENTRAL_DIR_SIG)
        .ok_or_else(|| MetricError::Archive("end of central directory not found".to_string()))
}

/// (number of entries, central directory offset)
fn central_dir_location(bytes: &[u8]) -> Result<(u64, u64)> {
    let eocd = find_end_of_central_dir(bytes)?;
    let entries = read_u16_at(bytes, eocd + 10)? as u64;
    let cd_offset = read_u32_at(bytes, eocd + 16)? as u64;
    if entries != u16::MAX as u64 && cd_offset != u32::MAX as u64 {
        return Ok((entries, cd_offset));
    }

    if eocd < 20 || read_u32_at(bytes, eocd - 20)? != ZIP64_LOCATOR_SIG {
        return Err(MetricError::Archive("ZIP64 locator not found".to_string()));
    }
    let zip64_eocd = to_offset(read_u64_at(bytes, eocd - 20 + 8)?)?;
    if read_u32_at(bytes, zip64_eocd)? != ZIP64_END_OF_CENTRAL_DIR_SIG {
        return Err(MetricError::Archive("ZIP64 end of central directory not found".to_string()));
    }
    let entries = read_u64_at(bytes, zip64_eocd + 32)?;
    let cd_offset = read_u64_at(bytes, zip64_eocd + 48)?;
    Ok((entries, cd_offset))
}

// Sizes and offset saturated at u32::MAX in the fixed header are stored in the
// ZIP64 extra field, in this order and only when saturated.
fn apply_zip64_extra(extra: &[u8], entry: &mut NpzEntry) -> Result<()> {
    let mut pos = 0usize;
    while pos + 4 <= extra.len() {
        let id = read_u16_at(extra, pos)?;
        let size = read_u16_at(extra, pos + 2)? as usize;
        let data = slice(extra, pos + 4, size)?;
        if id == ZIP64_EXTRA_ID {
            let mut cursor = Cursor::new(data);
            if entry.uncompressed_size == u32::MAX as u64 {
                entry.uncompressed_size = cursor.read_u64::<LE>()?;
            }
            if entry.compressed_size == u32::MAX as u64 {
                entry.compressed_size = cursor.read_u64::<LE>()?;
            }
            if entry.local_header_offset == u32::MAX as u64 {
                entry.local_header_offset = cursor.read_u64::<LE>()?;
            }
        }
        pos += 4 + size;
    }
    Ok(())
}

/// Entries of an archive in central directory order
pub fn list_entries(bytes: &[u8]) -> Result<Vec<NpzEntry>> {
    let (n_entries, cd_offset) = central_dir_location(bytes)?;
    let mut pos = to_offset(cd_offset)?;
    let mut entries = Vec::new();
    for _ in 0..n_entries {
        if read_u32_at(bytes, pos)? != CENTRAL_HEADER_SIG {
            return Err(MetricError::Archive(format!("bad central directory entry at offset {}", pos)));
        }
        let name_len = read_u16_at(bytes, pos + 28)? as usize;
        let extra_len = read_u16_at(bytes, pos + 30)? as usize;
        let comment_len = read_u16_at(bytes, pos + 32)? as usize;
        let name_start = pos + CENTRAL_HEADER_LEN;
        let name = String::from_utf8_lossy(slice(bytes, name_start, name_len)?).to_string();
        let mut entry = NpzEntry {
            name,
            method: read_u16_at(bytes, pos + 10)?,
            crc32: read_u32_at(bytes, pos + 16)?,
            compressed_size: read_u32_at(bytes, pos + 20)? as u64,
            uncompressed_size: read_u32_at(bytes, pos + 24)? as u64,
            local_header_offset: read_u32_at(bytes, pos + 42)? as u64,
        };
        apply_zip64_extra(slice(bytes, name_start + name_len, extra_len)?, &mut entry)?;
        entries.push(entry);
        pos = name_start + name_len + extra_len + comment_len;
    }
    Ok(entries)
}

/// Decompressed content of one member, checked against its CRC-32
pub fn read_entry(bytes: &[u8], entry: &NpzEntry) -> Result<Vec<u8>> {
    let offset = to_offset(entry.local_header_offset)?;
    if read_u32_at(bytes, offset)? != LOCAL_HEADER_SIG {
        return Err(MetricError::Archive(format!("bad local header for {}", entry.name)));
    }
    let name_len = read_u16_at(bytes, offset + 26)? as usize;
    let extra_len = read_u16_at(bytes, offset + 28)? as usize;
    let data_start = offset + LOCAL_HEADER_LEN + name_len + extra_len;
    let raw = slice(bytes, data_start, to_offset(entry.compressed_size)?)?;

    let content = match entry.method {
        METHOD_STORED => raw.to_vec(),
        METHOD_DEFLATED => {
            let mut content = Vec::with_capacity(to_offset(entry.uncompressed_size)?);
            DeflateDecoder::new(raw).read_to_end(&mut content)?;
            content
        }
        method => {
            return Err(MetricError::Archive(format!(
                "unsupported compression method {} for {}",
                method, entry.name
            )))
        }
    };
    if content.len() as u64 != entry.uncompressed_size {
        return Err(MetricError::Archive(format!(
            "{}: expected {} bytes, found {}",
            entry.name,
            entry.uncompressed_size,
            content.len()
        )));
    }
    let mut crc = Crc::new();
    crc.update(&content);
    if crc.sum() != entry.crc32 {
        return Err(MetricError::Archive(format!("CRC mismatch for {}", entry.name)));
    }
    Ok(content)
}

fn read_archive<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    File::open(path.as_ref())?.read_to_end(&mut bytes)?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.as_ref().display());
    Ok(bytes)
}

/// Every array of an archive with its name, in archive order
pub fn read_npz<P: AsRef<Path>>(path: P) -> Result<Vec<(String, ArrayD<f64>)>> {
    let bytes = read_archive(path)?;
    list_entries(&bytes)?
        .iter()
        .map(|entry| -> Result<(String, ArrayD<f64>)> {
            Ok((entry.array_name().to_string(), parse_npy(&read_entry(&bytes, entry)?)?))
        })
        .collect()
}

/// The first array of an archive (`arr_0` for positional `np.savez`)
pub fn read_npz_first<P: AsRef<Path>>(path: P) -> Result<ArrayD<f64>> {
    let bytes = read_archive(path.as_ref())?;
    let entries = list_entries(&bytes)?;
    let first = entries
        .first()
        .ok_or_else(|| MetricError::Archive(format!("{} holds no arrays", path.as_ref().display())))?;
    parse_npy(&read_entry(&bytes, first)?)
}

/// Write arrays as an uncompressed archive readable with `np.load`.
/// Names are given without the `.npy` suffix.
pub fn write_npz<P: AsRef<Path>>(path: P, arrays: &[(&str, ArrayViewD<f64>)]) -> Result<()> {
    let too_large = || MetricError::Archive("archive larger than 4 GiB".to_string());
    let mut out: Vec<u8> = Vec::new();
    let mut central: Vec<u8> = Vec::new();

    for (name, array) in arrays {
        let member = format!("{}.npy", name);
        let data = npy_bytes(array.view())?;
        let mut crc = Crc::new();
        crc.update(&data);
        let size = u32::try_from(data.len()).map_err(|_| too_large())?;
        let offset = u32::try_from(out.len()).map_err(|_| too_large())?;

        out.write_u32::<LE>(LOCAL_HEADER_SIG)?;
        out.write_u16::<LE>(20)?; // version needed
        out.write_u16::<LE>(0)?; // flags
        out.write_u16::<LE>(METHOD_STORED)?;
        out.write_u16::<LE>(0)?; // time
        out.write_u16::<LE>(DOS_DATE_EPOCH)?;
        out.write_u32::<LE>(crc.sum())?;
        out.write_u32::<LE>(size)?;
        out.write_u32::<LE>(size)?;
        out.write_u16::<LE>(member.len() as u16)?;
        out.write_u16::<LE>(0)?; // extra length
        out.write_all(member.as_bytes())?;
        out.write_all(&data)?;

        central.write_u32::<LE>(CENTRAL_HEADER_SIG)?;
        central.write_u16::<LE>(20)?; // version made by
        central.write_u16::<LE>(20)?; // version needed
        central.write_u16::<LE>(0)?;
        central.write_u16::<LE>(METHOD_STORED)?;
        central.write_u16::<LE>(0)?;
        central.write_u16::<LE>(DOS_DATE_EPOCH)?;
        central.write_u32::<LE>(crc.sum())?;
        central.write_u32::<LE>(size)?;
        central.write_u32::<LE>(size)?;
        central.write_u16::<LE>(member.len() as u16)?;
        central.write_u16::<LE>(0)?; // extra length
        central.write_u16::<LE>(0)?; // comment length
        central.write_u16::<LE>(0)?; // disk number
        central.write_u16::<LE>(0)?; // internal attributes
        central.write_u32::<LE>(0)?; // external attributes
        central.write_u32::<LE>(offset)?;
        central.write_all(member.as_bytes())?;
    }

    let cd_offset = u32::try_from(out.len()).map_err(|_| too_large())?;
    let cd_size = u32::try_from(central.len()).map_err(|_| too_large())?;
    let n_entries = u16::try_from(arrays.len()).map_err(|_| MetricError::Archive("too many arrays".to_string()))?;
    out.write_all(&central)?;
    out.write_u32::<LE>(END_OF_CENTRAL_DIR_SIG)?;
    out.write_u16::<LE>(0)?;
    out.write_u16::<LE>(0)?;
    out.write_u16::<LE>(n_entries)?;
    out.write_u16::<LE>(n_entries)?;
    out.write_u32::<LE>(cd_size)?;
    out.write_u32::<LE>(cd_offset)?;
    out.write_u16::<LE>(0)?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&out)?;
    writer.flush()?;
    Ok(())
}
