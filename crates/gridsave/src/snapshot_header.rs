// ---------------------------------------------------------------------------
// snapshot_header – Snapshot file header with magic bytes, version, checksum
// ---------------------------------------------------------------------------
//
// Header format (28 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "SHIP" (0x53484950)
//   [4..8]   Format version (u32)
//   [8..12]  Flags (u32: bit 0 = lz4-compressed payload)
//   [12..20] Timestamp (Unix epoch, u64)
//   [20..24] Uncompressed payload size (u32)
//   [24..28] xxHash32 checksum of the payload (everything after the header)
//
// On export: encode ShipSnapshot -> compress -> prepend header
// On load: check magic -> validate checksum -> strip header -> decompress -> decode

use xxhash_rust::xxh32::xxh32;

use crate::error::ExportError;

/// Magic bytes identifying a ship snapshot file.
pub const MAGIC: [u8; 4] = [0x53, 0x48, 0x49, 0x50]; // "SHIP"

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Current header format version.  Tracks the header layout, not the
/// snapshot schema.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Flag bit: payload is lz4 block-compressed.
pub const FLAG_COMPRESSED: u32 = 1;

/// Seed for the xxHash32 checksum.
const XXHASH_SEED: u32 = 0;

/// Parsed snapshot header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub format_version: u32,
    pub flags: u32,
    pub timestamp: u64,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

/// Wrap a payload with a snapshot header.
///
/// Returns bytes: [header (28 bytes)] ++ [payload].
pub fn wrap_with_header(payload: &[u8], flags: u32, uncompressed_size: u32) -> Vec<u8> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&HEADER_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&timestamp.to_le_bytes());
    out.extend_from_slice(&uncompressed_size.to_le_bytes());
    out.extend_from_slice(&xxh32(payload, XXHASH_SEED).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Parse and validate the header, returning it with the payload slice.
pub fn unwrap_header(bytes: &[u8]) -> Result<(SnapshotHeader, &[u8]), ExportError> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        return Err(ExportError::Header(
            "not a ship snapshot (bad magic bytes)".into(),
        ));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(ExportError::Header(format!(
            "file too short: {} bytes, need at least {} for the header",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let format_version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let flags = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let timestamp = u64::from_le_bytes([
        bytes[12], bytes[13], bytes[14], bytes[15], bytes[16], bytes[17], bytes[18], bytes[19],
    ]);
    let uncompressed_size = u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    let checksum = u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]);

    if format_version > HEADER_FORMAT_VERSION {
        return Err(ExportError::Header(format!(
            "snapshot uses header format version {format_version}, this build supports up to {HEADER_FORMAT_VERSION}"
        )));
    }

    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(ExportError::Header(format!(
            "checksum mismatch (expected {checksum:#010X}, got {computed:#010X})"
        )));
    }

    Ok((
        SnapshotHeader {
            format_version,
            flags,
            timestamp,
            uncompressed_size,
            checksum,
        },
        payload,
    ))
}
