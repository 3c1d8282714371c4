//! Wire form of [`RescoreConfig`]
//!
//! Moves a rescore request across a process boundary (e.g. to a shard) such
//! that the decoded config is equal to the encoded one.
//!
//! ## Format
//!
//! ```text
//! [Vector Count: varint]
//! For each query vector, in order:
//!   [Dimension: varint]
//!   [Components: dimension * f32 BE]
//! [Field: varint byte length + UTF-8]
//! [Similarity: varint byte length + UTF-8 kind name, e.g. "dot_product"]
//! [Window Size: varint]
//! [Weight: f32 BE]
//! ```
//!
//! Varints are LEB128 u32. Floats are written as their IEEE-754 bit pattern,
//! so every component (NaN payloads included) decodes bit-identical.
//! Counts and lengths are checked against [`Limits`] before allocation.

use crate::config::RescoreConfig;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};
use strata_core::{Limits, RescoreError, RescoreResult, VectorSet};

// ============================================================================
// Encoding
// ============================================================================

/// Encode a config to bytes
pub fn encode_config(config: &RescoreConfig) -> RescoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_config(config, &mut buf)?;
    Ok(buf)
}

/// Write a config to a stream
pub fn write_config<W: Write>(config: &RescoreConfig, writer: &mut W) -> RescoreResult<()> {
    let vectors = config.query_vectors();
    write_len(writer, vectors.len())?;
    for vector in vectors {
        write_len(writer, vector.len())?;
        for &value in vector {
            writer.write_f32::<BigEndian>(value).map_err(io_error)?;
        }
    }
    write_string(writer, config.field())?;
    write_string(writer, config.similarity().name())?;
    write_len(writer, config.window_size())?;
    writer
        .write_f32::<BigEndian>(config.weight())
        .map_err(io_error)?;
    Ok(())
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a config from bytes using default limits
///
/// The whole slice must be consumed; trailing bytes are an error.
pub fn decode_config(bytes: &[u8]) -> RescoreResult<RescoreConfig> {
    decode_config_with_limits(bytes, &Limits::default())
}

/// Decode a config from bytes with explicit limits
pub fn decode_config_with_limits(bytes: &[u8], limits: &Limits) -> RescoreResult<RescoreConfig> {
    let mut cursor = Cursor::new(bytes);
    let config = read_config(&mut cursor, limits)?;
    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(RescoreError::Serialization(format!(
            "{} trailing bytes after rescore config",
            bytes.len() - consumed
        )));
    }
    Ok(config)
}

/// Read one config from a stream
///
/// The decoded values go through the same validation as a locally built
/// config, so a corrupt stream cannot produce an invalid config.
pub fn read_config<R: Read>(reader: &mut R, limits: &Limits) -> RescoreResult<RescoreConfig> {
    let count = read_len(reader)?;
    limits.validate_vector_count(count)?;

    let mut vectors = Vec::with_capacity(count);
    for _ in 0..count {
        let dim = read_len(reader)?;
        limits.validate_vector_dim(dim)?;
        let mut vector = vec![0.0f32; dim];
        reader
            .read_f32_into::<BigEndian>(&mut vector)
            .map_err(io_error)?;
        vectors.push(vector);
    }

    let field = read_string(reader, limits)?;
    let similarity = read_string(reader, limits)?;
    let window_size = read_len(reader)?;
    let weight = reader.read_f32::<BigEndian>().map_err(io_error)?;

    RescoreConfig::builder(VectorSet::new(vectors), field)
        .with_similarity_name(&similarity)
        .with_window_size(window_size)
        .with_weight(weight)
        .build()
}

// ============================================================================
// Varint (LEB128) Codec
// ============================================================================

/// Encode a u32 as a variable-length integer (LEB128).
pub(crate) fn encode_varint(mut value: u32, buf: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Read a varint from a stream.
pub(crate) fn read_varint<R: Read>(reader: &mut R) -> RescoreResult<u32> {
    let mut value: u32 = 0;
    let mut shift = 0;
    loop {
        let byte = reader.read_u8().map_err(io_error)?;
        if shift == 28 && byte & 0x70 != 0 {
            return Err(RescoreError::Serialization("varint overflow".to_string()));
        }
        value |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 35 {
            return Err(RescoreError::Serialization("varint overflow".to_string()));
        }
    }
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> RescoreResult<()> {
    let len = u32::try_from(len).map_err(|_| {
        RescoreError::Serialization(format!("length {} does not fit a varint", len))
    })?;
    let mut buf = Vec::with_capacity(5);
    encode_varint(len, &mut buf);
    writer.write_all(&buf).map_err(io_error)
}

fn read_len<R: Read>(reader: &mut R) -> RescoreResult<usize> {
    Ok(read_varint(reader)? as usize)
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> RescoreResult<()> {
    write_len(writer, s.len())?;
    writer.write_all(s.as_bytes()).map_err(io_error)
}

fn read_string<R: Read>(reader: &mut R, limits: &Limits) -> RescoreResult<String> {
    let len = read_len(reader)?;
    limits.validate_string_len(len)?;
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes).map_err(io_error)?;
    String::from_utf8(bytes).map_err(|e| RescoreError::Serialization(e.to_string()))
}

fn io_error(e: io::Error) -> RescoreError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        RescoreError::Serialization("truncated rescore config".to_string())
    } else {
        RescoreError::Io(e)
    }
}
