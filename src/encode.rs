// One-hot sequence encoding and fixed-length alignment
//
// Converts a nucleotide sequence plus its header metadata into a flat numeric
// feature vector and an expression label:
// - each base maps to a 4-entry one-hot code (all-zero for N)
// - negative-strand records are optionally reverse-complemented first
// - the flat vector is truncated or zero-padded to a fixed feature length
//
// The transform is pure and stateless; accumulation into a dataset is the
// caller's responsibility.

use crate::defaults;
use crate::record::{RecordMeta, Strand};
use thiserror::Error;

/// Entries per base in the one-hot code
pub const ONEHOT_WIDTH: usize = 4;

#[derive(Error, Debug)]
pub enum EncodeError {
    /// Header does not match the expected pipe-delimited shape
    #[error("malformed record '{id}': {reason}")]
    MalformedRecord { id: String, reason: String },

    /// Sequence symbol outside {A,C,G,T,N} (either case). All-zero codes are
    /// reserved for N and for padding, so unknown symbols are a hard failure.
    #[error("unknown symbol {symbol:?} at position {position} in record '{id}'")]
    UnknownSymbol {
        id: String,
        symbol: char,
        position: usize,
    },
}

/// Encoding options
///
/// Strand correction defaults to off: the data source's orientation is used
/// as-is unless the caller opts in to reverse-complement normalization.
#[derive(Debug, Clone)]
pub struct EncodeOpt {
    /// Output vector length in numeric entries (not bases)
    pub feature_len: usize,
    /// Reverse complement negative-strand records before encoding
    pub strand_correction: bool,
}

impl Default for EncodeOpt {
    fn default() -> Self {
        EncodeOpt {
            feature_len: defaults::FEATURE_LEN,
            strand_correction: false,
        }
    }
}

// Base to one-hot code, both cases accepted
// A -> 1000, C -> 0100, G -> 0010, T -> 0001, N -> 0000
#[inline(always)]
pub fn base_to_onehot(base: u8) -> Option<[f32; ONEHOT_WIDTH]> {
    match base {
        b'A' | b'a' => Some([1.0, 0.0, 0.0, 0.0]),
        b'C' | b'c' => Some([0.0, 1.0, 0.0, 0.0]),
        b'G' | b'g' => Some([0.0, 0.0, 1.0, 0.0]),
        b'T' | b't' => Some([0.0, 0.0, 0.0, 1.0]),
        b'N' | b'n' => Some([0.0, 0.0, 0.0, 0.0]),
        _ => None,
    }
}

// Watson-Crick complement, N stays N
#[inline(always)]
pub fn complement(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(b'T'),
        b'T' | b't' => Some(b'A'),
        b'C' | b'c' => Some(b'G'),
        b'G' | b'g' => Some(b'C'),
        b'N' | b'n' => Some(b'N'),
        _ => None,
    }
}

/// Encode one record into an aligned feature vector and its label.
///
/// `header` is the full pipe-delimited header line; `seq` the raw base
/// characters. The returned vector always has exactly `opt.feature_len`
/// entries: longer inputs keep only their flattened prefix (documented lossy
/// behavior, never an error), shorter inputs are zero-padded on the right.
///
/// Errors abort the record with no partial output: a malformed header or a
/// symbol outside the alphabet is propagated with the record id attached.
pub fn encode_record(
    header: &str,
    seq: &[u8],
    opt: &EncodeOpt,
) -> Result<(Vec<f32>, i32), EncodeError> {
    let meta = RecordMeta::parse(header)?;

    let flat = if opt.strand_correction && meta.strand == Strand::Reverse {
        let rc = reverse_complement(seq, &meta.id)?;
        flatten_onehot(&rc, &meta.id)?
    } else {
        flatten_onehot(seq, &meta.id)?
    };

    Ok((align_features(flat, opt.feature_len), meta.label))
}

/// Reverse complement a raw base sequence.
///
/// Reported positions refer to the input orientation.
pub fn reverse_complement(seq: &[u8], id: &str) -> Result<Vec<u8>, EncodeError> {
    seq.iter()
        .enumerate()
        .rev()
        .map(|(position, &base)| {
            complement(base).ok_or_else(|| EncodeError::UnknownSymbol {
                id: id.to_string(),
                symbol: base as char,
                position,
            })
        })
        .collect()
}

/// Concatenate per-base one-hot codes into one flat vector (4 entries per base)
pub fn flatten_onehot(seq: &[u8], id: &str) -> Result<Vec<f32>, EncodeError> {
    let mut flat = Vec::with_capacity(seq.len() * ONEHOT_WIDTH);
    for (position, &base) in seq.iter().enumerate() {
        let code = base_to_onehot(base).ok_or_else(|| EncodeError::UnknownSymbol {
            id: id.to_string(),
            symbol: base as char,
            position,
        })?;
        flat.extend_from_slice(&code);
    }
    Ok(flat)
}

/// Force a flat vector to exactly `feature_len` entries.
///
/// Truncation keeps the prefix and drops the tail; padding appends zeros.
/// This always succeeds, so oversized input is silently discarded past the
/// cutoff rather than rejected.
pub fn align_features(mut flat: Vec<f32>, feature_len: usize) -> Vec<f32> {
    flat.truncate(feature_len);
    flat.resize(feature_len, 0.0);
    flat
}

#[path = "encode_test.rs"]
mod encode_test;
