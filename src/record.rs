// Record header metadata parsing
//
// FASTA headers carry metadata as pipe-delimited fields:
//   id|label|<extra>|strand[|...]
// Field 1 is the integer expression label, field 3 the strand (`+` or `-`).
// This layout is a data-source convention, not part of the FASTA format.

use crate::encode::EncodeError;

/// Strand a sequence was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// Metadata parsed from a record header
#[derive(Debug, Clone)]
pub struct RecordMeta {
    /// Record identifier (field 0 of the header)
    pub id: String,
    /// Expression label, taken verbatim from field 1 (any integer is accepted)
    pub label: i32,
    /// Strand indicator from field 3; anything other than `-` is forward
    pub strand: Strand,
}

impl RecordMeta {
    /// Parse metadata from a pipe-delimited header.
    ///
    /// Fails with `MalformedRecord` if the header has fewer than 4 fields or
    /// the label field does not parse as an integer. The label is never
    /// defaulted on error.
    pub fn parse(header: &str) -> Result<Self, EncodeError> {
        let fields: Vec<&str> = header.split('|').collect();
        let id = fields[0].to_string();

        if fields.len() < 4 {
            return Err(EncodeError::MalformedRecord {
                id,
                reason: format!(
                    "expected at least 4 pipe-delimited header fields, found {}",
                    fields.len()
                ),
            });
        }

        let label = match fields[1].trim().parse::<i32>() {
            Ok(label) => label,
            Err(_) => {
                return Err(EncodeError::MalformedRecord {
                    id,
                    reason: format!("label field {:?} is not an integer", fields[1]),
                });
            }
        };

        let strand = if fields[3].trim() == "-" {
            Strand::Reverse
        } else {
            Strand::Forward
        };

        Ok(RecordMeta { id, label, strand })
    }
}

#[path = "record_test.rs"]
mod record_test;
