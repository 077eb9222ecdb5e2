// FASTA reader module using bio::io::fasta
//
// Wraps bio::io::fasta with automatic compression handling:
// - plain text read directly
// - .gz files sniffed for BGZF (parallel decompression via noodles-bgzf)
//   with a single-threaded flate2 fallback for standard gzip

use bio::io::fasta;
use flate2::read::GzDecoder;
use noodles_bgzf as bgzf;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// BGZF is gzip with an extra-field subfield tagged 'BC'; sniff the first
/// 18 header bytes to tell it apart from standard gzip.
fn is_bgzf(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 18];
    if file.read(&mut header).unwrap_or(0) < header.len() {
        return Ok(false);
    }
    if header[0] != 0x1f || header[1] != 0x8b {
        return Ok(false); // not gzip
    }
    if header[3] & 0x04 == 0 {
        return Ok(false); // no extra field
    }
    Ok(header[12] == b'B' && header[13] == b'C')
}

/// FASTA reader with gzip/BGZF auto-detection
pub struct FastaReader {
    records: fasta::Records<BufReader<Box<dyn Read>>>,
}

impl FastaReader {
    /// Open a FASTA file (.fa, .fasta, optionally .gz compressed).
    pub fn new(path: &Path) -> io::Result<Self> {
        let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");

        let reader: Box<dyn Read> = if gzipped {
            if is_bgzf(path)? {
                log::debug!("{}: BGZF detected, using multithreaded reader", path.display());
                let bgzf_reader = bgzf::MultithreadedReader::new(File::open(path)?);
                Box::new(BufReader::with_capacity(BUFFER_SIZE, bgzf_reader))
            } else {
                log::debug!("{}: standard gzip, single-threaded decompression", path.display());
                Box::new(BufReader::with_capacity(BUFFER_SIZE, GzDecoder::new(File::open(path)?)))
            }
        } else {
            Box::new(BufReader::with_capacity(BUFFER_SIZE, File::open(path)?))
        };

        Ok(FastaReader {
            records: fasta::Reader::new(reader).records(),
        })
    }

    /// Read the next record; `Ok(None)` at EOF.
    pub fn read_record(&mut self) -> io::Result<Option<fasta::Record>> {
        match self.records.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Ok(None),
        }
    }

    /// Full header line for a record: id plus any whitespace-separated
    /// description, rejoined. The pipe-delimited metadata convention applies
    /// to this string, not just the id token.
    pub fn full_header(record: &fasta::Record) -> String {
        match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        }
    }
}
