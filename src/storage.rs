// ============================================================
// File: storage.rs
//
// Description:
//   Binary flat-file persistence for the customer index.
//
//   File layout: fixed-size records back-to-back, no header,
//   no footer, no checksum. Record size and field order come
//   entirely from the codec's schema, so the reader must use
//   the same schema the writer used.
//
// Goal:
// 1) `save_index` writes every record in ascending key order.
// 2) `load_index` reads fixed-size chunks until end-of-file and
//    replays each record as an insert.
// 3) The file path is always passed in by the caller.
// ============================================================
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::codec::RecordCodec;
use crate::error::{CodecError, Result};
use crate::record::CustomerRecord;
use crate::CustomerIndex;


/// Writes `records` to `path`, replacing any previous contents.
/// Returns the number of records written.
///
/// Every record is encoded before the file is touched, so a record that
/// does not fit the schema leaves the existing file intact.
pub fn write_records<'a, I>(path: &Path, codec: &RecordCodec, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    let mut blocks = Vec::new();
    for record in records {
        blocks.push(codec.encode(record)?);
    }

    // Truncate, we always write the full index
    let data_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(data_file);

    for block in &blocks {
        writer.write_all(block)?;
    }
    // Flushing will write data - reduces data loss
    writer.flush()?;

    debug!(path = %path.display(), count = blocks.len(), "records written");
    Ok(blocks.len())
}


/// Reads every fixed-size record from `path`, in file order.
///
/// A file whose size is not a multiple of the record width ends in a
/// partial chunk, reported as [`CodecError::WrongLength`].
pub fn read_records(path: &Path, codec: &RecordCodec) -> Result<Vec<CustomerRecord>> {
    let data_file = File::open(path)?;
    let mut reader = BufReader::new(data_file);

    let width = codec.record_width();
    let mut block = vec![0u8; width];
    let mut records = Vec::new();

    loop {
        let filled = read_chunk(&mut reader, &mut block)?;
        if filled == 0 {
            break;
        }
        if filled < width {
            return Err(CodecError::WrongLength { expected: width, actual: filled }.into());
        }
        records.push(codec.decode(&block)?);
    }

    debug!(path = %path.display(), count = records.len(), "records read");
    Ok(records)
}


/// Fills `buf` as far as the reader allows. Returns the byte count,
/// which is only short of `buf.len()` at end-of-file.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}


/// Persists the whole index to `path` in ascending key order.
pub fn save_index(path: &Path, codec: &RecordCodec, index: &CustomerIndex) -> Result<usize> {
    let count = write_records(path, codec, index.collect_all())?;
    info!(path = %path.display(), count, "index saved");
    Ok(count)
}


/// Replays every record stored at `path` into `index`, keyed by customer id.
/// Returns the number of records read.
pub fn load_index(path: &Path, codec: &RecordCodec, index: &mut CustomerIndex) -> Result<usize> {
    let records = read_records(path, codec)?;
    let count = records.len();

    for record in records {
        index.insert(record.customer_id.clone(), record);
    }

    info!(path = %path.display(), count, "index loaded");
    Ok(count)
}
