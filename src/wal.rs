use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Encode a single record to [len][bincode][crc32] format.
fn encode_record<E: Serialize>(writer: &mut impl Write, record: &E) -> io::Result<()> {
    let payload =
        bincode::serialize(record).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let len = payload.len() as u32;
    let crc = crc32fast::hash(&payload);
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&payload)?;
    writer.write_all(&crc.to_le_bytes())?;
    Ok(())
}

/// Append-only log of store events, one fsync per record.
///
/// Entry layout: `[u32 len][bincode payload][u32 crc32]`, where `len` counts
/// payload bytes only. A torn or corrupt tail is dropped on replay. The file
/// carries no type tag; callers choose the record type when appending and
/// replaying.
pub struct Wal {
    writer: BufWriter<File>,
    path: PathBuf,
    appends_since_compact: u64,
}

impl Wal {
    /// Open (or create) the WAL file at `path`.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            appends_since_compact: 0,
        })
    }

    /// Append one record and fsync before returning.
    pub fn append<E: Serialize>(&mut self, record: &E) -> io::Result<()> {
        encode_record(&mut self.writer, record)?;
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        self.appends_since_compact += 1;
        Ok(())
    }

    /// Replace the log with `records`: they are written and synced to a
    /// sibling temp file, which is then renamed over the log.
    pub fn compact<E: Serialize>(&mut self, records: &[E]) -> io::Result<()> {
        let tmp_path = self.path.with_extension("wal.tmp");
        let mut tmp = BufWriter::new(File::create(&tmp_path)?);
        for record in records {
            encode_record(&mut tmp, record)?;
        }
        tmp.flush()?;
        tmp.get_ref().sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(file);
        self.appends_since_compact = 0;
        Ok(())
    }

    pub fn appends_since_compact(&self) -> u64 {
        self.appends_since_compact
    }

    /// Replay the WAL from disk, returning all valid records.
    /// Truncated/corrupt trailing entries are silently discarded.
    pub fn replay<E: DeserializeOwned>(path: &Path) -> io::Result<Vec<E>> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut reader = BufReader::new(file);
        let mut records = Vec::new();

        loop {
            let mut len_buf = [0u8; 4];
            match reader.read_exact(&mut len_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
            let len = u32::from_le_bytes(len_buf) as usize;

            let mut payload = vec![0u8; len];
            match reader.read_exact(&mut payload) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break, // truncated
                Err(e) => return Err(e),
            }

            let mut crc_buf = [0u8; 4];
            match reader.read_exact(&mut crc_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break, // truncated
                Err(e) => return Err(e),
            }
            let stored_crc = u32::from_le_bytes(crc_buf);
            if stored_crc != crc32fast::hash(&payload) {
                break;
            }

            match bincode::deserialize::<E>(&payload) {
                Ok(record) => records.push(record),
                Err(_) => break, // corrupt payload
            }
        }

        Ok(records)
    }
}
