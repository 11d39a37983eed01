use crate::util::padding_len;
use crate::{BinWriter, PSUFile, PSUHeader, PSUTimestamp, FIXED_ENTRIES, HEADER_SIZE, PAGE_SIZE};
use byteorder::{WriteBytesExt, LE};
use std::io::{Cursor, Write};

static ZERO_PAGE: [u8; PAGE_SIZE as usize] = [0; PAGE_SIZE as usize];

impl PSUHeader {
    pub fn to_bytes(&self) -> std::io::Result<[u8; HEADER_SIZE]> {
        let mut data = [0u8; HEADER_SIZE];
        let mut c = Cursor::new(&mut data[..]);
        c.write_u16::<LE>(self.kind.id())?;
        c.write_u16::<LE>(0)?;
        c.write_u32::<LE>(self.size)?;
        c.write_all(&self.created.to_bytes())?;
        c.write_u64::<LE>(0)?; // Used by EMS, left empty
        c.write_all(&self.modified.to_bytes())?;
        c.write_all(&[0; 32])?;
        c.write_all(&self.name)?;
        // The remaining 416 bytes stay zero

        Ok(data)
    }
}

impl BinWriter for PSUHeader {
    fn write(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.to_bytes()?.to_vec())
    }
}

/// Lays out a PSU archive: the root directory, "." and "..", then every file
/// in the given order with its payload padded to a page.
pub struct PSUWriter<'a> {
    root_name: &'a str,
    files: &'a [PSUFile],
    timestamp: Option<PSUTimestamp>,
}

impl<'a> PSUWriter<'a> {
    pub fn new(root_name: &'a str, files: &'a [PSUFile]) -> Self {
        Self {
            root_name,
            files,
            timestamp: None,
        }
    }

    /// Fixes the time stamped on the root, "." and ".." entries. Without it
    /// the current time is taken when writing starts.
    pub fn with_timestamp(mut self, timestamp: impl Into<PSUTimestamp>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn entry_count(&self) -> u32 {
        FIXED_ENTRIES + self.files.len() as u32
    }

    /// Total number of bytes [`PSUWriter::write_to`] will emit.
    pub fn encoded_len(&self) -> u64 {
        let files: u64 = self
            .files
            .iter()
            .map(|f| (HEADER_SIZE + f.data.len() + padding_len(f.data.len())) as u64)
            .sum();
        FIXED_ENTRIES as u64 * HEADER_SIZE as u64 + files
    }

    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> std::io::Result<()> {
        let timestamp = self.timestamp.unwrap_or_else(PSUTimestamp::now);

        let root = PSUHeader::directory(self.root_name, self.entry_count(), timestamp);
        sink.write_all(&root.to_bytes()?)?;
        sink.write_all(&PSUHeader::directory(".", 0, timestamp).to_bytes()?)?;
        sink.write_all(&PSUHeader::directory("..", 0, timestamp).to_bytes()?)?;

        for file in self.files {
            write_file(sink, file)?;
        }

        Ok(())
    }
}

fn write_file<W: Write + ?Sized>(sink: &mut W, file: &PSUFile) -> std::io::Result<()> {
    sink.write_all(&PSUHeader::file(file).to_bytes()?)?;
    sink.write_all(&file.data)?;
    sink.write_all(&ZERO_PAGE[..padding_len(file.data.len())])
}

impl BinWriter for PSUWriter<'_> {
    fn write(&self) -> std::io::Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.encoded_len() as usize);
        self.write_to(&mut data)?;
        Ok(data)
    }
}

/// Writes `files` as a PSU archive rooted at `root_name`, stamping the
/// directory entries with the current time. Stops at the first failed write.
pub fn build_psu<W: Write + ?Sized>(
    sink: &mut W,
    root_name: &str,
    files: &[PSUFile],
) -> std::io::Result<()> {
    PSUWriter::new(root_name, files).write_to(sink)
}
