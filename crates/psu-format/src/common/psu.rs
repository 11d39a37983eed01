use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::util::clip_name;

pub const DIR_ID: u16 = 0x8427;
pub const FILE_ID: u16 = 0x8497;

pub const PAGE_SIZE: u32 = 0x400;
pub const HEADER_SIZE: usize = 0x200;
pub const NAME_SIZE: usize = 32;

/// Number of headers written before the first file: root, "." and "..".
pub const FIXED_ENTRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PSUEntryKind {
    Directory = DIR_ID,
    File = FILE_ID,
}

impl PSUEntryKind {
    pub const fn id(self) -> u16 {
        self as u16
    }
}

/// Date and time as stored in a PSU header, always in UTC.
///
/// Fields are narrowed with plain casts and never range checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PSUTimestamp {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl PSUTimestamp {
    pub fn from_datetime<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        let timestamp = timestamp.with_timezone(&Utc);
        Self {
            seconds: timestamp.second() as u8,
            minutes: timestamp.minute() as u8,
            hours: timestamp.hour() as u8,
            day: timestamp.day() as u8,
            month: timestamp.month() as u8,
            year: timestamp.year() as u16,
        }
    }

    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Wire form: a zero byte, seconds, minutes, hours, day, month and a
    /// little endian year.
    pub fn to_bytes(&self) -> [u8; 8] {
        let [year_lo, year_hi] = self.year.to_le_bytes();
        [
            0,
            self.seconds,
            self.minutes,
            self.hours,
            self.day,
            self.month,
            year_lo,
            year_hi,
        ]
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for PSUTimestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Self::from_datetime(&value)
    }
}

/// Naive values carry no zone and are taken as UTC.
impl From<NaiveDateTime> for PSUTimestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::from_datetime(&value.and_utc())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PSUHeader {
    pub kind: PSUEntryKind,
    /// Entry count for a directory, byte length for a file.
    pub size: u32,
    pub created: PSUTimestamp,
    pub modified: PSUTimestamp,
    pub name: [u8; NAME_SIZE],
}

impl PSUHeader {
    pub fn directory(name: &str, size: u32, timestamp: PSUTimestamp) -> Self {
        Self {
            kind: PSUEntryKind::Directory,
            size,
            created: timestamp,
            modified: timestamp,
            name: clip_name(name),
        }
    }

    pub fn file(file: &PSUFile) -> Self {
        Self {
            kind: PSUEntryKind::File,
            size: file.data.len() as u32,
            created: PSUTimestamp::from_datetime(&file.created),
            modified: PSUTimestamp::from_datetime(&file.modified),
            name: clip_name(&file.name),
        }
    }
}

/// A file to embed in the archive. Names longer than [`NAME_SIZE`] bytes are
/// clipped when the header is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PSUFile {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub data: Vec<u8>,
}

impl PSUFile {
    pub fn new<Tz: TimeZone>(
        name: impl Into<String>,
        created: DateTime<Tz>,
        modified: DateTime<Tz>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            created: created.with_timezone(&Utc),
            modified: modified.with_timezone(&Utc),
            data,
        }
    }
}
