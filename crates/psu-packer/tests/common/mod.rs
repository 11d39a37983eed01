#![allow(dead_code)]

use psu_format::{PSUTimestamp, DIR_ID, FILE_ID, HEADER_SIZE, NAME_SIZE};

#[derive(Debug)]
pub struct Entry {
    pub id: u16,
    pub size: u32,
    pub created: [u8; 8],
    pub modified: [u8; 8],
    pub name: String,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        self.id == FILE_ID
    }

    pub fn has_times(&self, timestamp: impl Into<PSUTimestamp>) -> bool {
        let bytes = timestamp.into().to_bytes();
        self.created == bytes && self.modified == bytes
    }
}

/// Walks the headers of a packed archive, skipping over file payloads.
pub fn entries(data: &[u8]) -> Vec<Entry> {
    let mut result = vec![];
    let mut offset = 0;
    while offset < data.len() {
        let header = &data[offset..offset + HEADER_SIZE];
        let id = u16::from_le_bytes([header[0], header[1]]);
        assert!(id == DIR_ID || id == FILE_ID, "unknown entry id {id:#x}");
        let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let name = &header[64..64 + NAME_SIZE];
        let name_len = name.iter().position(|&b| b == 0).unwrap_or(NAME_SIZE);

        result.push(Entry {
            id,
            size,
            created: header[8..16].try_into().unwrap(),
            modified: header[24..32].try_into().unwrap(),
            name: String::from_utf8_lossy(&name[..name_len]).to_string(),
        });

        offset += HEADER_SIZE;
        if id == FILE_ID {
            offset += (size as usize).div_ceil(1024) * 1024;
        }
    }
    result
}
