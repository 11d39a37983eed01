use crate::{NAME_SIZE, PAGE_SIZE};

/// Copies at most [`NAME_SIZE`] bytes of `name` into a zero filled field.
/// A name of exactly [`NAME_SIZE`] bytes is stored without a terminator.
pub fn clip_name(name: &str) -> [u8; NAME_SIZE] {
    let mut field = [0; NAME_SIZE];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_SIZE);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

/// Zero bytes needed after a payload of `len` bytes to reach the next page
/// boundary. Payloads already on a boundary get none.
pub fn padding_len(len: usize) -> usize {
    let page = PAGE_SIZE as usize;
    (page - len % page) % page
}
