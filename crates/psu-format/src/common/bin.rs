pub trait BinWriter {
    fn write(&self) -> std::io::Result<Vec<u8>>;
}
