pub mod tx;

/// A sink for serialized transaction data.
pub trait WriterBase {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self;
}

impl WriterBase for Vec<u8> {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        self.extend_from_slice(data.as_ref());
        self
    }
}

pub trait WriterExtensions {
    /// Writes a Bitcoin compact size integer
    fn write_compact_size(&mut self, value: u64) -> &mut Self;

    fn write_u32(&mut self, element: u32) -> &mut Self;

    fn write_u64(&mut self, element: u64) -> &mut Self;

    /// Writes the compact size of the byte length of the data followed by the data itself
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self;
}

impl<T: WriterBase> WriterExtensions for T {
    #[inline(always)]
    fn write_compact_size(&mut self, value: u64) -> &mut Self {
        match value {
            0..=0xfc => self.update([value as u8]),
            0xfd..=0xffff => self.update([0xfd]).update((value as u16).to_le_bytes()),
            0x10000..=0xffff_ffff => self.update([0xfe]).update((value as u32).to_le_bytes()),
            _ => self.update([0xff]).update(value.to_le_bytes()),
        }
    }

    #[inline(always)]
    fn write_u32(&mut self, element: u32) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_u64(&mut self, element: u64) -> &mut Self {
        self.update(element.to_le_bytes())
    }

    #[inline(always)]
    fn write_var_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_compact_size(bytes.len() as u64).update(bytes)
    }
}
