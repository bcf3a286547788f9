/// The fixed width, in bytes, of the payload of a text value. Text
/// values are stored as a 4-byte length prefix followed by exactly
/// `TEXT_LEN` bytes, the unused tail being padding.
pub const TEXT_LEN: usize = 128;
