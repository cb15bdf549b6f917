use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::MAX_THREADS;

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Render bytes for diagnostics: printable ASCII verbatim, anything else as hex.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

/// Number of logical cores, clamped into the engine's thread range.
pub fn detect_number_of_cores() -> usize {
    num_cpus::get().clamp(1, MAX_THREADS)
}
