use std::fmt;
use num_enum::TryFromPrimitive;

/// Variant name for known registry values, `0x..` otherwise.
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

/// Printable bytes as `b"..."`, anything else as lowercase hex.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

/// Render an optional field the way the item dump shows it.
pub fn fmt_optional<T: fmt::Display>(value: Option<&T>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => "(null)".to_string(),
    }
}
