use std::fmt;

use serde::{Serialize, Serializer};

/// Длина поля серийного номера в байтах
pub const SERIAL_LEN: usize = 16;

/// Серийный номер устройства.
///
/// Поле фиксированной длины; байты хранятся как есть, включая хвостовое
/// заполнение. Обрезка выполняется только при отображении.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceSerial([u8; SERIAL_LEN]);

impl DeviceSerial {
    pub const fn new(bytes: [u8; SERIAL_LEN]) -> Self {
        DeviceSerial(bytes)
    }

    /// Исходные 16 байт.
    pub fn as_bytes(&self) -> &[u8; SERIAL_LEN] {
        &self.0
    }

    /// Значимая часть без хвостового заполнения (`\0`, пробел, `0xFF`).
    pub fn trimmed(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|&b| !matches!(b, 0x00 | b' ' | 0xFF))
            .map_or(0, |i| i + 1);

        &self.0[..end]
    }
}

impl fmt::Display for DeviceSerial {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(&String::from_utf8_lossy(self.trimmed()))
    }
}

impl Serialize for DeviceSerial {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serial(s: &[u8]) -> DeviceSerial {
        let mut bytes = [0u8; SERIAL_LEN];
        bytes[..s.len()].copy_from_slice(s);
        DeviceSerial::new(bytes)
    }

    #[test]
    fn test_padding_preserved_but_trimmed_for_display() {
        let s = serial(b"YH550A1234");

        assert_eq!(s.as_bytes()[10..], [0u8; 6]);
        assert_eq!(s.trimmed(), b"YH550A1234");
        assert_eq!(s.to_string(), "YH550A1234");
    }

    #[test]
    fn test_all_padding_is_empty() {
        assert_eq!(DeviceSerial::new([0xFF; SERIAL_LEN]).to_string(), "");
    }
}
