use std::fmt;

use serde::{Serialize, Serializer};

/// Точная величина с одним знаком после запятой.
///
/// Устройство хранит давление (см вод. ст.) и утечку одним байтом в десятых
/// долях единицы. Значение хранится как исходный байт, поэтому `10.0` и
/// `0.5` представлены точно, без погрешности двоичной плавающей точки.
/// Диапазон: `0.0..=25.5`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tenths(u8);

impl Tenths {
    pub const ZERO: Tenths = Tenths(0);
    pub const MAX: Tenths = Tenths(u8::MAX);

    /// Создаёт величину из сырого байта устройства (`raw / 10`).
    pub const fn from_raw(raw: u8) -> Self {
        Tenths(raw)
    }

    /// Исходный байт (количество десятых).
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Целая часть.
    pub const fn whole(self) -> u8 {
        self.0 / 10
    }

    /// Дробная часть (одна цифра, 0..=9).
    pub const fn fraction(self) -> u8 {
        self.0 % 10
    }

    /// Приближённое значение для графиков и статистики.
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl From<u8> for Tenths {
    fn from(raw: u8) -> Self {
        Tenths::from_raw(raw)
    }
}

impl fmt::Display for Tenths {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        // Выравнивание/ширина применяются к числу целиком
        f.pad(&format!("{}.{}", self.whole(), self.fraction()))
    }
}

impl Serialize for Tenths {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_exact_one_decimal() {
        assert_eq!(Tenths::from_raw(0).to_string(), "0.0");
        assert_eq!(Tenths::from_raw(5).to_string(), "0.5");
        assert_eq!(Tenths::from_raw(100).to_string(), "10.0");
        assert_eq!(Tenths::from_raw(249).to_string(), "24.9");
        assert_eq!(Tenths::MAX.to_string(), "25.5");
        assert_eq!(format!("{:>6}", Tenths::from_raw(42)), "   4.2");
    }

    #[test]
    fn test_round_trip_all_bytes() {
        for v in 0..=u8::MAX {
            let t = Tenths::from_raw(v);

            assert_eq!(t.raw(), v);
            assert_eq!((t.to_f64() * 10.0).round() as u8, v);
        }
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        assert!(Tenths::from_raw(99) < Tenths::from_raw(100));
        assert_eq!(Tenths::from(7), Tenths::from_raw(7));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&Tenths::from_raw(123)).unwrap();

        assert_eq!(json, "12.3");
    }
}
