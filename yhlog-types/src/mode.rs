use serde::Serialize;

/// Режим терапии
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TherapyMode {
    /// Постоянное давление
    Cpap,
    /// Автоматический подбор давления
    Apap,
    /// Значение, не встречавшееся в наблюдаемых файлах
    Unknown(u8),
}

impl TherapyMode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => TherapyMode::Cpap,
            1 => TherapyMode::Apap,
            other => TherapyMode::Unknown(other),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            TherapyMode::Cpap => 0,
            TherapyMode::Apap => 1,
            TherapyMode::Unknown(v) => *v,
        }
    }
}

impl std::fmt::Display for TherapyMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TherapyMode::Cpap => write!(f, "CPAP"),
            TherapyMode::Apap => write!(f, "APAP"),
            TherapyMode::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}
