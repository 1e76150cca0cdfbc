use thiserror::Error;

/// Результат для операций декодирования.
pub type YhResult<T> = std::result::Result<T, YhError>;

/// Ошибки декодирования логов YH-550 / YH-580.
#[derive(Debug, Error)]
pub enum YhError {
    /// Нарушение структуры бинарного формата
    #[error("Format violation at offset {offset:#06x}: {violation}")]
    FormatViolation { offset: u64, violation: Violation },

    /// Ошибки ввода/вывода, не связанные с форматом (автоконвертируются из
    /// std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Причина нарушения формата.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Контрольный байт не совпал с ожидаемым
    #[error("sentinel mismatch: expected {expected:#04x}, found {found:#04x}")]
    SentinelMismatch { expected: u8, found: u8 },

    /// В зарезервированных полях записи найдены ненулевые данные
    #[error("reserved bytes {bytes:?} in {field} must be zero")]
    ReservedNonZero { field: &'static str, bytes: Vec<u8> },

    /// Поля времени не образуют корректную календарную дату
    #[error(
        "invalid timestamp {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
    )]
    InvalidTimestamp {
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    },

    /// Счётчик записей отрицательный
    #[error("negative {field}: {count}")]
    NegativeCount { field: &'static str, count: i16 },

    /// Таблица сессий не помещается в отведённую область
    #[error("session table holds {count} entries, capacity is {capacity}")]
    TableOverflow { count: usize, capacity: usize },

    /// Данные закончились раньше, чем требует разметка
    #[error("unexpected end of data while reading {field}")]
    Truncated { field: &'static str },

    /// Файл не похож ни на YH-550, ни на YH-580
    #[error("unrecognized layout ({len} bytes)")]
    UnknownLayout { len: u64 },
}

impl YhError {
    /// Удобный конструктор
    pub fn violation(
        offset: u64,
        violation: Violation,
    ) -> Self {
        Self::FormatViolation { offset, violation }
    }

    /// Смещение в файле, если ошибка связана с форматом.
    pub fn offset(&self) -> Option<u64> {
        match self {
            YhError::FormatViolation { offset, .. } => Some(*offset),
            YhError::Io(_) => None,
        }
    }

    /// `true` если файл оборвался раньше, чем ожидалось.
    pub fn is_truncated(&self) -> bool {
        matches!(
            self,
            YhError::FormatViolation {
                violation: Violation::Truncated { .. },
                ..
            }
        )
    }
}
