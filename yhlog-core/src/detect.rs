use serde::Serialize;

use crate::{
    YH550_HEADER_SIZE, YH550_RECORD_COUNT_OFFSET, YH550_RECORD_SIZE, YH550_SENTINEL,
    YH550_SENTINEL_OFFSET, YH580_BASE_OFFSET, YH580_MAX_SESSIONS, YH580_SESSION_COUNT_OFFSET,
};

/// Модель аппарата, записавшего файл
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceModel {
    /// Старое поколение: один плоский лог на файл
    Yh550,
    /// Новое поколение: таблица сессий
    Yh580,
}

impl DeviceModel {
    /// Определяет модель по началу файла и его длине.
    ///
    /// `prefix` — первые байты файла (достаточно [`YH550_HEADER_SIZE`]).
    /// Эвристика используется только если модель не указана явно.
    ///
    /// Байт 0xF9 по смещению 50 считается признаком YH-550 независимо от
    /// длины: обрыв записей или отрицательный счётчик сообщит декодер
    /// YH-550. Без контрольного байта файл остаётся YH-550, если его длина
    /// в точности равна `51 + 10 × record_count`. YH-580 требует полной
    /// области таблицы сессий и допустимого числа сессий в заголовке.
    pub fn detect(
        prefix: &[u8],
        file_len: u64,
    ) -> Option<Self> {
        if prefix.len() < YH550_HEADER_SIZE {
            return None;
        }

        if prefix[YH550_SENTINEL_OFFSET] == YH550_SENTINEL || has_yh550_size(prefix, file_len) {
            Some(DeviceModel::Yh550)
        } else if looks_like_yh580(prefix, file_len) {
            Some(DeviceModel::Yh580)
        } else {
            None
        }
    }
}

fn le_i16_at(
    prefix: &[u8],
    at: usize,
) -> i16 {
    i16::from_le_bytes([prefix[at], prefix[at + 1]])
}

fn has_yh550_size(
    prefix: &[u8],
    file_len: u64,
) -> bool {
    match u64::try_from(le_i16_at(prefix, YH550_RECORD_COUNT_OFFSET)) {
        Ok(count) => file_len == YH550_HEADER_SIZE as u64 + count * YH550_RECORD_SIZE as u64,
        Err(_) => false,
    }
}

fn looks_like_yh580(
    prefix: &[u8],
    file_len: u64,
) -> bool {
    if file_len < YH580_BASE_OFFSET {
        return false;
    }

    match usize::try_from(le_i16_at(prefix, YH580_SESSION_COUNT_OFFSET)) {
        Ok(count) => count <= YH580_MAX_SESSIONS,
        Err(_) => false,
    }
}

impl std::fmt::Display for DeviceModel {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            DeviceModel::Yh550 => write!(f, "YH-550"),
            DeviceModel::Yh580 => write!(f, "YH-580"),
        }
    }
}

impl std::str::FromStr for DeviceModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yh550" | "yh-550" | "550" => Ok(DeviceModel::Yh550),
            "yh580" | "yh-580" | "580" => Ok(DeviceModel::Yh580),
            _ => Err(format!("Unknown device model: '{s}'. Use: yh550, yh580")),
        }
    }
}
