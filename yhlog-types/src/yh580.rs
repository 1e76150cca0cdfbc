use std::ops::Range;

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::{DeviceSerial, Tenths, TherapyMode};

/// Размер поминутной записи YH-580 в байтах
pub const YH580_LOG_LINE_SIZE: u64 = 7;

/// Настройки терапии. Одинаковая раскладка используется в заголовке
/// устройства и в каждой записи таблицы сессий.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh580Settings {
    pub mode: TherapyMode,
    /// Время нарастания давления (мин)
    pub ramp_time: u8,
    pub initial_pressure: Tenths,
    /// Сырое значение настройки давления, единицы не установлены
    pub pressure_setting: u8,
    pub maximum_pressure: Tenths,
    pub minimum_pressure: Tenths,
    pub humidity: u8,
    pub fps_level: u8,
}

/// Заголовок файла YH-580
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh580Header {
    /// Первые 4 байта файла, значение не интерпретируется
    pub magic: [u8; 4],
    /// Настройки устройства
    pub settings: Yh580Settings,
    /// Серийный номер устройства
    pub device_serial: DeviceSerial,
    /// Количество записей в таблице сессий
    pub session_count: u16,
}

/// Как были получены поминутные записи сессии
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogStatus {
    /// Прочитаны все `length` записей
    Complete,
    /// Сессия объявлена с нулевой длиной
    Empty,
    /// Первый байт утечки не равен контрольному значению, блок не доверенный
    SentinelMismatch { found: u8 },
    /// Данные закончились раньше `length` записей
    Truncated { decoded: u16, declared: u16 },
}

/// Запись таблицы сессий YH-580 (30 байт) вместе с её поминутным логом
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh580Session {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Настройки на время сессии
    pub settings: Yh580Settings,
    /// Количество обструктивных апноэ
    pub oai_count: u8,
    /// Количество гипопноэ
    pub hi_count: u8,
    /// Два байта событий без подтверждённого назначения (возможно ЦАИ)
    pub event_bytes: [u8; 2],
    pub average_pressure: Tenths,
    pub average_leak_volume: Tenths,
    /// Абсолютное смещение блока записей в файле
    pub offset: u64,
    /// Назначение не установлено (возможно счётчик центральных апноэ)
    pub u7: u8,
    /// Объявленное количество минут
    pub length: u8,
    /// Результат чтения блока записей
    pub log_status: LogStatus,
    pub log_lines: Vec<Yh580LogLine>,
}

/// Поминутная запись YH-580 (7 байт)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh580LogLine {
    /// Время записи: начало сессии + номер минуты
    pub logged_time: NaiveDateTime,
    /// Давление (см вод. ст.)
    pub pressure: Tenths,
    /// Утечка (л/мин)
    pub leakage: Tenths,
    pub oai: u8,
    pub hi: u8,
    pub cai: u8,
    /// Сатурация кислорода, %
    pub spo2: u8,
    /// Пульс, уд/мин
    pub pulse: u8,
}

/// Декодированный файл YH-580
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh580File {
    pub header: Yh580Header,
    pub sessions: Vec<Yh580Session>,
}

impl Yh580Session {
    /// Диапазон байт блока записей согласно таблице сессий.
    pub fn block_range(&self) -> Range<u64> {
        self.offset..self.offset + u64::from(self.length) * YH580_LOG_LINE_SIZE
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// `true` если прочитаны все объявленные записи.
    pub fn is_complete(&self) -> bool {
        self.log_status == LogStatus::Complete
    }
}

impl Yh580File {
    /// Начало первой сессии.
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.sessions.iter().map(|s| s.start).min()
    }

    /// Окончание последней сессии.
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.sessions.iter().map(|s| s.end).max()
    }

    /// Сессии, для которых удалось прочитать хотя бы одну запись.
    pub fn populated_sessions(&self) -> impl Iterator<Item = &Yh580Session> {
        self.sessions.iter().filter(|s| !s.log_lines.is_empty())
    }
}
