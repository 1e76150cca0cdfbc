use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::{DeviceSerial, Tenths, TherapyMode};

/// Заголовок файла YH-550 (фиксированный размер 51 байт)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh550Header {
    /// Начало ночи
    pub start: NaiveDateTime,
    /// Окончание ночи
    pub end: NaiveDateTime,
    /// Режим терапии
    pub mode: TherapyMode,
    /// Время плавного нарастания давления (мин)
    pub ramp_time: u8,
    /// Стартовое давление (см вод. ст.)
    pub initial_pressure: Tenths,
    /// Минимальное давление (см вод. ст.)
    pub minimum_pressure: Tenths,
    /// Максимальное давление (см вод. ст.)
    pub maximum_pressure: Tenths,
    /// Уровень увлажнения
    pub humidity: u8,
    /// Средняя утечка (л/мин)
    pub average_leak_volume: Tenths,
    /// Среднее давление (см вод. ст.)
    pub average_pressure: Tenths,
    /// Серийный номер устройства
    pub device_serial: DeviceSerial,
    /// Количество поминутных записей
    pub record_count: u16,
}

/// Поминутная запись YH-550 (10 байт)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh550LogLine {
    /// Время записи: начало ночи + номер минуты
    pub logged_time: NaiveDateTime,
    /// Давление (см вод. ст.)
    pub pressure: Tenths,
    /// Утечка (л/мин)
    pub leakage: Tenths,
    /// Индекс обструктивных апноэ
    pub oai: u8,
    /// Индекс гипопноэ
    pub hi: u8,
    /// Индекс центральных апноэ
    pub cai: u8,
    /// Назначение не установлено (предположительно SpO2 или пульс).
    /// Во всех известных файлах равно нулю.
    pub u6: u8,
}

/// Декодированный файл YH-550
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Yh550File {
    pub header: Yh550Header,
    pub logs: Vec<Yh550LogLine>,
}

impl Yh550File {
    /// Длительность ночи по заголовку.
    pub fn duration(&self) -> TimeDelta {
        self.header.end - self.header.start
    }

    /// Записи с ненулевым `u6`.
    pub fn anomalies(&self) -> impl Iterator<Item = &Yh550LogLine> {
        self.logs.iter().filter(|l| l.u6 != 0)
    }
}
