//! Разметка бинарных файлов Yuwell YH-550 и YH-580.
//!
//! Формат не документирован производителем и восстановлен по дампам
//! реальных устройств. Все неизвестные области описаны явно: либо их
//! содержимое проверяется (нули, контрольный байт), либо они пропускаются
//! фиксированным числом байт.
//!
//! Однобайтовые поля беззнаковые. Счётчики записей в заголовках хранятся
//! как `i16` little-endian, смещения в таблице сессий YH-580 — `u16`
//! big-endian.

use yhlog_types::{SERIAL_LEN, YH580_LOG_LINE_SIZE};

/// Базовый год для однобайтового поля года.
pub const EPOCH_YEAR: i32 = 2000;

/// Размер метки времени: год, месяц, день, час, минута, секунда.
pub const TIMESTAMP_SIZE: usize = 6;

////////////////////////////////////////////////////////////////////////////////
// YH-550
////////////////////////////////////////////////////////////////////////////////

/// Заголовок YH-550.
///
/// ```text
/// [0..6]    START         6×u8
/// [6..12]   END           6×u8
/// [12]      MODE          u8    0 = CPAP, 1 = APAP
/// [13]      RAMP          u8    минуты
/// [14..17]  INIT/MIN/MAX  3×u8  десятые см вод. ст.
/// [17]      reserved      1
/// [18]      HUMIDITY      u8
/// [19..26]  reserved      7
/// [26]      AVG_LEAK      u8
/// [27]      reserved      1
/// [28]      AVG_PRESSURE  u8
/// [29]      reserved      1
/// [30..46]  SERIAL        16 байт
/// [46..48]  RECORD_COUNT  i16 LE
/// [48..50]  reserved      2
/// [50]      SENTINEL      u8    всегда 0xF9
/// ```
pub const YH550_HEADER_SIZE: usize = 51;

/// Смещение контрольного байта заголовка YH-550.
pub const YH550_SENTINEL_OFFSET: usize = 50;

/// Ожидаемое значение контрольного байта заголовка YH-550.
pub const YH550_SENTINEL: u8 = 0xF9;

/// Поминутная запись YH-550.
///
/// ```text
/// [0] PRESSURE  [1] r1  [2] r2  [3] OAI  [4] HI  [5] CAI
/// [6] U6        [7] r7  [8] r8  [9] LEAKAGE
/// ```
///
/// `r1`, `r2`, `r7`, `r8` во всех известных файлах равны нулю.
pub const YH550_RECORD_SIZE: usize = 10;

/// Смещение счётчика записей в заголовке YH-550.
pub const YH550_RECORD_COUNT_OFFSET: usize = 30 + SERIAL_LEN;

// Пропуски заголовка YH-550 в порядке следования
pub const YH550_RESERVED_AFTER_PRESSURES: usize = 1;
pub const YH550_RESERVED_AFTER_HUMIDITY: usize = 7;
pub const YH550_RESERVED_AFTER_LEAK: usize = 1;
pub const YH550_RESERVED_AFTER_AVG_PRESSURE: usize = 1;
pub const YH550_RESERVED_AFTER_COUNT: usize = 2;

////////////////////////////////////////////////////////////////////////////////
// YH-580
////////////////////////////////////////////////////////////////////////////////

/// Заголовок YH-580.
///
/// ```text
/// [0..4]      MAGIC          4 байта
/// [4..12]     SETTINGS       8×u8
/// [12..31]    reserved       19
/// [31..33]    SESSION_COUNT  i16 LE
/// [33..132]   reserved       99
/// [132..148]  SERIAL         16 байт
/// [148..292]  fill 0xFF      144
/// [292..304]  opaque         12
/// [304..3072] fill 0xFF      2768
/// ```
pub const YH580_HEADER_SIZE: u64 = 3072;

pub const YH580_MAGIC_SIZE: usize = 4;

/// Смещение счётчика сессий в заголовке YH-580.
pub const YH580_SESSION_COUNT_OFFSET: usize = YH580_MAGIC_SIZE + 8 + YH580_RESERVED_AFTER_SETTINGS;

// Пропуски заголовка YH-580 в порядке следования
pub const YH580_RESERVED_AFTER_SETTINGS: usize = 19;
pub const YH580_RESERVED_AFTER_COUNT: usize = 99;
pub const YH580_FILL_AFTER_SERIAL: usize = 144;
pub const YH580_OPAQUE_BLOCK: usize = 12;
pub const YH580_FILL_BEFORE_TABLE: usize = 2768;

/// Ожидаемое значение байт областей заполнения заголовка YH-580.
pub const YH580_FILL_BYTE: u8 = 0xFF;

/// Запись таблицы сессий.
///
/// ```text
/// [0..6]    START         6×u8
/// [6..12]   END           6×u8
/// [12..20]  SETTINGS      8×u8
/// [20]      OAI_COUNT     [21] HI_COUNT
/// [22..24]  EVENTS        2 байта без расшифровки
/// [24]      AVG_PRESSURE  [25] AVG_LEAK
/// [26..28]  OFFSET        u16 BE, относительно YH580_BASE_OFFSET
/// [28]      U7            [29] LENGTH (минуты)
/// ```
pub const YH580_SESSION_SIZE: u64 = 30;

/// Область файла, отведённая под таблицу сессий.
pub const YH580_TABLE_REGION_SIZE: u64 = 27_136;

/// Начало области блоков записей: смещения из таблицы сессий отсчитываются
/// от этой точки.
pub const YH580_BASE_OFFSET: u64 = YH580_HEADER_SIZE + YH580_TABLE_REGION_SIZE;

/// Максимальное число записей, помещающихся в таблицу сессий.
pub const YH580_MAX_SESSIONS: usize = (YH580_TABLE_REGION_SIZE / YH580_SESSION_SIZE) as usize;

/// Поминутная запись YH-580.
///
/// ```text
/// [0] LEAKAGE  [1] PRESSURE  [2] SPO2  [3] OAI  [4] HI  [5] PULSE  [6] CAI
/// ```
pub const YH580_RECORD_SIZE: usize = YH580_LOG_LINE_SIZE as usize;

/// Первая запись доверенного блока содержит это значение в байте утечки.
pub const YH580_LEAK_SENTINEL: u8 = 249;

/// Абсолютное смещение блока записей сессии.
pub const fn absolute_offset(
    stored: u16,
    base: u64,
) -> u64 {
    stored as u64 + base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yh550_header_layout_sums() {
        let size = 2 * TIMESTAMP_SIZE
            + 5
            + YH550_RESERVED_AFTER_PRESSURES
            + 1
            + YH550_RESERVED_AFTER_HUMIDITY
            + 1
            + YH550_RESERVED_AFTER_LEAK
            + 1
            + YH550_RESERVED_AFTER_AVG_PRESSURE
            + SERIAL_LEN
            + 2
            + YH550_RESERVED_AFTER_COUNT
            + 1;

        assert_eq!(size, YH550_HEADER_SIZE);
        assert_eq!(YH550_RECORD_COUNT_OFFSET, 46);
        assert_eq!(YH550_SENTINEL_OFFSET, YH550_HEADER_SIZE - 1);
    }

    #[test]
    fn test_yh580_header_layout_sums() {
        let size = YH580_MAGIC_SIZE
            + 8
            + YH580_RESERVED_AFTER_SETTINGS
            + 2
            + YH580_RESERVED_AFTER_COUNT
            + SERIAL_LEN
            + YH580_FILL_AFTER_SERIAL
            + YH580_OPAQUE_BLOCK
            + YH580_FILL_BEFORE_TABLE;

        assert_eq!(size as u64, YH580_HEADER_SIZE);
        assert_eq!(YH580_SESSION_COUNT_OFFSET, 31);
    }

    #[test]
    fn test_base_offset_derivation() {
        assert_eq!(YH580_BASE_OFFSET, 30_208);
        assert_eq!(YH580_MAX_SESSIONS, 904);
    }

    #[test]
    fn test_absolute_offset_shifts_with_base() {
        let stored = [0u16, 7, 420, u16::MAX];

        for base in [0u64, YH580_BASE_OFFSET, YH580_BASE_OFFSET + 100] {
            for s in stored {
                assert_eq!(absolute_offset(s, base), s as u64 + base);
                assert_eq!(
                    absolute_offset(s, base + 13) - absolute_offset(s, base),
                    13
                );
            }
        }
    }
}
