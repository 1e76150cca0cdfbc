//! Декодер логов YH-580.
//!
//! Файл состоит из заголовка фиксированного размера, таблицы сессий и
//! области блоков записей. Каждая запись таблицы содержит смещение своего
//! блока; блоки читаются после разбора всей таблицы переходом по смещению,
//! а не последовательно.
//!
//! Ошибки в заголовке и таблице сессий фатальны для файла. Ошибки внутри
//! блока записей ограничены своей сессией: блок без контрольного байта даёт
//! пустой лог, оборванный блок — лог из уже прочитанных записей.

use std::io::{Read, Seek};

use chrono::TimeDelta;
use log::{debug, warn};
use yhlog_types::{
    DeviceSerial, LogStatus, Tenths, TherapyMode, Violation, Yh580File, Yh580Header, Yh580LogLine,
    Yh580Session, Yh580Settings, YhError, YhResult,
};

use crate::{
    absolute_offset, OffsetReader, YH580_BASE_OFFSET, YH580_FILL_AFTER_SERIAL,
    YH580_FILL_BEFORE_TABLE, YH580_FILL_BYTE, YH580_HEADER_SIZE, YH580_LEAK_SENTINEL,
    YH580_MAX_SESSIONS, YH580_OPAQUE_BLOCK, YH580_RECORD_SIZE, YH580_RESERVED_AFTER_COUNT,
    YH580_RESERVED_AFTER_SETTINGS,
};

/// Декодирует файл YH-580 целиком.
pub fn decode<R: Read + Seek>(source: &mut R) -> YhResult<Yh580File> {
    let mut r = OffsetReader::new(source);

    let header = read_header(&mut r)?;
    debug!(
        "YH-580 header: serial={} sessions={}",
        header.device_serial, header.session_count
    );

    let mut sessions = Vec::with_capacity(header.session_count as usize);

    for index in 0..header.session_count {
        sessions.push(read_session(&mut r, index, YH580_BASE_OFFSET)?);
    }

    for session in &mut sessions {
        read_session_log(&mut r, session)?;
    }

    Ok(Yh580File { header, sessions })
}

fn read_header<R: Read>(r: &mut OffsetReader<R>) -> YhResult<Yh580Header> {
    let magic = r.read_array("magic")?;
    let settings = read_settings(r)?;
    r.skip(YH580_RESERVED_AFTER_SETTINGS, "reserved")?;

    let count_at = r.position();
    let session_count = r.read_i16_le("session_count")?;
    r.skip(YH580_RESERVED_AFTER_COUNT, "reserved")?;

    let device_serial = DeviceSerial::new(r.read_array("device_serial")?);
    read_fill(r, YH580_FILL_AFTER_SERIAL, "fill_after_serial")?;
    r.skip(YH580_OPAQUE_BLOCK, "opaque")?;
    read_fill(r, YH580_FILL_BEFORE_TABLE, "fill_before_table")?;
    debug_assert_eq!(r.position(), YH580_HEADER_SIZE);

    let session_count = u16::try_from(session_count).map_err(|_| {
        YhError::violation(
            count_at,
            Violation::NegativeCount {
                field: "session_count",
                count: session_count,
            },
        )
    })?;

    if session_count as usize > YH580_MAX_SESSIONS {
        return Err(YhError::violation(
            count_at,
            Violation::TableOverflow {
                count: session_count as usize,
                capacity: YH580_MAX_SESSIONS,
            },
        ));
    }

    Ok(Yh580Header {
        magic,
        settings,
        device_serial,
        session_count,
    })
}

// Отклонение от 0xFF не ошибка: смысл областей не подтверждён
fn read_fill<R: Read>(
    r: &mut OffsetReader<R>,
    len: usize,
    field: &'static str,
) -> YhResult<usize> {
    let at = r.position();
    let deviating = r.read_fill(len, YH580_FILL_BYTE, field)?;

    if deviating > 0 {
        debug!(
            "{field} at {at:#x}: {deviating} of {len} bytes differ from {YH580_FILL_BYTE:#04x}"
        );
    }

    Ok(deviating)
}

fn read_settings<R: Read>(r: &mut OffsetReader<R>) -> YhResult<Yh580Settings> {
    let [mode, ramp_time, initial, setting, maximum, minimum, humidity, fps_level] =
        r.read_array::<8>("settings")?;

    Ok(Yh580Settings {
        mode: TherapyMode::from_u8(mode),
        ramp_time,
        initial_pressure: Tenths::from_raw(initial),
        pressure_setting: setting,
        maximum_pressure: Tenths::from_raw(maximum),
        minimum_pressure: Tenths::from_raw(minimum),
        humidity,
        fps_level,
    })
}

fn read_session<R: Read>(
    r: &mut OffsetReader<R>,
    index: u16,
    base: u64,
) -> YhResult<Yh580Session> {
    let start = r.read_timestamp("session_start")?;
    let end = r.read_timestamp("session_end")?;
    let settings = read_settings(r)?;

    let [oai_count, hi_count] = r.read_array::<2>("event_counts")?;
    let event_bytes = r.read_array("event_bytes")?;
    let [average_pressure, average_leak_volume] = r.read_array::<2>("averages")?;
    let stored_offset = r.read_u16_be("offset")?;
    let u7 = r.read_u8("u7")?;
    let length = r.read_u8("length")?;

    let offset = absolute_offset(stored_offset, base);

    if u7 != 0 {
        warn!("session #{index} ({start}): u7 = {u7}, block offset {offset:#x}");
    }

    Ok(Yh580Session {
        start,
        end,
        settings,
        oai_count,
        hi_count,
        event_bytes,
        average_pressure: Tenths::from_raw(average_pressure),
        average_leak_volume: Tenths::from_raw(average_leak_volume),
        offset,
        u7,
        length,
        log_status: LogStatus::Empty,
        log_lines: Vec::new(),
    })
}

/// Читает блок записей сессии. Возвращает ошибку только при сбое
/// ввода/вывода; проблемы с данными блока отражаются в `log_status`.
fn read_session_log<R: Read + Seek>(
    r: &mut OffsetReader<R>,
    session: &mut Yh580Session,
) -> YhResult<()> {
    if session.length == 0 {
        session.log_status = LogStatus::Empty;
        return Ok(());
    }

    r.seek_to(session.offset)?;

    let declared = u16::from(session.length);
    let mut lines = Vec::with_capacity(declared as usize);
    let mut status = LogStatus::Complete;

    for minute in 0..declared {
        let raw = match r.read_array::<YH580_RECORD_SIZE>("session_log_line") {
            Ok(raw) => raw,
            Err(e) if e.is_truncated() => {
                status = LogStatus::Truncated {
                    decoded: minute,
                    declared,
                };
                break;
            }
            Err(e) => return Err(e),
        };

        let [leakage, pressure, spo2, oai, hi, pulse, cai] = raw;

        if minute == 0 && leakage != YH580_LEAK_SENTINEL {
            status = LogStatus::SentinelMismatch { found: leakage };
            break;
        }

        lines.push(Yh580LogLine {
            logged_time: session.start + TimeDelta::minutes(minute.into()),
            pressure: Tenths::from_raw(pressure),
            leakage: Tenths::from_raw(leakage),
            oai,
            hi,
            cai,
            spo2,
            pulse,
        });
    }

    match status {
        LogStatus::Complete | LogStatus::Empty => {
            debug!(
                "session {}: {} lines from {:?}",
                session.start,
                lines.len(),
                session.block_range()
            );
        }
        LogStatus::SentinelMismatch { found } => {
            warn!(
                "session {}: leakage sentinel {found} != {YH580_LEAK_SENTINEL} at {:#x}, log ignored",
                session.start, session.offset
            );
        }
        LogStatus::Truncated { decoded, declared } => {
            warn!(
                "session {}: block at {:#x} ends after {decoded} of {declared} minutes",
                session.start, session.offset
            );
        }
    }

    session.log_status = status;
    session.log_lines = lines;

    Ok(())
}
