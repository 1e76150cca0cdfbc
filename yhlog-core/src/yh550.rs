//! Декодер логов YH-550: один заголовок и за ним `record_count` поминутных
//! записей подряд.

use std::io::Read;

use chrono::TimeDelta;
use log::{debug, warn};
use yhlog_types::{
    DeviceSerial, Tenths, TherapyMode, Violation, Yh550File, Yh550Header, Yh550LogLine, YhError,
    YhResult,
};

use crate::{
    OffsetReader, YH550_RECORD_SIZE, YH550_RESERVED_AFTER_AVG_PRESSURE,
    YH550_RESERVED_AFTER_COUNT, YH550_RESERVED_AFTER_HUMIDITY, YH550_RESERVED_AFTER_LEAK,
    YH550_RESERVED_AFTER_PRESSURES, YH550_SENTINEL,
};

/// Декодирует файл YH-550 целиком.
///
/// Любое нарушение разметки (контрольный байт, ненулевые резервные байты
/// записи, некорректная дата, обрыв данных) прерывает декодирование без
/// частичного результата.
pub fn decode<R: Read>(source: &mut R) -> YhResult<Yh550File> {
    let mut r = OffsetReader::new(source);

    let header = read_header(&mut r)?;
    debug!(
        "YH-550 header: serial={} start={} records={}",
        header.device_serial, header.start, header.record_count
    );

    let mut logs = Vec::with_capacity(header.record_count as usize);

    for minute in 0..header.record_count {
        logs.push(read_log_line(&mut r, &header, minute)?);
    }

    Ok(Yh550File { header, logs })
}

fn read_header<R: Read>(r: &mut OffsetReader<R>) -> YhResult<Yh550Header> {
    let start = r.read_timestamp("start")?;
    let end = r.read_timestamp("end")?;

    let mode = TherapyMode::from_u8(r.read_u8("mode")?);
    let ramp_time = r.read_u8("ramp_time")?;
    let initial_pressure = Tenths::from_raw(r.read_u8("initial_pressure")?);
    let minimum_pressure = Tenths::from_raw(r.read_u8("minimum_pressure")?);
    let maximum_pressure = Tenths::from_raw(r.read_u8("maximum_pressure")?);
    r.skip(YH550_RESERVED_AFTER_PRESSURES, "reserved")?;

    let humidity = r.read_u8("humidity")?;
    r.skip(YH550_RESERVED_AFTER_HUMIDITY, "reserved")?;

    let average_leak_volume = Tenths::from_raw(r.read_u8("average_leak_volume")?);
    r.skip(YH550_RESERVED_AFTER_LEAK, "reserved")?;

    let average_pressure = Tenths::from_raw(r.read_u8("average_pressure")?);
    r.skip(YH550_RESERVED_AFTER_AVG_PRESSURE, "reserved")?;

    let device_serial = DeviceSerial::new(r.read_array("device_serial")?);

    let count_at = r.position();
    let record_count = r.read_i16_le("record_count")?;
    r.skip(YH550_RESERVED_AFTER_COUNT, "reserved")?;

    let sentinel_at = r.position();
    let sentinel = r.read_u8("sentinel")?;
    if sentinel != YH550_SENTINEL {
        return Err(YhError::violation(
            sentinel_at,
            Violation::SentinelMismatch {
                expected: YH550_SENTINEL,
                found: sentinel,
            },
        ));
    }

    let record_count = u16::try_from(record_count).map_err(|_| {
        YhError::violation(
            count_at,
            Violation::NegativeCount {
                field: "record_count",
                count: record_count,
            },
        )
    })?;

    Ok(Yh550Header {
        start,
        end,
        mode,
        ramp_time,
        initial_pressure,
        minimum_pressure,
        maximum_pressure,
        humidity,
        average_leak_volume,
        average_pressure,
        device_serial,
        record_count,
    })
}

fn read_log_line<R: Read>(
    r: &mut OffsetReader<R>,
    header: &Yh550Header,
    minute: u16,
) -> YhResult<Yh550LogLine> {
    let at = r.position();
    let [pressure, r1, r2, oai, hi, cai, u6, r7, r8, leakage] =
        r.read_array::<YH550_RECORD_SIZE>("log_line")?;

    let logged_time = header.start + TimeDelta::minutes(minute.into());

    if u6 != 0 {
        warn!(
            "u6 = {u6} at offset {at:#x} ({logged_time}); reserved [{r1}, {r2}, {r7}, {r8}], \
             pressure={pressure} oai={oai} hi={hi} cai={cai} leakage={leakage}"
        );
    }

    if [r1, r2, r7, r8].iter().any(|&b| b != 0) {
        return Err(YhError::violation(
            at,
            Violation::ReservedNonZero {
                field: "log_line",
                bytes: vec![r1, r2, r7, r8],
            },
        ));
    }

    Ok(Yh550LogLine {
        logged_time,
        pressure: Tenths::from_raw(pressure),
        leakage: Tenths::from_raw(leakage),
        oai,
        hi,
        cai,
        u6,
    })
}
