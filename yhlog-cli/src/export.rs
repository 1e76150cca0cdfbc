use std::io::Write;

use yhlog_core::DecodedFile;

use crate::{report::minute_rows, CliResult};

/// Заголовок CSV. Пустые `spo2`/`pulse` означают, что модель их не пишет.
pub const CSV_HEADER: &str = "session,timestamp,pressure,leakage,oai,hi,cai,spo2,pulse";

/// Пишет декодированное дерево как JSON.
pub fn write_json<W: Write>(
    out: &mut W,
    decoded: &DecodedFile,
) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, decoded)?;
    writeln!(out)?;

    Ok(())
}

/// Пишет одну строку CSV на каждую минуту.
pub fn write_csv<W: Write>(
    out: &mut W,
    decoded: &DecodedFile,
    with_header: bool,
) -> CliResult<()> {
    if with_header {
        writeln!(out, "{CSV_HEADER}")?;
    }

    for row in minute_rows(decoded) {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            row.session,
            row.logged_time.format("%Y-%m-%dT%H:%M:%S"),
            row.pressure,
            row.leakage,
            row.oai,
            row.hi,
            row.cai,
            optional(row.spo2),
            optional(row.pulse),
        )?;
    }

    Ok(())
}

fn optional(v: Option<u8>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use yhlog_core::{
        DeviceSerial, LogStatus, Tenths, TherapyMode, Yh550File, Yh550Header, Yh550LogLine,
        Yh580File, Yh580Header, Yh580LogLine, Yh580Session, Yh580Settings,
    };

    use super::*;

    fn yh550_file() -> DecodedFile {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();

        let logs = (0..2)
            .map(|m| Yh550LogLine {
                logged_time: start + chrono::TimeDelta::minutes(m),
                pressure: Tenths::from_raw(100),
                leakage: Tenths::from_raw(5),
                oai: m as u8,
                hi: 0,
                cai: 0,
                u6: 0,
            })
            .collect();

        DecodedFile::Yh550(Yh550File {
            header: Yh550Header {
                start,
                end: start + chrono::TimeDelta::minutes(2),
                mode: TherapyMode::Cpap,
                ramp_time: 0,
                initial_pressure: Tenths::from_raw(40),
                minimum_pressure: Tenths::from_raw(40),
                maximum_pressure: Tenths::from_raw(120),
                humidity: 0,
                average_leak_volume: Tenths::from_raw(5),
                average_pressure: Tenths::from_raw(100),
                device_serial: DeviceSerial::new(*b"SN1\0\0\0\0\0\0\0\0\0\0\0\0\0"),
                record_count: 2,
            },
            logs,
        })
    }

    fn yh580_file() -> DecodedFile {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(1, 15, 0)
            .unwrap();
        let settings = Yh580Settings {
            mode: TherapyMode::Apap,
            ramp_time: 15,
            initial_pressure: Tenths::from_raw(40),
            pressure_setting: 0,
            maximum_pressure: Tenths::from_raw(200),
            minimum_pressure: Tenths::from_raw(40),
            humidity: 3,
            fps_level: 2,
        };

        DecodedFile::Yh580(Yh580File {
            header: Yh580Header {
                magic: [0; 4],
                settings: settings.clone(),
                device_serial: DeviceSerial::new([b'0'; 16]),
                session_count: 1,
            },
            sessions: vec![Yh580Session {
                start,
                end: start + chrono::TimeDelta::minutes(1),
                settings,
                oai_count: 0,
                hi_count: 0,
                event_bytes: [0; 2],
                average_pressure: Tenths::from_raw(90),
                average_leak_volume: Tenths::from_raw(25),
                offset: 30_208,
                u7: 0,
                length: 1,
                log_status: LogStatus::Complete,
                log_lines: vec![Yh580LogLine {
                    logged_time: start,
                    pressure: Tenths::from_raw(90),
                    leakage: Tenths::from_raw(249),
                    oai: 0,
                    hi: 1,
                    cai: 0,
                    spo2: 96,
                    pulse: 58,
                }],
            }],
        })
    }

    #[test]
    fn test_csv_yh550_rows() {
        let mut out = Vec::new();
        write_csv(&mut out, &yh550_file(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,2024-01-02T22:00:00,10.0,0.5,0,0,0,,");
        assert_eq!(lines[2], "0,2024-01-02T22:01:00,10.0,0.5,1,0,0,,");
    }

    #[test]
    fn test_csv_yh580_has_spo2_and_pulse() {
        let mut out = Vec::new();
        write_csv(&mut out, &yh580_file(), false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "0,2024-03-04T01:15:00,9.0,24.9,0,1,0,96,58\n");
    }

    #[test]
    fn test_json_is_tagged_by_model() {
        let mut out = Vec::new();
        write_json(&mut out, &yh580_file()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["model"], "yh580");
        assert_eq!(value["header"]["device_serial"], "0000000000000000");
        assert_eq!(value["sessions"][0]["log_status"]["status"], "complete");
        assert_eq!(value["sessions"][0]["log_lines"][0]["pressure"], 9.0);
    }
}
