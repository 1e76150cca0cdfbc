use std::{io::Write, path::Path};

use chrono::{NaiveDateTime, TimeDelta};
use yhlog_core::{
    DecodedFile, LogStatus, Tenths, Yh550File, Yh550LogLine, Yh580File, Yh580LogLine,
    Yh580Session, Yh580Settings,
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Поминутная запись любой модели в общем виде для отчёта и CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteRow {
    /// Номер сессии в файле (для YH-550 всегда 0)
    pub session: usize,
    pub logged_time: NaiveDateTime,
    pub pressure: Tenths,
    pub leakage: Tenths,
    pub oai: u8,
    pub hi: u8,
    pub cai: u8,
    /// Только YH-580
    pub spo2: Option<u8>,
    /// Только YH-580
    pub pulse: Option<u8>,
}

/// Сводка по ночи (YH-550) или сессии (YH-580).
#[derive(Debug, Clone, PartialEq)]
pub struct NightStats {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Декодированные минуты
    pub minutes: usize,
    /// Сумма OAI + HI + CAI
    pub events: u32,
    /// Событий в час по декодированным минутам
    pub ahi: f64,
    pub mean_pressure: f64,
    pub max_pressure: Tenths,
    pub max_leakage: Tenths,
    /// Среднее по ненулевым значениям
    pub mean_spo2: Option<f64>,
    /// Среднее по ненулевым значениям
    pub mean_pulse: Option<f64>,
}

impl MinuteRow {
    fn from_yh550(line: &Yh550LogLine) -> Self {
        Self {
            session: 0,
            logged_time: line.logged_time,
            pressure: line.pressure,
            leakage: line.leakage,
            oai: line.oai,
            hi: line.hi,
            cai: line.cai,
            spo2: None,
            pulse: None,
        }
    }

    fn from_yh580(
        session: usize,
        line: &Yh580LogLine,
    ) -> Self {
        Self {
            session,
            logged_time: line.logged_time,
            pressure: line.pressure,
            leakage: line.leakage,
            oai: line.oai,
            hi: line.hi,
            cai: line.cai,
            spo2: Some(line.spo2),
            pulse: Some(line.pulse),
        }
    }
}

/// Разворачивает файл в поминутные строки в порядке сессий.
pub fn minute_rows(decoded: &DecodedFile) -> Vec<MinuteRow> {
    match decoded {
        DecodedFile::Yh550(file) => file.logs.iter().map(MinuteRow::from_yh550).collect(),
        DecodedFile::Yh580(file) => file
            .sessions
            .iter()
            .enumerate()
            .flat_map(|(i, s)| s.log_lines.iter().map(move |l| MinuteRow::from_yh580(i, l)))
            .collect(),
    }
}

impl NightStats {
    pub fn compute(
        start: NaiveDateTime,
        end: NaiveDateTime,
        rows: &[MinuteRow],
    ) -> Self {
        let minutes = rows.len();
        let events: u32 = rows
            .iter()
            .map(|r| u32::from(r.oai) + u32::from(r.hi) + u32::from(r.cai))
            .sum();

        let hours = minutes as f64 / 60.0;
        let ahi = if minutes == 0 {
            0.0
        } else {
            events as f64 / hours
        };

        let mean_pressure = if minutes == 0 {
            0.0
        } else {
            rows.iter().map(|r| r.pressure.to_f64()).sum::<f64>() / minutes as f64
        };

        Self {
            start,
            end,
            minutes,
            events,
            ahi,
            mean_pressure,
            max_pressure: rows.iter().map(|r| r.pressure).max().unwrap_or_default(),
            max_leakage: rows.iter().map(|r| r.leakage).max().unwrap_or_default(),
            mean_spo2: mean_nonzero(rows.iter().filter_map(|r| r.spo2)),
            mean_pulse: mean_nonzero(rows.iter().filter_map(|r| r.pulse)),
        }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

fn mean_nonzero(values: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, n) = values
        .filter(|&v| v != 0)
        .fold((0u64, 0u64), |(s, n), v| (s + u64::from(v), n + 1));

    (n > 0).then(|| sum as f64 / n as f64)
}

fn format_duration(d: TimeDelta) -> String {
    let minutes = d.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();

    format!("{sign}{}h {:02}m", minutes / 60, minutes % 60)
}

fn status_text(status: LogStatus) -> String {
    match status {
        LogStatus::Complete => "complete".into(),
        LogStatus::Empty => "empty".into(),
        LogStatus::SentinelMismatch { found } => {
            format!("untrusted block (leakage sentinel {found}), log ignored")
        }
        LogStatus::Truncated { decoded, declared } => {
            format!("truncated ({decoded} of {declared} minutes)")
        }
    }
}

impl std::fmt::Display for NightStats {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(
            f,
            "  Time          : {} → {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(f, "  Duration      : {}", format_duration(self.duration()))?;
        writeln!(f, "  Minutes       : {}", self.minutes)?;
        writeln!(f, "  AHI           : {:.1} ({} events)", self.ahi, self.events)?;
        writeln!(
            f,
            "  Pressure      : mean {:.1}, max {} cmH2O",
            self.mean_pressure, self.max_pressure
        )?;
        write!(f, "  Max leakage   : {} L/min", self.max_leakage)?;

        if let Some(spo2) = self.mean_spo2 {
            write!(f, "\n  Mean SpO2     : {spo2:.1} %")?;
        }
        if let Some(pulse) = self.mean_pulse {
            write!(f, "\n  Mean pulse    : {pulse:.0} bpm")?;
        }

        Ok(())
    }
}

/// Пишет текстовый отчёт по декодированному файлу.
pub fn write_report<W: Write>(
    out: &mut W,
    path: &Path,
    decoded: &DecodedFile,
) -> std::io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "  File          : {}", path.display())?;
    writeln!(out, "  Model         : {}", decoded.model())?;

    match decoded {
        DecodedFile::Yh550(file) => write_yh550(out, file)?,
        DecodedFile::Yh580(file) => write_yh580(out, file)?,
    }

    writeln!(out, "{RULE}")
}

fn write_yh550<W: Write>(
    out: &mut W,
    file: &Yh550File,
) -> std::io::Result<()> {
    let h = &file.header;

    writeln!(out, "  Serial        : {}", h.device_serial)?;
    writeln!(out, "  Mode          : {}", h.mode)?;
    writeln!(out, "  Ramp          : {} min", h.ramp_time)?;
    writeln!(
        out,
        "  Pressure set  : init {}, min {}, max {} cmH2O",
        h.initial_pressure, h.minimum_pressure, h.maximum_pressure
    )?;
    writeln!(out, "  Humidity      : {}", h.humidity)?;
    writeln!(
        out,
        "  Device avg    : pressure {} cmH2O, leakage {} L/min",
        h.average_pressure, h.average_leak_volume
    )?;

    let rows: Vec<_> = file.logs.iter().map(MinuteRow::from_yh550).collect();
    writeln!(out, "{RULE}")?;
    writeln!(out, "{}", NightStats::compute(h.start, h.end, &rows))?;

    let anomalies = file.anomalies().count();
    if anomalies > 0 {
        writeln!(out, "  u6 nonzero    : {anomalies} minutes")?;
    }

    Ok(())
}

fn write_settings<W: Write>(
    out: &mut W,
    s: &Yh580Settings,
) -> std::io::Result<()> {
    writeln!(out, "  Mode          : {}", s.mode)?;
    writeln!(out, "  Ramp          : {} min", s.ramp_time)?;
    writeln!(
        out,
        "  Pressure set  : init {}, min {}, max {} cmH2O (setting {})",
        s.initial_pressure, s.minimum_pressure, s.maximum_pressure, s.pressure_setting
    )?;
    writeln!(out, "  Humidity      : {}, FPS {}", s.humidity, s.fps_level)
}

fn write_yh580<W: Write>(
    out: &mut W,
    file: &Yh580File,
) -> std::io::Result<()> {
    writeln!(out, "  Serial        : {}", file.header.device_serial)?;
    write_settings(out, &file.header.settings)?;
    writeln!(
        out,
        "  Sessions      : {} ({} with data)",
        file.sessions.len(),
        file.populated_sessions().count()
    )?;

    for (i, session) in file.sessions.iter().enumerate() {
        write_session(out, i, session)?;
    }

    Ok(())
}

fn write_session<W: Write>(
    out: &mut W,
    index: usize,
    session: &Yh580Session,
) -> std::io::Result<()> {
    let rows: Vec<_> = session
        .log_lines
        .iter()
        .map(|l| MinuteRow::from_yh580(index, l))
        .collect();

    writeln!(out, "{RULE}")?;
    writeln!(out, "  Session #{index}")?;
    writeln!(out, "{}", NightStats::compute(session.start, session.end, &rows))?;
    writeln!(
        out,
        "  Device events : OAI {}, HI {}",
        session.oai_count, session.hi_count
    )?;

    if !session.is_complete() {
        writeln!(out, "  Log status    : {}", status_text(session.log_status))?;
    }
    if session.u7 != 0 {
        writeln!(out, "  u7            : {}", session.u7)?;
    }

    Ok(())
}
