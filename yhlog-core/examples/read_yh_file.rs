//! Пример: декодирование лога YH-550 / YH-580
//!
//! Демонстрирует:
//! - автоопределение модели по содержимому файла
//! - вывод настроек и поминутных записей
//! - статусы блоков записей сессий YH-580
//!
//! Запуск: `cargo run --example read_yh_file -- YHSD-NEW.BYS`

use std::path::PathBuf;

use yhlog_core::{decode_path, DecodedFile, LogStatus, YhError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: read_yh_file <log file>")?;

    let decoded = match decode_path(&input_path, None) {
        Ok(d) => d,
        Err(e @ YhError::FormatViolation { .. }) => {
            eprintln!("✗ Format violation: {e}");
            return Err(Box::new(e));
        }
        Err(e) => return Err(Box::new(e)),
    };

    println!("✓ Decoded as {}", decoded.model());

    match decoded {
        DecodedFile::Yh550(file) => {
            let h = &file.header;
            println!("  Serial        : {}", h.device_serial);
            println!("  Mode          : {}", h.mode);
            println!("  Night         : {} → {}", h.start, h.end);
            println!("  Records       : {}", h.record_count);
            println!("  u6 nonzero    : {}", file.anomalies().count());

            println!("\nFirst minutes:");
            for line in file.logs.iter().take(3) {
                println!(
                    "  {} pressure={} leakage={} oai={} hi={} cai={}",
                    line.logged_time, line.pressure, line.leakage, line.oai, line.hi, line.cai
                );
            }
        }
        DecodedFile::Yh580(file) => {
            println!("  Serial        : {}", file.header.device_serial);
            println!("  Mode          : {}", file.header.settings.mode);
            println!("  Sessions      : {}", file.sessions.len());

            for (i, s) in file.sessions.iter().enumerate() {
                let mark = match s.log_status {
                    LogStatus::Complete => "✓",
                    LogStatus::Empty => "·",
                    _ => "✗",
                };
                println!(
                    "  [{i}] {mark} {} → {} {} minutes @ {:#x} ({:?})",
                    s.start,
                    s.end,
                    s.log_lines.len(),
                    s.offset,
                    s.log_status
                );
            }
        }
    }

    Ok(())
}
