//! Декодер бинарных логов CPAP-аппаратов Yuwell YH-550 и YH-580.
//!
//! Формат восстановлен по дампам устройств. Библиотека только читает
//! файлы; запись не поддерживается.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use std::path::Path;
//! use yhlog_core::{decode_path, DecodedFile};
//!
//! match decode_path(Path::new("YHSD-NEW.BYS"), None)? {
//!     DecodedFile::Yh550(file) => println!("{} minutes", file.logs.len()),
//!     DecodedFile::Yh580(file) => println!("{} sessions", file.sessions.len()),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
pub mod decode;
pub mod detect;
pub mod format;
pub mod yh550;
pub mod yh580;

pub use binary::*;
pub use decode::*;
pub use detect::*;
pub use format::*;

pub use yhlog_types::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
