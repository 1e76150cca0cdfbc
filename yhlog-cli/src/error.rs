use std::path::PathBuf;

use thiserror::Error;
use yhlog_core::YhError;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Входной путь не существует
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Файл отклонён декодером
    #[error("{}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: YhError,
    },

    /// Ошибка чтения каталога или записи отчёта
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Смещение нарушения разметки, если ошибка пришла из декодера.
    pub fn offset(&self) -> Option<u64> {
        match self {
            CliError::Decode { source, .. } => source.offset(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use yhlog_core::Violation;

    use super::*;

    #[test]
    fn test_decode_error_carries_path_and_offset() {
        let err = CliError::Decode {
            path: PathBuf::from("night.bys"),
            source: YhError::violation(
                50,
                Violation::SentinelMismatch {
                    expected: 0xF9,
                    found: 0,
                },
            ),
        };

        assert_eq!(err.offset(), Some(50));
        assert!(err.to_string().starts_with("night.bys: "));
    }

    #[test]
    fn test_not_found_has_no_offset() {
        let err = CliError::NotFound(PathBuf::from("missing"));

        assert_eq!(err.offset(), None);
        assert!(err.to_string().contains("missing"));
    }
}
