use std::{io::Write, path::Path};

use log::{debug, error, info};
use yhlog_core::{decode_path, DecodedFile, LogStatus};

use crate::{
    discover_inputs,
    export::{write_csv, write_json},
    metrics::BatchMetrics,
    report::write_report,
    CliError, CliResult, OutputFormat, ReportConfig,
};

/// Обходит входные файлы, декодирует их и пишет результат в один поток.
pub struct ReportPipeline {
    config: ReportConfig,
    metrics: BatchMetrics,
    csv_header_written: bool,
}

impl ReportPipeline {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            metrics: BatchMetrics::new(),
            csv_header_written: false,
        }
    }

    pub fn metrics(&self) -> &BatchMetrics {
        &self.metrics
    }

    /// Обрабатывает все входы.
    ///
    /// Отклонённый файл логируется с путём и смещением; обработка
    /// продолжается, если не задан `fail_fast`. Ошибка записи в `out`
    /// прерывает запуск всегда.
    pub fn run<W: Write>(
        &mut self,
        out: &mut W,
    ) -> CliResult<()> {
        let inputs = discover_inputs(&self.config.input)?;

        info!(
            "{} input file(s) from {}",
            inputs.len(),
            self.config.input.display()
        );

        for path in &inputs {
            self.metrics.files_seen += 1;

            let decoded = match decode_path(path, self.config.device.model()) {
                Ok(d) => d,
                Err(source) => {
                    let err = CliError::Decode {
                        path: path.clone(),
                        source,
                    };
                    self.reject(&err);

                    if self.config.fail_fast {
                        return Err(err);
                    }
                    continue;
                }
            };

            self.account(path, &decoded);
            self.emit(out, path, &decoded)?;
        }

        out.flush()?;

        Ok(())
    }

    fn reject(
        &mut self,
        err: &CliError,
    ) {
        self.metrics.files_rejected += 1;

        match err.offset() {
            Some(offset) => error!("Rejected {err} (offset {offset:#x})"),
            None => error!("Rejected {err}"),
        }
    }

    fn account(
        &mut self,
        path: &Path,
        decoded: &DecodedFile,
    ) {
        self.metrics.files_decoded += 1;

        let minutes = match decoded {
            DecodedFile::Yh550(file) => file.logs.len(),
            DecodedFile::Yh580(file) => {
                self.metrics.sessions_degraded += file
                    .sessions
                    .iter()
                    .filter(|s| !matches!(s.log_status, LogStatus::Complete | LogStatus::Empty))
                    .count() as u64;

                file.sessions.iter().map(|s| s.log_lines.len()).sum()
            }
        };
        self.metrics.minutes_decoded += minutes as u64;

        debug!("{}: {} {minutes} minutes", path.display(), decoded.model());
    }

    fn emit<W: Write>(
        &mut self,
        out: &mut W,
        path: &Path,
        decoded: &DecodedFile,
    ) -> CliResult<()> {
        match self.config.format {
            OutputFormat::Text => write_report(out, path, decoded)?,
            OutputFormat::Json => write_json(out, decoded)?,
            OutputFormat::Csv => {
                write_csv(out, decoded, !self.csv_header_written)?;
                self.csv_header_written = true;
            }
        }

        Ok(())
    }
}
