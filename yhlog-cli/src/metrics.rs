use std::time::Instant;

/// Счётчики одного запуска отчёта.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchMetrics {
    pub files_seen: u64,
    pub files_decoded: u64,
    pub files_rejected: u64,
    /// Сессии YH-580 со статусом, отличным от `Complete`/`Empty`
    pub sessions_degraded: u64,
    pub minutes_decoded: u64,
}

/// Snapshot метрик для вывода в конце запуска.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub duration_secs: f64,
    pub metrics: BatchMetrics,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` если хотя бы один файл был отклонён.
    pub fn has_rejections(&self) -> bool {
        self.files_rejected > 0
    }

    /// Итоговая сводка для вывода в конце запуска.
    pub fn summary(
        &self,
        elapsed: &Instant,
    ) -> BatchSummary {
        BatchSummary {
            duration_secs: elapsed.elapsed().as_secs_f64(),
            metrics: self.clone(),
        }
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let m = &self.metrics;

        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.2}s", self.duration_secs)?;
        writeln!(f, "  Files         : {}", m.files_seen)?;
        writeln!(f, "  Decoded       : {}", m.files_decoded)?;
        writeln!(f, "  Rejected      : {}", m.files_rejected)?;
        writeln!(f, "  Degraded sess.: {}", m.sessions_degraded)?;
        writeln!(f, "  Minutes       : {}", m.minutes_decoded)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
