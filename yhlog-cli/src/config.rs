use std::path::PathBuf;

use yhlog_core::DeviceModel;

/// Выбор модели аппарата для входных файлов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceChoice {
    /// Определять модель по содержимому каждого файла.
    #[default]
    Auto,
    /// Все файлы считаются логами YH-550.
    Yh550,
    /// Все файлы считаются логами YH-580.
    Yh580,
}

/// Формат вывода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Текстовый отчёт по ночам и сессиям.
    #[default]
    Text,
    /// Декодированное дерево целиком.
    Json,
    /// Одна строка на минуту.
    Csv,
}

/// Конфигурация запуска отчёта.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Файл или каталог с логами
    pub input: PathBuf,
    /// Модель аппарата
    pub device: DeviceChoice,
    /// Формат вывода
    pub format: OutputFormat,
    /// Остановиться на первом отклонённом файле
    pub fail_fast: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl DeviceChoice {
    /// Модель для декодера; `None` включает автоопределение.
    pub fn model(self) -> Option<DeviceModel> {
        match self {
            DeviceChoice::Auto => None,
            DeviceChoice::Yh550 => Some(DeviceModel::Yh550),
            DeviceChoice::Yh580 => Some(DeviceModel::Yh580),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для DeviceChoice, OutputFormat, ReportConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for DeviceChoice {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            DeviceChoice::Auto => write!(f, "auto"),
            DeviceChoice::Yh550 => write!(f, "yh550"),
            DeviceChoice::Yh580 => write!(f, "yh580"),
        }
    }
}

impl std::str::FromStr for DeviceChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(DeviceChoice::Auto);
        }

        match s.parse::<DeviceModel>() {
            Ok(DeviceModel::Yh550) => Ok(DeviceChoice::Yh550),
            Ok(DeviceModel::Yh580) => Ok(DeviceChoice::Yh580),
            Err(_) => Err(format!(
                "Unknown device model: '{s}'. Use: auto, yh550, yh580"
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "report" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!(
                "Unknown output format: '{s}'. Use: text, json, csv"
            )),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            device: DeviceChoice::Auto,
            format: OutputFormat::Text,
            fail_fast: false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_choice_fromstr() {
        assert_eq!("auto".parse::<DeviceChoice>().unwrap(), DeviceChoice::Auto);
        assert_eq!("AUTO".parse::<DeviceChoice>().unwrap(), DeviceChoice::Auto);
        assert_eq!("yh550".parse::<DeviceChoice>().unwrap(), DeviceChoice::Yh550);
        assert_eq!("YH-580".parse::<DeviceChoice>().unwrap(), DeviceChoice::Yh580);
        assert!("yh600".parse::<DeviceChoice>().is_err());
    }

    #[test]
    fn test_device_choice_roundtrip_display() {
        for choice in [DeviceChoice::Auto, DeviceChoice::Yh550, DeviceChoice::Yh580] {
            assert_eq!(choice.to_string().parse::<DeviceChoice>().unwrap(), choice);
        }
    }

    #[test]
    fn test_device_choice_model() {
        assert_eq!(DeviceChoice::Auto.model(), None);
        assert_eq!(DeviceChoice::Yh580.model(), Some(DeviceModel::Yh580));
    }

    #[test]
    fn test_output_format_fromstr() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();

        assert_eq!(config.device, DeviceChoice::Auto);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.fail_fast);
    }
}
