use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use serde::Serialize;
use yhlog_types::{Violation, Yh550File, Yh580File, YhError, YhResult};

use crate::{yh550, yh580, DeviceModel, YH550_HEADER_SIZE};

/// Результат декодирования файла любой из моделей.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DecodedFile {
    Yh550(Yh550File),
    Yh580(Yh580File),
}

impl DecodedFile {
    pub fn model(&self) -> DeviceModel {
        match self {
            DecodedFile::Yh550(_) => DeviceModel::Yh550,
            DecodedFile::Yh580(_) => DeviceModel::Yh580,
        }
    }
}

/// Декодирует источник как файл указанной модели.
pub fn decode_reader<R: Read + Seek>(
    source: &mut R,
    model: DeviceModel,
) -> YhResult<DecodedFile> {
    match model {
        DeviceModel::Yh550 => yh550::decode(source).map(DecodedFile::Yh550),
        DeviceModel::Yh580 => yh580::decode(source).map(DecodedFile::Yh580),
    }
}

/// Открывает и декодирует файл.
///
/// Если `model` не задана, модель определяется по содержимому
/// ([`DeviceModel::detect`]).
pub fn decode_path(
    path: &Path,
    model: Option<DeviceModel>,
) -> YhResult<DecodedFile> {
    let mut reader = BufReader::new(File::open(path)?);

    let model = match model {
        Some(m) => m,
        None => detect_model(&mut reader)?,
    };

    decode_reader(&mut reader, model)
}

/// Определяет модель и возвращает источник в начало.
pub fn detect_model<R: Read + Seek>(source: &mut R) -> YhResult<DeviceModel> {
    let len = source.seek(SeekFrom::End(0))?;
    source.seek(SeekFrom::Start(0))?;

    let mut prefix = Vec::with_capacity(YH550_HEADER_SIZE);
    source
        .by_ref()
        .take(YH550_HEADER_SIZE as u64)
        .read_to_end(&mut prefix)?;
    source.seek(SeekFrom::Start(0))?;

    DeviceModel::detect(&prefix, len)
        .ok_or_else(|| YhError::violation(0, Violation::UnknownLayout { len }))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_detect_model_rewinds() {
        let mut src = Cursor::new(vec![0u8; crate::YH580_BASE_OFFSET as usize]);
        src.set_position(123);

        assert_eq!(detect_model(&mut src).unwrap(), DeviceModel::Yh580);
        assert_eq!(src.position(), 0);
    }

    #[test]
    fn test_unknown_layout() {
        let err = detect_model(&mut Cursor::new(vec![1u8; 10])).unwrap_err();

        assert!(matches!(
            err,
            YhError::FormatViolation {
                offset: 0,
                violation: Violation::UnknownLayout { len: 10 }
            }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = decode_path(Path::new("/nonexistent/yhlog/file.bin"), None).unwrap_err();

        assert!(matches!(err, YhError::Io(_)));
    }
}
