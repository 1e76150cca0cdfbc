use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use chrono::{NaiveDate, NaiveDateTime};
use yhlog_types::{Violation, YhError, YhResult};

use crate::{EPOCH_YEAR, TIMESTAMP_SIZE};

/// Читатель, отслеживающий смещение от начала файла.
///
/// Каждое чтение получает имя поля: при обрыве данных ошибка содержит и
/// поле, и смещение, с которого оно начиналось.
pub struct OffsetReader<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> OffsetReader<R> {
    /// Оборачивает источник, находящийся в начале файла.
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Текущее смещение от начала файла.
    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(
        &mut self,
        field: &'static str,
    ) -> YhResult<u8> {
        let v = self.inner.read_u8().map_err(|e| self.fail(field, e))?;
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i16_le(
        &mut self,
        field: &'static str,
    ) -> YhResult<i16> {
        let v = self
            .inner
            .read_i16::<LittleEndian>()
            .map_err(|e| self.fail(field, e))?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u16_be(
        &mut self,
        field: &'static str,
    ) -> YhResult<u16> {
        let v = self
            .inner
            .read_u16::<BigEndian>()
            .map_err(|e| self.fail(field, e))?;
        self.pos += 2;
        Ok(v)
    }

    /// Читает ровно `N` байт.
    pub fn read_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> YhResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| self.fail(field, e))?;
        self.pos += N as u64;
        Ok(buf)
    }

    /// Пропускает `n` байт зарезервированной области.
    pub fn skip(
        &mut self,
        n: usize,
        field: &'static str,
    ) -> YhResult<()> {
        let copied = io::copy(&mut (&mut self.inner).take(n as u64), &mut io::sink());
        let copied = copied.map_err(|e| self.fail(field, e))?;

        if copied < n as u64 {
            return Err(YhError::violation(self.pos, Violation::Truncated { field }));
        }

        self.pos += copied;
        Ok(())
    }

    /// Читает область заполнения. Возвращает число байт, отличных от `fill`.
    pub fn read_fill(
        &mut self,
        n: usize,
        fill: u8,
        field: &'static str,
    ) -> YhResult<usize> {
        let mut buf = vec![0u8; n];
        self.inner
            .read_exact(&mut buf)
            .map_err(|e| self.fail(field, e))?;
        self.pos += n as u64;

        Ok(buf.iter().filter(|&&b| b != fill).count())
    }

    /// Читает 6-байтовую метку времени и проверяет календарь.
    pub fn read_timestamp(
        &mut self,
        field: &'static str,
    ) -> YhResult<NaiveDateTime> {
        let at = self.pos;
        let raw = self.read_array::<TIMESTAMP_SIZE>(field)?;

        decode_timestamp(raw).map_err(|v| YhError::violation(at, v))
    }

    // UnexpectedEof — это нарушение разметки, остальное — настоящий I/O
    fn fail(
        &self,
        field: &'static str,
        e: io::Error,
    ) -> YhError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            YhError::violation(self.pos, Violation::Truncated { field })
        } else {
            YhError::Io(e)
        }
    }
}

impl<R: Read + Seek> OffsetReader<R> {
    /// Переходит к абсолютному смещению от начала файла.
    pub fn seek_to(
        &mut self,
        offset: u64,
    ) -> YhResult<()> {
        self.pos = self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}

/// Собирает дату из полей `[год-2000, месяц, день, час, минута, секунда]`.
pub fn decode_timestamp(raw: [u8; TIMESTAMP_SIZE]) -> Result<NaiveDateTime, Violation> {
    let [year, month, day, hour, minute, second] = raw;
    let year = EPOCH_YEAR + i32::from(year);

    NaiveDate::from_ymd_opt(year, month.into(), day.into())
        .and_then(|d| d.and_hms_opt(hour.into(), minute.into(), second.into()))
        .ok_or(Violation::InvalidTimestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_decode_timestamp_epoch_2000() {
        let ts = decode_timestamp([24, 1, 2, 22, 0, 0]).unwrap();

        assert_eq!(ts.to_string(), "2024-01-02 22:00:00");
    }

    #[test]
    fn test_decode_timestamp_rejects_invalid_calendar() {
        assert!(decode_timestamp([24, 13, 1, 0, 0, 0]).is_err());
        assert!(decode_timestamp([23, 2, 29, 0, 0, 0]).is_err());
        assert!(decode_timestamp([24, 1, 1, 24, 0, 0]).is_err());
        assert!(decode_timestamp([24, 0, 1, 0, 0, 0]).is_err());
        // 2024 — високосный
        assert!(decode_timestamp([24, 2, 29, 0, 0, 0]).is_ok());
    }

    #[test]
    fn test_reader_tracks_offsets_and_endianness() {
        let raw = vec![0x07, 0x34, 0x12, 0x12, 0x34, 0xAA, 0xBB];
        let mut r = OffsetReader::new(Cursor::new(raw));

        assert_eq!(r.read_u8("a").unwrap(), 7);
        assert_eq!(r.read_i16_le("b").unwrap(), 0x1234);
        assert_eq!(r.read_u16_be("c").unwrap(), 0x1234);
        assert_eq!(r.position(), 5);
        assert_eq!(r.read_array::<2>("d").unwrap(), [0xAA, 0xBB]);
        assert_eq!(r.position(), 7);
    }

    #[test]
    fn test_short_read_is_truncation_at_field_start() {
        let mut r = OffsetReader::new(Cursor::new(vec![1, 2, 3]));
        r.skip(2, "pad").unwrap();

        let err = r.read_array::<4>("serial").unwrap_err();

        assert!(err.is_truncated());
        assert_eq!(err.offset(), Some(2));
    }

    #[test]
    fn test_skip_past_end_is_truncation() {
        let mut r = OffsetReader::new(Cursor::new(vec![0u8; 10]));

        let err = r.skip(11, "fill").unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_read_fill_counts_deviating_bytes() {
        let mut r = OffsetReader::new(Cursor::new(vec![0xFF, 0xFF, 0x00, 0xFF, 0x12, 0x01]));

        assert_eq!(r.read_fill(2, 0xFF, "fill").unwrap(), 0);
        assert_eq!(r.read_fill(3, 0xFF, "fill").unwrap(), 2);
        assert_eq!(r.position(), 5);

        let err = r.read_fill(4, 0xFF, "fill").unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(err.offset(), Some(5));
    }

    #[test]
    fn test_invalid_timestamp_reports_field_offset() {
        let mut raw = vec![0u8; 3];
        raw.extend_from_slice(&[24, 2, 30, 0, 0, 0]);
        let mut r = OffsetReader::new(Cursor::new(raw));
        r.skip(3, "pad").unwrap();

        match r.read_timestamp("start").unwrap_err() {
            YhError::FormatViolation { offset, violation } => {
                assert_eq!(offset, 3);
                assert!(matches!(violation, Violation::InvalidTimestamp { day: 30, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_seek_updates_position() {
        let mut r = OffsetReader::new(Cursor::new((0u8..32).collect::<Vec<_>>()));

        r.seek_to(20).unwrap();
        assert_eq!(r.position(), 20);
        assert_eq!(r.read_u8("x").unwrap(), 20);
    }
}
