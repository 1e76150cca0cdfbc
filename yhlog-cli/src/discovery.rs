use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{CliError, CliResult};

/// Собирает входные файлы.
///
/// Каталог даёт свои обычные файлы (без рекурсии), отсортированные по
/// имени; файл возвращается сам по себе.
pub fn discover_inputs(path: &Path) -> CliResult<Vec<PathBuf>> {
    if !path.exists() {
        return Err(CliError::NotFound(path.to_path_buf()));
    }

    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;

        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    debug!("{} input files in {}", files.len(), path.display());

    Ok(files)
}
