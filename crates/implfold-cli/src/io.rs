use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{convert_io_error, CliError};

/// Read a file, or standard input when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .map_err(|e| convert_io_error(e, PathBuf::from("<stdin>")))?;
        return Ok(contents);
    }
    std::fs::read_to_string(path).map_err(|e| convert_io_error(e, path.to_path_buf()))
}

/// One signature per line; blank lines and comment lines are skipped.
pub fn signature_lines<'a>(
    contents: &'a str,
    comment_prefix: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(move |line| comment_prefix.is_empty() || !line.starts_with(comment_prefix))
}
