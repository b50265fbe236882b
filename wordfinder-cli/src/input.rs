use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sample grid used by the `demo` command
pub const DEFAULT_GRID: [&str; 15] = [
    "hellothereapples",
    "xbtgzoilluminatt",
    "randomhcomputers",
    "sunshineqrsolver",
    "catdogswimagames",
    "freedomfcodejava",
    "qwersolveproblem",
    "clouddevpprogram",
    "extratermnilogyv",
    "obstaclecomplexx",
    "engineercoffeesa",
    "knowledgewordsdd",
    "pythonmysticodff",
    "developerxkeyzyt",
    "datastructuretyt",
];

/// Sample word stream used by the `demo` command
pub const DEFAULT_WORDS: [&str; 8] = [
    "hello",
    "apple",
    "computer",
    "java",
    "python",
    "knowledge",
    "freedom",
    "developer",
];

/// Reads grid rows from a file, one row per line.
pub fn load_grid(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        bail!("File '{}' not found", path.display());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let rows: Vec<String> = content.lines().map(String::from).collect();
    if rows.is_empty() {
        bail!("File '{}' is empty", path.display());
    }
    debug!("Loaded {} grid rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Non-blank lines of a word file, read lazily.
///
/// A read error (for example a line that is not UTF-8) ends the iteration
/// and is kept; [`WordStream::finish`] returns it.
pub struct WordStream {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    error: Option<io::Error>,
}

impl WordStream {
    /// Fails if reading stopped on an error rather than end of file.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to read '{}'", self.path.display()))),
            None => Ok(()),
        }
    }
}

impl Iterator for WordStream {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        loop {
            match self.lines.next()? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => return Some(line),
                Err(e) => {
                    warn!("Stopped reading {}: {}", self.path.display(), e);
                    self.error = Some(e);
                    return None;
                }
            }
        }
    }
}

/// Opens a word file as a [`WordStream`].
pub fn stream_words(path: &Path) -> Result<WordStream> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => anyhow::anyhow!("File '{}' not found", path.display()),
        _ => anyhow::Error::new(e).context(format!("Failed to open '{}'", path.display())),
    })?;

    Ok(WordStream {
        path: path.to_path_buf(),
        lines: BufReader::new(file).lines(),
        error: None,
    })
}

/// Reads lines from `reader` until a blank line or end of input.
pub fn read_block<R: BufRead>(reader: &mut R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buffer = String::new();
    loop {
        buffer.clear();
        if reader.read_line(&mut buffer)? == 0 {
            break;
        }
        let line = buffer.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}
