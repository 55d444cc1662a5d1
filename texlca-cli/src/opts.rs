use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::bail;
use atty::Stream;
use log::info;

#[derive(Debug, Clone)]
pub struct Directory {
    path: PathBuf,
}

impl Display for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn directory(path: &str) -> Result<Directory, String> {
    let result = Directory {
        path: PathBuf::from(path),
    };

    Ok(result)
}

impl Directory {
    pub fn as_path(&self) -> Result<&Path, anyhow::Error> {
        let path = self.path.as_path();
        if path.exists() && !path.is_dir() {
            bail!(
                "Provided path: {} does not point to a directory",
                path.display()
            );
        }

        Ok(path)
    }
}

#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
}

impl Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn input_file(path: &str) -> Result<InputFile, String> {
    let result = InputFile {
        path: PathBuf::from(path),
    };

    Ok(result)
}

impl InputFile {
    pub fn as_path(&self) -> Result<&Path, anyhow::Error> {
        let path = self.path.as_path();
        if !path.is_file() {
            bail!("Provided path: {} does not point to a file", path.display());
        }

        Ok(path)
    }
}

pub fn input_stream(path: &str) -> Result<InputStream, String> {
    let result = InputStream {
        path: PathBuf::from(path),
    };

    Ok(result)
}

#[derive(Debug, Clone)]
pub struct InputStream {
    path: PathBuf,
}

impl Display for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            path: PathBuf::from("-"),
        }
    }
}

impl InputStream {
    pub fn as_reader(&self) -> Result<InputReader, anyhow::Error> {
        InputReader::from_path(&self.path)
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File(File),
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let is_stdin = path.to_string_lossy() == "-";

        let val = if is_stdin {
            if atty::is(Stream::Stdin) {
                info!("Reading from the terminal; finish the input with Ctrl-D");
            }
            Self::Stdin(io::stdin())
        } else {
            info!("Input file: {}", path.display());
            Self::File(File::open(path)?)
        };
        Ok(val)
    }

    pub fn length(&self) -> anyhow::Result<Option<u64>> {
        let val = match self {
            InputReader::Stdin(_) => None,
            InputReader::File(file) => Some(file.metadata()?.len()),
        };
        Ok(val)
    }

    #[must_use]
    pub fn into_read(self) -> Box<dyn Read + Send> {
        match self {
            InputReader::Stdin(stdin) => Box::new(stdin),
            InputReader::File(file) => Box::new(file),
        }
    }

    #[must_use]
    pub fn into_buf_read(self) -> Box<dyn BufRead + Send> {
        Box::new(BufReader::new(self.into_read()))
    }
}

#[derive(Debug)]
pub enum OutputWriter {
    Stdout(io::Stdout),
    File(File),
}

impl OutputWriter {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let is_stdout = path.to_string_lossy() == "-";

        let writer = if is_stdout {
            Self::Stdout(io::stdout())
        } else {
            info!("Output file: {}", path.display());
            Self::File(File::create(path)?)
        };

        Ok(writer)
    }

    pub fn into_write(self) -> Box<dyn Write + Send> {
        match self {
            OutputWriter::Stdout(stdout) => Box::new(stdout),
            OutputWriter::File(file) => Box::new(BufWriter::new(file)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::opts::{directory, input_file, input_stream, OutputWriter};

    #[test]
    fn dash_is_a_standard_stream() {
        assert_eq!(input_stream("-").unwrap().to_string(), "-");
        assert!(matches!(
            OutputWriter::from_path("-".as_ref()).unwrap(),
            OutputWriter::Stdout(_)
        ));
    }

    #[test]
    fn missing_input_file_is_rejected() {
        let file = input_file("/nonexistent/texlca/hits.tsv").unwrap();

        assert!(file.as_path().is_err());
    }

    #[test]
    fn missing_directory_is_accepted() {
        let dir = directory("/nonexistent/texlca/out").unwrap();

        assert!(dir.as_path().is_ok());
    }
}
