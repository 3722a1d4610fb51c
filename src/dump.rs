use std::fs::File;
use std::io::{BufRead, BufReader, Error, Write};
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::config::Config;
use crate::filter::comments::CommentsRemover;
use crate::filter::source::Utf8Reader;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("can't read source file: {0}")]
    Source(Error),
    #[error("can't write output: {0}")]
    Output(Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpOptions {
    pub headers: bool,
    pub strip_comments: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            headers: true,
            strip_comments: true,
        }
    }
}

impl From<&Config> for DumpOptions {
    fn from(config: &Config) -> Self {
        Self {
            headers: config.headers,
            strip_comments: config.strip_comments,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub dumped: usize,
    pub skipped: usize,
}

fn open(path: &Path, strip_comments: bool) -> Result<Box<dyn BufRead>, Error> {
    let file = BufReader::new(File::open(path)?);
    let reader: Box<dyn BufRead> = match strip_comments {
        true => Box::new(BufReader::new(CommentsRemover::new(Utf8Reader::new(file)))),
        false => Box::new(file),
    };
    Ok(reader)
}

/// Writes every line of `path` to `out` and returns the line count.
pub fn dump_file<W: Write>(path: &Path, options: &DumpOptions, out: &mut W) -> Result<usize, DumpError> {
    let reader = open(path, options.strip_comments).map_err(DumpError::Source)?;
    let mut count = 0;
    for line in reader.lines() {
        let line = line.map_err(DumpError::Source)?;
        writeln!(out, "{line}").map_err(DumpError::Output)?;
        count += 1;
    }
    Ok(count)
}

/**
 * Prints each file in argument order, every one preceded by its header line.
 *
 * Files that can't be read are reported to `err` and skipped. Only a failure
 * to write `out` stops the loop.
 */
pub fn dump_files<P, O, E>(paths: &[P], options: &DumpOptions, out: &mut O, err: &mut E) -> Result<DumpSummary, Error>
where
    P: AsRef<Path>,
    O: Write,
    E: Write,
{
    let mut summary = DumpSummary::default();
    for path in paths {
        let path = path.as_ref();
        if options.headers {
            writeln!(out, "Output of {}:", path.display())?;
        }
        match dump_file(path, options, out) {
            Ok(lines) => {
                debug!("dumped {} lines of {}", lines, path.display());
                summary.dumped += 1;
            }
            Err(DumpError::Source(e)) => {
                info!("skipping {}: {}", path.display(), e);
                out.flush()?;
                writeln!(err, "The file \"{}\" does not exist. Skipping over it...\n", path.display())?;
                summary.skipped += 1;
            }
            Err(DumpError::Output(e)) => return Err(e),
        }
    }
    out.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::{dump_file, DumpError, DumpOptions};
    use std::path::Path;

    #[test]
    fn test_dump_file_missing() {
        let mut out = Vec::new();
        let result = dump_file(Path::new("no/such/file.scm"), &DumpOptions::default(), &mut out);
        assert!(matches!(result, Err(DumpError::Source(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_options_default() {
        let options = DumpOptions::default();
        assert!(options.headers);
        assert!(options.strip_comments);
    }
}
