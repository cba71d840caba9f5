//! Where raw search terms come from.

use std::io::BufRead;

use super::error::SearchError;

/// Supplies the raw, unprocessed term typed by the user.
///
/// `read_term` runs on the async executor, so implementations must not block.
/// Terms from blocking sources such as stdin are read up front with
/// [`StdinTerm::read_term`].
pub trait TermSource: Send + Sync {
    fn read_term(&self) -> Result<String, SearchError>;
}

impl TermSource for str {
    fn read_term(&self) -> Result<String, SearchError> {
        Ok(self.to_string())
    }
}

impl TermSource for String {
    fn read_term(&self) -> Result<String, SearchError> {
        Ok(self.clone())
    }
}

/// Reads a single line from standard input on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinTerm;

impl StdinTerm {
    pub async fn read_term(self) -> Result<String, SearchError> {
        tokio::task::spawn_blocking(|| first_line(std::io::stdin().lock()))
            .await
            .map_err(|e| SearchError::Input(e.to_string()))?
    }
}

/// First line of `reader` without its line terminator.
fn first_line<R: BufRead>(mut reader: R) -> Result<String, SearchError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| SearchError::Input(e.to_string()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
