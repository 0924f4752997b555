use std::future::Future;
use std::io::{self, Stdout, Write};
use std::pin::Pin;
use std::sync::Mutex;

use crate::domain::RankedStory;
use crate::error::RankerError;
use crate::port::RankingSink;

/// Prints one rendered line per story. With `print_scores`, the raw
/// `("id", score)` pairs are printed first.
pub struct ConsoleSink<W = Stdout> {
    writer: Mutex<W>,
    print_scores: bool,
}

impl ConsoleSink<Stdout> {
    #[must_use]
    pub fn stdout(print_scores: bool) -> Self {
        Self::new(io::stdout(), print_scores)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W, print_scores: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            print_scores,
        }
    }

    /// Returns the underlying writer, or `None` if a write panicked.
    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()
    }

    fn write_ranking(&self, ranked: &[RankedStory]) -> Result<(), RankerError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| RankerError::sink("console", "writer lock poisoned"))?;

        let mut write = || -> io::Result<()> {
            if self.print_scores {
                for entry in ranked {
                    writeln!(writer, "{:?}", (&entry.id, entry.score))?;
                }
            }
            for entry in ranked {
                writeln!(writer, "{}", entry.line)?;
            }
            writer.flush()
        };
        write().map_err(|e| RankerError::sink("console", e))
    }
}

impl<W: Write + Send> RankingSink for ConsoleSink<W> {
    fn emit<'a>(
        &'a self,
        ranked: &'a [RankedStory],
    ) -> Pin<Box<dyn Future<Output = Result<(), RankerError>> + Send + 'a>> {
        Box::pin(std::future::ready(self.write_ranking(ranked)))
    }
}
