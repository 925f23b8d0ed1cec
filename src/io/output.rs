//! Report output selection.

use std::io::Write;

use crate::engine::Analysis;
use crate::io::writers::{JsonWriter, MarkdownWriter, TerminalWriter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

pub trait OutputWriter {
    fn write_report(&mut self, analysis: &Analysis) -> anyhow::Result<()>;
}

/// Writer for the chosen format, targeting `destination` (stdout or a
/// file opened by the caller). The terminal writer colorizes; the others
/// emit plain text.
pub fn create_writer(
    format: OutputFormat,
    destination: Box<dyn Write + Send>,
) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination)),
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(destination)),
    }
}
