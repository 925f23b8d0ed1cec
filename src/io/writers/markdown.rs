use std::io::Write;

use crate::engine::Analysis;
use crate::io::output::OutputWriter;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_summary(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        let report = &analysis.report;
        writeln!(self.writer, "# godmap analysis\n")?;
        writeln!(self.writer, "| Metric | Count |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Files analyzed | {} |", report.files_analyzed)?;
        writeln!(self.writer, "| Classes | {} |", report.total_classes)?;
        writeln!(self.writer, "| Healthy classes | {} |", report.healthy_classes)?;
        writeln!(self.writer, "| God files | {} |", report.god_files.len())?;
        writeln!(self.writer, "| God classes | {} |", report.god_classes.len())?;
        writeln!(self.writer, "| God methods | {} |", report.total_god_methods)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_god_files(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        if analysis.report.god_files.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## God files\n")?;
        for verdict in &analysis.report.god_files {
            writeln!(
                self.writer,
                "- `{}`: {} classes, {} lines (score {})",
                verdict.path.display(),
                verdict.class_count,
                verdict.total_lines,
                verdict.violation_score
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_god_classes(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        if analysis.report.god_classes.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## God classes\n")?;
        for outcome in &analysis.report.god_classes {
            writeln!(
                self.writer,
                "### `{}` ({})\n",
                outcome.metrics.name,
                outcome.metrics.file_path.display()
            )?;
            writeln!(self.writer, "{}\n", outcome.summary)?;
            for violation in &outcome.violations {
                writeln!(self.writer, "- {violation}")?;
            }
            if !outcome.suggested_extractions.is_empty() {
                writeln!(self.writer, "\nSuggested extractions:\n")?;
                for cluster in &outcome.suggested_extractions {
                    writeln!(
                        self.writer,
                        "- **{}** (cohesion {:.2}): {}",
                        cluster.suggested_name,
                        cluster.cohesion_score,
                        cluster.justification
                    )?;
                }
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_errors(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        if analysis.report.file_errors.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Skipped files\n")?;
        for error in &analysis.report.file_errors {
            writeln!(self.writer, "- `{}`: {}", error.path.display(), error.message)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        self.write_summary(analysis)?;
        self.write_god_files(analysis)?;
        self.write_god_classes(analysis)?;
        self.write_errors(analysis)?;
        Ok(())
    }
}
