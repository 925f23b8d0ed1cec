use colored::Colorize;
use std::io::Write;

use crate::core::{ClassOutcome, GodFileVerdict};
use crate::engine::Analysis;
use crate::io::output::OutputWriter;

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_summary(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        let report = &analysis.report;
        writeln!(self.writer, "{}", "godmap analysis".bold())?;
        writeln!(self.writer)?;
        writeln!(self.writer, "  Files analyzed:  {}", report.files_analyzed)?;
        writeln!(self.writer, "  Classes:         {}", report.total_classes)?;
        writeln!(self.writer, "  Healthy classes: {}", report.healthy_classes)?;
        writeln!(
            self.writer,
            "  God files:       {}",
            count_cell(report.god_files.len())
        )?;
        writeln!(
            self.writer,
            "  God classes:     {}",
            count_cell(report.god_classes.len())
        )?;
        writeln!(
            self.writer,
            "  God methods:     {}",
            count_cell(report.total_god_methods)
        )?;
        Ok(())
    }

    fn write_god_files(&mut self, god_files: &[GodFileVerdict]) -> anyhow::Result<()> {
        if god_files.is_empty() {
            return Ok(());
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "God files".bold().red())?;
        for verdict in god_files {
            writeln!(
                self.writer,
                "  {} (score {})",
                verdict.path.display().to_string().yellow(),
                verdict.violation_score
            )?;
            for violation in &verdict.violations {
                writeln!(self.writer, "    - {violation}")?;
            }
        }
        Ok(())
    }

    fn write_god_classes(&mut self, god_classes: &[ClassOutcome]) -> anyhow::Result<()> {
        if god_classes.is_empty() {
            return Ok(());
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "God classes".bold().red())?;
        for outcome in god_classes {
            writeln!(
                self.writer,
                "  {} in {} (score {})",
                outcome.metrics.name.yellow(),
                outcome.metrics.file_path.display(),
                outcome.violation_score
            )?;
            for violation in &outcome.violations {
                writeln!(self.writer, "    - {violation}")?;
            }
            for cluster in &outcome.suggested_extractions {
                writeln!(
                    self.writer,
                    "    extract {} (cohesion {:.2}): {}",
                    cluster.suggested_name.green(),
                    cluster.cohesion_score,
                    cluster.methods.join(", ")
                )?;
            }
        }
        Ok(())
    }

    fn write_god_methods(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        let classes_with_methods: Vec<&ClassOutcome> = analysis
            .report
            .god_classes
            .iter()
            .chain(analysis.report.classes_with_god_methods.iter())
            .filter(|outcome| !outcome.god_methods.is_empty())
            .collect();
        if classes_with_methods.is_empty() {
            return Ok(());
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "God methods".bold().red())?;
        for outcome in classes_with_methods {
            for record in &outcome.god_methods {
                writeln!(
                    self.writer,
                    "  {}::{} (score {})",
                    record.class_name,
                    record.metrics.name.yellow(),
                    record.violation_score
                )?;
                for violation in &record.violations {
                    writeln!(self.writer, "    - {violation}")?;
                }
            }
        }
        Ok(())
    }

    fn write_errors(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        if analysis.report.file_errors.is_empty() {
            return Ok(());
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Skipped files".bold())?;
        for error in &analysis.report.file_errors {
            writeln!(
                self.writer,
                "  {}: {}",
                error.path.display(),
                error.message.dimmed()
            )?;
        }
        Ok(())
    }
}

fn count_cell(count: usize) -> String {
    if count == 0 {
        count.to_string().green().to_string()
    } else {
        count.to_string().red().to_string()
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        self.write_summary(analysis)?;
        self.write_god_files(&analysis.report.god_files)?;
        self.write_god_classes(&analysis.report.god_classes)?;
        self.write_god_methods(analysis)?;
        self.write_errors(analysis)?;

        writeln!(self.writer)?;
        if analysis.report.has_issues() {
            writeln!(self.writer, "{}", "issues found".red().bold())?;
        } else {
            writeln!(self.writer, "{}", "clean".green().bold())?;
        }
        Ok(())
    }
}
