use std::io::Write;

use crate::engine::Analysis;
use crate::io::output::OutputWriter;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, analysis: &Analysis) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&analysis.report)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
