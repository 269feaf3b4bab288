use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sqlseed_core::{Row, TableSchema};

/// Write rows as CSV with the header in schema order.
///
/// Returns the number of bytes written.
pub fn write_rows_csv(path: &Path, schema: &TableSchema, rows: &[Row]) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    write_rows_csv_to(writer, schema, rows)
}

/// Write rows as CSV into any writer.
///
/// Fields containing a comma or double quote are quoted with embedded quotes
/// doubled; columns missing from a row render as empty fields.
pub fn write_rows_csv_to<W: Write>(
    writer: W,
    schema: &TableSchema,
    rows: &[Row],
) -> Result<u64, csv::Error> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(counting);

    let header: Vec<&str> = schema.column_names().collect();
    writer.write_record(&header)?;

    for row in rows {
        let record: Vec<String> = schema
            .columns
            .iter()
            .map(|column| {
                row.get(&column.name)
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
