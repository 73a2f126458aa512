//! Output sinks for rendered rows.

use std::io::{self, Write};

/// Destination for rendered rows.
///
/// Sinks own quoting and persistence. The converter pushes each row as soon
/// as it is rendered and calls [`RowSink::flush`] once when it is done.
pub trait RowSink {
    fn write_row(&mut self, fields: &[String]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, fields: &[String]) -> io::Result<()> {
        (**self).write_row(fields)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Delimited-text sink backed by the `csv` crate.
///
/// Fields containing the delimiter, a quote or a line break are quoted;
/// everything else is written bare.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    /// Comma-separated sink.
    pub fn new(inner: W) -> Self {
        Self::with_delimiter(inner, b',')
    }

    pub fn with_delimiter(inner: W, delimiter: u8) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(inner);
        Self { writer }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer
            .into_inner()
            .map_err(csv::IntoInnerError::into_error)
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, fields: &[String]) -> io::Result<()> {
        self.writer.write_record(fields).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
