//! Record sink trait

use vaudit_protocol::Record;

use crate::error::Result;

/// Destination for records, one per line
pub trait RecordSink {
    /// Write one record
    fn write(&mut self, record: &Record) -> Result<()>;

    /// Write records in order, stopping at the first failure
    fn write_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
        Self: Sized,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Flush buffered output
    fn flush(&mut self) -> Result<()>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn write(&mut self, record: &Record) -> Result<()> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn write(&mut self, record: &Record) -> Result<()> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Collects records in memory
impl RecordSink for Vec<Record> {
    fn write(&mut self, record: &Record) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
