use serde::Serialize;

/// Rows of a loaded source together with the column names of its header.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T> {
    columns: Vec<String>,
    records: Vec<T>,
}

/// Row and column counts, derived columns included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetShape {
    pub rows: usize,
    pub columns: usize,
}

impl<T> Dataset<T> {
    pub fn new(columns: Vec<String>, records: Vec<T>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn head(&self, n: usize) -> &[T] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn shape(&self) -> DatasetShape {
        DatasetShape {
            rows: self.records.len(),
            columns: self.columns.len(),
        }
    }

    /// Replace every record, appending `extra_columns` to the header.
    pub fn map_records<U>(self, extra_columns: &[&str], f: impl FnOnce(Vec<T>) -> Vec<U>) -> Dataset<U> {
        let mut columns = self.columns;
        columns.extend(extra_columns.iter().map(|c| c.to_string()));
        Dataset {
            columns,
            records: f(self.records),
        }
    }
}
