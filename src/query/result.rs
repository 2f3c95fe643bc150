use std::fmt;

use crate::data::model::BookRecord;

// ---------------------------------------------------------------------------
// Value – a single result cell
// ---------------------------------------------------------------------------

/// A dynamically-typed result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// No data: an absent field or a mean over zero values.
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "N/A"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for charting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        i64::try_from(i).map(Value::Integer).unwrap_or(Value::Float(i as f64))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::from(i as u64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

// ---------------------------------------------------------------------------
// ResultTable – what a query hands to the presentation layer
// ---------------------------------------------------------------------------

/// Which columns a bar chart of the result should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartHint {
    pub label: usize,
    pub value: usize,
}

/// Column names plus rows of cells, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub chart: Option<ChartHint>,
}

impl ResultTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            chart: None,
        }
    }

    /// Chart `value` column against `label` column.
    pub fn with_chart(mut self, label: usize, value: usize) -> Self {
        self.chart = Some(ChartHint { label, value });
        self
    }

    pub fn push(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// One row per book: title plus the extra `columns` produced by `extra`.
    pub fn listing<'b, const N: usize>(
        books: impl IntoIterator<Item = &'b BookRecord>,
        columns: [&str; N],
        extra: impl Fn(&BookRecord) -> [Value; N],
    ) -> Self {
        let mut table = ResultTable::new(std::iter::once("Title").chain(columns));
        for book in books {
            let mut row = Vec::with_capacity(N + 1);
            row.push(Value::from(book.display_title()));
            row.extend(extra(book));
            table.push(row);
        }
        if N > 0 {
            table = table.with_chart(0, 1);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Vec<&Value> {
        match self.column(name) {
            Some(i) => self.rows.iter().map(|r| &r[i]).collect(),
            None => Vec::new(),
        }
    }

    /// `(label, value)` pairs for a bar chart; rows without a numeric value are skipped.
    pub fn chart_points(&self) -> Vec<(String, f64)> {
        let Some(hint) = self.chart else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|r| {
                let value = r.get(hint.value)?.as_f64()?;
                Some((r.get(hint.label)?.to_string(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some(3_u32)), Value::Integer(3));
        assert_eq!(Value::Null.to_string(), "N/A");
        assert_eq!(Value::Float(4.5).to_string(), "4.50");
    }

    #[test]
    fn chart_points_skip_nulls() {
        let mut t = ResultTable::new(["Type", "Mean"]).with_chart(0, 1);
        t.push(vec!["eBooks".into(), Value::Null]);
        t.push(vec!["Physical Books".into(), 300.0.into()]);
        assert_eq!(t.chart_points(), vec![("Physical Books".to_string(), 300.0)]);
    }
}
