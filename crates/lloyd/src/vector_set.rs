use crate::numeric::{Number, parse_number};
use crate::{DimensionMismatchSnafu, EmptyInputSnafu, Error, MalformedInputSnafu};
use snafu::prelude::*;
use std::slice::ChunksExact;

const FIELD_DELIMITER: char = ',';

/// An immutable, non-empty collection of vectors sharing one dimension.
///
/// Vectors are stored row-major in a single buffer and keep their input order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSet {
    dim: usize,
    data: Vec<f64>,
}

/// A parsed input record, tagged with its 1-based line number.
struct Row {
    line: usize,
    values: Vec<f64>,
}

impl VectorSet {
    /// Parse comma-separated records, one vector per line. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Self::from_lines(text.lines())
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, Error> {
        let mut rows = Vec::new();
        for (i, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            rows.push(Row {
                line: i + 1,
                values: parse_line(i + 1, line)?,
            });
        }
        Self::from_parsed(rows)
    }

    /// Build from already materialized vectors. Every value must be finite.
    pub fn from_rows<R: AsRef<[f64]>>(rows: impl IntoIterator<Item = R>) -> Result<Self, Error> {
        let mut parsed = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            let values = row.as_ref();
            if let Some(field) = values.iter().position(|v| !v.is_finite()) {
                return MalformedInputSnafu {
                    line: i + 1,
                    field: field + 1,
                    token: values[field].to_string(),
                }
                .fail();
            }
            parsed.push(Row {
                line: i + 1,
                values: values.to_vec(),
            });
        }
        Self::from_parsed(parsed)
    }

    fn from_parsed(rows: Vec<Row>) -> Result<Self, Error> {
        let first = rows.first().context(EmptyInputSnafu)?;
        let dim = first.values.len();
        ensure!(dim > 0, EmptyInputSnafu);

        for row in &rows {
            ensure!(
                row.values.len() == dim,
                DimensionMismatchSnafu {
                    line: row.line,
                    expected: dim,
                    found: row.values.len(),
                }
            );
        }

        let mut data = Vec::with_capacity(rows.len() * dim);
        for row in rows {
            data.extend_from_slice(&row.values);
        }

        Ok(VectorSet { dim, data })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Always false; construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter(&self) -> ChunksExact<'_, f64> {
        self.data.chunks_exact(self.dim)
    }

    /// Coordinate-wise mean of all vectors.
    pub fn mean(&self) -> Vec<f64> {
        let mut sum = vec![0.0; self.dim];
        for v in self.iter() {
            for (s, x) in sum.iter_mut().zip(v) {
                *s += x;
            }
        }
        let n = self.len() as f64;
        sum.iter().map(|s| s / n).collect()
    }
}

impl<'a> IntoIterator for &'a VectorSet {
    type Item = &'a [f64];
    type IntoIter = ChunksExact<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_line(line: usize, text: &str) -> Result<Vec<f64>, Error> {
    text.trim()
        .split(FIELD_DELIMITER)
        .enumerate()
        .map(|(i, token)| match parse_number(token) {
            Number::Finite(v) => Ok(v),
            Number::NonFinite | Number::Unparseable => MalformedInputSnafu {
                line,
                field: i + 1,
                token,
            }
            .fail(),
        })
        .collect()
}
