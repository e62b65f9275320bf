//! Data Processor Module
//! Turns a raw table into a `ResponseTable`: numeric column selection for CSV,
//! scale-code mapping for Excel.

use crate::data::loader::{read_csv_frame, read_first_sheet, LoaderError, SourceFormat};
use crate::data::table::TableError;
use crate::data::{Question, ResponseTable, Score};
use calamine::{DataType as Cell, Range};
use log::{debug, warn};
use polars::prelude::{Column, DataFrame, DataType, PolarsError};
use std::fmt;
use thiserror::Error;

/// Likert codes and the score each one stands for.
pub const SCALE_CODES: [(&str, u8); 5] = [("STS", 1), ("TS", 2), ("CS", 3), ("S", 4), ("SS", 5)];

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Look up a scale code. Surrounding whitespace is ignored, case is not.
pub fn score_for_code(code: &str) -> Option<Score> {
    let code = code.trim();
    SCALE_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .and_then(|(_, value)| Score::new(*value))
}

/// Column selection policy shared by both strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOptions {
    /// Leading Excel columns that identify the respondent rather than ask a question.
    pub identifier_columns: usize,
    pub warn_on_dropped_columns: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            identifier_columns: 1,
            warn_on_dropped_columns: true,
        }
    }
}

/// What the mapper left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// CSV columns dropped because they are not numeric.
    pub dropped_columns: Vec<String>,
    /// Excel columns skipped as respondent identifiers.
    pub identifier_columns: Vec<String>,
    /// Non-blank cells that could not be read as a 1-5 score.
    pub rejected_cells: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.identifier_columns.is_empty() {
            parts.push(format!(
                "identifier: {}",
                self.identifier_columns.join(", ")
            ));
        }
        if !self.dropped_columns.is_empty() {
            parts.push(format!(
                "dropped non-numeric: {}",
                self.dropped_columns.join(", ")
            ));
        }
        if self.rejected_cells > 0 {
            parts.push(format!("{} cells off the 1-5 scale", self.rejected_cells));
        }
        if parts.is_empty() {
            f.write_str("all columns used")
        } else {
            f.write_str(&parts.join("; "))
        }
    }
}

/// Mapper output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedResponses {
    pub table: ResponseTable,
    pub report: LoadReport,
}

/// Produces a `ResponseTable` from the bytes of one uploaded file.
pub trait ResponseSource {
    fn format(&self) -> SourceFormat;

    fn read(&self, bytes: &[u8]) -> Result<MappedResponses, LoaderError>;
}

/// Pick the strategy for a declared format.
pub fn source_for(format: SourceFormat, options: &MappingOptions) -> Box<dyn ResponseSource> {
    match format {
        SourceFormat::Csv => Box::new(NumericColumns {
            warn_on_dropped: options.warn_on_dropped_columns,
        }),
        SourceFormat::Excel => Box::new(ScaleMapped {
            identifier_columns: options.identifier_columns,
        }),
    }
}

/// CSV strategy: keep numeric columns, drop the rest.
#[derive(Debug, Clone, Default)]
pub struct NumericColumns {
    pub warn_on_dropped: bool,
}

impl NumericColumns {
    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Null
        )
    }

    /// A column with rows but no values at all; kept as a question with no answers.
    fn is_blank(column: &Column) -> bool {
        !column.is_empty() && column.null_count() == column.len()
    }

    pub fn map_frame(&self, df: &DataFrame) -> Result<MappedResponses, ProcessorError> {
        let mut report = LoadReport::default();
        let mut questions = Vec::new();

        for column in df.get_columns() {
            let name = column.name().to_string();
            if !Self::is_numeric(column.dtype()) && !Self::is_blank(column) {
                report.dropped_columns.push(name);
                continue;
            }

            let values = column.cast(&DataType::Float64)?;
            let mut rejected = 0;
            let cells: Vec<Option<Score>> = values
                .f64()?
                .into_iter()
                .map(|v| {
                    let score = v.and_then(|v| Score::try_from(v).ok());
                    if v.is_some() && score.is_none() {
                        rejected += 1;
                    }
                    score
                })
                .collect();

            debug!("map_frame: {name}: {rejected} values off the scale");
            report.rejected_cells += rejected;
            questions.push(Question::new(name, cells));
        }

        if self.warn_on_dropped && !report.dropped_columns.is_empty() {
            warn!(
                "Dropped non-numeric columns: {}",
                report.dropped_columns.join(", ")
            );
        }

        Ok(MappedResponses {
            table: ResponseTable::new(questions)?,
            report,
        })
    }
}

impl ResponseSource for NumericColumns {
    fn format(&self) -> SourceFormat {
        SourceFormat::Csv
    }

    fn read(&self, bytes: &[u8]) -> Result<MappedResponses, LoaderError> {
        let df = read_csv_frame(bytes)?;
        Ok(self.map_frame(&df)?)
    }
}

/// Excel strategy: skip identifier columns, map scale codes to scores.
#[derive(Debug, Clone)]
pub struct ScaleMapped {
    pub identifier_columns: usize,
}

impl Default for ScaleMapped {
    fn default() -> Self {
        Self {
            identifier_columns: 1,
        }
    }
}

impl ScaleMapped {
    /// Scale code, else a number on the scale, else missing.
    pub fn coerce(cell: &Cell) -> Option<Score> {
        match cell {
            Cell::String(s) => score_for_code(s).or_else(|| {
                s.trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(|v| Score::try_from(v).ok())
            }),
            Cell::Int(v) => Score::try_from(*v).ok(),
            Cell::Float(v) => Score::try_from(*v).ok(),
            _ => None,
        }
    }

    fn header_name(cell: Option<&Cell>, index: usize) -> String {
        match cell {
            Some(Cell::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Cell::Empty) | Some(Cell::String(_)) | None => format!("Column {}", index + 1),
            Some(other) => other.to_string(),
        }
    }

    pub fn map_sheet(&self, sheet: &Range<Cell>) -> Result<MappedResponses, ProcessorError> {
        let mut report = LoadReport::default();
        let mut rows = sheet.rows();
        let Some(header) = rows.next() else {
            return Ok(MappedResponses::default());
        };
        let body: Vec<&[Cell]> = rows.collect();
        let (_, width) = sheet.get_size();

        let mut questions = Vec::new();
        for index in 0..width {
            let name = Self::header_name(header.get(index), index);
            if index < self.identifier_columns {
                report.identifier_columns.push(name);
                continue;
            }

            let mut rejected = 0;
            let cells: Vec<Option<Score>> = body
                .iter()
                .map(|row| {
                    let cell = row.get(index);
                    let score = cell.and_then(Self::coerce);
                    if score.is_none() && !matches!(cell, None | Some(Cell::Empty)) {
                        rejected += 1;
                    }
                    score
                })
                .collect();

            debug!("map_sheet: {name}: {rejected} unmapped cells");
            report.rejected_cells += rejected;
            questions.push(Question::new(name, cells));
        }

        Ok(MappedResponses {
            table: ResponseTable::new(questions)?,
            report,
        })
    }
}

impl ResponseSource for ScaleMapped {
    fn format(&self) -> SourceFormat {
        SourceFormat::Excel
    }

    fn read(&self, bytes: &[u8]) -> Result<MappedResponses, LoaderError> {
        let sheet = read_first_sheet(bytes)?;
        Ok(self.map_sheet(&sheet)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn sheet(rows: &[&[Cell]]) -> Range<Cell> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Cell {
        Cell::String(s.to_string())
    }

    fn values(table: &ResponseTable, question: usize) -> Vec<Option<u8>> {
        table.questions()[question]
            .cells
            .iter()
            .map(|c| c.map(Score::value))
            .collect()
    }

    #[test]
    fn code_table_covers_the_scale() {
        let mapped: Vec<u8> = ["STS", "TS", "CS", "S", "SS"]
            .iter()
            .filter_map(|code| score_for_code(code))
            .map(Score::value)
            .collect();
        assert_eq!(mapped, vec![1, 2, 3, 4, 5]);
        assert_eq!(score_for_code(" SS "), Score::new(5));
        assert_eq!(score_for_code("ss"), None);
        assert_eq!(score_for_code("Setuju"), None);
    }

    #[test]
    fn excel_codes_are_mapped_and_identifier_skipped() {
        let range = sheet(&[
            &[text("Nama"), text("P1"), text("P2")],
            &[text("Ani"), text("STS"), text("SS")],
            &[text("Budi"), text("S"), text("TS")],
            &[text("Citra"), text("S"), text("CS")],
            &[text("Dodi"), text("CS"), text("S")],
            &[text("Eka"), text("SS"), text("S")],
        ]);
        let mapped = ScaleMapped::default().map_sheet(&range).unwrap();

        assert_eq!(mapped.table.question_names(), vec!["P1", "P2"]);
        assert_eq!(
            values(&mapped.table, 0),
            vec![Some(1), Some(4), Some(4), Some(3), Some(5)]
        );
        assert_eq!(mapped.report.identifier_columns, vec!["Nama".to_string()]);
        assert_eq!(mapped.report.rejected_cells, 0);
    }

    #[test]
    fn unknown_codes_become_missing() {
        let range = sheet(&[
            &[text("Id"), text("P1")],
            &[Cell::Int(1), text("Netral")],
            &[Cell::Int(2), Cell::Empty],
            &[Cell::Int(3), Cell::Bool(true)],
            &[Cell::Int(4), text("TS")],
        ]);
        let mapped = ScaleMapped::default().map_sheet(&range).unwrap();

        assert_eq!(values(&mapped.table, 0), vec![None, None, None, Some(2)]);
        // The blank cell is an unanswered question, not a rejected one.
        assert_eq!(mapped.report.rejected_cells, 2);
    }

    #[test]
    fn numeric_cells_bypass_the_code_table() {
        let range = sheet(&[
            &[text("Id"), text("P1")],
            &[text("a"), Cell::Int(1)],
            &[text("b"), Cell::Float(5.0)],
            &[text("c"), text("3")],
            &[text("d"), Cell::Float(4.5)],
            &[text("e"), Cell::Int(9)],
        ]);
        let mapped = ScaleMapped::default().map_sheet(&range).unwrap();

        assert_eq!(
            values(&mapped.table, 0),
            vec![Some(1), Some(5), Some(3), None, None]
        );
        assert_eq!(mapped.report.rejected_cells, 2);
    }

    #[test]
    fn identifier_column_count_is_configurable() {
        let range = sheet(&[
            &[text("P1"), Cell::Empty],
            &[text("S"), text("SS")],
        ]);

        let none_skipped = ScaleMapped {
            identifier_columns: 0,
        }
        .map_sheet(&range)
        .unwrap();
        assert_eq!(none_skipped.table.question_names(), vec!["P1", "Column 2"]);
        assert!(none_skipped.report.identifier_columns.is_empty());

        let all_skipped = ScaleMapped {
            identifier_columns: 5,
        }
        .map_sheet(&range)
        .unwrap();
        assert_eq!(all_skipped.table.question_count(), 0);
    }

    #[test]
    fn numeric_columns_drop_text_and_report_it() {
        let df = read_csv_frame(
            indoc! {"
                Q1,Name,Q2
                1,Ani,4
                2,Budi,5
            "}
            .as_bytes(),
        )
        .unwrap();
        let mapped = NumericColumns::default().map_frame(&df).unwrap();

        assert_eq!(mapped.table.question_names(), vec!["Q1", "Q2"]);
        assert_eq!(mapped.report.dropped_columns, vec!["Name".to_string()]);
        assert_eq!(values(&mapped.table, 1), vec![Some(4), Some(5)]);
    }

    #[test]
    fn numeric_values_off_the_scale_become_missing() {
        let df = read_csv_frame(
            indoc! {"
                Q1,Q2
                7,4.0
                3,3.5
                ,2
            "}
            .as_bytes(),
        )
        .unwrap();
        let mapped = NumericColumns::default().map_frame(&df).unwrap();

        assert_eq!(values(&mapped.table, 0), vec![None, Some(3), None]);
        assert_eq!(values(&mapped.table, 1), vec![Some(4), None, Some(2)]);
        assert_eq!(mapped.report.rejected_cells, 2);
    }

    #[test]
    fn text_only_csv_yields_an_empty_table() {
        let df = read_csv_frame(
            indoc! {"
                Name,City
                Ani,Bandung
            "}
            .as_bytes(),
        )
        .unwrap();
        let mapped = NumericColumns::default().map_frame(&df).unwrap();

        assert_eq!(mapped.table.question_count(), 0);
        assert!(mapped.table.is_empty());
        assert_eq!(mapped.report.dropped_columns.len(), 2);
    }

    #[test]
    fn blank_csv_column_is_kept_without_answers() {
        let df = read_csv_frame(b"Q1,Q2\n4,\n5,\n").unwrap();
        let mapped = NumericColumns::default().map_frame(&df).unwrap();

        assert_eq!(mapped.table.question_names(), vec!["Q1", "Q2"]);
        assert_eq!(values(&mapped.table, 1), vec![None, None]);
        assert!(mapped.report.dropped_columns.is_empty());
    }

    #[test]
    fn strategy_follows_declared_format() {
        let options = MappingOptions::default();
        assert_eq!(source_for(SourceFormat::Csv, &options).format(), SourceFormat::Csv);
        assert_eq!(
            source_for(SourceFormat::Excel, &options).format(),
            SourceFormat::Excel
        );
    }

    #[test]
    fn report_summary_names_what_was_left_out() {
        let report = LoadReport {
            dropped_columns: vec!["Name".into()],
            identifier_columns: Vec::new(),
            rejected_cells: 3,
        };
        assert_eq!(
            report.to_string(),
            "dropped non-numeric: Name; 3 cells off the 1-5 scale"
        );
        assert_eq!(LoadReport::default().to_string(), "all columns used");
    }
}
