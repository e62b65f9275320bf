//! Data Loader Module
//! Reads CSV (Polars) and Excel (calamine) questionnaire files.

use crate::data::processor::{source_for, MappedResponses, MappingOptions, ProcessorError};
use calamine::{DataType as Cell, Range, Reader, Xlsx, XlsxError};
use log::{debug, info};
use polars::prelude::{CsvReadOptions, DataFrame, PolarsError, SerReader};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows used by Polars to infer the column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// The input is not readable as a table.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("unreadable spreadsheet: {0}")]
    Excel(#[from] XlsxError),
    #[error("workbook has no worksheet")]
    NoWorksheet,
    #[error("unsupported file type {0:?} (expected .csv, .xlsx or .xlsm)")]
    UnsupportedExtension(String),
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

/// Declared shape of an uploaded file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Arbitrary columns, only the numeric ones are used
    #[default]
    Csv,
    /// First column identifies the respondent, the rest hold scale codes
    Excel,
}

impl SourceFormat {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SourceFormat::Csv => &["csv"],
            SourceFormat::Excel => &["xlsx", "xlsm"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Excel => "Excel",
        }
    }

    /// Infer the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        [SourceFormat::Csv, SourceFormat::Excel]
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
            .ok_or(FormatError::UnsupportedExtension(ext))
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse CSV bytes with Polars. The first row is the header.
pub fn read_csv_frame(bytes: &[u8]) -> Result<DataFrame, FormatError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?;
    debug!("read_csv_frame: shape {:?}", df.shape());
    Ok(df)
}

/// Parse the first worksheet of an xlsx workbook.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Range<Cell>, FormatError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(FormatError::NoWorksheet)??;
    debug!("read_first_sheet: size {:?}", range.get_size());
    Ok(range)
}

/// Loads questionnaire files and runs the mapper chosen by the declared format.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    options: MappingOptions,
}

impl DataLoader {
    pub fn new(options: MappingOptions) -> Self {
        Self { options }
    }

    /// Read a file from disk. Without a declared format, the extension decides.
    pub fn load_path(
        &self,
        path: &Path,
        format: Option<SourceFormat>,
    ) -> Result<MappedResponses, LoaderError> {
        let format = match format {
            Some(format) => format,
            None => SourceFormat::from_path(path)?,
        };
        let bytes = fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Loading {} as {} ({} bytes)",
            path.display(),
            format,
            bytes.len()
        );
        self.load_bytes(&bytes, format)
    }

    pub fn load_bytes(
        &self,
        bytes: &[u8],
        format: SourceFormat,
    ) -> Result<MappedResponses, LoaderError> {
        let source = source_for(format, &self.options);
        let responses = source.read(bytes)?;
        info!(
            "Mapped {} input: {} respondents, {} questions",
            source.format(),
            responses.table.row_count(),
            responses.table.question_count()
        );
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Score;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("answers.CSV")).unwrap(),
            SourceFormat::Csv
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("kuesioner.xlsx")).unwrap(),
            SourceFormat::Excel
        );
        assert!(matches!(
            SourceFormat::from_path(Path::new("notes.txt")),
            Err(FormatError::UnsupportedExtension(ext)) if ext == "txt"
        ));
        assert!(SourceFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn csv_keeps_header_order_and_numeric_columns() {
        let csv = indoc! {"
            Q1,Name,Q2
            4,Ani,5
            3,Budi,2
        "};
        let responses = DataLoader::default()
            .load_bytes(csv.as_bytes(), SourceFormat::Csv)
            .unwrap();

        assert_eq!(responses.table.question_names(), vec!["Q1", "Q2"]);
        assert_eq!(responses.report.dropped_columns, vec!["Name".to_string()]);
        assert_eq!(
            responses.table.head(1),
            vec![vec![Score::new(4), Score::new(5)]]
        );
    }

    #[test]
    fn malformed_csv_is_a_format_error() {
        let err = DataLoader::default()
            .load_bytes(b"a,b\n1,2,3\n", SourceFormat::Csv)
            .unwrap_err();
        assert!(matches!(err, LoaderError::Format(FormatError::Csv(_))));
    }

    #[test]
    fn corrupt_workbook_is_a_format_error() {
        let err = DataLoader::default()
            .load_bytes(b"definitely not a zip archive", SourceFormat::Excel)
            .unwrap_err();
        assert!(matches!(err, LoaderError::Format(FormatError::Excel(_))));
    }

    #[test]
    fn unknown_extension_is_a_format_error() {
        let err = DataLoader::default()
            .load_path(Path::new("survey.pdf"), None)
            .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Format(FormatError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DataLoader::default()
            .load_path(Path::new("/nonexistent/survey.csv"), None)
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
