//! Dashboard state for one upload: the mapped table, what was left out, and the aggregates.

use crate::data::{
    DataLoader, LoadReport, LoaderError, MappedResponses, ResponseTable, SourceFormat,
};
use crate::stats::SurveyStats;
use std::path::Path;

/// Built fresh on every upload and replaced wholesale.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub source: String,
    pub format: SourceFormat,
    pub table: ResponseTable,
    pub report: LoadReport,
    pub stats: SurveyStats,
}

impl Dashboard {
    pub fn build(
        source: impl Into<String>,
        format: SourceFormat,
        responses: MappedResponses,
    ) -> Self {
        let stats = SurveyStats::compute(&responses.table);
        Self {
            source: source.into(),
            format,
            table: responses.table,
            report: responses.report,
            stats,
        }
    }

    pub fn load(
        loader: &DataLoader,
        path: &Path,
        format: Option<SourceFormat>,
    ) -> Result<Self, LoaderError> {
        let format = match format {
            Some(format) => format,
            None => SourceFormat::from_path(path)?,
        };
        let responses = loader.load_path(path, Some(format))?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::build(source, format, responses))
    }

    /// Status line shown after an upload.
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} ({}): {} respondents, {} questions, {} answers ({})",
            self.source,
            self.format,
            self.table.row_count(),
            self.table.question_count(),
            self.stats.overall.total(),
            self.report
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Score;
    use indoc::indoc;

    #[test]
    fn csv_upload_builds_every_view() {
        let csv = indoc! {"
            Q1,Name,Q2
            1,Ani,5
            4,Budi,
            4,Citra,3
            3,Dodi,4
            5,Eka,2
        "};
        let responses = DataLoader::default()
            .load_bytes(csv.as_bytes(), SourceFormat::Csv)
            .unwrap();
        let dashboard = Dashboard::build("kuesioner.csv", SourceFormat::Csv, responses);

        assert_eq!(dashboard.table.question_names(), vec!["Q1", "Q2"]);
        assert_eq!(dashboard.stats.overall.total(), 9);
        assert_eq!(dashboard.stats.per_question.get("Q1", Score::new(4).unwrap()), 2);
        let q1 = dashboard.stats.means.get("Q1").flatten().unwrap();
        assert!((q1 - 3.4).abs() < 1e-9);
        assert_eq!(dashboard.stats.sentiment.positive, 5);
        assert_eq!(dashboard.stats.sentiment.neutral, 2);
        assert_eq!(dashboard.stats.sentiment.negative, 2);
        assert_eq!(
            dashboard.summary(),
            "Loaded kuesioner.csv (CSV): 5 respondents, 2 questions, 9 answers \
             (dropped non-numeric: Name)"
        );
    }

    #[test]
    fn text_only_upload_renders_empty_views() {
        let responses = DataLoader::default()
            .load_bytes(b"Name\nAni\n", SourceFormat::Csv)
            .unwrap();
        let dashboard = Dashboard::build("names.csv", SourceFormat::Csv, responses);

        assert!(dashboard.table.is_empty());
        assert!(dashboard.stats.overall.is_empty());
        assert!(dashboard.stats.means.is_empty());
        assert!(dashboard.stats.sentiment.is_empty());
    }

    #[test]
    fn blank_csv_column_has_an_undefined_mean() {
        let responses = DataLoader::default()
            .load_bytes(b"Q1,Q2\n4,\n5,\n", SourceFormat::Csv)
            .unwrap();
        let dashboard = Dashboard::build("blank.csv", SourceFormat::Csv, responses);

        assert_eq!(dashboard.table.question_names(), vec!["Q1", "Q2"]);
        assert_eq!(dashboard.stats.means.get("Q1"), Some(Some(4.5)));
        assert_eq!(dashboard.stats.means.get("Q2"), Some(None));
    }

    #[test]
    fn load_rejects_unknown_extension_before_reading() {
        let err =
            Dashboard::load(&DataLoader::default(), Path::new("survey.docx"), None).unwrap_err();
        assert!(matches!(err, LoaderError::Format(_)));
    }
}
