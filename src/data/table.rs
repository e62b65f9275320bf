//! Response Table Module
//! Respondent x question grid of Likert scores, the common output of both mappers.

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0} is not a score on the 1-5 scale")]
pub struct InvalidScore(pub f64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("column {question:?} has {found} rows, expected {expected}")]
    RaggedColumn {
        question: String,
        expected: usize,
        found: usize,
    },
}

/// A single Likert answer, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Every score in ascending order.
    pub fn all() -> impl Iterator<Item = Score> {
        (Self::MIN..=Self::MAX).map(Score)
    }
}

impl TryFrom<i64> for Score {
    type Error = InvalidScore;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Score::new)
            .ok_or(InvalidScore(value as f64))
    }
}

impl TryFrom<f64> for Score {
    type Error = InvalidScore;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() && value.fract() == 0.0 {
            Score::try_from(value as i64).map_err(|_| InvalidScore(value))
        } else {
            Err(InvalidScore(value))
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One questionnaire column. `None` cells are missing answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub name: String,
    pub cells: Vec<Option<Score>>,
}

impl Question {
    pub fn new(name: impl Into<String>, cells: Vec<Option<Score>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Non-missing answers in row order.
    pub fn scores(&self) -> impl Iterator<Item = Score> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn answered(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Rows are respondents, columns are questions in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseTable {
    questions: Vec<Question>,
    rows: usize,
}

impl ResponseTable {
    /// Repeated question names get a `.1`, `.2`, ... suffix so every name is unique.
    pub fn new(mut questions: Vec<Question>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for question in &mut questions {
            if !seen.insert(question.name.clone()) {
                let renamed = (1..)
                    .map(|n| format!("{}.{}", question.name, n))
                    .find(|candidate| !seen.contains(candidate))
                    .unwrap_or_default();
                seen.insert(renamed.clone());
                question.name = renamed;
            }
        }

        let rows = questions.first().map(|q| q.cells.len()).unwrap_or(0);
        if let Some(bad) = questions.iter().find(|q| q.cells.len() != rows) {
            return Err(TableError::RaggedColumn {
                question: bad.name.clone(),
                expected: rows,
                found: bad.cells.len(),
            });
        }
        Ok(Self { questions, rows })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_names(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() || self.rows == 0
    }

    /// All non-missing answers, flattened.
    pub fn scores(&self) -> impl Iterator<Item = Score> + '_ {
        self.questions.iter().flat_map(Question::scores)
    }

    pub fn answered(&self) -> usize {
        self.questions.iter().map(Question::answered).sum()
    }

    /// Get the first `n` respondents as rows.
    pub fn head(&self, n: usize) -> Vec<Vec<Option<Score>>> {
        (0..self.rows.min(n))
            .map(|row| self.questions.iter().map(|q| q.cells[row]).collect())
            .collect()
    }
}
