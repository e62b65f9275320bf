//! Statistics Calculator Module
//! Frequency tables, per-question means and sentiment buckets over a response table.

use crate::data::{ResponseTable, Score};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Score -> count, ascending by score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Score, usize>,
}

impl FrequencyTable {
    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        let mut counts = BTreeMap::new();
        for score in scores {
            *counts.entry(score).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, score: Score) -> usize {
        self.counts.get(&score).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Score, usize)> + '_ {
        self.counts.iter().map(|(score, count)| (*score, *count))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Share of each observed score, summing to 1.
    pub fn proportions(&self) -> Vec<(Score, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.iter()
            .map(|(score, count)| (score, count as f64 / total as f64))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFrequency {
    pub question: String,
    pub counts: FrequencyTable,
}

/// (question, score) -> count. Questions keep table order; unanswered ones are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerQuestionFrequency {
    entries: Vec<QuestionFrequency>,
}

impl PerQuestionFrequency {
    pub fn get(&self, question: &str, score: Score) -> usize {
        self.for_question(question)
            .map(|counts| counts.get(score))
            .unwrap_or(0)
    }

    pub fn for_question(&self, question: &str) -> Option<&FrequencyTable> {
        self.entries
            .iter()
            .find(|e| e.question == question)
            .map(|e| &e.counts)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionMean {
    pub question: String,
    /// `None` when the question has no valid answer.
    pub mean: Option<f64>,
}

/// Question -> mean score, one entry per question in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerQuestionMean {
    entries: Vec<QuestionMean>,
}

impl PerQuestionMean {
    /// Outer `None`: unknown question. Inner `None`: undefined mean.
    #[cfg(test)]
    pub fn get(&self, question: &str) -> Option<Option<f64>> {
        self.entries
            .iter()
            .find(|e| e.question == question)
            .map(|e| e.mean)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionMean> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentBucket {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBucket {
    pub const ALL: [SentimentBucket; 3] = [
        SentimentBucket::Positive,
        SentimentBucket::Neutral,
        SentimentBucket::Negative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SentimentBucket::Positive => "Positive",
            SentimentBucket::Neutral => "Neutral",
            SentimentBucket::Negative => "Negative",
        }
    }
}

/// Answers per sentiment bucket. All three buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn get(&self, bucket: SentimentBucket) -> usize {
        match bucket {
            SentimentBucket::Positive => self.positive,
            SentimentBucket::Neutral => self.neutral,
            SentimentBucket::Negative => self.negative,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SentimentBucket, usize)> + '_ {
        SentimentBucket::ALL.into_iter().map(|b| (b, self.get(b)))
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub fn classify(score: Score) -> SentimentBucket {
    match score.value() {
        4..=u8::MAX => SentimentBucket::Positive,
        3 => SentimentBucket::Neutral,
        _ => SentimentBucket::Negative,
    }
}

/// Count every answer in the table.
pub fn overall_frequency(table: &ResponseTable) -> FrequencyTable {
    FrequencyTable::from_scores(table.scores())
}

pub fn per_question_frequency(table: &ResponseTable) -> PerQuestionFrequency {
    let entries = table
        .questions()
        .iter()
        .map(|q| QuestionFrequency {
            question: q.name.clone(),
            counts: FrequencyTable::from_scores(q.scores()),
        })
        .filter(|e| !e.counts.is_empty())
        .collect();
    PerQuestionFrequency { entries }
}

pub fn per_question_mean(table: &ResponseTable) -> PerQuestionMean {
    let entries = table
        .questions()
        .iter()
        .map(|q| {
            let values: Vec<f64> = q.scores().map(Score::as_f64).collect();
            // statrs yields NaN for an empty sample
            let mean = values.mean();
            QuestionMean {
                question: q.name.clone(),
                mean: (!mean.is_nan()).then_some(mean),
            }
        })
        .collect();
    PerQuestionMean { entries }
}

pub fn sentiment_counts(table: &ResponseTable) -> SentimentCounts {
    table
        .scores()
        .fold(SentimentCounts::default(), |mut counts, score| {
            match classify(score) {
                SentimentBucket::Positive => counts.positive += 1,
                SentimentBucket::Neutral => counts.neutral += 1,
                SentimentBucket::Negative => counts.negative += 1,
            }
            counts
        })
}

/// Everything the dashboard charts, computed once per upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyStats {
    pub overall: FrequencyTable,
    pub per_question: PerQuestionFrequency,
    pub means: PerQuestionMean,
    pub sentiment: SentimentCounts,
}

impl SurveyStats {
    pub fn compute(table: &ResponseTable) -> Self {
        Self {
            overall: overall_frequency(table),
            per_question: per_question_frequency(table),
            means: per_question_mean(table),
            sentiment: sentiment_counts(table),
        }
    }
}
