//! Stats module - frequency, mean and sentiment aggregation

mod calculator;

pub use calculator::{
    FrequencyTable, PerQuestionFrequency, PerQuestionMean, SentimentBucket, SentimentCounts,
    SurveyStats,
};
