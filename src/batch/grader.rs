use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::{
    error::GraderError,
    interpret::interpret_response,
    prompt::build_grading_prompt,
    provider::GradingProvider,
    record::QaRecord,
    verdict::ScoredVerdict,
};

use super::types::{
    mean_score, BatchSummary, GradingOptions, Progress, AVERAGE_FIELD, EVALUATION_FIELD,
    RESULTS_FIELD,
};

/// Grades the leading records of a results document with a grader model.
pub struct BatchGrader<P> {
    provider: P,
    options: GradingOptions,
}

impl<P: GradingProvider> BatchGrader<P> {
    pub fn new(provider: P, options: GradingOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &GradingOptions {
        &self.options
    }

    /// Builds the prompt for one record, asks the grader, and scores the reply.
    ///
    /// Only transport failures and timeouts are errors; any reply text yields a verdict.
    pub async fn grade_record(&self, record: &QaRecord<'_>) -> Result<ScoredVerdict, GraderError> {
        let prompt = build_grading_prompt(record);
        self.grade_prompt(&prompt).await
    }

    async fn grade_prompt(&self, prompt: &str) -> Result<ScoredVerdict, GraderError> {
        let raw = match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.complete(prompt))
                .await
                .map_err(|_| GraderError::Timeout(limit.as_secs()))??,
            None => self.provider.complete(prompt).await?,
        };
        Ok(interpret_response(&raw))
    }

    /// Grades the first `sample_limit` entries of `document["results"]`.
    ///
    /// On success every graded entry gains a `reasoning_evaluation` object and the
    /// document gains `reasoning_average_score`; nothing else changes. On error the
    /// document is left untouched. `on_progress` is called once per graded record.
    pub async fn grade_document<F>(
        &self,
        document: &mut Value,
        mut on_progress: F,
    ) -> Result<BatchSummary, GraderError>
    where
        F: FnMut(&Progress),
    {
        let results = document
            .get(RESULTS_FIELD)
            .and_then(Value::as_array)
            .ok_or(GraderError::MissingResults)?;
        let total_records = results.len();
        let take = self
            .options
            .sample_limit
            .map_or(total_records, |limit| limit.min(total_records));
        if take == 0 {
            return Err(GraderError::EmptyBatch);
        }
        log::info!("grading reasoning for {take} of {total_records} results");

        let prompts = results
            .iter()
            .take(take)
            .enumerate()
            .map(|(index, entry)| {
                QaRecord::from_entry(index, entry).map(|record| build_grading_prompt(&record))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut verdicts = stream::iter(prompts.into_iter().enumerate())
            .map(|(index, prompt)| async move { (index, self.grade_prompt(&prompt).await) })
            .buffered(self.options.concurrency.max(1));

        let mut graded: Vec<ScoredVerdict> = Vec::with_capacity(take);
        while let Some((index, verdict)) = verdicts.next().await {
            let verdict = verdict?;
            log::debug!(
                "result #{index}: {} (score {})",
                verdict.reasoning_quality,
                verdict.score
            );
            let progress = Progress {
                index,
                completed: graded.len() + 1,
                total: take,
                label: verdict.reasoning_quality.clone(),
                score: verdict.score,
            };
            graded.push(verdict);
            on_progress(&progress);
        }

        let scores: Vec<u8> = graded.iter().map(|v| v.score).collect();
        let average = mean_score(&scores)?;
        let mut label_counts = BTreeMap::new();
        for verdict in &graded {
            *label_counts
                .entry(verdict.reasoning_quality.clone())
                .or_insert(0) += 1;
        }

        attach(document, graded, average)?;
        log::info!("average reasoning score {average:.4} over {take} results");

        Ok(BatchSummary {
            scores,
            average,
            label_counts,
            total_records,
        })
    }
}

fn attach(
    document: &mut Value,
    graded: Vec<ScoredVerdict>,
    average: f64,
) -> Result<(), GraderError> {
    let results = document
        .get_mut(RESULTS_FIELD)
        .and_then(Value::as_array_mut)
        .ok_or(GraderError::MissingResults)?;
    for (entry, verdict) in results.iter_mut().zip(graded) {
        if let Value::Object(fields) = entry {
            fields.insert(EVALUATION_FIELD.to_string(), serde_json::to_value(verdict)?);
        }
    }
    if let Value::Object(fields) = document {
        fields.insert(AVERAGE_FIELD.to_string(), Value::from(average));
    }
    Ok(())
}
