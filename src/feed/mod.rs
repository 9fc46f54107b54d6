pub mod client;
pub mod messages;

use std::future::Future;

use crate::error::Result;
use crate::feed::messages::{AnswersPage, QuestionsPage, TimelinePage};

/// The question-feed collaborator consumed by the run coordinator: the tag
/// question list, the unified timeline for a set of questions, and answers
/// for a set of questions within a date window. Implemented for real by
/// [`client::StackClient`].
pub trait QuestionFeed {
    fn fetch_questions(&self) -> impl Future<Output = Result<QuestionsPage>> + Send;

    fn fetch_timeline(
        &self,
        question_ids: &[u64],
    ) -> impl Future<Output = Result<TimelinePage>> + Send;

    fn fetch_answers(
        &self,
        question_ids: &[u64],
        from_date: i64,
        to_date: i64,
    ) -> impl Future<Output = Result<AnswersPage>> + Send;
}
