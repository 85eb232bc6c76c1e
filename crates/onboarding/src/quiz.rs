//! Quiz engine: derive true/false quizzes from a chat transcript and grade them.

use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDate};
use database::quiz as quiz_store;
use database::{
    conversation, guide, GuideRef, NewQuizQuestion, QuizQuestion, QuizSummary, QuizWithQuestions,
};
use generation_core::{GenerationError, StructuredOutput};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{prompts, require_text, Onboarding, OnboardingError, Result};

/// Statements requested when the caller does not say.
pub const DEFAULT_QUESTION_COUNT: usize = 5;
/// Larger requests are clamped to this many statements.
pub const MAX_QUESTION_COUNT: usize = 20;
/// Turns of a transcript fed to quiz generation.
const TRANSCRIPT_LIMIT: i64 = 100;

/// One submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    #[serde(default)]
    pub question_id: Option<String>,
    #[serde(default)]
    pub selected: Option<bool>,
}

/// Grading outcome for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub selected: Option<bool>,
    pub correct_answer: bool,
    pub is_correct: bool,
    pub explanation: String,
    pub source_message_id: Option<i64>,
    pub guide_refs: Option<Vec<GuideRef>>,
}

/// Grading outcome for a whole quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeReport {
    pub score: usize,
    pub total: usize,
    pub results: Vec<QuestionResult>,
}

/// Grade answers against a quiz's questions.
///
/// Every question gets a result. The first answer submitted for a question id
/// wins, answers without an id match nothing, and a question with no answer
/// is graded as `selected = None`, which is never correct.
pub fn grade_questions(questions: &[QuizQuestion], answers: &[SubmittedAnswer]) -> GradeReport {
    let mut submitted: HashMap<&str, Option<bool>> = HashMap::new();
    for answer in answers {
        if let Some(id) = answer.question_id.as_deref() {
            submitted.entry(id).or_insert(answer.selected);
        }
    }

    let results: Vec<QuestionResult> = questions
        .iter()
        .map(|question| {
            let selected = submitted.get(question.id.as_str()).copied().flatten();
            QuestionResult {
                question_id: question.id.clone(),
                selected,
                correct_answer: question.correct_answer,
                is_correct: selected == Some(question.correct_answer),
                explanation: question.explanation.clone(),
                source_message_id: question.source_message_id,
                guide_refs: question.guide_refs.as_ref().map(|refs| refs.0.clone()),
            }
        })
        .collect();

    let score = results.iter().filter(|r| r.is_correct).count();
    GradeReport {
        score,
        total: results.len(),
        results,
    }
}

/// Turn generator output into quiz questions.
///
/// Reads the first JSON array in the output. Items without a non-blank `text`
/// or a boolean `correct_answer` are skipped. A `source_message_id` that is not
/// one of `transcript_ids` becomes `None`, and guide refs to unknown guides are
/// dropped. At most `limit` questions are returned, each with a fresh id.
pub fn parse_quiz_questions(
    output: &StructuredOutput,
    transcript_ids: &HashSet<i64>,
    guide_ids: &HashSet<i64>,
    limit: usize,
) -> Vec<NewQuizQuestion> {
    let Some(items) = output.array() else {
        debug!("No JSON array in quiz output");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| parse_item(item, transcript_ids, guide_ids))
        .take(limit)
        .collect()
}

fn parse_item(
    item: &Value,
    transcript_ids: &HashSet<i64>,
    guide_ids: &HashSet<i64>,
) -> Option<NewQuizQuestion> {
    let fields = item.as_object()?;

    let text = fields.get("text")?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    let correct_answer = field(fields, "correct_answer", "correctAnswer")?.as_bool()?;

    let explanation = fields
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let source_message_id = field(fields, "source_message_id", "sourceMessageId")
        .and_then(message_id)
        .filter(|id| transcript_ids.contains(id));

    let guide_refs = field(fields, "guide_refs", "guideRefs")
        .and_then(|value| serde_json::from_value::<Vec<GuideRef>>(value.clone()).ok())
        .map(|refs| {
            refs.into_iter()
                .filter(|r| guide_ids.contains(&r.guide_id))
                .collect::<Vec<_>>()
        })
        .filter(|refs| !refs.is_empty());

    Some(NewQuizQuestion {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        correct_answer,
        explanation,
        source_message_id,
        guide_refs,
    })
}

/// Look up a key under its snake_case or camelCase spelling.
fn field<'a>(fields: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    fields.get(snake).or_else(|| fields.get(camel))
}

fn message_id(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Title used when the caller does not supply one.
pub fn default_quiz_title(session_title: Option<&str>, date: NaiveDate) -> String {
    let source = session_title.filter(|t| !t.is_empty()).unwrap_or("chat");
    format!("Quiz from {} - {}", source, date.format("%-m/%-d/%Y"))
}

impl Onboarding {
    /// Generate and store a quiz from a chat session's transcript.
    pub async fn generate_quiz(
        &self,
        chat_id: &str,
        question_count: Option<usize>,
        title: Option<&str>,
    ) -> Result<QuizWithQuestions> {
        require_text(chat_id, "chatId is required")?;

        let requested = question_count.unwrap_or(DEFAULT_QUESTION_COUNT);
        if requested == 0 {
            return Err(OnboardingError::validation(
                "questionCount must be a positive number",
            ));
        }
        if requested > MAX_QUESTION_COUNT {
            debug!(requested, max = MAX_QUESTION_COUNT, "Clamping quiz size");
        }
        let count = requested.min(MAX_QUESTION_COUNT);

        let session = self.require_session(chat_id).await?;
        let pool = self.db.pool();

        let transcript = conversation::transcript(pool, chat_id, TRANSCRIPT_LIMIT).await?;
        if transcript.is_empty() {
            return Err(OnboardingError::EmptySource(
                "No messages in chat to generate quiz from".to_string(),
            ));
        }
        let guides = guide::list_guides(pool).await?;

        let output = self
            .generate_structured(&prompts::quiz_prompt(&transcript, &guides, count))
            .await?;

        let transcript_ids: HashSet<i64> = transcript.iter().map(|t| t.id).collect();
        let guide_ids: HashSet<i64> = guides.iter().map(|g| g.id).collect();
        let questions = parse_quiz_questions(&output, &transcript_ids, &guide_ids, count);

        if questions.is_empty() {
            warn!(chat_id, raw_len = output.raw().len(), "Quiz output had no usable questions");
            return Err(GenerationError::ProcessingFailed(
                "no quiz questions could be parsed".to_string(),
            )
            .into());
        }

        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => default_quiz_title(session.title.as_deref(), Local::now().date_naive()),
        };

        let quiz_id = Uuid::new_v4().to_string();
        let quiz =
            quiz_store::create_quiz(pool, &quiz_id, &title, Some(chat_id), &questions).await?;

        info!(
            quiz_id = %quiz.quiz.id,
            chat_id,
            requested = count,
            questions = quiz.questions.len(),
            "Quiz generated"
        );

        Ok(quiz)
    }

    /// Grade answers for a stored quiz. Nothing is written.
    pub async fn grade_quiz(&self, quiz_id: &str, answers: &[SubmittedAnswer]) -> Result<GradeReport> {
        let quiz = quiz_store::get_quiz(self.db.pool(), quiz_id).await?;
        let report = grade_questions(&quiz.questions, answers);

        debug!(quiz_id, score = report.score, total = report.total, "Quiz graded");
        Ok(report)
    }

    /// Delete a quiz and its questions.
    pub async fn delete_quiz(&self, quiz_id: &str) -> Result<()> {
        quiz_store::delete_quiz(self.db.pool(), quiz_id).await?;
        info!(quiz_id, "Quiz deleted");
        Ok(())
    }

    /// All quizzes, newest first.
    pub async fn list_quizzes(&self) -> Result<Vec<QuizSummary>> {
        Ok(quiz_store::list_quizzes(self.db.pool()).await?)
    }

    /// A quiz with its questions.
    pub async fn get_quiz(&self, quiz_id: &str) -> Result<QuizWithQuestions> {
        Ok(quiz_store::get_quiz(self.db.pool(), quiz_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::service_with;
    use database::{qa_pair, Json};
    use mock_generator::ScriptedGenerator;
    use std::sync::Arc;

    fn question(id: &str, correct_answer: bool) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            quiz_id: "quiz".to_string(),
            text: format!("Statement {id}"),
            correct_answer,
            explanation: String::new(),
            source_message_id: None,
            guide_refs: Some(Json(vec![GuideRef {
                guide_id: 1,
                section: None,
            }])),
            source_question: None,
        }
    }

    fn answer(id: &str, selected: Option<bool>) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: Some(id.to_string()),
            selected,
        }
    }

    #[test]
    fn test_grade_one_of_two() {
        let questions = [question("q1", true), question("q2", false)];
        let report = grade_questions(
            &questions,
            &[answer("q1", Some(true)), answer("q2", Some(true))],
        );

        assert_eq!(report.score, 1);
        assert_eq!(report.total, 2);
        assert!(report.results[0].is_correct);
        assert!(!report.results[1].is_correct);
        assert_eq!(report.results[0].guide_refs.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_grade_missing_answer_is_null_and_incorrect() {
        let questions = [question("q1", false), question("q2", true)];
        let report = grade_questions(&questions, &[answer("q2", Some(true))]);

        assert_eq!(report.results[0].selected, None);
        assert!(!report.results[0].is_correct);
        assert_eq!(report.score, 1);

        let json = serde_json::to_value(&report.results[0]).unwrap();
        assert_eq!(json["questionId"], "q1");
        assert!(json["selected"].is_null());
        assert_eq!(json["is_correct"], false);
    }

    #[test]
    fn test_grade_first_answer_wins_and_unknown_ids_ignored() {
        let questions = [question("q1", true)];
        let report = grade_questions(
            &questions,
            &[
                answer("q1", Some(false)),
                answer("q1", Some(true)),
                answer("other", Some(true)),
            ],
        );

        assert_eq!(report.total, 1);
        assert_eq!(report.results[0].selected, Some(false));
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_grade_ignores_answers_without_question_id() {
        let questions = [question("q1", true), question("q2", false)];
        let answers: Vec<SubmittedAnswer> = serde_json::from_value(serde_json::json!([
            {"questionId": "q1", "selected": true},
            {"selected": false}
        ]))
        .unwrap();

        let report = grade_questions(&questions, &answers);
        assert_eq!(report.score, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.results[1].selected, None);
        assert!(!report.results[1].is_correct);
    }

    #[test]
    fn test_parse_filters_items_and_weak_references() {
        let output = StructuredOutput::new(
            r#"Here you go:
            [
              {"text": "Rust is compiled", "correct_answer": true, "explanation": "rustc", "source_message_id": 7, "guide_refs": [{"guideId": 3, "section": "Setup"}]},
              {"text": "Missing answer"},
              {"text": "String answer", "correct_answer": "true"},
              {"text": "   ", "correct_answer": false},
              {"text": "Dangling", "correctAnswer": false, "sourceMessageId": 99, "guide_refs": [{"guideId": 42}]},
              {"text": "Extra", "correct_answer": true}
            ]
            Hope that helps."#,
        );

        let transcript_ids = HashSet::from([7]);
        let guide_ids = HashSet::from([3]);
        let questions = parse_quiz_questions(&output, &transcript_ids, &guide_ids, 2);

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Rust is compiled");
        assert_eq!(questions[0].source_message_id, Some(7));
        assert_eq!(questions[0].guide_refs.as_ref().unwrap()[0].guide_id, 3);
        assert_eq!(questions[1].text, "Dangling");
        assert!(!questions[1].correct_answer);
        assert_eq!(questions[1].source_message_id, None);
        assert_eq!(questions[1].guide_refs, None);
        assert_ne!(questions[0].id, questions[1].id);
    }

    #[test]
    fn test_parse_without_array_is_empty() {
        let output = StructuredOutput::new("I could not think of any questions.");
        assert!(parse_quiz_questions(&output, &HashSet::new(), &HashSet::new(), 5).is_empty());
    }

    #[test]
    fn test_default_title_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            default_quiz_title(Some("What is X?"), date),
            "Quiz from What is X? - 3/7/2025"
        );
        assert_eq!(default_quiz_title(None, date), "Quiz from chat - 3/7/2025");
    }

    #[tokio::test]
    async fn test_generate_requires_session_with_turns() {
        let generator = Arc::new(ScriptedGenerator::new());
        let service = service_with(generator.clone()).await;

        assert!(matches!(
            service.generate_quiz("missing", None, None).await,
            Err(OnboardingError::NotFound { .. })
        ));

        service.ensure_session("empty").await.unwrap();
        assert!(matches!(
            service.generate_quiz("empty", None, None).await,
            Err(OnboardingError::EmptySource(_))
        ));

        assert!(matches!(
            service.generate_quiz("empty", Some(0), None).await,
            Err(OnboardingError::Validation(_))
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_output_persists_no_quiz() {
        let generator = Arc::new(ScriptedGenerator::with_replies(["Sorry, no quiz today."]));
        let service = service_with(generator).await;
        service.append_turn("s1", "What is X?", "X is Y.", &[]).await.unwrap();

        let result = service.generate_quiz("s1", Some(3), None).await;
        assert!(matches!(result, Err(OnboardingError::Generation(_))));
        assert!(service.list_quizzes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_title_and_source_question() {
        let generator = Arc::new(ScriptedGenerator::new());
        let service = service_with(generator.clone()).await;
        let turn = service.append_turn("s1", "What is X?", "X is Y.", &[]).await.unwrap();

        generator
            .push_reply(format!(
                r#"[{{"text": "X is Y", "correct_answer": true, "source_message_id": {turn}}}]"#
            ))
            .await;

        let quiz = service.generate_quiz("s1", Some(1), Some("  Week one  ")).await.unwrap();
        assert_eq!(quiz.quiz.title, "Week one");
        assert_eq!(quiz.quiz.source_chat_id.as_deref(), Some("s1"));
        assert_eq!(quiz.questions[0].source_message_id, Some(turn));
        assert_eq!(quiz.questions[0].source_question.as_deref(), Some("What is X?"));
        assert!(generator.last_prompt().await.unwrap().contains(&format!("(message id {turn})")));
    }

    #[tokio::test]
    async fn test_large_question_count_is_clamped() {
        let generator = Arc::new(ScriptedGenerator::new());
        let service = service_with(generator.clone()).await;
        service.append_turn("s1", "What is X?", "X is Y.", &[]).await.unwrap();

        generator
            .push_reply(r#"[{"text": "X is Y", "correct_answer": true}]"#)
            .await;

        let quiz = service.generate_quiz("s1", Some(500), None).await.unwrap();
        assert_eq!(quiz.questions.len(), 1);
        let prompt = generator.last_prompt().await.unwrap();
        assert!(prompt.contains(&format!("Generate {MAX_QUESTION_COUNT} ")));
    }

    #[tokio::test]
    async fn test_end_to_end_session_to_quiz() {
        let generator = Arc::new(ScriptedGenerator::with_replies([
            "X is a build tool.",
            r#"```json
            [
              {"text": "X is a build tool", "correct_answer": true, "explanation": "Stated in the answer"},
              {"text": "X is a database", "correct_answer": false, "explanation": "It builds code"},
              {"text": "X was asked about twice", "correct_answer": true, "explanation": "Two turns"},
              {"text": "One too many", "correct_answer": false}
            ]
            ```"#,
        ]));
        let service = service_with(generator.clone()).await;
        let pool = service.database().pool();

        let first = service.ask("What is X?", "s1").await.unwrap();
        assert_eq!(qa_pair::count(pool).await.unwrap(), 1);
        let chat = service.get_chat("s1").await.unwrap();
        assert_eq!(chat.session.title.as_deref(), Some("What is X?"));
        assert_eq!(chat.messages.len(), 1);

        let second = service.ask("What is X?", "s1").await.unwrap();
        assert_eq!(second.answer, first.answer);
        let pair = qa_pair::get(pool, second.context_used[0].id).await.unwrap();
        assert_eq!(pair.usage_count, 1);
        let chat = service.get_chat("s1").await.unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.session.title.as_deref(), Some("What is X?"));

        let quiz = service.generate_quiz("s1", Some(3), None).await.unwrap();
        assert_eq!(quiz.questions.len(), 3);
        assert!(quiz.quiz.title.starts_with("Quiz from What is X? - "));
        assert_eq!(generator.calls(), 2);

        let listed = service.list_quizzes().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].question_count, 3);
        assert_eq!(listed[0].chat_title.as_deref(), Some("What is X?"));

        let report = service
            .grade_quiz(
                &quiz.quiz.id,
                &[
                    answer(&quiz.questions[0].id, Some(true)),
                    answer(&quiz.questions[1].id, Some(true)),
                ],
            )
            .await
            .unwrap();
        assert_eq!((report.score, report.total), (1, 3));

        service.delete_quiz(&quiz.quiz.id).await.unwrap();
        assert!(service.list_quizzes().await.unwrap().is_empty());
        assert!(matches!(
            service.get_quiz(&quiz.quiz.id).await,
            Err(OnboardingError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete_quiz(&quiz.quiz.id).await,
            Err(OnboardingError::NotFound { .. })
        ));
        assert!(matches!(
            service.grade_quiz(&quiz.quiz.id, &[]).await,
            Err(OnboardingError::NotFound { .. })
        ));
    }
}
