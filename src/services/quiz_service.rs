use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::question::{
    option_label, AppropriatenessDetails, ChoiceDetails, FillInBlankDetails, Question,
    QuestionDetails, QuizOption, ScenarioDetails, SequenceDetails, Statement, StatementDetails,
    SubQuestion, SubQuestionDisplay,
};
use crate::models::quiz_type::{
    Layout, OptionMedia, QuestionShape, QuizType, APPROPRIATENESS_LABELS, TRUTH_OPTIONS,
};
use crate::services::ai_service::Generator;
use crate::services::image_service::{ImageService, StoredKeys, BANNER_SIZE, OPTION_SIZE};
use crate::services::parser::{parse_question, ParsedChoice, ParsedQuestion};
use crate::services::prompt::{banner_prompt, question_prompt, SYSTEM_PROMPT};
use crate::services::retry::RetryPolicy;
use crate::storage::image_store::image_path;

#[derive(Debug, Clone)]
pub struct QuizRequest {
    pub number: i64,
    pub subject: String,
    pub tone: String,
    pub quiz_type: QuizType,
}

#[derive(Clone)]
pub struct QuizService {
    generator: Arc<dyn Generator>,
    images: ImageService,
    retry: RetryPolicy,
    max_questions: usize,
}

impl QuizService {
    pub fn new(
        generator: Arc<dyn Generator>,
        images: ImageService,
        retry: RetryPolicy,
        max_questions: usize,
    ) -> Self {
        Self {
            generator,
            images,
            retry,
            max_questions: max_questions.max(1),
        }
    }

    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    pub fn validate_count(&self, number: i64) -> Result<usize> {
        if number < 1 || number > self.max_questions as i64 {
            return Err(Error::BadRequest(format!(
                "Number of questions must be between 1 and {}",
                self.max_questions
            )));
        }
        Ok(number as usize)
    }

    pub async fn generate_quiz(&self, request: &QuizRequest) -> Result<Vec<Question>> {
        let count = self.validate_count(request.number)?;
        let quiz_id = Uuid::new_v4();
        tracing::info!(
            %quiz_id,
            quiz_type = request.quiz_type.code(),
            count,
            subject = %request.subject,
            tone = %request.tone,
            "Generating quiz"
        );

        let stored = StoredKeys::default();
        let mut questions = Vec::with_capacity(count);
        for idx in 0..count {
            match self.generate_question(request, &stored).await {
                Ok(mut question) => {
                    question.id = (idx as i32) + 1;
                    questions.push(question);
                }
                Err(e) => {
                    let removed = self.images.discard(&stored);
                    tracing::error!(
                        %quiz_id,
                        question = idx + 1,
                        removed_images = removed,
                        error = %e,
                        "Question generation failed"
                    );
                    return Err(e);
                }
            }
        }

        tracing::info!(%quiz_id, count = questions.len(), "Quiz generated");
        Ok(questions)
    }

    async fn generate_question(
        &self,
        request: &QuizRequest,
        stored: &StoredKeys,
    ) -> Result<Question> {
        let quiz_type = request.quiz_type;
        let collection = quiz_type.collection();
        let layout = quiz_type.layout();

        let mut question = match layout {
            Layout::Choice(shape) if shape.media == OptionMedia::Image => {
                let choice = self
                    .image_choice(request, shape, &collection, stored)
                    .await?;
                Question {
                    id: 0,
                    quiz_type,
                    question: choice.question,
                    image: None,
                    details: QuestionDetails::Choice(ChoiceDetails {
                        options: choice.options,
                        correct_answers: choice.correct_answers,
                    }),
                }
            }
            Layout::Choice(shape) => {
                let parsed = self.parse_with_retry(&Layout::Choice(shape), request).await?;
                text_choice_question(quiz_type, parsed.into_choice()?)
            }
            Layout::FillInBlank => {
                match self.parse_with_retry(&layout, request).await? {
                    ParsedQuestion::FillInBlank { question, answers } => Question {
                        id: 0,
                        quiz_type,
                        question,
                        image: None,
                        details: QuestionDetails::FillInBlank(FillInBlankDetails { answers }),
                    },
                    other => return Err(unexpected(other)),
                }
            }
            Layout::Sequence { .. } => match self.parse_with_retry(&layout, request).await? {
                ParsedQuestion::Sequence { question, steps } => {
                    sequence_question(quiz_type, question, steps)
                }
                other => return Err(unexpected(other)),
            },
            Layout::Statements { .. } => {
                match self.parse_with_retry(&layout, request).await? {
                    ParsedQuestion::Statements { statements, answers } => {
                        statements_question(quiz_type, &request.subject, statements, answers)
                    }
                    other => return Err(unexpected(other)),
                }
            }
            Layout::Appropriateness => {
                match self.parse_with_retry(&layout, request).await? {
                    ParsedQuestion::Appropriateness {
                        question,
                        options,
                        least,
                        most,
                    } => appropriateness_question(quiz_type, question, options, least, most),
                    other => return Err(unexpected(other)),
                }
            }
            Layout::Scenario {
                sub_questions,
                shape,
            } => {
                self.scenario_question(request, sub_questions, shape, &collection, stored)
                    .await?
            }
        };

        // Scenarios already tried their own banner from the scenario text.
        let scenario = matches!(layout, Layout::Scenario { .. });
        if quiz_type.has_banner() && !scenario {
            let prompt = banner_prompt(&request.subject, &request.tone);
            question.image = self
                .images
                .materialize_optional(&prompt, BANNER_SIZE, &collection, stored)
                .await;
        }

        Ok(question)
    }

    /// Prompts, parses and shape-checks, regenerating on malformed output.
    async fn parse_with_retry(
        &self,
        layout: &Layout,
        request: &QuizRequest,
    ) -> Result<ParsedQuestion> {
        let prompt = question_prompt(layout, &request.subject, &request.tone);
        let prompt = prompt.as_str();
        let generator = &self.generator;

        self.retry
            .run("question generation", move |attempt| async move {
                let raw = generator.complete(SYSTEM_PROMPT, prompt).await?;
                parse_question(&raw, layout).map_err(|e| {
                    tracing::warn!(attempt, error = %e, "Model output failed shape check");
                    Error::from(e)
                })
            })
            .await
    }

    /// Image options must all materialize; otherwise the question is
    /// regenerated, up to the attempt ceiling.
    async fn image_choice(
        &self,
        request: &QuizRequest,
        shape: QuestionShape,
        collection: &str,
        stored: &StoredKeys,
    ) -> Result<LabelledChoice> {
        let layout = Layout::Choice(shape);
        let max_attempts = self.retry.max_attempts;
        let mut attempt = 1;

        let (parsed, keys) = loop {
            let parsed = self.parse_with_retry(&layout, request).await?.into_choice()?;
            match self
                .images
                .materialize_all(&parsed.options, OPTION_SIZE, collection, stored)
                .await
            {
                Ok(keys) => break (parsed, keys),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "Option image failed, regenerating question"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let paths: Vec<String> = keys.iter().map(|k| image_path(k)).collect();
        let (paths, correct) = shuffle_with_answers(paths, &parsed.correct);
        let options = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| QuizOption::image(option_label(i), path))
            .collect();

        Ok(LabelledChoice {
            question: parsed.question,
            options,
            correct_answers: correct.into_iter().map(option_label).collect(),
        })
    }

    async fn scenario_question(
        &self,
        request: &QuizRequest,
        sub_question_count: usize,
        shape: QuestionShape,
        collection: &str,
        stored: &StoredKeys,
    ) -> Result<Question> {
        let main_shape = shape.with_media(OptionMedia::Text);
        let main = self
            .parse_with_retry(&Layout::Choice(main_shape), request)
            .await?
            .into_choice()?;
        let banner = self
            .images
            .materialize_optional(&main.question, BANNER_SIZE, collection, stored)
            .await;

        let mut sub_questions = Vec::with_capacity(sub_question_count);
        for number in 1..=sub_question_count {
            let choice = if shape.media == OptionMedia::Image {
                self.image_choice(request, shape, collection, stored).await?
            } else {
                let parsed = self
                    .parse_with_retry(&Layout::Choice(shape), request)
                    .await?
                    .into_choice()?;
                LabelledChoice {
                    options: text_options(&parsed.options),
                    correct_answers: parsed.correct.into_iter().map(option_label).collect(),
                    question: parsed.question,
                }
            };

            let mut display = random_display();
            let image = if display == SubQuestionDisplay::Text {
                None
            } else {
                self.images
                    .materialize_optional(&choice.question, OPTION_SIZE, collection, stored)
                    .await
            };
            if image.is_none() {
                display = SubQuestionDisplay::Text;
            }

            sub_questions.push(SubQuestion {
                number,
                display,
                question: (display != SubQuestionDisplay::Image).then_some(choice.question),
                image,
                options: choice.options,
                correct_answers: choice.correct_answers,
            });
        }

        Ok(Question {
            id: 0,
            quiz_type: request.quiz_type,
            question: main.question,
            image: banner,
            details: QuestionDetails::Scenario(ScenarioDetails { sub_questions }),
        })
    }
}

/// A choice question ready to serialize, with labelled options.
struct LabelledChoice {
    question: String,
    options: Vec<QuizOption>,
    correct_answers: Vec<String>,
}

fn unexpected(parsed: ParsedQuestion) -> Error {
    Error::Internal(format!("Parser returned an unexpected layout: {:?}", parsed))
}

fn text_options(options: &[String]) -> Vec<QuizOption> {
    options
        .iter()
        .enumerate()
        .map(|(i, text)| QuizOption::text(option_label(i), text.clone()))
        .collect()
}

fn text_choice_question(quiz_type: QuizType, parsed: ParsedChoice) -> Question {
    Question {
        id: 0,
        quiz_type,
        question: parsed.question,
        image: None,
        details: QuestionDetails::Choice(ChoiceDetails {
            options: text_options(&parsed.options),
            correct_answers: parsed.correct.into_iter().map(option_label).collect(),
        }),
    }
}

fn sequence_question(quiz_type: QuizType, question: String, steps: Vec<String>) -> Question {
    let (steps, order) = shuffle_sequence(steps);
    Question {
        id: 0,
        quiz_type,
        question,
        image: None,
        details: QuestionDetails::Sequence(SequenceDetails {
            steps,
            correct_order: order,
        }),
    }
}

fn statements_question(
    quiz_type: QuizType,
    subject: &str,
    statements: Vec<String>,
    answers: Vec<usize>,
) -> Question {
    let options = TRUTH_OPTIONS
        .iter()
        .enumerate()
        .map(|(i, text)| QuizOption::text(option_label(i), *text))
        .collect();
    let statements = statements
        .into_iter()
        .zip(answers)
        .map(|(statement, answer)| Statement {
            statement,
            correct_answer: option_label(answer),
        })
        .collect();

    Question {
        id: 0,
        quiz_type,
        question: format!(
            "Read the following statements about {} and decide whether each one is \
             True, False or Cannot Tell.",
            subject
        ),
        image: None,
        details: QuestionDetails::Statements(StatementDetails { options, statements }),
    }
}

fn appropriateness_question(
    quiz_type: QuizType,
    question: String,
    options: Vec<String>,
    least: usize,
    most: usize,
) -> Question {
    let options = options
        .into_iter()
        .zip(APPROPRIATENESS_LABELS)
        .map(|(text, label)| QuizOption::text(label, text))
        .collect();

    Question {
        id: 0,
        quiz_type,
        question,
        image: None,
        details: QuestionDetails::Appropriateness(AppropriatenessDetails {
            options,
            least_appropriate: APPROPRIATENESS_LABELS[least].to_string(),
            most_appropriate: APPROPRIATENESS_LABELS[most].to_string(),
        }),
    }
}

/// Shuffles `items` and returns the new zero-based positions of the
/// entries that were at `correct`, in ascending order.
fn shuffle_with_answers<T: Clone>(items: Vec<T>, correct: &[usize]) -> (Vec<T>, Vec<usize>) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.shuffle(&mut rand::thread_rng());

    let shuffled = order.iter().map(|&i| items[i].clone()).collect();
    let mut remapped: Vec<usize> = order
        .iter()
        .enumerate()
        .filter(|(_, original)| correct.contains(*original))
        .map(|(pos, _)| pos)
        .collect();
    remapped.sort_unstable();
    (shuffled, remapped)
}

/// Shuffles steps given in the correct order. The returned order lists the
/// one-based displayed position of each step, first step first.
fn shuffle_sequence(steps: Vec<String>) -> (Vec<String>, Vec<usize>) {
    let mut order: Vec<usize> = (0..steps.len()).collect();
    order.shuffle(&mut rand::thread_rng());

    let mut positions = vec![0; steps.len()];
    for (pos, &original) in order.iter().enumerate() {
        positions[original] = pos + 1;
    }
    let shuffled = order.iter().map(|&i| steps[i].clone()).collect();
    (shuffled, positions)
}

fn random_display() -> SubQuestionDisplay {
    match rand::thread_rng().gen_range(0..3) {
        0 => SubQuestionDisplay::Text,
        1 => SubQuestionDisplay::Image,
        _ => SubQuestionDisplay::TextWithImage,
    }
}
