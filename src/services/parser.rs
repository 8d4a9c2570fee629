//! Turns a completion into a shape-checked question.
//!
//! The model is asked for a JSON object. Replies that are not JSON are read
//! with the bold-marker layout (`**Question:**`, `**Options:**`, ...) the
//! prompts used to request, so older prompt templates keep working.

use serde_json::Value as JsonValue;

use crate::models::quiz_type::{Layout, QuestionShape, TRUTH_OPTIONS};
use crate::utils::text::{list_items, section, split_list, strip_code_fence, strip_list_marker};

const QUESTION: &str = "**Question:**";
const QUESTION_TEXT: &str = "**Question Text:**";
const OPTIONS: &str = "**Options:**";
const CORRECT_ANSWER: &str = "**Correct Answer:**";
const CORRECT_ANSWERS: &str = "**Correct Answers:**";
const ANSWERS: &str = "**Answers:**";
const STEPS: &str = "**Steps:**";
const STATEMENTS: &str = "**Statements:**";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("model output is empty")]
    Empty,

    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("missing `{0}` in model output")]
    MissingField(&'static str),

    #[error("expected {expected} options, found {found}")]
    OptionCount { expected: usize, found: usize },

    #[error("expected {expected} entries in `{field}`, found {found}")]
    ItemCount {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("correct answer `{0}` is not among the options")]
    AnswerNotInOptions(String),

    #[error("expected between {min} and {max} correct answers, found {found}")]
    AnswerCount { min: usize, max: usize, found: usize },

    #[error("inconsistent answer: {0}")]
    Inconsistent(String),
}

/// A choice question with zero-based correct indices into `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChoice {
    pub question: String,
    pub options: Vec<String>,
    pub correct: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuestion {
    Choice(ParsedChoice),
    FillInBlank {
        question: String,
        answers: Vec<String>,
    },
    /// Steps listed in the correct order.
    Sequence { question: String, steps: Vec<String> },
    /// `answers[i]` indexes [`TRUTH_OPTIONS`] for `statements[i]`.
    Statements {
        statements: Vec<String>,
        answers: Vec<usize>,
    },
    Appropriateness {
        question: String,
        options: Vec<String>,
        least: usize,
        most: usize,
    },
}

impl ParsedQuestion {
    pub fn into_choice(self) -> Result<ParsedChoice, ParseError> {
        match self {
            ParsedQuestion::Choice(choice) => Ok(choice),
            _ => Err(ParseError::MissingField("options")),
        }
    }
}

pub fn parse_question(raw: &str, layout: &Layout) -> Result<ParsedQuestion, ParseError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ParseError::Empty);
    }

    if body.starts_with('{') {
        let value: JsonValue =
            serde_json::from_str(body).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
        return from_json(&value, layout);
    }

    from_markers(body, layout)
}

fn from_json(v: &JsonValue, layout: &Layout) -> Result<ParsedQuestion, ParseError> {
    match layout {
        Layout::Choice(shape) | Layout::Scenario { shape, .. } => {
            let question = json_text(v, &["question", "question_text"])
                .ok_or(ParseError::MissingField("question"))?;
            let options =
                json_list(v, &["options"]).ok_or(ParseError::MissingField("options"))?;
            let answers = json_field(v, &["correct_answers", "correct_answer"])
                .ok_or(ParseError::MissingField("correct_answers"))?;
            check_option_count(&options, shape.option_count)?;
            let correct = json_answers(answers, &options)?;
            build_choice(question, options, correct, shape).map(ParsedQuestion::Choice)
        }
        Layout::FillInBlank => {
            let question =
                json_text(v, &["question"]).ok_or(ParseError::MissingField("question"))?;
            let answers = json_list(v, &["answers", "answer"])
                .filter(|a| !a.is_empty())
                .ok_or(ParseError::MissingField("answers"))?;
            Ok(ParsedQuestion::FillInBlank { question, answers })
        }
        Layout::Sequence { steps } => {
            let question =
                json_text(v, &["question"]).ok_or(ParseError::MissingField("question"))?;
            let items =
                json_list(v, &["steps", "sequence"]).ok_or(ParseError::MissingField("steps"))?;
            build_sequence(question, items, *steps)
        }
        Layout::Statements { statements } => {
            let entries = v
                .get("statements")
                .and_then(|s| s.as_array())
                .ok_or(ParseError::MissingField("statements"))?;
            let truth = truth_options();
            let mut texts = Vec::with_capacity(entries.len());
            let mut answers = Vec::with_capacity(entries.len());
            for entry in entries {
                let text = json_text(entry, &["statement", "text"])
                    .ok_or(ParseError::MissingField("statement"))?;
                let answer = json_field(entry, &["answer", "correct_answer"])
                    .ok_or(ParseError::MissingField("answer"))?;
                texts.push(text);
                answers.push(json_single_answer(answer, &truth)?);
            }
            build_statements(texts, answers, *statements)
        }
        Layout::Appropriateness => {
            let question = json_text(v, &["question", "question_text"])
                .ok_or(ParseError::MissingField("question"))?;
            let options =
                json_list(v, &["options"]).ok_or(ParseError::MissingField("options"))?;
            let least = json_field(v, &["least_appropriate"])
                .ok_or(ParseError::MissingField("least_appropriate"))?;
            let most = json_field(v, &["most_appropriate"])
                .ok_or(ParseError::MissingField("most_appropriate"))?;
            check_option_count(&options, 2)?;
            let least = json_single_answer(least, &options)?;
            let most = json_single_answer(most, &options)?;
            build_appropriateness(question, options, least, most)
        }
    }
}

fn from_markers(body: &str, layout: &Layout) -> Result<ParsedQuestion, ParseError> {
    match layout {
        Layout::Choice(shape) | Layout::Scenario { shape, .. } => {
            let question = section(body, &[QUESTION], &[OPTIONS])
                .ok_or(ParseError::MissingField(QUESTION))?;
            let options_block = section(body, &[OPTIONS], &[CORRECT_ANSWERS, CORRECT_ANSWER])
                .ok_or(ParseError::MissingField(OPTIONS))?;
            let answer_block = section(body, &[CORRECT_ANSWERS, CORRECT_ANSWER], &[])
                .ok_or(ParseError::MissingField(CORRECT_ANSWER))?;

            let tokens = match shape.cardinality.bounds() {
                // A single answer may itself contain commas ("Paris, France").
                (1, 1) => answer_block
                    .lines()
                    .map(strip_list_marker)
                    .find(|l| !l.is_empty())
                    .map(|l| vec![l.to_string()])
                    .unwrap_or_default(),
                _ => split_list(answer_block),
            };
            let options = list_items(options_block);
            check_option_count(&options, shape.option_count)?;
            let correct = resolve_all(&tokens, &options)?;
            build_choice(question.to_string(), options, correct, shape).map(ParsedQuestion::Choice)
        }
        Layout::FillInBlank => {
            let question = section(body, &[QUESTION], &[ANSWERS])
                .ok_or(ParseError::MissingField(QUESTION))?;
            let answers = section(body, &[ANSWERS], &[])
                .map(split_list)
                .filter(|a| !a.is_empty())
                .ok_or(ParseError::MissingField(ANSWERS))?;
            Ok(ParsedQuestion::FillInBlank {
                question: question.to_string(),
                answers,
            })
        }
        Layout::Sequence { steps } => {
            let question = section(body, &[QUESTION], &[STEPS])
                .ok_or(ParseError::MissingField(QUESTION))?;
            let items = section(body, &[STEPS], &[])
                .map(list_items)
                .ok_or(ParseError::MissingField(STEPS))?;
            build_sequence(question.to_string(), items, *steps)
        }
        Layout::Statements { statements } => {
            let block = section(body, &[STATEMENTS], &[OPTIONS, CORRECT_ANSWERS])
                .ok_or(ParseError::MissingField(STATEMENTS))?;
            let answers = section(body, &[CORRECT_ANSWERS], &[])
                .ok_or(ParseError::MissingField(CORRECT_ANSWERS))?;
            let statement_texts = list_items(block);
            let tokens = list_items(answers);
            check_item_count("statements", statement_texts.len(), *statements)?;
            check_item_count("correct answers", tokens.len(), *statements)?;
            let answers = resolve_all(&tokens, &truth_options())?;
            build_statements(statement_texts, answers, *statements)
        }
        Layout::Appropriateness => {
            let question = section(body, &[QUESTION_TEXT, QUESTION], &[OPTIONS])
                .ok_or(ParseError::MissingField(QUESTION_TEXT))?;
            let options = section(body, &[OPTIONS], &[CORRECT_ANSWERS])
                .map(list_items)
                .ok_or(ParseError::MissingField(OPTIONS))?;
            let answers = section(body, &[CORRECT_ANSWERS], &[])
                .ok_or(ParseError::MissingField(CORRECT_ANSWERS))?;

            let labelled = |label: &str| {
                answers
                    .lines()
                    .find(|line| line.to_ascii_lowercase().contains(label))
                    .and_then(|line| line.split_once(':'))
                    .map(|(_, value)| value.trim().to_string())
            };
            let least = labelled("least appropriate")
                .ok_or(ParseError::MissingField("Least Appropriate"))?;
            let most = labelled("most appropriate")
                .ok_or(ParseError::MissingField("Most Appropriate"))?;
            check_option_count(&options, 2)?;
            let least = resolve_answer(&least, &options)?;
            let most = resolve_answer(&most, &options)?;
            build_appropriateness(question.to_string(), options, least, most)
        }
    }
}

fn check_option_count(options: &[String], expected: usize) -> Result<(), ParseError> {
    if options.len() != expected {
        return Err(ParseError::OptionCount {
            expected,
            found: options.len(),
        });
    }
    Ok(())
}

fn check_item_count(field: &'static str, found: usize, expected: usize) -> Result<(), ParseError> {
    if found != expected {
        return Err(ParseError::ItemCount {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

fn truth_options() -> Vec<String> {
    TRUTH_OPTIONS.iter().map(|o| o.to_string()).collect()
}

fn resolve_all(tokens: &[String], options: &[String]) -> Result<Vec<usize>, ParseError> {
    tokens
        .iter()
        .map(|token| resolve_answer(token, options))
        .collect()
}

/// `options` must already match the shape's option count. `correct` holds
/// zero-based option indices; duplicates are dropped.
fn build_choice(
    question: String,
    options: Vec<String>,
    correct: Vec<usize>,
    shape: &QuestionShape,
) -> Result<ParsedChoice, ParseError> {
    let mut unique: Vec<usize> = Vec::with_capacity(correct.len());
    for idx in correct {
        if !unique.contains(&idx) {
            unique.push(idx);
        }
    }

    let (min, max) = shape.cardinality.bounds();
    if unique.len() < min || unique.len() > max {
        return Err(ParseError::AnswerCount {
            min,
            max,
            found: unique.len(),
        });
    }

    Ok(ParsedChoice {
        question,
        options,
        correct: unique,
    })
}

fn build_sequence(
    question: String,
    steps: Vec<String>,
    expected: usize,
) -> Result<ParsedQuestion, ParseError> {
    check_item_count("steps", steps.len(), expected)?;
    Ok(ParsedQuestion::Sequence { question, steps })
}

fn build_statements(
    statements: Vec<String>,
    answers: Vec<usize>,
    expected: usize,
) -> Result<ParsedQuestion, ParseError> {
    check_item_count("statements", statements.len(), expected)?;
    check_item_count("correct answers", answers.len(), expected)?;
    Ok(ParsedQuestion::Statements {
        statements,
        answers,
    })
}

fn build_appropriateness(
    question: String,
    options: Vec<String>,
    least: usize,
    most: usize,
) -> Result<ParsedQuestion, ParseError> {
    if least == most {
        return Err(ParseError::Inconsistent(
            "the same option is both least and most appropriate".to_string(),
        ));
    }
    Ok(ParsedQuestion::Appropriateness {
        question,
        options,
        least,
        most,
    })
}

/// Maps an answer reference onto a zero-based option index.
///
/// Accepts the option text itself, a one-based number (`2`, `2. Paris`),
/// an option label (`Option 2`, `option2`) or a letter label (`A`, `B`).
fn resolve_answer(token: &str, options: &[String]) -> Result<usize, ParseError> {
    let cleaned = token.trim().trim_matches(['"', '[', ']', '.']).trim();

    if let Some(idx) = options
        .iter()
        .position(|o| o.trim().eq_ignore_ascii_case(cleaned))
    {
        return Ok(idx);
    }

    let lowered = cleaned.to_ascii_lowercase();
    let numbered = lowered
        .strip_prefix("option")
        .unwrap_or(&lowered)
        .trim_start();
    let digits: String = numbered.chars().take_while(|c| c.is_ascii_digit()).collect();
    if let Ok(n) = digits.parse::<usize>() {
        if (1..=options.len()).contains(&n) {
            return Ok(n - 1);
        }
    }

    let mut chars = numbered.chars();
    if let (Some(letter @ 'a'..='z'), None) = (chars.next(), chars.next()) {
        let idx = (letter as u8 - b'a') as usize;
        if idx < options.len() {
            return Ok(idx);
        }
    }

    Err(ParseError::AnswerNotInOptions(token.trim().to_string()))
}

/// One-based option position sent as a JSON number.
fn json_position(n: &serde_json::Number, options: &[String]) -> Result<usize, ParseError> {
    match n.as_u64() {
        Some(pos) if (1..=options.len() as u64).contains(&pos) => Ok(pos as usize - 1),
        _ => Err(ParseError::AnswerNotInOptions(n.to_string())),
    }
}

/// Resolves JSON answer references. Numbers are one-based positions and are
/// never compared with option text; strings may name an option, a label or
/// a comma separated list of either.
fn json_answers(value: &JsonValue, options: &[String]) -> Result<Vec<usize>, ParseError> {
    match value {
        JsonValue::Array(items) => {
            let mut correct = Vec::with_capacity(items.len());
            for item in items {
                correct.extend(json_answers(item, options)?);
            }
            Ok(correct)
        }
        JsonValue::Number(n) => json_position(n, options).map(|idx| vec![idx]),
        JsonValue::String(s) => match resolve_answer(s, options) {
            Ok(idx) => Ok(vec![idx]),
            Err(err) => {
                let parts = split_list(s);
                if parts.len() > 1 {
                    resolve_all(&parts, options)
                } else {
                    Err(err)
                }
            }
        },
        JsonValue::Bool(b) => {
            resolve_answer(if *b { "True" } else { "False" }, options).map(|idx| vec![idx])
        }
        other => Err(ParseError::AnswerNotInOptions(other.to_string())),
    }
}

fn json_single_answer(value: &JsonValue, options: &[String]) -> Result<usize, ParseError> {
    json_answers(value, options)?
        .into_iter()
        .next()
        .ok_or(ParseError::AnswerNotInOptions(value.to_string()))
}

fn json_field<'a>(v: &'a JsonValue, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter().find_map(|k| v.get(*k))
}

fn json_text(v: &JsonValue, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| v.get(*k).and_then(|s| s.as_str()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reads a list that the model may have sent as an array, a single number
/// or a comma separated string.
fn json_list(v: &JsonValue, keys: &[&str]) -> Option<Vec<String>> {
    let value = keys.iter().find_map(|k| v.get(*k))?;
    match value {
        JsonValue::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        JsonValue::String(s) => Some(split_list(s)),
        other => scalar_text(other).map(|s| vec![s]),
    }
}

fn scalar_text(v: &JsonValue) -> Option<String> {
    match v {
        JsonValue::String(s) => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz_type::QuizType;

    fn layout(quiz_type: QuizType) -> Layout {
        quiz_type.layout()
    }

    const MCQ_REPLY: &str = "**Question:** What is the capital of France?\n\n\
        **Options:**\n1. Berlin\n2. Paris\n3. Madrid\n4. Rome\n\n\
        **Correct Answer:** 2. Paris";

    #[test]
    fn marker_complete_reply_parses_into_expected_fields() {
        let parsed = parse_question(MCQ_REPLY, &layout(QuizType::MultipleChoice))
            .unwrap()
            .into_choice()
            .unwrap();
        assert_eq!(parsed.question, "What is the capital of France?");
        assert_eq!(parsed.options, vec!["Berlin", "Paris", "Madrid", "Rome"]);
        assert_eq!(parsed.correct, vec![1]);
    }

    #[test]
    fn reply_missing_a_marker_is_rejected() {
        let reply = MCQ_REPLY.replace("**Options:**", "Options:");
        let err = parse_question(&reply, &layout(QuizType::MultipleChoice)).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(_)));

        let reply = MCQ_REPLY.replace("**Correct Answer:**", "Answer:");
        let err = parse_question(&reply, &layout(QuizType::MultipleChoice)).unwrap_err();
        assert_eq!(err, ParseError::MissingField(CORRECT_ANSWER));
    }

    #[test]
    fn option_count_mismatch_is_rejected() {
        let reply = MCQ_REPLY.replace("4. Rome\n", "");
        let err = parse_question(&reply, &layout(QuizType::MultipleChoice)).unwrap_err();
        assert_eq!(err, ParseError::OptionCount { expected: 4, found: 3 });
    }

    #[test]
    fn answer_outside_options_is_rejected() {
        let reply = MCQ_REPLY.replace("2. Paris", "Lyon");
        let err = parse_question(&reply, &layout(QuizType::MultipleChoice)).unwrap_err();
        assert_eq!(err, ParseError::AnswerNotInOptions("Lyon".into()));
    }

    #[test]
    fn structured_checkbox_reply_is_validated() {
        let reply = r#"```json
        {"question": "Which are noble gases?",
         "options": ["Helium", "Oxygen", "Neon", "Nitrogen"],
         "correct_answers": [1, 3]}
        ```"#;
        let parsed = parse_question(reply, &layout(QuizType::Checkbox))
            .unwrap()
            .into_choice()
            .unwrap();
        assert_eq!(parsed.correct, vec![0, 2]);

        let single = r#"{"question": "q", "options": ["a","b","c","d"], "correct_answers": "2"}"#;
        let err = parse_question(single, &layout(QuizType::Checkbox)).unwrap_err();
        assert_eq!(err, ParseError::AnswerCount { min: 2, max: 4, found: 1 });
    }

    #[test]
    fn json_numbers_are_positions_even_when_options_are_numbers() {
        let reply = r#"{"question": "What is 3 + 1?",
            "options": ["2", "4", "6", "8"],
            "correct_answers": [2]}"#;
        let parsed = parse_question(reply, &layout(QuizType::MultipleChoice))
            .unwrap()
            .into_choice()
            .unwrap();
        assert_eq!(parsed.correct, vec![1]);
        assert_eq!(parsed.options[parsed.correct[0]], "4");

        let reply = r#"{"question": "Which are even?",
            "options": ["3", "4", "1", "8"],
            "correct_answers": [2, 4]}"#;
        let parsed = parse_question(reply, &layout(QuizType::Checkbox))
            .unwrap()
            .into_choice()
            .unwrap();
        assert_eq!(parsed.correct, vec![1, 3]);
    }

    #[test]
    fn json_positions_out_of_range_are_rejected() {
        let reply = r#"{"question": "q", "options": ["a", "b", "c", "d"], "correct_answers": [5]}"#;
        let err = parse_question(reply, &layout(QuizType::MultipleChoice)).unwrap_err();
        assert_eq!(err, ParseError::AnswerNotInOptions("5".into()));

        let reply = r#"{"question": "q", "options": ["a", "b", "c", "d"], "correct_answers": [0]}"#;
        let err = parse_question(reply, &layout(QuizType::MultipleChoice)).unwrap_err();
        assert_eq!(err, ParseError::AnswerNotInOptions("0".into()));
    }

    #[test]
    fn json_string_answers_still_match_option_text() {
        let reply = r#"{"question": "What is 3 + 1?",
            "options": ["2", "4", "6", "8"],
            "correct_answers": ["4"]}"#;
        let parsed = parse_question(reply, &layout(QuizType::MultipleChoice))
            .unwrap()
            .into_choice()
            .unwrap();
        assert_eq!(parsed.correct, vec![1]);
    }

    #[test]
    fn marker_checkbox_answers_accept_labels_and_text() {
        let reply = "**Question:** Pick the mammals\n\
            **Options:**\n1. Whale\n2. Shark\n3. Bat\n4. Trout\n\
            **Correct Answers:** Option 1, Bat";
        let parsed = parse_question(reply, &layout(QuizType::ImageCheckbox))
            .unwrap()
            .into_choice()
            .unwrap();
        assert_eq!(parsed.correct, vec![0, 2]);
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_question("{\"question\": ", &layout(QuizType::MultipleChoice)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
        assert_eq!(
            parse_question("  \n", &layout(QuizType::MultipleChoice)),
            Err(ParseError::Empty)
        );
    }

    #[test]
    fn fill_in_blank_markers() {
        let reply =
            "**Question:** Plants use _______ to make _______.\n\n**Answers:** sunlight, glucose";
        let parsed = parse_question(reply, &layout(QuizType::FillInTheBlank)).unwrap();
        assert_eq!(
            parsed,
            ParsedQuestion::FillInBlank {
                question: "Plants use _______ to make _______.".into(),
                answers: vec!["sunlight".into(), "glucose".into()],
            }
        );
    }

    #[test]
    fn statements_markers_resolve_truth_options() {
        let reply = "**Statements:**\n1. Water boils at 100C at sea level\n\
            2. The sun orbits the earth\n3. Mars has life\n4. Ice floats\n5. Gold is magnetic\n\n\
            **Options:**\n1. True\n2. False\n3. Cannot Tell\n\n\
            **Correct Answers:**\n1. option1\n2. option2\n3. Cannot Tell\n4. True\n5. option2";
        let ParsedQuestion::Statements { statements, answers } =
            parse_question(reply, &layout(QuizType::TrueFalse)).unwrap()
        else {
            panic!("expected statements");
        };
        assert_eq!(statements.len(), 5);
        assert_eq!(answers, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn statements_json_requires_five_entries() {
        let reply = r#"{"statements": [{"statement": "a", "answer": "True"}]}"#;
        let err = parse_question(reply, &layout(QuizType::TrueFalse)).unwrap_err();
        assert_eq!(
            err,
            ParseError::ItemCount { field: "statements", expected: 5, found: 1 }
        );
    }

    #[test]
    fn appropriateness_markers() {
        let reply = "**Question Text:** A colleague mocks your accent in a meeting. \
            What do you do?\n\n\
            **Options:**\n1. Ignore it and hope it stops\n2. Raise it calmly with your manager\n\n\
            **Correct Answers:**\n- Least Appropriate: Ignore it and hope it stops\n\
            - Most Appropriate: Raise it calmly with your manager";
        let parsed = parse_question(reply, &layout(QuizType::Appropriateness)).unwrap();
        let ParsedQuestion::Appropriateness { least, most, options, .. } = parsed else {
            panic!("expected appropriateness");
        };
        assert_eq!(options.len(), 2);
        assert_eq!((least, most), (0, 1));
    }

    #[test]
    fn appropriateness_rejects_same_option_twice() {
        let reply = r#"{"question": "q", "options": ["x", "y"],
            "least_appropriate": "A", "most_appropriate": "x"}"#;
        let err = parse_question(reply, &layout(QuizType::Appropriateness)).unwrap_err();
        assert!(matches!(err, ParseError::Inconsistent(_)));
    }

    #[test]
    fn sequence_step_count_is_checked() {
        let reply = r#"{"question": "Order the steps", "steps": ["a", "b", "c"]}"#;
        let err = parse_question(reply, &layout(QuizType::Sequence)).unwrap_err();
        assert_eq!(err, ParseError::ItemCount { field: "steps", expected: 4, found: 3 });
    }
}
