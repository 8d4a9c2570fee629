use serde_json::json;

use crate::models::quiz_type::{AnswerCardinality, Layout, QuestionShape};

pub const SYSTEM_PROMPT: &str = "You are an expert in generating educational content. \
Always reply with a single valid JSON object that follows the schema example you are given. \
Do not add explanations, markdown or text outside the JSON object.";

/// User prompt asking for one question in `layout`.
pub fn question_prompt(layout: &Layout, subject: &str, tone: &str) -> String {
    let (task, schema) = match layout {
        Layout::Choice(shape) | Layout::Scenario { shape, .. } => choice_task(shape, subject, tone),
        Layout::FillInBlank => (
            format!(
                "Generate a fill-in-the-blank question about '{subject}' in a '{tone}' tone. \
                 The question should have one or more blanks written as '_______' and the \
                 answers must be listed in the order the blanks appear."
            ),
            json!({
                "question": "Sentence with _______ for each blank",
                "answers": ["first blank", "second blank"]
            }),
        ),
        Layout::Sequence { steps } => (
            format!(
                "Generate a sequence question for '{subject}' students in a '{tone}' tone. \
                 It must ask the student to arrange exactly {steps} steps that solve a problem \
                 or explain a concept. List the steps in the CORRECT order; they will be \
                 shuffled before being shown."
            ),
            json!({
                "question": "Arrange the following steps in the correct sequence.",
                "steps": ["Step 1", "Step 2", "Step 3", "Step 4"]
            }),
        ),
        Layout::Statements { statements } => (
            format!(
                "Generate exactly {statements} statements related to '{subject}' in a '{tone}' \
                 tone. Each statement must be answerable with 'True', 'False' or 'Cannot Tell'."
            ),
            json!({
                "statements": [
                    {"statement": "Statement text", "answer": "True"},
                    {"statement": "Statement text", "answer": "Cannot Tell"}
                ]
            }),
        ),
        Layout::Appropriateness => (
            format!(
                "Generate a situational judgement question about '{subject}' in a '{tone}' \
                 tone. Describe a detailed workplace situation, then ask how to respond. \
                 Provide exactly two responses: one must be the least appropriate and the \
                 other the most appropriate."
            ),
            json!({
                "question": "Detailed situation followed by the question",
                "options": ["Response 1", "Response 2"],
                "least_appropriate": 1,
                "most_appropriate": 2
            }),
        ),
    };

    format!("{task}\n\nRespond with JSON shaped like this example:\n{schema}")
}

fn choice_task(shape: &QuestionShape, subject: &str, tone: &str) -> (String, serde_json::Value) {
    let count = shape.option_count;
    let answers = match shape.cardinality {
        AnswerCardinality::Single => {
            "The question must have exactly one correct answer.".to_string()
        }
        AnswerCardinality::Multiple { min, max } => format!(
            "The question must have between {min} and {max} correct answers."
        ),
    };
    let example_answers = match shape.cardinality {
        AnswerCardinality::Single => json!([2]),
        AnswerCardinality::Multiple { .. } => json!([1, 3]),
    };
    let options: Vec<String> = (1..=count).map(|n| format!("Option {n}")).collect();

    (
        format!(
            "Generate a clear and understandable question with exactly {count} options based \
             on the subject '{subject}'. Each option should be related to the concept in the \
             subject and in a '{tone}' tone. {answers} Use the one-based option numbers in \
             'correct_answers' and vary which positions are correct."
        ),
        json!({
            "question": "Question based on the subject",
            "options": options,
            "correct_answers": example_answers
        }),
    )
}

/// Prompt for the banner image shown above a question.
pub fn banner_prompt(subject: &str, tone: &str) -> String {
    format!(
        "High-quality, detailed illustration representing the subject: {subject} in a {tone} tone"
    )
}

/// Wraps a prompt for the image endpoint. Later attempts ask for a
/// different style, which helps with prompts the provider refused.
pub fn image_prompt(prompt: &str, attempt: u32) -> String {
    if attempt > 1 {
        format!("An illustration of {prompt}, in a different style, simple and neutral")
    } else {
        format!("An illustration of {prompt} in a simple, neutral style")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz_type::QuizType;

    #[test]
    fn choice_prompt_states_the_shape() {
        let prompt = question_prompt(&QuizType::Checkbox.layout(), "Chemistry", "playful");
        assert!(prompt.contains("exactly 4 options"));
        assert!(prompt.contains("between 2 and 4 correct answers"));
        assert!(prompt.contains("'Chemistry'"));
        assert!(prompt.contains("JSON"));
    }

    #[test]
    fn retried_image_prompts_change_style() {
        assert_ne!(image_prompt("a cat", 1), image_prompt("a cat", 2));
    }
}
