use serde::{Deserialize, Serialize};

/// What an option shows to the quiz taker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMedia {
    Text,
    Image,
}

/// How many options may be marked correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AnswerCardinality {
    Single,
    Multiple { min: usize, max: usize },
}

impl AnswerCardinality {
    pub fn bounds(&self) -> (usize, usize) {
        match *self {
            AnswerCardinality::Single => (1, 1),
            AnswerCardinality::Multiple { min, max } => (min, max),
        }
    }
}

/// Parameters of a choice question: the only thing that varies between the
/// radio, checkbox and image-option variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionShape {
    pub option_count: usize,
    pub media: OptionMedia,
    pub cardinality: AnswerCardinality,
}

impl QuestionShape {
    pub const fn text_single(option_count: usize) -> Self {
        Self {
            option_count,
            media: OptionMedia::Text,
            cardinality: AnswerCardinality::Single,
        }
    }

    pub const fn text_multiple(option_count: usize) -> Self {
        Self {
            option_count,
            media: OptionMedia::Text,
            cardinality: AnswerCardinality::Multiple {
                min: 2,
                max: option_count,
            },
        }
    }

    pub const fn with_media(self, media: OptionMedia) -> Self {
        Self { media, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Choice(QuestionShape),
    FillInBlank,
    Sequence { steps: usize },
    Statements { statements: usize },
    Appropriateness,
    Scenario { sub_questions: usize, shape: QuestionShape },
}

pub const TRUTH_OPTIONS: [&str; 3] = ["True", "False", "Cannot Tell"];
pub const APPROPRIATENESS_LABELS: [&str; 2] = ["A", "B"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    MultipleChoice,
    Checkbox,
    FillInTheBlank,
    Sequence,
    MultipleChoiceWithImage,
    CheckboxWithImage,
    ImageOptions,
    ImageCheckbox,
    TrueFalse,
    ScenarioCheckbox,
    ScenarioRadio,
    ScenarioImageCheckbox,
    ScenarioImageRadio,
    Appropriateness,
}

impl QuizType {
    pub const ALL: [QuizType; 14] = [
        QuizType::MultipleChoice,
        QuizType::Checkbox,
        QuizType::FillInTheBlank,
        QuizType::Sequence,
        QuizType::MultipleChoiceWithImage,
        QuizType::CheckboxWithImage,
        QuizType::ImageOptions,
        QuizType::ImageCheckbox,
        QuizType::TrueFalse,
        QuizType::ScenarioCheckbox,
        QuizType::ScenarioRadio,
        QuizType::ScenarioImageCheckbox,
        QuizType::ScenarioImageRadio,
        QuizType::Appropriateness,
    ];

    /// Extra codes accepted for presets that older clients request under a
    /// second number.
    pub const ALIASES: [(u16, QuizType); 2] = [
        (602, QuizType::ImageCheckbox),
        (701, QuizType::ImageOptions),
    ];

    /// Numeric selector accepted by the `quiz_type` parameter.
    pub fn code(&self) -> u16 {
        match self {
            QuizType::MultipleChoice => 100,
            QuizType::Checkbox => 200,
            QuizType::FillInTheBlank => 300,
            QuizType::Sequence => 400,
            QuizType::MultipleChoiceWithImage => 500,
            QuizType::CheckboxWithImage => 501,
            QuizType::ImageOptions => 600,
            QuizType::ImageCheckbox => 601,
            QuizType::TrueFalse => 700,
            QuizType::ScenarioCheckbox => 800,
            QuizType::ScenarioRadio => 801,
            QuizType::ScenarioImageCheckbox => 802,
            QuizType::ScenarioImageRadio => 803,
            QuizType::Appropriateness => 900,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| i64::from(t.code()) == code)
            .or_else(|| {
                Self::ALIASES
                    .into_iter()
                    .find(|(alias, _)| i64::from(*alias) == code)
                    .map(|(_, t)| t)
            })
    }

    pub fn aliases(&self) -> Vec<u16> {
        Self::ALIASES
            .into_iter()
            .filter(|(_, t)| t == self)
            .map(|(alias, _)| alias)
            .collect()
    }

    pub fn layout(&self) -> Layout {
        const TEXT_SINGLE: QuestionShape = QuestionShape::text_single(4);
        const TEXT_MULTIPLE: QuestionShape = QuestionShape::text_multiple(4);

        match self {
            QuizType::MultipleChoice | QuizType::MultipleChoiceWithImage => {
                Layout::Choice(TEXT_SINGLE)
            }
            QuizType::Checkbox | QuizType::CheckboxWithImage => Layout::Choice(TEXT_MULTIPLE),
            QuizType::ImageOptions => Layout::Choice(TEXT_SINGLE.with_media(OptionMedia::Image)),
            QuizType::ImageCheckbox => {
                Layout::Choice(TEXT_MULTIPLE.with_media(OptionMedia::Image))
            }
            QuizType::FillInTheBlank => Layout::FillInBlank,
            QuizType::Sequence => Layout::Sequence { steps: 4 },
            QuizType::TrueFalse => Layout::Statements { statements: 5 },
            QuizType::ScenarioCheckbox => Layout::Scenario {
                sub_questions: 3,
                shape: TEXT_MULTIPLE,
            },
            QuizType::ScenarioRadio => Layout::Scenario {
                sub_questions: 3,
                shape: TEXT_SINGLE,
            },
            QuizType::ScenarioImageCheckbox => Layout::Scenario {
                sub_questions: 3,
                shape: TEXT_MULTIPLE.with_media(OptionMedia::Image),
            },
            QuizType::ScenarioImageRadio => Layout::Scenario {
                sub_questions: 3,
                shape: TEXT_SINGLE.with_media(OptionMedia::Image),
            },
            QuizType::Appropriateness => Layout::Appropriateness,
        }
    }

    /// Whether each question carries a 750x319 banner image.
    pub fn has_banner(&self) -> bool {
        matches!(
            self,
            QuizType::MultipleChoiceWithImage
                | QuizType::CheckboxWithImage
                | QuizType::ImageCheckbox
                | QuizType::TrueFalse
                | QuizType::ScenarioCheckbox
                | QuizType::ScenarioRadio
                | QuizType::ScenarioImageCheckbox
                | QuizType::ScenarioImageRadio
        )
    }

    pub fn description(&self) -> &'static str {
        match self {
            QuizType::MultipleChoice => "Four text options, one correct answer",
            QuizType::Checkbox => "Four text options, two to four correct answers",
            QuizType::FillInTheBlank => "Statement with blanks and the missing words",
            QuizType::Sequence => "Steps to arrange in the correct order",
            QuizType::MultipleChoiceWithImage => {
                "Four text options, one correct answer, illustrated question"
            }
            QuizType::CheckboxWithImage => {
                "Four text options, two to four correct answers, illustrated question"
            }
            QuizType::ImageOptions => "Four image options, one correct answer",
            QuizType::ImageCheckbox => {
                "Four image options, two to four correct answers, illustrated question"
            }
            QuizType::TrueFalse => "Five statements to mark True, False or Cannot Tell",
            QuizType::ScenarioCheckbox => "Illustrated scenario with three checkbox sub-questions",
            QuizType::ScenarioRadio => {
                "Illustrated scenario with three single-answer sub-questions"
            }
            QuizType::ScenarioImageCheckbox => {
                "Illustrated scenario with three checkbox sub-questions with image options"
            }
            QuizType::ScenarioImageRadio => {
                "Illustrated scenario with three single-answer sub-questions with image options"
            }
            QuizType::Appropriateness => "Situation with the least and most appropriate response",
        }
    }

    /// Image store collection that holds the images generated for this type.
    pub fn collection(&self) -> String {
        self.code().to_string()
    }
}
