//! Study artifact types: flashcards and quiz questions
//!
//! These are the shapes the generation models are asked to produce; the
//! JSON schemas below are handed to the completion provider as an output
//! constraint so nonconforming output surfaces as a schema violation
//! instead of being silently coerced.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Flashcard difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A question/answer flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

/// Structured envelope the flashcard chain asks the model for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardResponse {
    pub flashcards: Vec<Flashcard>,
}

/// A quiz question, discriminated by `question_type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "question_type", rename_all = "snake_case")]
pub enum QuizQuestion {
    MultipleChoice {
        question_text: String,
        /// Answer options in presentation order
        options: Vec<String>,
        correct_answer: String,
        points: u32,
    },
    ShortAnswer {
        question_text: String,
        correct_answer: String,
        points: u32,
    },
}

impl QuizQuestion {
    /// The question text, independent of variant
    pub fn question_text(&self) -> &str {
        match self {
            Self::MultipleChoice { question_text, .. } => question_text,
            Self::ShortAnswer { question_text, .. } => question_text,
        }
    }
}

/// Structured envelope the quiz chain asks the model for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
}

/// JSON schema for [`FlashcardResponse`]
pub fn flashcard_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "flashcards": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "question": {"type": "string"},
                        "answer": {"type": "string"},
                        "difficulty": {"type": "string", "enum": ["easy", "medium", "hard"]}
                    },
                    "required": ["question", "answer", "difficulty"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["flashcards"],
        "additionalProperties": false
    })
}

/// JSON schema for [`QuizResponse`]
pub fn quiz_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "anyOf": [
                        {
                            "type": "object",
                            "properties": {
                                "question_type": {"type": "string", "enum": ["multiple_choice"]},
                                "question_text": {"type": "string"},
                                "options": {"type": "array", "items": {"type": "string"}},
                                "correct_answer": {"type": "string"},
                                "points": {"type": "integer", "minimum": 0}
                            },
                            "required": ["question_type", "question_text", "options", "correct_answer", "points"],
                            "additionalProperties": false
                        },
                        {
                            "type": "object",
                            "properties": {
                                "question_type": {"type": "string", "enum": ["short_answer"]},
                                "question_text": {"type": "string"},
                                "correct_answer": {"type": "string"},
                                "points": {"type": "integer", "minimum": 0}
                            },
                            "required": ["question_type", "question_text", "correct_answer", "points"],
                            "additionalProperties": false
                        }
                    ]
                }
            }
        },
        "required": ["questions"],
        "additionalProperties": false
    })
}
