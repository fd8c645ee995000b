//! Prompt templates for chat and the generation chains

use crate::providers::ChatMessage;

/// Prompt builder for chat and map-reduce generation
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the grounded-chat message pair
    pub fn chat(context: &str, question: &str) -> Vec<ChatMessage> {
        let task = "To answer questions based on your context. \
                    If you're asked a question that does not relate to your context, \
                    do not answer it - instead, answer by saying you're only familiar \
                    with the topic in your context.";

        let system = format!(
            "You are an expert on the information in the context given below.\n\
             Use the context as your primary knowledge source.\n\
             Do not mention that you have a context, just use it to fulfill your task.\n\
             context: {context}\n\
             Your task is {task}"
        );

        vec![ChatMessage::system(system), ChatMessage::user(question)]
    }

    /// Map prompt: a few flashcards from one chunk
    pub fn flashcard_map(chunk: &str) -> String {
        format!(
            "Generate 3 flashcards from the following content.\n\n\
             Each flashcard is an object with:\n\
             - \"question\"\n\
             - \"answer\"\n\
             - \"difficulty\" (\"easy\", \"medium\", or \"hard\")\n\n\
             Content:\n{chunk}"
        )
    }

    /// Reduce prompt: clean and deduplicate the combined flashcards
    pub fn flashcard_reduce(flashcards: &str) -> String {
        format!(
            "Given the below list of flashcards, clean and deduplicate them. \
             Return a final list of flashcards.\n\n\
             Flashcards:\n{flashcards}\n"
        )
    }

    /// Map prompt: a mini-quiz from one chunk
    pub fn quiz_map(chunk: &str) -> String {
        format!(
            "Generate a mini-quiz of 3 to 4 questions from the following content.\n\n\
             Mix multiple-choice questions (with an \"options\" list and the \
             correct answer among the options) and short-answer questions. \
             Assign each question a fair number of points.\n\n\
             Content:\n{chunk}"
        )
    }

    /// Reduce prompt: consolidate the combined mini-quizzes
    pub fn quiz_reduce(questions: &str) -> String {
        format!(
            "Given the below list of quiz questions, clean and deduplicate them: \
             drop questions with repeated question text, keep a balanced mix of \
             multiple-choice and short-answer questions and of difficulty levels. \
             Return a final list of questions.\n\n\
             Questions:\n{questions}\n"
        )
    }

    /// Map prompt: summarize one chunk
    pub fn summary_map(chunk: &str) -> String {
        format!("Write a medium length summary of the following:\n\n{chunk}")
    }

    /// Reduce prompt: combine partial summaries into Markdown
    pub fn summary_reduce(summaries: &str) -> String {
        format!(
            "Combine the following summaries into one medium length summary \
             **formatted in valid Markdown**.\n\
             Use headings, bullet points, bold/italic text, etc. if appropriate.\n\
             Do not add any preamble or closing sentence.\n\n\
             Summaries:\n{summaries}\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_messages_embed_context_and_question() {
        let messages = PromptBuilder::chat("the water cycle", "What is evaporation?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("the water cycle"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "What is evaporation?");
    }

    #[test]
    fn test_map_prompts_embed_the_chunk() {
        for prompt in [
            PromptBuilder::flashcard_map("CHUNK-TEXT"),
            PromptBuilder::quiz_map("CHUNK-TEXT"),
            PromptBuilder::summary_map("CHUNK-TEXT"),
        ] {
            assert!(prompt.contains("CHUNK-TEXT"));
        }
    }
}
