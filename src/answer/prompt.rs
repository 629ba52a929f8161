//! Provider prompts for contract questions.

use super::language::HINDI_SECTION_HEADING;
use crate::generation::GenerationRequest;

const ANSWER_MAX_TOKENS: usize = 400;

const ASSISTANT_INSTRUCTION: &str = "You are a helpful contract Q&A assistant. Use the contract text and summary to answer the question. \
Cite relevant phrases and mention page/section if the text indicates it.";

/// Build the provider request for a contract question.
pub fn answer_request(
    question: &str,
    text: &str,
    summary: &[String],
    bilingual: bool,
) -> GenerationRequest {
    let mut prompt = format!(
        "Contract Summary:\n{}\n\nFull Contract:\n{}\n\nQuestion: {}\n\n",
        summary.join("\n"),
        text,
        question
    );
    if bilingual {
        prompt.push_str(&format!(
            "Please provide the answer in both English and Hindi. Start with English, then add '{HINDI_SECTION_HEADING}' followed by the Hindi translation."
        ));
    } else {
        prompt.push_str("Answer:");
    }
    GenerationRequest::new(prompt, ANSWER_MAX_TOKENS).with_system(ASSISTANT_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_prompt_ends_with_answer_cue() {
        let request = answer_request("Who pays?", "Body", &["A".into(), "B".into()], false);
        assert!(request.prompt.starts_with("Contract Summary:\nA\nB\n\nFull Contract:\nBody"));
        assert!(request.prompt.ends_with("Question: Who pays?\n\nAnswer:"));
        assert_eq!(request.max_tokens, ANSWER_MAX_TOKENS);
        assert!(request.system.is_some());
    }

    #[test]
    fn bilingual_prompt_requests_hindi_section() {
        let request = answer_request("Explain in Hindi", "Body", &[], true);
        assert!(request.prompt.contains(HINDI_SECTION_HEADING));
        assert!(!request.prompt.ends_with("Answer:"));
    }
}
