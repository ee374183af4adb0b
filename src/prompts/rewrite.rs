const INTRO: &str = "As an expert script editor specializing in YouTube automation and AI-generated content, your task is to elevate the provided text.";
const RULES: &[&str] = &[
    "Rewrite it to be significantly more engaging, conversational, and compelling for a video audience.",
    "Focus on improving clarity, flow, and storytelling. Eliminate robotic phrasing and inject a natural, human-like tone.",
    "Ensure the final output is polished and ready for a voiceover.",
    "Do not add any commentary or introductions like 'Here is the rewritten text:'. Just provide the rewritten script itself.",
];
const TEXT_HEADER: &str = "Here is the text to rewrite:";
const SEPARATOR: &str = "---";

/// Wrap the user's text, verbatim, in the fixed rewrite instructions.
pub fn build_rewrite_prompt(original: &str) -> String {
    let rules = RULES.join("\n");

    format!(
        "{intro}\n{rules}\n\n{text_header}\n\n{separator}\n\n{original}",
        intro = INTRO,
        rules = rules,
        text_header = TEXT_HEADER,
        separator = SEPARATOR,
        original = original
    )
}
