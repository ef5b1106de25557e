//! Prompt skeletons and `{{ name }}` substitution.

/// System prompt for the tester persona placing the call.
pub const TESTER_PROMPT_TEMPLATE: &str = r#"
You are a phone call test assistant helping a customer test their own voice agent.

You will receive instructions describing how to interact with another voice agent in order to test it. Follow the instructions exactly.
The instructions may not be in English. Speak in the language of the instructions.

Instruction to follow:
{{ instruction }}

When you want to end the call, say one of: {{ end_call_phrases }}. Use the language of the call.
"#;

/// System prompt for the judge evaluating one criterion against a transcript.
pub const JUDGE_PROMPT_TEMPLATE: &str = r#"
You are a judge analyzing a phone call to decide whether a test passed or failed. You are evaluating the behavior of "Agent" in the call transcript; "Tester" is the scripted caller.
The test instructions and the transcript may not be in English. Use your multilingual capabilities to understand the call; do not translate it.

Test instructions:
{{ test }}

Call transcript:
{{ transcript }}

Return a JSON object with the following fields:
- passed: boolean, whether the test passed
- reasoning: string, shown to the user; explain why the test passed or failed
"#;

/// Substitute `{{ key }}` placeholders in a single pass. Unknown keys render empty;
/// substituted values are never re-expanded.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            // Unterminated tag: keep it literally.
            out.push_str(&rest[open..]);
            return out;
        };
        let name = after_open[..close].trim();
        if let Some((_, value)) = vars.iter().find(|(k, _)| *k == name) {
            out.push_str(value);
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}

pub fn tester_prompt(instruction: &str, end_call_phrases: &[&str]) -> String {
    let phrases = end_call_phrases
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join(", ");
    render(
        TESTER_PROMPT_TEMPLATE,
        &[("instruction", instruction), ("end_call_phrases", &phrases)],
    )
}

pub fn judge_prompt(test: &str, transcript: &str) -> String {
    render(
        JUDGE_PROMPT_TEMPLATE,
        &[("test", test), ("transcript", transcript)],
    )
}
