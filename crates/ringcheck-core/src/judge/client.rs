use crate::model::Verdict;

/// Extract a verdict from judge output.
///
/// Structured output normally yields bare JSON, but models occasionally wrap it in
/// prose or code fences, so parsing starts at the first `{`.
pub(crate) fn parse_verdict(text: &str) -> anyhow::Result<Verdict> {
    let text = text.trim();
    let json_start_idx = text
        .find('{')
        .ok_or_else(|| anyhow::anyhow!("No JSON object found in judge output"))?;
    let json_segment = &text[json_start_idx..];

    let val: serde_json::Value = serde_json::Deserializer::from_str(json_segment)
        .into_iter::<serde_json::Value>()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No JSON object found in extracted text"))?
        .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;

    let passed = val
        .get("passed")
        .and_then(|v| v.as_bool())
        .ok_or_else(|| anyhow::anyhow!("Judge JSON missing 'passed' field"))?;

    let reasoning = val
        .get("reasoning")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Ok(Verdict { passed, reasoning })
}
