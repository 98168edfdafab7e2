//! Prompts for drug-food interaction narratives and official-text summaries.
//!
//! The narrative prompt asks for the same four-line layout the rest of the
//! system renders, so an AI answer reads like an official or rule-based one.

/// Phrase the model is told to use when it knows of no interaction.
///
/// The resolver keys its fallback to the rule table on this phrase.
pub const NO_KNOWN_INTERACTION: &str = "no known interaction";

/// Maximum number of characters of official text included in a summary prompt.
pub const SUMMARY_EXCERPT_CHARS: usize = 500;

/// System context for interaction narratives.
pub const SYSTEM_PROMPT: &str = r#"You are a clinical pharmacology assistant that explains drug-food interactions to patients.

Rules:
- Use plain language a patient can understand.
- Never invent an interaction. If you are not aware of any documented interaction, say "No known interaction".
- Do not give dosing advice.
- Keep the reason to one or two sentences."#;

/// Build the narrative prompt for a drug/food pair.
pub fn make_narrative_prompt(drug: &str, food: &str) -> String {
    format!(
        r#"Does the medication "{drug}" interact with the food "{food}"?

Answer in exactly this format:

**RISK LEVEL**: <None, Low, Moderate or High>

**INTERACTION**: <Yes or No> - <short qualifier>

**RECOMMENDATION**: <Avoid, Limit, Monitor or Safe> - <what the patient should do>

**REASON**: <one or two sentences>

If there is no documented interaction, write "No known interaction" in the INTERACTION line."#
    )
}

/// Build the prompt that condenses official reference text into 1-2 sentences.
pub fn make_summary_prompt(official_text: &str, drug: &str, food: &str) -> String {
    let excerpt: String = official_text.chars().take(SUMMARY_EXCERPT_CHARS).collect();
    format!(
        r#"Simplify this official medical information about {drug} and {food} interaction into 1-2 clear, simple sentences that a patient can easily understand:

Official text: {excerpt}...

Provide only the simplified explanation, no additional formatting or disclaimers.
Focus on what the patient needs to know in simple terms."#
    )
}

/// Build a complete prompt with system context for single-turn generation APIs.
pub fn build_full_prompt(user_prompt: &str) -> String {
    let mut prompt = String::with_capacity(SYSTEM_PROMPT.len() + user_prompt.len() + 2);
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push_str("\n\n");
    prompt.push_str(user_prompt);
    prompt
}
