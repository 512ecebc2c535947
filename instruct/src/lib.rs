//! Deterministic assembly of the system instruction sent to the model.
//!
//! An [`EnhancementRequest`] captures one submission from the composer: the
//! raw prompt, the selected tones, the output budget and the no-fluff toggle.
//! [`EnhancementRequest::system_instruction`] maps those options to a single
//! instruction string. The mapping is a contract: tests pin the tone join
//! rule and the clause order so rewrites stay reproducible across releases.

use serde::{Deserialize, Deserializer, Serialize};

/// Style labels offered by the composer.
pub const TONE_CHOICES: [&str; 10] = [
    "cinematic",
    "technical",
    "poetic",
    "concise",
    "dramatic",
    "detailed",
    "minimalist",
    "conversational",
    "narrative",
    "descriptive",
];

/// Output budget applied when a submission does not carry one.
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Safety margin requested above the nominal cap so the visible truncation
/// point is governed by the instruction rather than a hard provider cutoff.
pub const OUTPUT_MARGIN_TOKENS: u32 = 20;

/// One enhancement submission, as sent over the wire by the composer.
///
/// Tones are an insertion-ordered set; uniqueness is the composer's
/// invariant. `tones` accepts either a bare string or an array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnhancementRequest {
    #[serde(rename = "prompt")]
    pub raw_prompt: String,
    #[serde(deserialize_with = "one_or_many")]
    pub tones: Vec<String>,
    #[serde(rename = "maxTokens", default = "default_max_tokens")]
    pub max_output_tokens: u32,
    #[serde(rename = "noFluff", default)]
    pub suppress_filler: bool,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(tone) => vec![tone],
        OneOrMany::Many(tones) => tones,
    })
}

impl EnhancementRequest {
    /// Build the system instruction for this submission.
    ///
    /// Clause order is fixed regardless of the option combination; the
    /// filler-suppression clause appears only when `suppress_filler` is set.
    pub fn system_instruction(&self) -> String {
        let clauses = [
            format!(
                "You are an expert prompt-engineer in a style mixing {}.",
                tone_line(&self.tones)
            ),
            "Enhance the user's prompt by adding specificity, style, and structure.".to_string(),
            format!(
                "Ensure the output is no more than {} tokens.",
                self.max_output_tokens
            ),
            if self.suppress_filler {
                "Avoid any non-essential adjectives.".to_string()
            } else {
                String::new()
            },
            "Return ONLY the improved prompt text.".to_string(),
        ];
        clauses
            .iter()
            .filter(|clause| !clause.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Token cap to request from the provider, margin included.
    pub fn provider_token_limit(&self) -> u32 {
        self.max_output_tokens + OUTPUT_MARGIN_TOKENS
    }
}

/// Join tones into a natural-language list.
///
/// A single tone renders as itself; two or more join all but the last with
/// commas and the last with "and": `["a", "b", "c"]` becomes `"a, b and c"`.
pub fn tone_line(tones: &[String]) -> String {
    match tones {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}
