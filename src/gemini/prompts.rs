//! Prompts and response schemas sent to the AI service.

use crate::models::Tone;
use serde_json::{json, Value};

/// Build the analysis prompt for `text`.
pub fn analysis_prompt(text: &str) -> String {
    format!(
        r#"Deeply analyze the following text for AI vs Human markers.
Evaluate:
1. Sentence-level analysis: Identify exactly which parts sound machine-like.
2. Linguistic Complexity: Richness of vocabulary and structural variety.
3. Metrics: Perplexity (randomness) and Burstiness (variance).
4. Word Frequency: Top 5 recurring non-trivial words.

Text:
"{}""#,
        text
    )
}

/// Build the humanization prompt for `text` in `tone`.
pub fn humanize_prompt(text: &str, tone: Tone) -> String {
    format!(
        r#"HUMANIZATION PROTOCOL: Rewrite the following text to sound authentically human, professional, and engaging.
Target Tone: {}

Guidelines:
1. Eliminate AI markers: overly formal phrasing, repetitive structures, generic transitions.
2. Enhance emotional nuance and professional voice.
3. Improve sentence variance and "burstiness".
4. Maintain the original core message and facts.

Text:
"{}""#,
        tone, text
    )
}

fn metric_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "value": { "type": "NUMBER" },
            "status": { "type": "STRING" }
        }
    })
}

/// Response schema for the analysis call.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "humanPercentage": { "type": "NUMBER" },
            "aiPercentage": { "type": "NUMBER" },
            "perplexity": metric_schema(),
            "burstiness": metric_schema(),
            "readability": metric_schema(),
            "complexity": {
                "type": "OBJECT",
                "properties": {
                    "vocabularyRichness": { "type": "NUMBER" },
                    "structuralVariety": { "type": "NUMBER" },
                    "gradeLevel": { "type": "STRING" }
                }
            },
            "wordFrequency": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": { "type": "STRING" },
                        "count": { "type": "NUMBER" }
                    }
                }
            },
            "verdict": { "type": "STRING" },
            "verdictDescription": { "type": "STRING" },
            "sentences": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "text": { "type": "STRING" },
                        "aiLikelihood": { "type": "NUMBER" },
                        "reason": { "type": "STRING" }
                    }
                }
            }
        },
        "required": [
            "humanPercentage", "aiPercentage", "perplexity", "burstiness", "readability",
            "complexity", "wordFrequency", "verdict", "verdictDescription", "sentences"
        ]
    })
}

/// Response schema for the humanization call.
pub fn humanize_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "text": { "type": "STRING" },
            "humanizationScore": { "type": "NUMBER" },
            "improvements": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "icon": { "type": "STRING" },
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    }
                }
            }
        },
        "required": ["text", "humanizationScore", "improvements"]
    })
}
