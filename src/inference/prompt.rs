//! Instruction text and response schema sent with every sketch.

use crate::locale::Language;

/// Instruction asking the model to identify the sketch in `language`.
pub fn instruction(language: Language) -> String {
    format!(
        "Analyze this real-time sketch. Identify what the user is likely trying to draw. \
         Provide the object name and a short, direct visual explanation based on geometric \
         shapes and lines. Respond in {}.",
        language.display_name()
    )
}

/// Response schema with the three required fields.
///
/// Uses the provider's OpenAPI-subset type names (`OBJECT`, `STRING`, `NUMBER`).
pub fn response_schema(language: Language) -> serde_json::Value {
    let name = language.display_name();
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "guess": {
                "type": "STRING",
                "description": format!(
                    "The name of the object being drawn (e.g., House, Tree) in {name}."
                ),
            },
            "reasoning": {
                "type": "STRING",
                "description": format!(
                    "Visual explanation of why (e.g., 'I see a square with a triangle on top') in {name}."
                ),
            },
            "confidence": {
                "type": "NUMBER",
                "description": "A number from 0 to 100 indicating confidence.",
            },
        },
        "required": ["guess", "reasoning", "confidence"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_names_target_language() {
        assert!(instruction(Language::Pt).ends_with("Respond in Portuguese (Brazil)."));
        assert!(instruction(Language::En).contains("real-time sketch"));
    }

    #[test]
    fn schema_requires_all_three_fields() {
        let schema = response_schema(Language::Fr);
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(
            schema["required"],
            serde_json::json!(["guess", "reasoning", "confidence"])
        );
        assert_eq!(schema["properties"]["confidence"]["type"], "NUMBER");
        let guess_desc = schema["properties"]["guess"]["description"]
            .as_str()
            .unwrap_or_default();
        assert!(guess_desc.ends_with("in French."));
    }
}
