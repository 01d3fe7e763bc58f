use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::NutritionData;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-3-flash-preview";

const PROMPT: &str = "Analyze this food image. Provide detailed nutritional information. \
Estimate portion sizes and identify individual ingredients as accurately as possible.";

/// Client for the hosted image-analysis model.
///
/// One call, one result: a JPEG in, a [`NutritionData`] out, or a single
/// analysis failure. No retry and no partial results; the caller decides
/// whether to re-submit.
#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    api_key: String,
}

impl AnalysisClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Submit an image for nutrition analysis.
    ///
    /// The model is constrained to the [`NutritionData`] schema via
    /// structured output; a response that still fails to validate is
    /// rejected as an analysis failure rather than propagated partially
    /// populated.
    pub async fn analyze_image(&self, image: &[u8]) -> Result<NutritionData> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, GEMINI_MODEL, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": "image/jpeg",
                            "data": base64_encode(image),
                        }
                    },
                    { "text": PROMPT },
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        });

        debug!(bytes = image.len(), "submitting image for analysis");

        let resp = self.client.post(&url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("analysis request failed: {} - {}", status, text));
        }

        let data: Value = resp.json().await?;
        parse_response(&data)
    }
}

/// Extract and validate the model's JSON payload from a generateContent
/// response body.
pub fn parse_response(body: &Value) -> Result<NutritionData> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("no text part in analysis response"))?;

    let data: NutritionData = serde_json::from_str(text.trim())
        .map_err(|e| anyhow!("malformed analysis payload: {}", e))?;

    if data.food_name.trim().is_empty() {
        return Err(anyhow!("analysis returned an empty food name"));
    }
    if !(1..=10).contains(&data.health_score) {
        return Err(anyhow!(
            "analysis health score {} out of range",
            data.health_score
        ));
    }

    Ok(data)
}

/// The structured-output schema the model is held to. Mirrors
/// [`NutritionData`] field for field.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "foodName": { "type": "STRING", "description": "The name of the dish identified" },
            "healthScore": { "type": "INTEGER", "description": "A score from 1-10 on how healthy this meal is" },
            "totalCalories": { "type": "INTEGER", "description": "Estimated total calories" },
            "totalProtein": { "type": "STRING", "description": "Total protein with units (e.g., '15g')" },
            "totalProteinGrams": { "type": "INTEGER", "description": "Total protein in grams as a number" },
            "totalCarbs": { "type": "STRING", "description": "Total carbohydrates with units (e.g., '30g')" },
            "totalFat": { "type": "STRING", "description": "Total fat with units (e.g., '10g')" },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "amount": { "type": "STRING", "description": "Estimated portion size (e.g., '1 cup')" },
                        "calories": { "type": "INTEGER" },
                        "protein": { "type": "STRING" },
                        "carbs": { "type": "STRING" },
                        "fat": { "type": "STRING" },
                    },
                    "required": ["name", "amount", "calories", "protein", "carbs", "fat"],
                }
            }
        },
        "required": [
            "foodName", "healthScore", "totalCalories", "totalProtein",
            "totalProteinGrams", "totalCarbs", "totalFat", "ingredients",
        ],
    })
}

// Standard base64 encode without pulling in a base64 crate.
fn base64_encode(input: &[u8]) -> String {
    const TABLE: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity((input.len() + 2) / 3 * 4);
    for chunk in input.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let n = (b0 << 16) | (b1 << 8) | b2;

        out.push(TABLE[(n >> 18) as usize & 63] as char);
        out.push(TABLE[(n >> 12) as usize & 63] as char);
        out.push(if chunk.len() > 1 {
            TABLE[(n >> 6) as usize & 63] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            TABLE[n as usize & 63] as char
        } else {
            '='
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_json() -> String {
        json!({
            "foodName": "Chicken Salad",
            "healthScore": 8,
            "totalCalories": 420,
            "totalProtein": "35g",
            "totalProteinGrams": 35,
            "totalCarbs": "12g",
            "totalFat": "24g",
            "ingredients": [{
                "name": "Grilled chicken",
                "amount": "1 cup",
                "calories": 230,
                "protein": "30g",
                "carbs": "0g",
                "fat": "10g"
            }]
        })
        .to_string()
    }

    fn wrap(text: &str) -> Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[test]
    fn base64_known_vectors() {
        assert_eq!(base64_encode(b""), "");
        assert_eq!(base64_encode(b"M"), "TQ==");
        assert_eq!(base64_encode(b"Ma"), "TWE=");
        assert_eq!(base64_encode(b"Man"), "TWFu");
        assert_eq!(base64_encode(b"hello world"), "aGVsbG8gd29ybGQ=");
    }

    #[test]
    fn parses_a_well_formed_response() {
        let data = parse_response(&wrap(&payload_json())).unwrap();
        assert_eq!(data.food_name, "Chicken Salad");
        assert_eq!(data.health_score, 8);
        assert_eq!(data.total_calories, 420);
        assert_eq!(data.total_protein_grams, 35.0);
        assert_eq!(data.ingredients.len(), 1);
    }

    #[test]
    fn rejects_missing_required_fields() {
        let partial = json!({
            "foodName": "Mystery",
            "healthScore": 5
        })
        .to_string();
        assert!(parse_response(&wrap(&partial)).is_err());
    }

    #[test]
    fn rejects_missing_text_part() {
        let body = json!({ "candidates": [] });
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn rejects_out_of_range_health_score() {
        let bad = payload_json().replace("\"healthScore\":8", "\"healthScore\":11");
        assert!(parse_response(&wrap(&bad)).is_err());
    }
}
