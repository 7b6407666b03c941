//! Entity and key phrase extraction.
//!
//! Results arrive wrapped: `Results[0]` is itself a JSON document encoded
//! as a string.

use serde_json::Value;

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{parse_blob, percent_string, rename, require, take, take_items};
use media_indexer_shared::Document;

fn unwrap_results(blob: &str) -> Result<Value, FlattenError> {
    let wrapper = parse_blob(blob)?;
    let encoded = wrapper
        .get("Results")
        .and_then(|results| results.get(0))
        .ok_or_else(|| FlattenError::missing("Results"))?
        .as_str()
        .ok_or_else(|| FlattenError::unexpected_type("Results", "a JSON string"))?;
    parse_blob(encoded)
}

fn normalize_score(item: &mut Document) -> Result<(), FlattenError> {
    let confidence = percent_string(require(item, "Score")?, "Score")?;
    take(item, "Score")?;
    item.insert("Confidence".to_string(), Value::String(confidence));
    Ok(())
}

pub(super) fn flatten_entities(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let mut results = unwrap_results(blob)?;
    if results.get("Entities").is_none() {
        return Err(FlattenError::missing("Entities"));
    }
    let entities = take_items(&mut results, "Entities");

    Ok(flatten_items(ctx, operator, entities, |entity| {
        rename(entity, "Type", "EntityType")?;
        rename(entity, "Text", "EntityText")?;
        normalize_score(entity)?;
        ctx.tag(entity, operator);
        Ok(())
    }))
}

pub(super) fn flatten_key_phrases(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    let mut results = unwrap_results(blob)?;
    if results.get("KeyPhrases").is_none() {
        return Err(FlattenError::missing("KeyPhrases"));
    }
    let phrases = take_items(&mut results, "KeyPhrases");

    Ok(flatten_items(ctx, operator, phrases, |phrase| {
        rename(phrase, "Text", "PhraseText")?;
        normalize_score(phrase)?;
        ctx.tag(phrase, operator);
        Ok(())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> FlattenContext<'static> {
        FlattenContext::new("asset-1", "workflow-1")
    }

    fn wrap(inner: Value) -> String {
        json!({"LanguageCode": "en", "Results": [inner.to_string()]}).to_string()
    }

    #[test]
    fn test_entities() {
        let blob = wrap(json!({
            "Entities": [
                {"BeginOffset": 0, "EndOffset": 6, "Score": 0.5, "Text": "Amazon", "Type": "ORGANIZATION"},
                {"BeginOffset": 10, "Text": "no score", "Type": "OTHER"}
            ]
        }));

        let docs = flatten_entities(&ctx(), "entities", &blob).unwrap();

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc["EntityType"], "ORGANIZATION");
        assert_eq!(doc["EntityText"], "Amazon");
        assert_eq!(doc["Confidence"], "50.0");
        assert_eq!(doc["BeginOffset"], 0);
        assert!(!doc.contains_key("Type"));
        assert!(!doc.contains_key("Text"));
        assert!(!doc.contains_key("Score"));
        assert_eq!(doc["Operator"], "entities");
        assert_eq!(doc["Workflow"], "workflow-1");
    }

    #[test]
    fn test_key_phrases() {
        let blob = wrap(json!({"KeyPhrases": [{"Score": 0.25, "Text": "the river"}]}));

        let docs = flatten_key_phrases(&ctx(), "key_phrases", &blob).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["PhraseText"], "the river");
        assert_eq!(docs[0]["Confidence"], "25.0");
        assert_eq!(docs[0]["Operator"], "key_phrases");
    }

    #[test]
    fn test_results_must_be_encoded_json() {
        assert_eq!(
            flatten_entities(&ctx(), "entities", r#"{"Results": []}"#),
            Err(FlattenError::missing("Results"))
        );
        assert!(matches!(
            flatten_entities(&ctx(), "entities", r#"{"Results": [{"Entities": []}]}"#),
            Err(FlattenError::UnexpectedType { .. })
        ));
        assert!(matches!(
            flatten_key_phrases(&ctx(), "key_phrases", r#"{"Results": ["not json"]}"#),
            Err(FlattenError::InvalidJson(_))
        ));
    }
}
