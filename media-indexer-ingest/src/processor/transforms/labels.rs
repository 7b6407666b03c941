//! Label detection and generic data lookup.

use serde_json::{json, Value};

use super::{flatten_items, FlattenContext};
use crate::errors::FlattenError;
use crate::processor::values::{
    as_object, empty, pages, parse_blob, percent_string, require, require_in, scaled_number,
    take_items, to_f64,
};
use media_indexer_shared::Document;

/// Height of the frame generic data boxes are expressed in.
const FRAME_HEIGHT: f64 = 720.0;
/// Width of the frame generic data boxes are expressed in.
const FRAME_WIDTH: f64 = 1280.0;

fn labels(blob: &str) -> Result<impl Iterator<Item = Value>, FlattenError> {
    Ok(pages(parse_blob(blob)?)
        .into_iter()
        .flat_map(|mut page| take_items(&mut page, "Labels")))
}

/// Flatten labels produced by an external lookup.
///
/// These come with fractional confidences and pixel boxes in a 1280x720
/// frame; they are rewritten to match label detection output.
pub(super) fn flatten_generic(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    Ok(flatten_items(ctx, operator, labels(blob)?, |item| {
        ctx.tag(item, operator);
        let Some(label) = item.get("Label") else {
            return Ok(());
        };

        let confidence = percent_string(require_in(label, "Confidence")?, "Confidence")?;
        let name = require_in(label, "Name")?.clone();
        let instances = match label.get("Instances") {
            Some(Value::Array(instances)) => Value::Array(
                instances
                    .iter()
                    .map(normalize_instance)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(other) => other.clone(),
            None => empty(),
        };
        let parents = label.get("Parents").cloned().unwrap_or_else(empty);

        item.insert("Confidence".to_string(), Value::String(confidence));
        item.insert("Name".to_string(), name);
        item.insert("Instances".to_string(), instances);
        item.insert("Parents".to_string(), parents);
        item.remove("Label");
        Ok(())
    }))
}

fn normalize_instance(instance: &Value) -> Result<Value, FlattenError> {
    let mut instance = as_object(instance, "Instances")?.clone();
    let mut bounding_box = as_object(require(&instance, "BoundingBox")?, "BoundingBox")?.clone();

    for (side, extent) in [
        ("Height", FRAME_HEIGHT),
        ("Top", FRAME_HEIGHT),
        ("Left", FRAME_WIDTH),
        ("Width", FRAME_WIDTH),
    ] {
        let scaled = to_f64(require(&bounding_box, side)?, side)? / extent;
        bounding_box.insert(side.to_string(), json!(scaled));
    }
    let confidence = scaled_number(require(&instance, "Confidence")?, "Confidence", 100.0)?;

    instance.insert("BoundingBox".to_string(), Value::Object(bounding_box));
    instance.insert("Confidence".to_string(), confidence);
    Ok(Value::Object(instance))
}

/// Flatten labels detected in video or images.
pub(super) fn flatten_detection(
    ctx: &FlattenContext<'_>,
    operator: &str,
    blob: &str,
) -> Result<Vec<Document>, FlattenError> {
    Ok(flatten_items(ctx, operator, labels(blob)?, |item| {
        ctx.tag(item, operator);
        let Some(label) = item.get("Label") else {
            return Ok(());
        };

        let confidence = require_in(label, "Confidence")?.clone();
        let name = require_in(label, "Name")?.clone();
        let instances = label.get("Instances").cloned().unwrap_or_else(empty);
        let parents = label.get("Parents").cloned().unwrap_or_else(empty);

        item.insert("Confidence".to_string(), confidence);
        item.insert("Name".to_string(), name);
        item.insert("Instances".to_string(), instances);
        item.insert("Parents".to_string(), parents);
        item.remove("Label");
        Ok(())
    }))
}
