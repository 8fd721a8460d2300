use flowlayout::{layout_document, resolve_collisions, Algorithm, Direction, Document, LayoutConfig, LayoutOptions};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasmLayoutOptions {
    algorithm: Option<String>,
    direction: Option<String>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    resolve_collisions: Option<bool>,
}

fn build_layout_options(options: &WasmLayoutOptions) -> LayoutOptions {
    let mut layout_options = LayoutOptions::default();
    if let Some(name) = options.algorithm.as_deref() {
        layout_options.algorithm = Algorithm::from_name(name);
    }
    if let Some(token) = options.direction.as_deref() {
        layout_options.direction = Direction::from_token(token);
    }
    if let Some(spacing) = options.node_spacing {
        layout_options.spacing.0 = spacing;
    }
    if let Some(spacing) = options.rank_spacing {
        layout_options.spacing.1 = spacing;
    }
    layout_options
}

/// Lays out a JSON document (`{nodes, edges, groups}`) and returns the laid
/// out `{nodes, edges}` as JSON.
#[wasm_bindgen]
pub fn layout_diagram(document_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let doc = Document::from_str(document_json)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<WasmLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        WasmLayoutOptions::default()
    };

    let config = LayoutConfig::default();
    let mut layout = layout_document(&doc, &build_layout_options(&options), &config);
    if options.resolve_collisions.unwrap_or(false) {
        layout.nodes = resolve_collisions(&layout.nodes, &config.collision, &config);
    }
    serde_json::to_string(&layout).map_err(|error| JsValue::from_str(&error.to_string()))
}
