//! Typed diagram configuration.
//!
//! Every section deserializes with defaults, so a partial JSON object is a valid config.
//! Overrides are applied by deep-merging JSON objects onto the serialized defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub geometry: GeometryConfig,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub interaction: InteractionConfig,
}

impl DiagramConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidConfig {
                message: "expected a JSON object".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Applies `overrides` on top of this config. Objects merge key by key; any other value
    /// replaces the current one.
    pub fn merge_json(&mut self, overrides: &Value) -> Result<()> {
        let mut base = self.to_value();
        deep_merge_value(&mut base, overrides);
        *self = Self::from_value(base)?;
        Ok(())
    }
}

/// How overlapping handle hit areas are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleResolution {
    /// The geometrically closest handle wins; ties go to iteration order.
    #[default]
    Nearest,
    /// The first handle in iteration order whose hit area contains the point.
    FirstMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Radius of the drawn handle circle.
    pub handle_radius: f64,
    /// Extra invisible pointer tolerance around each handle.
    pub hit_margin: f64,
    /// Boundary tolerance for interactive hit tests.
    pub hit_epsilon: f64,
    pub handle_resolution: HandleResolution,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            node_height: 40.0,
            handle_radius: 7.0,
            hit_margin: 10.0,
            hit_epsilon: 0.05,
            handle_resolution: HandleResolution::Nearest,
        }
    }
}

impl GeometryConfig {
    pub fn interactive_radius(&self) -> f64 {
        self.handle_radius + self.hit_margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayoutPolicy {
    /// Lay out again only when the task count, dependency count or viewport changes.
    #[default]
    OnCountChange,
    /// Lay out again after every structural mutation.
    EveryMutation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_sep: f64,
    pub rank_sep: f64,
    pub edge_sep: f64,
    pub margin: f64,
    pub order_sweeps: usize,
    pub balance_passes: usize,
    pub relayout: RelayoutPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_sep: 50.0,
            rank_sep: 80.0,
            edge_sep: 20.0,
            margin: 20.0,
            order_sweeps: 4,
            balance_passes: 2,
            relayout: RelayoutPolicy::OnCountChange,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: String,
    pub node: String,
    pub selected_node: String,
    pub node_border: String,
    pub edge: String,
    pub text: String,
    pub font_size: f64,
    pub handle: String,
    pub handle_hover: String,
    pub handle_stroke: String,
    pub drag_line: String,
    pub debug: String,
    pub placeholder_fill: String,
    pub placeholder_text: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            node: "#1976d2".to_string(),
            selected_node: "#ffeb3b".to_string(),
            node_border: "#ffffff".to_string(),
            edge: "#555555".to_string(),
            text: "#ffffff".to_string(),
            font_size: 12.0,
            handle: "#4caf50".to_string(),
            handle_hover: "#81c784".to_string(),
            handle_stroke: "#333333".to_string(),
            drag_line: "#4caf50".to_string(),
            debug: "rgba(255, 0, 0, 0.5)".to_string(),
            placeholder_fill: "#f8d7da".to_string(),
            placeholder_text: "#721c24".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Forced redraw interval; identical frames older than this are drawn anyway.
    pub redraw_interval_ms: u64,
    /// Segments per full circle when tessellating for the GPU backend.
    pub circle_segments: u32,
    /// Padding between the drawing surface's edge and diagram space.
    pub container_padding: f64,
    pub theme: Theme,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            redraw_interval_ms: 1000,
            circle_segments: 24,
            container_padding: 20.0,
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Legacy shortcut: with a task selected, clicking another task body connects them.
    pub click_to_connect: bool,
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
