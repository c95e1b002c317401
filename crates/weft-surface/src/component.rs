//! Typed component nodes.
//!
//! Components form a closed tagged union: one variant per known kind, each
//! with its own property struct. Unknown kinds fail deserialization with a
//! typed error instead of passing through as an untyped map.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use weft_state::Path;

/// A component property value: an inline literal or a reference into the
/// surface's data model.
///
/// Wire shapes: `{"literalString": "hi"}`, `{"literalNumber": 3}`,
/// `{"literalBoolean": true}`, `{"literalMap": {...}}` or
/// `{"path": "/form/agreed"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PropValueWire", into = "PropValueWire")]
pub enum PropValue {
    /// An inline constant.
    Literal(Value),
    /// A data-model reference, read at resolution time.
    Path(Path),
}

impl PropValue {
    /// Create a literal property value.
    #[inline]
    pub fn literal(v: impl Into<Value>) -> Self {
        PropValue::Literal(v.into())
    }

    /// Create a path-reference property value.
    #[inline]
    pub fn path(p: impl Into<Path>) -> Self {
        PropValue::Path(p.into())
    }

    /// The referenced path, if this is a reference.
    #[inline]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            PropValue::Path(p) => Some(p),
            PropValue::Literal(_) => None,
        }
    }

    /// The literal value, if this is a literal.
    #[inline]
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            PropValue::Literal(v) => Some(v),
            PropValue::Path(_) => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Literal(Value::String(s.to_owned()))
    }
}

/// Externally tagged wire representation of [`PropValue`]. Literals carry a
/// type-specific key so clients can dispatch without sniffing JSON types.
#[derive(Clone, Serialize, Deserialize)]
enum PropValueWire {
    #[serde(rename = "literalString")]
    LiteralString(String),
    #[serde(rename = "literalNumber")]
    LiteralNumber(serde_json::Number),
    #[serde(rename = "literalBoolean")]
    LiteralBoolean(bool),
    #[serde(rename = "literalMap")]
    LiteralMap(Value),
    #[serde(rename = "path")]
    Path(Path),
}

impl From<PropValueWire> for PropValue {
    fn from(wire: PropValueWire) -> Self {
        match wire {
            PropValueWire::LiteralString(s) => PropValue::Literal(Value::String(s)),
            PropValueWire::LiteralNumber(n) => PropValue::Literal(Value::Number(n)),
            PropValueWire::LiteralBoolean(b) => PropValue::Literal(Value::Bool(b)),
            PropValueWire::LiteralMap(v) => PropValue::Literal(v),
            PropValueWire::Path(p) => PropValue::Path(p),
        }
    }
}

impl From<PropValue> for PropValueWire {
    fn from(value: PropValue) -> Self {
        match value {
            PropValue::Literal(Value::String(s)) => PropValueWire::LiteralString(s),
            PropValue::Literal(Value::Number(n)) => PropValueWire::LiteralNumber(n),
            PropValue::Literal(Value::Bool(b)) => PropValueWire::LiteralBoolean(b),
            PropValue::Literal(v) => PropValueWire::LiteralMap(v),
            PropValue::Path(p) => PropValueWire::Path(p),
        }
    }
}

/// An action declared on an actionable component (e.g. a button press).
///
/// Context entries are resolved against the data model when the action
/// fires; literals pass through unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Action name, routed back to the agent.
    pub name: String,
    /// Declared context: key to literal-or-path value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, PropValue>,
}

impl ActionSpec {
    /// Create an action with an empty context.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: BTreeMap::new(),
        }
    }

    /// Add a context entry (builder).
    pub fn with_context(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

/// The closed set of component kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ComponentKind {
    /// Static or bound text.
    Text {
        /// Text content.
        text: PropValue,
    },

    /// A pressable button, optionally firing a declared action.
    Button {
        /// Button label.
        label: PropValue,
        /// Action fired on press.
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<ActionSpec>,
    },

    /// A single-line text input, two-way bound via `value`.
    TextField {
        /// Field label.
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<PropValue>,
        /// Bound value, normally a path reference.
        value: PropValue,
        /// Placeholder shown when empty.
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<PropValue>,
    },

    /// A checkbox, two-way bound via `value`.
    CheckBox {
        /// Checkbox label.
        label: PropValue,
        /// Bound boolean value, normally a path reference.
        value: PropValue,
    },

    /// A numeric slider, two-way bound via `value`.
    Slider {
        /// Slider label.
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<PropValue>,
        /// Bound numeric value.
        value: PropValue,
        /// Minimum.
        min: f64,
        /// Maximum.
        max: f64,
    },

    /// A bar chart fed from the data model.
    BarChart {
        /// Chart title.
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<PropValue>,
        /// Data source, normally a path to an array of `{label, value}`.
        data: PropValue,
    },

    /// Vertical container of child components.
    Column {
        /// Ordered child component ids.
        children: Vec<String>,
    },

    /// Horizontal container of child components.
    Row {
        /// Ordered child component ids.
        children: Vec<String>,
    },
}

/// One node in a surface's component tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique id within the surface.
    pub id: String,
    /// Kind and properties.
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    /// Create a component.
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Create a text component.
    pub fn text(id: impl Into<String>, text: impl Into<PropValue>) -> Self {
        Self::new(id, ComponentKind::Text { text: text.into() })
    }

    /// Create a button component.
    pub fn button(
        id: impl Into<String>,
        label: impl Into<PropValue>,
        action: Option<ActionSpec>,
    ) -> Self {
        Self::new(
            id,
            ComponentKind::Button {
                label: label.into(),
                action,
            },
        )
    }

    /// Create a checkbox bound to `value_path`.
    pub fn check_box(id: impl Into<String>, label: impl Into<PropValue>, value_path: Path) -> Self {
        Self::new(
            id,
            ComponentKind::CheckBox {
                label: label.into(),
                value: PropValue::Path(value_path),
            },
        )
    }

    /// Create a column container.
    pub fn column(id: impl Into<String>, children: Vec<String>) -> Self {
        Self::new(id, ComponentKind::Column { children })
    }

    /// Ordered child ids for container kinds; empty for leaves.
    pub fn child_ids(&self) -> &[String] {
        match &self.kind {
            ComponentKind::Column { children } | ComponentKind::Row { children } => children,
            _ => &[],
        }
    }

    /// The declared action, for actionable kinds.
    pub fn action(&self) -> Option<&ActionSpec> {
        match &self.kind {
            ComponentKind::Button { action, .. } => action.as_ref(),
            _ => None,
        }
    }

    /// The wire name of this component's kind.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ComponentKind::Text { .. } => "text",
            ComponentKind::Button { .. } => "button",
            ComponentKind::TextField { .. } => "textField",
            ComponentKind::CheckBox { .. } => "checkBox",
            ComponentKind::Slider { .. } => "slider",
            ComponentKind::BarChart { .. } => "barChart",
            ComponentKind::Column { .. } => "column",
            ComponentKind::Row { .. } => "row",
        }
    }
}
