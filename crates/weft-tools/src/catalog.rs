//! Built-in component generators.
//!
//! Each generator binds its two-way fields under `/ui/<component-id>/value`
//! and ships the initial data patch alongside the components, so a surface
//! renders with defined state on the very first frame.

use crate::{GeneratedUi, GeneratorRegistry, IdGen, ToolError, TypedGenerator};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use weft_state::{Patch, PatchOp, Path};
use weft_surface::{ActionSpec, Component, ComponentKind, PropValue};

fn value_path(component_id: &str) -> Path {
    Path::root().key("ui").key(component_id).key("value")
}

/// Arguments for [`CreateCheckBox`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CheckBoxArgs {
    /// Label shown next to the checkbox.
    pub label: String,
    /// Initial checked state.
    #[serde(default)]
    pub checked: bool,
}

/// `create_checkbox` — one checkbox bound to a fresh data model path.
pub struct CreateCheckBox;

impl TypedGenerator for CreateCheckBox {
    type Args = CheckBoxArgs;

    fn tool_name(&self) -> &str {
        "create_checkbox"
    }

    fn description(&self) -> &str {
        "Create a checkbox the user can tick, e.g. to agree to terms. \
         The checkbox value is stored in the surface data model."
    }

    fn build(&self, args: CheckBoxArgs, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError> {
        let id = ids.next_id("checkbox");
        let path = value_path(&id);
        let component = Component::check_box(id, args.label.as_str(), path.clone());
        let patch = Patch::new().with_op(PatchOp::replace(path, json!(args.checked)));
        Ok(GeneratedUi::single(component, patch))
    }
}

/// Arguments for [`CreateTextField`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TextFieldArgs {
    /// Label shown above the field.
    pub label: String,
    /// Placeholder shown while the field is empty.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Initial field content.
    #[serde(default)]
    pub initial: Option<String>,
}

/// `create_text_field` — a single-line input bound to the data model.
pub struct CreateTextField;

impl TypedGenerator for CreateTextField {
    type Args = TextFieldArgs;

    fn tool_name(&self) -> &str {
        "create_text_field"
    }

    fn description(&self) -> &str {
        "Create a single-line text input. Every keystroke updates the \
         surface data model locally."
    }

    fn build(&self, args: TextFieldArgs, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError> {
        let id = ids.next_id("textfield");
        let path = value_path(&id);
        let component = Component::new(
            id,
            ComponentKind::TextField {
                label: Some(PropValue::literal(args.label)),
                value: PropValue::Path(path.clone()),
                placeholder: args.placeholder.map(PropValue::literal),
            },
        );
        let initial = args.initial.unwrap_or_default();
        let patch = Patch::new().with_op(PatchOp::replace(path, json!(initial)));
        Ok(GeneratedUi::single(component, patch))
    }
}

/// Arguments for [`CreateButton`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ButtonArgs {
    /// Button label.
    pub label: String,
    /// Action name fired on press; omit for a purely decorative button.
    #[serde(default)]
    pub action_name: Option<String>,
}

/// `create_button` — a button, optionally firing a named action.
pub struct CreateButton;

impl TypedGenerator for CreateButton {
    type Args = ButtonArgs;

    fn tool_name(&self) -> &str {
        "create_button"
    }

    fn description(&self) -> &str {
        "Create a button. When action_name is set, pressing it sends that \
         action back to the agent."
    }

    fn build(&self, args: ButtonArgs, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError> {
        let id = ids.next_id("button");
        let action = args.action_name.map(ActionSpec::new);
        Ok(GeneratedUi::single(
            Component::button(id, args.label.as_str(), action),
            Patch::new(),
        ))
    }
}

/// Arguments for [`CreateText`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TextArgs {
    /// Text content.
    pub text: String,
}

/// `create_text` — static text.
pub struct CreateText;

impl TypedGenerator for CreateText {
    type Args = TextArgs;

    fn tool_name(&self) -> &str {
        "create_text"
    }

    fn description(&self) -> &str {
        "Create a block of static text."
    }

    fn build(&self, args: TextArgs, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError> {
        let id = ids.next_id("text");
        Ok(GeneratedUi::single(
            Component::text(id, args.text.as_str()),
            Patch::new(),
        ))
    }
}

/// One bar of a chart.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct BarDatum {
    /// Bar label.
    pub label: String,
    /// Bar value.
    pub value: f64,
}

/// Arguments for [`CreateBarChart`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct BarChartArgs {
    /// Chart title.
    #[serde(default)]
    pub title: Option<String>,
    /// Bars, in display order.
    pub data: Vec<BarDatum>,
}

/// `create_bar_chart` — a bar chart fed from the data model, so later
/// `dataModelUpdate`s can re-render it without replacing the component.
pub struct CreateBarChart;

impl TypedGenerator for CreateBarChart {
    type Args = BarChartArgs;

    fn tool_name(&self) -> &str {
        "create_bar_chart"
    }

    fn description(&self) -> &str {
        "Create a bar chart from labelled numeric data."
    }

    fn build(&self, args: BarChartArgs, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError> {
        let id = ids.next_id("barchart");
        let data_path = Path::root().key("ui").key(&id).key("data");
        let component = Component::new(
            id,
            ComponentKind::BarChart {
                title: args.title.map(PropValue::literal),
                data: PropValue::Path(data_path.clone()),
            },
        );
        let rows: Vec<Value> = args
            .data
            .iter()
            .map(|d| json!({"label": d.label, "value": d.value}))
            .collect();
        let patch = Patch::new().with_op(PatchOp::replace(data_path, Value::Array(rows)));
        Ok(GeneratedUi::single(component, patch))
    }
}

/// One field of a form.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FormFieldArgs {
    /// Field label; also the basis of the action context key.
    pub label: String,
    /// Field kind.
    #[serde(default)]
    pub kind: FormFieldKind,
}

/// Supported form field kinds.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormFieldKind {
    /// A single-line text input.
    #[default]
    Text,
    /// A checkbox.
    Checkbox,
}

/// Arguments for [`CreateForm`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FormArgs {
    /// Form heading.
    #[serde(default)]
    pub title: Option<String>,
    /// Fields, in display order.
    pub fields: Vec<FormFieldArgs>,
    /// Submit button label.
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    /// Action name fired by the submit button.
    #[serde(default = "default_action_name")]
    pub action_name: String,
}

fn default_submit_label() -> String {
    "Submit".to_string()
}

fn default_action_name() -> String {
    "submit".to_string()
}

/// `create_form` — a column of labelled inputs plus a submit button whose
/// action context snapshots every field.
pub struct CreateForm;

impl TypedGenerator for CreateForm {
    type Args = FormArgs;

    fn tool_name(&self) -> &str {
        "create_form"
    }

    fn description(&self) -> &str {
        "Create a form: labelled inputs stacked in a column with a submit \
         button. Submitting sends every field value back to the agent."
    }

    fn build(&self, args: FormArgs, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError> {
        if args.fields.is_empty() {
            return Err(ToolError::InvalidArguments(
                "a form needs at least one field".to_string(),
            ));
        }

        let mut components = Vec::new();
        let mut children = Vec::new();
        let mut patch = Patch::new();
        let mut action = ActionSpec::new(args.action_name);

        if let Some(title) = &args.title {
            let id = ids.next_id("text");
            components.push(Component::text(&id, title.as_str()));
            children.push(id);
        }

        for field in &args.fields {
            let (id, initial) = match field.kind {
                FormFieldKind::Text => (ids.next_id("textfield"), json!("")),
                FormFieldKind::Checkbox => (ids.next_id("checkbox"), json!(false)),
            };
            let path = value_path(&id);
            let component = match field.kind {
                FormFieldKind::Text => Component::new(
                    &id,
                    ComponentKind::TextField {
                        label: Some(PropValue::literal(field.label.as_str())),
                        value: PropValue::Path(path.clone()),
                        placeholder: None,
                    },
                ),
                FormFieldKind::Checkbox => {
                    Component::check_box(&id, field.label.as_str(), path.clone())
                }
            };
            patch.push(PatchOp::replace(path.clone(), initial));
            action = action.with_context(context_key(&field.label), PropValue::Path(path));
            components.push(component);
            children.push(id);
        }

        let button_id = ids.next_id("button");
        components.push(Component::button(
            &button_id,
            args.submit_label.as_str(),
            Some(action),
        ));
        children.push(button_id);

        let root_id = ids.next_id("column");
        components.push(Component::column(&root_id, children));

        Ok(GeneratedUi {
            root_id,
            components,
            data_patch: patch,
        })
    }
}

/// Derive a stable context key from a field label: lowercase, runs of
/// non-alphanumerics collapse to a single underscore.
fn context_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let mut last_sep = true;
    for c in label.chars() {
        if c.is_alphanumeric() {
            key.extend(c.to_lowercase());
            last_sep = false;
        } else if !last_sep {
            key.push('_');
            last_sep = true;
        }
    }
    key.trim_end_matches('_').to_string()
}

/// Registry pre-populated with every built-in generator.
pub fn default_registry() -> GeneratorRegistry {
    GeneratorRegistry::new()
        .with(Arc::new(CreateCheckBox))
        .with(Arc::new(CreateTextField))
        .with(Arc::new(CreateButton))
        .with(Arc::new(CreateText))
        .with(Arc::new(CreateBarChart))
        .with(Arc::new(CreateForm))
}
