//! Connectors adapt stored field values to and from UI props.
//!
//! A connector has one required job, [`Connector::props`], which turns the
//! value held in the store into something a view can render. Everything else
//! is an optional capability exposed through an accessor:
//!
//! | Capability | Trait | Used by |
//! |------------|-------|---------|
//! | `from_store` | [`FromStore`] | validation data builder |
//! | `to_store` | [`ToStore`] | [`convert_to_store`](crate::actions::convert_to_store) |
//! | `default_store_value` | [`DefaultStoreValue`] | [`form_defaults`](crate::actions::form_defaults) |
//!
//! Missing capabilities are reported when a form is registered, so a broken
//! connector fails once with every gap listed instead of per call.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use serde_json::json;

/// Callback a connector uses to report a new stored value for its field.
pub type ChangeCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Render-ready props produced by a connector.
#[derive(Clone)]
pub struct ConnectorProps {
    /// Value to render.
    pub value: Value,
    /// Handler taking a raw UI value.
    pub on_change: Option<ChangeCallback>,
}

impl ConnectorProps {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            on_change: None,
        }
    }

    pub fn with_on_change(mut self, on_change: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(on_change));
        self
    }

    /// Forward a raw UI value to the connector's change handler, if any.
    pub fn change(&self, raw: Value) {
        if let Some(on_change) = &self.on_change {
            on_change(raw);
        }
    }
}

impl fmt::Debug for ConnectorProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorProps")
            .field("value", &self.value)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Optional connector capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    FromStore,
    ToStore,
    DefaultStoreValue,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::FromStore,
        Capability::ToStore,
        Capability::DefaultStoreValue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::FromStore => "from_store",
            Self::ToStore => "to_store",
            Self::DefaultStoreValue => "default_store_value",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A small set of [`Capability`] values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    from_store: bool,
    to_store: bool,
    default_store_value: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Capability::ALL.into_iter().collect()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        *self.slot(capability) = true;
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::FromStore => self.from_store,
            Capability::ToStore => self.to_store,
            Capability::DefaultStoreValue => self.default_store_value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }

    /// Capabilities in `self` that `other` lacks.
    pub fn missing_from(&self, other: &Capabilities) -> Vec<Capability> {
        self.iter().filter(|c| !other.contains(*c)).collect()
    }

    fn slot(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::FromStore => &mut self.from_store,
            Capability::ToStore => &mut self.to_store,
            Capability::DefaultStoreValue => &mut self.default_store_value,
        }
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Capabilities::none(), |set, c| set.with(c))
    }
}

/// Read the validatable value out of a stored value.
pub trait FromStore {
    fn from_store(&self, stored: &Value) -> Value;
}

/// Convert a raw value into the stored shape.
pub trait ToStore {
    fn to_store(&self, value: Value, options: &Value) -> Value;
}

/// Produce the stored value a fresh form starts with.
pub trait DefaultStoreValue {
    fn default_store_value(&self, options: &Value) -> Value;
}

/// Adapter between a stored field value and UI props.
pub trait Connector: Send + Sync {
    /// Name used in log and error messages.
    fn name(&self) -> &str;

    /// Build props for rendering. `on_change` receives new stored values.
    fn props(&self, stored: &Value, on_change: ChangeCallback) -> ConnectorProps;

    fn as_from_store(&self) -> Option<&dyn FromStore> {
        None
    }

    fn as_to_store(&self) -> Option<&dyn ToStore> {
        None
    }

    fn as_default_store_value(&self) -> Option<&dyn DefaultStoreValue> {
        None
    }

    /// Capabilities this connector provides.
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::none();
        if self.as_from_store().is_some() {
            caps = caps.with(Capability::FromStore);
        }
        if self.as_to_store().is_some() {
            caps = caps.with(Capability::ToStore);
        }
        if self.as_default_store_value().is_some() {
            caps = caps.with(Capability::DefaultStoreValue);
        }
        caps
    }
}

/// Connector for text-like inputs.
///
/// Stores `{ "value": <raw> }`, renders and validates the inner value. An
/// optional `"default"` key in the field options seeds the initial value.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputConnector;

impl InputConnector {
    pub fn shared() -> Arc<dyn Connector> {
        Arc::new(Self)
    }
}

impl Connector for InputConnector {
    fn name(&self) -> &str {
        "InputConnector"
    }

    fn props(&self, stored: &Value, on_change: ChangeCallback) -> ConnectorProps {
        let value = stored.get("value").cloned().unwrap_or(Value::Null);
        ConnectorProps::new(value).with_on_change(move |raw| on_change(json!({ "value": raw })))
    }

    fn as_from_store(&self) -> Option<&dyn FromStore> {
        Some(self)
    }

    fn as_to_store(&self) -> Option<&dyn ToStore> {
        Some(self)
    }

    fn as_default_store_value(&self) -> Option<&dyn DefaultStoreValue> {
        Some(self)
    }
}

impl FromStore for InputConnector {
    fn from_store(&self, stored: &Value) -> Value {
        stored.get("value").cloned().unwrap_or(Value::Null)
    }
}

impl ToStore for InputConnector {
    fn to_store(&self, value: Value, _options: &Value) -> Value {
        json!({ "value": value })
    }
}

impl DefaultStoreValue for InputConnector {
    fn default_store_value(&self, options: &Value) -> Value {
        let initial = options.get("default").cloned().unwrap_or_else(|| json!(""));
        json!({ "value": initial })
    }
}

/// Connector for multi-select inputs.
///
/// Stores `{ "selected": [..] }`. With `{"multiple": false}` in the field
/// options only the last chosen item is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectConnector;

impl Connector for SelectConnector {
    fn name(&self) -> &str {
        "SelectConnector"
    }

    fn props(&self, stored: &Value, on_change: ChangeCallback) -> ConnectorProps {
        let selected = stored.get("selected").cloned().unwrap_or_else(|| json!([]));
        ConnectorProps::new(selected).with_on_change(move |raw| {
            let selected = match raw {
                Value::Array(items) => Value::Array(items),
                Value::Null => json!([]),
                single => json!([single]),
            };
            on_change(json!({ "selected": selected }))
        })
    }

    fn as_from_store(&self) -> Option<&dyn FromStore> {
        Some(self)
    }

    fn as_to_store(&self) -> Option<&dyn ToStore> {
        Some(self)
    }

    fn as_default_store_value(&self) -> Option<&dyn DefaultStoreValue> {
        Some(self)
    }
}

impl FromStore for SelectConnector {
    fn from_store(&self, stored: &Value) -> Value {
        stored.get("selected").cloned().unwrap_or_else(|| json!([]))
    }
}

impl ToStore for SelectConnector {
    fn to_store(&self, value: Value, options: &Value) -> Value {
        let multiple = options
            .get("multiple")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let mut items = match value {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };
        if !multiple && items.len() > 1 {
            items = items.split_off(items.len() - 1);
        }
        json!({ "selected": items })
    }
}

impl DefaultStoreValue for SelectConnector {
    fn default_store_value(&self, _options: &Value) -> Value {
        json!({ "selected": [] })
    }
}
