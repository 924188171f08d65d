//! Opaque editor view state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cursor, scroll and fold state captured by the editor widget.
///
/// The browser never inspects it; it only stores and returns it per tab.
/// (De)serialization of the concrete shape is left to the widget through
/// [`ViewState::encode`] and [`ViewState::decode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewState(Value);

impl ViewState {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Capture a widget-defined state value.
    pub fn encode<T: Serialize>(state: &T) -> serde_json::Result<Self> {
        serde_json::to_value(state).map(Self)
    }

    /// Restore a widget-defined state value.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ViewState {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
