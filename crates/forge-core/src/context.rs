//! Contexto de build con alcance de run.
//!
//! Todo estado mutable vive aquí, construido fresco por invocación: no hay
//! registries estáticos de proceso. Las condiciones de activación de los
//! steps se evalúan contra estas propiedades.

use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Default, Clone)]
pub struct BuildContext {
    properties: IndexMap<String, Value>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self { properties: IndexMap::new() }
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Flag booleano; ausente o no-booleano cuenta como `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.properties.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Propiedades en orden de inserción (determinista).
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}
