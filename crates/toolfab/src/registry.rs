use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::chat::Tool;

/// Host-side implementation behind one catalog entry.
///
/// `call` must never fail past its own boundary: an implementation that hits
/// a transport or provider problem converts it into an error payload (see
/// [`error_payload`]) and returns that as its result text.
#[async_trait]
pub trait CallTool: Send + Sync {
    fn descriptor(&self) -> Tool;
    async fn call(&self, args: Value) -> String;
}

/// Fixed mapping from tool name to implementation, built once at startup.
///
/// The catalog keeps registration order so every outbound request advertises
/// the same descriptor bytes.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn CallTool>>,
    catalog: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its descriptor name. Re-registering a name
    /// replaces both the implementation and its catalog entry in place.
    pub fn register(&mut self, tool: Arc<dyn CallTool>) {
        let descriptor = tool.descriptor();
        let name = descriptor.function.name.clone();
        if self.tools.insert(name.clone(), tool).is_some() {
            if let Some(slot) = self
                .catalog
                .iter_mut()
                .find(|t| t.function.name == name)
            {
                *slot = descriptor;
            }
        } else {
            self.catalog.push(descriptor);
        }
    }

    /// Looks up an implementation by name. Unknown names are the caller's
    /// problem to surface; this never panics.
    pub fn find(&self, name: &str) -> Option<Arc<dyn CallTool>> {
        self.tools.get(name).cloned()
    }

    /// The ordered descriptor list advertised to the model.
    pub fn catalog(&self) -> &[Tool] {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

/// The fallback payload shape shared by every recovery path in the harness:
/// tool transport failures, malformed arguments and unknown tool names all
/// come back as `{"error": "Failed to <operation>: <message>"}`.
pub fn error_payload(operation: &str, message: &str) -> String {
    serde_json::json!({ "error": format!("Failed to {operation}: {message}") }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FunctionBuilder;

    struct Echo(&'static str);

    #[async_trait]
    impl CallTool for Echo {
        fn descriptor(&self) -> Tool {
            FunctionBuilder::new(self.0).build()
        }
        async fn call(&self, _args: Value) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn unknown_name_yields_none_without_panicking() {
        let registry = ToolRegistry::new();
        assert!(registry.find("get_stock_price").is_none());
    }

    #[test]
    fn catalog_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("get_joke")));
        registry.register(Arc::new(Echo("get_quote")));
        registry.register(Arc::new(Echo("get_time")));

        let names: Vec<_> = registry
            .catalog()
            .iter()
            .map(|t| t.function.name.as_str())
            .collect();
        assert_eq!(names, ["get_joke", "get_quote", "get_time"]);
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("get_joke")));
        registry.register(Arc::new(Echo("get_quote")));
        registry.register(Arc::new(Echo("get_joke")));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn error_payload_matches_contract_shape() {
        let payload = error_payload("get weather", "boom");
        let value: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["error"], "Failed to get weather: boom");
    }
}
