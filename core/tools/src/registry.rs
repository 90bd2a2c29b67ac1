//! A name-indexed collection of [`ToolHandler`]s, and the model-facing tool
//! definition each one renders to.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ToolHandler;

#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn ToolHandler>>,
    order: Vec<&'static str>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new(), order: Vec::new() }
    }

    /// The default read/write/edit/bash/grep/find/ls set, in the order the
    /// system-prompt builder lists them.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::read::ReadTool));
        registry.register(Arc::new(crate::write::WriteTool));
        registry.register(Arc::new(crate::edit::EditTool));
        registry.register(Arc::new(crate::bash::BashTool));
        registry.register(Arc::new(crate::grep::GrepTool));
        registry.register(Arc::new(crate::find::FindTool));
        registry.register(Arc::new(crate::ls::LsTool));
        registry
    }

    /// The subset of [`Self::standard`] that never mutates the filesystem
    /// or runs arbitrary commands.
    pub fn read_only() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::read::ReadTool));
        registry.register(Arc::new(crate::grep::GrepTool));
        registry.register(Arc::new(crate::find::FindTool));
        registry.register(Arc::new(crate::ls::LsTool));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) {
        let name = tool.name();
        if !self.tools.contains_key(name) {
            self.order.push(name);
        }
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> &[&'static str] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
