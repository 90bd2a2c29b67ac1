//! Tracks which files were read, written, or edited across a range of
//! messages being summarized, so the summary can tell the model what it
//! already knows about the working tree without re-reading it.

use std::collections::BTreeSet;

use forge_message::{AssistantPart, Message};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileOperations {
    pub read: BTreeSet<String>,
    pub written: BTreeSet<String>,
    pub edited: BTreeSet<String>,
}

impl FileOperations {
    pub fn seed_from(previous: Option<&forge_session::FileOperationDetails>) -> Self {
        let mut ops = Self::default();
        if let Some(previous) = previous {
            ops.read.extend(previous.read_files.iter().cloned());
            ops.written.extend(previous.modified_files.iter().cloned());
        }
        ops
    }

    pub fn observe(&mut self, message: &Message) {
        let Message::Assistant(assistant) = message else { return };
        for part in &assistant.content {
            let AssistantPart::ToolCall { name, arguments, .. } = part else { continue };
            let Some(path) = arguments.get("path").and_then(|v| v.as_str()) else { continue };
            match name.as_str() {
                "read" => {
                    self.read.insert(path.to_string());
                }
                "write" => {
                    self.written.insert(path.to_string());
                }
                "edit" => {
                    self.edited.insert(path.to_string());
                }
                _ => {}
            }
        }
    }

    pub fn read_only_files(&self) -> Vec<String> {
        self.read.difference(&self.modified_files_set()).cloned().collect()
    }

    pub fn modified_files(&self) -> Vec<String> {
        self.modified_files_set().into_iter().collect()
    }

    fn modified_files_set(&self) -> BTreeSet<String> {
        self.edited.union(&self.written).cloned().collect()
    }

    pub fn to_details(&self) -> forge_session::FileOperationDetails {
        forge_session::FileOperationDetails { read_files: self.read_only_files(), modified_files: self.modified_files() }
    }
}

#[cfg(test)]
#[path = "file_ops.test.rs"]
mod tests;
