//! A pure function that assembles the system prompt handed to the model:
//! tool descriptions, project context files, visible skills, and the
//! caller's own prompt text, composed in a fixed order.
//!
//! Nothing here touches the filesystem or a clock beyond formatting
//! `Utc::now()` into the footer — the caller supplies everything else, so
//! the whole thing is trivially testable.

use chrono::Utc;
use forge_tools::ToolRegistry;

/// A file to surface to the model as project context, already read by the
/// caller.
#[derive(Debug, Clone)]
pub struct ContextFile {
    pub path: String,
    pub content: String,
}

/// A skill definition. Only `name`/`description` are rendered; a skill
/// with `disable_model_invocation` set is omitted entirely rather than
/// rendered but marked unusable — an invisible skill shouldn't cost the
/// model any attention.
#[derive(Debug, Clone)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub disable_model_invocation: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub custom_prompt: Option<String>,
    pub append_system_prompt: Option<String>,
    pub context_files: Vec<ContextFile>,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone)]
pub struct PromptCall<'a> {
    pub selected_tools: &'a [String],
    pub cwd: &'a str,
}

const USAGE_GUIDELINES: &str = "Guidelines:\n\
- Prefer `grep`, `find`, or `ls` over `bash` when one of them covers the task.\n\
- Read a file before editing it.\n\
- Use `write` only to create new files; use `edit` for existing ones.\n\
- Reference file paths explicitly so the user can locate them.\n\
- Be concise; do not narrate steps the user cannot act on.";

/// Composes the full system prompt for a turn.
pub fn build_system_prompt(options: &PromptOptions, call: &PromptCall<'_>) -> String {
    let mut sections: Vec<String> = Vec::new();

    match &options.custom_prompt {
        Some(custom) => sections.push(custom.clone()),
        None => sections.push(render_tool_section(call.selected_tools)),
    }

    if !options.context_files.is_empty() {
        sections.push(render_context_files(&options.context_files));
    }

    let visible_skills: Vec<&Skill> = options.skills.iter().filter(|s| !s.disable_model_invocation).collect();
    if !visible_skills.is_empty() {
        sections.push(render_skills(&visible_skills));
    }

    sections.push(render_footer(call.cwd));

    if let Some(append) = &options.append_system_prompt {
        sections.push(append.clone());
    }

    sections.join("\n\n")
}

fn render_tool_section(selected_tools: &[String]) -> String {
    let registry = ToolRegistry::standard();
    if selected_tools.is_empty() {
        return "Available tools:\n(none)".to_string();
    }
    let lines: Vec<String> = selected_tools
        .iter()
        .map(|name| match registry.get(name) {
            Some(tool) => format!("- {}: {}", tool.name(), tool.description()),
            None => format!("- {name}"),
        })
        .collect();
    format!("Available tools:\n{}\n\n{}", lines.join("\n"), USAGE_GUIDELINES)
}

fn render_context_files(files: &[ContextFile]) -> String {
    let mut out = String::from("# Project Context\n");
    for file in files {
        out.push_str(&format!("\n## {}\n{}\n", file.path, file.content));
    }
    out
}

fn render_skills(skills: &[&Skill]) -> String {
    let mut out = String::from("<available_skills>\n");
    for skill in skills {
        out.push_str(&format!(
            "  <skill name=\"{}\">{}</skill>\n",
            escape_xml(&skill.name),
            escape_xml(&skill.description)
        ));
    }
    out.push_str("</available_skills>");
    out
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn render_footer(cwd: &str) -> String {
    format!("Current time: {}\nWorking directory: {}", Utc::now().to_rfc3339(), cwd)
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
