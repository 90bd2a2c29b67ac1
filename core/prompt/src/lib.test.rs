use super::*;

#[test]
fn empty_tool_list_renders_none() {
    let options = PromptOptions::default();
    let call = PromptCall { selected_tools: &[], cwd: "/workspace" };
    let prompt = build_system_prompt(&options, &call);
    assert!(prompt.contains("Available tools:\n(none)"));
}

#[test]
fn selected_tools_render_their_descriptions() {
    let options = PromptOptions::default();
    let tools = vec!["read".to_string(), "bash".to_string()];
    let call = PromptCall { selected_tools: &tools, cwd: "/workspace" };
    let prompt = build_system_prompt(&options, &call);
    assert!(prompt.contains("- read:"));
    assert!(prompt.contains("- bash:"));
    assert!(prompt.contains("Guidelines:"));
}

#[test]
fn custom_prompt_replaces_tool_section_but_keeps_footer() {
    let options = PromptOptions { custom_prompt: Some("Do the thing.".into()), ..Default::default() };
    let call = PromptCall { selected_tools: &[], cwd: "/workspace" };
    let prompt = build_system_prompt(&options, &call);
    assert!(prompt.starts_with("Do the thing."));
    assert!(!prompt.contains("Available tools"));
    assert!(prompt.contains("Working directory: /workspace"));
}

#[test]
fn context_files_render_under_project_context_heading() {
    let options = PromptOptions {
        context_files: vec![ContextFile { path: "README.md".into(), content: "hello".into() }],
        ..Default::default()
    };
    let call = PromptCall { selected_tools: &[], cwd: "/workspace" };
    let prompt = build_system_prompt(&options, &call);
    assert!(prompt.contains("# Project Context"));
    assert!(prompt.contains("## README.md"));
    assert!(prompt.contains("hello"));
}

#[test]
fn disabled_skills_are_omitted_and_xml_is_escaped() {
    let options = PromptOptions {
        skills: vec![
            Skill { name: "visible".into(), description: "uses <tags> & \"quotes\"".into(), disable_model_invocation: false },
            Skill { name: "hidden".into(), description: "nope".into(), disable_model_invocation: true },
        ],
        ..Default::default()
    };
    let call = PromptCall { selected_tools: &[], cwd: "/workspace" };
    let prompt = build_system_prompt(&options, &call);
    assert!(prompt.contains("<available_skills>"));
    assert!(prompt.contains("uses &lt;tags&gt; &amp; &quot;quotes&quot;"));
    assert!(!prompt.contains("hidden"));
}

#[test]
fn append_system_prompt_is_last() {
    let options = PromptOptions { append_system_prompt: Some("final note".into()), ..Default::default() };
    let call = PromptCall { selected_tools: &[], cwd: "/workspace" };
    let prompt = build_system_prompt(&options, &call);
    assert!(prompt.trim_end().ends_with("final note"));
}
