use std::sync::Arc;
use std::time::Duration;

use forge_model::testing::{ScriptedTurn, StubModel};
use forge_model::Part;
use forge_runtime::LocalRuntime;
use forge_session::PersistedSession;
use forge_tools::ToolRegistry;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use super::*;

fn test_config() -> AgentConfig {
    AgentConfig { selected_tools: vec!["read".into()], ..AgentConfig::default() }
}

fn test_agent(model: StubModel, event_tx: Option<mpsc::Sender<AgentEvent>>) -> (Agent, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = Agent::builder()
        .model(Arc::new(model))
        .tools(Arc::new(ToolRegistry::standard()))
        .runtime(Arc::new(LocalRuntime::new()))
        .cwd(dir.path())
        .config(test_config());
    if let Some(tx) = event_tx {
        builder = builder.event_tx(tx);
    }
    (builder.build(), dir)
}

#[tokio::test]
async fn minimal_round_trip_appends_one_assistant_message() {
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "hi".into() }] }]);
    let (mut agent, _dir) = test_agent(model, None);

    let outcome = agent.generate("say hi").await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::Stop);
    assert_eq!(forge_message::type_guards::get_text_content(&outcome.message), "hi");
    assert_eq!(agent.messages().len(), 2);
}

#[tokio::test]
async fn one_tool_round_dispatches_and_appends_tool_message() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("a.txt"), "hello\n").await.unwrap();

    let model = StubModel::new(vec![
        ScriptedTurn { parts: vec![Part::ToolCall { id: "1".into(), name: "read".into(), arguments: serde_json::json!({"path": "a.txt"}) }] },
        ScriptedTurn { parts: vec![Part::TextDelta { text: "contents: hello".into() }] },
    ]);

    let (tx, mut rx) = mpsc::channel(64);
    let mut agent = Agent::builder()
        .model(Arc::new(model))
        .tools(Arc::new(ToolRegistry::standard()))
        .runtime(Arc::new(LocalRuntime::new()))
        .cwd(dir.path())
        .config(test_config())
        .event_tx(tx)
        .build();

    let outcome = agent.generate("read ./a.txt").await.unwrap();

    assert_eq!(forge_message::type_guards::get_text_content(&outcome.message), "contents: hello");
    assert_eq!(agent.messages().len(), 4);
    assert!(agent.messages()[2].is_tool());

    let mut saw_tool_start = false;
    let mut saw_tool_end = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            AgentEvent::ToolExecutionStart { tool_name, .. } if tool_name == "read" => saw_tool_start = true,
            AgentEvent::ToolExecutionEnd { tool_name, is_error, .. } if tool_name == "read" => {
                saw_tool_end = true;
                assert!(!is_error);
            }
            _ => {}
        }
    }
    assert!(saw_tool_start);
    assert!(saw_tool_end);
}

#[tokio::test]
async fn bash_tool_reports_incremental_output_as_tool_execution_update() {
    let dir = tempfile::tempdir().unwrap();
    let model = StubModel::new(vec![
        ScriptedTurn {
            parts: vec![Part::ToolCall { id: "1".into(), name: "bash".into(), arguments: serde_json::json!({"command": "echo hi"}) }],
        },
        ScriptedTurn { parts: vec![Part::TextDelta { text: "done".into() }] },
    ]);

    let (tx, mut rx) = mpsc::channel(64);
    let config = AgentConfig { selected_tools: vec!["bash".into()], ..AgentConfig::default() };
    let mut agent = Agent::builder()
        .model(Arc::new(model))
        .tools(Arc::new(ToolRegistry::standard()))
        .runtime(Arc::new(LocalRuntime::new()))
        .cwd(dir.path())
        .config(config)
        .event_tx(tx)
        .build();

    agent.generate("run echo hi").await.unwrap();

    let mut saw_update = false;
    while let Ok(event) = rx.try_recv() {
        if let AgentEvent::ToolExecutionUpdate { tool_name, partial_result, .. } = event {
            if tool_name == "bash" && partial_result.contains("hi") {
                saw_update = true;
            }
        }
    }
    assert!(saw_update);
}

#[tokio::test]
async fn steering_is_injected_at_the_next_step_boundary() {
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "working".into() }] }]);
    let (mut agent, _dir) = test_agent(model, None);

    agent.steer("stop that");
    let outcome = agent.generate("do the task").await.unwrap();

    assert_eq!(forge_message::type_guards::get_text_content(&outcome.message), "working");
    let positions: Vec<String> = agent.messages().iter().map(forge_message::type_guards::get_text_content).collect();
    assert_eq!(positions, vec!["do the task", "stop that", "working"]);
}

#[tokio::test]
async fn abort_before_the_model_call_surfaces_as_aborted() {
    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "hi".into() }] }]);
    let (mut agent, _dir) = test_agent(model, None);

    agent.abort();
    let outcome = agent.generate("say hi").await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::Aborted);
}

#[tokio::test]
async fn persisted_session_records_every_appended_message() {
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.jsonl");
    let session = PersistedSession::create(&session_path, dir.path().to_string_lossy()).await.unwrap();

    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "hi".into() }] }]);
    let mut agent = Agent::builder()
        .model(Arc::new(model))
        .tools(Arc::new(ToolRegistry::standard()))
        .runtime(Arc::new(LocalRuntime::new()))
        .cwd(dir.path())
        .config(test_config())
        .session(session)
        .build();

    agent.generate("say hi").await.unwrap();

    let (reloaded, recovered, _) = PersistedSession::load(&session_path).await.unwrap();
    assert_eq!(recovered, 2);
    let ctx = reloaded.build_session_context(None).unwrap();
    assert_eq!(ctx.messages.len(), 2);
}

#[tokio::test]
async fn streaming_emits_text_deltas_before_message_end() {
    let model = StubModel::new(vec![ScriptedTurn {
        parts: vec![Part::TextDelta { text: "a".into() }, Part::TextDelta { text: "b".into() }],
    }]);
    let (tx, mut rx) = mpsc::channel(64);
    let (mut agent, _dir) = test_agent(model, Some(tx));

    agent.stream("say ab").await.unwrap();

    let mut saw_update = false;
    let mut saw_end = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            AgentEvent::MessageUpdate { .. } if !saw_end => saw_update = true,
            AgentEvent::MessageEnd { .. } => saw_end = true,
            _ => {}
        }
    }
    assert!(saw_update);
    assert!(saw_end);
}

#[tokio::test]
async fn manual_compact_is_a_noop_without_a_session() {
    let model = StubModel::new(vec![ScriptedTurn::default()]);
    let (mut agent, _dir) = test_agent(model, None);

    let compacted = agent.compact().await.unwrap();

    assert!(!compacted);
}

#[tokio::test]
async fn manual_compact_summarizes_a_long_session() {
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.jsonl");
    let mut session = PersistedSession::create(&session_path, dir.path().to_string_lossy()).await.unwrap();
    for i in 0..30 {
        session.append_message(forge_message::Message::user(format!("m{i}: {}", "x".repeat(4000)))).await.unwrap();
    }

    let model = StubModel::new(vec![ScriptedTurn { parts: vec![Part::TextDelta { text: "## Goal\nsummarized".into() }] }]);
    let mut config = test_config();
    config.compaction = Some(forge_compaction::CompactionConfig {
        context_window: 50_000,
        mode: forge_compaction::CompactionMode::Manual,
        settings: forge_compaction::CompactionSettings { enabled: true, reserve_tokens: 16_384, keep_recent_tokens: 10_000 },
    });

    let mut agent = Agent::builder()
        .model(Arc::new(model))
        .tools(Arc::new(ToolRegistry::standard()))
        .runtime(Arc::new(LocalRuntime::new()))
        .cwd(dir.path())
        .config(config)
        .session(session)
        .build();

    let compacted = tokio::time::timeout(Duration::from_secs(5), agent.compact()).await.unwrap().unwrap();

    assert!(compacted);
    assert!(agent.messages().iter().any(|m| forge_message::type_guards::get_text_content(m).contains("summarized")));
}
