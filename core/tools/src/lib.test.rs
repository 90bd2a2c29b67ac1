use super::*;

#[test]
fn tool_output_text_content_concatenates_text_parts_only() {
    let output = ToolOutput {
        content: vec![
            ToolContentPart::Text { text: "a".into() },
            ToolContentPart::Image { base64: "xx".into(), mime_type: "image/png".into() },
            ToolContentPart::Text { text: "b".into() },
        ],
        details: None,
    };
    assert_eq!(output.text_content(), "ab");
}
