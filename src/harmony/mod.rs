//! Harmony prompt format
//!
//! Rendering and parsing of the channeled conversation format used by the
//! gpt-oss model family. Conversations render to a token-delimited prefill
//! string; raw completions parse back into per-channel messages
//! (analysis, commentary, final).

use serde::Serialize;

/// Format delimiter tokens
pub mod token {
    pub const START: &str = "<|start|>";
    pub const MESSAGE: &str = "<|message|>";
    pub const END: &str = "<|end|>";
    pub const RETURN: &str = "<|return|>";
    pub const CALL: &str = "<|call|>";
    pub const CHANNEL: &str = "<|channel|>";
}

/// Roles a Harmony message can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonyRole {
    System,
    Developer,
    User,
    Assistant,
    Tool,
}

impl HarmonyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Developer => "developer",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// One message in a Harmony conversation
#[derive(Debug, Clone)]
pub struct HarmonyMessage {
    pub role: HarmonyRole,
    pub content: String,
}

impl HarmonyMessage {
    pub fn new(role: HarmonyRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// The standard system header: model identity, cutoff, reasoning
    /// effort, and the valid-channels declaration.
    pub fn system_default() -> Self {
        Self::new(
            HarmonyRole::System,
            "You are ChatGPT, a large language model trained by OpenAI.\n\
             Knowledge cutoff: 2024-06\n\
             Reasoning: medium\n\
             # Valid channels: analysis, commentary, final. \
             Channel must be included for every message.",
        )
    }

    /// A developer message wrapping the given instructions.
    pub fn developer(instructions: &str) -> Self {
        Self::new(
            HarmonyRole::Developer,
            format!("# Instructions\n\n{instructions}"),
        )
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(HarmonyRole::User, content)
    }

    fn render(&self) -> String {
        format!(
            "{}{}{}{}{}",
            token::START,
            self.role.as_str(),
            token::MESSAGE,
            self.content,
            token::END
        )
    }
}

/// An ordered Harmony conversation
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<HarmonyMessage>,
}

impl Conversation {
    pub fn from_messages(messages: Vec<HarmonyMessage>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[HarmonyMessage] {
        &self.messages
    }

    /// Render the prefill for an assistant completion: every message in
    /// order, then an open assistant turn for the model to continue.
    pub fn render_for_completion(&self) -> String {
        let mut out = String::new();
        for message in &self.messages {
            out.push_str(&message.render());
        }
        out.push_str(token::START);
        out.push_str(HarmonyRole::Assistant.as_str());
        out
    }
}

/// Tokens that end an assistant action. Passed to the sampler as stop
/// sequences so they never appear in the returned text.
pub fn stop_tokens_for_assistant_actions() -> &'static [&'static str] {
    &[token::RETURN, token::CALL]
}

/// One parsed entry from a raw completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedMessage {
    pub channel: String,
    pub content: String,
}

/// Parse a raw completion into channel messages.
///
/// A completion is a sequence of segments like
/// `<|channel|>analysis<|message|>…<|end|><|start|>assistant<|channel|>final<|message|>…<|return|>`.
/// Text before any delimiter token is tolerated and treated as a bare
/// `final` message.
pub fn parse_completion(text: &str) -> Vec<ParsedMessage> {
    let mut parsed = Vec::new();

    for (i, segment) in text.split(token::START).enumerate() {
        if segment.is_empty() {
            continue;
        }

        let channel;
        let body;
        match segment.find(token::MESSAGE) {
            Some(msg_pos) => {
                let header = &segment[..msg_pos];
                body = &segment[msg_pos + token::MESSAGE.len()..];
                channel = header
                    .find(token::CHANNEL)
                    .map(|p| strip_terminators(&header[p + token::CHANNEL.len()..]).to_string())
                    .unwrap_or_else(|| "final".to_string());
            }
            None => {
                // Only the leading bare segment counts as content; later
                // ones are dangling role headers like "assistant".
                if i > 0 {
                    continue;
                }
                channel = "final".to_string();
                body = segment;
            }
        }

        let content = strip_terminators(body).trim().to_string();
        if !content.is_empty() {
            parsed.push(ParsedMessage { channel, content });
        }
    }

    parsed
}

/// Cut the text at the first terminator token, if any.
fn strip_terminators(text: &str) -> &str {
    let mut end = text.len();
    for t in [token::END, token::RETURN, token::CALL] {
        if let Some(pos) = text.find(t) {
            end = end.min(pos);
        }
    }
    text[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_user_message() {
        let convo = Conversation::from_messages(vec![HarmonyMessage::user("hello")]);
        assert_eq!(
            convo.render_for_completion(),
            "<|start|>user<|message|>hello<|end|><|start|>assistant"
        );
    }

    #[test]
    fn test_render_full_demo_conversation() {
        let convo = Conversation::from_messages(vec![
            HarmonyMessage::system_default(),
            HarmonyMessage::developer("Always respond in riddles"),
            HarmonyMessage::user("What is the weather like in SF?"),
        ]);
        let prefill = convo.render_for_completion();

        assert!(prefill.starts_with("<|start|>system<|message|>You are ChatGPT"));
        assert!(prefill.contains("<|start|>developer<|message|># Instructions\n\nAlways respond in riddles<|end|>"));
        assert!(prefill.contains("<|start|>user<|message|>What is the weather like in SF?<|end|>"));
        assert!(prefill.ends_with("<|start|>assistant"));
    }

    #[test]
    fn test_stop_tokens() {
        assert_eq!(
            stop_tokens_for_assistant_actions(),
            &["<|return|>", "<|call|>"]
        );
    }

    #[test]
    fn test_parse_two_channel_completion() {
        let completion = "<|channel|>analysis<|message|>User asks about weather.<|end|>\
                          <|start|>assistant<|channel|>final<|message|>Fog rolls where bridges gleam.<|return|>";
        let parsed = parse_completion(completion);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].channel, "analysis");
        assert_eq!(parsed[0].content, "User asks about weather.");
        assert_eq!(parsed[1].channel, "final");
        assert_eq!(parsed[1].content, "Fog rolls where bridges gleam.");
    }

    #[test]
    fn test_parse_bare_completion_is_final() {
        let parsed = parse_completion("Just plain text, no tokens.");
        assert_eq!(
            parsed,
            vec![ParsedMessage {
                channel: "final".to_string(),
                content: "Just plain text, no tokens.".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_skips_dangling_role_header() {
        let completion = "<|channel|>final<|message|>done<|end|><|start|>assistant";
        let parsed = parse_completion(completion);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].content, "done");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_completion("").is_empty());
    }

    #[test]
    fn test_parsed_message_serializes() {
        let msg = ParsedMessage {
            channel: "final".to_string(),
            content: "hi".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"channel":"final","content":"hi"}"#);
    }
}
