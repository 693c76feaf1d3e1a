//! Demo response provider
//!
//! Simulates a remote model: waits a random delay, then answers from a
//! small set of canned replies chosen by keywords in the latest message.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::{ProviderReply, ResponseProvider};
use crate::chat::Message;
use crate::config::DemoConfig;
use crate::error::Result;

/// Replies used when no keyword matches
pub const DEMO_RESPONSES: [&str; 4] = [
    "I understand your question. Let me provide a helpful response.",
    "That's an interesting topic! Here's what I know about it...",
    "Great question! I'll do my best to help you with that.",
    "Let me think about this carefully and provide you with a comprehensive answer.",
];

const CODE_REPLY: &str = r#"Here's an example code snippet:

```typescript
function greet(name: string): string {
  return `Hello, ${name}!`;
}

// Usage
const message = greet('World');
console.log(message); // Output: Hello, World!
```

This demonstrates a simple TypeScript function with type annotations."#;

const HELP_REPLY: &str = "I'm here to help! Here are some things I can assist with:

- **Answering questions** about various topics
- **Explaining concepts** in simple terms
- **Providing code examples** and solutions
- **Brainstorming ideas** for your projects

Just ask me anything, and I'll do my best to provide a helpful response!";

const GREETING_REPLY: &str = "Hello! 👋 I'm your AI assistant. How can I help you today?

Feel free to ask me anything, whether it's about coding, general knowledge, or creative ideas. I'm here to assist!";

const LIST_REPLY: &str = "Here's an organized list for you:

1. **First item** - Important details here
2. **Second item** - More information
3. **Third item** - Additional context
4. **Fourth item** - Final thoughts

Would you like me to expand on any of these points?";

/// Error text for a call without any message
pub const EMPTY_HISTORY_ERROR: &str = "Failed to get response. Please try again.";

/// Canned-reply provider
#[derive(Debug, Clone)]
pub struct DemoProvider {
    config: DemoConfig,
}

impl DemoProvider {
    /// Creates a demo provider
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdesk::config::DemoConfig;
    /// use chatdesk::providers::{DemoProvider, ResponseProvider};
    ///
    /// let provider = DemoProvider::new(DemoConfig::default());
    /// assert_eq!(provider.name(), "demo");
    /// ```
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    fn delay(&self) -> Duration {
        let low = self.config.min_delay_ms.min(self.config.max_delay_ms);
        let high = self.config.min_delay_ms.max(self.config.max_delay_ms);
        Duration::from_millis(rand::rng().random_range(low..=high))
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

/// Picks the keyword reply for `content`, if any
///
/// Keywords are checked in order: `code`, `help`, a greeting (`hello` or
/// the word `hi`), then `list`.
pub fn keyword_reply(content: &str) -> Option<&'static str> {
    let lowered = content.to_lowercase();
    if lowered.contains("code") {
        Some(CODE_REPLY)
    } else if lowered.contains("help") {
        Some(HELP_REPLY)
    } else if lowered.contains("hello") || has_word(&lowered, "hi") {
        Some(GREETING_REPLY)
    } else if lowered.contains("list") {
        Some(LIST_REPLY)
    } else {
        None
    }
}

#[async_trait]
impl ResponseProvider for DemoProvider {
    async fn reply(&self, history: &[Message]) -> Result<ProviderReply> {
        let Some(last) = history.last() else {
            return Ok(ProviderReply::failed(EMPTY_HISTORY_ERROR));
        };

        let delay = self.delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Demo provider thinking");
        tokio::time::sleep(delay).await;

        let content = match keyword_reply(last.content()) {
            Some(reply) => reply,
            None => {
                let index = rand::rng().random_range(0..DEMO_RESPONSES.len());
                DEMO_RESPONSES[index]
            }
        };

        Ok(ProviderReply::ok(content))
    }

    fn name(&self) -> &str {
        "demo"
    }
}
