use crate::base64url;
use std::fmt;

/// Winning counter for a challenge, ready to be encoded as a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    counter: u32,
    token_text: String,
}

impl Solution {
    pub fn new(counter: u32, token_text: impl Into<String>) -> Self {
        Self {
            counter,
            token_text: token_text.into(),
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Challenge token field this solution answers
    pub fn token_text(&self) -> &str {
        &self.token_text
    }

    /// `1:<token>:<base64url(counter as 4 LE bytes)>`
    pub fn token(&self) -> String {
        format!(
            "1:{}:{}",
            self.token_text,
            base64url::encode(&self.counter.to_le_bytes())
        )
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}
