//! Challenge parsing
//!
//! A challenge arrives as `<version>:<easiness>:<ignored>:<tokenBase64Url>`.
//! Fields past the fourth are tolerated and ignored.

use crate::base64url;
use crate::error::FormatError;
use crate::target::Threshold;
use std::str::FromStr;

/// Only supported challenge version
pub const CHALLENGE_VERSION: u32 = 1;

/// Decoded token material must be exactly this long
pub const TOKEN_LEN: usize = 48;

/// Parsed hashcash challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    version: u32,
    easiness: u8,
    token_text: String,
    token: Vec<u8>,
}

impl Challenge {
    pub fn parse(challenge: &str) -> Result<Self, FormatError> {
        let parts: Vec<&str> = challenge.split(':').collect();
        if parts.len() < 4 {
            return Err(FormatError::TooFewFields(parts.len()));
        }

        let version = parts[0]
            .parse::<u32>()
            .ok()
            .filter(|v| *v == CHALLENGE_VERSION)
            .ok_or_else(|| FormatError::UnsupportedVersion(parts[0].to_string()))?;

        let easiness = parts[1]
            .parse::<u8>()
            .map_err(|_| FormatError::EasinessOutOfRange(parts[1].to_string()))?;

        // parts[2] is carried by the issuer but never used

        let token_text = parts[3];
        if token_text.is_empty() {
            return Err(FormatError::EmptyToken);
        }

        let token = base64url::decode(token_text)?;
        if token.is_empty() {
            return Err(FormatError::EmptyToken);
        }
        if token.len() != TOKEN_LEN {
            return Err(FormatError::TokenLength(token.len()));
        }

        Ok(Self {
            version,
            easiness,
            token_text: token_text.to_string(),
            token,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn easiness(&self) -> u8 {
        self.easiness
    }

    /// Token field exactly as received, echoed back in the solved token
    pub fn token_text(&self) -> &str {
        &self.token_text
    }

    /// Decoded token material (48 bytes)
    pub fn token(&self) -> &[u8] {
        &self.token
    }

    pub fn threshold(&self) -> Threshold {
        Threshold::from_easiness(self.easiness)
    }
}

impl FromStr for Challenge {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
