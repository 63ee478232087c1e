use alloc::string::String;
use alloc::vec::Vec;

use crate::{CoreError, CoreResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocaleCode {
    original: String,
    simplified: String,
    primary: String,
}

impl LocaleCode {
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidLocale("locale code is empty"));
        }

        let simplified = simplified_locale(trimmed);
        let primary = simplified
            .split(['_', '-'])
            .next()
            .unwrap_or_default();
        if primary.is_empty() || !primary.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidLocale("invalid language subtag"));
        }
        let primary = String::from(primary);

        Ok(Self {
            original: String::from(trimmed),
            simplified,
            primary,
        })
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn simplified(&self) -> &str {
        &self.simplified
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn lookup_candidates(&self) -> Vec<&str> {
        let mut candidates = Vec::with_capacity(2);
        candidates.push(self.simplified.as_str());
        if self.primary != self.simplified {
            candidates.push(self.primary.as_str());
        }
        candidates
    }
}

// de_DE.UTF-8@euro becomes de_DE.
pub fn simplified_locale(input: &str) -> String {
    let trimmed = input.trim();
    let end = trimmed.find(['.', '@', ':']).unwrap_or(trimmed.len());
    String::from(&trimmed[..end])
}
