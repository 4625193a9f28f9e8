// [libs/domain/models/src/person.rs]
use serde::{Deserialize, Serialize};
use url::Url;

/// The brigadier's associated person record. Held as plain UTF-8 text at
/// rest; base64 encoding only happens at the pair-agent CLI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub desc: String,
    pub url: Url,
}

impl Person {
    pub fn new(name: impl Into<String>, desc: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_with_valid_url() {
        let p = Person::new("Alice", "Physicist", Url::parse("https://example.org/alice").unwrap());
        assert_eq!(p.name, "Alice");
    }
}
