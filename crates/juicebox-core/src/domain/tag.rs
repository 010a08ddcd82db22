use serde::{Deserialize, Serialize};

pub type TagId = i32;

/// Tag entity - a unique label shared across posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Split a raw tag string (`"#a  #b"`) into tag names.
///
/// Tokens are separated by runs of whitespace. Duplicates collapse onto their
/// first occurrence, so the result has set semantics with a stable order.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in raw.split_whitespace() {
        if !names.iter().any(|n| n == token) {
            names.push(token.to_string());
        }
    }
    names
}
