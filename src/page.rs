use serde::{Deserialize, Serialize};

/// Pagination details carried between paged calls.
///
/// The client never reads or advances these values; they are handed back and
/// forth by the code that talks to paged endpoints.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PageDetails {
    /// Maximum number of results per page (the server may ignore it or return fewer).
    pub size: usize,
    /// Token for the next page, empty for the first and the last page.
    pub token: String,
}

impl PageDetails {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            token: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_without_token() {
        let page = PageDetails::new(50);
        assert_eq!(page.size, 50);
        assert!(page.token.is_empty());
    }

    #[test]
    fn test_deserialize() {
        let page: PageDetails = serde_json::from_str(r#"{"size": 10, "token": "next"}"#).unwrap();
        assert_eq!(
            page,
            PageDetails {
                size: 10,
                token: "next".to_string()
            }
        );
    }
}
