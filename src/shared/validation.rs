use lazy_static::lazy_static;
use regex::Regex;

/// Longest user id accepted from the lookup form or a path
pub const MAX_USER_ID_LEN: u64 = 256;

lazy_static! {
    /// Regex for validating user ids typed into the lookup form
    /// Ids are opaque: anything without control characters
    /// - Valid: "user_2abcDEF", "user.1@x", "a/b"
    /// - Invalid: "", "user\n1", "user\u{7}"
    pub static ref USER_ID_REGEX: Regex = Regex::new(r"^[^\p{Cc}]+$").unwrap();
}
