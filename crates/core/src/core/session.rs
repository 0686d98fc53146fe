//! Session identifiers and the executor endpoint.

use std::fmt;

use crate::prng::Prng;

const SESSION_PREFIX: &str = "session_";
const SESSION_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque routing key for one page/process lifetime.
///
/// Format is `session_` followed by nine base-36 characters. Uniqueness is
/// not guaranteed; the executor is the only party that interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier from a clock-seeded generator.
    pub fn generate() -> Self {
        Self::generate_with(&mut Prng::from_clock())
    }

    pub fn generate_with(rng: &mut Prng) -> Self {
        let mut id = String::with_capacity(SESSION_PREFIX.len() + SESSION_SUFFIX_LEN);
        id.push_str(SESSION_PREFIX);
        for _ in 0..SESSION_SUFFIX_LEN {
            id.push(BASE36[rng.gen_range_usize(0, BASE36.len())] as char);
        }
        Self(id)
    }

    /// Wrap an identifier chosen elsewhere (e.g. handed over by a host).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the executor's WebSocket lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub secure: bool,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
        }
    }

    /// Mirror the hosting page: `https:` pages talk `wss`, everything else `ws`.
    pub fn from_page(protocol: &str, host: &str) -> Self {
        Self::new(host, protocol.trim().eq_ignore_ascii_case("https:"))
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "wss"
        } else {
            "ws"
        }
    }

    pub fn url_for(&self, session: &SessionId) -> String {
        format!("{}://{}/ws/{}", self.scheme(), self.host, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_session_pattern(id: &str) -> bool {
        match id.strip_prefix("session_") {
            Some(rest) => {
                rest.len() == 9
                    && rest
                        .bytes()
                        .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
            }
            None => false,
        }
    }

    #[test]
    fn generated_ids_match_pattern() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert!(matches_session_pattern(a.as_str()), "{a}");
        assert!(matches_session_pattern(b.as_str()), "{b}");
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = SessionId::generate_with(&mut Prng::new(99));
        let b = SessionId::generate_with(&mut Prng::new(99));
        assert_eq!(a, b);
    }

    #[test]
    fn url_mirrors_page_security() {
        let id = SessionId::from_raw("session_abc123xyz");
        assert_eq!(
            Endpoint::from_page("http:", "localhost:8000").url_for(&id),
            "ws://localhost:8000/ws/session_abc123xyz"
        );
        assert_eq!(
            Endpoint::from_page("https:", "nexus.example").url_for(&id),
            "wss://nexus.example/ws/session_abc123xyz"
        );
    }
}
