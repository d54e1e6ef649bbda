//! Settings baked in at build time through environment variables.
//!
//! | variable                 | default       |
//! |--------------------------|---------------|
//! | `BACKEND_URL`            | page origin   |
//! | `COMMENT_MAX_DEPTH`      | 3             |
//! | `COMMENT_DELETE_CASCADE` | `shallow`     |
//! | `COMMENTS_PAGE_SIZE`     | 10            |
//!
//! A value that does not parse is logged and replaced by its default.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::OnceLock;

use comment_thread::{CascadePolicy, ThreadConfig};
use payloads::requests::PageQuery;

#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub backend_url: Option<String>,
    pub max_depth: usize,
    pub cascade: CascadePolicy,
    pub comments_page_size: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            max_depth: ThreadConfig::DEFAULT_MAX_DEPTH,
            cascade: CascadePolicy::default(),
            comments_page_size: PageQuery::DEFAULT_LIMIT,
        }
    }
}

impl UiConfig {
    /// The configuration this build was compiled with.
    pub fn get() -> &'static Self {
        static CONFIG: OnceLock<UiConfig> = OnceLock::new();
        CONFIG.get_or_init(|| {
            Self::from_values(
                option_env!("BACKEND_URL"),
                option_env!("COMMENT_MAX_DEPTH"),
                option_env!("COMMENT_DELETE_CASCADE"),
                option_env!("COMMENTS_PAGE_SIZE"),
            )
        })
    }

    fn from_values(
        backend_url: Option<&str>,
        max_depth: Option<&str>,
        cascade: Option<&str>,
        comments_page_size: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        let comments_page_size = parse_or(
            "COMMENTS_PAGE_SIZE",
            comments_page_size,
            defaults.comments_page_size,
        );

        Self {
            backend_url: backend_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            max_depth: parse_or("COMMENT_MAX_DEPTH", max_depth, defaults.max_depth),
            cascade: parse_or("COMMENT_DELETE_CASCADE", cascade, defaults.cascade),
            comments_page_size: if comments_page_size == 0 {
                tracing::warn!("COMMENTS_PAGE_SIZE must be positive");
                defaults.comments_page_size
            } else {
                comments_page_size
            },
        }
    }

    pub fn thread_config(&self) -> ThreadConfig {
        ThreadConfig {
            max_depth: self.max_depth,
            cascade: self.cascade,
            ..ThreadConfig::default()
        }
    }

    /// Where the comment list of an article starts.
    pub fn comments_query(&self) -> PageQuery {
        PageQuery::default().with_limit(self.comments_page_size)
    }
}

fn parse_or<T>(name: &str, value: Option<&str>, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = value else {
        return default;
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("ignoring {name}={value:?}: {e}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_use_defaults() {
        assert_eq!(UiConfig::from_values(None, None, None, None), UiConfig::default());
    }

    #[test]
    fn set_values_are_parsed() {
        let config = UiConfig::from_values(
            Some("http://localhost:8000/"),
            Some("5"),
            Some("recursive"),
            Some("25"),
        );

        assert_eq!(config.backend_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.cascade, CascadePolicy::Recursive);
        assert_eq!(config.comments_query().limit, 25);
        assert_eq!(config.thread_config().max_depth, 5);
    }

    #[test]
    fn bad_values_fall_back() {
        let config =
            UiConfig::from_values(Some(""), Some("deep"), Some("all"), Some("0"));
        assert_eq!(config, UiConfig::default());
    }
}
