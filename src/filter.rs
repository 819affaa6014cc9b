use regex::Regex;
use url::Url;

use crate::config::ScrapeConfig;

/// Asset extensions that are never worth a page record
const ASSET_EXCLUDE: &str =
    r"(?i)\.(jpg|jpeg|png|gif|webp|css|js|ico|svg|woff2?|ttf|eot|pdf|zip|tar|gz)$";

/// Decides which discovered links are enqueued for scraping.
///
/// Rules, in order: http/https only; same host (and port) as the target
/// unless external hosts are allowed; exclude patterns (built-in asset pattern
/// plus user-supplied) take precedence; if any include patterns are set,
/// at least one must match.
#[derive(Debug)]
pub struct LinkFilter {
    allow_external: bool,
    required_host: Option<String>,
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

/// Host plus non-default port, the unit of same-host comparison.
///
/// `host_str` covers IP-literal hosts, which have no registrable domain.
fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

impl LinkFilter {
    /// Build a filter scoped to the run's target URL
    pub fn for_target(target: &Url, config: &ScrapeConfig) -> Result<Self, regex::Error> {
        let mut include = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include.push(Regex::new(pattern)?);
        }

        let mut exclude = vec![Regex::new(ASSET_EXCLUDE)?];
        for pattern in &config.exclude_patterns {
            exclude.push(Regex::new(pattern)?);
        }

        Ok(Self {
            allow_external: config.allow_external,
            required_host: host_key(target),
            include,
            exclude,
        })
    }

    /// Whether a resolved link should be queued for scraping
    pub fn accept(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        if !self.allow_external {
            match (&self.required_host, host_key(url)) {
                (Some(required), Some(host)) if *required == host => {}
                _ => return false,
            }
        }

        let url_str = url.as_str();
        if self.exclude.iter().any(|re| re.is_match(url_str)) {
            return false;
        }

        if !self.include.is_empty() && !self.include.iter().any(|re| re.is_match(url_str)) {
            return false;
        }

        true
    }

    /// Canonical form used for dedup and queueing: fragment stripped
    pub fn normalize(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_for(target: &str, config: &ScrapeConfig) -> LinkFilter {
        let url = Url::parse(target).unwrap();
        LinkFilter::for_target(&url, config).unwrap()
    }

    #[test]
    fn test_same_domain_only_by_default() {
        let config = ScrapeConfig::new("https://example.com/docs");
        let filter = filter_for("https://example.com/docs", &config);

        let internal = Url::parse("https://example.com/docs/page").unwrap();
        assert!(filter.accept(&internal));

        let external = Url::parse("https://other.org/page").unwrap();
        assert!(!filter.accept(&external));
    }

    #[test]
    fn test_ip_host_links_followed() {
        let config = ScrapeConfig::new("http://127.0.0.1:8000/");
        let filter = filter_for("http://127.0.0.1:8000/", &config);

        // IP literals have no registrable domain but are still the same host
        let same_host = Url::parse("http://127.0.0.1:8000/page").unwrap();
        assert!(filter.accept(&same_host));

        let other_port = Url::parse("http://127.0.0.1:9000/page").unwrap();
        assert!(!filter.accept(&other_port));

        let other_host = Url::parse("http://192.168.0.1:8000/page").unwrap();
        assert!(!filter.accept(&other_host));
    }

    #[test]
    fn test_allow_external() {
        let mut config = ScrapeConfig::new("https://example.com");
        config.allow_external = true;
        let filter = filter_for("https://example.com", &config);

        let external = Url::parse("https://other.org/page").unwrap();
        assert!(filter.accept(&external));
    }

    #[test]
    fn test_assets_always_excluded() {
        let mut config = ScrapeConfig::new("https://example.com");
        config.allow_external = true;
        let filter = filter_for("https://example.com", &config);

        for asset in [
            "https://example.com/logo.png",
            "https://example.com/style.CSS",
            "https://example.com/paper.pdf",
        ] {
            let url = Url::parse(asset).unwrap();
            assert!(!filter.accept(&url), "{asset} should be excluded");
        }
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        let config = ScrapeConfig::new("https://example.com");
        let filter = filter_for("https://example.com", &config);

        let mailto = Url::parse("mailto:someone@example.com").unwrap();
        assert!(!filter.accept(&mailto));
    }

    #[test]
    fn test_include_exclude_patterns() {
        let mut config = ScrapeConfig::new("https://example.com");
        config.include_patterns = vec![r"/docs/".to_string()];
        config.exclude_patterns = vec![r"/docs/draft/".to_string()];
        let filter = filter_for("https://example.com", &config);

        let included = Url::parse("https://example.com/docs/page.html").unwrap();
        assert!(filter.accept(&included));

        let outside_include = Url::parse("https://example.com/blog/post").unwrap();
        assert!(!filter.accept(&outside_include));

        // exclude wins over include
        let draft = Url::parse("https://example.com/docs/draft/page.html").unwrap();
        assert!(!filter.accept(&draft));
    }

    #[test]
    fn test_normalize_strips_fragment() {
        let config = ScrapeConfig::new("https://example.com");
        let filter = filter_for("https://example.com", &config);

        let with_fragment = Url::parse("https://example.com/page#section-2").unwrap();
        assert_eq!(
            filter.normalize(&with_fragment).as_str(),
            "https://example.com/page"
        );
    }
}
