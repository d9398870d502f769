//! Latest-post discovery for configured blogs.

use std::sync::LazyLock;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{BotError, Result};
use crate::types::BlogPost;

pub const NO_POSTS: &str = "No blog posts found.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Heading anchor, post-title anchor, entry-title anchor; first hit in document order wins.
static POST_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h2 a, .post-title a, .entry-title a").expect("post selector is valid")
});

/// Resolve a post `href` found on `source`.
///
/// Absolute URLs are kept, root-relative paths are joined to the source
/// origin, anything else is appended to the source URL verbatim.
#[must_use]
pub fn normalize_link(source: &str, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    if href.starts_with('/')
        && let Ok(base) = Url::parse(source)
    {
        return format!("{}{href}", base.origin().ascii_serialization());
    }

    format!("{source}{href}")
}

/// Find the first post link in an HTML document, as `(title, href)`.
#[must_use]
pub fn extract_first_post(html: &str) -> Option<(String, String)> {
    let document = Html::parse_document(html);
    let anchor = document.select(&POST_LINK).next()?;
    let href = anchor.value().attr("href")?;
    let title = anchor.text().collect::<String>().trim().to_string();
    Some((title, href.to_string()))
}

fn source_host(source: &str) -> String {
    Url::parse(source)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| source.to_string())
}

/// Scrapes the newest post from each configured blog.
pub struct BlogNotifier {
    client: Client,
}

impl BlogNotifier {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch every blog concurrently; results keep the order of `links`.
    pub async fn latest_posts(&self, links: &[String]) -> Vec<BlogPost> {
        let posts: Vec<BlogPost> = join_all(links.iter().map(|link| self.latest_post(link)))
            .await
            .into_iter()
            .flatten()
            .collect();
        info!("Found {} posts across {} blogs", posts.len(), links.len());
        posts
    }

    async fn latest_post(&self, link: &str) -> Option<BlogPost> {
        let html = match self.fetch_page(link).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to fetch blog {link}: {e}");
                return None;
            }
        };

        let Some((title, href)) = extract_first_post(&html) else {
            debug!("No post link found on {link}");
            return None;
        };

        Some(BlogPost {
            title,
            link: normalize_link(link, &href),
            source_host: source_host(link),
        })
    }

    async fn fetch_page(&self, link: &str) -> Result<String> {
        debug!("Fetching blog page {link}");
        let response = self.client.get(link).send().await?.error_for_status()?;
        response.text().await.map_err(BotError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html; charset=utf-8")
            .set_body_string(format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn root_relative_link_uses_source_origin() {
        assert_eq!(
            normalize_link("https://example.com/blog", "/posts/hello"),
            "https://example.com/posts/hello"
        );
    }

    #[test]
    fn absolute_link_is_unchanged() {
        assert_eq!(
            normalize_link("https://example.com/blog", "https://cdn.example.org/p/1"),
            "https://cdn.example.org/p/1"
        );
    }

    #[test]
    fn bare_relative_link_is_appended() {
        assert_eq!(
            normalize_link("https://example.com/blog/", "hello-world"),
            "https://example.com/blog/hello-world"
        );
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let html = r#"
            <div class="entry-title"><a href="/entry">Entry</a></div>
            <h2><a href="/heading">Heading</a></h2>
        "#;
        assert_eq!(
            extract_first_post(html),
            Some(("Entry".to_string(), "/entry".to_string()))
        );
    }

    #[test]
    fn title_is_trimmed() {
        let html = r#"<h3 class="post-title"><a href="/p">
            Release notes
        </a></h3>"#;
        assert_eq!(
            extract_first_post(html),
            Some(("Release notes".to_string(), "/p".to_string()))
        );
    }

    #[test]
    fn page_without_candidates_yields_nothing() {
        assert_eq!(extract_first_post("<h1><a href='/x'>Title</a></h1>"), None);
        assert_eq!(extract_first_post("<h2><a>No link</a></h2>"), None);
    }

    #[tokio::test]
    async fn collects_posts_in_input_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                page(r#"<h2><a href="/slow/post">Slow post</a></h2>"#)
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .and(header_exists("user-agent"))
            .respond_with(page(
                r#"<article><h2 class="entry-title"><a href="https://elsewhere.dev/p">Fast post</a></h2></article>"#,
            ))
            .mount(&server)
            .await;

        let slow = format!("{}/slow", server.uri());
        let fast = format!("{}/fast", server.uri());
        let notifier = BlogNotifier::new().unwrap();
        let posts = notifier.latest_posts(&[slow, fast]).await;

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Slow post");
        assert_eq!(posts[0].link, format!("{}/slow/post", server.uri()));
        assert_eq!(posts[0].source_host, "127.0.0.1");
        assert_eq!(posts[1].title, "Fast post");
        assert_eq!(posts[1].link, "https://elsewhere.dev/p");
    }

    #[tokio::test]
    async fn unmatched_and_failing_pages_are_skipped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/plain"))
            .respond_with(page("<p>Nothing to see</p>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/good"))
            .respond_with(page(r#"<h2><a href="/good/1">Good</a></h2>"#))
            .mount(&server)
            .await;

        let links: Vec<String> = ["/plain", "/broken", "/good"]
            .iter()
            .map(|p| format!("{}{p}", server.uri()))
            .collect();
        let posts = BlogNotifier::new().unwrap().latest_posts(&links).await;

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Good");
    }
}
