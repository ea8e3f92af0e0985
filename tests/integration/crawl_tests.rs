//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! mirror cycle end-to-end, against a temporary mirror root.

use std::path::{Path, PathBuf};
use std::time::Duration;
use sumi_mirror::config::{Config, CrawlerConfig, OutputConfig, Strategy};
use sumi_mirror::crawler::crawl;
use sumi_mirror::{local_path, normalize_seed};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STRATEGIES: [Strategy; 2] = [Strategy::Queue, Strategy::Eager];

/// Creates a test configuration mirroring into `root`
fn create_test_config(root: &Path, max_depth: u32, strategy: Strategy) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            workers: 3,
            timeout_ms: 2_000,
            respect_robots: false,
            retry_backoff_ms: 10,
            strategy,
        },
        output: OutputConfig {
            mirror_root: root.to_path_buf(),
        },
    }
}

async fn mount_page(server: &MockServer, p: &str, body: String, hits: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).set_body_string(body));
    match hits {
        Some(n) => mock.expect(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

fn seed_of(server: &MockServer) -> Url {
    normalize_seed(&format!("{}/", server.uri())).expect("Failed to parse seed")
}

fn mirrored(root: &Path, seed: &Url, p: &str) -> PathBuf {
    local_path(root, &seed.join(p).expect("Failed to join path"))
}

/// Mounts the seed page from the classic scenario: one same-host page, one
/// image and one external link
async fn mount_seed_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <a href="/about">About</a>
        <img src="logo.png">
        <a href="https://other.com/x">Elsewhere</a>
        </body></html>"#
            .to_string(),
        None,
    )
    .await;
    mount_page(
        server,
        "/about",
        r#"<html><body><a href="/team">Team</a></body></html>"#.to_string(),
        None,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_seed_scenario_depth_one() {
    for strategy in STRATEGIES {
        let server = MockServer::start().await;
        mount_seed_site(&server).await;
        // Links on depth-1 pages are out of reach
        mount_page(&server, "/team", String::new(), Some(0)).await;

        let root = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(root.path(), 1, strategy);
        let seed = seed_of(&server);

        let summary = crawl(&config, seed.clone()).await.expect("Crawl failed");

        assert_eq!(summary.saved, 3, "{:?}", strategy);
        assert!(mirrored(root.path(), &seed, "/about").ends_with("about/index.html"));
        assert!(mirrored(root.path(), &seed, "/about").is_file());
        assert_eq!(
            std::fs::read(mirrored(root.path(), &seed, "/logo.png")).unwrap(),
            vec![0x89, b'P', b'N', b'G']
        );
        assert!(!mirrored(root.path(), &seed, "/team").exists());

        let index = std::fs::read_to_string(mirrored(root.path(), &seed, "/")).unwrap();
        let document = scraper::Html::parse_document(&index);
        let hrefs: Vec<_> = document
            .select(&scraper::Selector::parse("a").unwrap())
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(hrefs, vec!["about/index.html", "https://other.com/x"]);
        let img = document
            .select(&scraper::Selector::parse("img").unwrap())
            .next()
            .and_then(|img| img.value().attr("src"));
        assert_eq!(img, Some("logo.png"));
    }
}

#[tokio::test]
async fn test_depth_zero_saves_only_seed() {
    for strategy in STRATEGIES {
        let server = MockServer::start().await;
        mount_page(&server, "/", r#"<a href="/about">About</a>"#.to_string(), Some(1)).await;
        mount_page(&server, "/about", String::new(), Some(0)).await;

        let root = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(root.path(), 0, strategy);
        let seed = seed_of(&server);

        let summary = crawl(&config, seed.clone()).await.expect("Crawl failed");

        assert_eq!(summary.admitted, 1, "{:?}", strategy);
        assert_eq!(summary.saved, 1, "{:?}", strategy);
        assert!(mirrored(root.path(), &seed, "/").is_file());
        assert!(!mirrored(root.path(), &seed, "/about").exists());
    }
}

#[tokio::test]
async fn test_deeper_site_stays_within_depth() {
    for strategy in STRATEGIES {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/",
            r#"<a href="/docs/">Docs</a><a href="/blog/">Blog</a>"#.to_string(),
            None,
        )
        .await;
        mount_page(
            &server,
            "/docs/",
            r#"<a href="intro.html">Intro</a><a href="/">Home</a>"#.to_string(),
            None,
        )
        .await;
        mount_page(
            &server,
            "/blog/",
            r#"<a href="/docs/intro.html">Intro</a>"#.to_string(),
            None,
        )
        .await;
        mount_page(
            &server,
            "/docs/intro.html",
            r#"<a href="/docs/advanced.html">More</a>"#.to_string(),
            None,
        )
        .await;
        mount_page(&server, "/docs/advanced.html", String::new(), Some(0)).await;

        let root = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(root.path(), 2, strategy);
        let seed = seed_of(&server);

        let summary = crawl(&config, seed.clone()).await.expect("Crawl failed");

        assert_eq!(summary.saved, 4, "{:?}", strategy);
        // Shared link fetched once, saved once
        assert!(mirrored(root.path(), &seed, "/docs/intro.html").is_file());

        let docs = std::fs::read_to_string(mirrored(root.path(), &seed, "/docs/")).unwrap();
        assert!(docs.contains(r#"href="intro.html""#));
        assert!(docs.contains(r#"href="../index.html""#));
    }
}

#[tokio::test]
async fn test_robots_disallow_respected() {
    for strategy in STRATEGIES {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/"),
            )
            .mount(&server)
            .await;
        mount_page(
            &server,
            "/",
            r#"<a href="/private/x.html">Secret</a><a href="/public.html">Open</a>"#.to_string(),
            None,
        )
        .await;
        mount_page(&server, "/public.html", "<p>open</p>".to_string(), Some(1)).await;
        mount_page(&server, "/private/x.html", String::new(), Some(0)).await;

        let root = TempDir::new().expect("Failed to create temp dir");
        let mut config = create_test_config(root.path(), 1, strategy);
        config.crawler.respect_robots = true;
        let seed = seed_of(&server);

        let summary = crawl(&config, seed.clone()).await.expect("Crawl failed");

        assert_eq!(summary.robots_skipped, 1, "{:?}", strategy);
        assert!(mirrored(root.path(), &seed, "/public.html").is_file());
        assert!(!mirrored(root.path(), &seed, "/private/x.html").exists());
    }
}

#[tokio::test]
async fn test_missing_robots_crawls_everything() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/private/x.html">x</a>"#.to_string(), None).await;
    mount_page(&server, "/private/x.html", String::new(), Some(1)).await;

    let root = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(root.path(), 1, Strategy::Queue);
    config.crawler.respect_robots = true;
    let seed = seed_of(&server);

    let summary = crawl(&config, seed.clone()).await.expect("Crawl failed");

    assert_eq!(summary.saved, 2);
    assert!(mirrored(root.path(), &seed, "/private/x.html").is_file());
}

#[tokio::test]
async fn test_broken_links_do_not_stop_crawl() {
    for strategy in STRATEGIES {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/",
            r#"<a href="/gone">Gone</a><a href="/here">Here</a>"#.to_string(),
            None,
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        mount_page(&server, "/here", "<p>here</p>".to_string(), None).await;

        let root = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(root.path(), 1, strategy);
        let seed = seed_of(&server);

        let summary = crawl(&config, seed.clone()).await.expect("Crawl failed");

        assert_eq!(summary.saved, 2, "{:?}", strategy);
        assert!(summary.fetch_failed >= 1);
        assert!(!mirrored(root.path(), &seed, "/gone").exists());
    }
}

#[tokio::test]
async fn test_seed_failure_finishes_with_empty_mirror() {
    for strategy in STRATEGIES {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let root = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(root.path(), 2, strategy);

        let summary = crawl(&config, seed_of(&server)).await.expect("Crawl failed");

        assert_eq!(summary.saved, 0, "{:?}", strategy);
        assert_eq!(
            std::fs::read_dir(root.path()).unwrap().count(),
            0,
            "nothing should be written"
        );
    }
}

#[tokio::test]
async fn test_slow_seed_retried_after_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", "<p>eventually</p>".to_string(), None).await;

    let root = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(root.path(), 0, Strategy::Queue);
    config.crawler.timeout_ms = 200;
    let seed = seed_of(&server);

    let summary = crawl(&config, seed.clone()).await.expect("Crawl failed");

    assert_eq!(summary.saved, 1);
    assert_eq!(
        std::fs::read_to_string(mirrored(root.path(), &seed, "/")).unwrap(),
        "<p>eventually</p>"
    );
}
