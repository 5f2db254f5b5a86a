//! Client for the external crawl service
//!
//! The crawl itself runs elsewhere; this crate reaches it through a single
//! parameterized read endpoint, `GET /api/crawl`.

mod fetcher;

pub use fetcher::{
    build_http_client, build_request_url, CrawlService, HttpCrawlService, CRAWL_ENDPOINT,
};
