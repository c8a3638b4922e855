//! USOS 講義カタログ絞り込みライブラリ
//!
//! - カタログ一覧ページを再帰的に巡回してグループ詳細ページを探す
//! - 詳細ページの表を型付きの `GroupRecord` に正規化
//! - 登録した条件をすべて満たすグループを出力
//!
//! # 使用例
//!
//! ```rust,ignore
//! use usos_filter::{CatalogueCrawler, FilterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FilterConfig::new("https://rejestracja.usos.uw.edu.pl/catalogue.php?rg=0000-2021-OG-UN")
//!         .with_expired(false)
//!         .with_verbose(true);
//!
//!     let mut crawler = CatalogueCrawler::new(config).unwrap();
//!     crawler.add_condition(|group| group.ects >= 4.0);
//!
//!     let summary = crawler.show().await.unwrap();
//!     println!("Matched: {}", summary.matched);
//! }
//! ```
//!
//! # tower::Service として使用
//!
//! ```rust,ignore
//! use usos_filter::{FilterRequest, FilterService};
//! use tower::Service;
//!
//! let mut service = FilterService::new();
//! let summary = service.call(FilterRequest::new(url).with_expired(true)).await?;
//! ```

pub mod catalogue;
pub mod condition;
pub mod config;
pub mod error;
pub mod fetch;
pub mod report;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use catalogue::{CatalogueCrawler, CrawlSummary, GroupRecord, RawRecord, Seats, TimeSlot};
pub use condition::{ConditionChain, SeatAvailability};
pub use config::FilterConfig;
pub use error::FilterError;
pub use fetch::HttpFetcher;
pub use report::Reporter;
pub use service::{FilterRequest, FilterService};
pub use traits::{Fetcher, Predicate};
