//! USOS 講義カタログモジュール
//!
//! 一覧ページを再帰的に巡回し、グループ詳細ページの表を正規化して絞り込む

mod crawler;
mod extract;
mod fields;
mod links;
mod types;

pub use crawler::{CatalogueCrawler, CrawlSummary};
pub use extract::RecordExtractor;
pub use fields::{labels, normalize};
pub use links::LinkDiscoverer;
pub use types::{CatalogueAddress, GroupRecord, PageKind, RawRecord, Seats, TimeSlot, UNKNOWN};
