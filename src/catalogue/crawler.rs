//! カタログ巡回
//!
//! 一覧ページ → 下位の一覧ページ・グループ詳細ページ、と再帰的にたどる。
//! 取得・抽出・変換・条件評価の失敗はその枝の中で処理し、呼び出し元へは返さない。

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::condition::ConditionChain;
use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::fetch::HttpFetcher;
use crate::report::Reporter;
use crate::traits::{Fetcher, Predicate};

use super::extract::RecordExtractor;
use super::fields::normalize;
use super::links::LinkDiscoverer;
use super::types::{CatalogueAddress, GroupRecord, PageKind};

/// 巡回結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// 取得を試みたページ数
    pub pages_visited: usize,
    pub fetch_failures: usize,
    /// 詳細表を読み取れたグループ数
    pub groups_extracted: usize,
    /// 全条件を満たしたグループ数
    pub matched: usize,
}

#[derive(Default)]
struct CrawlStats {
    pages_visited: AtomicUsize,
    fetch_failures: AtomicUsize,
    groups_extracted: AtomicUsize,
}

impl CrawlStats {
    fn reset(&self) {
        self.pages_visited.store(0, Ordering::SeqCst);
        self.fetch_failures.store(0, Ordering::SeqCst);
        self.groups_extracted.store(0, Ordering::SeqCst);
    }
}

/// カタログクローラ
///
/// ```rust,ignore
/// let mut crawler = CatalogueCrawler::new(FilterConfig::new(url))?;
/// crawler.add_condition(|g| g.ects >= 4.0);
/// let summary = crawler.show().await?;
/// ```
pub struct CatalogueCrawler<F = HttpFetcher> {
    config: FilterConfig,
    fetcher: F,
    discoverer: LinkDiscoverer,
    extractor: RecordExtractor,
    conditions: ConditionChain,
    reporter: Reporter,
    permits: Semaphore,
    visited: Mutex<HashSet<String>>,
    stats: CrawlStats,
}

impl CatalogueCrawler<HttpFetcher> {
    /// HTTP取得・標準出力で作成
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        let fetcher = HttpFetcher::new(&config)?;
        Self::with_fetcher(config, fetcher, Reporter::stdout())
    }
}

impl<F: Fetcher> CatalogueCrawler<F> {
    pub fn with_fetcher(
        config: FilterConfig,
        fetcher: F,
        reporter: Reporter,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            discoverer: LinkDiscoverer::new(&config.origin)?,
            extractor: RecordExtractor::new()?,
            conditions: ConditionChain::with_seat_filter(config.expired),
            permits: Semaphore::new(config.max_concurrency.max(1)),
            visited: Mutex::new(HashSet::new()),
            stats: CrawlStats::default(),
            config,
            fetcher,
            reporter,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// 条件を追加（空席フィルタの後に評価される）
    pub fn add_condition<C>(&mut self, condition: C)
    where
        C: Fn(&GroupRecord) -> bool + Send + Sync + 'static,
    {
        self.conditions.add_condition(condition);
    }

    pub fn add_fallible_condition<C>(&mut self, condition: C)
    where
        C: Fn(&GroupRecord) -> Result<bool, FilterError> + Send + Sync + 'static,
    {
        self.conditions.add_fallible_condition(condition);
    }

    pub fn add_predicate<P: Predicate + 'static>(&mut self, predicate: P) {
        self.conditions.push(predicate);
    }

    pub fn extend_conditions(&mut self, conditions: &ConditionChain) {
        self.conditions.extend(conditions);
    }

    /// ルートから巡回し、該当グループと合計件数を出力する
    pub async fn show(&self) -> Result<CrawlSummary, FilterError> {
        self.reporter.reset();
        self.stats.reset();
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        info!(
            "Starting catalogue crawl: url={}, expired={}, conditions={}",
            self.config.url,
            self.config.expired,
            self.conditions.len()
        );

        self.visit(CatalogueAddress::listing(self.config.url.clone()))
            .await;
        self.reporter.summary()?;

        let summary = self.summary();
        info!(
            "Catalogue crawl completed: pages={}, failures={}, groups={}, matched={}",
            summary.pages_visited,
            summary.fetch_failures,
            summary.groups_extracted,
            summary.matched
        );
        Ok(summary)
    }

    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            pages_visited: self.stats.pages_visited.load(Ordering::SeqCst),
            fetch_failures: self.stats.fetch_failures.load(Ordering::SeqCst),
            groups_extracted: self.stats.groups_extracted.load(Ordering::SeqCst),
            matched: self.reporter.total(),
        }
    }

    fn visit(&self, address: CatalogueAddress) -> BoxFuture<'_, ()> {
        async move {
            if !self.mark_visited(&address.url) {
                debug!("Already visited: {}", address.url);
                return;
            }

            let Some(html) = self.fetch(&address.url).await else {
                return;
            };

            match address.kind {
                PageKind::Listing => {
                    let children = self.discoverer.discover(&address.url, &html);
                    join_all(children.into_iter().map(|child| self.visit(child))).await;
                }
                PageKind::Group => self.process_group(&address.url, &html),
            }
        }
        .boxed()
    }

    fn mark_visited(&self, url: &str) -> bool {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string())
    }

    /// 取得失敗は警告のみ（リトライしない）
    async fn fetch(&self, url: &str) -> Option<String> {
        if self.config.verbose {
            if let Err(e) = self.reporter.searching(url) {
                warn!(error = %e, "Failed to write progress line");
            }
        }

        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                warn!(url, error = %e, "Fetch permit unavailable");
                return None;
            }
        };

        self.stats.pages_visited.fetch_add(1, Ordering::SeqCst);
        match self.fetcher.fetch(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                self.stats.fetch_failures.fetch_add(1, Ordering::SeqCst);
                warn!(url, error = %e, "Fetch failed, abandoning branch");
                None
            }
        }
    }

    fn process_group(&self, url: &str, html: &str) {
        let raw = match self.extractor.extract(url, html) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(url, error = %e, "Group page skipped");
                return;
            }
        };
        self.stats.groups_extracted.fetch_add(1, Ordering::SeqCst);

        let record = normalize(raw);
        if !self.conditions.matches(&record) {
            debug!("Group filtered out: {}", url);
            return;
        }

        if let Err(e) = self.reporter.report(&record) {
            warn!(url, error = %e, "Failed to report group");
        }
    }
}
