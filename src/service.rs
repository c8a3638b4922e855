use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::catalogue::{CatalogueCrawler, CrawlSummary};
use crate::condition::ConditionChain;
use crate::config::FilterConfig;
use crate::error::FilterError;

/// 絞り込みリクエスト
#[derive(Debug, Clone)]
pub struct FilterRequest {
    pub url: String,
    pub expired: bool,
    pub verbose: bool,
}

impl FilterRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expired: false,
            verbose: false,
        }
    }

    pub fn with_expired(mut self, expired: bool) -> Self {
        self.expired = expired;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl From<FilterRequest> for FilterConfig {
    fn from(req: FilterRequest) -> Self {
        FilterConfig::new(req.url)
            .with_expired(req.expired)
            .with_verbose(req.verbose)
    }
}

/// tower::Serviceを実装した絞り込みサービス。結果は標準出力へ
#[derive(Debug, Clone, Default)]
pub struct FilterService {
    conditions: ConditionChain,
}

impl FilterService {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべてのリクエストに適用する条件（空席フィルタの後に評価）
    pub fn with_conditions(mut self, conditions: ConditionChain) -> Self {
        self.conditions = conditions;
        self
    }
}

impl Service<FilterRequest> for FilterService {
    type Response = CrawlSummary;
    type Error = FilterError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: FilterRequest) -> Self::Future {
        info!("絞り込みリクエスト受信: url={}", req.url);
        let conditions = self.conditions.clone();

        Box::pin(async move {
            let config: FilterConfig = req.into();
            let mut crawler = CatalogueCrawler::new(config)?;
            crawler.extend_conditions(&conditions);

            let summary = crawler.show().await?;

            info!("絞り込み完了: {}件", summary.matched);
            Ok(summary)
        })
    }
}
