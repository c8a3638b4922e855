use async_trait::async_trait;

use crate::catalogue::GroupRecord;
use crate::error::FilterError;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// ページ本文を取得。失敗の原因は区別せず `FilterError::Fetch` にまとめる
    async fn fetch(&self, url: &str) -> Result<String, FilterError>;
}

/// グループに対する絞り込み条件
pub trait Predicate: Send + Sync {
    fn evaluate(&self, record: &GroupRecord) -> Result<bool, FilterError>;
}
