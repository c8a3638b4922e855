//! 絞り込み条件
//!
//! 条件は登録順に評価し、最初に false を返したものでグループを除外する。
//! 評価中のエラーは警告ログを出して次の条件へ進む（除外はしない）。

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::catalogue::GroupRecord;
use crate::error::FilterError;
use crate::traits::Predicate;

/// 空席フィルタ。`expired` が true なら満席のグループのみ通す
#[derive(Debug, Clone, Copy)]
pub struct SeatAvailability {
    expired: bool,
}

impl SeatAvailability {
    pub fn new(expired: bool) -> Self {
        Self { expired }
    }
}

impl Predicate for SeatAvailability {
    fn evaluate(&self, record: &GroupRecord) -> Result<bool, FilterError> {
        Ok(record.seats.is_full() == self.expired)
    }
}

/// bool を返すクロージャ
pub struct FnCondition<F>(pub F);

impl<F> Predicate for FnCondition<F>
where
    F: Fn(&GroupRecord) -> bool + Send + Sync,
{
    fn evaluate(&self, record: &GroupRecord) -> Result<bool, FilterError> {
        Ok((self.0)(record))
    }
}

/// Result を返すクロージャ
pub struct FallibleCondition<F>(pub F);

impl<F> Predicate for FallibleCondition<F>
where
    F: Fn(&GroupRecord) -> Result<bool, FilterError> + Send + Sync,
{
    fn evaluate(&self, record: &GroupRecord) -> Result<bool, FilterError> {
        (self.0)(record)
    }
}

#[derive(Clone, Default)]
pub struct ConditionChain {
    conditions: Vec<Arc<dyn Predicate>>,
}

impl fmt::Debug for ConditionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionChain")
            .field("len", &self.conditions.len())
            .finish()
    }
}

impl ConditionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空席フィルタを先頭に登録したチェーン
    pub fn with_seat_filter(expired: bool) -> Self {
        let mut chain = Self::new();
        chain.push(SeatAvailability::new(expired));
        chain
    }

    pub fn push<P: Predicate + 'static>(&mut self, predicate: P) {
        self.conditions.push(Arc::new(predicate));
    }

    pub fn add_condition<F>(&mut self, condition: F)
    where
        F: Fn(&GroupRecord) -> bool + Send + Sync + 'static,
    {
        self.push(FnCondition(condition));
    }

    pub fn add_fallible_condition<F>(&mut self, condition: F)
    where
        F: Fn(&GroupRecord) -> Result<bool, FilterError> + Send + Sync + 'static,
    {
        self.push(FallibleCondition(condition));
    }

    pub fn extend(&mut self, other: &ConditionChain) {
        self.conditions.extend(other.conditions.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &GroupRecord) -> bool {
        for (index, condition) in self.conditions.iter().enumerate() {
            match condition.evaluate(record) {
                Ok(true) => {}
                Ok(false) => return false,
                // エラーは除外扱いにしない
                Err(e) => warn!(
                    url = %record.url,
                    condition = index,
                    error = %e,
                    "Condition failed, ignoring"
                ),
            }
        }
        true
    }
}
