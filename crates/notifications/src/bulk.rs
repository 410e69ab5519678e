//! 批量操作
//!
//! 逐个执行单项异步操作，失败只记录不中断，也不回滚已完成的项。

use std::fmt::Display;
use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

/// 单项失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub label: String,
    pub error: String,
}

/// 批量执行汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub succeeded: Vec<String>,
    pub failures: Vec<BulkFailure>,
}

impl BulkSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// 记录单项结果，供逐项产生输入的调用方增量汇总
    pub fn record<E: Display>(&mut self, label: String, result: Result<(), E>) {
        match result {
            Ok(()) => self.succeeded.push(label),
            Err(e) => {
                warn!(item = %label, error = %e, "批量操作单项失败");
                self.failures.push(BulkFailure {
                    label,
                    error: e.to_string(),
                });
            }
        }
    }

    /// 结束汇总并输出日志
    pub fn finish(self) -> Self {
        info!(
            succeeded = self.succeeded.len(),
            failed = self.failures.len(),
            "批量操作完成"
        );
        self
    }

    /// 人类可读的汇总文本
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} of {} items processed successfully",
            self.succeeded.len(),
            self.total()
        );
        for failure in &self.failures {
            text.push_str(&format!("\n- {}: {}", failure.label, failure.error));
        }
        text
    }
}

/// 依次执行批量操作
///
/// `label` 为每一项生成汇总中使用的名称
pub async fn run_bulk<I, T, L, F, Fut, E>(items: I, label: L, mut op: F) -> BulkSummary
where
    I: IntoIterator<Item = T>,
    L: Fn(&T) -> String,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let mut summary = BulkSummary::default();

    for item in items {
        let name = label(&item);
        summary.record(name, op(item).await);
    }

    summary.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_continues_past_failures() {
        let summary = run_bulk(
            vec![1, 2, 3, 4],
            |n| format!("item-{n}"),
            |n| async move {
                if n % 2 == 0 {
                    Err(format!("{n} is even"))
                } else {
                    Ok(())
                }
            },
        )
        .await;

        assert_eq!(summary.succeeded, vec!["item-1", "item-3"]);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].label, "item-2");
        assert_eq!(summary.failures[0].error, "2 is even");
        assert!(!summary.is_complete_success());
        assert_eq!(summary.total(), 4);
    }

    #[tokio::test]
    async fn test_summary_text() {
        let summary = run_bulk(
            vec!["a", "b"],
            |s| s.to_string(),
            |s| async move {
                if s == "b" {
                    Err("boom")
                } else {
                    Ok(())
                }
            },
        )
        .await;

        assert_eq!(
            summary.summary(),
            "1 of 2 items processed successfully\n- b: boom"
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let summary = run_bulk(Vec::<u8>::new(), |n| n.to_string(), |_| async {
            Ok::<(), String>(())
        })
        .await;
        assert!(summary.is_complete_success());
        assert_eq!(summary.summary(), "0 of 0 items processed successfully");
    }

    #[test]
    fn test_record_incrementally() {
        let mut summary = BulkSummary::default();
        summary.record("line 1".to_string(), Ok::<(), String>(()));
        summary.record("line 2".to_string(), Err("bad json"));
        let summary = summary.finish();

        assert_eq!(summary.succeeded, vec!["line 1"]);
        assert_eq!(
            summary.failures,
            vec![BulkFailure {
                label: "line 2".to_string(),
                error: "bad json".to_string(),
            }]
        );
    }
}
