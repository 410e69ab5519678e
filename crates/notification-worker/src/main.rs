//! 通知工作者
//!
//! 从文件或标准输入读取 JSON Lines 事件信封并分发通知。

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use notification_worker::consumer::EnvelopeConsumer;
use notification_worker::setup::{build_dispatcher, load_config, site_links};
use orvium_shared::observability;
use tokio::io::BufReader;
use tracing::{info, warn};

/// 通知工作者命令行参数
#[derive(Parser, Debug)]
#[command(name = "notification-worker")]
#[command(version, about = "Orvium 通知分发工作者")]
struct Cli {
    /// 事件信封文件（JSON Lines），缺省读取标准输入
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config("notification-worker", cli.log_level)?;
    let _guard = observability::init(&config)?;

    info!("Starting notification-worker...");

    let consumer = EnvelopeConsumer::new(Arc::new(build_dispatcher(&config)), site_links(&config));
    let summary = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            consumer.run(BufReader::new(file)).await?
        }
        None => consumer.run(BufReader::new(tokio::io::stdin())).await?,
    };

    if summary.is_complete_success() {
        info!(processed = summary.total(), "全部事件信封处理完成");
    } else {
        warn!(
            succeeded = summary.succeeded.len(),
            failed = summary.failures.len(),
            "部分事件信封处理失败\n{}",
            summary.summary()
        );
    }

    Ok(())
}
