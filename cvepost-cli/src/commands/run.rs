//! `cvepost run` command handler
//!
//! 한 번의 배치 실행을 오케스트레이션합니다:
//! 캐시 로드 → 피드 읽기 → 관련성 파이프라인 → (비어 있지 않으면)
//! 다이제스트 발송 → 병합/프루닝/저장 → 실행 요약 출력.
//!
//! 캐시 저장은 발송이 성공한 뒤(또는 의도된 드라이런 출력 뒤)에만,
//! 실행당 정확히 한 번 수행됩니다. 발송 전에 크래시하면 권고는 통지된
//! 것으로 기록되지 않습니다.

use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Utc};
use metrics::counter;
use serde::Serialize;
use tracing::{info, warn};

use cvepost_advisory::{CveFeed, RelevancePipeline};
use cvepost_core::config::CvepostConfig;
use cvepost_core::metrics as metric_names;
use cvepost_notify::{DedupCache, DigestFormatter, Dispatcher, Recipient};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
pub async fn execute(
    args: RunArgs,
    config: &CvepostConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    // 캐시 저장소는 처리 시작 전에 열어 초기화 실패를 조기에 구분합니다.
    let mut cache = DedupCache::load(&config.cache.path)?;

    let feed = read_feed(&args.feed, config.feed.max_feed_bytes)?;
    info!(records = feed.record_count(), "feed loaded");

    let pipeline = RelevancePipeline::from_config(config);
    let report = pipeline.run(&feed, &cache.seen_set());

    if report.extraction_failures > 0 {
        warn!(
            skipped = report.extraction_failures,
            "records were skipped due to extraction failures"
        );
    }

    let now = Utc::now();
    let mut dispatched = DispatchOutcome::Skipped;

    if report.notify_count() > 0 {
        let formatter = DigestFormatter::from_config(config);
        let digest = formatter.render(&report.advisories, now.date_naive());

        let dispatcher = if args.dry_run {
            Dispatcher::new(
                config.notify.from_addr.clone(),
                config.notify.sendmail_path.clone(),
                Recipient::Stdout,
            )
        } else {
            Dispatcher::from_config(config, args.mail_to.as_deref())
        };

        dispatched = if dispatcher.is_dry_run() {
            DispatchOutcome::Stdout
        } else {
            DispatchOutcome::Sendmail
        };

        // 발송 실패 시 여기서 반환되어 캐시는 갱신되지 않습니다.
        dispatcher.dispatch(&digest)?;

        counter!(metric_names::NOTIFY_ADVISORIES_TOTAL)
            .increment(report.notify_count() as u64);

        cache.insert_all(report.notify_ids());
    } else {
        info!("no new relevant advisories, skipping dispatch");
    }

    let pruned = cache.prune(now.year());
    cache.save()?;

    let summary = RunSummary {
        run_id: report.run_id.clone(),
        feed: feed_label(&args.feed),
        total_records: report.total_records,
        matched_records: report.matched_records,
        extraction_failures: report.extraction_failures,
        below_policy: report.below_policy,
        already_notified: report.already_notified,
        duplicate_ids: report.duplicate_ids,
        notified: report.notify_count(),
        dispatched,
        cache_entries: cache.len(),
        cache_pruned: pruned,
        cache_path: cache.path().display().to_string(),
    };

    writer.render(&summary)?;

    Ok(())
}

/// 피드 문서를 읽습니다. `-`는 표준 입력을 의미합니다.
fn read_feed(path: &Path, max_bytes: usize) -> Result<CveFeed, CliError> {
    if path.as_os_str() == "-" {
        let content = std::io::read_to_string(std::io::stdin())?;
        if content.len() > max_bytes {
            return Err(cvepost_advisory::AdvisoryError::FeedTooLarge {
                size: content.len(),
                max: max_bytes,
            }
            .into());
        }
        Ok(CveFeed::from_json(&content)?)
    } else {
        Ok(CveFeed::load_from_path(path, max_bytes)?)
    }
}

fn feed_label(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "<stdin>".to_owned()
    } else {
        path.display().to_string()
    }
}

/// 다이제스트가 어디로 전달되었는지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum DispatchOutcome {
    /// sendmail로 발송됨
    Sendmail,
    /// 표준 출력에 기록됨 (드라이런)
    Stdout,
    /// 알림 대상이 없어 발송 생략
    Skipped,
}

/// 실행 요약 -- `run` 서브커맨드의 출력 페이로드
#[derive(Serialize)]
struct RunSummary {
    run_id: String,
    feed: String,
    total_records: usize,
    matched_records: usize,
    extraction_failures: usize,
    below_policy: usize,
    already_notified: usize,
    duplicate_ids: usize,
    notified: usize,
    dispatched: DispatchOutcome,
    cache_entries: usize,
    cache_pruned: usize,
    cache_path: String,
}

impl Render for RunSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Run: {}", self.run_id.bold())?;
        writeln!(w, "Feed: {}", self.feed)?;
        writeln!(
            w,
            "Records: {} total, {} matched, {} skipped",
            self.total_records, self.matched_records, self.extraction_failures
        )?;
        writeln!(
            w,
            "Filtered: {} below policy, {} already notified, {} duplicates",
            self.below_policy, self.already_notified, self.duplicate_ids
        )?;

        let notified_str = format!("{} advisories", self.notified);
        match self.dispatched {
            DispatchOutcome::Sendmail => {
                writeln!(w, "Notified: {} (via sendmail)", notified_str.red().bold())?;
            }
            DispatchOutcome::Stdout => {
                writeln!(w, "Notified: {} (dry run)", notified_str.yellow().bold())?;
            }
            DispatchOutcome::Skipped => {
                writeln!(w, "Notified: {}", "nothing new".green())?;
            }
        }

        writeln!(
            w,
            "Cache: {} entries ({} pruned) at {}",
            self.cache_entries, self.cache_pruned, self.cache_path
        )?;

        Ok(())
    }
}
