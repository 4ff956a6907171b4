//! 다이제스트 발송 -- sendmail 자식 프로세스 또는 표준 출력
//!
//! 수신자 주소가 있으면 sendmail 바이너리를 띄워 표준 입력으로 메시지를
//! 전달하고, 없으면 다이제스트를 표준 출력에 씁니다 (드라이런/디버그
//! 모드이며 에러가 아닙니다).
//!
//! 발송 실패는 반드시 보고되어야 하고, 이 경우 호출자는 캐시를 갱신하지
//! 않아야 다음 실행에서 같은 권고를 다시 시도할 수 있습니다.

use std::io::Write;
use std::process::{Command, Stdio};

use metrics::counter;
use tracing::{debug, info};

use cvepost_core::config::CvepostConfig;
use cvepost_core::metrics as metric_names;

use crate::digest::Digest;
use crate::error::NotifyError;

/// 발송 대상
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// 메일 주소로 발송
    Address(String),
    /// 표준 출력에 기록 (드라이런)
    Stdout,
}

impl Recipient {
    /// 주소 후보에서 수신자를 결정합니다.
    ///
    /// 우선순위: CLI 플래그 > 설정(환경변수 오버라이드 포함).
    /// 둘 다 비어 있으면 드라이런입니다.
    pub fn resolve(flag: Option<&str>, configured: &str) -> Self {
        let addr = flag.unwrap_or(configured).trim();
        if addr.is_empty() {
            Self::Stdout
        } else {
            Self::Address(addr.to_owned())
        }
    }
}

/// 다이제스트 발송기
#[derive(Debug, Clone)]
pub struct Dispatcher {
    /// 발신자 주소
    from_addr: String,
    /// sendmail 바이너리 경로
    sendmail_path: String,
    /// 발송 대상
    recipient: Recipient,
}

impl Dispatcher {
    /// 새 발송기를 생성합니다.
    pub fn new(from_addr: String, sendmail_path: String, recipient: Recipient) -> Self {
        Self {
            from_addr,
            sendmail_path,
            recipient,
        }
    }

    /// 통합 설정과 CLI 플래그에서 발송기를 생성합니다.
    pub fn from_config(config: &CvepostConfig, mail_to_flag: Option<&str>) -> Self {
        Self::new(
            config.notify.from_addr.clone(),
            config.notify.sendmail_path.clone(),
            Recipient::resolve(mail_to_flag, &config.notify.mail_to),
        )
    }

    /// 드라이런(표준 출력) 모드인지 여부를 반환합니다.
    pub fn is_dry_run(&self) -> bool {
        self.recipient == Recipient::Stdout
    }

    /// 다이제스트를 발송합니다.
    ///
    /// 성공 시에만 호출자가 캐시를 갱신해야 합니다.
    pub fn dispatch(&self, digest: &Digest) -> Result<(), NotifyError> {
        let result = match &self.recipient {
            Recipient::Stdout => self.dispatch_stdout(digest),
            Recipient::Address(addr) => self.dispatch_sendmail(digest, addr),
        };

        let label = if result.is_ok() { "success" } else { "failure" };
        counter!(
            metric_names::NOTIFY_DISPATCH_TOTAL,
            metric_names::LABEL_RESULT => label,
        )
        .increment(1);

        result
    }

    fn dispatch_stdout(&self, digest: &Digest) -> Result<(), NotifyError> {
        debug!("no recipient configured, writing digest to stdout");

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "Subject: {}\n", digest.subject)
            .and_then(|()| writeln!(handle, "{}", digest.body))
            .map_err(|e| NotifyError::Dispatch(format!("stdout write failed: {e}")))
    }

    fn dispatch_sendmail(&self, digest: &Digest, addr: &str) -> Result<(), NotifyError> {
        let message = build_message(&self.from_addr, addr, digest);

        let mut child = Command::new(&self.sendmail_path)
            .arg("-t")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                NotifyError::Dispatch(format!(
                    "failed to spawn {}: {e}",
                    self.sendmail_path
                ))
            })?;

        // stdin 핸들은 쓰기 후 닫혀야 sendmail이 입력 종료를 인지합니다.
        {
            let stdin = child.stdin.as_mut().ok_or_else(|| {
                NotifyError::Dispatch("sendmail stdin unavailable".to_owned())
            })?;
            stdin
                .write_all(message.as_bytes())
                .map_err(|e| NotifyError::Dispatch(format!("sendmail stdin write failed: {e}")))?;
        }

        let status = child
            .wait()
            .map_err(|e| NotifyError::Dispatch(format!("failed to wait for sendmail: {e}")))?;

        if !status.success() {
            return Err(NotifyError::Dispatch(format!(
                "sendmail exited with status {status}"
            )));
        }

        info!(to = %addr, "digest dispatched via sendmail");
        Ok(())
    }
}

/// RFC 822 형태의 메시지를 조립합니다.
fn build_message(from: &str, to: &str, digest: &Digest) -> String {
    format!(
        "From: {from}\nTo: {to}\nSubject: {subject}\n\n{body}",
        subject = digest.subject,
        body = digest.body,
    )
}
