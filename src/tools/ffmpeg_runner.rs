use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

static REGEX_FFMPEG_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ffmpeg version ").expect("Invalid regex"));

/// 外部媒體工具的呼叫介面
///
/// 回傳 stdout 與 stderr 合併後的文字輸出（已 trim，`\r` 轉為 `\n`）。
/// ffmpeg 的結束碼不代表成功與否（例如 `-i` 不帶輸出一定失敗），
/// 因此只有無法啟動程序時才回傳錯誤。
pub trait FfmpegRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<String>;
}

/// 呼叫系統上的 ffmpeg 執行檔
#[derive(Debug, Clone)]
pub struct SystemFfmpeg {
    binary: PathBuf,
}

impl SystemFfmpeg {
    #[must_use]
    pub fn new(binary: &Path) -> Self {
        Self {
            binary: binary.to_path_buf(),
        }
    }

    /// 檢查 ffmpeg 是否可用（`-version` 輸出需包含 `ffmpeg version`）
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.run(&["-version".to_string()])
            .is_ok_and(|output| REGEX_FFMPEG_VERSION.is_match(&output))
    }
}

impl Default for SystemFfmpeg {
    fn default() -> Self {
        Self::new(Path::new("ffmpeg"))
    }
}

impl FfmpegRunner for SystemFfmpeg {
    fn run(&self, args: &[String]) -> Result<String> {
        debug!("執行: {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("無法執行 {}", self.binary.display()))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(normalize_output(&combined))
    }
}

/// ffmpeg 以 `\r` 模擬狀態列，轉為真正的換行以便逐行解析
#[must_use]
pub fn normalize_output(raw: &str) -> String {
    raw.trim().replace('\r', "\n")
}
