use crate::config::DEFAULT_MIN_SIZE_BYTES;
use crate::tools::DEFAULT_VIDEO_GLOB;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 為資料夾中的每部影片產生一張預覽圖（縮圖網格）
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
pub struct Cli {
    /// 要搜尋影片的資料夾
    pub folder: PathBuf,

    /// 搜尋影片檔案的 glob
    #[arg(short, long, default_value = DEFAULT_VIDEO_GLOB)]
    pub glob: String,

    /// 預覽圖寬度
    #[arg(short, long, default_value_t = 1920)]
    pub width: u32,

    /// 預覽圖高度
    #[arg(short, long, default_value_t = 1080)]
    pub height: u32,

    /// 預覽圖 JPEG 品質 (0-100)
    #[arg(short, long, default_value_t = 100)]
    pub quality: u8,

    /// 預覽圖欄數
    #[arg(short, long, default_value_t = 9)]
    pub columns: u32,

    /// 預覽圖列數
    #[arg(short, long, default_value_t = 7)]
    pub rows: u32,

    /// 預覽圖檔名後綴
    #[arg(short, long, default_value = ".preview.jpg")]
    pub suffix: String,

    /// 預覽圖文字的字型
    #[arg(short, long, default_value = "Arial")]
    pub font: String,

    /// 預覽圖文字的字體大小
    #[arg(short = 'z', long, default_value_t = 16)]
    pub font_size: u32,

    /// 預覽圖文字的外框寬度
    #[arg(short = 'l', long, default_value_t = 1)]
    pub outline_width: u32,

    /// 暫存檔案的資料夾（預設為系統暫存目錄）
    #[arg(short, long)]
    pub temp: Option<PathBuf>,

    /// 截圖之間的邊框寬度
    #[arg(short, long, default_value_t = 2)]
    pub border_width: u32,

    /// 覆寫已存在的預覽圖
    #[arg(short, long)]
    pub overwrite: bool,

    /// 在預覽圖頂部加上檔名
    #[arg(short = 'a', long)]
    pub add_filename: bool,

    /// 在預覽圖頂部加上相對路徑
    #[arg(short = 'R', long)]
    pub add_filename_rel: bool,

    /// 在預覽圖頂部加上絕對路徑
    #[arg(short = 'A', long)]
    pub add_filename_abs: bool,

    /// 同時處理的影片數
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// 小於等於此大小（bytes）的檔案會被略過
    #[arg(long, default_value_t = DEFAULT_MIN_SIZE_BYTES)]
    pub min_size: u64,

    /// ffmpeg 執行檔路徑
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// 顯示除錯訊息
    #[arg(short, long)]
    pub verbose: bool,

    /// 顯示說明
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}
