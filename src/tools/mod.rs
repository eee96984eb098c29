mod ffmpeg_runner;
mod glob_pattern;
mod path_validator;
mod time_format;
mod video_scanner;

pub use ffmpeg_runner::{FfmpegRunner, SystemFfmpeg, normalize_output};
pub use glob_pattern::{DEFAULT_VIDEO_GLOB, GlobPattern};
pub use path_validator::{ensure_directory_exists, resolve_target_folder};
pub use time_format::{seconds_to_time, time_to_seconds};
pub use video_scanner::{VideoCandidate, compare_paths_case_insensitive, scan_video_files};
