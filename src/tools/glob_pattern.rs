use anyhow::{Context, Result, bail};
use glob::{MatchOptions, Pattern};
use std::path::Path;

/// 預設的影片檔案 glob
pub const DEFAULT_VIDEO_GLOB: &str = "**/*.{asf,avi,flv,mkv,mov,mpg,mp4,vob,wmv}";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// 不分大小寫的 glob 比對器
///
/// `{a,b}` 先展開為多個 pattern，其餘語法（`**`、`*`、`?`、`[...]`）交給 `glob`。
/// 比對對象為相對於掃描根目錄、以 `/` 分隔的路徑。
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    patterns: Vec<Pattern>,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
        let patterns = expand_braces(trimmed)?
            .iter()
            .map(|expanded| {
                Pattern::new(expanded).with_context(|| format!("無效的 glob: {pattern}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: pattern.to_string(),
            patterns,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, relative_path: &Path) -> bool {
        let normalized: Vec<String> = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let normalized = normalized.join("/");

        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(&normalized, MATCH_OPTIONS))
    }
}

/// 展開 `{a,b}` 選擇（可巢狀），`[...]` 內的大括號與逗號視為字面值
fn expand_braces(pattern: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut in_class = false;
    let mut open = None;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '{' if !in_class => {
                open = Some(i);
                break;
            }
            _ => {}
        }
    }

    let Some(start) = open else {
        return Ok(vec![pattern.to_string()]);
    };

    let mut depth = 0usize;
    let mut alternatives = Vec::new();
    let mut current = String::new();
    let mut end = None;

    for (i, &c) in chars.iter().enumerate().skip(start + 1) {
        match c {
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '{' if !in_class => depth += 1,
            '}' if !in_class && depth == 0 => {
                end = Some(i);
                break;
            }
            '}' if !in_class => depth -= 1,
            ',' if !in_class && depth == 0 => {
                alternatives.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    let Some(end) = end else {
        bail!("glob 的大括號未閉合: {pattern}");
    };
    alternatives.push(current);

    let prefix: String = chars[..start].iter().collect();
    let suffix: String = chars[end + 1..].iter().collect();

    let mut expanded = Vec::new();
    for alternative in alternatives {
        expanded.extend(expand_braces(&format!("{prefix}{alternative}{suffix}"))?);
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_glob_matches_nested_and_root() {
        let glob = GlobPattern::new(DEFAULT_VIDEO_GLOB).unwrap();
        assert!(glob.matches(Path::new("movie.mp4")));
        assert!(glob.matches(Path::new("a/b/clip.MKV")));
        assert!(glob.matches(Path::new("Season 1/Ep.01.Wmv")));
        assert!(!glob.matches(Path::new("notes.txt")));
        assert!(!glob.matches(Path::new("movie.mp4.preview.jpg")));
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let glob = GlobPattern::new("*.avi").unwrap();
        assert!(glob.matches(Path::new("a.avi")));
        assert!(!glob.matches(Path::new("sub/a.avi")));
    }

    #[test]
    fn test_question_mark_and_literals() {
        let glob = GlobPattern::new("clip?.(1).mov").unwrap();
        assert!(glob.matches(Path::new("clipA.(1).mov")));
        assert!(!glob.matches(Path::new("clipAB.(1).mov")));
    }

    #[test]
    fn test_character_class() {
        let glob = GlobPattern::new("**/*.[mM][pP]4").unwrap();
        assert!(glob.matches(Path::new("a.mp4")));
        assert!(glob.matches(Path::new("sub/b.MP4")));
        assert!(!glob.matches(Path::new("a.mp3")));

        let negated = GlobPattern::new("ep[!0].mkv").unwrap();
        assert!(negated.matches(Path::new("ep1.mkv")));
        assert!(!negated.matches(Path::new("ep0.mkv")));
    }

    #[test]
    fn test_brace_expansion() {
        assert_eq!(
            expand_braces("*.{mp4,mkv}").unwrap(),
            vec!["*.mp4", "*.mkv"]
        );
        assert_eq!(
            expand_braces("{a,b{1,2}}.avi").unwrap(),
            vec!["a.avi", "b1.avi", "b2.avi"]
        );
        assert_eq!(expand_braces("[{,}].mov").unwrap(), vec!["[{,}].mov"]);
    }

    #[test]
    fn test_unbalanced_brace_rejected() {
        assert!(GlobPattern::new("**/*.{mp4,mkv").is_err());
    }
}
