use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

/// One scripted unlock: the title and badge a cheevos backend would report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnlockEvent {
    /// Simulated time, from the first frame, at which the unlock is pushed.
    #[serde(default)]
    pub at_ms: u64,
    pub title: String,
    #[serde(default)]
    pub badge: Option<String>,
}

impl UnlockEvent {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// Loads a JSON array of unlocks, ordered by `at_ms`. Unlocks sharing a
/// timestamp keep their file order.
pub fn load_script(path: &Path) -> Result<Vec<UnlockEvent>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading unlock script {}", path.display()))?;
    let mut events: Vec<UnlockEvent> = serde_json::from_str(&data)
        .with_context(|| format!("parsing unlock script {}", path.display()))?;
    for (idx, event) in events.iter().enumerate() {
        ensure!(
            !event.title.trim().is_empty(),
            "unlock #{idx} in {} has an empty title",
            path.display()
        );
    }
    events.sort_by_key(|event| event.at_ms);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn script(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp script");
        file.write_all(contents.as_bytes()).expect("write script");
        file
    }

    #[test]
    fn unlocks_sorted_stably_by_time() {
        let file = script(
            r#"[
                {"at_ms": 500, "title": "Later"},
                {"title": "First", "badge": "00001"},
                {"at_ms": 500, "title": "Later still"}
            ]"#,
        );
        let events = load_script(file.path()).expect("load");
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Later", "Later still"]);
        assert_eq!(events[0].badge.as_deref(), Some("00001"));
        assert_eq!(events[1].at(), Duration::from_millis(500));
    }

    #[test]
    fn blank_title_rejected() {
        let file = script(r#"[{"at_ms": 0, "title": "  "}]"#);
        let err = load_script(file.path()).expect_err("blank title");
        assert!(err.to_string().contains("empty title"));
    }

    #[test]
    fn malformed_json_reports_path() {
        let file = script("{ not json");
        let err = load_script(file.path()).expect_err("malformed");
        assert!(format!("{err:#}").contains("parsing unlock script"));
    }
}
