use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Where a component's analysis comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputSource {
    /// Built-in synthetic readings
    Sample,
    /// Raw telemetry to analyze
    Csv(PathBuf),
    /// A previously written analysis report
    Report(PathBuf),
}

impl InputSource {
    pub(crate) fn describe(&self) -> String {
        match self {
            InputSource::Sample => "built-in sample data".to_string(),
            InputSource::Csv(path) => format!("telemetry {}", path.display()),
            InputSource::Report(path) => format!("report {}", path.display()),
        }
    }
}

/// Files directly inside `dir` with the given extension
pub(crate) fn list_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let pattern = format!(
        "{}/*.{extension}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    match glob::glob(&pattern) {
        Ok(entries) => entries.flatten().filter(|p| p.is_file()).collect(),
        Err(_) => Vec::new(),
    }
}

fn modified(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Most recently modified matching file across `dirs`; ties go to the greater path
pub(crate) fn newest_file(dirs: &[&Path], extension: &str) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| list_files(dir, extension))
        .max_by_key(|p| (modified(p), p.clone()))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Resolve the input for a run.
///
/// Order: `--sample`, `--input`, newest CSV in `csv_dirs`, newest report in
/// `report_dir` (when given). `None` means nothing was found.
pub(crate) fn resolve_input(
    explicit: Option<&Path>,
    sample: bool,
    csv_dirs: &[&Path],
    report_dir: Option<&Path>,
) -> Option<InputSource> {
    if sample {
        return Some(InputSource::Sample);
    }
    if let Some(path) = explicit {
        return Some(if is_json(path) {
            InputSource::Report(path.to_path_buf())
        } else {
            InputSource::Csv(path.to_path_buf())
        });
    }
    if let Some(csv) = newest_file(csv_dirs, "csv") {
        return Some(InputSource::Csv(csv));
    }
    report_dir
        .and_then(|dir| newest_file(&[dir], "json"))
        .map(InputSource::Report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn touch(path: &Path, age_secs: u64) {
        fs::write(path, "timestamp,value\n").unwrap();
        let when = SystemTime::now() - Duration::from_secs(age_secs);
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(when)
            .unwrap();
    }

    #[test]
    fn sample_wins_over_everything() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.csv"), 0);
        let got = resolve_input(Some(Path::new("x.csv")), true, &[dir.path()], None);
        assert_eq!(got, Some(InputSource::Sample));
    }

    #[test]
    fn explicit_input_by_extension() {
        assert_eq!(
            resolve_input(Some(Path::new("r.JSON")), false, &[], None),
            Some(InputSource::Report(PathBuf::from("r.JSON")))
        );
        assert_eq!(
            resolve_input(Some(Path::new("pump.txt")), false, &[], None),
            Some(InputSource::Csv(PathBuf::from("pump.txt")))
        );
    }

    #[test]
    fn newest_csv_across_dirs() {
        let work = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        touch(&work.path().join("old.csv"), 3600);
        touch(&data.path().join("new.csv"), 10);

        let got = resolve_input(None, false, &[work.path(), data.path()], None);
        assert_eq!(got, Some(InputSource::Csv(data.path().join("new.csv"))));
    }

    #[test]
    fn falls_back_to_report_only_when_allowed() {
        let data = tempfile::tempdir().unwrap();
        touch(&data.path().join("water_pump_analysis_1.json"), 100);
        touch(&data.path().join("water_pump_analysis_2.json"), 5);

        assert_eq!(resolve_input(None, false, &[], None), None);
        assert_eq!(
            resolve_input(None, false, &[], Some(data.path())),
            Some(InputSource::Report(data.path().join("water_pump_analysis_2.json")))
        );
    }

    #[test]
    fn list_files_ignores_other_extensions_and_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.csv"), 0);
        touch(&dir.path().join("b.json"), 0);
        assert_eq!(list_files(dir.path(), "csv").len(), 1);
        assert!(list_files(&dir.path().join("missing"), "csv").is_empty());
    }
}
