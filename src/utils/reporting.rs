use std::path::Path;
use csv::Writer;
use serde::Serialize;
use crate::organize::grouping::TagFailure;
use crate::utils::file_ops::{MoveOutcome, MoveResult};
use crate::Result;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Destination")]
    destination: String,
    #[serde(rename = "Outcome")]
    outcome: &'a str,
    #[serde(rename = "Message")]
    message: &'a str,
}

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// Every line of the final error summary, tag failures first.
    pub fn error_lines(&self, failures: &[TagFailure], results: &[MoveResult]) -> Vec<String> {
        let tag_errors = failures
            .iter()
            .map(|f| format!("{}: {}", f.path.display(), f.message));
        let move_errors = results.iter().filter_map(|r| match &r.outcome {
            MoveOutcome::Failed(message) => Some(format!("{}: {}", r.source.display(), message)),
            _ => None,
        });
        tag_errors.chain(move_errors).collect()
    }

    pub fn print_summary(&self, failures: &[TagFailure], results: &[MoveResult]) {
        let moved = results.iter().filter(|r| r.outcome == MoveOutcome::Moved).count();
        let planned = results.iter().filter(|r| r.outcome == MoveOutcome::DryRun).count();

        println!("All done.");
        if planned > 0 {
            println!("{} files would be moved.", planned);
        } else {
            println!("{} files moved.", moved);
        }

        let errors = self.error_lines(failures, results);
        if !errors.is_empty() {
            println!("The following errors occurred:");
            for line in errors {
                println!("{}", line);
            }
        }
    }

    pub fn generate_move_report(
        &self,
        failures: &[TagFailure],
        results: &[MoveResult],
        output_path: impl AsRef<Path>,
    ) -> Result<()> {
        let output_path_ref = output_path.as_ref();
        let mut writer = Writer::from_path(output_path_ref)?;

        for failure in failures {
            writer.serialize(ReportRow {
                source: failure.path.display().to_string(),
                destination: String::new(),
                outcome: "Unreadable",
                message: &failure.message,
            })?;
        }

        for result in results {
            let (outcome, message) = match &result.outcome {
                MoveOutcome::Moved => ("Moved", ""),
                MoveOutcome::DryRun => ("Dry run", ""),
                MoveOutcome::Failed(message) => ("Failed", message.as_str()),
            };
            writer.serialize(ReportRow {
                source: result.source.display().to_string(),
                destination: result.destination.display().to_string(),
                outcome,
                message,
            })?;
        }

        writer.flush()?;
        log::info!("Report generated: {}", output_path_ref.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn results() -> (Vec<TagFailure>, Vec<MoveResult>) {
        let failures = vec![TagFailure {
            path: PathBuf::from("/in/bad.mp3"),
            message: "Unsupported file format: /in/bad.mp3".into(),
        }];
        let results = vec![
            MoveResult {
                source: PathBuf::from("/in/a.mp3"),
                destination: PathBuf::from("/music/X/Y/Z.mp3"),
                outcome: MoveOutcome::Moved,
            },
            MoveResult {
                source: PathBuf::from("/in/b.mp3"),
                destination: PathBuf::from("/music/X/Y/W.mp3"),
                outcome: MoveOutcome::Failed("Permission denied".into()),
            },
        ];
        (failures, results)
    }

    #[test]
    fn error_lines_list_tag_and_move_failures() {
        let (failures, results) = results();
        assert_eq!(
            Reporter::new().error_lines(&failures, &results),
            vec![
                "/in/bad.mp3: Unsupported file format: /in/bad.mp3".to_string(),
                "/in/b.mp3: Permission denied".to_string(),
            ]
        );
    }

    #[test]
    fn csv_report_has_one_row_per_file() {
        let (failures, results) = results();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        Reporter::new()
            .generate_move_report(&failures, &results, &path)
            .unwrap();

        let report = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Source,Destination,Outcome,Message",
                "/in/bad.mp3,,Unreadable,Unsupported file format: /in/bad.mp3",
                "/in/a.mp3,/music/X/Y/Z.mp3,Moved,",
                "/in/b.mp3,/music/X/Y/W.mp3,Failed,Permission denied",
            ]
        );
    }
}
