//! After-call report assembled from the session's accumulated state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::advisory::AdvisoryBoard;
use crate::facility::Facility;
use crate::hotlines::{hotlines, Hotline};
use crate::panel::{FacilityPanel, PanelSource};

#[derive(Debug, Clone, Serialize)]
pub struct CallReport {
    pub generated_at: DateTime<Utc>,
    /// Newest first, as accumulated.
    pub summary: Vec<String>,
    pub advice: Vec<String>,
    pub recommended_facility: Option<Facility>,
    pub facility_source: PanelSource,
    pub hotlines: Vec<Hotline>,
}

impl CallReport {
    #[must_use]
    pub fn build(board: &AdvisoryBoard, panel: &FacilityPanel, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            summary: board.summary.to_vec(),
            advice: board.advice.to_vec(),
            recommended_facility: panel.nearest().cloned(),
            facility_source: panel.source(),
            hotlines: hotlines().to_vec(),
        }
    }

    /// Plain-text rendering for pasting into an incident record.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "Incident report ({})\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        out.push_str("\nSummary:\n");
        push_lines(&mut out, self.summary.iter().rev());

        out.push_str("\nAdvice given:\n");
        push_lines(&mut out, self.advice.iter().rev());

        out.push_str("\nRecommended facility:\n");
        match &self.recommended_facility {
            Some(f) => out.push_str(&format!(
                "  {} ({}), {:.1} mi, ETA {} min\n",
                f.name, f.category, f.distance_miles, f.eta_minutes
            )),
            None => out.push_str("  (none)\n"),
        }
        out
    }
}

/// Oldest first reads better in a written report.
fn push_lines<'a>(out: &mut String, lines: impl Iterator<Item = &'a String>) {
    let mut any = false;
    for line in lines {
        out.push_str("  - ");
        out.push_str(line);
        out.push('\n');
        any = true;
    }
    if !any {
        out.push_str("  (none)\n");
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::advisory::AdvisoryFeed;
    use crate::facility::RankingConfig;
    use crate::geo::Coordinate;

    fn panel() -> FacilityPanel {
        FacilityPanel::new(RankingConfig::new(Coordinate::new(37.8715, -122.2730), 2.0))
    }

    #[test]
    fn report_carries_board_and_nearest_facility() {
        let mut board = AdvisoryBoard::default();
        board.ingest(AdvisoryFeed {
            summary: vec!["Chest pain for 20 minutes".to_string()],
            advice: vec!["Keep patient seated upright".to_string()],
        });
        board.ingest(AdvisoryFeed {
            summary: vec!["Pain spreading to left arm".to_string()],
            advice: vec![],
        });
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

        let report = CallReport::build(&board, &panel(), at);

        assert_eq!(report.summary[0], "Pain spreading to left arm");
        assert_eq!(report.facility_source, PanelSource::Seeded);
        assert_eq!(
            report.recommended_facility.as_ref().map(|f| f.name.as_str()),
            Some("Telegraph Urgent Care")
        );
        assert_eq!(report.hotlines.len(), 3);

        let text = report.to_text();
        assert!(text.starts_with("Incident report (2026-10-16 12:00:00 UTC)"));
        let first = text.find("Chest pain").expect("first summary line");
        let second = text.find("Pain spreading").expect("second summary line");
        assert!(first < second, "report should read oldest first");
        assert!(text.contains("Telegraph Urgent Care (urgent_care)"));
        assert!(text.contains("ETA 2 min"));
    }

    #[test]
    fn empty_sections_are_marked() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let report = CallReport::build(&AdvisoryBoard::default(), &panel(), at);
        let text = report.to_text();
        assert_eq!(text.matches("(none)").count(), 2);
    }
}
