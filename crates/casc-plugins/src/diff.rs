//! Side-by-side plugin id listings for operator review

use std::collections::BTreeSet;
use std::fmt;
use tracing::trace;

const COLUMN_WIDTH: usize = 40;

/// Where an id was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// Left column only (`<`)
    Left,
    /// Right column only (`>`)
    Right,
    /// Both columns (`|`)
    Both,
}

impl DiffSide {
    pub fn marker(&self) -> char {
        match self {
            Self::Left => '<',
            Self::Right => '>',
            Self::Both => '|',
        }
    }
}

/// One row of a diff listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub id: String,
    pub side: DiffSide,
}

/// Aligned three-column comparison of two id collections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub title: String,
    pub lines: Vec<DiffLine>,
}

impl DiffReport {
    /// Compare `left` and `right` over the sorted `universe`; ids in neither are skipped
    pub fn new<'a>(
        title: impl Into<String>,
        universe: impl IntoIterator<Item = &'a String>,
        left: &BTreeSet<String>,
        right: &BTreeSet<String>,
    ) -> Self {
        let universe: BTreeSet<&String> = universe.into_iter().collect();
        let lines = universe
            .into_iter()
            .filter_map(|id| {
                let side = match (left.contains(id), right.contains(id)) {
                    (true, true) => DiffSide::Both,
                    (true, false) => DiffSide::Left,
                    (false, true) => DiffSide::Right,
                    (false, false) => return None,
                };
                Some(DiffLine {
                    id: id.clone(),
                    side,
                })
            })
            .collect();

        Self {
            title: title.into(),
            lines,
        }
    }

    /// Compare two collections over their union
    pub fn between(
        title: impl Into<String>,
        left: &BTreeSet<String>,
        right: &BTreeSet<String>,
    ) -> Self {
        Self::new(title, left.union(right), left, right)
    }

    /// Ids present on one side only
    pub fn changes(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(|l| l.side != DiffSide::Both)
    }

    pub fn has_changes(&self) -> bool {
        self.changes().next().is_some()
    }

    /// Emit the report at trace level
    pub fn log(&self) {
        trace!("{}", "-".repeat(80));
        trace!("DIFF: {}", self.title);
        trace!("{}", "-".repeat(80));
        for line in &self.lines {
            trace!("{}", line);
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = match self.side {
            DiffSide::Left => (self.id.as_str(), ""),
            DiffSide::Right => ("", self.id.as_str()),
            DiffSide::Both => (self.id.as_str(), self.id.as_str()),
        };
        write!(
            f,
            "{:width$} {} {:width$}",
            left,
            self.side.marker(),
            right,
            width = COLUMN_WIDTH
        )
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DIFF: {}", self.title)?;
        for line in &self.lines {
            writeln!(f, "{}", line.to_string().trim_end())?;
        }
        Ok(())
    }
}
