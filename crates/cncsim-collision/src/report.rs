//! Collision report export

use crate::detector::{CollisionEvent, CollisionKind};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// CSV column header
pub const CSV_HEADER: &str = "kind,time_s,line,pair,x,y,z";

/// Quote a field when it holds a separator, quote or line break, doubling
/// embedded quotes
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Tabular view over detected events
#[derive(Debug, Clone, Copy)]
pub struct CollisionReport<'a> {
    events: &'a [CollisionEvent],
}

impl<'a> CollisionReport<'a> {
    pub fn new(events: &'a [CollisionEvent]) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &'a [CollisionEvent] {
        self.events
    }

    pub fn is_clean(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, kind: CollisionKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Distinct obstacle names in first-hit order
    pub fn obstacles(&self) -> Vec<&'a str> {
        let mut names: Vec<&str> = Vec::new();
        for event in self.events {
            if !names.contains(&event.obstacle.as_str()) {
                names.push(&event.obstacle);
            }
        }
        names
    }

    /// Render as CSV, one row per event, `\n` line endings.
    ///
    /// The pair field is quoted when a name holds `,`, `"` or a line break.
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.events.len() + 1);
        lines.push(CSV_HEADER.to_string());
        for e in self.events {
            lines.push(format!(
                "{},{:.6},{},{},{},{},{}",
                e.kind,
                e.t,
                e.line_number,
                csv_field(&e.pair_label()),
                e.point.x,
                e.point.y,
                e.point.z
            ));
        }
        lines.join("\n")
    }

    pub fn write_csv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.to_csv().as_bytes())
    }

    pub fn save_csv(&self, path: &Path) -> cncsim_core::Result<()> {
        std::fs::write(path, self.to_csv())?;
        tracing::info!("Wrote {} collision events to {}", self.events.len(), path.display());
        Ok(())
    }
}
