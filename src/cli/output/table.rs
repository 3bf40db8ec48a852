//! Table output formatting for CLI commands
//!
//! Provides formatted tables for the catalog, rendered cards and sync status
//! using comfy-table. Colors are dropped for NO_COLOR and dumb terminals.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;
use crate::domain::models::{
    CardMode, CardSlot, DerivedStatus, IntegrationDescriptor, IntegrationStatus, ProviderForm,
};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<usize>,
}

impl TableFormatter {
    /// Formatter that colours output when the terminal allows it.
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Formatter with explicit settings.
    pub fn with_config(use_colors: bool, max_width: Option<usize>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format catalog entries
    pub fn format_catalog(&self, descriptors: &[&IntegrationDescriptor]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["ID", "Name", "Category", "Form", "Plan Feature"]));

        for descriptor in descriptors {
            let feature = descriptor
                .required_feature()
                .map_or_else(|| "-".to_string(), |feature| feature.to_string());
            table.add_row(vec![
                Cell::new(descriptor.id.as_str()),
                Cell::new(descriptor.name),
                Cell::new(descriptor.category.display_name()),
                Cell::new(form_label(&descriptor.form())),
                Cell::new(feature),
            ]);
        }

        table.to_string()
    }

    /// Format rendered cards
    pub fn format_cards(&self, slots: &[CardSlot]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Integration", "Status", "Mode", "Badges", "Last Synced"]));

        for slot in slots {
            match slot {
                CardSlot::Card(card) => {
                    let badges = if card.badges.is_empty() {
                        "-".to_string()
                    } else {
                        card.badges
                            .iter()
                            .map(|badge| badge.label())
                            .collect::<Vec<_>>()
                            .join(", ")
                    };
                    let mode = match &card.mode {
                        CardMode::Locked { upgrade_route } => format!("locked ({upgrade_route})"),
                        other => other.name().to_string(),
                    };
                    table.add_row(vec![
                        Cell::new(&card.name),
                        self.status_cell(card.status),
                        Cell::new(mode),
                        Cell::new(badges),
                        Cell::new(card.last_synced.as_deref().unwrap_or("-")),
                    ]);
                }
                CardSlot::Fallback { id, title, subtitle } => {
                    let error = if self.use_colors {
                        Cell::new(title).fg(Color::Red)
                    } else {
                        Cell::new(title)
                    };
                    table.add_row(vec![
                        Cell::new(id.as_str()),
                        error,
                        Cell::new("-"),
                        Cell::new("-"),
                        Cell::new(truncate(subtitle, 40)),
                    ]);
                }
            }
        }

        table.to_string()
    }

    /// Format sync status rows, one per feature
    pub fn format_status(&self, rows: &[(String, IntegrationStatus)]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Feature", "State", "Status", "Last Synced At", "Message"]));

        for (feature, status) in rows {
            let last_synced = if status.last_synced_at > 0 {
                chrono::DateTime::from_timestamp(status.last_synced_at, 0)
                    .map_or_else(|| "-".to_string(), |at| at.to_rfc3339())
            } else {
                "-".to_string()
            };
            table.add_row(vec![
                Cell::new(feature),
                Cell::new(status.state.as_str()),
                self.status_cell(status.derived()),
                Cell::new(last_synced),
                Cell::new(truncate(status.message.as_deref().unwrap_or("-"), 40)),
            ]);
        }

        table.to_string()
    }

    fn status_cell(&self, status: DerivedStatus) -> Cell {
        if self.use_colors {
            Cell::new(status.as_str()).fg(status_color(status))
        } else {
            Cell::new(format!("{} {}", status_icon(status), status.as_str()))
        }
    }

    /// Create a base table with common settings
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(u16::try_from(width).unwrap_or(u16::MAX));
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

fn form_label(form: &ProviderForm) -> &'static str {
    match form {
        ProviderForm::SdkSnippet => "sdk",
        ProviderForm::OAuth { .. } => "oauth",
        ProviderForm::Credentials { .. } => "credentials",
        ProviderForm::Toggle { .. } => "toggle",
    }
}

const fn status_color(status: DerivedStatus) -> Color {
    match status {
        DerivedStatus::Connected => Color::Green,
        DerivedStatus::Pending => Color::Yellow,
        DerivedStatus::Error => Color::Red,
        DerivedStatus::NotConnected => Color::DarkGrey,
    }
}

const fn status_icon(status: DerivedStatus) -> &'static str {
    match status {
        DerivedStatus::Connected => "✓",
        DerivedStatus::Pending => "…",
        DerivedStatus::Error => "✗",
        DerivedStatus::NotConnected => "○",
    }
}

/// Check if the terminal supports colors
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}
