//! Mapping logical offer fields onto the columns a particular sheet actually has.

use crate::dataset::Dataset;
use std::fmt;

/// A domain concept the dashboard needs a column for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Region,
    AgencyAccess,
    CurrentCap,
    Offer,
    CampaignType,
}

impl LogicalField {
    pub const ALL: [LogicalField; 5] = [
        Self::Region,
        Self::AgencyAccess,
        Self::CurrentCap,
        Self::Offer,
        Self::CampaignType,
    ];

    /// Fields offered as equality filters, in application order.
    pub const FILTERABLE: [LogicalField; 4] = [
        Self::Region,
        Self::AgencyAccess,
        Self::CurrentCap,
        Self::CampaignType,
    ];

    /// Header text the field is looked up by unless configured otherwise.
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Region => "Region",
            Self::AgencyAccess => "Agency Access",
            Self::CurrentCap => "Current Cap",
            Self::Offer => "Offer",
            Self::CampaignType => "Campaign Type",
        }
    }

    /// Kebab-case key used on the command line and in config (`agency-access`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::AgencyAccess => "agency-access",
            Self::CurrentCap => "current-cap",
            Self::Offer => "offer",
            Self::CampaignType => "campaign-type",
        }
    }

    /// Parse a field key. Accepts the kebab key or the default label, in any case.
    pub fn from_key(s: &str) -> Option<Self> {
        let norm = normalize(s);
        Self::ALL.into_iter().find(|f| {
            f.key() == norm || normalize(f.default_label()) == norm || f.key().replace('-', "_") == norm
        })
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_label())
    }
}

/// A column found for a target name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub name: String,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Find the first column whose trimmed, lower-cased name equals the trimmed, lower-cased
/// target. `None` means the sheet has no such column.
pub fn resolve<S: AsRef<str>>(columns: &[S], target: &str) -> Option<ResolvedColumn> {
    let target = normalize(target);
    columns
        .iter()
        .position(|c| normalize(c.as_ref()) == target)
        .map(|index| ResolvedColumn {
            index,
            name: columns[index].as_ref().to_string(),
        })
}

/// Header labels for each logical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    labels: [String; 5],
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            labels: LogicalField::ALL.map(|f| f.default_label().to_string()),
        }
    }
}

impl FieldMap {
    fn slot(field: LogicalField) -> usize {
        match field {
            LogicalField::Region => 0,
            LogicalField::AgencyAccess => 1,
            LogicalField::CurrentCap => 2,
            LogicalField::Offer => 3,
            LogicalField::CampaignType => 4,
        }
    }

    pub fn with_label(mut self, field: LogicalField, label: impl Into<String>) -> Self {
        self.labels[Self::slot(field)] = label.into();
        self
    }

    pub fn label(&self, field: LogicalField) -> &str {
        &self.labels[Self::slot(field)]
    }

    pub fn resolve(&self, dataset: &Dataset, field: LogicalField) -> Option<ResolvedColumn> {
        resolve(dataset.columns(), self.label(field))
    }

    /// Resolve every field once; reuse the result for all passes over the same sheet.
    pub fn resolve_all(&self, dataset: &Dataset) -> ResolvedFields {
        ResolvedFields {
            columns: LogicalField::ALL.map(|f| self.resolve(dataset, f)),
        }
    }
}

/// Outcome of resolving every logical field against one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    columns: [Option<ResolvedColumn>; 5],
}

impl ResolvedFields {
    pub fn get(&self, field: LogicalField) -> Option<&ResolvedColumn> {
        self.columns[FieldMap::slot(field)].as_ref()
    }

    pub fn missing(&self) -> Vec<LogicalField> {
        LogicalField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}
