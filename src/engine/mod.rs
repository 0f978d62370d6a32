//! Offer filtering and lookup.
//!
//! Every function here is a pure function of its arguments: the raw sheet goes in by
//! reference and narrowed copies come out. Order of a pass is fixed: equality filters
//! ([`filter::apply_filters`]) then the offer-name search ([`search::apply_search`]).
//! Placards ([`summary::summarize`]) are computed on the raw sheet only, and the record
//! brief ([`brief::project`]) reads whatever view the caller is currently showing.

pub mod brief;
pub mod filter;
pub mod resolve;
pub mod search;
pub mod summary;

pub use brief::{project, RecordBrief};
pub use filter::{apply_filters, Choice, Selection};
pub use resolve::{resolve, FieldMap, LogicalField, ResolvedColumn, ResolvedFields};
pub use search::apply_search;
pub use summary::{summarize, Summary};

use crate::dataset::Dataset;

/// The filter selections and search term for one pass over a sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OfferQuery {
    pub selections: Vec<Selection>,
    pub search: String,
}

impl OfferQuery {
    /// One `All` selection per filterable field, in application order, and no search.
    pub fn unconstrained() -> Self {
        Self {
            selections: LogicalField::FILTERABLE
                .into_iter()
                .map(|f| Selection::new(f, Choice::All))
                .collect(),
            search: String::new(),
        }
    }

    /// Set the choice for `field`, appending a selection if the field has none yet.
    pub fn set(&mut self, field: LogicalField, choice: Choice) {
        match self.selections.iter_mut().find(|s| s.field == field) {
            Some(sel) => sel.choice = choice,
            None => self.selections.push(Selection::new(field, choice)),
        }
    }

    pub fn choice(&self, field: LogicalField) -> Option<&Choice> {
        self.selections
            .iter()
            .find(|s| s.field == field)
            .map(|s| &s.choice)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty() && self.selections.iter().all(|s| s.choice.is_all())
    }

    /// Filter chain, then search on its output.
    pub fn run(&self, raw: &Dataset, fields: &FieldMap, resolved: &ResolvedFields) -> Dataset {
        let narrowed = apply_filters(raw, fields, &self.selections);
        apply_search(&narrowed, resolved.get(LogicalField::Offer), &self.search)
    }
}
