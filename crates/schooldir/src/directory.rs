//! Directory view: in-memory search and filtering over the fetched schools.
//!
//! The full collection is fetched once. The visible set is the intersection of
//! three predicates (free text, city, state) and is recomputed synchronously
//! whenever a predicate or the collection changes. City and state options are
//! always derived from the full collection, so narrowing by one never shrinks
//! the options of the other.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::school::SchoolRecord;

/// Value of a dropdown that selects every option.
pub const ALL: &str = "all";

/// Image shown for schools without an uploaded one.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300&query=school building";

/// An equality filter: everything, or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// `"all"` selects everything; any other value selects exactly that value.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

/// The three independent predicates of the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring of name, city or state. Empty matches all.
    pub search: String,
    pub city: Selection,
    pub state: Selection,
}

impl DirectoryFilter {
    pub fn matches(&self, record: &SchoolRecord) -> bool {
        self.matches_search(record) && self.city.matches(&record.city) && self.state.matches(&record.state)
    }

    fn matches_search(&self, record: &SchoolRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [&record.name, &record.city, &record.state]
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Records passing every predicate, in their original order.
pub fn filter<'a>(records: &'a [SchoolRecord], predicates: &DirectoryFilter) -> Vec<&'a SchoolRecord> {
    filter_indices(records, predicates)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// Positions of the records passing every predicate, ascending.
pub fn filter_indices(records: &[SchoolRecord], predicates: &DirectoryFilter) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| predicates.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Dropdown options: distinct values in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub states: Vec<String>,
}

pub fn filter_options(records: &[SchoolRecord]) -> FilterOptions {
    FilterOptions {
        cities: distinct(records.iter().map(|r| r.city.as_str())),
        states: distinct(records.iter().map(|r| r.state.as_str())),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode '{}' (expected grid or list)", other)),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => f.write_str("grid"),
            ViewMode::List => f.write_str("list"),
        }
    }
}

/// State of the directory page: the full collection, the predicates, the
/// display mode and the derived visible set.
#[derive(Debug, Clone, Default)]
pub struct DirectoryView {
    schools: Vec<SchoolRecord>,
    filter: DirectoryFilter,
    mode: ViewMode,
    options: FilterOptions,
    visible: Vec<usize>,
}

impl DirectoryView {
    pub fn new(schools: Vec<SchoolRecord>) -> Self {
        let mut view = Self {
            schools,
            ..Default::default()
        };
        view.refresh_options();
        view.recompute();
        view
    }

    pub fn set_schools(&mut self, schools: Vec<SchoolRecord>) {
        self.schools = schools;
        self.refresh_options();
        self.recompute();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.recompute();
    }

    pub fn select_city(&mut self, city: Selection) {
        self.filter.city = city;
        self.recompute();
    }

    pub fn select_state(&mut self, state: Selection) {
        self.filter.state = state;
        self.recompute();
    }

    /// Changes only the presentation; the visible set is untouched.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn total(&self) -> usize {
        self.schools.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = &SchoolRecord> + '_ {
        self.visible.iter().map(move |&i| &self.schools[i])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {} schools", self.visible_count(), self.total())
    }

    /// Renders the visible set in the current mode.
    pub fn render(&self) -> String {
        let mut out = self.summary();
        out.push('\n');

        if self.visible.is_empty() {
            out.push_str("No schools found\n");
            return out;
        }

        for school in self.visible() {
            out.push('\n');
            match self.mode {
                ViewMode::Grid => out.push_str(&render_card(school)),
                ViewMode::List => out.push_str(&render_row(school)),
            }
        }
        out
    }

    fn refresh_options(&mut self) {
        self.options = filter_options(&self.schools);
    }

    fn recompute(&mut self) {
        self.visible = filter_indices(&self.schools, &self.filter);
    }
}

fn image_of(school: &SchoolRecord) -> &str {
    school.image_path.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
}

/// Grid card: a multi-line block per school.
pub fn render_card(school: &SchoolRecord) -> String {
    format!(
        "[{city}] {name}\n  image: {image}\n  {address}, {city}, {state} - {pincode}\n  phone: {phone}\n  email: {email}\n",
        city = school.city,
        name = school.name,
        image = image_of(school),
        address = school.address,
        state = school.state,
        pincode = school.pincode,
        phone = school.phone,
        email = school.email,
    )
}

/// List row: one line per school.
pub fn render_row(school: &SchoolRecord) -> String {
    format!(
        "{} | {}, {} {} | {} | {} | {}\n",
        school.name,
        school.city,
        school.state,
        school.pincode,
        school.phone,
        school.email,
        image_of(school),
    )
}
