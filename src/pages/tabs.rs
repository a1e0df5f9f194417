//! Tab selection

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Workout,
    Record,
    Social,
    Bookmarks,
    Plan,
    Account,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Workout,
        Tab::Record,
        Tab::Social,
        Tab::Bookmarks,
        Tab::Plan,
        Tab::Account,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Workout => "workout",
            Tab::Record => "record",
            Tab::Social => "social",
            Tab::Bookmarks => "bookmarks",
            Tab::Plan => "plan",
            Tab::Account => "account",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == label)
            .ok_or_else(|| format!("Unknown tab: {}", s.trim()))
    }
}

/// At most one tab is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabState {
    active: Option<Tab>,
}

impl TabState {
    pub fn active(&self) -> Option<Tab> {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == Some(tab)
    }

    /// Activate the tab matching `label`; an unknown label leaves none active
    pub fn select(&mut self, label: &str) -> Option<Tab> {
        self.active = label.parse().ok();
        self.active
    }
}
