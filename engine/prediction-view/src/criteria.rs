//! Filter and sort selections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// User-selected row constraints. `None` on any field means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Exact position code match
    pub position: Option<String>,

    /// Exact age match
    pub age: Option<i32>,

    /// Case-insensitive player name substring
    pub name: Option<String>,
}

impl FilterCriteria {
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.set_position(Some(position.into()));
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(Some(name.into()));
        self
    }

    /// Set the position filter; an empty code clears it
    pub fn set_position(&mut self, position: Option<String>) {
        self.position = position.filter(|p| !p.is_empty());
    }

    pub fn set_age(&mut self, age: Option<i32>) {
        self.age = age;
    }

    /// Set the name query; an empty query clears it. Whitespace is matched
    /// like any other text.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.filter(|n| !n.is_empty());
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.age.is_none() && self.name.is_none()
    }
}

/// Sortable table columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Player,
    Season,
    Age,
    Pos,
    #[serde(rename = "STL")]
    Stl,
    #[serde(rename = "BLK")]
    Blk,
    #[serde(rename = "TRB")]
    Trb,
    #[serde(rename = "AST")]
    Ast,
    #[serde(rename = "PTS")]
    Pts,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Player,
        SortField::Season,
        SortField::Age,
        SortField::Pos,
        SortField::Stl,
        SortField::Blk,
        SortField::Trb,
        SortField::Ast,
        SortField::Pts,
    ];

    /// Column header text
    pub fn label(self) -> &'static str {
        match self {
            SortField::Player => "Player",
            SortField::Season => "Season",
            SortField::Age => "Age",
            SortField::Pos => "Pos",
            SortField::Stl => "STL",
            SortField::Blk => "BLK",
            SortField::Trb => "TRB",
            SortField::Ast => "AST",
            SortField::Pts => "PTS",
        }
    }

    /// Whether values in this column compare as text rather than numbers
    pub fn is_textual(self) -> bool {
        matches!(self, SortField::Player | SortField::Pos)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown column '{0}' (expected one of Player, Season, Age, Pos, STL, BLK, TRB, AST, PTS)")]
pub struct ParseSortFieldError(pub String);

impl FromStr for SortField {
    type Err = ParseSortFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortField::ALL
            .into_iter()
            .find(|field| field.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseSortFieldError(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header marker
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("Unknown sort direction '{other}' (expected asc or desc)")),
        }
    }
}

/// The single active sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Header-click transition: the active ascending column flips to
    /// descending, anything else becomes the active column ascending.
    pub fn clicked(self, field: SortField) -> Self {
        if self.field == field && self.direction == SortDirection::Ascending {
            Self::descending(field)
        } else {
            Self::ascending(field)
        }
    }
}

impl Default for SortCriteria {
    fn default() -> Self {
        Self::descending(SortField::Pts)
    }
}
