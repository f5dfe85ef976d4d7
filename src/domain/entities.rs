//! Domain entities: individuals, families and their events

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::date::GedcomDate;

/// Structured personal name.
///
/// `full` is the authoritative display form; `given` and `surname` are the
/// components derived from the GEDCOM `NAME` value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub full: String,
    pub given: String,
    pub surname: String,
    pub nickname: String,
    pub prefix: String,
    pub suffix: String,
}

impl PersonName {
    /// Split a raw `NAME` value into components.
    ///
    /// The surname is delimited by a pair of slashes (`John /Smith/ Jr.`).
    /// Without a slash pair the whole value becomes the given name.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if let Some(open) = value.find('/') {
            if let Some(close_rel) = value[open + 1..].find('/') {
                let close = open + 1 + close_rel;
                let given = value[..open].trim();
                let surname = value[open + 1..close].trim();
                let suffix = value[close + 1..].trim();
                return Self {
                    full: format!("{} {}", given, surname).trim().to_string(),
                    given: given.to_string(),
                    surname: surname.to_string(),
                    suffix: suffix.to_string(),
                    ..Default::default()
                };
            }
        }
        Self {
            full: value.to_string(),
            given: value.to_string(),
            ..Default::default()
        }
    }

    /// True when the name carries any text at all.
    pub fn has_text(&self) -> bool {
        !self.full.trim().is_empty() || !self.given.trim().is_empty()
    }
}

/// Sex of an individual as recorded by the `SEX` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Sex {
    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" => Sex::Male,
            "F" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "U",
        };
        write!(f, "{}", s)
    }
}

/// Kinds of compound event substructures tracked during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Birth,
    Death,
    Marriage,
    Divorce,
}

/// A dated, placed event (birth, death, marriage, divorce).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: Option<GedcomDate>,
    pub place: Option<String>,
    pub notes: Vec<String>,
}

/// A single person record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Cross-reference id, e.g. `@I1@`
    pub id: String,
    pub name: PersonName,
    pub sex: Sex,
    pub birth: Option<Event>,
    pub death: Option<Event>,
    /// Family ids in which this individual is a child (deduplicated,
    /// document order)
    pub child_of: Vec<String>,
    /// Family ids in which this individual is a spouse
    pub spouse_in: Vec<String>,
    pub notes: Vec<String>,
    /// Unrecognized level-1 tags, kept as (tag, value)
    pub attributes: Vec<(String, String)>,
}

impl Individual {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A husband/wife/children grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Family {
    /// Cross-reference id, e.g. `@F1@`
    pub id: String,
    pub husband: Option<String>,
    pub wife: Option<String>,
    /// Child individual ids in document order, deduplicated
    pub children: Vec<String>,
    pub marriage: Option<Event>,
    pub divorce: Option<Event>,
    pub notes: Vec<String>,
    /// Unrecognized level-1 tags, kept as (tag, value)
    pub events: Vec<(String, String)>,
}

impl Family {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}
