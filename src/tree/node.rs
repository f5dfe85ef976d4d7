//! Tree node shape handed to renderers.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::domain::{Event, Family, Individual, PersonName, Sex};

/// Edge label of a node relative to its parent in the built tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Root,
    Father,
    Mother,
    Child,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Root => "root",
            Relation::Father => "father",
            Relation::Mother => "mother",
            Relation::Child => "child",
        };
        write!(f, "{}", s)
    }
}

/// Spouse summary derived per spouse-family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpouseSummary {
    pub id: String,
    pub display_name: String,
    pub marriage_date: Option<String>,
    pub marriage_place: Option<String>,
}

/// One node of a built tree.
///
/// Nodes exclusively own their subtree and are rebuilt fresh on every build
/// call. `individual` is a non-owning back-reference to the full source
/// record for detail lookups; it is never mutated through the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: String,
    /// Depth from the root of this specific build; 0 at the root
    pub generation: i32,
    pub relation: Relation,
    pub name: PersonName,
    pub sex: Sex,
    pub birth: Option<Event>,
    pub death: Option<Event>,
    /// True iff no death event is present at all. A death event with an
    /// unparseable date still counts as not alive.
    pub is_alive: bool,
    /// Formatted life-dates string, e.g. `(1950 – 2001)`
    pub dates: String,
    pub display_name: String,
    pub spouses: Vec<SpouseSummary>,
    /// Back-reference to the source record (read-only association)
    pub individual: Rc<Individual>,
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub(crate) fn from_individual(
        individual: &Rc<Individual>,
        generation: i32,
        relation: Relation,
        spouses: Vec<SpouseSummary>,
    ) -> Self {
        Self {
            id: individual.id.clone(),
            generation,
            relation,
            name: individual.name.clone(),
            sex: individual.sex,
            birth: individual.birth.clone(),
            death: individual.death.clone(),
            is_alive: individual.death.is_none(),
            dates: format_life_dates(individual.birth.as_ref(), individual.death.as_ref()),
            display_name: display_name(&individual.name),
            spouses,
            individual: Rc::clone(individual),
            children: None,
        }
    }
}

/// Given + surname when both are present, else the full name, else
/// `"Unknown"`.
pub fn display_name(name: &PersonName) -> String {
    if !name.given.is_empty() && !name.surname.is_empty() {
        format!("{} {}", name.given, name.surname)
    } else if !name.full.is_empty() {
        name.full.clone()
    } else {
        "Unknown".to_string()
    }
}

/// Format a life-dates string from birth and death events.
///
/// `(birth – death)` when both are known, `(b. birth)` when only birth is
/// known, empty when neither is. `?` stands in for an event that exists but
/// carries no displayable date while the partner side is known.
pub fn format_life_dates(birth: Option<&Event>, death: Option<&Event>) -> String {
    let birth_display = birth
        .and_then(|e| e.date.as_ref())
        .map(|d| d.display.clone())
        .filter(|s| !s.is_empty());
    let death_display = death
        .and_then(|e| e.date.as_ref())
        .map(|d| d.display.clone())
        .filter(|s| !s.is_empty());

    match (birth_display, death_display) {
        (Some(b), Some(d)) => format!("({} – {})", b, d),
        (Some(b), None) if death.is_some() => format!("({} – ?)", b),
        (Some(b), None) => format!("(b. {})", b),
        (None, Some(d)) => format!("(? – {})", d),
        (None, None) => String::new(),
    }
}

/// Summarize the partners of every spouse-family of `individual`.
/// Families or partners missing from the mappings are skipped.
pub(crate) fn spouse_summaries<'a>(
    individual: &Individual,
    family_of: impl Fn(&str) -> Option<&'a Rc<Family>>,
    individual_of: impl Fn(&str) -> Option<&'a Rc<Individual>>,
) -> Vec<SpouseSummary> {
    let mut spouses = Vec::new();
    for fam_id in &individual.spouse_in {
        let Some(fam) = family_of(fam_id) else {
            continue;
        };
        let partner_id = if fam.husband.as_deref() == Some(individual.id.as_str()) {
            fam.wife.as_deref()
        } else {
            fam.husband.as_deref()
        };
        let Some(partner) = partner_id.and_then(|id| individual_of(id)) else {
            continue;
        };
        spouses.push(SpouseSummary {
            id: partner.id.clone(),
            display_name: display_name(&partner.name),
            marriage_date: fam
                .marriage
                .as_ref()
                .and_then(|e| e.date.as_ref())
                .map(|d| d.display.clone()),
            marriage_place: fam.marriage.as_ref().and_then(|e| e.place.clone()),
        });
    }
    spouses
}
