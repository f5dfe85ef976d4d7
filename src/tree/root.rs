//! Root-selection heuristics.
//!
//! The primary subject of a genealogy file is conventionally listed first
//! (the proband), so the default policy picks the first individual with any
//! name text. An opt-in scored mode ranks candidates by additive weights
//! instead.

use std::rc::Rc;

use chrono::{Datelike, Utc};
use itertools::Itertools;

use crate::domain::{Individual, Sex};

/// Preferences for [`find_root_person`]. The default (unscored) policy
/// ignores every field except `scored`.
#[derive(Debug, Clone, Default)]
pub struct RootPreferences {
    /// Enable the scored policy; the default policy never scores
    pub scored: bool,
    /// Bonus for birth years close to the present
    pub prefer_earliest: bool,
    /// Bonus per linked child- or spouse-family
    pub prefer_most_connections: bool,
    /// Bonus for candidates of this sex
    pub preferred_sex: Option<Sex>,
}

/// Pick a root individual.
///
/// Returns `None` only when `individuals` is empty. Candidates are
/// restricted to those with any name text; when none qualify, the first
/// individual is returned regardless.
pub fn find_root_person(
    individuals: &[Rc<Individual>],
    preferences: &RootPreferences,
) -> Option<Rc<Individual>> {
    if individuals.is_empty() {
        return None;
    }
    if !preferences.scored {
        return individuals
            .iter()
            .find(|i| i.name.has_text())
            .or_else(|| individuals.first())
            .cloned();
    }

    let current_year = Utc::now().year();
    individuals
        .iter()
        .filter(|i| i.name.has_text())
        .map(|i| (score(i, preferences, current_year), Rc::clone(i)))
        // Stable sort: ties keep original input order.
        .sorted_by(|a, b| b.0.cmp(&a.0))
        .map(|(_, i)| i)
        .next()
        .or_else(|| individuals.first().cloned())
}

fn score(individual: &Individual, preferences: &RootPreferences, current_year: i32) -> i64 {
    let mut score = 0;

    if individual
        .birth
        .as_ref()
        .is_some_and(|e| e.date.is_some())
    {
        score += 10;
    }

    if preferences.prefer_earliest {
        if let Some(year) = individual
            .birth
            .as_ref()
            .and_then(|e| e.date.as_ref())
            .and_then(|d| d.year())
        {
            // Recency bonus: birth years near the present score up to 10.
            let age = (current_year - year).clamp(0, 500) as i64;
            score += 10 - age / 50;
        }
    }

    if preferences.prefer_most_connections {
        score += 5 * (individual.child_of.len() + individual.spouse_in.len()) as i64;
    }

    if let Some(sex) = preferences.preferred_sex {
        if individual.sex == sex {
            score += 3;
        }
    }

    if !individual.name.given.is_empty() && !individual.name.surname.is_empty() {
        score += 5;
    }

    score
}
