//! Streaming GEDCOM record parser.
//!
//! GEDCOM encodes nesting as a level number at the start of each line
//! (`LEVEL [@XREF@] TAG [VALUE]`). The parser walks lines in order,
//! maintaining the top-level record under construction plus a stack of open
//! event substructures, and resolves cross-references between individuals
//! and families in a post-pass.
//!
//! Malformed content never aborts a parse: bad lines are dropped with a
//! warning and dangling references degrade to "not found".

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::{Event, EventKind, Family, GedcomDate, Individual, PersonName, Sex};

/// Counts reported alongside a parse outcome. Observational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub individuals: usize,
    pub families: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Envelope returned by [`RecordParser::parse`].
///
/// `success` is false only for catastrophic failures (no records could be
/// recovered at all); callers are expected to branch on it before using the
/// record vectors.
#[derive(Debug)]
pub struct ParseOutcome {
    pub success: bool,
    /// Individuals in document order
    pub individuals: Vec<Individual>,
    /// Families in document order
    pub families: Vec<Family>,
    pub stats: ParseStats,
    /// Top-level error for catastrophic failures
    pub error: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// One open event substructure, e.g. `BIRT` at level 1. The stack is
/// truncated whenever a line at the same or a shallower level arrives, so
/// its length always equals the current nesting depth.
#[derive(Debug, Clone, Copy)]
struct ContextMarker {
    kind: EventKind,
    level: u32,
}

/// A physical line matched against the GEDCOM grammar.
#[derive(Debug)]
struct GedcomLine<'a> {
    level: u32,
    xref: Option<&'a str>,
    tag: &'a str,
    value: &'a str,
}

/// Top-level record currently under construction.
enum CurrentRecord {
    Individual(Individual),
    Family(Family),
}

/// Converts raw GEDCOM text into individual and family records with all
/// cross-references resolved and bidirectionally linked.
pub struct RecordParser {
    line_regex: Regex,
    xref_regex: Regex,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    pub fn new() -> Self {
        Self {
            line_regex: Regex::new(r"^\s*(\d+)\s+(?:(@[^@\s]+@)\s+)?([A-Z0-9_]+)(?:\s+(.*))?$")
                .unwrap(),
            xref_regex: Regex::new(r"@[^@\s]+@").unwrap(),
        }
    }

    /// Parse GEDCOM text into records.
    ///
    /// Never panics on malformed content; problems accumulate as warnings.
    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut individuals: Vec<Individual> = Vec::new();
        let mut families: Vec<Family> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        let mut current: Option<CurrentRecord> = None;
        let mut context: Vec<ContextMarker> = Vec::new();

        for (idx, raw_line) in normalized.lines().enumerate() {
            if raw_line.trim().is_empty() {
                continue;
            }
            let line = match self.match_line(raw_line) {
                Some(line) => line,
                None => {
                    warnings.push(format!(
                        "line {}: does not match GEDCOM grammar: {}",
                        idx + 1,
                        raw_line.trim()
                    ));
                    continue;
                }
            };

            // Entering a sibling substructure at the same or a shallower
            // level closes all deeper markers.
            while context.last().is_some_and(|m| m.level >= line.level) {
                context.pop();
            }

            if line.level == 0 {
                flush(&mut current, &mut individuals, &mut families, &mut warnings);
                current = open_record(&line, &mut warnings);
                continue;
            }

            match current.as_mut() {
                Some(CurrentRecord::Individual(indi)) => {
                    self.dispatch_individual(indi, &line, &mut context)
                }
                Some(CurrentRecord::Family(fam)) => self.dispatch_family(fam, &line, &mut context),
                // Sub-lines of an unrecognized top-level record are ignored.
                None => {}
            }
        }
        flush(&mut current, &mut individuals, &mut families, &mut warnings);

        link_relationships(&individuals, &mut families, &mut warnings);

        let success = !(individuals.is_empty() && families.is_empty());
        let error = if success {
            None
        } else {
            let msg = "no GEDCOM records found in input".to_string();
            errors.push(msg.clone());
            Some(msg)
        };

        let stats = ParseStats {
            individuals: individuals.len(),
            families: families.len(),
            errors: errors.len(),
            warnings: warnings.len(),
        };
        debug!(?stats, "parse finished");

        ParseOutcome {
            success,
            individuals,
            families,
            stats,
            error,
            errors,
            warnings,
        }
    }

    fn match_line<'a>(&self, raw: &'a str) -> Option<GedcomLine<'a>> {
        let caps = self.line_regex.captures(raw)?;
        let level: u32 = caps.get(1)?.as_str().parse().ok()?;
        Some(GedcomLine {
            level,
            xref: caps.get(2).map(|m| m.as_str()),
            tag: caps.get(3).map(|m| m.as_str())?,
            value: caps.get(4).map(|m| m.as_str().trim_end()).unwrap_or(""),
        })
    }

    fn dispatch_individual(
        &self,
        indi: &mut Individual,
        line: &GedcomLine,
        context: &mut Vec<ContextMarker>,
    ) {
        match line.tag {
            "NAME" => indi.name = PersonName::parse(line.value),
            "SEX" => indi.sex = Sex::from_value(line.value),
            "BIRT" => {
                indi.birth.get_or_insert_with(Event::default);
                context.push(ContextMarker {
                    kind: EventKind::Birth,
                    level: line.level,
                });
            }
            "DEAT" => {
                indi.death.get_or_insert_with(Event::default);
                context.push(ContextMarker {
                    kind: EventKind::Death,
                    level: line.level,
                });
            }
            "DATE" | "PLAC" => {
                // Birth checked first when both markers would be present.
                let event = if has_marker(context, EventKind::Birth) {
                    indi.birth.as_mut()
                } else if has_marker(context, EventKind::Death) {
                    indi.death.as_mut()
                } else {
                    None
                };
                if let Some(event) = event {
                    apply_event_field(event, line.tag, line.value);
                }
            }
            "FAMC" => {
                if let Some(id) = self.resolve_reference(line) {
                    if !indi.child_of.contains(&id) {
                        indi.child_of.push(id);
                    }
                }
            }
            "FAMS" => {
                if let Some(id) = self.resolve_reference(line) {
                    if !indi.spouse_in.contains(&id) {
                        indi.spouse_in.push(id);
                    }
                }
            }
            "NOTE" => indi.notes.push(line.value.to_string()),
            _ if line.level == 1 => indi
                .attributes
                .push((line.tag.to_string(), line.value.to_string())),
            _ => {}
        }
    }

    fn dispatch_family(
        &self,
        fam: &mut Family,
        line: &GedcomLine,
        context: &mut Vec<ContextMarker>,
    ) {
        match line.tag {
            // First occurrence wins; later duplicates do not overwrite.
            "HUSB" => {
                if fam.husband.is_none() {
                    fam.husband = self.resolve_reference(line);
                }
            }
            "WIFE" => {
                if fam.wife.is_none() {
                    fam.wife = self.resolve_reference(line);
                }
            }
            "CHIL" => {
                if let Some(id) = self.resolve_reference(line) {
                    if !fam.children.contains(&id) {
                        fam.children.push(id);
                    }
                }
            }
            "MARR" => {
                fam.marriage.get_or_insert_with(Event::default);
                context.push(ContextMarker {
                    kind: EventKind::Marriage,
                    level: line.level,
                });
            }
            "DIV" => {
                fam.divorce.get_or_insert_with(Event::default);
                context.push(ContextMarker {
                    kind: EventKind::Divorce,
                    level: line.level,
                });
            }
            "DATE" | "PLAC" => {
                let event = if has_marker(context, EventKind::Marriage) {
                    fam.marriage.as_mut()
                } else if has_marker(context, EventKind::Divorce) {
                    fam.divorce.as_mut()
                } else {
                    None
                };
                if let Some(event) = event {
                    apply_event_field(event, line.tag, line.value);
                }
            }
            "NOTE" => fam.notes.push(line.value.to_string()),
            _ if line.level == 1 => fam
                .events
                .push((line.tag.to_string(), line.value.to_string())),
            _ => {}
        }
    }

    /// Resolve a cross-reference id: prefer the grammar's xref capture,
    /// otherwise scan the value for an `@...@` token. A line with neither
    /// is dropped silently.
    fn resolve_reference(&self, line: &GedcomLine) -> Option<String> {
        if let Some(xref) = line.xref {
            return Some(xref.to_string());
        }
        self.xref_regex
            .find(line.value)
            .map(|m| m.as_str().to_string())
    }
}

fn has_marker(context: &[ContextMarker], kind: EventKind) -> bool {
    context.iter().any(|m| m.kind == kind)
}

fn apply_event_field(event: &mut Event, tag: &str, value: &str) {
    match tag {
        "DATE" => event.date = Some(GedcomDate::parse(value)),
        "PLAC" => event.place = Some(value.to_string()),
        _ => {}
    }
}

/// Open a new top-level record. Any level-0 tag other than `INDI`/`FAM`
/// clears the current record so its sub-lines are ignored.
fn open_record(line: &GedcomLine, warnings: &mut Vec<String>) -> Option<CurrentRecord> {
    match (line.tag, line.xref) {
        ("INDI", Some(xref)) => Some(CurrentRecord::Individual(Individual::new(xref))),
        ("FAM", Some(xref)) => Some(CurrentRecord::Family(Family::new(xref))),
        ("INDI" | "FAM", None) => {
            warnings.push(format!(
                "{} record without cross-reference id ignored",
                line.tag
            ));
            None
        }
        _ => None,
    }
}

/// Move the finished record into its output vector. A duplicate id replaces
/// the earlier record, with a warning.
fn flush(
    current: &mut Option<CurrentRecord>,
    individuals: &mut Vec<Individual>,
    families: &mut Vec<Family>,
    warnings: &mut Vec<String>,
) {
    match current.take() {
        Some(CurrentRecord::Individual(indi)) => {
            if let Some(pos) = individuals.iter().position(|i| i.id == indi.id) {
                warnings.push(format!("duplicate individual id {}, replacing", indi.id));
                individuals[pos] = indi;
            } else {
                individuals.push(indi);
            }
        }
        Some(CurrentRecord::Family(fam)) => {
            if let Some(pos) = families.iter().position(|f| f.id == fam.id) {
                warnings.push(format!("duplicate family id {}, replacing", fam.id));
                families[pos] = fam;
            } else {
                families.push(fam);
            }
        }
        None => {}
    }
}

/// Post-pass: repair missing reciprocal links.
///
/// For each individual, make sure every child-family lists it among its
/// children, and fill an empty husband/wife slot matching the individual's
/// sex. Idempotent; processed in document order, so the first-processed
/// individual wins a contested empty slot. References to unknown families
/// are recorded as warnings.
fn link_relationships(
    individuals: &[Individual],
    families: &mut [Family],
    warnings: &mut Vec<String>,
) {
    let index: HashMap<String, usize> = families
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id.clone(), i))
        .collect();

    for indi in individuals {
        for fam_id in &indi.child_of {
            match index.get(fam_id) {
                Some(&i) => {
                    let fam = &mut families[i];
                    if !fam.children.contains(&indi.id) {
                        fam.children.push(indi.id.clone());
                    }
                }
                None => warnings.push(format!(
                    "individual {} references unknown family {}",
                    indi.id, fam_id
                )),
            }
        }
        for fam_id in &indi.spouse_in {
            match index.get(fam_id) {
                Some(&i) => {
                    let fam = &mut families[i];
                    match indi.sex {
                        Sex::Male => {
                            if fam.husband.is_none() {
                                fam.husband = Some(indi.id.clone());
                            }
                        }
                        Sex::Female => {
                            if fam.wife.is_none() {
                                fam.wife = Some(indi.id.clone());
                            }
                        }
                        Sex::Unknown => {}
                    }
                }
                None => warnings.push(format!(
                    "individual {} references unknown family {}",
                    indi.id, fam_id
                )),
            }
        }
    }
}
