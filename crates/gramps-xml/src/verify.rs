//! Completeness verifier.
//!
//! Walks a decoded tree and reports every place where content landed in a
//! catch-all instead of a named field. A path is the dot-joined chain of
//! element names from the root to the unbound entry:
//!
//! | Entry | Path |
//! |-------|------|
//! | `<custom_field>` under a person | `database.people.person.custom_field` |
//! | `weight="3"` on a tag | `database.tags.tag.@weight` |
//! | stray text in an event | `database.events.event.#text` |
//! | `<junk>` directly inside `<events>` | `database.events.junk` |
//!
//! Namespace declarations are never reported. Subtrees two levels below the
//! root are audited in parallel and merged into one sorted set.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{GrampsError, Result};
use crate::schema::Database;
use crate::xml::utils::is_namespace_declaration;
use crate::xml::{CatchAll, Node};

/// Returns the sorted violation paths of a database. Empty means fully bound.
pub fn verify(database: &Database) -> Vec<String> {
    verify_node(Database::TAG, database)
}

/// Returns the sorted violation paths of any node, rooted at `tag`.
pub fn verify_node(tag: &str, root: &dyn Node) -> Vec<String> {
    let mut found = BTreeSet::new();
    report(tag, root.catch_all(), &mut found);

    let mut subtrees: Vec<(String, &dyn Node)> = Vec::new();
    root.visit_children(&mut |child_tag, child| {
        let path = format!("{tag}.{child_tag}");
        report(&path, child.catch_all(), &mut found);
        child.visit_children(&mut |grandchild_tag, grandchild| {
            subtrees.push((format!("{path}.{grandchild_tag}"), grandchild));
        });
    });
    debug!(subtrees = subtrees.len(), "Auditing subtrees");

    let nested = subtrees
        .par_iter()
        .map(|(path, node)| {
            let mut found = BTreeSet::new();
            walk(path, *node, &mut found);
            found
        })
        .reduce(BTreeSet::new, |mut left, right| {
            left.extend(right);
            left
        });
    found.extend(nested);
    found.into_iter().collect()
}

/// Fails with [`GrampsError::SchemaCoverage`] listing every violation path.
pub fn ensure_fully_parsed(database: &Database) -> Result<()> {
    let paths = verify(database);
    if paths.is_empty() {
        return Ok(());
    }
    warn!(count = paths.len(), first = %paths[0], "Document has unparsed content");
    Err(GrampsError::SchemaCoverage { paths })
}

fn walk(path: &str, node: &dyn Node, found: &mut BTreeSet<String>) {
    report(path, node.catch_all(), found);
    node.visit_children(&mut |tag, child| {
        walk(&format!("{path}.{tag}"), child, found);
    });
}

fn report(path: &str, unparsed: &CatchAll, found: &mut BTreeSet<String>) {
    for attr in &unparsed.attributes {
        if is_namespace_declaration(&attr.name) {
            continue;
        }
        found.insert(entry_path(path, attr.group.as_deref(), &format!("@{}", attr.name)));
    }
    for element in &unparsed.elements {
        found.insert(entry_path(path, element.group.as_deref(), &element.name));
    }
}

fn entry_path(path: &str, group: Option<&str>, name: &str) -> String {
    match group {
        Some(group) => format!("{path}.{group}.{name}"),
        None => format!("{path}.{name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EntityMeta, Event, Link, Name, People, Person};
    use crate::xml::{RawAttribute, RawElement};

    fn person_with(unparsed: CatchAll) -> Person {
        Person {
            meta: EntityMeta {
                handle: "_p1".to_string(),
                ..Default::default()
            },
            unparsed,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_tree_has_no_violations() {
        let database = Database {
            people: Some(People {
                persons: vec![person_with(CatchAll::default())],
                ..Default::default()
            }),
            events: vec![Event::default()],
            ..Default::default()
        };
        assert!(verify(&database).is_empty());
        assert!(ensure_fully_parsed(&database).is_ok());
    }

    #[test]
    fn test_paths_use_element_names() {
        let mut name = Name::default();
        name.unparsed.elements.push(RawElement::new("nickname", "<nickname/>"));
        let mut event = Event::default();
        event.note_refs.push(Link::default());
        event.note_refs[0]
            .unparsed
            .attributes
            .push(RawAttribute::new("weight", "3"));

        let mut person = person_with(CatchAll::default());
        person.names.push(name);
        let mut database = Database {
            people: Some(People {
                persons: vec![person],
                ..Default::default()
            }),
            events: vec![event],
            ..Default::default()
        };
        database
            .unparsed
            .elements
            .push(RawElement::new("junk", "<junk/>").within("events"));
        database
            .unparsed
            .attributes
            .push(RawAttribute::new("xmlns:ext", "urn:ext"));

        assert_eq!(
            verify(&database),
            vec![
                "database.events.event.noteref.@weight",
                "database.events.junk",
                "database.people.person.name.nickname",
            ]
        );
    }

    #[test]
    fn test_sibling_entries_collapse_to_one_path() {
        let mut unparsed = CatchAll::default();
        unparsed.elements.push(RawElement::new("custom_field", "<custom_field/>"));
        let database = Database {
            people: Some(People {
                persons: vec![person_with(unparsed.clone()), person_with(unparsed)],
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = ensure_fully_parsed(&database).unwrap_err();
        assert_eq!(err.violations(), ["database.people.person.custom_field"]);
    }

    #[test]
    fn test_embedded_dates_are_inlined() {
        let mut event = Event::default();
        let mut value = crate::schema::DateVal::default();
        value.unparsed.attributes.push(RawAttribute::new("era", "AD"));
        event.date.value = Some(crate::schema::Date::Value(value));
        let database = Database {
            events: vec![event],
            ..Default::default()
        };
        assert_eq!(verify(&database), vec!["database.events.event.dateval.@era"]);
    }
}
