//! The mock hub's global change log and its grouping into update batches.

use chrono::{DateTime, Utc};
use serde_json::Value;

use freshet_types::{Bookmark, Change, RemovedEvent, RemovedWindow, StreamUpdate};

/// Operation tag of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Insert,
    Update,
    Replace,
    Remove,
    RemoveWindow,
}

/// One appended change: an operation on one stream with its payload.
#[derive(Debug, Clone)]
pub(crate) struct LogEntry {
    pub resource_id: String,
    pub op: Op,
    pub events: Vec<Value>,
    pub removed: Vec<RemovedEvent>,
    pub windows: Vec<RemovedWindow>,
}

impl LogEntry {
    pub fn events(resource_id: &str, op: Op, events: Vec<Value>) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            op,
            events,
            removed: Vec::new(),
            windows: Vec::new(),
        }
    }

    pub fn removal(resource_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            op: Op::Remove,
            events: Vec::new(),
            removed: vec![RemovedEvent { timestamp }],
            windows: Vec::new(),
        }
    }

    pub fn window(resource_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            op: Op::RemoveWindow,
            events: Vec::new(),
            removed: Vec::new(),
            windows: vec![RemovedWindow { start, end }],
        }
    }
}

/// Parse a mock bookmark back into a log offset.
pub(crate) fn offset_of(bookmark: &Bookmark) -> Option<usize> {
    bookmark.as_str().strip_prefix("mock-")?.parse().ok()
}

/// Render a log offset as a mock bookmark.
pub(crate) fn bookmark_at(offset: usize) -> Bookmark {
    Bookmark::new(format!("mock-{offset}"))
}

/// Group the entries past `offset` that touch `subscribed` resources into
/// update records.
///
/// Per-resource entry order is preserved, and consecutive same-operation
/// entries on a resource merge into one record. Resource groups are emitted
/// in reverse first-touch order: the protocol makes no cross-resource
/// ordering promise, and emitting them in insertion order would let tests
/// accidentally depend on one.
pub(crate) fn group_updates<'a, I>(entries: I, subscribed: &[String]) -> Vec<StreamUpdate>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut order: Vec<String> = Vec::new();
    let mut per_resource: Vec<Vec<StreamUpdate>> = Vec::new();

    for entry in entries {
        if !subscribed.contains(&entry.resource_id) {
            continue;
        }
        let slot = match order.iter().position(|id| *id == entry.resource_id) {
            Some(i) => i,
            None => {
                order.push(entry.resource_id.clone());
                per_resource.push(Vec::new());
                order.len() - 1
            }
        };
        append_entry(&mut per_resource[slot], entry);
    }

    per_resource
        .into_iter()
        .rev()
        .flatten()
        .collect()
}

fn append_entry(records: &mut Vec<StreamUpdate>, entry: &LogEntry) {
    if let Some(last) = records.last_mut()
        && merge_into(&mut last.change, entry)
    {
        return;
    }
    records.push(StreamUpdate {
        resource_id: entry.resource_id.clone(),
        change: change_of(entry),
    });
}

/// Merge a same-operation entry into the trailing record; `false` when the
/// operation differs and a new record must start.
fn merge_into(change: &mut Change, entry: &LogEntry) -> bool {
    match (change, entry.op) {
        (Change::Insert(events), Op::Insert)
        | (Change::Update(events), Op::Update)
        | (Change::Replace(events), Op::Replace) => {
            events.extend(entry.events.iter().cloned());
            true
        }
        (Change::Remove(removed), Op::Remove) => {
            removed.extend(entry.removed.iter().copied());
            true
        }
        (Change::RemoveWindow(windows), Op::RemoveWindow) => {
            windows.extend(entry.windows.iter().copied());
            true
        }
        _ => false,
    }
}

fn change_of(entry: &LogEntry) -> Change {
    match entry.op {
        Op::Insert => Change::Insert(entry.events.clone()),
        Op::Update => Change::Update(entry.events.clone()),
        Op::Replace => Change::Replace(entry.events.clone()),
        Op::Remove => Change::Remove(entry.removed.clone()),
        Op::RemoveWindow => Change::RemoveWindow(entry.windows.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscribed(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn consecutive_same_op_entries_merge() {
        let entries = vec![
            LogEntry::events("a", Op::Insert, vec![json!(1)]),
            LogEntry::events("a", Op::Insert, vec![json!(2)]),
            LogEntry::events("a", Op::Update, vec![json!(3)]),
        ];
        let updates = group_updates(&entries, &subscribed(&["a"]));
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].change, Change::Insert(vec![json!(1), json!(2)]));
        assert_eq!(updates[1].change, Change::Update(vec![json!(3)]));
    }

    #[test]
    fn unsubscribed_resources_are_skipped() {
        let entries = vec![
            LogEntry::events("a", Op::Insert, vec![json!(1)]),
            LogEntry::events("b", Op::Insert, vec![json!(2)]),
        ];
        let updates = group_updates(&entries, &subscribed(&["a"]));
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].resource_id, "a");
    }

    #[test]
    fn groups_are_not_in_first_touch_order() {
        let entries = vec![
            LogEntry::events("a", Op::Insert, vec![json!(1)]),
            LogEntry::events("b", Op::Insert, vec![json!(2)]),
        ];
        let updates = group_updates(&entries, &subscribed(&["a", "b"]));
        let ids: Vec<&str> = updates.iter().map(|u| u.resource_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }
}
