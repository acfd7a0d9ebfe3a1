use std::collections::HashMap;

use crate::db::{TagRow, TrailTagRow};

/// Deduplicating label → id registry for seasonal-usage tags.
///
/// Ids are handed out in first-seen order starting at 0. Lookup is
/// case-insensitive; the label text of the first occurrence is what gets
/// stored. Owned by the pipeline and passed down by reference.
pub struct TagRegistry {
    index: HashMap<String, i64>,
    next_id: i64,
}

/// Rows produced by a single `register` call.
pub struct RegisterOutcome {
    /// Present only when the label had not been seen before.
    pub new_tag: Option<TagRow>,
    pub link: TrailTagRow,
}

impl TagRegistry {
    pub fn new() -> Self {
        TagRegistry {
            index: HashMap::new(),
            next_id: 0,
        }
    }

    /// Resolve `label` to a tag id, allocating the next sequential id if the
    /// label is unseen. Every call yields exactly one trail↔tag link.
    pub fn register(&mut self, label: &str, trail_id: i64) -> RegisterOutcome {
        let mut new_tag = None;
        let tag_id = match self.index.get(&label.to_lowercase()) {
            Some(&id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.index.insert(label.to_lowercase(), id);
                new_tag = Some(TagRow {
                    id,
                    label: label.to_string(),
                });
                id
            }
        };
        RegisterOutcome {
            new_tag,
            link: TrailTagRow { trail_id, tag_id },
        }
    }

    /// Whether two labels name the same tag under the registry's identity
    /// rule (case-insensitive).
    pub fn same_label(a: &str, b: &str) -> bool {
        a.to_lowercase() == b.to_lowercase()
    }
}

// ── Tests ──
