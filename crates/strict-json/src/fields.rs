//! Per-record field maps: which external key names are valid, where
//! each one's storage slot lives, and which names are ambiguous.
//!
//! The derive macro emits a flat table of [`RawField`] entries per
//! record — one entry per directly declared field, with flattened
//! sub-records pointing at their own tables. [`FieldMap::build`] walks
//! those tables breadth-first by embedding depth and resolves every
//! external name to a [`FieldLocation`], applying two rules:
//!
//! - a name claimed at a shallower depth shadows the same name at a
//!   deeper one (a directly declared field always beats a flattened
//!   one), and
//! - two claims at the *same* depth are a conflict — the name is
//!   removed from the map entirely rather than silently picking one,
//!   and any decode of the type fails.
//!
//! Maps are built lazily, once per type, and cached for the process
//! lifetime: record shapes cannot change at runtime, so there is no
//! invalidation. The cache lock is scoped to lookup/insert only; a map
//! is never built while holding it.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::decode::StrictRecord;

/// One directly declared field of a record, as reported by
/// `#[derive(StrictDecode)]`.
///
/// Fields excluded from decoding (`#[serde(skip)]`) do not appear in
/// the table at all.
#[derive(Debug, Clone, Copy)]
pub struct RawField {
    /// The field's external key name (`#[serde(rename = "...")]`
    /// applied). For a flattened entry this is the declared Rust name,
    /// kept for diagnostics; flattened entries do not claim a key.
    pub name: &'static str,
    /// The field's position in the record's declaration, used as one
    /// step of a [`FieldLocation`] path.
    pub index: usize,
    pub kind: RawFieldKind,
}

/// How a [`RawField`] participates in key resolution.
#[derive(Debug, Clone, Copy)]
pub enum RawFieldKind {
    /// An ordinary field: its name maps to its own storage slot.
    Value,
    /// A flattened sub-record: contributes no name of its own, but its
    /// child table is walked at the next embedding depth.
    Flattened {
        /// Accessor for the child record's own field table.
        fields: fn() -> &'static [RawField],
    },
}

/// A resolved external key name and the path to its storage slot.
///
/// The path is a sequence of declaration indices starting at the record
/// root; every step but the last crosses a flattened sub-record.
/// [`StrictRecord::apply_field`] follows it, allocating intermediate
/// storage on demand when a flattened record sits behind an `Option`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLocation {
    name: &'static str,
    path: Vec<usize>,
}

impl FieldLocation {
    /// The external key name this location was resolved for.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declaration-index path from the record root to the slot.
    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.path
    }
}

/// The resolved field map of one record type.
///
/// Holds the resolvable `name -> location` mapping, every resolved name
/// in the order it was first resolved (shallow levels first — the order
/// suggestion ranking uses), and the conflict marker. A conflicted map
/// is still cached, but any decode through it fails with
/// [`Error::FieldConflict`](crate::Error::FieldConflict); the conflict
/// is discovered when the type is used, not when the map is built.
#[derive(Debug, Default)]
pub struct FieldMap {
    fields: HashMap<&'static str, FieldLocation>,
    all_names: Vec<&'static str>,
    conflict: Option<&'static str>,
}

impl FieldMap {
    /// Resolve an input key to its location, if the key is valid.
    #[must_use]
    pub fn location(&self, key: &str) -> Option<&FieldLocation> {
        self.fields.get(key)
    }

    /// Whether `key` is a valid external name for this record.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Every resolved name, in first-resolved order.
    #[must_use]
    pub fn all_names(&self) -> &[&'static str] {
        &self.all_names
    }

    /// The name that resolved ambiguously, if any.
    #[must_use]
    pub fn conflict(&self) -> Option<&'static str> {
        self.conflict
    }

    /// Build the map for the record whose root table is `root`.
    ///
    /// Breadth-first over embedding depth: level 0 is the record's own
    /// declared fields; each flattened entry queues its child table for
    /// the next level, carrying the access path forward. A table
    /// already walked at a shallower level is skipped, which both
    /// terminates structural cycles (a record flattening itself behind
    /// a `Box`) and keeps a diamond-shaped embedding from conflicting
    /// with itself.
    ///
    /// Pure function of the tables; independent of the cache.
    #[must_use]
    pub fn build(root: fn() -> &'static [RawField]) -> FieldMap {
        struct Scan {
            table: fn() -> &'static [RawField],
            path: Vec<usize>,
        }

        let mut map = FieldMap::default();
        let mut current = vec![Scan {
            table: root,
            path: Vec::new(),
        }];
        let mut visited: HashSet<*const ()> = HashSet::new();

        while !current.is_empty() {
            let mut next = Vec::new();
            // Names first claimed at this level, in resolution order.
            let mut found_this_level: Vec<&'static str> = Vec::new();

            for scan in &current {
                if !visited.insert(scan.table as *const ()) {
                    continue;
                }

                for field in (scan.table)() {
                    if let RawFieldKind::Flattened { fields } = field.kind {
                        let mut path = scan.path.clone();
                        path.push(field.index);
                        next.push(Scan {
                            table: fields,
                            path,
                        });
                        continue;
                    }

                    if found_this_level.contains(&field.name) {
                        // Same-level duplicate: never silently pick one.
                        map.fields.remove(field.name);
                        map.conflict = Some(field.name);
                        continue;
                    }
                    if map.fields.contains_key(field.name) {
                        // Claimed at a shallower level: shadowed.
                        continue;
                    }

                    let mut path = scan.path.clone();
                    path.push(field.index);
                    map.fields.insert(
                        field.name,
                        FieldLocation {
                            name: field.name,
                            path,
                        },
                    );
                    found_this_level.push(field.name);
                }
            }

            for name in found_this_level {
                // Skip names that conflicted after being claimed.
                if map.fields.contains_key(name) {
                    map.all_names.push(name);
                }
            }

            current = next;
        }

        map
    }
}

type Cache = HashMap<TypeId, Arc<FieldMap>>;

static FIELD_MAPS: OnceLock<RwLock<Cache>> = OnceLock::new();

fn cache() -> &'static RwLock<Cache> {
    FIELD_MAPS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// The cached field map for record type `R`, building it on first use.
///
/// Concurrent first use of the same type may build the map twice; the
/// builds are equivalent and the first insert wins, so callers always
/// observe a single consistent map. Nothing is held across the build
/// itself — the lock covers only lookup and insert.
pub fn field_map<R: StrictRecord>() -> Arc<FieldMap> {
    {
        let maps = cache().read().unwrap_or_else(PoisonError::into_inner);
        if let Some(map) = maps.get(&TypeId::of::<R>()) {
            return Arc::clone(map);
        }
    }

    let built = Arc::new(FieldMap::build(R::raw_fields));
    let mut maps = cache().write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(maps.entry(TypeId::of::<R>()).or_insert(built))
}

/// Drop every cached field map.
///
/// Decoding rebuilds maps on demand, so this is never required for
/// correctness; it exists so tests can exercise cold-cache behavior.
pub fn clear_cache() {
    if let Some(maps) = FIELD_MAPS.get() {
        maps.write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::StrictDecode;

    #[derive(Default, Deserialize, StrictDecode)]
    struct Inner {
        shared: String,
        inner_only: i32,
    }

    #[derive(Default, Deserialize, StrictDecode)]
    struct Shadowing {
        shared: String,
        #[serde(flatten)]
        inner: Inner,
    }

    #[derive(Default, Deserialize, StrictDecode)]
    struct OtherInner {
        shared: bool,
    }

    #[derive(Default, Deserialize, StrictDecode)]
    struct Conflicting {
        own: String,
        #[serde(flatten)]
        a: Inner,
        #[serde(flatten)]
        b: OtherInner,
    }

    #[derive(Default, Deserialize, StrictDecode)]
    struct Renamed {
        #[serde(rename = "server_url")]
        server_url_field: String,
        #[serde(skip)]
        cached: Option<String>,
    }

    // ── Resolution and shadowing ──────────────────────────────────────

    #[test]
    fn direct_field_shadows_flattened_field() {
        let map = FieldMap::build(<Shadowing as StrictRecord>::raw_fields);
        assert!(map.conflict().is_none());

        let shared = map.location("shared").unwrap();
        assert_eq!(shared.path(), &[0], "must resolve to the level-0 field");

        let inner_only = map.location("inner_only").unwrap();
        assert_eq!(inner_only.path(), &[1, 1]);
    }

    #[test]
    fn all_names_records_shallow_levels_first() {
        let map = FieldMap::build(<Shadowing as StrictRecord>::raw_fields);
        assert_eq!(map.all_names(), &["shared", "inner_only"]);
    }

    #[test]
    fn rename_replaces_declared_name_and_skip_excludes() {
        let map = FieldMap::build(<Renamed as StrictRecord>::raw_fields);
        assert!(map.contains("server_url"));
        assert!(!map.contains("server_url_field"));
        assert!(!map.contains("cached"));
        assert_eq!(map.all_names(), &["server_url"]);
    }

    // Serializes the tests that reset the process-wide cache, so the
    // pointer-identity assertion cannot see a concurrent clear.
    static CACHE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn cache_guard() -> std::sync::MutexGuard<'static, ()> {
        CACHE_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Conflicts ─────────────────────────────────────────────────────

    #[test]
    fn same_level_duplicate_is_a_conflict() {
        let map = FieldMap::build(<Conflicting as StrictRecord>::raw_fields);
        assert_eq!(map.conflict(), Some("shared"));
        assert!(
            !map.contains("shared"),
            "a conflicted name must not stay resolvable"
        );
        assert!(
            !map.all_names().contains(&"shared"),
            "a conflicted name must not be suggestible"
        );
        // Non-conflicted names still resolve.
        assert!(map.contains("own"));
        assert!(map.contains("inner_only"));
    }

    #[test]
    fn conflict_detection_is_independent_of_the_cache() {
        let _guard = cache_guard();
        clear_cache();
        let first = field_map::<Conflicting>();
        clear_cache();
        let second = field_map::<Conflicting>();
        assert_eq!(first.conflict(), second.conflict());
        assert_eq!(first.all_names(), second.all_names());
    }

    // ── Cache behavior ────────────────────────────────────────────────

    #[test]
    fn repeated_lookups_share_one_map() {
        let _guard = cache_guard();
        clear_cache();
        let first = field_map::<Shadowing>();
        let second = field_map::<Shadowing>();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_first_use_converges() {
        let _guard = cache_guard();
        clear_cache();
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(field_map::<Shadowing>))
            .collect();
        let maps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for map in &maps {
            assert_eq!(map.all_names(), maps[0].all_names());
        }
    }
}
