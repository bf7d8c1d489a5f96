use crate::runtime::object::Object;
use crate::runtime::value::Value;


const TABLE_MAX_LOAD: f64 = 0.75;

// Every slot is in one of three states:
//   empty      key == null, value == nil
//   tombstone  key == null, value == true
//   live       key != null
// Tombstones keep probe sequences intact after deletion and count toward the
// load factor until a growth rehash discards them.
#[derive(Debug, Clone, Copy)]
struct Entry {
    key: *mut Object,
    value: Value,
}

impl Entry {
    fn vacant() -> Self {
        Entry {
            key: std::ptr::null_mut(),
            value: Value::Nil,
        }
    }

    fn is_tombstone(&self) -> bool {
        self.key.is_null() && !matches!(self.value, Value::Nil)
    }
}

/// Open-addressing hash table with linear probing, keyed by interned string
/// objects. Keys compare by pointer; only [`find_string`](Table::find_string)
/// ever looks at string contents, which is what lets the rest of the runtime
/// treat pointer identity as string equality.
#[derive(Debug)]
pub struct Table {
    count: usize,
    entries: Vec<Entry>,
}

impl Table {
    pub fn new() -> Self {
        Table {
            count: 0,
            entries: Vec::new(),
        }
    }

    /// Live entries plus tombstones; this is what the load factor is
    /// computed against.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: *mut Object) -> Option<Value> {
        if self.count == 0 {
            return None;
        }

        let entry = &self.entries[self.find_entry(key)];
        if entry.key.is_null() {
            None
        } else {
            Some(entry.value)
        }
    }

    /// Inserts or overwrites. Returns true when `key` was not present.
    pub fn set(&mut self, key: *mut Object, value: Value) -> bool {
        if self.count + 1 > self.max_load() {
            self.grow();
        }

        let index = self.find_entry(key);
        let entry = &mut self.entries[index];

        let is_new_key = entry.key.is_null();
        // a recycled tombstone is already part of the occupancy count
        if is_new_key && !entry.is_tombstone() {
            self.count += 1;
        }

        entry.key = key;
        entry.value = value;
        is_new_key
    }

    /// Replaces the entry with a tombstone. The occupancy count is left
    /// alone; the slot is still occupied as far as probing is concerned.
    pub fn delete(&mut self, key: *mut Object) -> bool {
        if self.count == 0 {
            return false;
        }

        let index = self.find_entry(key);
        let entry = &mut self.entries[index];
        if entry.key.is_null() {
            return false;
        }

        entry.key = std::ptr::null_mut();
        entry.value = Value::Bool(true);
        true
    }

    pub fn add_all(&mut self, from: &Table) {
        for entry in from.entries.iter() {
            if !entry.key.is_null() {
                self.set(entry.key, entry.value);
            }
        }
    }

    /// Content-based lookup used by interning: finds a live key whose string
    /// payload matches `string`. This is the only place the table compares
    /// bytes rather than pointers.
    pub fn find_string(&self, string: &str, hash: u32) -> Option<*mut Object> {
        if self.count == 0 {
            return None;
        }

        let mut index = hash as usize % self.entries.len();
        loop {
            let entry = &self.entries[index];

            if entry.key.is_null() {
                // a truly empty slot ends the probe sequence
                if !entry.is_tombstone() {
                    return None;
                }
            } else {
                let key = unsafe { (*entry.key).as_string() };
                if key.hash() == hash && key.as_str() == string {
                    return Some(entry.key);
                }
            }

            index = (index + 1) % self.entries.len();
        }
    }

    // Walks the probe sequence for `key`. Returns the slot holding the key,
    // or the slot an insert should claim: the first tombstone seen if any,
    // otherwise the empty slot that ended the probe. The load factor bound
    // guarantees a vacancy, so the loop terminates.
    fn find_entry(&self, key: *mut Object) -> usize {
        let hash = unsafe { (*key).as_string().hash() };
        let mut index = hash as usize % self.entries.len();
        let mut tombstone = None;

        loop {
            let entry = &self.entries[index];

            if entry.key.is_null() {
                if entry.is_tombstone() {
                    tombstone.get_or_insert(index);
                } else {
                    return tombstone.unwrap_or(index);
                }
            } else if entry.key == key {
                return index;
            }

            index = (index + 1) % self.entries.len();
        }
    }

    fn max_load(&self) -> usize {
        (self.entries.len() as f64 * TABLE_MAX_LOAD) as usize
    }

    fn grow(&mut self) {
        let capacity = if self.entries.len() < 8 {
            8
        } else {
            self.entries.len() * 2
        };

        let old = std::mem::replace(&mut self.entries, vec![Entry::vacant(); capacity]);

        // tombstones are dropped on the floor here, so the count is rebuilt
        self.count = 0;
        for entry in old {
            if entry.key.is_null() {
                continue;
            }

            let index = self.find_entry(entry.key);
            self.entries[index] = entry;
            self.count += 1;
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}
