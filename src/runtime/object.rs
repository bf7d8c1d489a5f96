use std::fmt;


/// A heap-resident value. Every live object is linked into the owning
/// [`ObjHeap`](crate::runtime::ObjHeap)'s list through `next`; teardown walks
/// that list, so nothing else may free one.
#[derive(Debug)]
pub struct Object {
    pub(super) next: *mut Object,
    data: ObjData,
}

/// The payload variants. Strings are the only kind so far; `print` and
/// teardown dispatch by matching on this, no virtual calls involved.
#[derive(Debug)]
pub enum ObjData {
    String(ObjString),
}

impl Object {
    pub(super) fn new(data: ObjData) -> Self {
        Object {
            next: std::ptr::null_mut(),
            data,
        }
    }

    pub fn as_string(&self) -> &ObjString {
        match &self.data {
            ObjData::String(string) => string,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            ObjData::String(string) => fmt.write_str(string.as_str()),
        }
    }
}


/// An immutable string with its hash computed once at construction.
/// At most one `ObjString` exists per distinct byte sequence; the heap's
/// intern table is the authority for that.
#[derive(Debug)]
pub struct ObjString {
    hash: u32,
    data: Box<str>,
}

impl ObjString {
    pub(super) fn new(data: String, hash: u32) -> Self {
        ObjString {
            hash,
            data: data.into_boxed_str(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }
}


/// FNV-1a, 32 bits.
pub fn hash_string(string: &str) -> u32 {
    let mut hash: u32 = 0x811c9dc5;
    for byte in string.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x01000193);
    }
    hash
}
