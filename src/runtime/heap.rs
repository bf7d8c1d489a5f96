use crate::runtime::object::{hash_string, ObjData, Object, ObjString};
use crate::runtime::table::Table;
use crate::runtime::value::Value;


/// Owner of every heap object. Allocation pushes onto an intrusive list;
/// dropping the heap walks the list and frees each node, so raw `Object`
/// pointers handed out from here stay valid for the heap's whole lifetime
/// and must not outlive it.
///
/// The intern table holds the canonical `ObjString` for every distinct byte
/// sequence. Both the compiler (string constants) and the VM (concatenation
/// results) allocate through this type, which is what makes pointer equality
/// a correct string equality test.
#[derive(Debug)]
pub struct ObjHeap {
    head: *mut Object,
    strings: Table,
}

impl ObjHeap {
    pub fn new() -> Self {
        ObjHeap {
            head: std::ptr::null_mut(),
            strings: Table::new(),
        }
    }

    /// Interns a copy of `string`, returning the canonical object for its
    /// contents.
    pub fn copy_string(&mut self, string: &str) -> *mut Object {
        let hash = hash_string(string);
        if let Some(interned) = self.strings.find_string(string, hash) {
            return interned;
        }

        self.intern_new(String::from(string), hash)
    }

    /// Interns `string`, taking ownership of the buffer. If the contents are
    /// already interned the buffer is dropped here and the canonical object
    /// is returned instead.
    pub fn take_string(&mut self, string: String) -> *mut Object {
        let hash = hash_string(&string);
        if let Some(interned) = self.strings.find_string(&string, hash) {
            return interned;
        }

        self.intern_new(string, hash)
    }

    fn intern_new(&mut self, string: String, hash: u32) -> *mut Object {
        let object = self.allocate(ObjData::String(ObjString::new(string, hash)));
        self.strings.set(object, Value::Nil);
        object
    }

    /// Moves an object to the heap and registers it in the object list.
    fn allocate(&mut self, data: ObjData) -> *mut Object {
        let mut object = Box::new(Object::new(data));
        object.next = self.head;

        let object = Box::into_raw(object);
        self.head = object;
        object
    }

    pub fn strings(&self) -> &Table {
        &self.strings
    }
}

impl Default for ObjHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ObjHeap {
    fn drop(&mut self) {
        // the table entries are non-owning; the list owns the payloads
        let mut object = self.head;
        while !object.is_null() {
            let next = unsafe { (*object).next };
            drop(unsafe { Box::from_raw(object) });
            object = next;
        }
    }
}
