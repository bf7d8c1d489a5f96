mod value;
pub use value::Value;

mod object;
pub use object::{Object, ObjData, ObjString, hash_string};

mod heap;
pub use heap::ObjHeap;

mod table;
pub use table::Table;

pub mod errors;
pub use errors::RuntimeError;

mod vm;
pub use vm::{VirtualMachine, STACK_MAX};
