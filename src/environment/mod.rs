mod native;

use crate::value::Value;
use compact_str::CompactString;
pub use native::lookup_builtin;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Shared handle to one scope of bindings.
///
/// Cloning the handle shares the scope, which is how closures keep their defining
/// scope alive after it has been exited.
#[derive(Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvironmentImpl>>,
}

struct EnvironmentImpl {
    values: HashMap<CompactString, Value>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: None,
            })),
        }
    }

    pub fn new_enclosed(outer: &Environment) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: Some(outer.clone()),
            })),
        }
    }

    /// Resolves a name, innermost scope first.
    pub fn get(&self, name: &str) -> Option<Value> {
        let inner = self.inner.borrow();
        match inner.values.get(name) {
            Some(value) => Some(value.clone()),
            None => inner.parent.as_ref().and_then(|parent| parent.get(name)),
        }
    }

    /// Binds a name in this scope only, shadowing any outer binding.
    pub fn set(&self, name: &str, value: Value) {
        let mut inner = self.inner.borrow_mut();
        inner.values.insert(name.into(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        let mut names = inner.values.keys().map(|k| k.as_str()).collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("parent", &inner.parent)
            .finish()
    }
}
