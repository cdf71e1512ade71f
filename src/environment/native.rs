use crate::value::{error::RuntimeError, NativeFunction, Value};
use std::rc::Rc;

/// Looks up a builtin by name. Only consulted once the scope chain has no binding.
pub fn lookup_builtin(name: &str) -> Option<Value> {
    let builtin: Rc<dyn NativeFunction> = match name {
        "len" => Rc::new(NativeLen),
        _ => return None,
    };
    Some(Value::Builtin(builtin))
}

#[derive(Debug)]
pub struct NativeLen;

impl NativeFunction for NativeLen {
    fn get_name(&self) -> &'static str {
        "len"
    }

    fn call(&self, arguments: &[Value]) -> Value {
        let [argument] = arguments else {
            return RuntimeError::InvalidArgumentCount {
                actual: arguments.len(),
                expected: 1,
            }
            .into();
        };
        match argument {
            Value::String(v) => Value::Integer(v.len() as i64),
            v => Value::Error(RuntimeError::UnsupportedArgument {
                function: self.get_name(),
                kind: v.kind(),
            }),
        }
    }
}
