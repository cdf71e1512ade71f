use super::Value;

pub trait ValueFormatter {
    fn format(&self, value: &Value) -> String;
}

pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn format(&self, value: &Value) -> String {
        match value {
            Value::Integer(v) => format!("Integer({v})"),
            Value::Boolean(v) => format!("Boolean({v})"),
            Value::String(v) => format!("String({v:?})"),
            Value::Null => "Null".into(),
            Value::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Function({parameters})")
            }
            Value::Builtin(fun) => format!("Builtin({})", fun.get_name()),
            Value::Error(error) => format!("Error({:?})", error.to_string()),
        }
    }
}

/// Formats values the way the REPL echoes them.
pub struct BasicFormatter;

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }
}
