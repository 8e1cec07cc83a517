use serde_json::Value;

/// Renders a value the way PHP's `var_dump` prints it.
///
/// Used when logging templates at trace level, so the output matches what
/// template authors see in the plugin's own debug dumps.
pub fn dump_value(value: &Value) -> String {
    let mut out = String::new();
    dump_into(&mut out, value, 0);
    out
}

fn dump_into(out: &mut String, value: &Value, depth: usize) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Null => out.push_str("NULL\n"),
        Value::Bool(b) => out.push_str(&format!("bool({b})\n")),
        Value::Number(n) if n.is_f64() => out.push_str(&format!("float({n})\n")),
        Value::Number(n) => out.push_str(&format!("int({n})\n")),
        Value::String(s) => out.push_str(&format!("string({}) \"{s}\"\n", s.len())),
        Value::Array(items) => {
            out.push_str(&format!("array({}) {{\n", items.len()));
            for (idx, item) in items.iter().enumerate() {
                out.push_str(&format!("{pad}  [{idx}]=>\n{pad}  "));
                dump_into(out, item, depth + 1);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
        Value::Object(map) => {
            out.push_str(&format!("array({}) {{\n", map.len()));
            for (key, item) in map {
                out.push_str(&format!("{pad}  [\"{key}\"]=>\n{pad}  "));
                dump_into(out, item, depth + 1);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
    }
}
