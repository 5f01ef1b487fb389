//! Named placeholders (`:email`) rewritten to Postgres positional parameters.

use serde_json::{Map, Value};

use super::manager::DatabaseError;

/// Placeholder name to scalar value.
pub type Params = Map<String, Value>;

/// A statement ready for binding: positional SQL plus values in `$n` order.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

impl NamedQuery {
    /// Rewrite every `:name` in `sql` to `$n` and collect the bound values.
    ///
    /// A name used twice shares one position. `::type` casts and anything
    /// inside single or double quotes are copied through untouched.
    pub fn compile(sql: &str, params: &Params) -> Result<Self, DatabaseError> {
        let mut out = String::with_capacity(sql.len());
        let mut names: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        let chars: Vec<char> = sql.chars().collect();
        let mut i = 0;
        let mut quote: Option<char> = None;

        while i < chars.len() {
            let c = chars[i];

            if let Some(q) = quote {
                out.push(c);
                if c == q {
                    quote = None;
                }
                i += 1;
                continue;
            }

            match c {
                '\'' | '"' => {
                    quote = Some(c);
                    out.push(c);
                    i += 1;
                }
                ':' if chars.get(i + 1) == Some(&':') => {
                    out.push_str("::");
                    i += 2;
                }
                ':' if chars.get(i + 1).is_some_and(|n| is_name_start(*n)) => {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && is_name_char(chars[end]) {
                        end += 1;
                    }
                    let name: String = chars[start..end].iter().collect();

                    let position = match names.iter().position(|n| *n == name) {
                        Some(existing) => existing + 1,
                        None => {
                            let value = params
                                .get(&name)
                                .cloned()
                                .ok_or_else(|| DatabaseError::MissingParameter(name.clone()))?;
                            names.push(name);
                            values.push(value);
                            names.len()
                        }
                    };

                    out.push('$');
                    out.push_str(&position.to_string());
                    i = end;
                }
                _ => {
                    out.push(c);
                    i += 1;
                }
            }
        }

        Ok(Self { sql: out, values })
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Build a [`Params`] map from `name => value` pairs.
#[macro_export]
macro_rules! params {
    () => { $crate::database::Params::new() };
    ($($name:literal => $value:expr),+ $(,)?) => {{
        let mut map = $crate::database::Params::new();
        $( map.insert($name.to_string(), ::serde_json::json!($value)); )+
        map
    }};
}
