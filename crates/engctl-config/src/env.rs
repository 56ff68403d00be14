//! `${NAME}` substitution in parsed config documents

use serde_yaml::Value;

use crate::{Error, Result};

/// Substitute `${NAME}` leaves from the process environment.
///
/// See [`substitute_env_with`].
pub fn substitute_env(value: &mut Value) -> Result<()> {
    substitute_env_with(value, |name| std::env::var(name).ok())
}

/// Substitute `${NAME}` leaves using `lookup`.
///
/// A string leaf is a reference only if the whole string is `${NAME}` with a
/// non-empty `NAME`. Mappings are walked recursively; sequences and other
/// scalars are left alone. An unset or empty variable fails the call and
/// leaves `value` untouched: the rewrite happens on a copy that replaces the
/// original only once every reference has resolved.
pub fn substitute_env_with<F>(value: &mut Value, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let mut staged = value.clone();
    substitute_in(&mut staged, &lookup)?;
    *value = staged;
    Ok(())
}

fn substitute_in<F>(value: &mut Value, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::Mapping(map) => {
            for (_, child) in map.iter_mut() {
                substitute_in(child, lookup)?;
            }
        }
        Value::String(s) => {
            if let Some(name) = env_reference(s) {
                match lookup(name).filter(|v| !v.is_empty()) {
                    Some(resolved) => {
                        tracing::debug!(variable = name, "Substituted environment variable");
                        *s = resolved;
                    }
                    None => {
                        return Err(Error::MissingEnvVar {
                            name: name.to_string(),
                        });
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// The variable name if `s` is exactly `${NAME}`.
fn env_reference(s: &str) -> Option<&str> {
    s.strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}
