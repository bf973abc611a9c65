//! Path templates with named placeholders
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! `Public/{folder}/Tags/{UUID}.lsx` style templates. `{{` and `}}` produce
//! literal braces.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Placeholder values supplied to [`format_path`].
pub type PathVars = HashMap<String, String>;

enum Piece<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

fn pieces(template: &str) -> Result<Vec<Piece<'_>>> {
    let invalid = || Error::InvalidPathTemplate(template.to_string());
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            out.push(Piece::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{{") {
            out.push(Piece::Brace('{'));
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            out.push(Piece::Brace('}'));
            rest = after;
        } else if let Some(after) = tail.strip_prefix('{') {
            let end = after.find('}').ok_or_else(invalid)?;
            let name = &after[..end];
            if name.is_empty() || name.contains('{') {
                return Err(invalid());
            }
            out.push(Piece::Placeholder(name));
            rest = &after[end + 1..];
        } else {
            // A lone '}'
            return Err(invalid());
        }
    }
    if !rest.is_empty() {
        out.push(Piece::Literal(rest));
    }
    Ok(out)
}

/// Names of the placeholders in `template`, in order of appearance.
///
/// # Errors
/// Returns [`Error::InvalidPathTemplate`] for unbalanced braces or `{}`.
pub fn placeholders(template: &str) -> Result<Vec<&str>> {
    Ok(pieces(template)?
        .into_iter()
        .filter_map(|p| match p {
            Piece::Placeholder(name) => Some(name),
            _ => None,
        })
        .collect())
}

/// Substitute every placeholder in `template` using `lookup`.
///
/// # Errors
/// Returns [`Error::InvalidPathTemplate`] for a malformed template, or
/// [`Error::MissingPathVariable`] naming the first placeholder `lookup`
/// cannot resolve.
pub fn format_path_with<F>(template: &str, mut lookup: F) -> Result<String>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    for piece in pieces(template)? {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Brace(c) => out.push(c),
            Piece::Placeholder(name) => {
                let value = lookup(name).ok_or_else(|| Error::MissingPathVariable {
                    template: template.to_string(),
                    variable: name.to_string(),
                })?;
                out.push_str(&value);
            }
        }
    }
    Ok(out)
}

/// Substitute every placeholder in `template` from `vars`.
///
/// # Errors
/// See [`format_path_with`].
pub fn format_path(template: &str, vars: &PathVars) -> Result<String> {
    format_path_with(template, |name| vars.get(name).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> PathVars {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_substitution() {
        let path = format_path("Public/{folder}/X.lsx", &vars(&[("folder", "MyMod")])).unwrap();
        assert_eq!(path, "Public/MyMod/X.lsx");
    }

    #[test]
    fn test_missing_variable() {
        let err = format_path("Public/{folder}/X.lsx", &PathVars::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingPathVariable { ref variable, .. } if variable == "folder"
        ));
    }

    #[test]
    fn test_escaped_braces() {
        let path = format_path("a{{b}}/{x}", &vars(&[("x", "1")])).unwrap();
        assert_eq!(path, "a{b}/1");
    }

    #[test]
    fn test_malformed_templates() {
        for bad in ["a{b", "a}b", "a{}b", "a{{b}"] {
            assert!(
                matches!(format_path(bad, &PathVars::new()), Err(Error::InvalidPathTemplate(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("Public/{folder}/Tags/{UUID}.lsx").unwrap(),
            vec!["folder", "UUID"]
        );
        assert!(placeholders("Mods/meta.lsx").unwrap().is_empty());
    }
}
