//! Minimal `{{ Name }}` template rendering.
//!
//! Both the entry template (`template.md`, variable `Date`) and `EditorCmd`
//! (variable `DiaryFile`) use the same syntax. An action is `{{ Name }}`, with
//! optional surrounding whitespace and an optional leading dot, so templates
//! written as `{{.Date}}` keep working. Text outside actions is copied verbatim.

use crate::errors::TemplateError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Renders `template`, substituting each action with the matching entry of `vars`.
///
/// # Errors
///
/// - [`TemplateError::Unclosed`] if a `{{` has no matching `}}`
/// - [`TemplateError::EmptyAction`] for `{{}}` or `{{ . }}`
/// - [`TemplateError::UnknownVariable`] if an action names a variable not in `vars`
///
/// # Examples
///
/// ```
/// use diary::template::render;
///
/// let out = render("# {{Date}} / {{ .Date }}", &[("Date", "2024-01-01")]).unwrap();
/// assert_eq!(out, "# 2024-01-01 / 2024-01-01");
///
/// assert!(render("# {{Date", &[("Date", "x")]).is_err());
/// ```
pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);

        let action_start = start + OPEN.len();
        let end = rest[action_start..]
            .find(CLOSE)
            .ok_or(TemplateError::Unclosed {
                offset: offset + start,
            })?;

        let action = &rest[action_start..action_start + end];
        out.push_str(lookup(action, vars, offset + start)?);

        let consumed = action_start + end + CLOSE.len();
        rest = &rest[consumed..];
        offset += consumed;
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(
    action: &str,
    vars: &[(&str, &'a str)],
    offset: usize,
) -> Result<&'a str, TemplateError> {
    let name = action.trim();
    let name = name.strip_prefix('.').unwrap_or(name).trim();
    if name.is_empty() {
        return Err(TemplateError::EmptyAction { offset });
    }

    vars.iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
        .ok_or_else(|| TemplateError::UnknownVariable {
            name: name.to_string(),
        })
}

/// Returns true if `template` has an action naming `variable`.
///
/// Used to validate `EditorCmd`, which is useless without the working copy path.
pub fn references(template: &str, variable: &str) -> bool {
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            return false;
        };
        let name = after[..end].trim();
        if name.strip_prefix('.').unwrap_or(name).trim() == variable {
            return true;
        }
        rest = &after[end + CLOSE.len()..];
    }
    false
}
