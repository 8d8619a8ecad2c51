//! Listing predicates
//!
//! A [`Predicate`] is one condition of a listing's WHERE clause. Predicates
//! are plain values so a composed query can be inspected (and tested) before
//! it is rendered to SQL. Rendering appends bound values to a parameter list
//! and refers to them by number (`?1`, `?2`, ...).
//!
//! Table aliases: `p` pages, `pt` page types, `cv` resolved page version,
//! `s` stacks (only joined for stack listings).

use rusqlite::types::Value;
use crate::models::StackType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Direct children of a page
    ParentId(i64),
    /// Every page strictly below a path, at any depth
    PathWithin(String),
    /// Pages of a page type
    PageTypeId(i64),
    /// Resolved version name contains the text. SQLite `LIKE` folds case
    /// for ASCII letters only, so `é` does not match `É`.
    NameContains(String),
    /// Stack record with exactly this stack type
    StackTypeIs(StackType),
    /// Stack record whose type is anything but `excluded`
    StackTypeIsNot(StackType),
    /// Stack not bound to a language section (section id NULL or 0)
    SectionUnscoped,
    /// Stack bound to this language section
    SectionId(i64),
    /// Matches nothing
    Never,
    /// Disjunction of predicates. An empty list matches nothing.
    AnyOf(Vec<Predicate>),
}

/// Push a value and return its placeholder
fn bind(params: &mut Vec<Value>, value: Value) -> String {
    params.push(value);
    format!("?{}", params.len())
}

/// Escape LIKE wildcards; used with `ESCAPE '\'`
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Predicate {
    /// Render to an SQL condition, binding values into `params`
    pub fn render(&self, params: &mut Vec<Value>) -> String {
        match self {
            Predicate::ParentId(id) => {
                format!("p.parent_id = {}", bind(params, Value::Integer(*id)))
            }
            Predicate::PathWithin(path) => {
                let pattern = format!("{}/%", escape_like(path.trim_end_matches('/')));
                format!("p.path LIKE {} ESCAPE '\\'", bind(params, Value::Text(pattern)))
            }
            Predicate::PageTypeId(id) => {
                format!("p.page_type_id = {}", bind(params, Value::Integer(*id)))
            }
            Predicate::NameContains(text) => {
                let pattern = format!("%{}%", escape_like(text));
                format!("cv.name LIKE {} ESCAPE '\\'", bind(params, Value::Text(pattern)))
            }
            Predicate::StackTypeIs(stack_type) => {
                format!("s.stack_type = {}", bind(params, Value::Integer(stack_type.code())))
            }
            Predicate::StackTypeIsNot(stack_type) => {
                format!(
                    "(s.stack_type IS NOT NULL AND s.stack_type <> {})",
                    bind(params, Value::Integer(stack_type.code()))
                )
            }
            Predicate::SectionUnscoped => {
                "(s.section_id IS NULL OR s.section_id = 0)".to_string()
            }
            Predicate::SectionId(id) => {
                format!("s.section_id = {}", bind(params, Value::Integer(*id)))
            }
            Predicate::Never => "1 = 0".to_string(),
            Predicate::AnyOf(options) => {
                if options.is_empty() {
                    return "1 = 0".to_string();
                }
                let rendered: Vec<String> = options.iter().map(|p| p.render(params)).collect();
                format!("({})", rendered.join(" OR "))
            }
        }
    }

    /// Whether the predicate reads columns of the stacks table
    pub fn needs_stacks(&self) -> bool {
        match self {
            Predicate::StackTypeIs(_)
            | Predicate::StackTypeIsNot(_)
            | Predicate::SectionUnscoped
            | Predicate::SectionId(_) => true,
            Predicate::AnyOf(options) => options.iter().any(Predicate::needs_stacks),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_id_binds_value() {
        let mut params = Vec::new();
        let sql = Predicate::ParentId(12).render(&mut params);
        assert_eq!(sql, "p.parent_id = ?1");
        assert_eq!(params, vec![Value::Integer(12)]);
    }

    #[test]
    fn test_path_within_is_prefix_match() {
        let mut params = vec![Value::Integer(1)];
        let sql = Predicate::PathWithin("/!stacks/".to_string()).render(&mut params);
        assert_eq!(sql, "p.path LIKE ?2 ESCAPE '\\'");
        assert_eq!(params[1], Value::Text("/!stacks/%".to_string()));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_stacks_disjunction() {
        let mut params = Vec::new();
        let sql = Predicate::AnyOf(vec![
            Predicate::PageTypeId(3),
            Predicate::StackTypeIsNot(StackType::GlobalArea),
        ])
        .render(&mut params);
        assert_eq!(
            sql,
            "(p.page_type_id = ?1 OR (s.stack_type IS NOT NULL AND s.stack_type <> ?2))"
        );
        assert_eq!(params, vec![Value::Integer(3), Value::Integer(20)]);
    }

    #[test]
    fn test_unbound_predicates() {
        let mut params = Vec::new();
        assert_eq!(Predicate::Never.render(&mut params), "1 = 0");
        assert_eq!(Predicate::AnyOf(vec![]).render(&mut params), "1 = 0");
        assert_eq!(
            Predicate::SectionUnscoped.render(&mut params),
            "(s.section_id IS NULL OR s.section_id = 0)"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_needs_stacks() {
        assert!(!Predicate::ParentId(1).needs_stacks());
        assert!(Predicate::SectionId(1).needs_stacks());
        assert!(Predicate::AnyOf(vec![Predicate::PageTypeId(1), Predicate::SectionUnscoped]).needs_stacks());
        assert!(!Predicate::AnyOf(vec![Predicate::PageTypeId(1)]).needs_stacks());
    }
}
