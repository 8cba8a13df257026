//! Template parsing and rendering.
//!
//! A template is literal text with embedded tags:
//!
//! | Tag                                   | Meaning                         |
//! |---------------------------------------|---------------------------------|
//! | `<%= expr %>`                         | interpolation                   |
//! | `<%= expr if guard %>` / `unless`     | interpolation with inline guard |
//! | `<% if g %>` `<% elsif g %>` `<% else %>` `<% end %>` | conditional block |
//! | `<% unless g %>` … `<% end %>`        | negated conditional block       |
//! | `<% each v in expr %>` … `<% end %>`  | iteration (`for` also accepted) |
//! | `<%# text %>`                         | comment                         |
//! | `<%%`                                 | literal `<%`                    |
//!
//! ## Whitespace
//!
//! A line that starts and ends with control or comment tags (ignoring
//! surrounding whitespace) and holds no interpolation contributes no line
//! terminator or indentation of its own. Literal text between its tags is
//! kept; whitespace between them is not. A line made only of control tags
//! therefore disappears from the output entirely.
//!
//! A tag ends at the first `%>`, even inside a string literal, so `%>` cannot
//! be spelled within a tag.
//!
//! Parsing happens once per template; rendering walks the chunk tree
//! depth-first and stops at the first error.

use tracing::trace;

use crate::domain::{
    error::{RenderError, SyntaxError},
    expression::{Expr, Scope, split_inline_guard},
};

const TAG_OPEN: &str = "<%";
const TAG_CLOSE: &str = "%>";

/// One parsed unit of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    Text(String),
    Interpolation {
        expr: Expr,
        /// Inline guard; the chunk emits nothing when it evaluates false.
        guard: Option<Expr>,
        line: usize,
    },
    Conditional {
        guard: Expr,
        then_body: Vec<Chunk>,
        else_body: Vec<Chunk>,
        line: usize,
    },
    Iteration {
        binding: String,
        collection: Expr,
        body: Vec<Chunk>,
        line: usize,
    },
}

/// A parsed template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    chunks: Vec<Chunk>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let tokens = lex(source)?;
        let mut parser = BlockParser {
            tokens: tokens.into_iter().peekable(),
        };
        let (chunks, end) = parser.block()?;
        match end {
            BlockEnd::Eof => Ok(Self { chunks }),
            BlockEnd::End { line }
            | BlockEnd::Else { line }
            | BlockEnd::Elsif { line, .. } => Err(RenderError::new(
                line,
                SyntaxError::UnexpectedKeyword {
                    keyword: end.keyword().into(),
                },
            )),
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Render against `scope`. The scope is restored before returning.
    pub fn render(&self, scope: &mut Scope<'_>) -> Result<String, RenderError> {
        let mut out = String::new();
        render_chunks(&self.chunks, scope, &mut out)?;
        Ok(out)
    }
}

fn render_chunks(
    chunks: &[Chunk],
    scope: &mut Scope<'_>,
    out: &mut String,
) -> Result<(), RenderError> {
    for chunk in chunks {
        match chunk {
            Chunk::Text(text) => out.push_str(text),
            Chunk::Interpolation { expr, guard, line } => {
                if let Some(guard) = guard {
                    if !guard.eval_bool(scope).map_err(|e| RenderError::new(*line, e))? {
                        continue;
                    }
                }
                let text = expr
                    .eval_text(scope)
                    .map_err(|e| RenderError::new(*line, e))?;
                out.push_str(&text);
            }
            Chunk::Conditional {
                guard,
                then_body,
                else_body,
                line,
            } => {
                let taken = guard
                    .eval_bool(scope)
                    .map_err(|e| RenderError::new(*line, e))?;
                let body = if taken { then_body } else { else_body };
                render_chunks(body, scope, out)?;
            }
            Chunk::Iteration {
                binding,
                collection,
                body,
                line,
            } => {
                let items = collection
                    .eval_list(scope)
                    .map_err(|e| RenderError::new(*line, e))?;
                trace!(binding = %binding, count = items.len(), line, "iterating");
                for item in items {
                    scope.push(binding.as_str(), item);
                    let result = render_chunks(body, scope, out);
                    scope.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Lexer: text and tags, with control-line trimming
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Output,
    Code,
    Comment,
}

#[derive(Debug)]
enum Token<'s> {
    Text(String),
    Tag {
        kind: TagKind,
        content: &'s str,
        line: usize,
    },
}

fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn lex(source: &str) -> Result<Vec<Token<'_>>, RenderError> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut pos = 0;
    // Set while lexing a line framed by control or comment tags.
    let mut control_line_end: Option<usize> = None;

    while let Some(found) = source[pos..].find(TAG_OPEN) {
        let open = pos + found;
        let between = &source[pos..open];
        if control_line_end.is_none() || !between.trim_matches([' ', '\t']).is_empty() {
            text.push_str(between);
        }

        let after_open = open + TAG_OPEN.len();
        if source[after_open..].starts_with('%') {
            // `<%%` escapes a literal `<%`.
            text.push_str(TAG_OPEN);
            pos = after_open + 1;
            continue;
        }

        let line = line_at(source, open);
        let (kind, content_start) = match source[after_open..].chars().next() {
            Some('=') => (TagKind::Output, after_open + 1),
            Some('#') => (TagKind::Comment, after_open + 1),
            _ => (TagKind::Code, after_open),
        };
        let close = source[content_start..]
            .find(TAG_CLOSE)
            .map(|i| content_start + i)
            .ok_or_else(|| RenderError::new(line, SyntaxError::UnterminatedTag))?;
        let mut next = close + TAG_CLOSE.len();

        if kind != TagKind::Output && control_line_end.is_none() {
            control_line_end = control_line_end_at(source, open);
            if control_line_end.is_some() {
                // Drop the indentation already collected for this line.
                let indent = text.len() - text.trim_end_matches([' ', '\t']).len();
                text.truncate(text.len() - indent);
            }
        }
        if let Some(line_end) = control_line_end {
            if !source[next..line_end].contains(TAG_OPEN) {
                // Last tag on the line: swallow the terminator.
                next = line_end;
                control_line_end = None;
            }
        }

        if !text.is_empty() {
            tokens.push(Token::Text(std::mem::take(&mut text)));
        }
        if kind != TagKind::Comment {
            tokens.push(Token::Tag {
                kind,
                content: source[content_start..close].trim(),
                line,
            });
        }
        pos = next;
    }

    text.push_str(&source[pos..]);
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    Ok(tokens)
}

/// If the tag opening at `open` is the first thing on a line that also ends
/// with a control or comment tag and holds no interpolation, the offset just
/// past that line's terminator (or the end of input).
fn control_line_end_at(source: &str, open: usize) -> Option<usize> {
    let line_start = source[..open].rfind('\n').map_or(0, |i| i + 1);
    if !source[line_start..open].chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }

    let mut at = open;
    let mut ends_with_tag = false;
    loop {
        let rest = &source[at..];
        let trimmed = rest.trim_start_matches([' ', '\t', '\r']);
        at += rest.len() - trimmed.len();

        if trimmed.is_empty() || trimmed.starts_with('\n') {
            let terminator = usize::from(!trimmed.is_empty());
            return ends_with_tag.then_some(at + terminator);
        }

        match trimmed.strip_prefix(TAG_OPEN) {
            Some(inner) if inner.starts_with('=') => return None,
            Some(inner) if inner.starts_with('%') => {
                at += TAG_OPEN.len() + 1;
                ends_with_tag = false;
            }
            Some(inner) => {
                let close = inner.find(TAG_CLOSE)?;
                at += TAG_OPEN.len() + close + TAG_CLOSE.len();
                ends_with_tag = true;
            }
            None => {
                let next_tag = trimmed.find(TAG_OPEN)?;
                if trimmed[..next_tag].contains('\n') {
                    return None;
                }
                at += next_tag;
                ends_with_tag = false;
            }
        }
    }
}

// ============================================================================
// Parser: tokens into nested chunks
// ============================================================================

/// How a block ended.
enum BlockEnd {
    Eof,
    End { line: usize },
    Else { line: usize },
    Elsif { line: usize, guard: Expr },
}

impl BlockEnd {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Eof => "end of template",
            Self::End { .. } => "end",
            Self::Else { .. } => "else",
            Self::Elsif { .. } => "elsif",
        }
    }
}

struct BlockParser<'s> {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token<'s>>>,
}

impl BlockParser<'_> {
    /// Parse chunks until `end`, `else`, `elsif` or end of input.
    fn block(&mut self) -> Result<(Vec<Chunk>, BlockEnd), RenderError> {
        let mut chunks = Vec::new();

        while let Some(token) = self.tokens.next() {
            let (kind, content, line) = match token {
                Token::Text(text) => {
                    chunks.push(Chunk::Text(text));
                    continue;
                }
                Token::Tag {
                    kind,
                    content,
                    line,
                } => (kind, content, line),
            };

            if kind == TagKind::Output {
                chunks.push(interpolation(content, line)?);
                continue;
            }

            let (keyword, rest) = split_keyword(content);
            match keyword {
                "end" if rest.is_empty() => return Ok((chunks, BlockEnd::End { line })),
                "else" if rest.is_empty() => return Ok((chunks, BlockEnd::Else { line })),
                "elsif" => {
                    let guard = expression(rest, line)?;
                    return Ok((chunks, BlockEnd::Elsif { line, guard }));
                }
                "if" => chunks.push(self.conditional(expression(rest, line)?, line, "if")?),
                "unless" => {
                    let guard = Expr::Not(Box::new(expression(rest, line)?));
                    chunks.push(self.conditional(guard, line, "unless")?);
                }
                "each" | "for" => chunks.push(self.iteration(rest, line, content)?),
                _ => {
                    return Err(RenderError::new(
                        line,
                        SyntaxError::UnknownStatement {
                            statement: content.to_string(),
                        },
                    ));
                }
            }
        }

        Ok((chunks, BlockEnd::Eof))
    }

    fn conditional(
        &mut self,
        guard: Expr,
        line: usize,
        keyword: &'static str,
    ) -> Result<Chunk, RenderError> {
        let (then_body, end) = self.block()?;
        let else_body = match end {
            BlockEnd::End { .. } => Vec::new(),
            BlockEnd::Else { .. } => {
                let (else_body, end) = self.block()?;
                match end {
                    BlockEnd::End { .. } => else_body,
                    BlockEnd::Eof => return Err(unclosed(line, keyword)),
                    BlockEnd::Else { line } | BlockEnd::Elsif { line, .. } => {
                        return Err(RenderError::new(
                            line,
                            SyntaxError::UnexpectedKeyword {
                                keyword: end.keyword().into(),
                            },
                        ));
                    }
                }
            }
            // `elsif` nests as a conditional in the else branch that shares
            // this block's `end`.
            BlockEnd::Elsif {
                line: elsif_line,
                guard,
            } => vec![self.conditional(guard, elsif_line, keyword)?],
            BlockEnd::Eof => return Err(unclosed(line, keyword)),
        };

        Ok(Chunk::Conditional {
            guard,
            then_body,
            else_body,
            line,
        })
    }

    fn iteration(&mut self, rest: &str, line: usize, content: &str) -> Result<Chunk, RenderError> {
        let malformed = || {
            RenderError::new(
                line,
                SyntaxError::UnknownStatement {
                    statement: content.to_string(),
                },
            )
        };

        let (binding, rest) = split_keyword(rest);
        let (in_keyword, collection) = split_keyword(rest);
        if in_keyword != "in" || collection.is_empty() || !is_binding_name(binding) {
            return Err(malformed());
        }
        let collection = expression(collection, line)?;

        let (body, end) = self.block()?;
        match end {
            BlockEnd::End { .. } => Ok(Chunk::Iteration {
                binding: binding.to_string(),
                collection,
                body,
                line,
            }),
            BlockEnd::Eof => Err(unclosed(line, "each")),
            BlockEnd::Else { line } | BlockEnd::Elsif { line, .. } => Err(RenderError::new(
                line,
                SyntaxError::UnexpectedKeyword {
                    keyword: end.keyword().into(),
                },
            )),
        }
    }
}

fn unclosed(line: usize, keyword: &'static str) -> RenderError {
    RenderError::new(line, SyntaxError::UnclosedBlock { keyword })
}

fn split_keyword(content: &str) -> (&str, &str) {
    match content.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (content, ""),
    }
}

fn is_binding_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn expression(src: &str, line: usize) -> Result<Expr, RenderError> {
    Expr::parse(src).map_err(|e| RenderError::new(line, e))
}

fn interpolation(content: &str, line: usize) -> Result<Chunk, RenderError> {
    let (value, guard) = split_inline_guard(content).map_err(|e| RenderError::new(line, e))?;
    let guard = match guard {
        Some((guard, negated)) => {
            let guard = expression(guard, line)?;
            Some(if negated {
                Expr::Not(Box::new(guard))
            } else {
                guard
            })
        }
        None => None,
    };
    Ok(Chunk::Interpolation {
        expr: expression(value, line)?,
        guard,
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::model::{Component, Operation, Task, TypeRef},
        error::{EvalError, RenderErrorKind},
        value::Value,
    };

    fn component(fixed: bool) -> Component {
        Component::new("nav").with_task(
            Task::new("Controller")
                .fixed_initial_state(fixed)
                .with_operation(Operation::new("reset"))
                .with_operation(Operation::new("getStatus").returns(TypeRef::new("Status"))),
        )
    }

    fn render(source: &str, c: &Component) -> Result<String, RenderError> {
        let mut scope = Scope::new()
            .with("component", Value::Component(c))
            .with("task", Value::task(c, &c.tasks()[0]));
        Template::parse(source)?.render(&mut scope)
    }

    #[test]
    fn parses_into_nested_chunks() {
        let template =
            Template::parse("a\n<% if task.fixed_initial_state? %>b<% else %>c<% end %>").unwrap();
        let chunks = template.chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], Chunk::Text("a\n".into()));
        match &chunks[1] {
            Chunk::Conditional {
                then_body,
                else_body,
                line,
                ..
            } => {
                assert_eq!(*line, 2);
                assert_eq!(then_body, &[Chunk::Text("b".into())]);
                assert_eq!(else_body, &[Chunk::Text("c".into())]);
            }
            other => panic!("expected a conditional, got {other:?}"),
        }
    }

    // ========================================================================
    // Interpolation
    // ========================================================================

    #[test]
    fn literal_text_is_verbatim() {
        let c = component(false);
        assert_eq!(render("int x = 1;\n", &c).unwrap(), "int x = 1;\n");
    }

    #[test]
    fn interpolates_paths() {
        let c = component(false);
        assert_eq!(
            render("using namespace <%= task.component.name %>;", &c).unwrap(),
            "using namespace nav;"
        );
    }

    #[test]
    fn inline_guards() {
        let template = "f(name<%= \", initial_state\" unless task.fixed_initial_state? %>)";
        assert_eq!(render(template, &component(false)).unwrap(), "f(name, initial_state)");
        assert_eq!(render(template, &component(true)).unwrap(), "f(name)");

        let template = "<%= \"fixed\" if task.fixed_initial_state? %>";
        assert_eq!(render(template, &component(true)).unwrap(), "fixed");
        assert_eq!(render(template, &component(false)).unwrap(), "");
    }

    #[test]
    fn escaped_tag_and_comments() {
        let c = component(false);
        assert_eq!(render("a <%% b", &c).unwrap(), "a <% b");
        assert_eq!(render("a<%# note %>b", &c).unwrap(), "ab");
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    #[test]
    fn conditional_with_else() {
        let template = "<% if task.fixed_initial_state? %>fixed<% else %>free<% end %>";
        assert_eq!(render(template, &component(true)).unwrap(), "fixed");
        assert_eq!(render(template, &component(false)).unwrap(), "free");
    }

    #[test]
    fn unless_is_negated_if() {
        let template = "<% unless task.fixed_initial_state? %>free<% end %>";
        assert_eq!(render(template, &component(false)).unwrap(), "free");
        assert_eq!(render(template, &component(true)).unwrap(), "");
    }

    #[test]
    fn elsif_chains() {
        let template = "<% each op in task.self_operations %>\
            <% if op.name == \"reset\" %>R<% elsif op.has_return_value? %>V<% else %>?<% end %>\
            <% end %>";
        assert_eq!(render(template, &component(false)).unwrap(), "RV");
    }

    #[test]
    fn iteration_preserves_order() {
        let template = "<% each op in task.self_operations %>[<%= op.method_name %>]<% end %>";
        assert_eq!(
            render(template, &component(false)).unwrap(),
            "[reset][getStatus]"
        );
    }

    #[test]
    fn loop_variable_shadows_and_is_scoped_to_body() {
        let c = component(false);
        let template = "<% each task in task.self_operations %><%= task.name %>,<% end %><%= task.basename %>";
        assert_eq!(render(template, &c).unwrap(), "reset,getStatus,Controller");

        let err = render("<% each op in task.self_operations %><% end %><%= op.name %>", &c)
            .unwrap_err();
        assert!(matches!(
            err.kind,
            RenderErrorKind::Eval(EvalError::UnresolvedPath { on: "scope", .. })
        ));
    }

    #[test]
    fn nested_iteration() {
        let c = component(false);
        let template = "<% for t in component.tasks %><% for op in t.operations %><%= t.basename %>.<%= op.name %> <% end %><% end %>";
        assert_eq!(
            render(template, &c).unwrap(),
            "Controller.reset Controller.getStatus "
        );
    }

    // ========================================================================
    // Whitespace policy
    // ========================================================================

    #[test]
    fn standalone_control_lines_vanish() {
        let template = "\
{
    <% if task.fixed_initial_state? %>
    fixed();
    <% end %>
}
";
        assert_eq!(render(template, &component(true)).unwrap(), "{\n    fixed();\n}\n");
        assert_eq!(render(template, &component(false)).unwrap(), "{\n}\n");
    }

    #[test]
    fn skipped_iterations_leave_no_blank_lines() {
        let template = "\
a
<% each op in task.self_operations %>
  <% if op.has_return_value? %>
  <%= op.name %>
  <% end %>
<% end %>
b
";
        assert_eq!(render(template, &component(false)).unwrap(), "a\n  getStatus\nb\n");
    }

    #[test]
    fn lines_of_several_control_tags_vanish() {
        let c = component(false);
        assert_eq!(
            render("x\n<% if true %><% if false %>y<% end %><% end %>\nz", &c).unwrap(),
            "x\nz"
        );
        assert_eq!(
            render("x\n<% if true %><% if true %>y<% end %><% end %>\nz", &c).unwrap(),
            "x\nyz"
        );

        let template = "\
a
  <% if true %> <% if task.fixed_initial_state? %>
fixed
  <% end %><%# inner %>  <% end %>
b
";
        assert_eq!(render(template, &c).unwrap(), "a\nb\n");
        assert_eq!(render(template, &component(true)).unwrap(), "a\nfixed\nb\n");
    }

    #[test]
    fn control_lines_with_interpolation_are_kept() {
        let template = "<% if true %><%= task.basename %><% end %>\nz\n";
        assert_eq!(
            render(template, &component(false)).unwrap(),
            "Controller\nz\n"
        );
    }

    #[test]
    fn close_marker_inside_a_string_ends_the_tag() {
        let err = render("<%= \"%>\" %>", &component(false)).unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn interpolation_lines_are_kept_even_when_empty() {
        let template = "a\n<%= \"x\" if task.fixed_initial_state? %>\nb\n";
        assert_eq!(render(template, &component(false)).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn tags_sharing_a_line_with_text_are_not_trimmed() {
        let template = "x <% if true %>y<% end %>\nz\n";
        assert_eq!(render(template, &component(false)).unwrap(), "x y\nz\n");
    }

    #[test]
    fn crlf_line_endings_are_trimmed_too() {
        let template = "a\r\n<% if true %>\r\nb\r\n<% end %>\r\n";
        assert_eq!(render(template, &component(false)).unwrap(), "a\r\nb\r\n");
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn errors_carry_line_and_path() {
        let c = component(false);
        let err = render("line one\n<%= task.basenme %>\n", &c).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.path(), Some("task.basenme"));
    }

    #[test]
    fn errors_inside_loops_report_the_inner_line() {
        let c = component(false);
        let result = render(
            "head\n<% each op in task.self_operations %>\n<%= op.return_type.first.cxx_name %>\n<% end %>\n",
            &c,
        );
        // `reset` has no return type: `first` is nil and nil has no accessors.
        let err = result.unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.path(), Some("op.return_type.first.cxx_name"));
    }

    #[test]
    fn iteration_over_scalar_is_type_mismatch() {
        let c = component(false);
        let err = render("<% each x in task.basename %><% end %>", &c).unwrap_err();
        assert!(matches!(
            err.kind,
            RenderErrorKind::Eval(EvalError::TypeMismatch { expected: "a list", .. })
        ));
    }

    #[test]
    fn syntax_errors() {
        let c = component(false);
        let cases = [
            ("<%= task.basename", 1),
            ("a\n<% if true %>", 2),
            ("<% end %>", 1),
            ("<% each op task.self_operations %><% end %>", 1),
            ("\n\n<% frobnicate %>", 3),
            ("<% if true %><% else %><% else %><% end %>", 1),
            ("<%= task..basename %>", 1),
        ];
        for (source, line) in cases {
            let err = render(source, &c).unwrap_err();
            assert!(err.is_syntax(), "{source:?} should be a syntax error");
            assert_eq!(err.line, line, "{source:?}");
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let c = component(false);
        let template = Template::parse(
            "<% each op in task.self_operations %><%= op.qualified_signature %>\n<% end %>",
        )
        .unwrap();
        let mut scope = Scope::new().with("task", Value::task(&c, &c.tasks()[0]));
        let first = template.render(&mut scope).unwrap();
        let second = template.render(&mut scope).unwrap();
        assert_eq!(first, second);
        assert_eq!(scope.depth(), 1);
    }
}
