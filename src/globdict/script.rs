//! # Script Layer
//!
//! A small line-oriented language over [`DictApi`], used by the CLI and by
//! tests. Each non-blank line is one statement:
//!
//! ```text
//! # comment
//! d1 = new                 # bind the new handle to a name
//! insert d1 k0 a
//! insert d1 "a key" "a value"
//! insert d1 k0 NULL        # NULL is an absent key or value
//! find d1 k0
//! size d1
//! remove d1 k1
//! clear d1
//! copy d1 d2
//! delete d1
//! g = global
//! expect size d1 1
//! expect find d1 k0 a
//! expect find d1 k1 NULL
//! ```
//!
//! Handles are written as a number, as `global`, or as a name bound earlier
//! with `NAME = new` / `NAME = global`.
//!
//! Parsing happens up front, so a malformed script fails before it touches the
//! store. Names are resolved while running.

use crate::api::DictApi;
use crate::error::{DictError, Result};
use crate::model::Handle;
use crate::store::DictRegistry;
use std::collections::HashMap;

const NULL_TOKEN: &str = "NULL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleRef {
    Id(Handle),
    Global,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    New,
    Global,
    Delete(HandleRef),
    Size(HandleRef),
    Insert(HandleRef, Option<String>, Option<String>),
    Remove(HandleRef, Option<String>),
    Find(HandleRef, Option<String>),
    Clear(HandleRef),
    Copy(HandleRef, HandleRef),
    ExpectSize(HandleRef, usize),
    ExpectFind(HandleRef, Option<String>, Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub binding: Option<String>,
    pub op: Op,
}

/// What a statement produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Handle(Handle),
    Size(usize),
    Found(Option<String>),
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub line: usize,
    pub binding: Option<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct ScriptResult {
    pub steps: Vec<Step>,
}

impl ScriptResult {
    /// Steps that produced a value worth printing
    pub fn visible(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.outcome != Outcome::Done)
    }
}

#[derive(Debug, Default)]
pub struct Script {
    statements: Vec<Statement>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self> {
        let mut statements = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let parse_error = |message| DictError::Parse { line, message };
            let tokens = tokenize(raw).map_err(parse_error)?;
            if tokens.is_empty() {
                continue;
            }
            statements.push(parse_statement(line, tokens).map_err(parse_error)?);
        }
        Ok(Self { statements })
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Executes every statement against `api`, stopping at the first
    /// unresolved name or failed expectation.
    pub fn run<R: DictRegistry>(&self, api: &mut DictApi<R>) -> Result<ScriptResult> {
        self.run_with(api, |_| {})
    }

    /// Like [`Script::run`], but hands each step to `on_step` as soon as it
    /// completes, so steps before a failing line are still observed.
    pub fn run_with<R: DictRegistry>(
        &self,
        api: &mut DictApi<R>,
        mut on_step: impl FnMut(&Step),
    ) -> Result<ScriptResult> {
        let mut names: HashMap<String, Handle> = HashMap::new();
        let mut result = ScriptResult::default();

        for stmt in &self.statements {
            let line = stmt.line;
            let resolve = |r: &HandleRef| -> Result<Handle> {
                match r {
                    HandleRef::Id(h) => Ok(*h),
                    HandleRef::Global => Ok(Handle::GLOBAL),
                    HandleRef::Name(name) => names.get(name).copied().ok_or(DictError::Parse {
                        line,
                        message: format!("Unknown handle name: {}", name),
                    }),
                }
            };

            let outcome = match &stmt.op {
                Op::New => Outcome::Handle(api.new_dict()),
                Op::Global => Outcome::Handle(api.global_handle()),
                Op::Delete(h) => {
                    api.delete(resolve(h)?);
                    Outcome::Done
                }
                Op::Size(h) => Outcome::Size(api.size(resolve(h)?)),
                Op::Insert(h, key, value) => {
                    api.insert(resolve(h)?, key.as_deref(), value.as_deref());
                    Outcome::Done
                }
                Op::Remove(h, key) => {
                    api.remove(resolve(h)?, key.as_deref());
                    Outcome::Done
                }
                Op::Find(h, key) => {
                    Outcome::Found(api.find(resolve(h)?, key.as_deref()).map(str::to_owned))
                }
                Op::Clear(h) => {
                    api.clear(resolve(h)?);
                    Outcome::Done
                }
                Op::Copy(src, dst) => {
                    api.copy(resolve(src)?, resolve(dst)?);
                    Outcome::Done
                }
                Op::ExpectSize(h, expected) => {
                    let actual = api.size(resolve(h)?);
                    if actual != *expected {
                        return Err(DictError::Expectation {
                            line,
                            message: format!("size is {}, expected {}", actual, expected),
                        });
                    }
                    Outcome::Done
                }
                Op::ExpectFind(h, key, expected) => {
                    let actual = api.find(resolve(h)?, key.as_deref());
                    if actual != expected.as_deref() {
                        return Err(DictError::Expectation {
                            line,
                            message: format!(
                                "find returned {}, expected {}",
                                display_opt(actual),
                                display_opt(expected.as_deref())
                            ),
                        });
                    }
                    Outcome::Done
                }
            };

            if let (Some(name), Outcome::Handle(h)) = (&stmt.binding, &outcome) {
                names.insert(name.clone(), *h);
            }
            let step = Step {
                line,
                binding: stmt.binding.clone(),
                outcome,
            };
            on_step(&step);
            result.steps.push(step);
        }

        Ok(result)
    }
}

fn display_opt(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("\"{}\"", v),
        None => NULL_TOKEN.to_string(),
    }
}

/// A token plus whether it was quoted, so `"NULL"` stays a literal string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

fn tokenize(line: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '#' {
            break;
        } else if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some(other) => text.push(other),
                        None => return Err("Dangling escape at end of line".to_string()),
                    },
                    other => text.push(other),
                }
            }
            if !closed {
                return Err("Unterminated quoted string".to_string());
            }
            tokens.push(Token { text, quoted: true });
        } else {
            let mut text = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
        }
    }

    Ok(tokens)
}

fn parse_statement(line: usize, tokens: Vec<Token>) -> std::result::Result<Statement, String> {
    let (binding, rest) = match tokens.as_slice() {
        [name, eq, rest @ ..] if !name.quoted && !eq.quoted && eq.text == "=" => {
            if !is_name(&name.text) || name.text == "global" || name.text == NULL_TOKEN {
                return Err(format!("Invalid binding name: {}", name.text));
            }
            (Some(name.text.clone()), rest)
        }
        _ => (None, tokens.as_slice()),
    };

    let Some((command, args)) = rest.split_first() else {
        return Err("Missing command after '='".to_string());
    };
    if command.quoted {
        return Err(format!("Expected a command, found \"{}\"", command.text));
    }

    let op = match command.text.as_str() {
        "new" => {
            arity(args, 0, "new")?;
            Op::New
        }
        "global" => {
            arity(args, 0, "global")?;
            Op::Global
        }
        "delete" => {
            arity(args, 1, "delete HANDLE")?;
            Op::Delete(handle_ref(&args[0])?)
        }
        "size" => {
            arity(args, 1, "size HANDLE")?;
            Op::Size(handle_ref(&args[0])?)
        }
        "insert" => {
            arity(args, 3, "insert HANDLE KEY VALUE")?;
            Op::Insert(handle_ref(&args[0])?, text(&args[1]), text(&args[2]))
        }
        "remove" => {
            arity(args, 2, "remove HANDLE KEY")?;
            Op::Remove(handle_ref(&args[0])?, text(&args[1]))
        }
        "find" => {
            arity(args, 2, "find HANDLE KEY")?;
            Op::Find(handle_ref(&args[0])?, text(&args[1]))
        }
        "clear" => {
            arity(args, 1, "clear HANDLE")?;
            Op::Clear(handle_ref(&args[0])?)
        }
        "copy" => {
            arity(args, 2, "copy SRC DST")?;
            Op::Copy(handle_ref(&args[0])?, handle_ref(&args[1])?)
        }
        "expect" => parse_expect(args)?,
        other => return Err(format!("Unknown command: {}", other)),
    };

    if binding.is_some() && !matches!(op, Op::New | Op::Global) {
        return Err("Only 'new' and 'global' can be bound to a name".to_string());
    }

    Ok(Statement { line, binding, op })
}

fn parse_expect(args: &[Token]) -> std::result::Result<Op, String> {
    match args.split_first() {
        Some((kind, rest)) if !kind.quoted && kind.text == "size" => {
            arity(rest, 2, "expect size HANDLE N")?;
            let n = rest[1]
                .text
                .parse::<usize>()
                .map_err(|_| format!("Invalid size: {}", rest[1].text))?;
            Ok(Op::ExpectSize(handle_ref(&rest[0])?, n))
        }
        Some((kind, rest)) if !kind.quoted && kind.text == "find" => {
            arity(rest, 3, "expect find HANDLE KEY VALUE")?;
            Ok(Op::ExpectFind(
                handle_ref(&rest[0])?,
                text(&rest[1]),
                text(&rest[2]),
            ))
        }
        _ => Err("Usage: expect size HANDLE N | expect find HANDLE KEY VALUE".to_string()),
    }
}

fn arity(args: &[Token], n: usize, usage: &str) -> std::result::Result<(), String> {
    if args.len() != n {
        return Err(format!("Usage: {}", usage));
    }
    Ok(())
}

fn text(token: &Token) -> Option<String> {
    if !token.quoted && token.text == NULL_TOKEN {
        None
    } else {
        Some(token.text.clone())
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn handle_ref(token: &Token) -> std::result::Result<HandleRef, String> {
    if token.quoted {
        return Err(format!("Expected a handle, found \"{}\"", token.text));
    }
    if token.text == "global" {
        return Ok(HandleRef::Global);
    }
    if let Ok(h) = token.text.parse::<Handle>() {
        return Ok(HandleRef::Id(h));
    }
    if is_name(&token.text) {
        return Ok(HandleRef::Name(token.text.clone()));
    }
    Err(format!("Invalid handle: {}", token.text))
}
