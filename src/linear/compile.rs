// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parses a token stream into a flat [`LinearProgram`]: an ordered list of
//! literal runs, single-atom steps, quantified searches, and group
//! markers. Alternation and quantified groups are rejected here; the NFA
//! compiler (`nfa::compile`) accepts both.

use crate::char_class::{named_class, parse_charset, CharClass};
use crate::lexer::{parse_counted_bounds, Lexer, Token};
use crate::Error;

/// The kind of repetition a [`Quantifier`] expresses, independent of
/// greediness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantKind {
    /// Exactly one occurrence. The compiler never emits this kind
    /// directly — an unquantified atom is a bare `Step`, not a
    /// single-candidate `Search` — but it is kept for parity with the
    /// data model, and a backtracker driven by hand-built programs may
    /// still use it.
    One,
    Star,
    Plus,
    Question,
    /// `{n}`, `{n,}` (max = `None`), or `{n,m}`.
    Bounded(usize, Option<usize>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantifier {
    pub kind: QuantKind,
    pub greedy: bool,
}

/// A descriptor for a capturing group, indexed from 1. Group 0 (the whole
/// match) is implicit and is not listed here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupDescriptor {
    pub index: usize,
    pub name: String,
}

/// One element of a compiled linear program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramElem {
    /// A coalesced run of literal characters, matched as one unit.
    Sequence(String),
    /// A single unquantified atom.
    Step(CharClass),
    /// A quantified atom; matching explores its candidate stream.
    Search(CharClass, Quantifier),
    GroupEnter(usize),
    GroupExit(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearProgram {
    pub elems: Vec<ProgramElem>,
    pub groups: Vec<GroupDescriptor>,
}

/// Compiles `pattern` into a [`LinearProgram`].
pub fn compile_linear(pattern: &str) -> Result<LinearProgram, Error> {
    let mut compiler = Compiler {
        tokens: Lexer::new(pattern).peekable(),
        elems: Vec::new(),
        literal_buf: String::new(),
        groups: Vec::new(),
        group_stack: Vec::new(),
        next_group_id: 1,
    };
    compiler.run()?;
    Ok(LinearProgram { elems: compiler.elems, groups: compiler.groups })
}

struct Compiler {
    tokens: std::iter::Peekable<Lexer>,
    elems: Vec<ProgramElem>,
    literal_buf: String,
    groups: Vec<GroupDescriptor>,
    group_stack: Vec<usize>,
    next_group_id: usize,
}

impl Compiler {
    fn run(&mut self) -> Result<(), Error> {
        while let Some(tok) = self.tokens.next() {
            let tok = tok?;
            match tok {
                Token::Alt => return Err(Error::AlternationUnsupported),
                Token::Quant(_) | Token::Counted(_) => {
                    return Err(Error::LeadingQuantifier)
                }
                Token::GroupOpen(name) => {
                    self.flush_literal();
                    let id = self.next_group_id;
                    self.next_group_id += 1;
                    self.group_stack.push(id);
                    self.groups.push(GroupDescriptor {
                        index: id,
                        name: name.unwrap_or_default(),
                    });
                    self.elems.push(ProgramElem::GroupEnter(id));
                }
                Token::GroupClose => {
                    self.flush_literal();
                    let id = self
                        .group_stack
                        .pop()
                        .ok_or(Error::UnmatchedCloseParen)?;
                    self.elems.push(ProgramElem::GroupExit(id));
                    if let Some(Ok(Token::Quant(_))) | Some(Ok(Token::Counted(_))) =
                        self.tokens.peek()
                    {
                        return Err(Error::QuantifiedGroup);
                    }
                }
                Token::Dot => self.handle_atom(CharClass::AnyChar)?,
                Token::Char(c) => self.handle_atom(CharClass::Literal(c))?,
                Token::Escape(c) => match named_class(c) {
                    Some(set) => self.handle_atom(CharClass::Set(set))?,
                    None => self.handle_atom(CharClass::Literal(c))?,
                },
                Token::Bracket(raw) => {
                    let set = parse_charset(&raw)?;
                    self.handle_atom(CharClass::Set(set))?;
                }
            }
        }
        self.flush_literal();
        if !self.group_stack.is_empty() {
            return Err(Error::UnmatchedParen);
        }
        Ok(())
    }

    /// Having just produced `atom`, checks whether a quantifier follows
    /// and either emits a `Search`, buffers a bare literal for
    /// coalescing, or flushes the buffer and emits a bare `Step`.
    fn handle_atom(&mut self, atom: CharClass) -> Result<(), Error> {
        let quant = match self.tokens.peek() {
            Some(Ok(Token::Quant(spelling))) => Some(parse_quant_spelling(spelling)),
            Some(Ok(Token::Counted(raw))) => Some(parse_counted_quant(raw)?),
            _ => None,
        };
        if quant.is_some() {
            self.tokens.next();
        }
        match quant {
            Some(q) => {
                self.flush_literal();
                self.elems.push(ProgramElem::Search(atom, q));
            }
            None => match atom {
                CharClass::Literal(c) => self.literal_buf.push(c),
                _ => {
                    self.flush_literal();
                    self.elems.push(ProgramElem::Step(atom));
                }
            },
        }
        Ok(())
    }

    fn flush_literal(&mut self) {
        if !self.literal_buf.is_empty() {
            let s = std::mem::take(&mut self.literal_buf);
            self.elems.push(ProgramElem::Sequence(s));
        }
    }
}

fn parse_quant_spelling(spelling: &str) -> Quantifier {
    let lazy = spelling.len() == 2;
    let kind = match spelling.chars().next() {
        Some('*') => QuantKind::Star,
        Some('+') => QuantKind::Plus,
        Some('?') => QuantKind::Question,
        _ => unreachable!("lexer only produces */+/? quantifier tokens"),
    };
    Quantifier { kind, greedy: !lazy }
}

/// Counted repetitions are always greedy: the lexer never attaches a
/// trailing `?` to a `{...}` token, so a lazy counted form does not
/// exist in this grammar.
fn parse_counted_quant(raw: &str) -> Result<Quantifier, Error> {
    let (min, max) = parse_counted_bounds(raw)?;
    Ok(Quantifier { kind: QuantKind::Bounded(min, max), greedy: true })
}
