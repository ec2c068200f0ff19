// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Thompson's construction: builds a state graph from a pattern's token
//! stream, working right-to-left so that each token's fragment is wired
//! directly onto the (already-built) continuation that follows it.
//!
//! Unlike the linear compiler, this one accepts both alternation (`|`)
//! and quantified groups — the two bits of surface syntax §6 reserves to
//! the NFA engine.

use std::collections::HashMap;

use crate::char_class::{named_class, parse_charset};
use crate::lexer::{parse_counted_bounds, Lexer, Token};
use crate::Error;

use super::{Edge, Nfa, State, StateId};

/// Compiles `pattern` into an [`Nfa`].
pub fn compile_nfa(pattern: &str) -> Result<Nfa, Error> {
    let mut tokens = Vec::new();
    for tok in Lexer::new(pattern) {
        tokens.push(tok?);
    }
    let mut states = vec![State::default()];
    let terminal: StateId = 0;
    let start = compile_subgraph(&mut tokens, terminal, &mut states)?;
    Ok(Nfa { states, start, terminal })
}

/// Builds a fragment for `tokens` (consumed from the tail) that flows
/// into the already-built continuation `head`, returning the fragment's
/// entry state.
fn compile_subgraph(
    tokens: &mut Vec<Token>,
    head: StateId,
    states: &mut Vec<State>,
) -> Result<StateId, Error> {
    let entry_head = head;
    let mut head = head;
    let mut pending_quant: Option<Token> = None;

    while let Some(tok) = tokens.pop() {
        match tok {
            Token::Quant(_) | Token::Counted(_) => {
                if pending_quant.is_some() {
                    return Err(Error::LeadingQuantifier);
                }
                pending_quant = Some(tok);
            }
            Token::Alt => {
                if pending_quant.is_some() {
                    return Err(Error::LeadingQuantifier);
                }
                let right_entry = head;
                let left_entry = compile_subgraph(tokens, entry_head, states)?;
                states[left_entry].outs.push((Edge::Epsilon, right_entry));
                head = left_entry;
            }
            Token::GroupClose => {
                let mut interior = scan_group(tokens)?;
                let group_entry = compile_subgraph(&mut interior, head, states)?;
                head = apply_pending(&mut pending_quant, group_entry, head, states)?;
            }
            Token::GroupOpen(_) => return Err(Error::UnmatchedParen),
            Token::Dot => {
                let newhead = push_edge(states, Edge::Any, head);
                head = apply_pending(&mut pending_quant, newhead, head, states)?;
            }
            Token::Char(c) => {
                let newhead = push_edge(states, Edge::Literal(c), head);
                head = apply_pending(&mut pending_quant, newhead, head, states)?;
            }
            Token::Escape(c) => {
                let edge = match named_class(c) {
                    Some(set) => Edge::Charset(set),
                    None => Edge::Literal(c),
                };
                let newhead = push_edge(states, edge, head);
                head = apply_pending(&mut pending_quant, newhead, head, states)?;
            }
            Token::Bracket(raw) => {
                let set = parse_charset(&raw)?;
                let newhead = push_edge(states, Edge::Charset(set), head);
                head = apply_pending(&mut pending_quant, newhead, head, states)?;
            }
        }
    }
    if pending_quant.is_some() {
        return Err(Error::LeadingQuantifier);
    }
    Ok(head)
}

fn push_edge(states: &mut Vec<State>, edge: Edge, to: StateId) -> StateId {
    let id = states.len();
    states.push(State { outs: vec![(edge, to)] });
    id
}

/// Applies a stashed quantifier (if any) to the fragment `(newhead →
/// head)` just built, consuming `pending`. Returns the fragment's
/// (possibly different, for counted repetitions) entry state.
fn apply_pending(
    pending: &mut Option<Token>,
    newhead: StateId,
    head: StateId,
    states: &mut Vec<State>,
) -> Result<StateId, Error> {
    match pending.take() {
        None => Ok(newhead),
        Some(Token::Quant(spelling)) => {
            let lazy = spelling.len() == 2;
            let kind = spelling.chars().next().unwrap();
            apply_simple_quantifier(kind, !lazy, newhead, head, states);
            Ok(newhead)
        }
        Some(Token::Counted(raw)) => {
            let (min, max) = parse_counted_bounds(&raw)?;
            Ok(apply_counted(min, max, newhead, head, states))
        }
        Some(_) => unreachable!("only Quant/Counted are ever stashed"),
    }
}

/// `*`/`+`/`?` (and their lazy forms) desugar to one or two epsilon
/// edges on the fragment itself — see spec §4.5's table. Greedy
/// appends the epsilon (tried after the predicate edge already in
/// place); lazy prepends it (tried first).
fn apply_simple_quantifier(
    kind: char,
    greedy: bool,
    newhead: StateId,
    head: StateId,
    states: &mut Vec<State>,
) {
    match (kind, greedy) {
        ('?', true) => states[newhead].outs.push((Edge::Epsilon, head)),
        ('?', false) => states[newhead].outs.insert(0, (Edge::Epsilon, head)),
        ('+', true) => states[head].outs.push((Edge::Epsilon, newhead)),
        ('+', false) => states[head].outs.insert(0, (Edge::Epsilon, newhead)),
        ('*', true) => {
            states[newhead].outs.push((Edge::Epsilon, head));
            states[head].outs.push((Edge::Epsilon, newhead));
        }
        ('*', false) => {
            states[newhead].outs.insert(0, (Edge::Epsilon, head));
            states[head].outs.insert(0, (Edge::Epsilon, newhead));
        }
        _ => unreachable!("lexer only produces */+/? quantifier tokens"),
    }
}

/// Counted repetition via subgraph cloning (spec §4.5, §9 "Cloning
/// identity"): `{n,m}` is `n` mandatory copies followed by `m-n`
/// optional copies, each with a bypass straight to the shared tail.
/// `{n,}` is `n-1` mandatory copies followed by one copy turned into a
/// `+` (a single back-edge only — a literal two-edge "star" on the last
/// copy would make the nth occurrence itself skippable, undercounting
/// the minimum by one).
fn apply_counted(
    min: usize,
    max: Option<usize>,
    entry: StateId,
    exit: StateId,
    states: &mut Vec<State>,
) -> StateId {
    match max {
        None => {
            if min == 0 {
                states[entry].outs.push((Edge::Epsilon, exit));
                states[exit].outs.push((Edge::Epsilon, entry));
                entry
            } else {
                let overall = clone_chain(entry, exit, min - 1, entry, states);
                states[exit].outs.push((Edge::Epsilon, entry));
                overall
            }
        }
        Some(max) => {
            let optional = max.saturating_sub(min);
            let mut current_tail = exit;
            for _ in 0..optional {
                let mut mapping = HashMap::new();
                mapping.insert(exit, current_tail);
                let clone_entry = clone_rec(entry, &mut mapping, states);
                states[clone_entry].outs.push((Edge::Epsilon, current_tail));
                current_tail = clone_entry;
            }
            clone_chain(entry, exit, min, current_tail, states)
        }
    }
}

/// Chains `count` deep clones of the `(entry, exit)` fragment in series,
/// with the rightmost clone's internal references to `exit` redirected
/// to `target`. Returns the leftmost clone's entry (or `target` itself
/// if `count == 0`).
fn clone_chain(
    entry: StateId,
    exit: StateId,
    count: usize,
    target: StateId,
    states: &mut Vec<State>,
) -> StateId {
    let mut tail = target;
    for _ in 0..count {
        let mut mapping = HashMap::new();
        mapping.insert(exit, tail);
        tail = clone_rec(entry, &mut mapping, states);
    }
    tail
}

/// Deep-clones the subgraph reachable from `id`, following `mapping` for
/// identity: any state already present in `mapping` (pre-seeded with the
/// shared tail) is reused rather than re-cloned, which is what lets a
/// clone of a cyclic fragment terminate and funnel into the right
/// downstream state instead of duplicating it.
fn clone_rec(
    id: StateId,
    mapping: &mut HashMap<StateId, StateId>,
    states: &mut Vec<State>,
) -> StateId {
    if let Some(&existing) = mapping.get(&id) {
        return existing;
    }
    let new_id = states.len();
    states.push(State::default());
    mapping.insert(id, new_id);
    let outs = states[id].outs.clone();
    let mut new_outs = Vec::with_capacity(outs.len());
    for (edge, target) in outs {
        let new_target = clone_rec(target, mapping, states);
        new_outs.push((edge, new_target));
    }
    states[new_id].outs = new_outs;
    new_id
}

/// Called with `tokens`'s last element already popped as the `)`.
/// Scans further pops for the matching `(`, tracking nested paren
/// depth, and returns the interior tokens in forward source order
/// (ready for a fresh `compile_subgraph` call).
fn scan_group(tokens: &mut Vec<Token>) -> Result<Vec<Token>, Error> {
    let mut depth = 0usize;
    let mut interior = Vec::new();
    loop {
        let tok = tokens.pop().ok_or(Error::UnmatchedCloseParen)?;
        match tok {
            Token::GroupClose => {
                depth += 1;
                interior.push(tok);
            }
            Token::GroupOpen(_) if depth == 0 => {
                interior.reverse();
                return Ok(interior);
            }
            Token::GroupOpen(_) => {
                depth -= 1;
                interior.push(tok);
            }
            other => interior.push(other),
        }
    }
}
