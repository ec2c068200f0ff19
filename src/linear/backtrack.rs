// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A depth-first backtracking matcher over a [`LinearProgram`].
//!
//! Each `Search` element produces an ordered stream of candidate cursor
//! positions (largest-first when greedy, smallest-first when lazy) and
//! recurses into the remainder of the program for each in turn, taking
//! the first candidate whose suffix also matches. Groups are updated in
//! place with no save/restore on backtrack: only the state written along
//! the final accepting path is ever observed.

use crate::char_class::CharClass;
use super::compile::{LinearProgram, ProgramElem, QuantKind, Quantifier};

/// The span of a single capturing group. `end` is `None` until the group
/// has been exited at least once on the current path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupMatch {
    pub index: usize,
    pub name: String,
    pub start: usize,
    pub end: Option<usize>,
}

/// The result of a successful match: the final cursor (group 0's end)
/// and every group's span, indexed by group id (`groups[0]` is the
/// implicit whole-match group).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub end: usize,
    pub groups: Vec<GroupMatch>,
}

/// Runs `program` against `text`, anchored at position 0 and requiring
/// full consumption of `text`.
pub fn match_linear(program: &LinearProgram, text: &str) -> Option<Match> {
    let input: Vec<char> = text.chars().collect();
    let mut groups = Vec::with_capacity(program.groups.len() + 1);
    groups.push(GroupMatch { index: 0, name: String::new(), start: 0, end: None });
    for g in &program.groups {
        groups.push(GroupMatch {
            index: g.index,
            name: g.name.clone(),
            start: 0,
            end: None,
        });
    }
    let end = match_from(&program.elems, 0, &input, 0, &mut groups)?;
    groups[0].end = Some(end);
    Some(Match { end, groups })
}

fn match_from(
    elems: &[ProgramElem],
    pc: usize,
    input: &[char],
    cursor: usize,
    groups: &mut Vec<GroupMatch>,
) -> Option<usize> {
    if pc == elems.len() {
        return if cursor == input.len() { Some(cursor) } else { None };
    }
    match &elems[pc] {
        ProgramElem::Sequence(s) => {
            let run: Vec<char> = s.chars().collect();
            let end = cursor + run.len();
            if end <= input.len() && input[cursor..end] == run[..] {
                match_from(elems, pc + 1, input, end, groups)
            } else {
                None
            }
        }
        ProgramElem::Step(atom) => {
            let next = atom.try_step(input, cursor)?;
            match_from(elems, pc + 1, input, next, groups)
        }
        ProgramElem::GroupEnter(id) => {
            groups[*id].start = cursor;
            groups[*id].end = None;
            match_from(elems, pc + 1, input, cursor, groups)
        }
        ProgramElem::GroupExit(id) => {
            groups[*id].end = Some(cursor);
            match_from(elems, pc + 1, input, cursor, groups)
        }
        ProgramElem::Search(atom, quant) => {
            let positions = scan(atom, input, cursor);
            let mut candidates = candidate_positions(quant, &positions);
            if quant.greedy {
                candidates.reverse();
            }
            for cand in candidates {
                if let Some(end) = match_from(elems, pc + 1, input, cand, groups) {
                    return Some(end);
                }
            }
            None
        }
    }
}

/// `scan(atom, from) = [p0, p1, ..., pk]`: repeatedly applies
/// `atom.try_step` from `from` until it fails or the input is exhausted.
fn scan(atom: &CharClass, input: &[char], from: usize) -> Vec<usize> {
    let mut positions = vec![from];
    let mut cursor = from;
    while let Some(next) = atom.try_step(input, cursor) {
        positions.push(next);
        cursor = next;
    }
    positions
}

/// The candidate cursor positions allowed by `quant`, ascending
/// (smallest-first); the caller reverses this for greedy quantifiers.
fn candidate_positions(quant: &Quantifier, positions: &[usize]) -> Vec<usize> {
    let k = positions.len() - 1;
    match quant.kind {
        QuantKind::One => {
            if k >= 1 {
                vec![positions[1]]
            } else {
                Vec::new()
            }
        }
        QuantKind::Star => positions.to_vec(),
        QuantKind::Plus => {
            if k >= 1 {
                positions[1..=k].to_vec()
            } else {
                Vec::new()
            }
        }
        QuantKind::Question => {
            let hi = std::cmp::min(1, k);
            positions[0..=hi].to_vec()
        }
        QuantKind::Bounded(min, max) => {
            if min > k {
                return Vec::new();
            }
            let hi = match max {
                Some(m) => std::cmp::min(m, k),
                None => k,
            };
            if hi < min {
                return Vec::new();
            }
            positions[min..=hi].to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::compile::compile_linear;

    fn matches(pattern: &str, text: &str) -> bool {
        match_linear(&compile_linear(pattern).unwrap(), text).is_some()
    }

    #[test]
    fn scenario_1_any_star() {
        assert!(matches("abc.*def", "abczzdef"));
    }

    #[test]
    fn scenario_2_any_plus_requires_one() {
        assert!(!matches("abc.+def", "abcdef"));
    }

    #[test]
    fn scenario_3_any_question() {
        assert!(!matches("abc.?def", "abczzdef"));
    }

    #[test]
    fn scenario_4_charset_star() {
        assert!(matches("abc[a-z]*def", "abczzdef"));
    }

    #[test]
    fn scenario_5_negated_charset_star() {
        assert!(matches("abc[^a-z]*def", "abcZZdef"));
    }

    #[test]
    fn scenario_6_digit_escape() {
        assert!(matches("abc\\ddef", "abc0def"));
    }

    #[test]
    fn scenario_7_escaped_metacharacters() {
        assert!(matches("abc\\.\\*def", "abc.*def"));
        assert!(!matches("abc\\.\\*def", "abcz*def"));
    }

    #[test]
    fn scenario_8_counted_bounded() {
        assert!(matches("abc.{2,3}def", "abczzdef"));
        assert!(!matches("abc.{2,3}def", "abcdef"));
    }

    #[test]
    fn scenario_9_lazy_then_star() {
        assert!(matches("abc.*?def.*", "abcdefdef"));
    }

    #[test]
    fn scenario_10_group_span() {
        let m = match_linear(&compile_linear("abc([a-z]*)def").unwrap(), "abczzdef")
            .unwrap();
        let g1 = m.groups.iter().find(|g| g.index == 1).unwrap();
        assert_eq!((g1.start, g1.end), (3, Some(5)));
    }

    #[test]
    fn empty_pattern_matches_only_empty_string() {
        assert!(matches("", ""));
        assert!(!matches("", "a"));
    }

    #[test]
    fn dot_does_not_match_empty_string() {
        assert!(!matches(".", ""));
    }

    #[test]
    fn word_class_excludes_space() {
        assert!(matches("\\w", "_"));
        assert!(!matches("\\w", " "));
    }

    #[test]
    fn greedy_and_lazy_star_are_reverse_streams() {
        let greedy = compile_linear("a*").unwrap();
        let lazy = compile_linear("a*?").unwrap();
        let input: Vec<char> = "aaa".chars().collect();
        let greedy_atom = match &greedy.elems[0] {
            ProgramElem::Search(atom, q) => (atom.clone(), *q),
            _ => panic!("expected Search"),
        };
        let lazy_atom = match &lazy.elems[0] {
            ProgramElem::Search(atom, q) => (atom.clone(), *q),
            _ => panic!("expected Search"),
        };
        let positions = scan(&greedy_atom.0, &input, 0);
        let mut g = candidate_positions(&greedy_atom.1, &positions);
        g.reverse();
        let l = candidate_positions(&lazy_atom.1, &positions);
        let mut reversed_l = l.clone();
        reversed_l.reverse();
        assert_eq!(g, reversed_l);
    }
}
