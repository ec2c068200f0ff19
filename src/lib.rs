// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small regular expression engine with two interchangeable matching
//! backends.
//!
//! Both backends are compiled from the same pattern grammar and both
//! anchor at the start of the input, requiring the pattern to account
//! for the text in full (there is no unanchored search, no replace, and
//! no "find all matches" iteration — see the module docs below for what
//! each backend supports):
//!
//! - [`linear`] compiles a pattern into a flat backtracking program
//!   (`compile_linear` / `match_linear`), which also reports capture
//!   group spans. It does not parse alternation (`|`) or accept a
//!   quantifier directly after a group.
//! - [`nfa`] compiles a pattern into a graph via Thompson's construction
//!   and simulates it breadth-first (`compile_nfa` / `match_nfa`). It
//!   accepts the full pattern grammar, including alternation and
//!   quantified groups, but reports only a yes/no answer.
//!
//! ```
//! use tinyregex::Regex;
//!
//! let re = Regex::new(r"abc[a-z]*def").unwrap();
//! assert!(re.is_match("abczzdef"));
//! assert!(!re.is_match("abcZZdef"));
//! ```

pub mod char_class;
mod error;
pub mod lexer;
pub mod linear;
pub mod nfa;

pub use crate::error::Error;
pub use crate::linear::{GroupMatch, Match};

/// Compiles `pattern` into a [`linear::LinearProgram`].
///
/// Rejects alternation and a quantifier directly following a group; see
/// [`nfa::compile_nfa`] for the engine that accepts both.
pub fn compile_linear(pattern: &str) -> Result<linear::LinearProgram, Error> {
    linear::compile_linear(pattern)
}

/// Compiles `pattern` into an [`nfa::Nfa`].
pub fn compile_nfa(pattern: &str) -> Result<nfa::Nfa, Error> {
    nfa::compile_nfa(pattern)
}

/// Runs a compiled linear program against `text`, anchored at position 0
/// and requiring full consumption of `text`.
pub fn match_linear(program: &linear::LinearProgram, text: &str) -> Option<Match> {
    linear::match_linear(program, text)
}

/// Runs a compiled NFA against `text`, anchored at position 0 and
/// requiring full consumption of `text`.
pub fn match_nfa(nfa: &nfa::Nfa, text: &str) -> bool {
    nfa::match_nfa(nfa, text)
}

/// Compiles `pattern` and matches it against `text` in one call, using
/// the linear (backtracking) engine.
pub fn is_match(pattern: &str, text: &str) -> Result<bool, Error> {
    Ok(match_linear(&compile_linear(pattern)?, text).is_some())
}

/// An owned, compiled pattern backed by the linear backtracking engine.
///
/// Compiling is the expensive step; a `Regex` is built once and may be
/// matched against any number of input strings afterwards. The compiled
/// program is immutable once built, so a `Regex` is safely shared across
/// threads (`Send + Sync`) and each call to [`Regex::is_match`] /
/// [`Regex::captures`] allocates only its own, call-local matching
/// state.
#[derive(Clone, Debug)]
pub struct Regex {
    program: linear::LinearProgram,
}

impl Regex {
    /// Compiles `pattern` using the linear engine.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Ok(Regex { program: compile_linear(pattern)? })
    }

    /// Reports whether `text` is matched in full, anchored at position 0.
    pub fn is_match(&self, text: &str) -> bool {
        self.captures(text).is_some()
    }

    /// Matches `text` and, on success, returns the full [`Match`]
    /// including every capture group's span.
    pub fn captures(&self, text: &str) -> Option<Match> {
        match_linear(&self.program, text)
    }
}

/// An owned, compiled pattern backed by the NFA (Thompson's
/// construction) engine.
///
/// Unlike [`Regex`], `NfaRegex` understands alternation (`|`) and
/// quantified groups, but reports only whether a match exists — it does
/// not track capture group spans (see spec §6 / C7 for why: group
/// bookkeeping is the backtracking matcher's responsibility alone).
#[derive(Clone, Debug)]
pub struct NfaRegex {
    nfa: nfa::Nfa,
}

impl NfaRegex {
    /// Compiles `pattern` using the NFA engine.
    pub fn new(pattern: &str) -> Result<NfaRegex, Error> {
        Ok(NfaRegex { nfa: compile_nfa(pattern)? })
    }

    /// Reports whether `text` is matched in full, anchored at position 0.
    pub fn is_match(&self, text: &str) -> bool {
        match_nfa(&self.nfa, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_match_convenience_function() {
        assert!(is_match("abc.*def", "abczzdef").unwrap());
        assert!(!is_match("abc.+def", "abcdef").unwrap());
    }

    #[test]
    fn regex_compiles_once_matches_many() {
        let re = Regex::new("a{2,3}b").unwrap();
        assert!(!re.is_match("ab"));
        assert!(re.is_match("aab"));
        assert!(re.is_match("aaab"));
        assert!(!re.is_match("aaaab"));
    }

    #[test]
    fn regex_reports_group_captures() {
        let re = Regex::new("abc([a-z]*)def").unwrap();
        let m = re.captures("abczzdef").unwrap();
        let g1 = m.groups.iter().find(|g| g.index == 1).unwrap();
        assert_eq!((g1.start, g1.end), (3, Some(5)));
    }

    #[test]
    fn nfa_regex_supports_alternation() {
        let re = NfaRegex::new("abc|def").unwrap();
        assert!(re.is_match("abc"));
        assert!(re.is_match("def"));
        assert!(!re.is_match("xyz"));
    }

    #[test]
    fn nfa_regex_supports_quantified_groups() {
        let re = NfaRegex::new("(abc)*end").unwrap();
        assert!(re.is_match("abcabcend"));
        assert!(re.is_match("end"));
        assert!(!re.is_match("abcabc"));
    }

    #[test]
    fn compile_error_surfaces_to_caller() {
        assert_eq!(Regex::new("[abc").unwrap_err(), Error::UnmatchedBracket);
        assert_eq!(NfaRegex::new("(abc").unwrap_err(), Error::UnmatchedParen);
    }
}
