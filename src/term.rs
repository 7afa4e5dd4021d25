//! Elixir Term Conversion Utilities
//!
//! Tokens and nodes are encoded as `{kind, value, [{name, value}]}` tuples.

use std::fmt::Display;

use rustler::{Atom, Encoder, Env, NewBinary, Term};

use crate::core::attributes::AttributeSet;
use crate::core::error::ParseWarning;
use crate::core::tokenizer::{Token, TokenKind};
use crate::dom::NodeRef;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    tag_open,
    tag_close,
    text,
    meta,
    document,
    unbalanced_tags,
}

pub fn kind_atom(kind: TokenKind) -> Atom {
    match kind {
        TokenKind::TagOpen => tag_open(),
        TokenKind::TagClose => tag_close(),
        TokenKind::Text => text(),
        TokenKind::Meta => meta(),
        TokenKind::Document => document(),
    }
}

/// Convert a token to `{kind, value, attrs}`
pub fn token_to_term<'a>(env: Env<'a>, token: &Token) -> Term<'a> {
    (
        kind_atom(token.kind),
        str_to_binary(env, &token.value),
        attributes_to_term(env, &token.attributes),
    )
        .encode(env)
}

/// Convert a token sequence to a list, preserving order
pub fn tokens_to_term<'a>(env: Env<'a>, tokens: &[Token]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for token in tokens.iter().rev() {
        list = list.list_prepend(token_to_term(env, token));
    }
    list
}

/// Convert query results to a list of node tuples, preserving order
pub fn nodes_to_term<'a>(env: Env<'a>, nodes: &[NodeRef<'_>]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for node in nodes.iter().rev() {
        list = list.list_prepend(token_to_term(env, node.token()));
    }
    list
}

fn attributes_to_term<'a>(env: Env<'a>, attributes: &AttributeSet) -> Term<'a> {
    let mut attrs = Term::list_new_empty(env);
    for attr in attributes.iter().rev() {
        let tuple = (str_to_binary(env, &attr.name), str_to_binary(env, &attr.value));
        attrs = attrs.list_prepend(tuple.encode(env));
    }
    attrs
}

/// Warnings become `{:unbalanced_tags, opened, closed}` tuples
pub fn warnings_to_term<'a>(env: Env<'a>, warnings: &[ParseWarning]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for warning in warnings.iter().rev() {
        let term = match warning {
            ParseWarning::UnbalancedTags { opened, closed } => {
                (unbalanced_tags(), *opened, *closed).encode(env)
            }
        };
        list = list.list_prepend(term);
    }
    list
}

/// `{:error, message}`
pub fn error_to_term<'a>(env: Env<'a>, err: &impl Display) -> Term<'a> {
    (error(), str_to_binary(env, &err.to_string())).encode(env)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
