
use rand::Rng;
use rand::seq::SliceRandom;
use regex_syntax::Parser;
use regex_syntax::hir::{Class, ClassBytes, ClassUnicode, Hir, HirKind};

use crate::error::PatternError;

/// Extra repetitions drawn for `*`, `+`, and `{n,}` so generation always
/// terminates.
const MAX_UNBOUNDED_REPEAT: u32 = 100;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END: u32 = 0xDFFF;

/// A compiled pattern that can produce random strings matching itself.
///
/// Compilation parses the pattern and rejects constructs that have no
/// "generate a matching instance" semantics: the parser itself refuses
/// backreferences and look-around, and this walker additionally refuses
/// anchors and word boundaries. Every string returned by
/// [`CompiledPattern::generate`] fully matches the source pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    root: Node,
}

impl CompiledPattern {
    /// Parses `pattern` and prepares it for generation.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when the pattern does not parse or uses an
    /// assertion or an empty character class.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut parser = Parser::new();
        let hir = parser.parse(pattern).map_err(|error| PatternError::Parse {
            pattern: pattern.to_owned(),
            source: Box::new(error),
        })?;
        let root = compile_node(pattern, hir)?;
        Ok(Self {
            pattern: pattern.to_owned(),
            root,
        })
    }

    /// Produces one random string fully matching the compiled pattern.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut out = String::new();
        self.root.generate_into(rng, &mut out);
        out
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[derive(Debug, Clone)]
enum Node {
    Empty,
    Literal(String),
    Class(ClassSampler),
    Repeat {
        min: u32,
        max: u32,
        node: Box<Node>,
    },
    Concat(Vec<Node>),
    Alternation(Vec<Node>),
}

impl Node {
    fn generate_into<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut String) {
        match self {
            Node::Empty => {}
            Node::Literal(text) => out.push_str(text),
            Node::Class(sampler) => out.push(sampler.sample(rng)),
            Node::Repeat { min, max, node } => {
                let repetitions = rng.gen_range(*min..=*max);
                for _ in 0..repetitions {
                    node.generate_into(rng, out);
                }
            }
            Node::Concat(parts) => {
                for part in parts {
                    part.generate_into(rng, out);
                }
            }
            Node::Alternation(branches) => {
                if let Some(branch) = branches.choose(rng) {
                    branch.generate_into(rng, out);
                }
            }
        }
    }
}

fn compile_node(pattern: &str, hir: Hir) -> Result<Node, PatternError> {
    match hir.into_kind() {
        HirKind::Empty => Ok(Node::Empty),
        HirKind::Literal(literal) => Ok(Node::Literal(
            String::from_utf8_lossy(&literal.0).into_owned(),
        )),
        HirKind::Class(Class::Unicode(class)) => {
            ClassSampler::from_unicode(pattern, &class).map(Node::Class)
        }
        HirKind::Class(Class::Bytes(class)) => {
            ClassSampler::from_bytes(pattern, &class).map(Node::Class)
        }
        HirKind::Look(_) => Err(PatternError::Unsupported {
            pattern: pattern.to_owned(),
            construct: "assertion",
        }),
        HirKind::Repetition(repetition) => {
            let max = repetition
                .max
                .unwrap_or_else(|| repetition.min.saturating_add(MAX_UNBOUNDED_REPEAT));
            let node = compile_node(pattern, *repetition.sub)?;
            Ok(Node::Repeat {
                min: repetition.min,
                max,
                node: Box::new(node),
            })
        }
        HirKind::Capture(capture) => compile_node(pattern, *capture.sub),
        HirKind::Concat(parts) => parts
            .into_iter()
            .map(|part| compile_node(pattern, part))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Concat),
        HirKind::Alternation(branches) => branches
            .into_iter()
            .map(|branch| compile_node(pattern, branch))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Alternation),
    }
}

/// Uniform sampler over the members of a character class.
///
/// Spans never cover the surrogate block, so decoding a sampled code
/// point cannot fail.
#[derive(Debug, Clone)]
struct ClassSampler {
    spans: Vec<CharSpan>,
    total: u64,
}

#[derive(Debug, Clone, Copy)]
struct CharSpan {
    start: u32,
    len: u64,
}

impl ClassSampler {
    fn from_unicode(pattern: &str, class: &ClassUnicode) -> Result<Self, PatternError> {
        let mut spans = Vec::new();
        for range in class.ranges() {
            let lo = u32::from(range.start());
            let hi = u32::from(range.end());
            if lo < SURROGATE_START && hi > SURROGATE_END {
                push_span(&mut spans, lo, SURROGATE_START.saturating_sub(1));
                push_span(&mut spans, SURROGATE_END.saturating_add(1), hi);
            } else {
                push_span(&mut spans, lo, hi);
            }
        }
        Self::from_spans(pattern, spans)
    }

    fn from_bytes(pattern: &str, class: &ClassBytes) -> Result<Self, PatternError> {
        let mut spans = Vec::new();
        for range in class.ranges() {
            push_span(&mut spans, u32::from(range.start()), u32::from(range.end()));
        }
        Self::from_spans(pattern, spans)
    }

    fn from_spans(pattern: &str, spans: Vec<CharSpan>) -> Result<Self, PatternError> {
        let total = spans
            .iter()
            .fold(0u64, |sum, span| sum.saturating_add(span.len));
        if total == 0 {
            return Err(PatternError::Unsupported {
                pattern: pattern.to_owned(),
                construct: "empty character class",
            });
        }
        Ok(Self { spans, total })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        let mut remaining = rng.gen_range(0..self.total);
        for span in &self.spans {
            if remaining < span.len {
                let value = span
                    .start
                    .saturating_add(u32::try_from(remaining).unwrap_or(0));
                return char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
            remaining = remaining.saturating_sub(span.len);
        }
        char::REPLACEMENT_CHARACTER
    }
}

fn push_span(spans: &mut Vec<CharSpan>, lo: u32, hi: u32) {
    if lo > hi {
        return;
    }
    let len = u64::from(hi.saturating_sub(lo)).saturating_add(1);
    spans.push(CharSpan { start: lo, len });
}
