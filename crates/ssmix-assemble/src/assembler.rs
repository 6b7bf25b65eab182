//! The grammar-driven assembly engine.

use std::sync::Arc;

use serde::Serialize;
use ssmix_decode::{MessageContext, SegmentBuilder, segment_tag, split_segments};
use ssmix_model::{
    Category, DeidentificationPolicy, Diagnostic, DiagnosticKind, JsonizerOptions, Result,
    SchemaTables,
};

use crate::document::{Document, Group, SegmentNode};
use crate::grammar::{Condition, Grammar, Placement, Step, grammar_for};

/// A decoded message together with everything that went wrong decoding it.
#[derive(Debug, Clone, Serialize)]
pub struct Jsonized {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decodes and assembles messages of one category.
#[derive(Debug, Clone)]
pub struct Assembler {
    category: Category,
    grammar: &'static Grammar,
    schema: Arc<SchemaTables>,
    policy: Arc<DeidentificationPolicy>,
    options: JsonizerOptions,
    setup_diagnostics: Vec<Diagnostic>,
}

impl Assembler {
    /// Build an assembler for `category`.
    ///
    /// A different category configured in `options` is recorded as a
    /// [`DiagnosticKind::CategoryMismatch`] and replaced by `category`; the
    /// diagnostic is repeated in every result.
    pub fn new(
        category: Category,
        schema: Arc<SchemaTables>,
        policy: Arc<DeidentificationPolicy>,
        mut options: JsonizerOptions,
    ) -> Self {
        let mut setup_diagnostics = Vec::new();
        if let Some(configured) = options.category
            && configured != category
        {
            tracing::warn!(%configured, %category, "configured category ignored");
            setup_diagnostics.push(Diagnostic::new(
                DiagnosticKind::CategoryMismatch,
                format!("configured category {configured} ignored; assembling as {category}"),
            ));
        }
        options.category = Some(category);
        Self {
            category,
            grammar: grammar_for(category),
            schema,
            policy,
            options,
            setup_diagnostics,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn grammar(&self) -> &'static Grammar {
        self.grammar
    }

    pub fn options(&self) -> &JsonizerOptions {
        &self.options
    }

    pub fn setup_diagnostics(&self) -> &[Diagnostic] {
        &self.setup_diagnostics
    }

    /// Decode `message` and group its segments into a document.
    ///
    /// Fails only on a structural error (header too short); every other
    /// problem is returned as a diagnostic next to the best-effort document.
    pub fn jsonize(&self, message: &str) -> Result<Jsonized> {
        let _span = tracing::debug_span!("jsonize", grammar = self.grammar.name).entered();
        let builder = SegmentBuilder::new(
            &self.schema,
            &self.policy,
            &self.options,
            self.category.usage_key(),
        );
        let mut ctx = MessageContext::new();
        let mut root = Group::new();
        let mut placed = 0usize;

        for raw in split_segments(message) {
            let tag = segment_tag(raw);
            let Some(placement) = self.grammar.placement(tag) else {
                ctx.report(
                    Diagnostic::new(
                        DiagnosticKind::UnknownSegmentForCategory,
                        format!("{tag} is not part of {}", self.grammar.name),
                    )
                    .in_segment(tag),
                );
                continue;
            };
            let segment = builder.build(raw, &mut ctx)?;
            if place(&mut root, placement, tag, SegmentNode::new(segment.fields)) {
                placed += 1;
            } else {
                ctx.report(
                    Diagnostic::new(
                        DiagnosticKind::OrphanSegment,
                        format!("{tag} arrived before the group it belongs to"),
                    )
                    .in_segment(tag),
                );
            }
        }

        let mut diagnostics = self.setup_diagnostics.clone();
        diagnostics.extend(ctx.into_diagnostics());
        tracing::debug!(
            segments = placed,
            diagnostics = diagnostics.len(),
            "message assembled"
        );
        Ok(Jsonized {
            document: Document::new(root, self.options.nesting.clone()),
            diagnostics,
        })
    }
}

/// Put `segment` where `placement` says. Returns false when the target group
/// does not exist.
fn place(root: &mut Group, placement: &Placement, tag: &str, segment: SegmentNode) -> bool {
    match placement {
        Placement::Attach(path) => match resolve_mut(root, path) {
            Some(group) => {
                group.attach(tag, segment);
                true
            }
            None => false,
        },
        Placement::Append(path) => match resolve_mut(root, path) {
            Some(group) => {
                group.append(tag, segment);
                true
            }
            None => false,
        },
        Placement::Open { path, kind } => match resolve_mut(root, path) {
            Some(group) => {
                group.open(*kind, Group::opened_by(tag, segment));
                true
            }
            None => false,
        },
        Placement::AppendUnder { path, parent } => {
            match resolve_mut(root, path).and_then(|group| group.last_segment_mut(parent)) {
                Some(parent) => {
                    parent
                        .children
                        .get_or_insert_with(tag.to_string(), Vec::new)
                        .push(segment);
                    true
                }
                None => false,
            }
        }
        Placement::Branch {
            when,
            then,
            otherwise,
        } => {
            let chosen = if holds(root, when) { then } else { otherwise };
            place(root, chosen, tag, segment)
        }
    }
}

fn holds(root: &Group, condition: &Condition) -> bool {
    match condition {
        Condition::Exists(path) => resolve(root, path).is_some(),
        Condition::Missing(path) => resolve(root, path).is_none(),
        Condition::Contains { path, tag } => {
            resolve(root, path).is_some_and(|group| group.has_segment(tag))
        }
        Condition::Any(conditions) => conditions.iter().any(|c| holds(root, c)),
    }
}

/// Read-only resolution: lazily created groups count as absent.
fn resolve<'g>(root: &'g Group, path: &[Step]) -> Option<&'g Group> {
    path.iter().try_fold(root, |group, step| match step {
        Step::Last(kind) | Step::LastOrNew(kind) => group.last_group(*kind),
    })
}

fn resolve_mut<'g>(root: &'g mut Group, path: &[Step]) -> Option<&'g mut Group> {
    let mut group = root;
    for step in path {
        group = match step {
            Step::Last(kind) => group.last_group_mut(*kind)?,
            Step::LastOrNew(kind) => group.last_group_or_new(*kind)?,
        };
    }
    Some(group)
}
