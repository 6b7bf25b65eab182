//! Category dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use ssmix_model::{Category, DeidentificationPolicy, JsonizerOptions, Result, SchemaTables};

use crate::assembler::{Assembler, Jsonized};

/// Routes messages to the assembler of their category.
///
/// All visit-event categories share one assembler. Assemblers are immutable,
/// so a `Jsonizer` can be shared across threads.
#[derive(Debug, Clone)]
pub struct Jsonizer {
    assemblers: BTreeMap<Category, Arc<Assembler>>,
}

impl Jsonizer {
    /// A jsonizer applying the SS-MIX2 de-identification policy.
    pub fn new(schema: SchemaTables, options: JsonizerOptions) -> Self {
        Self::with_policy(schema, DeidentificationPolicy::ssmix2(), options)
    }

    pub fn with_policy(
        schema: SchemaTables,
        policy: DeidentificationPolicy,
        options: JsonizerOptions,
    ) -> Self {
        let schema = Arc::new(schema);
        let policy = Arc::new(policy);
        // the category is chosen per message here
        let options = options.with_category(None);
        let build = |category| {
            Arc::new(Assembler::new(
                category,
                Arc::clone(&schema),
                Arc::clone(&policy),
                options.clone(),
            ))
        };

        let visit_events = build(Category::Adt00);
        let assemblers = Category::ALL
            .into_iter()
            .map(|category| {
                let assembler = if category.is_visit_event() {
                    Arc::clone(&visit_events)
                } else {
                    build(category)
                };
                (category, assembler)
            })
            .collect();
        Self { assemblers }
    }

    /// Jsonize a message of the category named `category` (e.g. `OMP-11`).
    pub fn jsonize(&self, category: &str, message: &str) -> Result<Jsonized> {
        self.jsonize_category(category.parse()?, message)
    }

    pub fn jsonize_category(&self, category: Category, message: &str) -> Result<Jsonized> {
        tracing::trace!(%category, "dispatching message");
        self.assembler(category).jsonize(message)
    }

    pub fn assembler(&self, category: Category) -> &Assembler {
        // every category is registered in `with_policy`
        &self.assemblers[&category]
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.assemblers.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_events_share_an_assembler() {
        let jsonizer = Jsonizer::new(SchemaTables::default(), JsonizerOptions::default());
        assert!(std::ptr::eq(
            jsonizer.assembler(Category::Adt01),
            jsonizer.assembler(Category::Adt42)
        ));
        assert!(!std::ptr::eq(
            jsonizer.assembler(Category::Adt01),
            jsonizer.assembler(Category::Adt61)
        ));
        assert_eq!(jsonizer.categories().count(), 26);
    }

    #[test]
    fn dispatcher_never_reports_category_mismatch() {
        let options = JsonizerOptions::default().with_category(Some(Category::Omd));
        let jsonizer = Jsonizer::new(SchemaTables::default(), options);
        assert!(jsonizer.assembler(Category::Omp11).setup_diagnostics().is_empty());
    }
}
