use rayon::prelude::*;
use snafu::ResultExt;
use tracing::*;
use uuid::Uuid;

use crate::{
    analysis::resolver::LabelResolver,
    error::*,
    layout::{
        element::{DetectedElement, Layout, UnrecognizedElement},
        page::Page,
    },
};

use super::Task;

/// What to do with an element whose type does not resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Record it as unrecognized and keep going.
    #[default]
    Skip,
    /// Fail the whole batch on the first one.
    Abort,
}

pub struct ResolveTask<'e> {
    pub run_id: Uuid,
    pub elements: &'e [DetectedElement],
    pub image_size: (u32, u32),
    pub policy: FailurePolicy,
}

impl<'a> Task<'a> for ResolveTask<'_> {
    type Output = Page;

    type Extra = &'a LabelResolver;

    #[instrument(skip_all, fields(run = %self.run_id, policy = ?self.policy))]
    fn run(&self, resolver: Self::Extra) -> Result<Self::Output, DoclayoutError> {
        let outcomes = self
            .elements
            .par_iter()
            .map(|element| (element, resolver.resolve(&element.element_type)))
            .collect::<Vec<_>>();

        let mut blocks = Vec::with_capacity(outcomes.len());
        let mut unrecognized = Vec::new();
        for (element, outcome) in outcomes {
            match outcome {
                Ok(resolved) => {
                    if resolver.is_alias(&element.element_type) {
                        debug!(
                            "element {} alias `{}` resolved to {}",
                            element.index, element.element_type, resolved.label
                        );
                    }
                    blocks.push(Layout::new(element, resolved));
                }
                Err(err) if self.policy == FailurePolicy::Skip => {
                    warn!("skipping element {}: {}", element.index, err);
                    unrecognized.push(UnrecognizedElement::from(element));
                }
                Err(err) => {
                    error!("aborting at element {}: {}", element.index, err);
                    return Err(err).context(LabelSnafu { stage: "resolve" });
                }
            }
        }

        info!(
            "resolved {} of {} elements, {} unrecognized",
            blocks.len(),
            self.elements.len(),
            unrecognized.len()
        );

        Ok(Page::new(self.run_id, self.image_size, blocks, unrecognized))
    }
}
