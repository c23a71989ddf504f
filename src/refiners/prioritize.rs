//! Resolve competing candidates for the same text

use crate::context::ParsingContext;
use crate::results::ParsingResult;

use super::Refiner;

/// Prefers tagged candidates among those starting at the same offset
///
/// Candidates are grouped by start offset. In a group of two or more where
/// at least one member carries a priority tag, only the tagged members
/// survive. Groups without a tagged member are kept whole.
#[derive(Debug, Clone)]
pub struct PrioritizeTaggedRefiner {
    tags: Vec<String>,
}

impl PrioritizeTaggedRefiner {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    fn is_tagged(&self, result: &ParsingResult) -> bool {
        self.tags.iter().any(|tag| result.has_tag(tag))
    }
}

impl Refiner for PrioritizeTaggedRefiner {
    fn name(&self) -> &'static str {
        "PrioritizeTaggedRefiner"
    }

    fn refine(
        &self,
        context: &ParsingContext<'_>,
        mut results: Vec<ParsingResult>,
    ) -> Vec<ParsingResult> {
        results.sort_by_key(ParsingResult::index);

        let mut kept = Vec::with_capacity(results.len());
        let mut group: Vec<ParsingResult> = Vec::new();

        for result in results {
            if group.first().is_some_and(|first| first.index() != result.index()) {
                self.flush(context, &mut group, &mut kept);
            }
            group.push(result);
        }
        self.flush(context, &mut group, &mut kept);

        kept
    }
}

impl PrioritizeTaggedRefiner {
    fn flush(
        &self,
        context: &ParsingContext<'_>,
        group: &mut Vec<ParsingResult>,
        kept: &mut Vec<ParsingResult>,
    ) {
        if group.len() > 1 && group.iter().any(|result| self.is_tagged(result)) {
            for result in group.drain(..) {
                if self.is_tagged(&result) {
                    kept.push(result);
                } else {
                    context.debug(|| {
                        format!("dropped {:?} in favour of a tagged candidate", result.text())
                    });
                }
            }
        } else {
            kept.append(group);
        }
    }
}

/// Keeps the most specific of overlapping candidates
///
/// A candidate is dropped when an overlapping one covers more text, or the
/// same amount of text with more known fields. Exact ties are all kept.
#[derive(Debug, Default)]
pub struct PrioritizeSpecificRefiner;

impl PrioritizeSpecificRefiner {
    pub fn new() -> Self {
        Self
    }
}

fn specificity(result: &ParsingResult) -> (usize, usize) {
    let known = result.start().known_count() + result.end().map_or(0, |end| end.known_count());
    (result.text().len(), known)
}

impl Refiner for PrioritizeSpecificRefiner {
    fn name(&self) -> &'static str {
        "PrioritizeSpecificRefiner"
    }

    fn refine(
        &self,
        context: &ParsingContext<'_>,
        results: Vec<ParsingResult>,
    ) -> Vec<ParsingResult> {
        let dominated: Vec<bool> = results
            .iter()
            .map(|result| {
                results.iter().any(|other| {
                    other.overlaps(result) && specificity(other) > specificity(result)
                })
            })
            .collect();

        results
            .into_iter()
            .zip(dominated)
            .filter_map(|(result, dominated)| {
                if dominated {
                    context.debug(|| format!("dropped {:?} for a more specific overlap", result.text()));
                    None
                } else {
                    Some(result)
                }
            })
            .collect()
    }
}
