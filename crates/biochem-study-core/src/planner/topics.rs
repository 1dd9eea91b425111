//! Topic selection.

use indexmap::IndexSet;

use crate::bank::ModuleDefinition;

pub const DEFAULT_TOPIC_LIMIT: usize = 4;

/// Inputs for [`select_topics`].
#[derive(Debug, Clone)]
pub struct TopicSelection<'a> {
    pub modules: &'a [ModuleDefinition],
    pub requested_topics: &'a [String],
    pub focus_areas: &'a [String],
    pub limit: usize,
}

impl<'a> TopicSelection<'a> {
    pub fn new(modules: &'a [ModuleDefinition]) -> Self {
        Self {
            modules,
            requested_topics: &[],
            focus_areas: &[],
            limit: DEFAULT_TOPIC_LIMIT,
        }
    }
}

/// Ordered, deduplicated topic ids, truncated to `limit`.
///
/// Insertion order is: requested topics, requested focus areas, then each
/// catalog module id followed by that module's focus areas. First insertion
/// wins, so explicit requests always outrank catalog-derived entries.
pub fn select_topics(selection: &TopicSelection<'_>) -> Vec<String> {
    let mut topics: IndexSet<&str> = IndexSet::new();
    topics.extend(selection.requested_topics.iter().map(String::as_str));
    topics.extend(selection.focus_areas.iter().map(String::as_str));
    for module in selection.modules {
        topics.insert(module.id.as_str());
        topics.extend(module.focus_areas.iter().map(String::as_str));
    }

    topics
        .into_iter()
        .take(selection.limit)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn catalog() -> Vec<ModuleDefinition> {
        QuestionBank::builtin().unwrap().modules
    }

    #[test]
    fn requested_topics_come_first() {
        let modules = catalog();
        let requested = vec!["neuro".to_string()];
        let selected = select_topics(&TopicSelection {
            requested_topics: &requested,
            ..TopicSelection::new(&modules)
        });
        assert_eq!(
            selected,
            vec![
                "neuro",
                "metabolism",
                "Allosteric enzyme control",
                "Energetics under hypoxia"
            ]
        );
    }

    #[test]
    fn focus_areas_follow_requested_topics() {
        let modules = catalog();
        let requested = vec!["immuno".to_string()];
        let focus = vec!["CRISPR diagnostics".to_string()];
        let selected = select_topics(&TopicSelection {
            requested_topics: &requested,
            focus_areas: &focus,
            limit: 3,
            ..TopicSelection::new(&modules)
        });
        assert_eq!(selected, vec!["immuno", "CRISPR diagnostics", "metabolism"]);
    }

    #[test]
    fn empty_inputs_draw_from_catalog() {
        let modules = catalog();
        let selected = select_topics(&TopicSelection::new(&modules));
        assert_eq!(selected.len(), DEFAULT_TOPIC_LIMIT);
        assert_eq!(selected[0], "metabolism");

        assert!(select_topics(&TopicSelection::new(&[])).is_empty());
    }

    proptest! {
        #[test]
        fn never_duplicates_and_respects_limit(
            requested in proptest::collection::vec("[a-c]{1,2}", 0..8),
            focus in proptest::collection::vec("[a-c]{1,2}", 0..8),
            limit in 0usize..12,
        ) {
            let modules = catalog();
            let selected = select_topics(&TopicSelection {
                modules: &modules,
                requested_topics: &requested,
                focus_areas: &focus,
                limit,
            });
            let unique: HashSet<_> = selected.iter().collect();
            prop_assert_eq!(unique.len(), selected.len());
            prop_assert!(selected.len() <= limit);

            let mut expected_prefix: Vec<&String> = Vec::new();
            for topic in requested.iter().chain(focus.iter()) {
                if !expected_prefix.contains(&topic) {
                    expected_prefix.push(topic);
                }
            }
            for (got, want) in selected.iter().zip(expected_prefix) {
                prop_assert_eq!(got, want);
            }
        }
    }
}
