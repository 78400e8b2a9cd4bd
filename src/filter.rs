//! Effective allow/deny rules for the currently open tag chain.
//!
//! Every tag definition may blacklist or whitelist child tags. The rules of
//! all open ancestors combine into a single [`FilterSet`] that the parse
//! engine consults before accepting a new tag. The set is recomputed whenever
//! the open-tag stack changes.

use crate::ast::TagNode;

/// Snapshot of the combined filter rules for one open-tag stack state.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    blacklist: Vec<String>,
    whitelist: Option<Vec<String>>,
}

impl FilterSet {
    /// Computes the effective rules for `stack` (root sentinel first, top of
    /// stack last), seeded with the root-scope lists from the parse options.
    ///
    /// A blacklist entry is dropped when one of its `overridden_by` tags is
    /// open strictly above the declaring ancestor. Declared whitelists
    /// intersect; with none declared and no seed, no whitelist applies.
    pub fn for_stack(
        stack: &[&TagNode],
        blacklist_seed: &[String],
        whitelist_seed: Option<&[String]>,
    ) -> Self {
        let mut blacklist: Vec<String> =
            blacklist_seed.iter().map(|t| t.to_ascii_lowercase()).collect();
        let mut whitelist: Option<Vec<String>> =
            whitelist_seed.map(|seed| seed.iter().map(|t| t.to_ascii_lowercase()).collect());

        for (index, node) in stack.iter().enumerate() {
            let Some(definition) = node.definition.as_deref() else {
                continue;
            };

            for entry in &definition.blacklist_children {
                let overridden = stack[index + 1..].iter().any(|above| {
                    entry
                        .overridden_by
                        .iter()
                        .any(|tag| tag.eq_ignore_ascii_case(&above.tag_normalized))
                });
                if !overridden {
                    blacklist.push(entry.tag.to_ascii_lowercase());
                }
            }

            if let Some(declared) = &definition.whitelist_children {
                let declared: Vec<String> =
                    declared.iter().map(|t| t.to_ascii_lowercase()).collect();
                whitelist = Some(match whitelist {
                    None => declared,
                    Some(current) => current
                        .into_iter()
                        .filter(|tag| declared.contains(tag))
                        .collect(),
                });
            }
        }

        FilterSet {
            blacklist,
            whitelist,
        }
    }

    /// `true` iff the (already lowercased) tag passes the active whitelist,
    /// if any, and is not blacklisted.
    pub fn accepts(&self, tag: &str) -> bool {
        if let Some(whitelist) = &self.whitelist {
            if !whitelist.iter().any(|allowed| allowed == tag) {
                return false;
            }
        }
        !self.blacklist.iter().any(|banned| banned == tag)
    }
}
