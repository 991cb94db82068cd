//! Symbol lookup by dotted path.

use std::rc::Rc;

use crate::tree::Declaration;

/// Find the declaration named by a dotted `path` below `root`.
///
/// Each segment is matched against the immediate declaration children of the
/// current node; the first name match wins. A segment without a match ends
/// the search with `None`, no other branch is tried.
#[must_use]
pub fn locate(root: &Rc<Declaration>, path: &str) -> Option<Rc<Declaration>> {
    path.split('.').try_fold(Rc::clone(root), |current, segment| {
        current
            .children()
            .iter()
            .find(|child| child.name() == Some(segment))
            .map(Rc::clone)
    })
}
