//! Group filtering: is a declaration active for this run?

use crate::config::ValidatorOptions;
use crate::core::metadata::ConstraintDeclaration;

/// Decide whether `decl` takes part in a run configured by `options`
///
/// A declaration's own `always` wins over the options default. With no
/// requested groups every declaration runs unless `strict_groups` excludes
/// grouped ones; with requested groups, ungrouped declarations and those
/// sharing a group run.
pub fn is_active(decl: &ConstraintDeclaration, options: &ValidatorOptions) -> bool {
    if decl.always.unwrap_or(options.always) {
        return true;
    }

    if options.groups.is_empty() {
        return !(options.strict_groups && !decl.groups.is_empty());
    }

    decl.groups.is_empty() || decl.groups.iter().any(|g| options.groups.contains(g))
}
