//! Body expansion: one invocation, one role, one template.

use crate::invocation::{Invocation, target_var};
use crate::template::{SlotValues, Template};

/// Inline marker written in place of a body whose template is defective.
pub const ERROR_MARKER: &str = "ERROR";

/// Expand `template` for `invocation` bound to the role typed `role_type`.
///
/// A defective template does not fail the run. The body becomes
/// `ERROR <defect>` so every broken method shows up in the same pass.
pub fn expand_body(invocation: &Invocation, role_type: &str, template: &Template) -> String {
    let params = invocation.param_names();
    let values = SlotValues {
        var: target_var(role_type),
        file: &invocation.key,
        params: &params,
    };

    match template.expand(&values) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(
                "{} ({}): body template defect: {}",
                invocation.name,
                invocation.key,
                e
            );
            format!("{} {}", ERROR_MARKER, e)
        }
    }
}
