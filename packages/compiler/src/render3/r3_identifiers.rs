//! Render3 Identifiers
//!
//! Runtime symbols referenced by generated component definitions.

use crate::output::output_ast::ExternalReference;

pub const CORE: &str = "@angular/core";

/// Runtime identifiers used in generated code
pub struct Identifiers;

impl Identifiers {
    fn make_ref(name: &str) -> ExternalReference {
        ExternalReference {
            module_name: Some(CORE.to_string()),
            name: Some(name.to_string()),
        }
    }

    /* Creation instructions */
    pub fn element() -> ExternalReference {
        Self::make_ref("ɵɵelement")
    }

    pub fn element_start() -> ExternalReference {
        Self::make_ref("ɵɵelementStart")
    }

    pub fn element_end() -> ExternalReference {
        Self::make_ref("ɵɵelementEnd")
    }

    pub fn text() -> ExternalReference {
        Self::make_ref("ɵɵtext")
    }

    pub fn listener() -> ExternalReference {
        Self::make_ref("ɵɵlistener")
    }

    pub fn template_create() -> ExternalReference {
        Self::make_ref("ɵɵtemplate")
    }

    pub fn defer() -> ExternalReference {
        Self::make_ref("ɵɵdefer")
    }

    pub fn defer_on_idle() -> ExternalReference {
        Self::make_ref("ɵɵdeferOnIdle")
    }

    /* View context */
    pub fn get_current_view() -> ExternalReference {
        Self::make_ref("ɵɵgetCurrentView")
    }

    pub fn restore_view() -> ExternalReference {
        Self::make_ref("ɵɵrestoreView")
    }

    pub fn reset_view() -> ExternalReference {
        Self::make_ref("ɵɵresetView")
    }

    pub fn next_context() -> ExternalReference {
        Self::make_ref("ɵɵnextContext")
    }

    /* Update instructions */
    pub fn advance() -> ExternalReference {
        Self::make_ref("ɵɵadvance")
    }

    pub fn property() -> ExternalReference {
        Self::make_ref("ɵɵproperty")
    }

    pub fn style_prop() -> ExternalReference {
        Self::make_ref("ɵɵstyleProp")
    }

    pub fn conditional() -> ExternalReference {
        Self::make_ref("ɵɵconditional")
    }

    pub fn text_interpolate() -> ExternalReference {
        Self::make_ref("ɵɵtextInterpolate")
    }

    /// `ɵɵtextInterpolate1` through `ɵɵtextInterpolate8`, or `ɵɵtextInterpolateV`
    /// for more than eight expressions.
    pub fn text_interpolate_n(expression_count: usize) -> ExternalReference {
        match expression_count {
            1..=8 => Self::make_ref(&format!("ɵɵtextInterpolate{}", expression_count)),
            _ => Self::make_ref("ɵɵtextInterpolateV"),
        }
    }

    /* Definitions */
    pub fn define_component() -> ExternalReference {
        Self::make_ref("ɵɵdefineComponent")
    }

    pub fn standalone_feature() -> ExternalReference {
        Self::make_ref("ɵɵStandaloneFeature")
    }

    /* Dependency injection and signals */
    pub fn inject() -> ExternalReference {
        Self::make_ref("inject")
    }

    pub fn injector() -> ExternalReference {
        Self::make_ref("Injector")
    }

    pub fn run_in_injection_context() -> ExternalReference {
        Self::make_ref("runInInjectionContext")
    }

    pub fn signal() -> ExternalReference {
        Self::make_ref("signal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pick_interpolation_instruction_by_arity() {
        assert_eq!(
            Identifiers::text_interpolate_n(2).name.as_deref(),
            Some("ɵɵtextInterpolate2")
        );
        assert_eq!(
            Identifiers::text_interpolate_n(9).name.as_deref(),
            Some("ɵɵtextInterpolateV")
        );
    }

    #[test]
    fn should_point_at_core() {
        assert_eq!(Identifiers::text().module_name.as_deref(), Some(CORE));
    }
}
