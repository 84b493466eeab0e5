//! Code generation engine.
//!
//! A [`Template`] is parsed and validated once, then instantiated per class
//! by [`generate_class`]. Substitution walks the parsed segments in a single
//! pass; generated fragments are never rescanned for holes.

pub mod escape;
mod fragments;
mod template;

pub use fragments::{ClassGenerator, auxiliary_type_name};
pub use template::{Hole, Segment, Template, TemplateError};

use tracing::debug;

use crate::model::ClassMetadata;

/// Template shipped with the generator, producing a `SAXEventHandler`
/// specialization and a `Serializer` for each class.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/sax_handler.tpl");

/// Instantiates `template` for `class`.
#[must_use]
pub fn generate_class(template: &Template, class: &ClassMetadata) -> String {
    let generator = ClassGenerator::new(class);
    debug!(
        class = class.qualified_name(),
        states = class.state_slots().count(),
        "generating class"
    );
    template
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => text.clone(),
            Segment::Hole(hole) => generator.fragment(hole),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldMetadata;

    #[test]
    fn default_template_is_valid() {
        let template = Template::parse(DEFAULT_TEMPLATE).expect("default template parses");
        assert!(template.holes().any(|hole| *hole == Hole::ChangeState));
        assert!(
            template
                .holes()
                .any(|hole| matches!(hole, Hole::Forward(call) if call == "StartObject()"))
        );
    }

    #[test]
    fn fragments_are_not_rescanned() {
        let template = Template::parse("[/* change state */]").expect("valid template");
        let class = ClassMetadata::new(
            "::C",
            false,
            vec![FieldMetadata::new("int", "a").keyed("/* init */")],
        );
        let out = generate_class(&template, &class);
        assert!(out.contains("\"/* init */\", 10)"), "{out}");
        assert!(!out.contains("handler_0(&obj->a)"));
    }

    #[test]
    fn substitutes_every_hole_in_order() {
        let template = Template::parse("/* TypeName */|/* handle unknown key */|/* TypeName */")
            .expect("valid template");
        let class = ClassMetadata::new("::ns::C", true, Vec::new());
        assert_eq!(
            generate_class(&template, &class),
            "::ns::C|the_error.reset(new error::UnknownFieldError(str, length)); return false;|::ns::C"
        );
    }
}
