//! Fragment builders for a single class.
//!
//! Every fragment that enumerates fields walks [`ClassMetadata::state_slots`],
//! so handler `i`, dispatch case `i` and serialization order all agree.

use sha2::{Digest, Sha256};

use super::escape::cpp_string_literal;
use super::template::Hole;
use crate::model::{ClassMetadata, FieldMetadata, StateSlot};

/// Renders the code fragments for one class.
#[derive(Debug, Clone, Copy)]
pub struct ClassGenerator<'a> {
    class: &'a ClassMetadata,
}

impl<'a> ClassGenerator<'a> {
    /// Creates a generator over `class`.
    #[must_use]
    pub const fn new(class: &'a ClassMetadata) -> Self {
        Self { class }
    }

    /// Renders the fragment substituted for `hole`.
    #[must_use]
    pub fn fragment(&self, hole: &Hole) -> String {
        match hole {
            Hole::Declarations => self.declarations(),
            Hole::Init => self.initializers(),
            Hole::SerializeAllMembers => self.serialization(),
            Hole::ChangeState => self.key_dispatch(),
            Hole::ReapError => self.error_reaping(),
            Hole::GetMemberName => self.member_names(),
            Hole::Validation => self.validation(),
            Hole::ResetFlags => self.flag_reset(),
            Hole::HandleUnknownKey => self.unknown_key().to_owned(),
            Hole::TypeName => self.class.qualified_name().to_owned(),
            Hole::Writer => auxiliary_type_name(self.class.qualified_name()),
            Hole::Forward(call) => self.event_forwarding(call),
        }
    }

    /// Child handler members, then one presence flag per required field.
    #[must_use]
    pub fn declarations(&self) -> String {
        let handlers = self.slots().map(|StateSlot { index, field }| {
            format!(
                "SAXEventHandler< {} > handler_{index};",
                field.declared_type_name
            )
        });
        let flags = self
            .required()
            .map(|field| format!("bool has_{};", field.member_name));
        handlers.chain(flags).collect::<Vec<_>>().join("\n")
    }

    /// Constructor initializers binding each handler to its member.
    #[must_use]
    pub fn initializers(&self) -> String {
        self.join_slots("\n", |StateSlot { index, field }| {
            format!(", handler_{index}(&obj->{})", field.member_name)
        })
    }

    /// The `else if` chain mapping keys to states.
    #[must_use]
    pub fn key_dispatch(&self) -> String {
        self.join_slots("\n", |StateSlot { index, field }| {
            let mark = if field.required {
                format!(" has_{} = true;", field.member_name)
            } else {
                String::new()
            };
            format!(
                "else if (utility03B1B951445A::string_equal(str, length, {}, {}))\n{{ state={index};{mark} }}",
                cpp_string_literal(&field.serialized_key),
                field.serialized_key.len(),
            )
        })
    }

    /// Switch cases forwarding `call` to the active child handler.
    #[must_use]
    pub fn event_forwarding(&self, call: &str) -> String {
        self.join_slots("\n\n", |StateSlot { index, .. }| {
            format!("case {index}:\n    return checked_event_forwarding(handler_{index}.{call});")
        })
    }

    /// Switch cases collecting errors from the active child handler.
    #[must_use]
    pub fn error_reaping(&self) -> String {
        self.join_slots("\n", |StateSlot { index, .. }| {
            format!("case {index}:\n     handler_{index}.ReapError(errs); break;")
        })
    }

    /// Missing-field checks, naming each field by its serialized key.
    #[must_use]
    pub fn validation(&self) -> String {
        self.required()
            .map(|field| {
                format!(
                    "if (!has_{}) set_missing_required({});",
                    field.member_name,
                    cpp_string_literal(&field.serialized_key)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Statements clearing every presence flag.
    #[must_use]
    pub fn flag_reset(&self) -> String {
        self.required()
            .map(|field| format!("has_{} = false;", field.member_name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Body run when an object key matches no field.
    #[must_use]
    pub const fn unknown_key(&self) -> &'static str {
        if self.class.strict_unknown_keys() {
            "the_error.reset(new error::UnknownFieldError(str, length)); return false;"
        } else {
            "return true;"
        }
    }

    /// Key and value writes for every active field.
    #[must_use]
    pub fn serialization(&self) -> String {
        let writer = auxiliary_type_name(self.class.qualified_name());
        self.join_slots("\n", |StateSlot { field, .. }| {
            format!(
                "w.Key({}); Serializer< {writer}, {} >()(w, value.{});",
                cpp_string_literal(&field.serialized_key),
                field.declared_type_name,
                field.member_name
            )
        })
    }

    /// Switch cases naming the member behind each state.
    #[must_use]
    pub fn member_names(&self) -> String {
        self.join_slots("\n", |StateSlot { index, field }| {
            format!("case {index}:\n    return \"{}\";", field.member_name)
        })
    }

    fn slots(self) -> impl Iterator<Item = StateSlot<'a>> {
        self.class.state_slots()
    }

    fn required(self) -> impl Iterator<Item = &'a FieldMetadata> {
        self.slots()
            .map(|slot| slot.field)
            .filter(|field| field.required)
    }

    fn join_slots(&self, separator: &str, render: impl FnMut(StateSlot<'a>) -> String) -> String {
        self.slots().map(render).collect::<Vec<_>>().join(separator)
    }
}

/// Name of the writer template parameter for a class.
///
/// The name is `Writer` followed by the lowercase hex SHA-256 digest of the
/// qualified class name, so it cannot clash with user identifiers and stays
/// stable across runs.
///
/// # Examples
///
/// ```
/// use autojson_codegen::engine::auxiliary_type_name;
///
/// let name = auxiliary_type_name("::Point");
/// assert!(name.starts_with("Writer"));
/// assert_eq!(name.len(), "Writer".len() + 64);
/// ```
#[must_use]
pub fn auxiliary_type_name(qualified_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(qualified_name.as_bytes());
    format!("Writer{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn point() -> ClassMetadata {
        ClassMetadata::new(
            "::Point",
            false,
            vec![
                FieldMetadata::new("int", "x").required(),
                FieldMetadata::new("int", "y").keyed("Y"),
            ],
        )
    }

    #[rstest]
    fn declarations_list_handlers_then_flags(point: ClassMetadata) {
        assert_eq!(
            ClassGenerator::new(&point).declarations(),
            "SAXEventHandler< int > handler_0;\nSAXEventHandler< int > handler_1;\nbool has_x;"
        );
    }

    #[rstest]
    fn dispatch_marks_required_fields(point: ClassMetadata) {
        assert_eq!(
            ClassGenerator::new(&point).key_dispatch(),
            "else if (utility03B1B951445A::string_equal(str, length, \"x\", 1))\n{ state=0; has_x = true; }\n\
             else if (utility03B1B951445A::string_equal(str, length, \"Y\", 1))\n{ state=1; }"
        );
    }

    #[rstest]
    fn forwarding_cases_are_blank_line_separated(point: ClassMetadata) {
        assert_eq!(
            ClassGenerator::new(&point).event_forwarding("Int(i)"),
            "case 0:\n    return checked_event_forwarding(handler_0.Int(i));\n\n\
             case 1:\n    return checked_event_forwarding(handler_1.Int(i));"
        );
    }

    #[rstest]
    fn validation_and_reset_cover_required_fields(point: ClassMetadata) {
        let generator = ClassGenerator::new(&point);
        assert_eq!(generator.validation(), "if (!has_x) set_missing_required(\"x\");");
        assert_eq!(generator.flag_reset(), "has_x = false;");
    }

    #[test]
    fn validation_names_the_serialized_key() {
        let class = ClassMetadata::new(
            "::K",
            false,
            vec![FieldMetadata::new("int", "z").required().keyed("Zed")],
        );
        assert_eq!(
            ClassGenerator::new(&class).validation(),
            "if (!has_z) set_missing_required(\"Zed\");"
        );
    }

    #[rstest]
    fn serialization_uses_keys_and_writer(point: ClassMetadata) {
        let writer = auxiliary_type_name("::Point");
        assert_eq!(
            ClassGenerator::new(&point).serialization(),
            format!(
                "w.Key(\"x\"); Serializer< {writer}, int >()(w, value.x);\n\
                 w.Key(\"Y\"); Serializer< {writer}, int >()(w, value.y);"
            )
        );
    }

    #[rstest]
    #[case(true, "the_error.reset(new error::UnknownFieldError(str, length)); return false;")]
    #[case(false, "return true;")]
    fn unknown_key_policy(#[case] strict: bool, #[case] expected: &str) {
        let class = ClassMetadata::new("::S", strict, Vec::new());
        assert_eq!(ClassGenerator::new(&class).unknown_key(), expected);
    }

    #[test]
    fn ignored_fields_do_not_consume_indices() {
        let class = ClassMetadata::new(
            "::I",
            false,
            vec![
                FieldMetadata::new("int", "a").ignored(),
                FieldMetadata::new("double", "b"),
            ],
        );
        let generator = ClassGenerator::new(&class);
        assert_eq!(generator.initializers(), ", handler_0(&obj->b)");
        assert_eq!(generator.member_names(), "case 0:\n    return \"b\";");
        assert_eq!(generator.error_reaping(), "case 0:\n     handler_0.ReapError(errs); break;");
    }

    #[test]
    fn writer_name_is_stable_and_distinct() {
        let first = auxiliary_type_name("::a::Point");
        assert_eq!(first, auxiliary_type_name("::a::Point"));
        assert_ne!(first, auxiliary_type_name("::b::Point"));
        assert!(
            first
                .trim_start_matches("Writer")
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn writer_name_matches_known_digest() {
        assert_eq!(
            auxiliary_type_name(""),
            "Writere3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
