//! Parsed per-field directives.
//!
//! Fields carry three directive slots, mirroring the tag grammar the
//! generator accepts: a mapping directive (`id`, `input`, `enum`,
//! `interface`, the exclusion marker `-`, or nothing for structural
//! inference), a description directive (literal text, or `-` to suppress),
//! and an opaque resolver tag that is handed through to the injected
//! resolver untouched.
//!
//! The raw string forms are decoded exactly once, at model-construction
//! time, into the closed types below; the generator never re-parses them.

/// The exclusion marker shared by the mapping and description directives.
pub const EXCLUSION_MARKER: &str = "-";

/// Type hint selected by the first parameter of a mapping directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    /// No recognized hint - the field's structural kind decides the mapping.
    Infer,
    /// Identifier scalar.
    Id,
    /// Project the field's struct type into an input object.
    Input,
    /// Build an enum from the field type's value mapping.
    Enum,
    /// The field names an interface this type implements.
    Interface,
}

impl TypeHint {
    /// Parses a single mapping parameter, case-folded.
    ///
    /// Unrecognized parameters fall back to [`TypeHint::Infer`].
    pub fn parse(param: &str) -> Self {
        match param.to_lowercase().as_str() {
            "id" => Self::Id,
            "input" => Self::Input,
            "enum" => Self::Enum,
            "interface" => Self::Interface,
            _ => Self::Infer,
        }
    }
}

/// A present mapping directive: either the exclusion marker or a type hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// The field is excluded from the schema entirely.
    Exclude,
    /// The field is mapped, steered by the given hint.
    Hint(TypeHint),
}

/// A present description directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionTag {
    /// Literal description text.
    Text(String),
    /// The exclusion marker: the field gets no description at all.
    Suppressed,
}

/// The decoded directive set of one field.
///
/// `mapping: None` means the field carried no mapping directive at all,
/// which is distinct from an unrecognized hint: only a directive-free
/// embedded field is flattened into its parent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Directive {
    /// Mapping directive, if present.
    pub mapping: Option<Mapping>,
    /// Description override, if present.
    pub description: Option<DescriptionTag>,
    /// Opaque resolver tag, if present.
    pub resolve: Option<String>,
}

impl Directive {
    /// Decodes the three raw directive strings.
    ///
    /// Empty strings mean "directive absent", matching the tag-lookup
    /// convention of the source grammar. The mapping directive is split on
    /// commas and only its first parameter selects the hint; trailing
    /// parameters are reserved and ignored.
    pub fn parse(mapping: &str, description: &str, resolve: &str) -> Self {
        let mapping = if mapping.is_empty() {
            None
        } else if mapping == EXCLUSION_MARKER {
            Some(Mapping::Exclude)
        } else {
            let first = mapping.split(',').next().unwrap_or_default();
            Some(Mapping::Hint(TypeHint::parse(first)))
        };

        let description = match description {
            "" => None,
            EXCLUSION_MARKER => Some(DescriptionTag::Suppressed),
            text => Some(DescriptionTag::Text(text.to_string())),
        };

        let resolve = if resolve.is_empty() {
            None
        } else {
            Some(resolve.to_string())
        };

        Self { mapping, description, resolve }
    }

    /// Whether the field is excluded from the schema.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        matches!(self.mapping, Some(Mapping::Exclude))
    }

    /// The effective type hint for the field mapper.
    #[must_use]
    pub fn hint(&self) -> TypeHint {
        match self.mapping {
            Some(Mapping::Hint(hint)) => hint,
            _ => TypeHint::Infer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_directives() {
        let d = Directive::parse("", "", "");
        assert_eq!(d, Directive::default());
        assert!(!d.is_excluded());
        assert_eq!(d.hint(), TypeHint::Infer);
    }

    #[test]
    fn test_exclusion_marker() {
        let d = Directive::parse("-", "", "");
        assert!(d.is_excluded());
    }

    #[test]
    fn test_hint_is_first_parameter_case_folded() {
        assert_eq!(Directive::parse("ID", "", "").hint(), TypeHint::Id);
        assert_eq!(Directive::parse("Input", "", "").hint(), TypeHint::Input);
        assert_eq!(Directive::parse("enum,extra", "", "").hint(), TypeHint::Enum);
        assert_eq!(Directive::parse("interface", "", "").hint(), TypeHint::Interface);
    }

    #[test]
    fn test_unknown_hint_falls_back_to_inference() {
        let d = Directive::parse("connection", "", "");
        assert_eq!(d.hint(), TypeHint::Infer);
        // Present-but-unrecognized is still a present mapping directive.
        assert_eq!(d.mapping, Some(Mapping::Hint(TypeHint::Infer)));
    }

    #[test]
    fn test_description_forms() {
        assert_eq!(Directive::parse("", "", "").description, None);
        assert_eq!(
            Directive::parse("", "-", "").description,
            Some(DescriptionTag::Suppressed)
        );
        assert_eq!(
            Directive::parse("", "the person's name", "").description,
            Some(DescriptionTag::Text("the person's name".to_string()))
        );
    }

    #[test]
    fn test_resolve_tag_is_opaque() {
        let d = Directive::parse("id", "", "lookup,batched");
        assert_eq!(d.resolve.as_deref(), Some("lookup,batched"));
    }
}
