use super::Output;
use crate::config::Config;
use crate::model::{DeclKind, Declaration, Property};
use crate::resolve::{ANY_TYPE, TypeResolver, strip_array_shape};

/// Character in enum literal values replaced by '_' in member identifiers
const ENUM_IDENT_SUBSTITUTION: char = '-';

/// Renders the Type Model as Pydantic model source code
pub struct PydanticGenerator<'a> {
    config: &'a Config,
    resolver: TypeResolver<'a>,
}

impl<'a> PydanticGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            resolver: TypeResolver::new(config),
        }
    }

    /// Render the full document: imports, custom-type aliases, enum blocks,
    /// model blocks, scalar aliases. The order is fixed.
    pub fn generate(&self, declarations: &[Declaration]) -> String {
        let mut out = Output::new();

        for import in &self.config.imports {
            out.line(import);
        }
        out.blank();

        if !self.config.custom_types.is_empty() {
            out.line("# Custom type aliases");
            for (name, custom) in &self.config.custom_types {
                out.line(format!(
                    "{} = Annotated[{}, {}]",
                    name, custom.python_type, custom.field
                ));
            }
            out.blank();
        }

        let enums: Vec<_> = declarations
            .iter()
            .filter(|d| d.kind == DeclKind::Enum)
            .collect();
        if !enums.is_empty() {
            out.line("# Enums");
            for decl in enums {
                self.emit_enum(decl, &mut out);
                out.blank();
            }
        }

        let models: Vec<_> = declarations
            .iter()
            .filter(|d| matches!(d.kind, DeclKind::Interface | DeclKind::AliasStruct))
            .collect();
        if !models.is_empty() {
            out.line("# Data models");
            for decl in models {
                self.emit_model(decl, &mut out);
                out.blank();
            }
        }

        let aliases: Vec<_> = declarations
            .iter()
            .filter(|d| d.kind == DeclKind::AliasScalar)
            .collect();
        if !aliases.is_empty() {
            out.line("# Type aliases");
            for decl in aliases {
                self.emit_alias(decl, &mut out);
            }
        }

        out.finish()
    }

    fn emit_enum(&self, decl: &Declaration, out: &mut Output) {
        self.emit_comment_line(&decl.comments, "", out);

        let base = self
            .config
            .enum_types
            .get(&decl.name)
            .map(|e| e.base_type.as_str())
            .unwrap_or("str");
        out.line(format!("class {}({}, Enum):", decl.name, base));

        if decl.enum_values.is_empty() {
            out.line("    pass");
            return;
        }
        for value in &decl.enum_values {
            let ident = value
                .replace(ENUM_IDENT_SUBSTITUTION, "_")
                .to_uppercase();
            out.line(format!("    {} = \"{}\"", ident, value));
        }
    }

    fn emit_model(&self, decl: &Declaration, out: &mut Output) {
        self.emit_comment_line(&decl.comments, "", out);

        let base = decl
            .extends
            .first()
            .map(|s| s.as_str())
            .unwrap_or("BaseModel");
        out.line(format!("class {}({}):", decl.name, base));

        if decl.properties.is_empty() {
            out.line("    pass");
            return;
        }
        for prop in &decl.properties {
            self.emit_property(prop, out);
        }
    }

    fn emit_property(&self, prop: &Property, out: &mut Output) {
        self.emit_comment_line(&prop.comments, "    ", out);

        // Array wrap resolves the element expression, so a `Tag[]` property
        // comes out as a single List[Tag]
        let mut ty = if prop.is_array {
            let element = strip_array_shape(&prop.type_expression)
                .unwrap_or(prop.type_expression.as_str());
            format!("List[{}]", self.resolver.resolve(element))
        } else {
            self.resolver.resolve(&prop.type_expression)
        };

        // A top-level union is rebuilt from its own members
        if prop.is_union {
            let members: Vec<String> = prop
                .union_members
                .iter()
                .map(|m| self.resolver.resolve(m))
                .collect();
            ty = format!("Union[{}]", members.join(", "));
        }

        if prop.optional {
            ty = format!("Optional[{}]", ty);
        }

        out.line(format!(
            "    {}: {}{}",
            prop.name,
            ty,
            self.field_marker(prop)
        ));
    }

    /// Exactly one field marker per property: the custom-type alias already
    /// carries its own Field wrapper, comments become a description, and
    /// bare fields get a default-empty or required marker.
    fn field_marker(&self, prop: &Property) -> String {
        if self.config.custom_types.contains_key(prop.type_expression.trim()) {
            return if prop.optional {
                " = None".to_string()
            } else {
                String::new()
            };
        }

        if !prop.comments.is_empty() {
            let description = prop.comments.join(" ").replace('\'', "\\'");
            return if prop.optional {
                format!(" = Field(None, description='{}')", description)
            } else {
                format!(" = Field(..., description='{}')", description)
            };
        }

        if prop.optional {
            " = None".to_string()
        } else {
            " = Field(...)".to_string()
        }
    }

    fn emit_alias(&self, decl: &Declaration, out: &mut Output) {
        self.emit_comment_line(&decl.comments, "", out);

        let value = decl
            .alias_expression
            .as_deref()
            .map(|expr| self.resolver.resolve(expr))
            .unwrap_or_else(|| ANY_TYPE.to_string());
        out.line(format!("{} = {}", decl.name, value));
    }

    fn emit_comment_line(&self, comments: &[String], indent: &str, out: &mut Output) {
        if !comments.is_empty() {
            out.line(format!("{}# {}", indent, comments.join(" ")));
        }
    }
}
