//! Declaration extraction: declaration files -> Type Model.

use crate::ast::{DeclNode, InterfaceNode, MemberNode, SourceTree, TypeKind};
use crate::error::ConvertError;
use crate::model::{DeclKind, Declaration, Property};
use crate::parser::{DeclarationParser, Parser};
use std::collections::HashSet;
use std::path::PathBuf;

/// The extracted Type Model plus recoverable diagnostics
#[derive(Debug, Default)]
pub struct Extraction {
    pub declarations: Vec<Declaration>,
    pub warnings: Vec<String>,
}

/// Extract declarations from a list of files, in file order then declaration
/// order. A missing file is a warning; a file that fails to parse is fatal;
/// zero readable files is fatal.
pub fn extract_files(paths: &[PathBuf]) -> Result<Extraction, ConvertError> {
    let mut extraction = Extraction::default();

    let mut existing = Vec::new();
    for path in paths {
        if path.is_file() {
            existing.push(path.clone());
        } else {
            extraction
                .warnings
                .push(format!("type file not found, skipped: {}", path.display()));
        }
    }

    if existing.is_empty() {
        return Err(ConvertError::MissingInputs);
    }

    let mut seen = HashSet::new();
    for path in &existing {
        let display = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|e| ConvertError::Io {
            path: display.clone(),
            source: e,
        })?;
        extract_into(&mut extraction, &mut seen, &display, &source)?;
    }

    Ok(extraction)
}

/// Extract declarations from in-memory sources (name, content) pairs
pub fn extract_sources(sources: &[(&str, &str)]) -> Result<Extraction, ConvertError> {
    let mut extraction = Extraction::default();
    let mut seen = HashSet::new();
    for (name, source) in sources {
        extract_into(&mut extraction, &mut seen, name, source)?;
    }
    Ok(extraction)
}

fn extract_into(
    extraction: &mut Extraction,
    seen: &mut HashSet<String>,
    file: &str,
    source: &str,
) -> Result<(), ConvertError> {
    let parser = DeclarationParser::new();
    let tree = parser.parse(source).map_err(|e| ConvertError::Parse {
        file: file.to_string(),
        rendered: e.render(source, file),
    })?;

    for decl in extract_tree(&tree, file, &mut extraction.warnings) {
        if !seen.insert(decl.name.clone()) {
            return Err(ConvertError::DuplicateDeclaration {
                name: decl.name,
                file: file.to_string(),
            });
        }
        extraction.declarations.push(decl);
    }

    Ok(())
}

fn extract_tree(tree: &SourceTree, file: &str, warnings: &mut Vec<String>) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    for decl in &tree.decls {
        match decl {
            DeclNode::Interface(node) => {
                declarations.push(extract_interface(node, file, warnings));
            }

            DeclNode::TypeAlias(node) => {
                let comments = clean_comments(&node.comments);
                let declaration = match &node.ty.kind {
                    // A union alias keeps the pipe-joined expression
                    TypeKind::Union(members) => {
                        let joined = members
                            .iter()
                            .map(|m| m.text.as_str())
                            .collect::<Vec<_>>()
                            .join(" | ");
                        scalar_alias(&node.name, joined, comments)
                    }
                    // An object-literal alias is treated like an interface
                    TypeKind::Object(members) => Declaration {
                        name: node.name.clone(),
                        kind: DeclKind::AliasStruct,
                        properties: members.iter().map(extract_property).collect(),
                        alias_expression: None,
                        enum_values: Vec::new(),
                        comments,
                        extends: Vec::new(),
                    },
                    _ => scalar_alias(&node.name, node.ty.text.clone(), comments),
                };
                declarations.push(declaration);
            }

            DeclNode::Enum(node) => {
                let values = node
                    .members
                    .iter()
                    .map(|m| {
                        m.value
                            .clone()
                            .unwrap_or_else(|| m.name.replace(['\'', '"'], ""))
                    })
                    .collect();
                declarations.push(Declaration {
                    name: node.name.clone(),
                    kind: DeclKind::Enum,
                    properties: Vec::new(),
                    alias_expression: None,
                    enum_values: values,
                    comments: clean_comments(&node.comments),
                    extends: Vec::new(),
                });
            }
        }
    }

    declarations
}

fn extract_interface(
    node: &InterfaceNode,
    file: &str,
    warnings: &mut Vec<String>,
) -> Declaration {
    // Multiple heritage bases are legal in the source language but only the
    // first is honored at emission time; surface the rest instead of
    // dropping them silently.
    if node.extends.len() > 1 {
        warnings.push(format!(
            "{}: interface '{}' extends {} bases; only '{}' is used",
            file,
            node.name,
            node.extends.len(),
            node.extends[0]
        ));
    }

    Declaration {
        name: node.name.clone(),
        kind: DeclKind::Interface,
        properties: node.members.iter().map(extract_property).collect(),
        alias_expression: None,
        enum_values: Vec::new(),
        comments: clean_comments(&node.comments),
        extends: node.extends.clone(),
    }
}

fn scalar_alias(name: &str, expression: String, comments: Vec<String>) -> Declaration {
    Declaration {
        name: name.to_string(),
        kind: DeclKind::AliasScalar,
        properties: Vec::new(),
        alias_expression: Some(expression),
        enum_values: Vec::new(),
        comments,
        extends: Vec::new(),
    }
}

fn extract_property(member: &MemberNode) -> Property {
    let union_members: Vec<String> = member
        .ty
        .union_members()
        .map(|members| members.iter().map(|m| m.text.clone()).collect())
        .unwrap_or_default();

    Property {
        name: member.name.clone(),
        type_expression: member.ty.text.clone(),
        optional: member.optional,
        is_array: member.ty.is_array(),
        is_union: union_members.len() >= 2,
        union_members,
        comments: clean_comments(&member.comments),
    }
}

/// Strip comment delimiters and continuation markers, one output entry per
/// cleaned non-empty line
fn clean_comments(raw: &[String]) -> Vec<String> {
    let mut cleaned = Vec::new();

    for comment in raw {
        let body = comment
            .trim()
            .trim_start_matches("/**")
            .trim_start_matches("/*")
            .trim_end_matches("*/");

        for line in body.lines() {
            let line = line.trim();
            let line = line.strip_prefix("//").unwrap_or(line);
            let line = line.strip_prefix('*').unwrap_or(line).trim();
            if !line.is_empty() {
                cleaned.push(line.to_string());
            }
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations(source: &str) -> Vec<Declaration> {
        extract_sources(&[("test.d.ts", source)])
            .unwrap()
            .declarations
    }

    #[test]
    fn test_interface_members_in_order() {
        let decls = declarations(
            "export interface Course {\n  courseId: string\n  courseName: string\n  score: number | null\n}\n",
        );
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].kind, DeclKind::Interface);
        let names: Vec<_> = decls[0].properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["courseId", "courseName", "score"]);
    }

    #[test]
    fn test_union_property() {
        let decls = declarations("interface A {\n  type: 'choose' | 'program'\n}\n");
        let prop = &decls[0].properties[0];
        assert!(prop.is_union);
        assert_eq!(prop.union_members, vec!["'choose'", "'program'"]);
        assert_eq!(prop.type_expression, "'choose' | 'program'");
    }

    #[test]
    fn test_array_shapes() {
        let decls = declarations("interface A {\n  a: string[]\n  b: Array<number>\n  c: string\n}\n");
        assert!(decls[0].properties[0].is_array);
        assert!(decls[0].properties[1].is_array);
        assert!(!decls[0].properties[2].is_array);
    }

    #[test]
    fn test_optional_marker() {
        let decls = declarations("interface A {\n  submit?: Submit\n  title: string\n}\n");
        assert!(decls[0].properties[0].optional);
        assert!(!decls[0].properties[1].optional);
    }

    #[test]
    fn test_quoted_member_name_stripped() {
        let decls = declarations("interface A {\n  'weird-name': string\n}\n");
        assert_eq!(decls[0].properties[0].name, "weird-name");
    }

    #[test]
    fn test_alias_union_joined_with_pipes() {
        let decls = declarations("type Status = 'not-submitted' | 'passed'\n");
        assert_eq!(decls[0].kind, DeclKind::AliasScalar);
        assert_eq!(
            decls[0].alias_expression.as_deref(),
            Some("'not-submitted' | 'passed'")
        );
    }

    #[test]
    fn test_alias_object_is_struct() {
        let decls = declarations("type TodoCourse = {\n  courseId: string\n  assigment: Item[]\n}\n");
        assert_eq!(decls[0].kind, DeclKind::AliasStruct);
        assert_eq!(decls[0].properties.len(), 2);
    }

    #[test]
    fn test_alias_scalar_keeps_expression() {
        let decls = declarations("type CourseId = ID\n");
        assert_eq!(decls[0].kind, DeclKind::AliasScalar);
        assert_eq!(decls[0].alias_expression.as_deref(), Some("ID"));
    }

    #[test]
    fn test_enum_values() {
        let decls = declarations("enum Status {\n  Open = \"open\",\n  Closed = \"closed\",\n  Pending\n}\n");
        assert_eq!(decls[0].kind, DeclKind::Enum);
        assert_eq!(decls[0].enum_values, vec!["open", "closed", "Pending"]);
    }

    #[test]
    fn test_comments_cleaned() {
        let decls = declarations(
            "/**\n * The course record\n */\ninterface Course {\n  // unique id\n  id: string\n}\n",
        );
        assert_eq!(decls[0].comments, vec!["The course record"]);
        assert_eq!(decls[0].properties[0].comments, vec!["unique id"]);
    }

    #[test]
    fn test_extends_recorded_and_warned() {
        let mut extraction =
            extract_sources(&[("a.d.ts", "interface A extends B, C {\n  x: string\n}\n")]).unwrap();
        assert_eq!(extraction.declarations[0].extends, vec!["B", "C"]);
        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.warnings.pop().unwrap().contains("only 'B' is used"));
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let result = extract_sources(&[
            ("a.d.ts", "interface A { x: string }\n"),
            ("b.d.ts", "interface A { y: string }\n"),
        ]);
        assert!(matches!(
            result,
            Err(ConvertError::DuplicateDeclaration { name, .. }) if name == "A"
        ));
    }

    #[test]
    fn test_methods_and_index_signatures_skipped() {
        let decls = declarations(
            "interface A {\n  [key: string]: unknown\n  run(): void\n  name: string\n}\n",
        );
        assert_eq!(decls[0].properties.len(), 1);
        assert_eq!(decls[0].properties[0].name, "name");
    }

    #[test]
    fn test_imports_skipped() {
        let decls = declarations("import { AssigId } from \"./general\"\n\ntype MdContent = string\n");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "MdContent");
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let result = extract_sources(&[("bad.d.ts", "function run() {}\n")]);
        assert!(matches!(result, Err(ConvertError::Parse { .. })));
    }
}
