//! TypeScript printer for the codegen IR
//!
//! Output is assembled as nested [`CodeSection`]s; every nesting level is
//! indented by four spaces.

use super::ir::{Binding, DispatchNode, Expr, Item, Module};
use crate::error::{Result, RouteError};
use serde::Serialize;

const INDENT: &str = "    ";

const DISCLAIMER: [&str; 6] = [
    "/**",
    " * fsroutes",
    " *",
    " * WARNING! this file has been generated automatically.",
    " * Please do not edit it because it will probably be overwritten.",
    " */",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSection {
    Line(String),
    Block(Vec<CodeSection>),
}

impl From<&str> for CodeSection {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

impl From<String> for CodeSection {
    fn from(line: String) -> Self {
        Self::Line(line)
    }
}

pub fn code_sections_to_string(sections: &[CodeSection]) -> String {
    let mut output = String::new();
    write_sections(&mut output, sections, 0);
    output
}

fn write_sections(output: &mut String, sections: &[CodeSection], depth: usize) {
    for section in sections {
        match section {
            CodeSection::Line(line) => {
                for text in line.split('\n') {
                    // No trailing whitespace on blank lines.
                    if !text.is_empty() {
                        output.push_str(&INDENT.repeat(depth));
                        output.push_str(text);
                    }
                    output.push('\n');
                }
            }
            CodeSection::Block(children) => write_sections(output, children, depth + 1),
        }
    }
}

pub fn print_module(module: &Module) -> Result<String> {
    let mut sections = Vec::new();
    for item in &module.items {
        sections.extend(item_sections(item)?);
    }
    Ok(code_sections_to_string(&sections))
}

fn item_sections(item: &Item) -> Result<Vec<CodeSection>> {
    let sections: Vec<CodeSection> = match item {
        Item::Disclaimer => DISCLAIMER.iter().map(|line| CodeSection::from(*line)).collect(),
        Item::Blank => vec![CodeSection::from("")],
        Item::Runtime(text) => vec![CodeSection::from(text.trim_end_matches('\n'))],
        Item::Import { binding, source } => {
            vec![format!("import {} from {}", binding, quote(source)?).into()]
        }
        Item::LazyImport { binding, source } => vec![format!(
            "const {} = React.lazy(() => import({}))",
            binding,
            quote(source)?
        )
        .into()],
        Item::RouteUnion { members } => route_union(members)?,
        Item::RouteDictionary { entries } => route_dictionary(entries)?,
        Item::RouteContext { guards } => route_context(guards)?,
        Item::App { bindings, root } => app(bindings, root.as_ref())?,
    };
    Ok(sections)
}

fn route_union(members: &[String]) -> Result<Vec<CodeSection>> {
    if members.is_empty() {
        return Ok(vec!["export type RoutePath = never".into()]);
    }
    let lines = members
        .iter()
        .map(|name| -> Result<CodeSection> { Ok(format!("| {}", quote(name)?).into()) })
        .collect::<Result<Vec<CodeSection>>>()?;
    Ok(vec!["export type RoutePath =".into(), CodeSection::Block(lines)])
}

fn route_dictionary(entries: &[(String, Vec<String>)]) -> Result<Vec<CodeSection>> {
    const HEAD: &str = "export const ROUTES: Record<RoutePath, string[]> = {";
    if entries.is_empty() {
        return Ok(vec![format!("{}}}", HEAD).into()]);
    }
    let lines = entries
        .iter()
        .map(|(name, segments)| -> Result<CodeSection> {
            Ok(format!("{}: {},", quote(name)?, quote(segments)?).into())
        })
        .collect::<Result<Vec<CodeSection>>>()?;
    Ok(vec![HEAD.into(), CodeSection::Block(lines), "}".into()])
}

fn route_context(guards: &[(String, String)]) -> Result<Vec<CodeSection>> {
    if guards.is_empty() {
        return Ok(vec!["const currentRouteContext = new RouteContext([])".into()]);
    }
    let lines = guards
        .iter()
        .map(|(prefix, binding)| -> Result<CodeSection> {
            Ok(format!("[{}, {}],", quote(prefix)?, binding).into())
        })
        .collect::<Result<Vec<CodeSection>>>()?;
    Ok(vec![
        "const currentRouteContext = new RouteContext([".into(),
        CodeSection::Block(lines),
        "])".into(),
    ])
}

fn app(bindings: &[Binding], root: Option<&DispatchNode>) -> Result<Vec<CodeSection>> {
    let mut body: Vec<CodeSection> = Vec::new();
    match root {
        Some(root) => {
            body.push("const context = useRouteContext()".into());
            for binding in bindings {
                body.push(format!("const {} = {}", binding.name, expr(&binding.value)?).into());
            }
            body.push("return (".into());
            body.push(CodeSection::Block(dispatch(root)?));
            body.push(")".into());
        }
        None => body.push("return null".into()),
    }
    Ok(vec![
        "// eslint-disable-next-line @typescript-eslint/no-unused-vars".into(),
        "export default function App({ lang }: { lang?: string }) {".into(),
        CodeSection::Block(body),
        "}".into(),
    ])
}

fn expr(value: &Expr) -> Result<String> {
    let text = match value {
        Expr::Ident(name) => name.clone(),
        Expr::Element(name) => format!("<{} />", name),
        Expr::Markup(markup) => markup.to_string(),
        Expr::Intl { base, translations } => {
            let entries = translations
                .iter()
                .map(|(lang, value)| -> Result<String> { Ok(format!("{}: {}", quote(lang)?, expr(value)?)) })
                .collect::<Result<Vec<String>>>()?;
            format!("intl({}, {{{}}}, lang)", expr(base)?, entries.join(", "))
        }
    };
    Ok(text)
}

fn dispatch(node: &DispatchNode) -> Result<Vec<CodeSection>> {
    let mut props = vec![format!("path={{{}}}", quote(&node.path)?)];
    if let Some(page) = &node.page {
        props.push(format!("Page={{{}}}", page));
    }
    if let Some(layout) = &node.layout {
        props.push(format!("Layout={{{}}}", layout));
    }
    if let Some(template) = &node.template {
        props.push(format!("Template={{{}}}", template));
    }
    props.push(format!("fallback={{{}}}", node.fallback));
    props.push("context={context}".to_string());
    let props = props.join(" ");

    if node.children.is_empty() {
        return Ok(vec![format!("<Route {} />", props).into()]);
    }
    let mut children = Vec::new();
    for child in &node.children {
        children.extend(dispatch(child)?);
    }
    Ok(vec![
        format!("<Route {}>", props).into(),
        CodeSection::Block(children),
        "</Route>".into(),
    ])
}

fn quote<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| RouteError::codegen(format!("Cannot quote value: {}", e)))
}
