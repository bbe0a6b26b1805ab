//! Configuration fragments the documentation site reads: the sidebar route lists and the
//! type-name link map.

use std::{fs, path::Path};

use regex::Regex;

use crate::{
    config::LinkScheme,
    error::Result,
    naming::{camel_to_kebab, snake_to_title},
};

/// Sidebar section listing class pages.
pub const CLASSES_SECTION: &str = "Classes";
/// Sidebar section listing function module pages.
pub const FUNCTIONS_SECTION: &str = "Functions";

/// Render route entries, one per line.
pub fn build_routes_items(items: &[(String, String)]) -> String {
    items
        .iter()
        .map(|(title, slug)| format!(r#"      {{ title: "{title}", href: "/{slug}" }},"#))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the `items: [...]` body of the section titled `section`. Content without such a
/// section is returned unchanged.
pub fn replace_routes_items(content: &str, section: &str, items: &str) -> String {
    let pattern = format!(
        r#"(\{{\n\s+title: "{}"[\s\S]*?\n\s+items: \[)([\s\S]*?)(\n\s+\]\s*,\n\s+\}})"#,
        regex::escape(section)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return content.to_string();
    };
    let Some(body) = re.captures(content).and_then(|caps| caps.get(2)) else {
        return content.to_string();
    };
    format!(
        "{}\n{}{}",
        &content[..body.start()],
        items,
        &content[body.end()..]
    )
}

/// Rewrite the class and function route lists in the site's route configuration.
///
/// Returns whether the file changed. A missing file is left alone.
pub fn update_routes_config(
    path: &Path,
    class_names: &[&str],
    module_names: &[&str],
) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let content = fs::read_to_string(path)?;

    let mut classes: Vec<(String, String)> = class_names
        .iter()
        .map(|name| (name.to_string(), camel_to_kebab(name)))
        .collect();
    classes.sort_by_key(|(title, _)| title.to_lowercase());

    let mut modules: Vec<(String, String)> = module_names
        .iter()
        .map(|name| (snake_to_title(name), camel_to_kebab(name)))
        .collect();
    modules.sort_by_key(|(title, _)| title.to_lowercase());

    let updated = replace_routes_items(&content, CLASSES_SECTION, &build_routes_items(&classes));
    let updated = replace_routes_items(&updated, FUNCTIONS_SECTION, &build_routes_items(&modules));

    if updated == content {
        return Ok(false);
    }
    fs::write(path, updated)?;
    Ok(true)
}

/// Render the `TYPE_LINKS` module mapping each class and enumeration to its route.
pub fn render_type_links(class_names: &[&str], enum_names: &[&str], links: &LinkScheme) -> String {
    let mut entries: Vec<(&str, String)> = class_names
        .iter()
        .map(|name| (*name, links.class_href(name)))
        .chain(enum_names.iter().map(|name| (*name, links.enum_href(name))))
        .collect();
    entries.sort_by_key(|(name, _)| name.to_lowercase());

    let mut lines = vec!["export const TYPE_LINKS = {".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|(name, href)| format!(r#"  {name}: "{href}","#)),
    );
    lines.push("} as const;".to_string());
    lines.push(String::new());
    lines.push("export type TypeLinkName = keyof typeof TYPE_LINKS;".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// Write the type link map, leaving the file untouched when its content would not change.
///
/// Returns whether the file was written.
pub fn write_type_links(
    path: &Path,
    class_names: &[&str],
    enum_names: &[&str],
    links: &LinkScheme,
) -> Result<bool> {
    let content = render_type_links(class_names, enum_names, links);
    if path.is_file() && fs::read_to_string(path)? == content {
        return Ok(false);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const ROUTES: &str = r#"export const ROUTES = [
  {
    title: "Guides",
    items: [
      { title: "Intro", href: "/intro" },
    ],
  },
  {
    title: "Classes",
    items: [
      { title: "Old", href: "/old" },
    ],
  },
  {
    title: "Functions",
    items: [
    ],
  },
];
"#;

    #[test]
    fn route_sections_are_replaced_in_place() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("routes-config.ts");
        fs::write(&path, ROUTES)?;

        assert!(update_routes_config(&path, &["Vec2", "audio", "MouseButton"], &["math_utils"])?);
        let expected = r#"export const ROUTES = [
  {
    title: "Guides",
    items: [
      { title: "Intro", href: "/intro" },
    ],
  },
  {
    title: "Classes",
    items: [
      { title: "audio", href: "/audio" },
      { title: "MouseButton", href: "/mouse-button" },
      { title: "Vec2", href: "/vec2" },
    ],
  },
  {
    title: "Functions",
    items: [
      { title: "Math Utils", href: "/math-utils" },
    ],
  },
];
"#;
        assert_eq!(fs::read_to_string(&path)?, expected);

        assert!(!update_routes_config(&path, &["Vec2", "audio", "MouseButton"], &["math_utils"])?);
        Ok(())
    }

    #[test]
    fn missing_routes_file_is_ignored() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("absent.ts");
        assert!(!update_routes_config(&path, &["Vec2"], &[])?);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn content_without_section_is_unchanged() {
        assert_eq!(replace_routes_items("const x = 1;\n", "Classes", "items"), "const x = 1;\n");
    }

    #[test]
    fn type_links_content() {
        let links = LinkScheme::default();
        assert_eq!(
            render_type_links(&["Vec2", "Color"], &["Align"], &links),
            "export const TYPE_LINKS = {\n  \
             Align: \"/docs/manual/constants#align\",\n  \
             Color: \"/docs/classes/color\",\n  \
             Vec2: \"/docs/classes/vec2\",\n\
             } as const;\n\n\
             export type TypeLinkName = keyof typeof TYPE_LINKS;\n"
        );
    }

    #[test]
    fn type_links_are_only_written_on_change() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("lib/type-links.ts");
        let links = LinkScheme::default();

        assert!(write_type_links(&path, &["Vec2"], &[], &links)?);
        let modified = fs::metadata(&path)?.modified()?;
        assert!(!write_type_links(&path, &["Vec2"], &[], &links)?);
        assert_eq!(fs::metadata(&path)?.modified()?, modified);
        assert!(write_type_links(&path, &["Vec2", "Rect"], &[], &links)?);
        Ok(())
    }
}
