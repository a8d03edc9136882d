//! Manifest generation for exported packages

use crate::config::PackageMeta;
use crate::formats::atlas::Atlas;

/// Turn a display name into a package folder name.
///
/// Words are joined with underscores and anything that is not
/// alphanumeric is dropped, so `"Shiny Menu's Redux"` becomes
/// `"Shiny_Menus_Redux"`.
#[must_use]
pub fn to_folder_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Generate the manifest XML for a package.
///
/// # Arguments
/// * `meta` - Package metadata from the project config
/// * `folder` - Package root folder name
/// * `descriptor` - Descriptor path inside the package
/// * `atlas` - The atlas being packaged (full or partial)
/// * `kind` - `"full"` or `"partial"`
#[must_use]
pub fn generate_manifest(
    meta: &PackageMeta,
    folder: &str,
    descriptor: &str,
    atlas: &Atlas,
    kind: &str,
) -> String {
    let name = escape_xml(&meta.name);
    let folder = escape_xml(folder);
    let author = escape_xml(&meta.author);
    let description = escape_xml(&meta.description);
    let version = escape_xml(&meta.version);
    let descriptor = escape_xml(descriptor);
    let image = escape_xml(&atlas.image_name);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mod>
    <name>{name}</name>
    <folder>{folder}</folder>
    <author>{author}</author>
    <description>{description}</description>
    <version>{version}</version>
    <atlas kind="{kind}" descriptor="{descriptor}" image="{image}" width="{width}" height="{height}" sprites="{count}"/>
</mod>
"#,
        width = atlas.canvas_size.width,
        height = atlas.canvas_size.height,
        count = atlas.sprites.len(),
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::atlas::parse_descriptor;

    #[test]
    fn test_folder_names() {
        assert_eq!(to_folder_name("My Cool Menu"), "My_Cool_Menu");
        assert_eq!(to_folder_name("  Pika's  (HD) UI  "), "Pikas_HD_UI");
        assert_eq!(to_folder_name("---"), "");
    }

    #[test]
    fn test_manifest_escapes_metadata() {
        let atlas = parse_descriptor(
            "menu.png\n32, 16\nRGBA8888\nLinear,Linear\nnone\nbtn\n  xy: 0, 0\n  size: 8, 8\n",
        )
        .unwrap();
        let meta = PackageMeta {
            name: "Menus & More".into(),
            author: "<anon>".into(),
            ..PackageMeta::default()
        };

        let xml = generate_manifest(&meta, "Menus_More", "assets/atlas/menu.atlas", &atlas, "full");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<name>Menus &amp; More</name>"));
        assert!(xml.contains("<author>&lt;anon&gt;</author>"));
        assert!(xml.contains(r#"kind="full" descriptor="assets/atlas/menu.atlas" image="menu.png" width="32" height="16" sprites="1""#));
    }
}
